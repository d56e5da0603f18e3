//! Validated persistence units, ready for emission.
//!
//! Nothing in here is re-checked by the generators: a schema is only built by
//! the validator and every choice (storage strategy, how a serializer is
//! obtained, how a default is reached) is already resolved.

use syn::{Ident, Path, Type, Visibility};

use crate::model::{DeclId, Parameter};
use crate::types::NativeType;

/// How a unit's base declaration is extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitMode {
    /// A struct embedded as `base` and built from constructor parameters.
    AbstractClass,
    /// A trait implemented by the generated type.
    Interface,
}

/// How a serializer or migration instance is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instantiation {
    /// A unit struct used as its own value.
    Singleton,
    /// Built through `Default::default()` on every use.
    Instantiable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerContract {
    Strict,
    Nullable,
}

#[derive(Debug, Clone)]
pub struct SerializerRef {
    pub declaration: DeclId,
    pub path: Path,
    pub instantiation: Instantiation,
    pub contract: SerializerContract,
}

#[derive(Debug, Clone)]
pub enum Storage {
    Native(NativeType),
    Serialized(SerializerRef),
}

/// Where a field's declared initial value is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// `self.base.<field>`
    BaseField(Ident),
    /// `<Self as Unit>::<method>(self)`
    TraitMethod { unit: Ident, method: Ident },
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: Ident,
    pub ty: Type,
    pub nullable: bool,
    pub key: String,
    pub default: DefaultValue,
    pub with_flow: bool,
    pub with_delete: bool,
    pub storage: Storage,
}

#[derive(Debug, Clone)]
pub struct MigrationSpec {
    pub version: i32,
    pub declaration: DeclId,
    pub path: Path,
    pub instantiation: Instantiation,
}

#[derive(Debug, Clone)]
pub struct PersistenceUnitSchema {
    pub declaration: DeclId,
    /// Name of the annotated declaration.
    pub name: Ident,
    /// Name of the generated type.
    pub generated_name: Ident,
    pub preference_file: String,
    pub version: i32,
    pub mode: UnitMode,
    pub visibility: Visibility,
    pub constructor: Vec<Parameter>,
    pub fields: Vec<FieldSpec>,
    pub migrations: Vec<MigrationSpec>,
    /// The unit, its migrations and serializers.
    pub originating: Vec<DeclId>,
}

impl PersistenceUnitSchema {
    /// Migrations bucketed by version, ascending, declaration order kept
    /// inside a bucket.
    pub fn migration_steps(&self) -> Vec<(i32, Vec<&MigrationSpec>)> {
        let mut steps: Vec<(i32, Vec<&MigrationSpec>)> = Vec::new();
        let mut versions: Vec<i32> = self.migrations.iter().map(|m| m.version).collect();
        versions.sort_unstable();
        versions.dedup();
        for version in versions {
            let bucket = self
                .migrations
                .iter()
                .filter(|migration| migration.version == version)
                .collect();
            steps.push((version, bucket));
        }
        steps
    }
}

#[derive(Debug, Clone)]
pub struct AppSchema {
    pub declaration: DeclId,
    pub name: Ident,
    pub visibility: Visibility,
    pub units: Vec<PersistenceUnitSchema>,
}
