//! Structural rules every preference unit must satisfy before generation.
//!
//! Validation is fail-fast per unit: the first broken rule is reported against
//! the declaration (and property, when there is one) at fault, and nothing is
//! generated for that unit. Other units are validated independently.

use std::collections::HashMap;

use quote::ToTokens;
use syn::{GenericArgument, Ident, Path, PathArguments, Type};

use crate::error::{ProcessingError, ProcessingResult};
use crate::model::{ClassKind, DeclId, Declaration, DeclarationGraph, Modifier, Property, PropertyAnnotation};
use crate::naming;
use crate::resolver::{resolve_default, resolve_key};
use crate::schema::{
    AppSchema, FieldSpec, Instantiation, MigrationSpec, PersistenceUnitSchema, SerializerContract, SerializerRef,
    Storage, UnitMode,
};
use crate::types::NativeType;

/// Member names the generated type defines for itself.
const RESERVED_MEMBERS: &[&str] = &[
    "new",
    "base",
    "preferences",
    "initialize_in",
    "is_updated_in",
    "migrate_in",
    "migrations",
    "initialize_preferences",
    "is_updated_preferences",
    "migrate_preferences",
];

/// Token text of a type or path, without whitespace.
fn normalized(tokens: &impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn single_type_argument(path: &Path) -> Option<&Type> {
    let segment = path.segments.last()?;
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match (arguments.args.len(), arguments.args.first()?) {
        (1, GenericArgument::Type(ty)) => Some(ty),
        _ => None,
    }
}

fn unit_mode(id: DeclId, declaration: &Declaration) -> ProcessingResult<UnitMode> {
    match declaration.kind {
        ClassKind::Interface => Ok(UnitMode::Interface),
        ClassKind::Class if declaration.has_modifier(Modifier::Abstract) && !declaration.has_modifier(Modifier::Final) => {
            Ok(UnitMode::AbstractClass)
        }
        ClassKind::Class => Err(ProcessingError::at(id, "Annotated class is not an abstract class")),
        ClassKind::Enum => Err(ProcessingError::at(id, "Enums cannot be preference units")),
        ClassKind::Object => Err(ProcessingError::at(id, "Objects cannot be preference units")),
        ClassKind::Annotation => Err(ProcessingError::at(id, "Annotations cannot be preference units")),
    }
}

fn check_property_shape(unit: DeclId, property: &Property) -> ProcessingResult<()> {
    let name = &property.name;
    if !property.mutable {
        return Err(ProcessingError::at_member(unit, name, "Only mutable properties are allowed"));
    }
    let overridable = property.has_modifier(Modifier::Open) || property.has_modifier(Modifier::Abstract);
    if !overridable || property.has_modifier(Modifier::Final) {
        return Err(ProcessingError::at_member(unit, name, "Properties must be open"));
    }
    if !property.has_initializer {
        return Err(ProcessingError::at_member(
            unit,
            name,
            "Properties must declare an initial value",
        ));
    }
    if RESERVED_MEMBERS.iter().any(|reserved| name == reserved) {
        return Err(ProcessingError::at_member(
            unit,
            name,
            format!("Property name `{}` clashes with a generated member", name),
        ));
    }
    Ok(())
}

/// Resolves the serializer of an object property.
pub fn validate_serializer(
    graph: &DeclarationGraph,
    unit: DeclId,
    property: &Property,
    serializer: &Path,
) -> ProcessingResult<SerializerRef> {
    let Some(id) = graph.resolve(serializer) else {
        return Err(ProcessingError::at_member(
            unit,
            &property.name,
            "Serializer provided is not a class",
        ));
    };
    let declaration = graph.get(id);

    if declaration.is_abstract() {
        return Err(ProcessingError::at(id, "Serializer must not be abstract"));
    }
    let instantiation = match declaration.kind {
        ClassKind::Object => Instantiation::Singleton,
        ClassKind::Class if declaration.has_no_arg_constructor => Instantiation::Instantiable,
        ClassKind::Class => {
            return Err(ProcessingError::at(id, "Serializer must have a no-arg constructor"));
        }
        _ => return Err(ProcessingError::at(id, "Serializer is not a class or an object")),
    };

    let candidates: Vec<(SerializerContract, &Path)> = declaration
        .supertypes_named("Serializer")
        .map(|path| (SerializerContract::Strict, path))
        .chain(
            declaration
                .supertypes_named("NullableSerializer")
                .map(|path| (SerializerContract::Nullable, path)),
        )
        .collect();
    if candidates.is_empty() {
        return Err(ProcessingError::at(id, "Class does not implement Serializer"));
    }

    let field_type = normalized(&property.ty);
    let contract = candidates
        .into_iter()
        .find(|(_, path)| single_type_argument(path).is_some_and(|ty| normalized(ty) == field_type))
        .map(|(contract, _)| contract)
        .ok_or_else(|| {
            ProcessingError::at_member(
                unit,
                &property.name,
                format!(
                    "Serializer type is not compatible: `{}` does not convert `{}`",
                    declaration.name, field_type
                ),
            )
        })?;

    Ok(SerializerRef {
        declaration: id,
        path: serializer.clone(),
        instantiation,
        contract,
    })
}

/// Checks a migration nested in a unit of version `unit_version`.
pub fn validate_migration(graph: &DeclarationGraph, id: DeclId, unit_version: i32) -> ProcessingResult<MigrationSpec> {
    let declaration = graph.get(id);
    let Some(annotation) = declaration.migration_annotation() else {
        return Err(ProcessingError::Internal(format!(
            "`{}` is not a migration",
            declaration.name
        )));
    };

    if annotation.version < 1 {
        return Err(ProcessingError::at(id, "Migration version should be greater than 0"));
    }
    if annotation.version > unit_version {
        return Err(ProcessingError::at(
            id,
            format!(
                "Migration version {} exceeds the preference version {}",
                annotation.version, unit_version
            ),
        ));
    }
    if declaration.is_abstract() {
        return Err(ProcessingError::at(id, "Migration must not be abstract"));
    }
    let instantiation = match declaration.kind {
        ClassKind::Object => Instantiation::Singleton,
        ClassKind::Class if declaration.has_no_arg_constructor => Instantiation::Instantiable,
        ClassKind::Class => {
            return Err(ProcessingError::at(id, "Migration must have a no-arg constructor"));
        }
        _ => return Err(ProcessingError::at(id, "Migration is not a class or an object")),
    };
    if declaration.supertypes_named("Migration").next().is_none() {
        return Err(ProcessingError::at(id, "Class does not implement Migration"));
    }

    Ok(MigrationSpec {
        version: annotation.version,
        declaration: id,
        path: Path::from(declaration.name.clone()),
        instantiation,
    })
}

/// Validates one annotated declaration into a schema.
pub fn validate_unit(graph: &DeclarationGraph, id: DeclId) -> ProcessingResult<PersistenceUnitSchema> {
    let declaration = graph.get(id);
    let Some(annotation) = declaration.unit_annotation() else {
        return Err(ProcessingError::Internal(format!(
            "`{}` is not a preference unit",
            declaration.name
        )));
    };

    let mode = unit_mode(id, declaration)?;
    if annotation.version < 0 {
        return Err(ProcessingError::at(id, "Preference version must not be negative"));
    }
    if annotation.preference_file.is_empty() {
        return Err(ProcessingError::at(id, "Preference file name must not be empty"));
    }
    if let Some(name) = &annotation.name {
        if syn::parse_str::<Ident>(name).is_err() {
            return Err(ProcessingError::at(
                id,
                format!("Generated name `{}` is not a valid identifier", name),
            ));
        }
    }

    let mut originating = vec![id];
    let mut keys: HashMap<String, &Ident> = HashMap::new();
    let mut fields = Vec::new();

    for property in &declaration.properties {
        let Some(property_annotation) = &property.annotation else {
            continue;
        };
        check_property_shape(id, property)?;

        let storage = match property_annotation {
            PropertyAnnotation::Standard(_) => match NativeType::from_type(&property.ty) {
                Some(native) => Storage::Native(native),
                None => {
                    return Err(ProcessingError::at_member(
                        id,
                        &property.name,
                        format!("Unsupported type {}", normalized(&property.ty)),
                    ));
                }
            },
            PropertyAnnotation::Object { serializer, .. } => {
                let serializer = validate_serializer(graph, id, property, serializer)?;
                if !originating.contains(&serializer.declaration) {
                    originating.push(serializer.declaration);
                }
                Storage::Serialized(serializer)
            }
        };

        let key = resolve_key(property);
        if let Some(previous) = keys.insert(key.clone(), &property.name) {
            return Err(ProcessingError::at_member(
                id,
                &property.name,
                format!("Duplicate preference key `{}` (already used by `{}`)", key, previous),
            ));
        }

        let nullable = match &storage {
            Storage::Native(native) => native.is_nullable(),
            Storage::Serialized(serializer) => serializer.contract == SerializerContract::Nullable,
        };
        let options = property_annotation.options();
        fields.push(FieldSpec {
            name: property.name.clone(),
            ty: property.ty.clone(),
            nullable,
            key,
            default: resolve_default(mode, &declaration.name, property),
            with_flow: options.with_flow,
            with_delete: options.with_delete,
            storage,
        });
    }

    let mut migrations = Vec::new();
    for child in graph.children(id) {
        if graph.get(child).migration_annotation().is_none() {
            continue;
        }
        migrations.push(validate_migration(graph, child, annotation.version)?);
        originating.push(child);
    }

    let constructor = match mode {
        UnitMode::AbstractClass => declaration.constructor.clone(),
        UnitMode::Interface => Vec::new(),
    };

    Ok(PersistenceUnitSchema {
        declaration: id,
        name: declaration.name.clone(),
        generated_name: naming::generated_type_name(&declaration.name, annotation.name.as_deref()),
        preference_file: annotation.preference_file.clone(),
        version: annotation.version,
        mode,
        visibility: declaration.visibility.clone(),
        constructor,
        fields,
        migrations,
        originating,
    })
}

/// Locates the single host marker, if any, and pairs it with `units`.
pub fn validate_app(graph: &DeclarationGraph, units: Vec<PersistenceUnitSchema>) -> ProcessingResult<Option<AppSchema>> {
    let mut apps = graph.apps();
    let Some(id) = apps.next() else {
        return Ok(None);
    };
    if let Some(duplicate) = apps.next() {
        return Err(ProcessingError::at(duplicate, "Multiple app declarations found"));
    }
    let declaration = graph.get(id);
    if !matches!(declaration.kind, ClassKind::Class | ClassKind::Object) {
        return Err(ProcessingError::at(id, "App declaration must be a class or an object"));
    }
    Ok(Some(AppSchema {
        declaration: id,
        name: declaration.name.clone(),
        visibility: declaration.visibility.clone(),
        units,
    }))
}

/// Migrations whose parent is missing or is not a preference unit.
pub fn orphaned_migrations(graph: &DeclarationGraph) -> Vec<ProcessingError> {
    graph
        .iter()
        .filter(|(_, declaration)| declaration.migration_annotation().is_some())
        .filter(|(_, declaration)| {
            declaration
                .parent
                .is_none_or(|parent| graph.get(parent).unit_annotation().is_none())
        })
        .map(|(id, _)| ProcessingError::at(id, "Migration must be nested in a preference unit"))
        .collect()
}
