//! Serde types of a preferences manifest.
//!
//! ```toml
//! [options]
//! runtime = "::arctic_tern"
//!
//! [[unit]]
//! name = "Settings"
//! preference_file = "settings"
//! version = 2
//! constructor = [{ name = "owner", type = "String" }]
//!
//! [[unit.property]]
//! name = "volume"
//! type = "i32"
//! with_flow = true
//!
//! [[serializer]]
//! name = "DateSerializer"
//! kind = "object"
//! implements = ["Serializer<Date>"]
//!
//! [[migration]]
//! name = "ResetVolume"
//! unit = "Settings"
//! version = 1
//! kind = "object"
//! implements = ["Migration"]
//!
//! [app]
//! name = "App"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    pub options: Option<OptionsConfig>,
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitConfig>,
    #[serde(default, rename = "serializer")]
    pub serializers: Vec<DeclarationConfig>,
    #[serde(default, rename = "migration")]
    pub migrations: Vec<MigrationConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OptionsConfig {
    /// Path of the runtime crate in generated code.
    pub runtime: Option<String>,
}

/// A preference unit. `kind` is `class` (the default) or `interface`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnitConfig {
    pub name: String,
    pub kind: Option<String>,
    /// Defaults to `["abstract"]` for classes.
    pub modifiers: Option<Vec<String>>,
    pub visibility: Option<String>,
    pub preference_file: String,
    pub version: i32,
    pub generated_name: Option<String>,
    pub constructor: Option<Vec<ParameterConfig>>,
    pub source: Option<String>,
    #[serde(default, rename = "property")]
    pub properties: Vec<PropertyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParameterConfig {
    pub name: String,
    pub r#type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropertyConfig {
    pub name: String,
    pub r#type: String,
    pub key: Option<String>,
    pub with_flow: Option<bool>,
    pub with_delete: Option<bool>,
    /// Stores the property through this serializer.
    pub serializer: Option<String>,
    pub mutable: Option<bool>,
    pub modifiers: Option<Vec<String>>,
    pub initializer: Option<bool>,
}

/// A serializer, or the shared part of a migration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeclarationConfig {
    pub name: String,
    pub kind: String,
    pub modifiers: Option<Vec<String>>,
    pub no_arg_constructor: Option<bool>,
    pub implements: Option<Vec<String>>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationConfig {
    #[serde(flatten)]
    pub declaration: DeclarationConfig,
    pub unit: String,
    pub version: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub kind: Option<String>,
    pub visibility: Option<String>,
    pub source: Option<String>,
}
