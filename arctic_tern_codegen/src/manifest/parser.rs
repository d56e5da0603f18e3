//! Manifest loading and conversion into a declaration graph.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use syn::parse::Parse;

use super::types::*;
use crate::error::{CodegenError, CodegenResult};
use crate::model::{
    Annotation, ClassKind, DeclId, Declaration, DeclarationGraph, MigrationAnnotation, Modifier, Property,
    PropertyAnnotation, PropertyOptions, UnitAnnotation,
};
use crate::processor::Processor;
use crate::GeneratorOptions;

/// Parse a manifest from a TOML file
pub fn parse_manifest<P: AsRef<Path>>(path: P) -> CodegenResult<Manifest> {
    let content = fs::read_to_string(&path).map_err(|source| CodegenError::Read {
        path: path.as_ref().display().to_string(),
        source,
    })?;
    parse_manifest_str(&content)
}

/// Parse a manifest from a TOML string
pub fn parse_manifest_str(content: &str) -> CodegenResult<Manifest> {
    Ok(toml::from_str(content)?)
}

fn syntax<T: Parse>(what: &'static str, text: &str) -> CodegenResult<T> {
    syn::parse_str(text).map_err(|error| CodegenError::Syntax {
        what,
        source_text: text.to_string(),
        message: error.to_string(),
    })
}

fn class_kind(text: &str) -> CodegenResult<ClassKind> {
    ClassKind::from_str(text).map_err(|_| CodegenError::Syntax {
        what: "kind",
        source_text: text.to_string(),
        message: "expected class, interface, enum, object or annotation".to_string(),
    })
}

fn modifiers(texts: &[String]) -> CodegenResult<Vec<Modifier>> {
    texts
        .iter()
        .map(|text| {
            Modifier::from_str(text).map_err(|_| CodegenError::Syntax {
                what: "modifier",
                source_text: text.clone(),
                message: "expected abstract, open, final or sealed".to_string(),
            })
        })
        .collect()
}

fn visibility(text: Option<&str>) -> CodegenResult<syn::Visibility> {
    syntax("visibility", text.unwrap_or("pub"))
}

fn property(config: &PropertyConfig) -> CodegenResult<Property> {
    let options = PropertyOptions {
        key: config.key.clone(),
        with_flow: config.with_flow.unwrap_or(false),
        with_delete: config.with_delete.unwrap_or(false),
    };
    let annotation = match &config.serializer {
        Some(serializer) => PropertyAnnotation::Object {
            serializer: syntax("serializer path", serializer)?,
            options,
        },
        None => PropertyAnnotation::Standard(options),
    };
    let mut property = Property::new(syntax("property name", &config.name)?, syntax("type", &config.r#type)?)
        .annotated(annotation);
    property.mutable = config.mutable.unwrap_or(true);
    property.has_initializer = config.initializer.unwrap_or(true);
    if let Some(texts) = &config.modifiers {
        property.modifiers = modifiers(texts)?;
    }
    Ok(property)
}

fn unit(config: &UnitConfig) -> CodegenResult<Declaration> {
    let kind = class_kind(config.kind.as_deref().unwrap_or("class"))?;
    let mut declaration = Declaration::new(syntax("unit name", &config.name)?, kind)
        .with_visibility(visibility(config.visibility.as_deref())?)
        .annotated(Annotation::PreferenceUnit(UnitAnnotation {
            preference_file: config.preference_file.clone(),
            version: config.version,
            name: config.generated_name.clone(),
        }));
    declaration.modifiers = match &config.modifiers {
        Some(texts) => modifiers(texts)?,
        None if kind == ClassKind::Class => vec![Modifier::Abstract],
        None => Vec::new(),
    };
    for parameter in config.constructor.iter().flatten() {
        declaration = declaration.with_parameter(
            syntax("parameter name", &parameter.name)?,
            syntax("type", &parameter.r#type)?,
        );
    }
    for config in &config.properties {
        declaration = declaration.with_property(property(config)?);
    }
    declaration.origin = config.source.as_ref().map(PathBuf::from);
    Ok(declaration)
}

fn declaration(config: &DeclarationConfig) -> CodegenResult<Declaration> {
    let mut declaration = Declaration::new(syntax("name", &config.name)?, class_kind(&config.kind)?)
        .no_arg_constructor(config.no_arg_constructor.unwrap_or(true));
    declaration.modifiers = modifiers(config.modifiers.as_deref().unwrap_or_default())?;
    for supertype in config.implements.iter().flatten() {
        declaration = declaration.implementing(syntax("supertype", supertype)?);
    }
    declaration.origin = config.source.as_ref().map(PathBuf::from);
    Ok(declaration)
}

impl Manifest {
    pub fn generator_options(&self) -> CodegenResult<GeneratorOptions> {
        match self.options.as_ref().and_then(|options| options.runtime.as_deref()) {
            Some(runtime) => Ok(GeneratorOptions::with_runtime(syntax("runtime path", runtime)?)),
            None => Ok(GeneratorOptions::default()),
        }
    }

    /// Builds the graph: units first, then serializers, migrations and the
    /// host marker, each in file order.
    pub fn to_graph(&self) -> CodegenResult<DeclarationGraph> {
        let mut graph = DeclarationGraph::new();
        let mut units: HashMap<&str, DeclId> = HashMap::new();

        for config in &self.units {
            let id = graph.add(unit(config)?);
            if units.insert(config.name.as_str(), id).is_some() {
                return Err(CodegenError::Configuration(format!(
                    "unit `{}` is declared twice",
                    config.name
                )));
            }
        }
        for config in &self.serializers {
            graph.add(declaration(config)?);
        }
        for config in &self.migrations {
            let Some(parent) = units.get(config.unit.as_str()) else {
                return Err(CodegenError::Configuration(format!(
                    "migration `{}` refers to unknown unit `{}`",
                    config.declaration.name, config.unit
                )));
            };
            graph.add(
                declaration(&config.declaration)?
                    .annotated(Annotation::Migration(MigrationAnnotation {
                        version: config.version,
                    }))
                    .nested_in(*parent),
            );
        }
        if let Some(app) = &self.app {
            let mut declaration = Declaration::new(
                syntax("app name", &app.name)?,
                class_kind(app.kind.as_deref().unwrap_or("object"))?,
            )
            .with_visibility(visibility(app.visibility.as_deref())?)
            .annotated(Annotation::App);
            declaration.origin = app.source.as_ref().map(PathBuf::from);
            graph.add(declaration);
        }
        Ok(graph)
    }
}

/// Generates every file described by the manifest at `path` into `out_dir`.
///
/// Any validation error fails the whole call, naming the declarations at
/// fault.
pub fn generate_from_manifest<P: AsRef<Path>>(path: P, out_dir: &Path) -> CodegenResult<Vec<PathBuf>> {
    let manifest = parse_manifest(&path)?;
    let graph = manifest.to_graph()?;
    let output = Processor::new(manifest.generator_options()?).process(&graph);

    if !output.is_success() {
        let messages: Vec<String> = output
            .errors
            .iter()
            .map(|error| match error.declaration() {
                Some(id) => format!("{}: {}", graph.get(id).name, error),
                None => error.to_string(),
            })
            .collect();
        return Err(CodegenError::Configuration(messages.join("\n")));
    }

    output
        .files
        .iter()
        .map(|file| file.write_to(out_dir))
        .collect()
}
