//! The generation pass over a whole declaration graph.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use crate::GeneratorOptions;
use crate::error::{ProcessingError, ProcessingResult};
use crate::generators::{generate_factory, generate_unit};
use crate::model::{DeclId, DeclarationGraph};
use crate::naming;
use crate::output::GeneratedFile;
use crate::validator::{orphaned_migrations, validate_app, validate_unit};

/// Everything produced by one pass. Units that failed are absent from
/// `files` and have an entry in `errors`.
#[derive(Debug, Default)]
pub struct ProcessingOutput {
    pub files: Vec<GeneratedFile>,
    pub errors: Vec<ProcessingError>,
}

impl ProcessingOutput {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Processor {
    options: GeneratorOptions,
}

fn origin_files(graph: &DeclarationGraph, declarations: &[DeclId]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for id in declarations {
        if let Some(origin) = &graph.get(*id).origin {
            if !files.contains(origin) {
                files.push(origin.clone());
            }
        }
    }
    files
}

/// Runs `generate`, turning a panic into an internal error.
fn guarded<T>(what: &str, generate: impl FnOnce() -> T) -> ProcessingResult<T> {
    panic::catch_unwind(AssertUnwindSafe(generate)).map_err(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ProcessingError::Internal(format!("{}: {}", what, detail))
    })
}

impl Processor {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Validates and generates every unit, then the factory if a host marker
    /// is present. A failing unit never stops its siblings.
    pub fn process(&self, graph: &DeclarationGraph) -> ProcessingOutput {
        let mut output = ProcessingOutput {
            errors: orphaned_migrations(graph),
            ..ProcessingOutput::default()
        };
        let mut schemas = Vec::new();

        for id in graph.units() {
            let schema = match validate_unit(graph, id) {
                Ok(schema) => schema,
                Err(error) => {
                    log::debug!("skipping unit `{}`: {}", graph.get(id).name, error);
                    output.errors.push(error);
                    continue;
                }
            };
            let what = format!("generating `{}`", schema.generated_name);
            match guarded(&what, || generate_unit(&schema, &self.options)) {
                Ok(tokens) => {
                    output.files.push(GeneratedFile {
                        file_name: schema.generated_name.to_string(),
                        tokens,
                        origin_files: origin_files(graph, &schema.originating),
                        originating: schema.originating.clone(),
                    });
                    schemas.push(schema);
                }
                Err(error) => {
                    log::error!("{}", error);
                    output.errors.push(error);
                }
            }
        }

        match validate_app(graph, schemas) {
            Ok(Some(app)) => match guarded("generating the factory", || generate_factory(&app, &self.options)) {
                Ok(tokens) => {
                    let mut originating = vec![app.declaration];
                    originating.extend(app.units.iter().map(|unit| unit.declaration));
                    output.files.push(GeneratedFile {
                        file_name: naming::FACTORY_NAME.to_string(),
                        tokens,
                        origin_files: origin_files(graph, &originating),
                        originating,
                    });
                }
                Err(error) => {
                    log::error!("{}", error);
                    output.errors.push(error);
                }
            },
            Ok(None) => {}
            Err(error) => output.errors.push(error),
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Annotation, ClassKind, Declaration, Modifier, Property, PropertyAnnotation, PropertyOptions, UnitAnnotation};
    use syn::parse_quote;

    fn unit(name: &str, property_type: syn::Type) -> Declaration {
        Declaration::named(name, ClassKind::Class)
            .with_modifier(Modifier::Abstract)
            .from_file(format!("src/{}.rs", name.to_lowercase()))
            .annotated(Annotation::PreferenceUnit(UnitAnnotation {
                preference_file: name.to_lowercase(),
                version: 0,
                name: None,
            }))
            .with_property(
                Property::named("value", property_type)
                    .annotated(PropertyAnnotation::Standard(PropertyOptions::default())),
            )
    }

    #[test_log::test]
    fn failing_unit_does_not_stop_siblings() {
        let mut graph = DeclarationGraph::new();
        graph.add(unit("Good", parse_quote!(i32)));
        let bad = graph.add(unit("Bad", parse_quote!(u128)));
        graph.add(unit("AlsoGood", parse_quote!(String)));
        graph.add(Declaration::named("App", ClassKind::Object).annotated(Annotation::App));

        let output = Processor::default().process(&graph);
        let names: Vec<&str> = output.files.iter().map(|file| file.file_name.as_str()).collect();
        assert_eq!(names, vec!["ArcticTernGood", "ArcticTernAlsoGood", "ArcticTernFactory"]);
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].declaration(), Some(bad));
        assert_eq!(
            output.files[0].rerun_directives(),
            vec!["cargo:rerun-if-changed=src/good.rs".to_string()]
        );
    }

    #[test]
    fn no_factory_without_host_marker() {
        let mut graph = DeclarationGraph::new();
        graph.add(unit("Only", parse_quote!(bool)));
        let output = Processor::default().process(&graph);
        assert!(output.is_success());
        assert_eq!(output.files.len(), 1);
    }

    #[test]
    fn output_is_deterministic() {
        let mut graph = DeclarationGraph::new();
        graph.add(unit("Stable", parse_quote!(i64)));
        let first = Processor::default().process(&graph).files[0].contents();
        let second = Processor::default().process(&graph).files[0].contents();
        assert_eq!(first, second);
    }
}
