//! Declaration graph produced by a front-end.
//!
//! The graph is a flat arena of declarations addressed by [`DeclId`]. It holds
//! exactly what the validator needs to know about user code: what kind of
//! item each declaration is, its modifiers, constructor shape, implemented
//! traits, properties and the preference annotations attached to it. Both the
//! attribute macro and the manifest loader build one of these.

use std::path::PathBuf;

use proc_macro2::Span;
use strum::{Display, EnumString};
use syn::{Ident, Path, Type, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Object,
    Annotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Modifier {
    Abstract,
    Open,
    Final,
    Sealed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Ident,
    pub ty: Type,
}

/// `#[arctic_tern(preference_file = "...", version = N)]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitAnnotation {
    pub preference_file: String,
    pub version: i32,
    /// Overrides the generated type name.
    pub name: Option<String>,
}

/// `#[migration(version = N)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationAnnotation {
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    PreferenceUnit(UnitAnnotation),
    Migration(MigrationAnnotation),
    App,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOptions {
    pub key: Option<String>,
    pub with_flow: bool,
    pub with_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyAnnotation {
    Standard(PropertyOptions),
    Object {
        serializer: Path,
        options: PropertyOptions,
    },
}

impl PropertyAnnotation {
    pub fn options(&self) -> &PropertyOptions {
        match self {
            PropertyAnnotation::Standard(options) | PropertyAnnotation::Object { options, .. } => options,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: Ident,
    pub ty: Type,
    pub mutable: bool,
    pub modifiers: Vec<Modifier>,
    pub has_initializer: bool,
    pub annotation: Option<PropertyAnnotation>,
}

impl Property {
    /// A mutable, open property with an initial value.
    pub fn new(name: Ident, ty: Type) -> Self {
        Self {
            name,
            ty,
            mutable: true,
            modifiers: vec![Modifier::Open],
            has_initializer: true,
            annotation: None,
        }
    }

    pub fn named(name: &str, ty: Type) -> Self {
        Self::new(Ident::new(name, Span::call_site()), ty)
    }

    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    pub fn without_initializer(mut self) -> Self {
        self.has_initializer = false;
        self
    }

    pub fn annotated(mut self, annotation: PropertyAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Ident,
    pub kind: ClassKind,
    pub modifiers: Vec<Modifier>,
    pub visibility: Visibility,
    /// Parameters a generated unit forwards to its base.
    pub constructor: Vec<Parameter>,
    pub has_no_arg_constructor: bool,
    pub supertypes: Vec<Path>,
    pub properties: Vec<Property>,
    pub annotations: Vec<Annotation>,
    pub parent: Option<DeclId>,
    pub origin: Option<PathBuf>,
}

impl Declaration {
    pub fn new(name: Ident, kind: ClassKind) -> Self {
        Self {
            name,
            kind,
            modifiers: Vec::new(),
            visibility: Visibility::Inherited,
            constructor: Vec::new(),
            has_no_arg_constructor: false,
            supertypes: Vec::new(),
            properties: Vec::new(),
            annotations: Vec::new(),
            parent: None,
            origin: None,
        }
    }

    pub fn named(name: &str, kind: ClassKind) -> Self {
        Self::new(Ident::new(name, Span::call_site()), kind)
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_parameter(mut self, name: Ident, ty: Type) -> Self {
        self.constructor.push(Parameter { name, ty });
        self
    }

    pub fn no_arg_constructor(mut self, present: bool) -> Self {
        self.has_no_arg_constructor = present;
        self
    }

    pub fn implementing(mut self, supertype: Path) -> Self {
        self.supertypes.push(supertype);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn nested_in(mut self, parent: DeclId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn from_file(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == ClassKind::Interface || self.has_modifier(Modifier::Abstract)
    }

    pub fn unit_annotation(&self) -> Option<&UnitAnnotation> {
        self.annotations.iter().find_map(|annotation| match annotation {
            Annotation::PreferenceUnit(unit) => Some(unit),
            _ => None,
        })
    }

    pub fn migration_annotation(&self) -> Option<&MigrationAnnotation> {
        self.annotations.iter().find_map(|annotation| match annotation {
            Annotation::Migration(migration) => Some(migration),
            _ => None,
        })
    }

    pub fn is_app(&self) -> bool {
        self.annotations.contains(&Annotation::App)
    }

    /// Implemented supertypes whose last segment is `name`.
    pub fn supertypes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Path> + 'a {
        self.supertypes.iter().filter(move |path| {
            path.segments
                .last()
                .is_some_and(|segment| segment.ident == name)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeclarationGraph {
    declarations: Vec<Declaration>,
}

impl DeclarationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, declaration: Declaration) -> DeclId {
        self.declarations.push(declaration);
        DeclId(self.declarations.len() - 1)
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.declarations[id.0]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.declarations[id.0]
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(index, declaration)| (DeclId(index), declaration))
    }

    pub fn find(&self, name: &str) -> Option<DeclId> {
        self.iter()
            .find(|(_, declaration)| declaration.name == name)
            .map(|(id, _)| id)
    }

    /// Resolves a path by its last segment.
    pub fn resolve(&self, path: &Path) -> Option<DeclId> {
        let last = path.segments.last()?;
        self.find(&last.ident.to_string())
    }

    pub fn children(&self, parent: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.iter()
            .filter(move |(_, declaration)| declaration.parent == Some(parent))
            .map(|(id, _)| id)
    }

    pub fn units(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.iter()
            .filter(|(_, declaration)| declaration.unit_annotation().is_some())
            .map(|(id, _)| id)
    }

    pub fn apps(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.iter()
            .filter(|(_, declaration)| declaration.is_app())
            .map(|(id, _)| id)
    }
}
