use std::collections::HashMap;

use arctic_tern_codegen::model::{
    Annotation, ClassKind, DeclId, Declaration, DeclarationGraph, Modifier, Property, PropertyAnnotation,
};
use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{
    Fields, FnArg, Ident, ItemEnum, ItemImpl, ItemMod, ItemStruct, ItemTrait, Path, ReturnType,
    TraitItem, Type,
};

use crate::attributes::{
    self, APP, MIGRATION, UNIT, derives, find_attribute, has_attribute, parse_property_annotation,
};

/// Maps the top-level items of a module onto a declaration graph.
///
/// Structs with named fields become classes, unit structs objects, traits
/// interfaces. `impl Trait for Type` blocks add supertypes, and an
/// `impl Default` counts the same as `#[derive(Default)]`.
#[derive(Default)]
pub struct ModuleVisitor {
    pub graph: DeclarationGraph,
    pub spans: HashMap<DeclId, Span>,
    pub errors: Vec<syn::Error>,
    implementations: Vec<(Ident, Path)>,
    migrations: Vec<(DeclId, Ident)>,
}

impl ModuleVisitor {
    pub fn collect(module: &ItemMod) -> Self {
        let mut visitor = Self::default();
        if let Some((_, items)) = &module.content {
            for item in items {
                visitor.visit_item(item);
            }
        }
        visitor.link_implementations();
        visitor.link_migrations();
        visitor
    }

    pub fn span_of(&self, id: DeclId) -> Span {
        self.spans.get(&id).copied().unwrap_or_else(Span::call_site)
    }

    fn add(&mut self, declaration: Declaration) -> DeclId {
        let span = declaration.name.span();
        let id = self.graph.add(declaration);
        self.spans.insert(id, span);
        id
    }

    fn annotate_unit(&mut self, attrs: &[syn::Attribute], declaration: Declaration) -> Declaration {
        match find_attribute(attrs, UNIT).map(attributes::parse_unit_attribute) {
            Some(Ok(annotation)) => declaration.annotated(Annotation::PreferenceUnit(annotation)),
            Some(Err(error)) => {
                self.errors.push(error);
                declaration
            }
            None => declaration,
        }
    }

    fn property_annotation(&mut self, attrs: &[syn::Attribute]) -> Option<PropertyAnnotation> {
        parse_property_annotation(attrs).unwrap_or_else(|error| {
            self.errors.push(error);
            None
        })
    }

    fn link_implementations(&mut self) {
        for (target, supertype) in std::mem::take(&mut self.implementations) {
            let Some(id) = self.graph.find(&target.to_string()) else {
                continue;
            };
            let is_default = supertype.is_ident("Default")
                || supertype.segments.last().is_some_and(|segment| segment.ident == "Default");
            let declaration = self.graph.get_mut(id);
            if is_default {
                declaration.has_no_arg_constructor = true;
                for property in &mut declaration.properties {
                    property.has_initializer = true;
                }
            }
            declaration.supertypes.push(supertype);
        }
    }

    fn link_migrations(&mut self) {
        for (id, unit) in std::mem::take(&mut self.migrations) {
            match self.graph.find(&unit.to_string()) {
                Some(parent) => self.graph.get_mut(id).parent = Some(parent),
                None => self.errors.push(syn::Error::new(
                    unit.span(),
                    format!("Unknown preference unit `{}`", unit),
                )),
            }
        }
    }

    fn property_type(&mut self, method: &syn::TraitItemFn) -> Option<Type> {
        let receiver_only = method.sig.inputs.len() == 1
            && matches!(method.sig.inputs.first(), Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none());
        match &method.sig.output {
            ReturnType::Type(_, ty) if receiver_only && method.sig.generics.params.is_empty() => Some((**ty).clone()),
            _ => {
                self.errors.push(syn::Error::new(
                    method.sig.ident.span(),
                    "Property methods must take `&self` and return a value",
                ));
                None
            }
        }
    }
}

impl<'ast> Visit<'ast> for ModuleVisitor {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        let has_default = derives(&item.attrs, "Default");
        let kind = match item.fields {
            Fields::Unit => ClassKind::Object,
            _ => ClassKind::Class,
        };
        let mut declaration = Declaration::new(item.ident.clone(), kind)
            .with_visibility(item.vis.clone())
            .no_arg_constructor(has_default || matches!(item.fields, Fields::Unit));

        if has_attribute(&item.attrs, UNIT) {
            declaration = self.annotate_unit(&item.attrs, declaration);
            if let Fields::Named(fields) = &item.fields {
                declaration = declaration.with_modifier(Modifier::Abstract);
                for field in &fields.named {
                    let Some(name) = field.ident.clone() else {
                        continue;
                    };
                    match self.property_annotation(&field.attrs) {
                        Some(annotation) => {
                            let mut property = Property::new(name, field.ty.clone()).annotated(annotation);
                            property.has_initializer = has_default;
                            declaration = declaration.with_property(property);
                        }
                        None => declaration = declaration.with_parameter(name, field.ty.clone()),
                    }
                }
            }
        }

        if let Some(attr) = find_attribute(&item.attrs, MIGRATION) {
            match attributes::parse_migration_attribute(attr) {
                Ok((annotation, unit)) => {
                    let id = self.add(declaration.annotated(Annotation::Migration(annotation)));
                    self.migrations.push((id, unit));
                    return;
                }
                Err(error) => self.errors.push(error),
            }
        }

        if has_attribute(&item.attrs, APP) {
            declaration = declaration.annotated(Annotation::App);
        }
        self.add(declaration);
    }

    fn visit_item_trait(&mut self, item: &'ast ItemTrait) {
        let mut declaration =
            Declaration::new(item.ident.clone(), ClassKind::Interface).with_visibility(item.vis.clone());

        if has_attribute(&item.attrs, UNIT) {
            declaration = self.annotate_unit(&item.attrs, declaration);
            for trait_item in &item.items {
                match trait_item {
                    TraitItem::Fn(method) => {
                        let Some(annotation) = self.property_annotation(&method.attrs) else {
                            continue;
                        };
                        let Some(ty) = self.property_type(method) else {
                            continue;
                        };
                        let mut property = Property::new(method.sig.ident.clone(), ty).annotated(annotation);
                        property.has_initializer = method.default.is_some();
                        declaration = declaration.with_property(property);
                    }
                    TraitItem::Const(constant) => {
                        let Some(annotation) = self.property_annotation(&constant.attrs) else {
                            continue;
                        };
                        let mut property = Property::new(constant.ident.clone(), constant.ty.clone())
                            .annotated(annotation)
                            .immutable();
                        property.has_initializer = constant.default.is_some();
                        declaration = declaration.with_property(property);
                    }
                    _ => {}
                }
            }
        }
        self.add(declaration);
    }

    fn visit_item_enum(&mut self, item: &'ast ItemEnum) {
        let mut declaration = Declaration::new(item.ident.clone(), ClassKind::Enum).with_visibility(item.vis.clone());
        if has_attribute(&item.attrs, UNIT) {
            declaration = self.annotate_unit(&item.attrs, declaration);
        }
        self.add(declaration);
    }

    fn visit_item_impl(&mut self, item: &'ast ItemImpl) {
        let Some((None, supertype, _)) = &item.trait_ else {
            return;
        };
        if let Type::Path(target) = &*item.self_ty {
            if let Some(segment) = target.path.segments.last() {
                self.implementations.push((segment.ident.clone(), supertype.clone()));
            }
        } else {
            self.errors.push(syn::Error::new(item.self_ty.span(), "unsupported implementation target"));
        }
    }

    fn visit_item_mod(&mut self, _item: &'ast ItemMod) {}
}
