use arctic_tern_codegen::model::{MigrationAnnotation, PropertyAnnotation, PropertyOptions, UnitAnnotation};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Error, Ident, LitBool, LitInt, LitStr, Path, Result};

/// Marks a struct or trait as a preference unit.
pub const UNIT: &str = "arctic_tern";
pub const PROPERTY: &str = "property";
pub const OBJECT_PROPERTY: &str = "object_property";
pub const MIGRATION: &str = "migration";
/// Marks the host of the generated factory.
pub const APP: &str = "arctic_tern_app";

const HELPERS: &[&str] = &[UNIT, PROPERTY, OBJECT_PROPERTY, MIGRATION, APP];

/// Check if an attribute matches a given path (e.g., "property")
pub fn is_attribute(attr: &Attribute, name: &str) -> bool {
    attr.path().is_ident(name)
}

/// Find attribute by name
pub fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| is_attribute(attr, name))
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    find_attribute(attrs, name).is_some()
}

/// Whether the attribute is consumed by `#[arctic_tern_module]`.
pub fn is_helper(attr: &Attribute) -> bool {
    HELPERS.iter().any(|name| is_attribute(attr, name))
}

/// Whether `#[derive(..)]` on the item lists `name`.
pub fn derives(attrs: &[Attribute], name: &str) -> bool {
    attrs
        .iter()
        .filter(|attr| is_attribute(attr, "derive"))
        .any(|attr| {
            let mut found = false;
            // A malformed derive list is left for rustc to report.
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.segments.last().is_some_and(|segment| segment.ident == name) {
                    found = true;
                }
                Ok(())
            });
            parsed.is_ok() && found
        })
}

/// `flag` or `flag = true|false`.
fn flag(meta: &ParseNestedMeta) -> Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        Ok(meta.value()?.parse::<LitBool>()?.value)
    } else {
        Ok(true)
    }
}

/// Parse `#[arctic_tern(preference_file = "..", version = N, name = "..")]`
pub fn parse_unit_attribute(attr: &Attribute) -> Result<UnitAnnotation> {
    let mut preference_file = None;
    let mut version = 0;
    let mut name = None;

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("preference_file") {
            preference_file = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("version") {
            version = meta.value()?.parse::<LitInt>()?.base10_parse()?;
        } else if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse::<LitStr>()?.value());
        } else {
            return Err(meta.error("expected `preference_file`, `version` or `name`"));
        }
        Ok(())
    })?;

    let Some(preference_file) = preference_file else {
        return Err(Error::new_spanned(
            attr,
            "arctic_tern attribute must be in the form #[arctic_tern(preference_file = \"name\", version = 1)]",
        ));
    };
    Ok(UnitAnnotation {
        preference_file,
        version,
        name,
    })
}

/// Reads one of the options shared by both property attributes.
fn parse_option(meta: &ParseNestedMeta, options: &mut PropertyOptions) -> Result<bool> {
    if meta.path.is_ident("key") {
        options.key = Some(meta.value()?.parse::<LitStr>()?.value());
    } else if meta.path.is_ident("with_flow") {
        options.with_flow = flag(meta)?;
    } else if meta.path.is_ident("with_delete") {
        options.with_delete = flag(meta)?;
    } else {
        return Ok(false);
    }
    Ok(true)
}

/// Parse `#[property]` or `#[property(key = "..", with_flow, with_delete)]`
pub fn parse_property_attribute(attr: &Attribute) -> Result<PropertyAnnotation> {
    let mut options = PropertyOptions::default();
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(PropertyAnnotation::Standard(options));
    }
    attr.parse_nested_meta(|meta| {
        if parse_option(&meta, &mut options)? {
            Ok(())
        } else {
            Err(meta.error("expected `key`, `with_flow` or `with_delete`"))
        }
    })?;
    Ok(PropertyAnnotation::Standard(options))
}

/// Parse `#[object_property(serializer = Path, key = "..", with_flow, with_delete)]`
pub fn parse_object_property_attribute(attr: &Attribute) -> Result<PropertyAnnotation> {
    let mut options = PropertyOptions::default();
    let mut serializer: Option<Path> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("serializer") {
            serializer = Some(meta.value()?.parse()?);
            Ok(())
        } else if parse_option(&meta, &mut options)? {
            Ok(())
        } else {
            Err(meta.error("expected `serializer`, `key`, `with_flow` or `with_delete`"))
        }
    })?;
    match serializer {
        Some(serializer) => Ok(PropertyAnnotation::Object { serializer, options }),
        None => Err(Error::new_spanned(attr, "object_property requires `serializer = Path`")),
    }
}

/// Property annotation of a field or trait item, if it carries one.
pub fn parse_property_annotation(attrs: &[Attribute]) -> Result<Option<PropertyAnnotation>> {
    let standard = find_attribute(attrs, PROPERTY);
    let object = find_attribute(attrs, OBJECT_PROPERTY);
    match (standard, object) {
        (Some(_), Some(object)) => Err(Error::new_spanned(
            object,
            "a field cannot be both a property and an object_property",
        )),
        (Some(attr), None) => parse_property_attribute(attr).map(Some),
        (None, Some(attr)) => parse_object_property_attribute(attr).map(Some),
        (None, None) => Ok(None),
    }
}

/// Parse `#[migration(version = N, unit = Name)]`
pub fn parse_migration_attribute(attr: &Attribute) -> Result<(MigrationAnnotation, Ident)> {
    let mut version = None;
    let mut unit: Option<Ident> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("version") {
            version = Some(meta.value()?.parse::<LitInt>()?.base10_parse()?);
        } else if meta.path.is_ident("unit") {
            unit = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("expected `version` or `unit`"));
        }
        Ok(())
    })?;
    match (version, unit) {
        (Some(version), Some(unit)) => Ok((MigrationAnnotation { version }, unit)),
        _ => Err(Error::new_spanned(
            attr,
            "migration attribute must be in the form #[migration(version = 1, unit = Unit)]",
        )),
    }
}
