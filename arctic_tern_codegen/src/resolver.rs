//! Storage keys and default values of preference fields.
//!
//! Keys are part of the on-disk format. Renaming a field without pinning its
//! key with `key = "..."` orphans whatever was stored under the old key.

use syn::Ident;

use crate::model::Property;
use crate::schema::{DefaultValue, UnitMode};

pub const KEY_PREFIX: &str = "key_";

/// The explicit key, or `key_<field name>`.
pub fn resolve_key(property: &Property) -> String {
    property
        .annotation
        .as_ref()
        .and_then(|annotation| annotation.options().key.clone())
        .unwrap_or_else(|| format!("{}{}", KEY_PREFIX, property.name))
}

/// The declared initial value, reached through the base declaration.
pub fn resolve_default(mode: UnitMode, unit: &Ident, property: &Property) -> DefaultValue {
    match mode {
        UnitMode::AbstractClass => DefaultValue::BaseField(property.name.clone()),
        UnitMode::Interface => DefaultValue::TraitMethod {
            unit: unit.clone(),
            method: property.name.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyAnnotation, PropertyOptions};

    fn property(name: &str) -> Property {
        Property::named(name, syn::parse_quote!(bool))
    }

    #[test]
    fn derives_key_from_field_name() {
        let plain = property("darkMode").annotated(PropertyAnnotation::Standard(PropertyOptions::default()));
        assert_eq!(resolve_key(&plain), "key_darkMode");
    }

    #[test]
    fn explicit_key_is_used_verbatim() {
        let pinned = property("dark_mode").annotated(PropertyAnnotation::Standard(PropertyOptions {
            key: Some("ui.Dark".into()),
            ..PropertyOptions::default()
        }));
        assert_eq!(resolve_key(&pinned), "ui.Dark");
    }

    #[test]
    fn default_follows_unit_mode() {
        let unit: Ident = syn::parse_quote!(Settings);
        let field = property("volume");
        assert_eq!(
            resolve_default(UnitMode::AbstractClass, &unit, &field),
            DefaultValue::BaseField(field.name.clone())
        );
        assert_eq!(
            resolve_default(UnitMode::Interface, &unit, &field),
            DefaultValue::TraitMethod {
                unit: unit.clone(),
                method: field.name.clone()
            }
        );
    }
}
