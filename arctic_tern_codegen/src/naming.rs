use heck::ToSnakeCase;
use quote::format_ident;
use syn::Ident;

/// Prefix of every generated unit type.
pub const GENERATED_PREFIX: &str = "ArcticTern";

/// Name of the generated aggregate factory.
pub const FACTORY_NAME: &str = "ArcticTernFactory";

/// Generated unit type (e.g., Settings -> ArcticTernSettings)
pub fn generated_type_name(unit: &Ident, name_override: Option<&str>) -> Ident {
    match name_override {
        Some(name) => format_ident!("{}", name),
        None => format_ident!("{}{}", GENERATED_PREFIX, unit),
    }
}

/// Lazily built wrapper accessor (e.g., volume -> volume_preference)
pub fn wrapper_accessor(field: &Ident) -> Ident {
    format_ident!("{}_preference", field)
}

pub fn setter(field: &Ident) -> Ident {
    format_ident!("set_{}", field)
}

/// e.g., volume -> is_volume_set
pub fn is_set(field: &Ident) -> Ident {
    format_ident!("is_{}_set", field)
}

pub fn delete(field: &Ident) -> Ident {
    format_ident!("delete_{}", field)
}

pub fn flow(field: &Ident) -> Ident {
    format_ident!("{}_flow", field)
}

pub fn state_flow(field: &Ident) -> Ident {
    format_ident!("{}_as_state_flow", field)
}

pub fn shared_flow(field: &Ident) -> Ident {
    format_ident!("{}_as_shared_flow", field)
}

pub fn sink(field: &Ident) -> Ident {
    format_ident!("{}_as_sink", field)
}

/// Factory constructor (e.g., UserSettings -> create_user_settings)
pub fn factory_constructor(unit: &Ident) -> Ident {
    format_ident!("create_{}", unit.to_string().to_snake_case())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn names_follow_conventions() {
        let unit: Ident = parse_quote!(UserSettings);
        let field: Ident = parse_quote!(dark_mode);
        assert_eq!(generated_type_name(&unit, None), "ArcticTernUserSettings");
        assert_eq!(generated_type_name(&unit, Some("Prefs")), "Prefs");
        assert_eq!(is_set(&field), "is_dark_mode_set");
        assert_eq!(factory_constructor(&unit), "create_user_settings");
    }
}
