//! Types a preference file stores natively, and how each is read and written.

use proc_macro2::TokenStream;
use quote::quote;
use strum::{Display, EnumIter};
use syn::{GenericArgument, PathArguments, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum NativeType {
    /// `i32`
    Int,
    /// `bool`
    Boolean,
    /// `f32`
    Float,
    /// `i64`
    Long,
    /// `String`
    String,
    /// `Option<String>`
    NullableString,
    /// `HashSet<String>`
    StringSet,
    /// `Option<HashSet<String>>`
    NullableStringSet,
    /// `HashSet<Option<String>>`
    StringNullableSet,
    /// `Option<HashSet<Option<String>>>`
    NullableStringNullableSet,
}

/// The single generic type argument of `ty` if its last segment is `name`.
fn generic_argument<'a>(ty: &'a Type, name: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    if arguments.args.len() != 1 {
        return None;
    }
    match arguments.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn is_plain(ty: &Type, name: &str) -> bool {
    let Type::Path(path) = ty else { return false };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name && segment.arguments.is_none())
}

fn set_element(ty: &Type) -> Option<bool> {
    let element = generic_argument(ty, "HashSet")?;
    if is_plain(element, "String") {
        return Some(false);
    }
    let inner = generic_argument(element, "Option")?;
    is_plain(inner, "String").then_some(true)
}

impl NativeType {
    /// Recognises a supported type by shape, ignoring leading path segments.
    pub fn from_type(ty: &Type) -> Option<Self> {
        if let Some(inner) = generic_argument(ty, "Option") {
            if is_plain(inner, "String") {
                return Some(NativeType::NullableString);
            }
            return match set_element(inner)? {
                false => Some(NativeType::NullableStringSet),
                true => Some(NativeType::NullableStringNullableSet),
            };
        }
        if let Some(nullable_elements) = set_element(ty) {
            return Some(if nullable_elements {
                NativeType::StringNullableSet
            } else {
                NativeType::StringSet
            });
        }
        [
            ("i32", NativeType::Int),
            ("bool", NativeType::Boolean),
            ("f32", NativeType::Float),
            ("i64", NativeType::Long),
            ("String", NativeType::String),
        ]
        .into_iter()
        .find(|(name, _)| is_plain(ty, name))
        .map(|(_, native)| native)
    }

    pub fn is_nullable(self) -> bool {
        matches!(
            self,
            NativeType::NullableString | NativeType::NullableStringSet | NativeType::NullableStringNullableSet
        )
    }

    /// Expression reading the value: `prefs: &dyn SharedPreferences`,
    /// `key: &str` and `default: &T` are in scope.
    pub fn read(self, runtime: &syn::Path) -> TokenStream {
        let ext = quote!(#runtime::SharedPreferencesExt);
        match self {
            NativeType::Int => quote!(#ext::get_int(prefs, key, *default)),
            NativeType::Boolean => quote!(#ext::get_boolean(prefs, key, *default)),
            NativeType::Float => quote!(#ext::get_float(prefs, key, *default)),
            NativeType::Long => quote!(#ext::get_long(prefs, key, *default)),
            NativeType::String => quote! {
                #ext::get_string(prefs, key, ::core::option::Option::Some(default.clone()))
                    .map(::core::option::Option::unwrap_or_default)
            },
            NativeType::NullableString => quote!(#ext::get_string(prefs, key, default.clone())),
            NativeType::StringSet => quote! {
                #ext::get_string_set(prefs, key, ::core::option::Option::Some(default.clone()))
                    .map(::core::option::Option::unwrap_or_default)
            },
            NativeType::NullableStringSet => quote!(#ext::get_string_set(prefs, key, default.clone())),
            NativeType::StringNullableSet => quote! {
                #ext::get_nullable_string_set(prefs, key, ::core::option::Option::Some(default.clone()))
                    .map(::core::option::Option::unwrap_or_default)
            },
            NativeType::NullableStringNullableSet => {
                quote!(#ext::get_nullable_string_set(prefs, key, default.clone()))
            }
        }
    }

    /// Statement writing and committing `value: T`. Nullable types remove the
    /// key when given `None`.
    pub fn write(self, runtime: &syn::Path) -> TokenStream {
        let edit = quote!(#runtime::SharedPreferencesExt::edit(prefs));
        let some = quote!(::core::option::Option::Some(value));
        let put = match self {
            NativeType::Int => quote!(put_int(key, value)),
            NativeType::Boolean => quote!(put_boolean(key, value)),
            NativeType::Float => quote!(put_float(key, value)),
            NativeType::Long => quote!(put_long(key, value)),
            NativeType::String => quote!(put_string(key, #some)),
            NativeType::NullableString => quote!(put_string(key, value)),
            NativeType::StringSet => quote!(put_string_set(key, #some)),
            NativeType::NullableStringSet => quote!(put_string_set(key, value)),
            NativeType::StringNullableSet => quote!(put_nullable_string_set(key, #some)),
            NativeType::NullableStringNullableSet => quote!(put_nullable_string_set(key, value)),
        };
        quote!(#edit.#put.commit())
    }
}
