//! Serialization adapter for fields stored through a user serializer.
//!
//! The field is persisted as the string its serializer produces. Reading
//! serializes the default first so the store lookup has a string fallback,
//! then deserializes whatever string comes back.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Path, Type};

use crate::schema::{Instantiation, SerializerContract, SerializerRef};

/// Expression producing the serializer instance.
pub fn instance(path: &Path, instantiation: Instantiation) -> TokenStream {
    match instantiation {
        Instantiation::Singleton => quote!(#path),
        Instantiation::Instantiable => quote!(<#path as ::core::default::Default>::default()),
    }
}

fn contract(serializer: &SerializerRef, ty: &Type, runtime: &Path) -> TokenStream {
    let path = &serializer.path;
    match serializer.contract {
        SerializerContract::Strict => quote!(<#path as #runtime::Serializer<#ty>>),
        SerializerContract::Nullable => quote!(<#path as #runtime::NullableSerializer<#ty>>),
    }
}

/// Provider body; `prefs`, `key` and `default: &T` are in scope.
pub fn read(serializer: &SerializerRef, ty: &Type, runtime: &Path) -> TokenStream {
    let instance = instance(&serializer.path, serializer.instantiation);
    let contract = contract(serializer, ty, runtime);
    let decode = match serializer.contract {
        SerializerContract::Strict => quote! {
            let encoded = #runtime::SharedPreferencesExt::get_string(
                prefs,
                key,
                ::core::option::Option::Some(#contract::serialize(&serializer, default)),
            )?
            .unwrap_or_default();
            #contract::deserialize(&serializer, &encoded)
        },
        SerializerContract::Nullable => quote! {
            let encoded = #runtime::SharedPreferencesExt::get_string(
                prefs,
                key,
                #contract::serialize(&serializer, default),
            )?;
            #contract::deserialize(&serializer, encoded.as_deref())
        },
    };
    quote! {
        let serializer = #instance;
        #decode.map_err(|source| #runtime::PreferenceError::deserialize(key, source))
    }
}

/// Setter body; `prefs`, `key` and `value: T` are in scope. A nullable
/// serializer returning `None` removes the key.
pub fn write(serializer: &SerializerRef, ty: &Type, runtime: &Path) -> TokenStream {
    let instance = instance(&serializer.path, serializer.instantiation);
    let contract = contract(serializer, ty, runtime);
    let encoded = match serializer.contract {
        SerializerContract::Strict => {
            quote!(::core::option::Option::Some(#contract::serialize(&serializer, &value)))
        }
        SerializerContract::Nullable => quote!(#contract::serialize(&serializer, &value)),
    };
    quote! {
        let serializer = #instance;
        #runtime::SharedPreferencesExt::edit(prefs)
            .put_string(key, #encoded)
            .commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeclarationGraph;
    use crate::model::{ClassKind, Declaration};
    use syn::parse_quote;

    fn serializer(contract: SerializerContract, instantiation: Instantiation) -> SerializerRef {
        let mut graph = DeclarationGraph::new();
        SerializerRef {
            declaration: graph.add(Declaration::named("DateSerializer", ClassKind::Object)),
            path: parse_quote!(DateSerializer),
            instantiation,
            contract,
        }
    }

    #[test]
    fn singleton_is_used_as_value_and_class_is_defaulted() {
        let path: Path = parse_quote!(DateSerializer);
        assert_eq!(instance(&path, Instantiation::Singleton).to_string(), "DateSerializer");
        assert!(
            instance(&path, Instantiation::Instantiable)
                .to_string()
                .contains("Default > :: default ()")
        );
    }

    #[test]
    fn bodies_parse_as_blocks() {
        let runtime: Path = parse_quote!(::arctic_tern);
        let ty: Type = parse_quote!(Date);
        for contract in [SerializerContract::Strict, SerializerContract::Nullable] {
            let reference = serializer(contract, Instantiation::Instantiable);
            let read = read(&reference, &ty, &runtime);
            let write = write(&reference, &ty, &runtime);
            syn::parse2::<syn::Block>(quote!({ #read })).unwrap();
            syn::parse2::<syn::Block>(quote!({ #write })).unwrap();
        }
    }

    #[test]
    fn nullable_contract_is_named() {
        let runtime: Path = parse_quote!(::arctic_tern);
        let ty: Type = parse_quote!(Option<Date>);
        let reference = serializer(SerializerContract::Nullable, Instantiation::Singleton);
        assert!(read(&reference, &ty, &runtime).to_string().contains("NullableSerializer"));
    }
}
