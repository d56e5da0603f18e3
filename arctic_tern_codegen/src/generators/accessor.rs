//! Accessors for one preference field.
//!
//! Every field gets a private `OnceLock<Preference<T>>` slot, a private
//! accessor building the wrapper on first use, and public get / set / is-set
//! methods. Observation and deletion methods are added on request.

use proc_macro2::TokenStream;
use quote::quote;

use super::object;
use crate::GeneratorOptions;
use crate::naming;
use crate::schema::{DefaultValue, FieldSpec, Storage};

/// Generated pieces of one field, spliced into the unit by the caller.
pub struct FieldTokens {
    /// Struct field holding the lazily built wrapper.
    pub slot: TokenStream,
    /// Initializer of the slot inside the constructor.
    pub slot_init: TokenStream,
    /// Private wrapper accessor and the public methods.
    pub methods: TokenStream,
}

fn default_expression(default: &DefaultValue) -> TokenStream {
    match default {
        DefaultValue::BaseField(field) => quote!(::core::clone::Clone::clone(&self.base.#field)),
        DefaultValue::TraitMethod { unit, method } => quote!(<Self as #unit>::#method(self)),
    }
}

fn provider_and_setter(field: &FieldSpec, options: &GeneratorOptions) -> (TokenStream, TokenStream) {
    let runtime = &options.runtime;
    match &field.storage {
        Storage::Native(native) => (native.read(runtime), native.write(runtime)),
        Storage::Serialized(serializer) => (
            object::read(serializer, &field.ty, runtime),
            object::write(serializer, &field.ty, runtime),
        ),
    }
}

pub fn generate_field(field: &FieldSpec, options: &GeneratorOptions) -> FieldTokens {
    let runtime = &options.runtime;
    let name = &field.name;
    let ty = &field.ty;
    let key = &field.key;
    let wrapper = naming::wrapper_accessor(name);
    let default = default_expression(&field.default);
    let (read, write) = provider_and_setter(field, options);

    let slot = quote! {
        #name: #runtime::__private::OnceLock<#runtime::Preference<#ty>>
    };
    let slot_init = quote! {
        #name: #runtime::__private::OnceLock::new()
    };

    let setter = naming::setter(name);
    let is_set = naming::is_set(name);
    let get_doc = format!("Reads `{}`, falling back to the declared default.", key);
    let set_doc = if field.nullable {
        format!("Writes `{}`. Writing `None` removes the key.", key)
    } else {
        format!("Writes `{}` and commits.", key)
    };
    let is_set_doc = format!("Whether `{}` is present in the preference file.", key);

    let flow_methods = field.with_flow.then(|| {
        let flow = naming::flow(name);
        let state_flow = naming::state_flow(name);
        let shared_flow = naming::shared_flow(name);
        let sink = naming::sink(name);
        quote! {
            /// The current value followed by every change.
            pub fn #flow(&self) -> #runtime::PreferenceStream<#ty> {
                self.#wrapper().observe()
            }

            pub fn #state_flow(
                &self,
                handle: &#runtime::__private::Handle,
            ) -> #runtime::PreferenceResult<#runtime::StateFlow<#ty>> {
                self.#wrapper().as_state_flow(handle)
            }

            pub fn #shared_flow(
                &self,
                handle: &#runtime::__private::Handle,
                capacity: usize,
            ) -> #runtime::SharedFlow<#ty> {
                self.#wrapper().as_shared_flow(handle, capacity)
            }

            pub fn #sink(&self) -> #runtime::PreferenceSink<#ty> {
                self.#wrapper().as_sink()
            }
        }
    });

    let delete_method = field.with_delete.then(|| {
        let delete = naming::delete(name);
        let doc = format!("Removes `{}`; reads return the default again.", key);
        quote! {
            #[doc = #doc]
            pub fn #delete(&self) -> #runtime::PreferenceResult<()> {
                self.#wrapper().delete()
            }
        }
    });

    let methods = quote! {
        fn #wrapper(&self) -> &#runtime::Preference<#ty> {
            self.#name.get_or_init(|| {
                #runtime::Preference::new(
                    #key,
                    #default,
                    |prefs: &dyn #runtime::SharedPreferences, key: &str, default: &#ty| -> #runtime::PreferenceResult<#ty> {
                        #read
                    },
                    |prefs: &dyn #runtime::SharedPreferences, key: &str, value: #ty| -> #runtime::PreferenceResult<()> {
                        #write
                    },
                    #runtime::__private::Arc::clone(&self.preferences),
                )
            })
        }

        #[doc = #get_doc]
        pub fn #name(&self) -> #runtime::PreferenceResult<#ty> {
            self.#wrapper().value()
        }

        #[doc = #set_doc]
        pub fn #setter(&self, value: #ty) -> #runtime::PreferenceResult<()> {
            self.#wrapper().set(value)
        }

        #[doc = #is_set_doc]
        pub fn #is_set(&self) -> #runtime::PreferenceResult<bool> {
            self.#wrapper().is_set()
        }

        #flow_methods
        #delete_method
    };

    FieldTokens {
        slot,
        slot_init,
        methods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NativeType;
    use syn::parse_quote;

    fn field(with_flow: bool, with_delete: bool) -> FieldSpec {
        FieldSpec {
            name: parse_quote!(volume),
            ty: parse_quote!(i32),
            nullable: false,
            key: "key_volume".into(),
            default: DefaultValue::BaseField(parse_quote!(volume)),
            with_flow,
            with_delete,
            storage: Storage::Native(NativeType::Int),
        }
    }

    #[test]
    fn optional_methods_follow_flags() {
        let options = GeneratorOptions::default();
        let plain = generate_field(&field(false, false), &options).methods.to_string();
        assert!(plain.contains("fn set_volume"));
        assert!(plain.contains("fn is_volume_set"));
        assert!(!plain.contains("fn volume_flow"));
        assert!(!plain.contains("fn delete_volume"));

        let full = generate_field(&field(true, true), &options).methods.to_string();
        for method in ["volume_flow", "volume_as_state_flow", "volume_as_shared_flow", "volume_as_sink", "delete_volume"] {
            assert!(full.contains(&format!("fn {method}")), "missing {method}");
        }
    }

    #[test]
    fn generated_methods_parse_as_impl_items() {
        let tokens = generate_field(&field(true, true), &GeneratorOptions::default()).methods;
        let parsed: syn::ItemImpl = syn::parse2(quote!(impl Unit { #tokens })).unwrap();
        assert_eq!(parsed.items.len(), 9);
    }
}
