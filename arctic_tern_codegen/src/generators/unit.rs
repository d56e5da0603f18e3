use proc_macro2::TokenStream;
use quote::quote;

use super::accessor::{FieldTokens, generate_field};
use super::migration;
use crate::GeneratorOptions;
use crate::schema::{PersistenceUnitSchema, UnitMode};

/// The complete generated type of one preference unit.
pub fn generate_unit(schema: &PersistenceUnitSchema, options: &GeneratorOptions) -> TokenStream {
    let runtime = &options.runtime;
    let unit = &schema.name;
    let generated = &schema.generated_name;
    let visibility = &schema.visibility;

    let fields: Vec<FieldTokens> = schema
        .fields
        .iter()
        .map(|field| generate_field(field, options))
        .collect();
    let slots = fields.iter().map(|field| &field.slot);
    let slot_inits = fields.iter().map(|field| &field.slot_init);
    let methods = fields.iter().map(|field| &field.methods);

    let parameters: Vec<_> = schema
        .constructor
        .iter()
        .map(|parameter| {
            let name = &parameter.name;
            let ty = &parameter.ty;
            quote!(#name: #ty)
        })
        .collect();
    let parameter_names = schema.constructor.iter().map(|parameter| &parameter.name);

    let (base_slot, base_init, base_accessor, trait_impl) = match schema.mode {
        UnitMode::AbstractClass => (
            quote!(base: #unit,),
            quote! {
                base: #unit {
                    #(#parameter_names,)*
                    ..::core::default::Default::default()
                },
            },
            quote! {
                /// The declaration this type extends, holding the constructor
                /// arguments and declared defaults.
                pub fn base(&self) -> &#unit {
                    &self.base
                }
            },
            TokenStream::new(),
        ),
        UnitMode::Interface => (
            TokenStream::new(),
            TokenStream::new(),
            TokenStream::new(),
            quote!(impl #unit for #generated {}),
        ),
    };

    let constants = migration::generate_constants(schema, options);
    let migration_functions = migration::generate_functions(schema, options);
    let migratable = migration::generate_migratable_impl(schema, options);

    let doc = format!(
        "Preferences of [`{}`] stored in the `{}` file, schema version {}.",
        unit, schema.preference_file, schema.version
    );

    quote! {
        #[doc = #doc]
        #visibility struct #generated {
            #base_slot
            preferences: #runtime::PreferencesHandle,
            #(#slots,)*
        }

        impl #generated {
            #constants

            pub fn new(
                context: &#runtime::Context,
                #(#parameters),*
            ) -> #runtime::PreferenceResult<Self> {
                let preferences = context.get_shared_preferences(Self::PREFERENCE_FILE)?;
                ::core::result::Result::Ok(Self {
                    #base_init
                    preferences,
                    #(#slot_inits,)*
                })
            }

            #base_accessor

            pub fn preferences(&self) -> &#runtime::PreferencesHandle {
                &self.preferences
            }

            #(#methods)*

            #migration_functions
        }

        #migratable

        #trait_impl
    }
}
