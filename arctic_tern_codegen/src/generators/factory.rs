use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::GeneratorOptions;
use crate::naming;
use crate::schema::AppSchema;

/// The aggregate factory placed next to the host marker.
///
/// The factory can be created explicitly with `new` and passed around, or
/// fetched as a process-wide instance through `get_instance`, which is set
/// exactly once no matter how many threads race on the first call.
pub fn generate_factory(app: &AppSchema, options: &GeneratorOptions) -> TokenStream {
    let runtime = &options.runtime;
    let factory = format_ident!("{}", naming::FACTORY_NAME);
    let visibility = &app.visibility;

    let constructors = app.units.iter().map(|unit| {
        let method = naming::factory_constructor(&unit.name);
        let generated = &unit.generated_name;
        let unit_visibility = &unit.visibility;
        let parameters = unit.constructor.iter().map(|parameter| {
            let name = &parameter.name;
            let ty = &parameter.ty;
            quote!(#name: #ty)
        });
        let arguments = unit.constructor.iter().map(|parameter| &parameter.name);
        let doc = format!("Creates a new [`{}`].", generated);
        quote! {
            #[doc = #doc]
            #unit_visibility fn #method(&self, #(#parameters),*) -> #runtime::PreferenceResult<#generated> {
                #generated::new(&self.context, #(#arguments),*)
            }
        }
    });

    let migrations = app.units.iter().map(|unit| {
        let generated = &unit.generated_name;
        quote! {
            #generated::initialize_in(&self.context)?;
            #generated::migrate_in(&self.context)?;
        }
    });

    let doc = format!("Creates and migrates every preference unit of [`{}`].", app.name);

    quote! {
        #[doc = #doc]
        #visibility struct #factory {
            context: #runtime::Context,
        }

        impl #factory {
            pub fn new(context: #runtime::Context) -> Self {
                Self { context }
            }

            /// The process-wide factory. The first call decides the context;
            /// later calls return the same instance.
            pub fn get_instance(context: &#runtime::Context) -> &'static Self {
                static INSTANCE: #runtime::__private::OnceLock<#factory> = #runtime::__private::OnceLock::new();
                INSTANCE.get_or_init(|| Self::new(::core::clone::Clone::clone(context)))
            }

            pub fn context(&self) -> &#runtime::Context {
                &self.context
            }

            #(#constructors)*

            /// Initializes then migrates every unit, in declaration order.
            pub fn migrate_all(&self) -> #runtime::PreferenceResult<()> {
                #(#migrations)*
                ::core::result::Result::Ok(())
            }
        }
    }
}
