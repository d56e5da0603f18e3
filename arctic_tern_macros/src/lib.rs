use arctic_tern_codegen::{GeneratorOptions, ProcessingError, Processor};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Item, ItemMod, parse_macro_input};

use crate::visitors::{module_visitor::ModuleVisitor, strip::HelperAttributeStripper};

mod attributes;
mod crate_path;
mod visitors;

/// Generates preference types for the declarations of an inline module.
///
/// The macro reads the items of the module, validates every preference unit
/// and appends one `ArcticTern<Name>` type per unit to the module. When the
/// module also holds a host marked `#[arctic_tern_app]`, an
/// `ArcticTernFactory` creating and migrating every unit is appended too.
///
/// # Attributes
///
/// - `#[arctic_tern(preference_file = "file", version = N, name = "Generated")]`
///   on a struct with named fields or on a trait. `version` defaults to 0,
///   `name` overrides the generated type name.
/// - `#[property(key = "k", with_flow, with_delete)]` on a field (or a trait
///   method returning the default). The key defaults to `key_<field>`.
/// - `#[object_property(serializer = Path, ...)]` for types stored through a
///   `Serializer` or `NullableSerializer`.
/// - `#[migration(version = N, unit = Unit)]` on a unit struct or a `Default`
///   struct implementing `Migration`.
/// - `#[arctic_tern_app]` on the factory host.
///
/// Struct fields without a property attribute become constructor parameters
/// of the generated type. Struct units must implement `Default`, which
/// supplies the default value of every property.
///
/// # Generated API
///
/// For a field `volume: i32`:
/// - `volume()`, `set_volume(v)`, `is_volume_set()`
/// - with `with_flow`: `volume_flow()`, `volume_as_state_flow(&handle)`,
///   `volume_as_shared_flow(&handle, capacity)`, `volume_as_sink()`
/// - with `with_delete`: `delete_volume()`
///
/// Per unit: `new(&context, params..)`, `VERSION_CODE`, `PREFERENCE_FILE`,
/// `initialize_in`, `is_updated_in`, `migrate_in` and an implementation of
/// `Migratable`.
///
/// # Example
///
/// ```ignore
/// #[arctic_tern_module]
/// mod preferences {
///     use arctic_tern::prelude::*;
///
///     #[arctic_tern(preference_file = "account", version = 1)]
///     #[derive(Default)]
///     pub struct Account {
///         pub user_id: String,
///         #[property(with_flow)]
///         pub nickname: String,
///         #[property(key = "last_seen", with_delete)]
///         pub last_seen: Option<String>,
///     }
///
///     #[migration(version = 1, unit = Account)]
///     pub struct DropLegacyKeys;
///
///     impl Migration for DropLegacyKeys {
///         fn on_migrate(&self, _version: i32, preferences: &dyn SharedPreferences) -> anyhow::Result<()> {
///             preferences.edit().remove("legacy").commit()?;
///             Ok(())
///         }
///     }
///
///     #[arctic_tern_app]
///     pub struct App;
/// }
///
/// let factory = preferences::ArcticTernFactory::new(Context::in_memory());
/// factory.migrate_all()?;
/// let account = factory.create_account("alice".into())?;
/// account.set_nickname("Al".into())?;
/// ```
///
/// # Errors
///
/// Rule violations are reported at the offending declaration or field, for
/// example a property without an initial value, an unsupported type or a
/// serializer that does not convert the field's type. Other units in the
/// module still generate.
#[proc_macro_attribute]
pub fn arctic_tern_module(args: TokenStream, input: TokenStream) -> TokenStream {
    let module = parse_macro_input!(input as ItemMod);
    if !args.is_empty() {
        return syn::Error::new(Span::call_site(), "arctic_tern_module takes no arguments")
            .to_compile_error()
            .into();
    }
    expand(module).into()
}

fn expand(mut module: ItemMod) -> proc_macro2::TokenStream {
    if module.content.is_none() {
        return syn::Error::new_spanned(&module, "arctic_tern_module must be applied to an inline module")
            .to_compile_error();
    }

    let visitor = ModuleVisitor::collect(&module);
    HelperAttributeStripper::strip_module(&mut module);

    if !visitor.errors.is_empty() {
        let errors = visitor.errors.iter().map(syn::Error::to_compile_error);
        return quote!(#module #(#errors)*);
    }

    let options = GeneratorOptions::with_runtime(crate_path::arctic_tern_path());
    let output = Processor::new(options).process(&visitor.graph);

    let errors = output.errors.iter().map(|error| {
        let span = match error {
            ProcessingError::Declaration { member: Some(member), .. } => member.span(),
            ProcessingError::Declaration { declaration, .. } => visitor.span_of(*declaration),
            ProcessingError::Internal(_) => Span::call_site(),
        };
        syn::Error::new(span, error.to_string()).to_compile_error()
    });
    if let Some((_, items)) = &mut module.content {
        items.extend(output.files.into_iter().map(|file| Item::Verbatim(file.tokens)));
    }

    quote! {
        #module
        #(#errors)*
    }
}
