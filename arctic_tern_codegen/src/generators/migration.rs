//! Version bookkeeping and the migration loop of a unit.
//!
//! The stored version starts at 0 on first initialization, never at the
//! target version, so a fresh install still walks the whole chain once. The
//! loop advances one version at a time, runs that version's migrations in
//! declaration order and records the version only after all of them
//! succeeded.

use proc_macro2::TokenStream;
use quote::quote;

use super::object;
use crate::GeneratorOptions;
use crate::schema::PersistenceUnitSchema;

pub fn generate_constants(schema: &PersistenceUnitSchema, options: &GeneratorOptions) -> TokenStream {
    let runtime = &options.runtime;
    let version = schema.version;
    let file = &schema.preference_file;
    quote! {
        /// Schema version this type was generated for.
        pub const VERSION_CODE: i32 = #version;
        /// Key of the stored schema version.
        pub const KEY_VERSION: &'static str = #runtime::KEY_VERSION;
        pub const PREFERENCE_FILE: &'static str = #file;
    }
}

fn generate_registry(schema: &PersistenceUnitSchema, options: &GeneratorOptions) -> TokenStream {
    let runtime = &options.runtime;
    let inserts = schema.migrations.iter().map(|migration| {
        let version = migration.version;
        let instance = object::instance(&migration.path, migration.instantiation);
        quote! {
            migrations.insert(#version, ::std::boxed::Box::new(#instance));
        }
    });
    quote! {
        fn migrations() -> &'static #runtime::Migrations {
            static MIGRATIONS: #runtime::__private::OnceLock<#runtime::Migrations> =
                #runtime::__private::OnceLock::new();
            MIGRATIONS.get_or_init(|| {
                #[allow(unused_mut)]
                let mut migrations = #runtime::Migrations::new();
                #(#inserts)*
                migrations
            })
        }
    }
}

/// Associated functions driving the state machine against a raw store and
/// against a context.
pub fn generate_functions(schema: &PersistenceUnitSchema, options: &GeneratorOptions) -> TokenStream {
    let runtime = &options.runtime;
    let registry = generate_registry(schema, options);
    let store = quote!(#runtime::SharedPreferences);
    let ext = quote!(#runtime::SharedPreferencesExt);
    let result = quote!(#runtime::PreferenceResult);
    let log = quote!(#runtime::__private::log);

    quote! {
        #registry

        fn initialize_preferences(preferences: &dyn #store) -> #result<()> {
            if !#store::contains(preferences, Self::KEY_VERSION)? {
                #ext::edit(preferences).put_int(Self::KEY_VERSION, 0).commit()?;
                #log::debug!("initialized preference file '{}' at version 0", Self::PREFERENCE_FILE);
            }
            ::core::result::Result::Ok(())
        }

        fn is_updated_preferences(preferences: &dyn #store) -> #result<bool> {
            ::core::result::Result::Ok(
                #store::contains(preferences, Self::KEY_VERSION)?
                    && #ext::get_int(preferences, Self::KEY_VERSION, 0)? == Self::VERSION_CODE,
            )
        }

        fn migrate_preferences(preferences: &dyn #store) -> #result<()> {
            let migrations = Self::migrations();
            let mut current = #ext::get_int(preferences, Self::KEY_VERSION, 0)?;
            while current < Self::VERSION_CODE {
                let next = current + 1;
                for migration in migrations.get(next) {
                    #runtime::Migration::on_migrate(&**migration, next, preferences)
                        .map_err(|source| #runtime::PreferenceError::migration(next, source))?;
                }
                #ext::edit(preferences).put_int(Self::KEY_VERSION, next).commit()?;
                #log::info!("migrated preference file '{}' to version {}", Self::PREFERENCE_FILE, next);
                current = next;
            }
            ::core::result::Result::Ok(())
        }

        /// Stores version 0 unless a version is already stored.
        pub fn initialize_in(context: &#runtime::Context) -> #result<()> {
            let preferences = context.get_shared_preferences(Self::PREFERENCE_FILE)?;
            Self::initialize_preferences(preferences.as_ref())
        }

        /// Whether the stored version equals [`Self::VERSION_CODE`].
        pub fn is_updated_in(context: &#runtime::Context) -> #result<bool> {
            let preferences = context.get_shared_preferences(Self::PREFERENCE_FILE)?;
            Self::is_updated_preferences(preferences.as_ref())
        }

        /// Runs every migration between the stored version and
        /// [`Self::VERSION_CODE`]. A failing migration stops the chain and
        /// is retried by the next call.
        pub fn migrate_in(context: &#runtime::Context) -> #result<()> {
            let preferences = context.get_shared_preferences(Self::PREFERENCE_FILE)?;
            Self::migrate_preferences(preferences.as_ref())
        }
    }
}

pub fn generate_migratable_impl(schema: &PersistenceUnitSchema, options: &GeneratorOptions) -> TokenStream {
    let runtime = &options.runtime;
    let generated = &schema.generated_name;
    quote! {
        impl #runtime::Migratable for #generated {
            fn is_updated(&self) -> #runtime::PreferenceResult<bool> {
                Self::is_updated_preferences(self.preferences.as_ref())
            }

            fn initialize(&self) -> #runtime::PreferenceResult<()> {
                Self::initialize_preferences(self.preferences.as_ref())
            }

            fn migrate(&self) -> #runtime::PreferenceResult<()> {
                Self::migrate_preferences(self.preferences.as_ref())
            }
        }
    }
}
