//! The aggregate factory, trait units and persistent contexts.

use arctic_tern::ContextConfig;
use arctic_tern::prelude::*;
use serial_test::serial;

#[arctic_tern_module]
mod app {
    use arctic_tern::prelude::*;

    #[arctic_tern(preference_file = "ui", version = 1)]
    pub trait Ui {
        #[property(with_delete)]
        fn theme(&self) -> String {
            "light".to_string()
        }

        #[property(key = "font")]
        fn font_size(&self) -> i32 {
            14
        }
    }

    #[migration(version = 1, unit = Ui)]
    pub struct LargerFont;

    impl Migration for LargerFont {
        fn on_migrate(&self, _version: i32, preferences: &dyn SharedPreferences) -> anyhow::Result<()> {
            let current = preferences.get_int("font", 14)?;
            preferences.edit().put_int("font", current + 2).commit()?;
            Ok(())
        }
    }

    #[arctic_tern(preference_file = "session", name = "SessionStore")]
    #[derive(Default)]
    pub struct Session {
        pub user: String,
        #[property]
        pub token: Option<String>,
    }

    #[arctic_tern_app]
    pub struct App;
}

use app::{ArcticTernFactory, ArcticTernUi, SessionStore};

#[test_log::test]
fn trait_units_use_method_bodies_as_defaults() {
    let context = Context::in_memory();
    let ui = ArcticTernUi::new(&context).unwrap();

    assert_eq!(ui.theme().unwrap(), "light");
    assert_eq!(ui.font_size().unwrap(), 14);
    ui.set_theme("dark".to_string()).unwrap();
    assert_eq!(ui.theme().unwrap(), "dark");
    ui.delete_theme().unwrap();
    assert_eq!(ui.theme().unwrap(), "light");
}

#[test_log::test]
fn factory_creates_and_migrates_every_unit() {
    let factory = ArcticTernFactory::new(Context::in_memory());
    factory.migrate_all().unwrap();

    let ui = factory.create_ui().unwrap();
    assert!(ui.is_updated().unwrap());
    assert_eq!(ui.font_size().unwrap(), 16);

    let session = factory.create_session("alice".to_string()).unwrap();
    assert_eq!(session.base().user, "alice");
    assert!(session.is_updated().unwrap());
    assert_eq!(session.token().unwrap(), None);

    factory.migrate_all().unwrap();
    assert_eq!(ui.font_size().unwrap(), 16);
}

#[test]
fn generated_name_can_be_overridden() {
    let context = Context::in_memory();
    let session = SessionStore::new(&context, "bob".to_string()).unwrap();
    session.set_token(Some("secret".to_string())).unwrap();
    assert_eq!(session.token().unwrap().as_deref(), Some("secret"));
    assert_eq!(SessionStore::PREFERENCE_FILE, "session");
    assert_eq!(SessionStore::VERSION_CODE, 0);
}

#[test]
#[serial]
fn get_instance_returns_one_factory() {
    let first = ArcticTernFactory::get_instance(&Context::in_memory());
    let second = ArcticTernFactory::get_instance(&Context::in_memory());
    assert!(std::ptr::eq(first, second));

    first.create_ui().unwrap().set_font_size(20).unwrap();
    assert_eq!(second.create_ui().unwrap().font_size().unwrap(), 20);
}

#[test_log::test]
fn sled_context_keeps_values_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let context = Context::open(ContextConfig::new(dir.path())).unwrap();
        assert!(context.is_persistent());
        let factory = ArcticTernFactory::new(context);
        factory.migrate_all().unwrap();
        let ui = factory.create_ui().unwrap();
        ui.set_theme("solarized".to_string()).unwrap();
    }

    let context = Context::open(ContextConfig::new(dir.path())).unwrap();
    let factory = ArcticTernFactory::new(context);
    let ui = factory.create_ui().unwrap();
    assert_eq!(ui.theme().unwrap(), "solarized");
    assert!(ui.is_updated().unwrap());

    factory.migrate_all().unwrap();
    assert_eq!(ui.font_size().unwrap(), 16);
}

#[test]
fn temporary_context_starts_empty() {
    let context = Context::temporary().unwrap();
    let ui = ArcticTernUi::new(&context).unwrap();
    assert!(!ui.is_theme_set().unwrap());
    assert!(!ArcticTernUi::is_updated_in(&context).unwrap());
}
