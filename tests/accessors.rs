//! Generated accessors against an in-memory context.

use std::collections::HashSet;

use arctic_tern::ValueKind;
use arctic_tern::prelude::*;
use proptest::prelude::*;

#[arctic_tern_module]
mod prefs {
    use std::collections::HashSet;

    #[arctic_tern(preference_file = "accessors")]
    pub struct Profile {
        pub owner: String,
        #[property]
        pub launches: i32,
        #[property(with_delete)]
        pub dark_mode: bool,
        #[property]
        pub scale: f32,
        #[property]
        pub last_sync: i64,
        #[property(key = "display_name", with_delete)]
        pub name: String,
        #[property(with_delete)]
        pub nickname: Option<String>,
        #[property]
        pub tags: HashSet<String>,
        #[property]
        pub aliases: Option<HashSet<String>>,
        #[property]
        pub slots: HashSet<Option<String>>,
        #[property]
        pub reserved: Option<HashSet<Option<String>>>,
    }

    impl Default for Profile {
        fn default() -> Self {
            Self {
                owner: String::new(),
                launches: 3,
                dark_mode: false,
                scale: 1.5,
                last_sync: -1,
                name: "guest".to_string(),
                nickname: Some("anon".to_string()),
                tags: HashSet::from(["new".to_string()]),
                aliases: None,
                slots: HashSet::new(),
                reserved: Some(HashSet::from([None])),
            }
        }
    }
}

fn profile(context: &Context) -> prefs::ArcticTernProfile {
    prefs::ArcticTernProfile::new(context, "alice".to_string()).unwrap()
}

#[test_log::test]
fn reads_declared_defaults_before_any_write() {
    let context = Context::in_memory();
    let profile = profile(&context);

    assert_eq!(profile.launches().unwrap(), 3);
    assert!(!profile.dark_mode().unwrap());
    assert_eq!(profile.scale().unwrap(), 1.5);
    assert_eq!(profile.last_sync().unwrap(), -1);
    assert_eq!(profile.name().unwrap(), "guest");
    assert_eq!(profile.nickname().unwrap().as_deref(), Some("anon"));
    assert_eq!(profile.tags().unwrap(), HashSet::from(["new".to_string()]));
    assert_eq!(profile.aliases().unwrap(), None);
    assert!(profile.slots().unwrap().is_empty());
    assert_eq!(profile.reserved().unwrap(), Some(HashSet::from([None])));

    assert!(!profile.is_launches_set().unwrap());
    assert!(!profile.is_name_set().unwrap());
    assert_eq!(profile.base().owner, "alice");
}

#[test_log::test]
fn values_round_trip_through_the_store() {
    let context = Context::in_memory();
    let profile = profile(&context);

    profile.set_launches(42).unwrap();
    profile.set_dark_mode(true).unwrap();
    profile.set_scale(0.25).unwrap();
    profile.set_last_sync(1_700_000_000_000).unwrap();
    profile.set_name("Alice".to_string()).unwrap();
    profile
        .set_aliases(Some(HashSet::from(["al".to_string(), "ali".to_string()])))
        .unwrap();
    profile
        .set_slots(HashSet::from([Some("a".to_string()), None]))
        .unwrap();

    assert_eq!(profile.launches().unwrap(), 42);
    assert!(profile.dark_mode().unwrap());
    assert_eq!(profile.scale().unwrap(), 0.25);
    assert_eq!(profile.last_sync().unwrap(), 1_700_000_000_000);
    assert_eq!(profile.name().unwrap(), "Alice");
    assert_eq!(profile.aliases().unwrap().map(|aliases| aliases.len()), Some(2));
    assert!(profile.slots().unwrap().contains(&None));
    assert!(profile.is_launches_set().unwrap());
}

#[test]
fn explicit_and_derived_keys_reach_the_store() {
    let context = Context::in_memory();
    let profile = profile(&context);
    profile.set_name("Bob".to_string()).unwrap();
    profile.set_launches(7).unwrap();

    let store = context.get_shared_preferences(prefs::ArcticTernProfile::PREFERENCE_FILE).unwrap();
    assert_eq!(store.get_string("display_name", None).unwrap().as_deref(), Some("Bob"));
    assert_eq!(store.get_int("key_launches", 0).unwrap(), 7);
    assert!(!store.contains("key_name").unwrap());
}

#[test]
fn delete_restores_the_default() {
    let context = Context::in_memory();
    let profile = profile(&context);

    profile.set_dark_mode(true).unwrap();
    profile.delete_dark_mode().unwrap();
    assert!(!profile.dark_mode().unwrap());
    assert!(!profile.is_dark_mode_set().unwrap());

    profile.set_name("Carol".to_string()).unwrap();
    profile.delete_name().unwrap();
    assert_eq!(profile.name().unwrap(), "guest");
}

#[test]
fn setting_none_is_the_same_as_deleting() {
    let context = Context::in_memory();
    let cleared = profile(&context);
    cleared.set_nickname(Some("ace".to_string())).unwrap();
    cleared.set_nickname(None).unwrap();

    let other = Context::in_memory();
    let deleted = profile(&other);
    deleted.set_nickname(Some("ace".to_string())).unwrap();
    deleted.delete_nickname().unwrap();

    assert_eq!(cleared.is_nickname_set().unwrap(), deleted.is_nickname_set().unwrap());
    assert!(!cleared.is_nickname_set().unwrap());
    assert_eq!(cleared.nickname().unwrap(), deleted.nickname().unwrap());
    assert_eq!(cleared.nickname().unwrap().as_deref(), Some("anon"));
}

#[test]
fn nullable_set_of_nullable_strings() {
    let context = Context::in_memory();
    let profile = profile(&context);
    assert!(!profile.is_reserved_set().unwrap());

    let seats = HashSet::from([Some("12A".to_string()), None]);
    profile.set_reserved(Some(seats.clone())).unwrap();
    assert!(profile.is_reserved_set().unwrap());
    assert_eq!(profile.reserved().unwrap(), Some(seats));

    profile.set_reserved(Some(HashSet::new())).unwrap();
    assert_eq!(profile.reserved().unwrap(), Some(HashSet::new()));

    profile.set_reserved(None).unwrap();
    assert!(!profile.is_reserved_set().unwrap());
    assert_eq!(profile.reserved().unwrap(), Some(HashSet::from([None])));
}

#[test]
fn two_instances_share_one_file() {
    let context = Context::in_memory();
    let first = profile(&context);
    let second = prefs::ArcticTernProfile::new(&context, "bob".to_string()).unwrap();

    first.set_launches(11).unwrap();
    assert_eq!(second.launches().unwrap(), 11);
}

#[test]
fn wrong_stored_type_is_reported() {
    let context = Context::in_memory();
    let profile = profile(&context);
    context
        .get_shared_preferences(prefs::ArcticTernProfile::PREFERENCE_FILE)
        .unwrap()
        .edit()
        .put_string("key_launches", Some("many".to_string()))
        .commit()
        .unwrap();

    assert!(matches!(
        profile.launches(),
        Err(PreferenceError::TypeMismatch { expected: ValueKind::Int, .. })
    ));
}

proptest! {
    #[test]
    fn any_written_value_reads_back(launches in any::<i32>(), last_sync in any::<i64>(), name in ".{0,32}") {
        let context = Context::in_memory();
        let profile = profile(&context);

        profile.set_launches(launches).unwrap();
        profile.set_last_sync(last_sync).unwrap();
        profile.set_name(name.clone()).unwrap();

        prop_assert_eq!(profile.launches().unwrap(), launches);
        prop_assert_eq!(profile.last_sync().unwrap(), last_sync);
        prop_assert_eq!(profile.name().unwrap(), name);
    }
}
