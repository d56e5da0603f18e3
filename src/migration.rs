//! Versioned migrations of a preference file.
//!
//! Every generated unit stores its schema version under
//! [`KEY_VERSION`]. Migrating walks each version between the stored one and
//! the unit's target in ascending order, runs the migrations registered for
//! that version in declaration order and only then records the version. A
//! failing migration leaves the stored version at the last completed step, so
//! the next attempt retries the failed step. Migrations should therefore be
//! idempotent.
//!
//! Migrations are part of a unit's upgrade history: never remove or reorder
//! one after it has shipped.

use std::collections::BTreeMap;

use crate::error::PreferenceResult;
use crate::store::SharedPreferences;

/// Key holding the stored schema version in every preference file.
pub const KEY_VERSION: &str = "arctic.pref.key.version";

/// One migration step action.
pub trait Migration: Send + Sync {
    /// Called with the version being migrated to.
    fn on_migrate(&self, version: i32, preferences: &dyn SharedPreferences) -> anyhow::Result<()>;
}

/// Version bookkeeping implemented by every generated unit.
pub trait Migratable {
    /// True when a version is stored and equals the target version.
    fn is_updated(&self) -> PreferenceResult<bool>;

    /// Stores version 0 if no version is stored yet.
    fn initialize(&self) -> PreferenceResult<()>;

    /// Runs every pending migration step.
    fn migrate(&self) -> PreferenceResult<()>;
}

/// Migrations grouped by target version, declaration order kept per version.
#[derive(Default)]
pub struct Migrations {
    steps: BTreeMap<i32, Vec<Box<dyn Migration>>>,
}

impl Migrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: i32, migration: Box<dyn Migration>) {
        self.steps.entry(version).or_default().push(migration);
    }

    pub fn with(mut self, version: i32, migration: impl Migration + 'static) -> Self {
        self.insert(version, Box::new(migration));
        self
    }

    /// Migrations registered for `version`, in registration order.
    pub fn get(&self, version: i32) -> &[Box<dyn Migration>] {
        self.steps.get(&version).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn versions(&self) -> impl Iterator<Item = i32> + '_ {
        self.steps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for Migrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<i32, usize> = self.steps.iter().map(|(v, m)| (*v, m.len())).collect();
        f.debug_struct("Migrations").field("steps", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Migration for Named {
        fn on_migrate(&self, _version: i32, _preferences: &dyn SharedPreferences) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn groups_by_version_keeping_registration_order() {
        let migrations = Migrations::new()
            .with(2, Named("second"))
            .with(1, Named("first"))
            .with(2, Named("second-again"));

        assert_eq!(migrations.versions().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(migrations.get(2).len(), 2);
        assert_eq!(migrations.len(), 3);
        assert!(migrations.get(3).is_empty());
    }
}
