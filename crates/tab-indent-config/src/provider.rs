/// Live settings cache read synchronously by the key handler.
///
/// The cache is seeded from the store (falling back to defaults) and kept
/// current by a store subscription. Readers always get a complete record:
/// the value is swapped whole under a lock, never field by field.
use std::sync::{Arc, RwLock, Weak};

use crate::settings::Settings;
use crate::store::{SettingsStore, Subscription};

pub struct SettingsProvider {
    current: RwLock<Settings>,
    subscription: Option<Subscription>,
}

impl std::fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsProvider")
            .field("current", &self.current())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl SettingsProvider {
    /// Creates a provider holding fixed settings, not attached to any store.
    pub fn detached(settings: Settings) -> Self {
        Self {
            current: RwLock::new(settings),
            subscription: None,
        }
    }

    /// Loads the current settings from `store` and follows its saves.
    ///
    /// A failed load yields the defaults; the provider never holds a
    /// partial record.
    pub fn initialize(store: &SettingsStore) -> Arc<Self> {
        let initial = store.load_or_default();
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let subscription = store.subscribe(move |settings| {
                if let Some(provider) = weak.upgrade() {
                    provider.replace(settings.clone());
                }
            });
            Self {
                current: RwLock::new(initial),
                subscription: Some(subscription),
            }
        })
    }

    /// Returns a snapshot of the active settings.
    pub fn current(&self) -> Settings {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Swaps in a new record. Takes effect on the next read.
    pub fn replace(&self, settings: Settings) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = settings;
    }

    /// Re-reads the store, falling back to defaults on failure.
    pub fn refresh(&self, store: &SettingsStore) {
        self.replace(store.load_or_default());
    }
}
