/// Settings persistence: one flat record in an embedded key-value store.
///
/// The record lives in a redb table under a constant key as JSON text, so
/// field-level merge with defaults works when new settings are added.
/// Saving replaces the record wholesale and notifies subscribers.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::settings::Settings;

/// Settings table: `"settings"` → JSON record.
const SETTINGS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// The single key the record is stored under.
pub const SETTINGS_KEY: &str = "settings";

/// File name of the settings database inside the data directory.
const DB_FILE_NAME: &str = "settings.redb";

/// Resolves the data directory path.
///
/// Resolution order:
/// 1. `TAB_INDENT_DATA_DIR` environment variable
/// 2. `.data/` directory next to the executable
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TAB_INDENT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    exe.parent().unwrap_or(Path::new(".")).join(".data")
}

type Listener = Arc<dyn Fn(&Settings) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    fn entries(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries().push((id, listener));
        id
    }

    fn remove(&self, id: u64) {
        self.entries().retain(|(entry_id, _)| *entry_id != id);
    }

    fn notify(&self, settings: &Settings) {
        // Snapshot first so a listener may subscribe or unsubscribe re-entrantly.
        let listeners: Vec<Listener> = self.entries().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(settings);
        }
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}

/// Handle for a change subscription. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<ListenerRegistry>,
    id: u64,
}

impl Subscription {
    /// Stops receiving change notifications.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Persistence layer for the settings record, backed by redb.
pub struct SettingsStore {
    db: Database,
    listeners: Arc<ListenerRegistry>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

impl SettingsStore {
    /// Returns the default settings database path inside the data directory.
    pub fn default_path() -> PathBuf {
        resolve_data_dir().join(DB_FILE_NAME)
    }

    /// Opens or creates the settings database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open settings database: {}", path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial settings write transaction")?;
        {
            let _ = write_txn
                .open_table(SETTINGS_TABLE)
                .context("Failed to create settings table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial settings transaction")?;

        Ok(Self {
            db,
            listeners: Arc::default(),
        })
    }

    /// Loads the stored record merged over the defaults.
    ///
    /// Returns the defaults if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read or the stored record
    /// is malformed.
    pub fn load(&self) -> Result<Settings> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(SETTINGS_TABLE)
            .context("Failed to open settings table")?;

        match table.get(SETTINGS_KEY).context("Failed to read settings")? {
            Some(guard) => {
                Settings::from_json(guard.value()).context("Failed to parse stored settings")
            }
            None => Ok(Settings::default()),
        }
    }

    /// Loads the settings, falling back to the full defaults on any error.
    pub fn load_or_default(&self) -> Settings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {e:#}");
                Settings::default()
            }
        }
    }

    /// Replaces the stored record and notifies subscribers.
    ///
    /// The record is sanitized first, so subscribers see what a later
    /// `load` returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut settings = settings.clone();
        settings.sanitize();
        let json = settings.to_json().context("Failed to serialize settings")?;

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(SETTINGS_TABLE)
                .context("Failed to open settings table")?;
            table
                .insert(SETTINGS_KEY, json.as_str())
                .context("Failed to insert settings")?;
        }
        write_txn.commit().context("Failed to commit settings")?;

        tracing::debug!("Saved settings: {json}");
        self.listeners.notify(&settings);
        Ok(())
    }

    /// Overwrites the stored record with the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults cannot be written.
    pub fn reset(&self) -> Result<()> {
        self.save(&Settings::default())
    }

    /// Registers `callback` to run after every successful save.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = self.listeners.add(Arc::new(callback));
        Subscription {
            registry: Arc::downgrade(&self.listeners),
            id,
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Writes raw text under the settings key, bypassing serialization.
    #[cfg(test)]
    fn write_raw(&self, raw: &str) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(SETTINGS_KEY, raw)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
