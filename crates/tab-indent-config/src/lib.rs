pub mod provider;
pub mod settings;
pub mod store;

pub use provider::SettingsProvider;
pub use settings::{IndentType, Settings};
pub use store::{resolve_data_dir, SettingsStore, Subscription, SETTINGS_KEY};
