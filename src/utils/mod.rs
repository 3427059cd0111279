pub mod settings;

pub use settings::{SettingsError, StreamingSettings, WorldSettings};
