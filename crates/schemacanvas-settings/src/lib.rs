//! SchemaCanvas Settings Crate
//!
//! Handles canvas configuration, validation and settings persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    CanvasConfig, GridPattern, GridSettings, InteractionSettings, LayerSettings, PageMargins,
    PageOrientation, PageSettings, PaperSize, PrintSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
