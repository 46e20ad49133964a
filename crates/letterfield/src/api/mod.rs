pub mod config;
pub mod types;

pub use config::{ConfigError, ConfigPatch, FieldConfig};
pub use types::{Color, FieldEvent, Phase, StartMode, Viewport};
