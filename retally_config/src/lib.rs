mod schema;

pub use schema::{Config, PresetConfig, Presets};
