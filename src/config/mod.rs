//! Layered configuration
//!
//! Resolves the two merge paths from three layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Config file (amalgam.toml)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::{BuiltinDefaults, DEFAULT_CONFIG_FILE};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, MergeConfig};
pub use merge::{deep_merge, merge_layers};
