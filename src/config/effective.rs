//! Effective configuration with provenance
//!
//! Captures the merged configuration plus where each contributing layer
//! came from, so a run can report exactly which file set its paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::defaults::{BuiltinDefaults, DEFAULT_CONFIG_FILE};
use super::merge::merge_layers;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "amalgam/effective_config@1";

/// Keys a config layer may set
const KNOWN_KEYS: &[&str] = &["manifest_path", "output_path"];

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Typed paths consumed by the merger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    pub manifest_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for MergeConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            manifest_path: PathBuf::from(defaults.manifest_path),
            output_path: PathBuf::from(defaults.output_path),
        }
    }
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build effective config from layers.
    ///
    /// `config_path` is read if given; callers decide whether a missing
    /// default file should be skipped (see [`EffectiveConfig::locate`]).
    pub fn build(config_path: Option<&Path>, cli_overrides: Option<Value>) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = config_path {
            let (value, digest) = Self::load_toml_file(path)?;
            Self::check_keys(&value, &path.display().to_string())?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            Self::check_keys(&cli, "command line")?;
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
        })
    }

    /// Pick the config file to read.
    ///
    /// An explicitly requested file must exist. Without one, the default
    /// file under `dir` is used only when present.
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
        match explicit {
            Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(ConfigError::NotFound(path.to_path_buf())),
            None => {
                let default = dir.join(DEFAULT_CONFIG_FILE);
                Ok(default.exists().then_some(default))
            }
        }
    }

    /// Build CLI override layer from optional flag values
    pub fn cli_layer(manifest: Option<&Path>, output: Option<&Path>) -> Option<Value> {
        let mut map = serde_json::Map::new();
        if let Some(path) = manifest {
            map.insert("manifest_path".into(), Value::String(path.to_string_lossy().to_string()));
        }
        if let Some(path) = output {
            map.insert("output_path".into(), Value::String(path.to_string_lossy().to_string()));
        }
        (!map.is_empty()).then_some(Value::Object(map))
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::Parse(format!("Invalid UTF-8: {}", e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::Array(arr.into_iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    /// Reject keys no layer is allowed to set
    fn check_keys(layer: &Value, origin: &str) -> Result<(), ConfigError> {
        let map = layer.as_object().ok_or_else(|| {
            ConfigError::Validation(format!("{}: expected a table of settings", origin))
        })?;

        match map.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            Some(key) => Err(ConfigError::Validation(format!("{}: unknown key '{}'", origin, key))),
            None => Ok(()),
        }
    }

    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        for key in KNOWN_KEYS {
            match config.get(*key) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(Value::String(_)) => {
                    return Err(ConfigError::Validation(format!("{} must not be empty", key)));
                }
                _ => {
                    return Err(ConfigError::Validation(format!("{} must be a string", key)));
                }
            }
        }

        let manifest = config.get("manifest_path").and_then(Value::as_str);
        let output = config.get("output_path").and_then(Value::as_str);
        if let (Some(manifest), Some(output)) = (manifest, output) {
            if same_file(Path::new(manifest), Path::new(output)) {
                return Err(ConfigError::Validation(format!(
                    "manifest_path and output_path both name '{}'",
                    manifest
                )));
            }
        }

        Ok(())
    }

    /// Extract the typed merge paths
    pub fn merge_config(&self) -> MergeConfig {
        let defaults = MergeConfig::default();
        MergeConfig {
            manifest_path: self
                .get_str("manifest_path")
                .map(PathBuf::from)
                .unwrap_or(defaults.manifest_path),
            output_path: self
                .get_str("output_path")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a top-level config value as string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(|v| v.as_str())
    }
}

/// Lexically absolute form of `path`: joined to the working directory,
/// `.` dropped and `..` folded into its parent.
fn normalize_path(path: &Path) -> PathBuf {
    let joined = match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Whether two paths name the same file. Existing files compare by
/// canonical path, anything else by its lexical form.
fn same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (a.canonicalize(), b.canonicalize()) {
        return a == b;
    }
    normalize_path(a) == normalize_path(b)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
}
