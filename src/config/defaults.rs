//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Config file probed in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "amalgam.toml";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Manifest listing the files to merge (default: "Files.txt")
    pub manifest_path: String,

    /// Merged output file (default: "newMain.cpp")
    pub output_path: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            manifest_path: "Files.txt".to_string(),
            output_path: "newMain.cpp".to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "manifest_path": self.manifest_path,
            "output_path": self.output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.manifest_path, "Files.txt");
        assert_eq!(defaults.output_path, "newMain.cpp");
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();
        assert_eq!(value["manifest_path"], "Files.txt");
        assert_eq!(value["output_path"], "newMain.cpp");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
