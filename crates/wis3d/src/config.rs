use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Wis3dError;

/// Configuration of a [`crate::Wis3d`] session.
///
/// Only `out_folder` and `sequence_name` are required when deserializing;
/// the other fields fall back to their defaults.
///
/// ```
/// use wis3d::SessionConfig;
///
/// let config: SessionConfig =
///     serde_json::from_str(r#"{"out_folder": "/tmp/vis", "sequence_name": "run"}"#).unwrap();
/// assert_eq!(config.xyz_pattern, ["x", "y", "z"]);
/// assert!(config.auto_increase && config.auto_remove && config.enable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The root of the output tree.
    pub out_folder: PathBuf,
    /// The sequence directory under `out_folder`.
    pub sequence_name: String,
    /// Where the source x, y and z axes point in the viewer frame.
    #[serde(default = "default_xyz_pattern")]
    pub xyz_pattern: [String; 3],
    /// Give each new session for the same sequence the next scene id.
    #[serde(default = "default_true")]
    pub auto_increase: bool,
    /// Clear the sequence directory on first use in this process.
    #[serde(default = "default_true")]
    pub auto_remove: bool,
    /// When false, every operation of the session is a no-op.
    #[serde(default = "default_true")]
    pub enable: bool,
}

fn default_xyz_pattern() -> [String; 3] {
    ["x".to_string(), "y".to_string(), "z".to_string()]
}

fn default_true() -> bool {
    true
}

impl SessionConfig {
    /// Create a configuration with default options.
    pub fn new(out_folder: impl Into<PathBuf>, sequence_name: impl Into<String>) -> Self {
        Self {
            out_folder: out_folder.into(),
            sequence_name: sequence_name.into(),
            xyz_pattern: default_xyz_pattern(),
            auto_increase: true,
            auto_remove: true,
            enable: true,
        }
    }

    /// Set the axis pattern, e.g. `["x", "-y", "-z"]` for OpenCV cameras.
    pub fn with_xyz_pattern<S: AsRef<str>>(mut self, pattern: [S; 3]) -> Self {
        self.xyz_pattern = pattern.map(|label| label.as_ref().to_string());
        self
    }

    /// Set whether new sessions for the same sequence advance the scene id.
    pub fn with_auto_increase(mut self, auto_increase: bool) -> Self {
        self.auto_increase = auto_increase;
        self
    }

    /// Set whether stale output is removed on first use.
    pub fn with_auto_remove(mut self, auto_remove: bool) -> Self {
        self.auto_remove = auto_remove;
        self
    }

    /// Enable or disable the session.
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Wis3dError> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), Wis3dError> {
        if self.out_folder.as_os_str().is_empty() {
            return Err(Wis3dError::Configuration(
                "out_folder cannot be empty".to_string(),
            ));
        }
        if self.sequence_name.is_empty() {
            return Err(Wis3dError::Configuration(
                "sequence_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SessionConfig::new("out", "seq")
            .with_xyz_pattern(["x", "-y", "-z"])
            .with_auto_increase(false)
            .with_auto_remove(false)
            .with_enable(false);
        assert_eq!(config.xyz_pattern, ["x", "-y", "-z"]);
        assert!(!config.auto_increase);
        assert!(!config.auto_remove);
        assert!(!config.enable);
    }

    #[test]
    fn test_from_json_file() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("wis3d.json");
        std::fs::write(
            &path,
            r#"{"out_folder": "vis", "sequence_name": "run", "xyz_pattern": ["x", "-z", "y"], "enable": false}"#,
        )?;
        let config = SessionConfig::from_json_file(&path)?;
        assert_eq!(config.out_folder, PathBuf::from("vis"));
        assert_eq!(config.xyz_pattern, ["x", "-z", "y"]);
        assert!(config.auto_remove);
        assert!(!config.enable);
        Ok(())
    }

    #[test]
    fn test_missing_required_field() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("wis3d.json");
        std::fs::write(&path, r#"{"out_folder": "vis"}"#)?;
        assert!(matches!(
            SessionConfig::from_json_file(&path),
            Err(Wis3dError::Json(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(SessionConfig::new("out", "seq").validate().is_ok());
        assert!(matches!(
            SessionConfig::new("", "seq").validate(),
            Err(Wis3dError::Configuration(_))
        ));
        assert!(matches!(
            SessionConfig::new("out", "").validate(),
            Err(Wis3dError::Configuration(_))
        ));
    }
}
