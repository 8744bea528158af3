use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::select::TepDirectory;
use crate::data::tep::DEFAULT_LAGGED_SAMPLES;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not parse environment variable: {key}\n\tGot: {value}\n\tMessage: {message}")]
    Invalid {
        key: String,
        value: String,
        message: String,
    },
    #[error("Could not read config file {path}: {message}")]
    File { path: PathBuf, message: String },
}

/// A single configuration value read from the environment.
pub trait Var {
    const NAME: &'static str;
    type Type;

    /// `Ok(None)` when the variable is not set.
    fn from_env() -> Result<Option<Self::Type>, ConfigError>;
}

pub struct DataDir;
pub struct LaggedSamples;
pub struct CheckData;
pub struct ExportDir;

fn read(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Var for DataDir {
    const NAME: &'static str = "TEP_DATA_DIR";
    type Type = PathBuf;

    fn from_env() -> Result<Option<PathBuf>, ConfigError> {
        Ok(read(Self::NAME).map(PathBuf::from))
    }
}

impl Var for LaggedSamples {
    const NAME: &'static str = "TEP_LAGGED_SAMPLES";
    type Type = usize;

    fn from_env() -> Result<Option<usize>, ConfigError> {
        read(Self::NAME)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|err| ConfigError::Invalid {
                    key: Self::NAME.to_string(),
                    message: err.to_string(),
                    value,
                })
            })
            .transpose()
    }
}

impl Var for CheckData {
    const NAME: &'static str = "TEP_CHECK_DATA";
    type Type = bool;

    fn from_env() -> Result<Option<bool>, ConfigError> {
        read(Self::NAME)
            .map(|value| match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "y" => Ok(true),
                "0" | "false" | "no" | "n" => Ok(false),
                _ => Err(ConfigError::Invalid {
                    key: Self::NAME.to_string(),
                    value,
                    message: "expected true or false".to_string(),
                }),
            })
            .transpose()
    }
}

impl Var for ExportDir {
    const NAME: &'static str = "TEP_EXPORT_DIR";
    type Type = PathBuf;

    fn from_env() -> Result<Option<PathBuf>, ConfigError> {
        Ok(read(Self::NAME).map(PathBuf::from))
    }
}

/// Where the data lives and how the canonical sets are assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TepConfig {
    /// Folder holding `d00.dat` … `d21_te.dat`.
    pub data_dir: PathBuf,
    pub lagged_samples: usize,
    /// Scan for missing files before importing.
    pub check_data_exists: bool,
    /// Where the assembled matrices are written, if anywhere.
    pub export_dir: Option<PathBuf>,
}

impl Default for TepConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./TE_process"),
            lagged_samples: DEFAULT_LAGGED_SAMPLES,
            check_data_exists: true,
            export_dir: None,
        }
    }
}

impl TepConfig {
    /// Defaults overridden by whichever `TEP_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Some(dir) = DataDir::from_env()? {
            self.data_dir = dir;
        }
        if let Some(lag) = LaggedSamples::from_env()? {
            self.lagged_samples = lag;
        }
        if let Some(check) = CheckData::from_env()? {
            self.check_data_exists = check;
        }
        if let Some(dir) = ExportDir::from_env()? {
            self.export_dir = Some(dir);
        }
        Ok(self)
    }

    /// Read a JSON config file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file_err = |message: String| ConfigError::File {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| file_err(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| file_err(e.to_string()))
    }

    /// Open the configured data folder.
    pub fn directory(&self) -> crate::Result<TepDirectory> {
        TepDirectory::open(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TepConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./TE_process"));
        assert_eq!(config.lagged_samples, 2);
        assert!(config.check_data_exists);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn json_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tep.json");
        std::fs::write(&path, r#"{ "data_dir": "/data/tep", "lagged_samples": 5 }"#).unwrap();
        let config = TepConfig::from_json_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/tep"));
        assert_eq!(config.lagged_samples, 5);
        assert!(config.check_data_exists);
    }

    #[test]
    fn json_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ lagged_samples: }").unwrap();
        match TepConfig::from_json_file(&path).unwrap_err() {
            ConfigError::File { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let config = TepConfig {
            data_dir: dir.path().join("missing"),
            ..TepConfig::default()
        };
        assert!(matches!(
            config.directory(),
            Err(crate::TepError::InvalidDirectory { .. })
        ));
    }

    // Only this test touches TEP_* variables; the steps share one function so
    // they never race each other.
    #[test]
    fn environment_overrides() {
        let keys = [
            DataDir::NAME,
            LaggedSamples::NAME,
            CheckData::NAME,
            ExportDir::NAME,
        ];
        for key in keys {
            std::env::remove_var(key);
        }
        assert_eq!(TepConfig::from_env().unwrap(), TepConfig::default());

        std::env::set_var(LaggedSamples::NAME, " 5 ");
        std::env::set_var(CheckData::NAME, "no");
        std::env::set_var(DataDir::NAME, "/srv/tep");
        std::env::set_var(ExportDir::NAME, "");
        let config = TepConfig::from_env().unwrap();
        assert_eq!(config.lagged_samples, 5);
        assert!(!config.check_data_exists);
        assert_eq!(config.data_dir, PathBuf::from("/srv/tep"));
        // blank counts as unset
        assert!(config.export_dir.is_none());

        std::env::set_var(LaggedSamples::NAME, "two");
        match TepConfig::from_env().unwrap_err() {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, "TEP_LAGGED_SAMPLES");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error {other}"),
        }

        std::env::set_var(LaggedSamples::NAME, "-1");
        assert!(matches!(
            TepConfig::from_env(),
            Err(ConfigError::Invalid { .. })
        ));
        std::env::remove_var(LaggedSamples::NAME);

        std::env::set_var(CheckData::NAME, "maybe");
        match TepConfig::from_env().unwrap_err() {
            ConfigError::Invalid { key, .. } => assert_eq!(key, "TEP_CHECK_DATA"),
            other => panic!("unexpected error {other}"),
        }

        for key in keys {
            std::env::remove_var(key);
        }
    }
}
