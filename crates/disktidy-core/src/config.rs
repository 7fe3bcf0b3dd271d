/// Engine configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// {
///   "survey": { "max_depth": 5, "min_size": 1048576 },
///   "remediation": { "strategy": "best_effort" },
///   "whitelist": ["C:\\Users\\me\\AppData\\Local\\Temp\\keep"]
/// }
/// ```
use crate::catalog::Whitelist;
use crate::error::ConfigError;
use crate::remediate::RemediationConfig;
use crate::scanner::SurveyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub survey: SurveyConfig,
    pub remediation: RemediationConfig,
    /// Paths never deleted, matched case-insensitively.
    pub whitelist: Vec<PathBuf>,
}

impl EngineConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Build the protected-path table from `whitelist`.
    pub fn whitelist(&self) -> Whitelist {
        Whitelist::from_paths(&self.whitelist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remediate::Strategy;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("disktidy.json");
        fs::write(
            &file,
            r#"{ "survey": { "max_depth": 7 }, "remediation": { "strategy": "best_effort" }, "whitelist": ["/Keep/Me"] }"#,
        )
        .unwrap();

        let config = EngineConfig::load(&file).unwrap();
        assert_eq!(config.survey.max_depth, 7);
        assert!(!config.survey.show_hidden);
        assert_eq!(config.remediation.strategy, Strategy::BestEffort);
        assert_eq!(config.remediation.max_retries, 3);
        assert!(config.whitelist().is_protected(Path::new("/keep/me")));
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = EngineConfig::load(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
