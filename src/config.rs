use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Tunables for the extraction pipeline.
///
/// Every extractor takes what it needs explicitly; there is no ambient
/// configuration state. Callers that don't care use [`ExtractOptions::default`].
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractOptions {
    /// Descriptions longer than this are truncated with a trailing `...`.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
    /// Slugified column-name fallbacks are truncated to this length.
    #[serde(default = "default_max_alias_len")]
    pub max_alias_len: usize,
    /// Chart type assumed by regex salvage when none can be recovered.
    #[serde(default = "default_fallback_chart_type")]
    pub fallback_chart_type: String,
}

fn default_max_description_len() -> usize {
    500
}

fn default_max_alias_len() -> usize {
    50
}

fn default_fallback_chart_type() -> String {
    "bar".to_string()
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_description_len: default_max_description_len(),
            max_alias_len: default_max_alias_len(),
            fallback_chart_type: default_fallback_chart_type(),
        }
    }
}

impl ExtractOptions {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut options = match path {
            Some(p) => {
                let contents = std::fs::read_to_string(p)
                    .map_err(|e| Error::InvalidInput(format!("Cannot read config file: {}", e)))?;
                toml::from_str(&contents)
                    .map_err(|e| Error::InvalidInput(format!("Invalid config file: {}", e)))?
            }
            None => ExtractOptions::default(),
        };

        if let Ok(val) = std::env::var("ANALYST_EXTRACT_MAX_DESCRIPTION_LEN") {
            match val.parse() {
                Ok(n) => options.max_description_len = n,
                Err(_) => warn!("Ignoring non-numeric ANALYST_EXTRACT_MAX_DESCRIPTION_LEN: {}", val),
            }
        }
        if let Ok(val) = std::env::var("ANALYST_EXTRACT_MAX_ALIAS_LEN") {
            match val.parse() {
                Ok(n) => options.max_alias_len = n,
                Err(_) => warn!("Ignoring non-numeric ANALYST_EXTRACT_MAX_ALIAS_LEN: {}", val),
            }
        }
        if let Ok(val) = std::env::var("ANALYST_EXTRACT_FALLBACK_CHART_TYPE") {
            options.fallback_chart_type = val;
        }

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_description_len == 0 {
            return Err(Error::InvalidInput(
                "max_description_len must be non-zero".into(),
            ));
        }
        if self.max_alias_len == 0 {
            return Err(Error::InvalidInput("max_alias_len must be non-zero".into()));
        }
        if !crate::charts::CHART_TYPES.contains(&self.fallback_chart_type.as_str()) {
            warn!(
                "fallback_chart_type {:?} is not a supported chart type; salvage output will fail validation",
                self.fallback_chart_type
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_options_default() {
        let options = ExtractOptions::default();
        assert_eq!(options.max_description_len, 500);
        assert_eq!(options.max_alias_len, 50);
        assert_eq!(options.fallback_chart_type, "bar");
    }

    #[test]
    fn test_options_load_none_uses_defaults() {
        let options = ExtractOptions::load(None).unwrap();
        assert_eq!(options.max_description_len, 500);
        assert_eq!(options.max_alias_len, 50);
    }

    #[test]
    fn test_options_load_valid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
max_description_len = 200
max_alias_len = 30
fallback_chart_type = "line"
"#
        )
        .unwrap();

        let options = ExtractOptions::load(Some(file.path())).unwrap();
        assert_eq!(options.max_description_len, 200);
        assert_eq!(options.max_alias_len, 30);
        assert_eq!(options.fallback_chart_type, "line");
    }

    #[test]
    fn test_options_load_partial_toml_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_alias_len = 10").unwrap();

        let options = ExtractOptions::load(Some(file.path())).unwrap();
        assert_eq!(options.max_alias_len, 10);
        assert_eq!(options.max_description_len, 500);
    }

    #[test]
    fn test_options_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        assert!(ExtractOptions::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_options_load_missing_file() {
        let result = ExtractOptions::load(Some(Path::new("/nonexistent/options.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_var_override_description_len() {
        env::set_var("ANALYST_EXTRACT_MAX_DESCRIPTION_LEN", "123");
        let options = ExtractOptions::load(None).unwrap();
        env::remove_var("ANALYST_EXTRACT_MAX_DESCRIPTION_LEN");

        assert_eq!(options.max_description_len, 123);
    }

    #[test]
    fn test_env_var_override_fallback_chart_type() {
        env::set_var("ANALYST_EXTRACT_FALLBACK_CHART_TYPE", "pie");
        let options = ExtractOptions::load(None).unwrap();
        env::remove_var("ANALYST_EXTRACT_FALLBACK_CHART_TYPE");

        assert_eq!(options.fallback_chart_type, "pie");
    }

    #[test]
    fn test_validate_zero_description_len_rejected() {
        let options = ExtractOptions {
            max_description_len: 0,
            ..ExtractOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_zero_alias_len_rejected() {
        let options = ExtractOptions {
            max_alias_len: 0,
            ..ExtractOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_chart_type_warns_but_passes() {
        let options = ExtractOptions {
            fallback_chart_type: "sparkline".to_string(),
            ..ExtractOptions::default()
        };
        assert!(options.validate().is_ok());
    }
}
