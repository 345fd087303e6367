use crate::config::toml_config::{TomlConfig, DEFAULT_WHOXY_URL};
use crate::core::client::{DEFAULT_PAGE_CONFIRM_THRESHOLD, DEFAULT_TIMEOUT};
use crate::core::registrars::RegistrarList;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

/// Effective configuration: config file values with command line overrides
/// applied on top.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub page_confirm_threshold: u32,
    pub registrars_file: Option<String>,
    pub output_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_WHOXY_URL.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            page_confirm_threshold: DEFAULT_PAGE_CONFIRM_THRESHOLD,
            registrars_file: None,
            output_path: ".".to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            api_url: non_empty(config.whoxy.url.clone()).unwrap_or(defaults.api_url),
            api_key: non_empty(config.whoxy.api_key.clone()),
            timeout_seconds: config
                .whoxy
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            page_confirm_threshold: config
                .discovery
                .page_confirm_threshold
                .unwrap_or(defaults.page_confirm_threshold),
            registrars_file: non_empty(config.discovery.registrars_file.clone()),
            output_path: non_empty(config.output.path.clone()).unwrap_or(defaults.output_path),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = non_empty(api_key) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn with_output_path(mut self, path: Option<String>) -> Self {
        if let Some(path) = non_empty(path) {
            self.output_path = path;
        }
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        if let Some(timeout) = timeout_seconds {
            self.timeout_seconds = timeout;
        }
        self
    }

    pub fn with_registrars_file(mut self, path: Option<String>) -> Self {
        if let Some(path) = non_empty(path) {
            self.registrars_file = Some(path);
        }
        self
    }

    /// The configured registrar list, else a refreshed download, else the
    /// bundled one.
    pub fn registrars(&self) -> Result<RegistrarList> {
        RegistrarList::select(
            self.registrars_file.as_deref(),
            RegistrarList::refreshed_path().as_deref(),
        )
    }
}

impl ConfigProvider for Settings {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn page_confirm_threshold(&self) -> u32 {
        self.page_confirm_threshold
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("whoxy.url", &self.api_url)?;

        let api_key = validation::validate_required_field("whoxy.api_key", &self.api_key)?;
        validation::validate_non_empty_string("whoxy.api_key", api_key)?;

        validation::validate_positive_number("whoxy.timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_positive_number(
            "discovery.page_confirm_threshold",
            u64::from(self.page_confirm_threshold),
            1,
        )?;
        validation::validate_path("output.path", &self.output_path)?;

        if let Some(path) = &self.registrars_file {
            validation::validate_path("discovery.registrars_file", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PivotError;

    #[test]
    fn test_command_line_overrides_file() {
        let config = TomlConfig::from_toml_str(
            r#"
[whoxy]
api_key = "from-file"
timeout_seconds = 10

[output]
path = "./file-out"
"#,
        )
        .unwrap();

        let settings = Settings::from_toml(&config)
            .with_api_key(Some("from-cli".to_string()))
            .with_output_path(None)
            .with_timeout(Some(5));

        assert_eq!(settings.api_key(), "from-cli");
        assert_eq!(settings.output_path(), "./file-out");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.api_url(), DEFAULT_WHOXY_URL);
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let settings = Settings::from_toml(&TomlConfig::default());

        let err = settings.validate().unwrap_err();

        assert!(matches!(err, PivotError::MissingConfigError { ref field } if field == "whoxy.api_key"));
    }

    #[test]
    fn test_blank_cli_key_does_not_clear_file_key() {
        let mut config = TomlConfig::default();
        config.whoxy.api_key = Some("from-file".to_string());

        let settings = Settings::from_toml(&config).with_api_key(Some("  ".to_string()));

        assert_eq!(settings.api_key(), "from-file");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_is_invalid() {
        let settings = Settings {
            api_key: Some("k".to_string()),
            page_confirm_threshold: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bundled_registrars_by_default() {
        let settings = Settings::default();
        assert!(!settings.registrars().unwrap().is_empty());
    }
}
