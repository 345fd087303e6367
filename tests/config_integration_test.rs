use std::io::Write;
use tempfile::NamedTempFile;
use whois_pivot::core::ConfigProvider;
use whois_pivot::utils::validation::Validate;
use whois_pivot::{Settings, TomlConfig};

#[test]
fn test_config_file_to_settings() {
    std::env::set_var("WHOIS_PIVOT_TEST_KEY", "k-123");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[whoxy]
api_key = "${{WHOIS_PIVOT_TEST_KEY}}"
timeout_seconds = 10

[discovery]
page_confirm_threshold = 3

[output]
path = "results"
"#
    )
    .unwrap();

    let config = TomlConfig::from_file(file.path()).unwrap();
    let settings = Settings::from_toml(&config);

    assert!(settings.validate().is_ok());
    assert_eq!(settings.api_key(), "k-123");
    assert_eq!(settings.api_url(), "https://api.whoxy.com/");
    assert_eq!(settings.request_timeout().as_secs(), 10);
    assert_eq!(settings.page_confirm_threshold(), 3);
    assert_eq!(settings.output_path(), "results");
}

#[test]
fn test_first_run_writes_example_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("whois-pivot.toml");

    let config = TomlConfig::load_or_init(&path).unwrap();

    assert!(path.exists());
    assert!(config.whoxy.api_key.unwrap_or_default().is_empty());
    let reloaded = Settings::from_toml(&TomlConfig::from_file(&path).unwrap());
    assert_eq!(reloaded.page_confirm_threshold, 5);
    assert!(reloaded.validate().is_err());
}
