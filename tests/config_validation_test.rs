//! Configuration validation tests
//!
//! Tests that verify defaults and the checks done by `PureFaConfig::init`.

use purefa_exporter::config::{
    MetricsConfig, PureFaConfig, ServerConfig, DEFAULT_REQUEST_TIMEOUT, SAMPLE_CONFIG,
};
use purefa_exporter::error::ExporterError;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

fn purefa_config(array: &str, token: &str) -> PureFaConfig {
    PureFaConfig {
        array: array.to_string(),
        api_token: Some(SecretString::from(token)),
        ..PureFaConfig::default()
    }
}

#[test]
fn test_empty_token_is_rejected() {
    // Given: A config with an empty token
    let config = purefa_config("purefa1.example.com", "");

    // When: Initialising
    let result = config.init();

    // Then: ConfigError
    assert!(matches!(result, Err(ExporterError::Config(_))));
}

#[test]
fn test_whitespace_token_is_rejected() {
    let result = purefa_config("purefa1.example.com", "   ").init();
    assert!(matches!(result, Err(ExporterError::Config(_))));
}

#[test]
fn test_missing_token_is_rejected() {
    let config = PureFaConfig {
        array: "purefa1.example.com".to_string(),
        ..PureFaConfig::default()
    };
    assert!(matches!(config.init(), Err(ExporterError::Config(_))));
}

#[test]
fn test_token_with_newline_is_rejected() {
    let result = purefa_config("purefa1.example.com", "abc\ndef").init();
    assert!(matches!(result, Err(ExporterError::Config(_))));
}

#[test]
fn test_base_url_derived_from_array() {
    // Given: A config without base_url
    let config = purefa_config("purefa1.example.com", "token");

    // When: Initialising
    let array = config.init().expect("Config should be valid");

    // Then: base_url points at the v1.15 API of the array
    assert_eq!(array.base_url.as_str(), "https://purefa1.example.com/api/1.15");
    assert_eq!(array.array, "purefa1.example.com");
}

#[test]
fn test_empty_base_url_is_derived() {
    let mut config = purefa_config("10.0.0.5", "token");
    config.base_url = Some(String::new());
    let array = config.init().unwrap();
    assert_eq!(array.base_url.as_str(), "https://10.0.0.5/api/1.15");
}

#[test]
fn test_explicit_base_url_is_kept() {
    let mut config = purefa_config("ignored.example.com", "token");
    config.base_url = Some("https://array.lab:8443/api/1.15/".to_string());
    let array = config.init().unwrap();
    assert_eq!(array.base_url.as_str(), "https://array.lab:8443/api/1.15");
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let mut config = purefa_config("", "token");
    config.base_url = Some("not a url".to_string());
    assert!(matches!(config.init(), Err(ExporterError::Config(_))));

    let mut config = purefa_config("", "token");
    config.base_url = Some("ftp://array/api/1.15".to_string());
    assert!(matches!(config.init(), Err(ExporterError::Config(_))));
}

#[test]
fn test_missing_array_and_base_url_is_rejected() {
    let result = purefa_config("", "token").init();
    assert!(matches!(result, Err(ExporterError::Config(_))));
}

#[test]
fn test_timeout_defaults_to_four_seconds() {
    let array = purefa_config("purefa1", "token").init().unwrap();
    assert_eq!(array.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(array.request_timeout, Duration::from_secs(4));
}

#[test]
fn test_explicit_timeout_is_kept() {
    let mut config = purefa_config("purefa1", "token");
    config.http_timeout_seconds = 10;
    let array = config.init().unwrap();
    assert_eq!(array.request_timeout, Duration::from_secs(10));
}

#[test]
fn test_token_is_trimmed() {
    let array = purefa_config("purefa1", "  abc  ").init().unwrap();
    assert_eq!(array.api_token.expose_secret(), "abc");
}

#[test]
fn test_flags_are_carried_over() {
    let mut config = purefa_config("purefa1", "token");
    config.verify_ssl = false;
    config.ignore_veeamsnap = true;
    let array = config.init().unwrap();
    assert!(!array.verify_ssl);
    assert!(array.ignore_veeamsnap);
}

#[test]
fn test_section_defaults() {
    let server = ServerConfig::default();
    let metrics = MetricsConfig::default();
    let purefa = PureFaConfig::default();

    assert_eq!(server.addr, "0.0.0.0");
    assert_eq!(server.port, 9491);
    assert_eq!(metrics.scrape_interval_seconds, 60);
    assert!(metrics.collect_performance_metrics);
    assert!(purefa.verify_ssl);
    assert!(!purefa.ignore_veeamsnap);
    assert_eq!(purefa.http_timeout_seconds, 0);
}

#[test]
fn test_sample_config_mentions_every_option() {
    for key in [
        "array",
        "api_token",
        "base_url",
        "http_timeout_seconds",
        "verify_ssl",
        "ignore_veeamsnap",
        "scrape_interval_seconds",
        "collect_performance_metrics",
    ] {
        assert!(SAMPLE_CONFIG.contains(key), "sample config lacks {}", key);
    }
}
