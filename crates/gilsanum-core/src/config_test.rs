use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GILSANUM_API_BASE_URL", "http://localhost:8080/api");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GILSANUM_ENV"));
}

#[test]
fn build_app_config_fails_without_api_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GILSANUM_API_BASE_URL"),
        "expected MissingEnvVar(GILSANUM_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = full_env();
    map.insert("GILSANUM_API_BASE_URL", "ftp://files.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GILSANUM_API_BASE_URL"),
        "expected InvalidEnvVar(GILSANUM_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:8080/api");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "gilsanum/0.1 (dashboard)");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.cache_ttl_secs, 60);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("GILSANUM_ENV", "production");
    map.insert("GILSANUM_LOG_LEVEL", "debug");
    map.insert("GILSANUM_REQUEST_TIMEOUT_SECS", "5");
    map.insert("GILSANUM_USER_AGENT", "custom-agent/2.0");
    map.insert("GILSANUM_MAX_RETRIES", "0");
    map.insert("GILSANUM_RETRY_BACKOFF_BASE_MS", "50");
    map.insert("GILSANUM_CACHE_TTL_SECS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 50);
    assert_eq!(cfg.cache_ttl_secs, 0);
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = full_env();
    map.insert("GILSANUM_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GILSANUM_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GILSANUM_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_retries_invalid() {
    let mut map = full_env();
    map.insert("GILSANUM_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GILSANUM_MAX_RETRIES"),
        "expected InvalidEnvVar(GILSANUM_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_cache_ttl_invalid() {
    let mut map = full_env();
    map.insert("GILSANUM_CACHE_TTL_SECS", "one minute");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GILSANUM_CACHE_TTL_SECS"),
        "expected InvalidEnvVar(GILSANUM_CACHE_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_lists_fields() {
    let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(rendered.starts_with("AppConfig"));
    assert!(rendered.contains("cache_ttl_secs: 60"));
}
