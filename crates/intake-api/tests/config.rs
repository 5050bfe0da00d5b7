use std::collections::HashMap;

use intake_api::config::{ApiConfig, DEFAULT_BUCKET, DEFAULT_LISTEN_ADDR};
use intake_notify::resend::{DEFAULT_ENDPOINT, DEFAULT_TO};

fn config(vars: &[(&str, &str)]) -> ApiConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ApiConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = config(&[]);
    assert_eq!(config.bucket, DEFAULT_BUCKET);
    assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
    assert!(!config.lambda);
    assert!(config.resend.api_key.is_none());
    assert_eq!(config.resend.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.resend.to, DEFAULT_TO);
}

#[test]
fn environment_overrides_defaults() {
    let config = config(&[
        ("INTAKE_BUCKET", "clinic-forms"),
        ("INTAKE_LISTEN_ADDR", "127.0.0.1:8080"),
        ("RESEND_API_KEY", "re_123"),
        ("NOTIFY_TO", "recepcao@example.com"),
    ]);
    assert_eq!(config.bucket, "clinic-forms");
    assert_eq!(config.listen_addr, "127.0.0.1:8080");
    assert_eq!(config.resend.api_key.as_deref(), Some("re_123"));
    assert_eq!(config.resend.to, "recepcao@example.com");
}

#[test]
fn blank_values_count_as_unset() {
    let config = config(&[("INTAKE_BUCKET", "  "), ("RESEND_API_KEY", "")]);
    assert_eq!(config.bucket, DEFAULT_BUCKET);
    assert!(config.resend.api_key.is_none());
}

#[test]
fn lambda_runtime_is_detected() {
    let config = config(&[("AWS_LAMBDA_RUNTIME_API", "127.0.0.1:9001")]);
    assert!(config.lambda);
}
