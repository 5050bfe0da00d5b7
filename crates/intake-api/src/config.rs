use intake_notify::ResendConfig;
use intake_notify::resend::{DEFAULT_ENDPOINT, DEFAULT_FROM, DEFAULT_TO};

pub const DEFAULT_BUCKET: &str = "intake-forms";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bucket: String,
    pub listen_addr: String,
    /// Running under the Lambda runtime rather than a local listener.
    pub lambda: bool,
    pub resend: ResendConfig,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            bucket: get("INTAKE_BUCKET", DEFAULT_BUCKET),
            listen_addr: get("INTAKE_LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            lambda: lookup("AWS_LAMBDA_RUNTIME_API").is_some(),
            resend: ResendConfig {
                api_key: lookup("RESEND_API_KEY").filter(|v| !v.trim().is_empty()),
                endpoint: get("RESEND_ENDPOINT", DEFAULT_ENDPOINT),
                from: get("NOTIFY_FROM", DEFAULT_FROM),
                to: get("NOTIFY_TO", DEFAULT_TO),
            },
        }
    }
}
