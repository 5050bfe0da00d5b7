use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::NotifyError;

pub const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";
pub const DEFAULT_FROM: &str = "Formulário Médico <onboarding@resend.dev>";
pub const DEFAULT_TO: &str = "fazevedopneumosono@gmail.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Unset keys fail every send with [`NotifyError::MissingApiKey`].
    pub api_key: Option<String>,
    pub endpoint: String,
    pub from: String,
    pub to: String,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Email {
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

/// Wire body of `POST /emails`.
#[derive(Debug, Serialize)]
pub struct EmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRequest>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentRequest {
    pub filename: String,
    /// Base64 of the file bytes.
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct EmailResponse {
    id: String,
}

#[derive(Clone)]
pub struct ResendClient {
    config: ResendConfig,
    agent: ureq::Agent,
}

impl ResendClient {
    pub fn new(config: ResendConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &ResendConfig {
        &self.config
    }

    pub fn request_body(&self, email: &Email) -> EmailRequest {
        EmailRequest {
            from: self.config.from.clone(),
            to: vec![self.config.to.clone()],
            subject: email.subject.clone(),
            html: email.html.clone(),
            attachments: email
                .attachments
                .iter()
                .map(|a| AttachmentRequest {
                    filename: a.filename.clone(),
                    content: STANDARD.encode(&a.bytes),
                })
                .collect(),
        }
    }

    /// Send `email` to the configured recipient. Returns the provider's
    /// message id.
    pub async fn send(&self, email: &Email) -> Result<String, NotifyError> {
        let api_key = self
            .config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(NotifyError::MissingApiKey)?;
        let body = self.request_body(email);
        let agent = self.agent.clone();
        let endpoint = self.config.endpoint.clone();

        // ureq is blocking; keep it off the async workers.
        let id = tokio::task::spawn_blocking(move || post_email(&agent, &endpoint, &api_key, &body))
            .await
            .map_err(|e| NotifyError::Join(e.to_string()))??;

        info!(email_id = %id, subject = %email.subject, "notification sent");
        Ok(id)
    }
}

fn post_email(
    agent: &ureq::Agent,
    endpoint: &str,
    api_key: &str,
    body: &EmailRequest,
) -> Result<String, NotifyError> {
    let mut resp = agent
        .post(endpoint)
        .header("Authorization", format!("Bearer {api_key}"))
        .send_json(body)?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.body_mut().read_to_string().unwrap_or_default();
        warn!(status = status.as_u16(), body = %text, "Resend API error");
        return Err(NotifyError::Rejected {
            status: status.as_u16(),
            body: text,
        });
    }

    let parsed: EmailResponse = resp
        .body_mut()
        .read_json()
        .map_err(|e| NotifyError::Decode(e.to_string()))?;
    Ok(parsed.id)
}
