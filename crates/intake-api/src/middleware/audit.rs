use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use tracing::info;

/// Logs every request as an `api_request` event, tagged with the session
/// or stored form it touches.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    match resource_of(&path) {
        Some((resource_type, resource_id)) => info!(
            method = %method,
            path = %path,
            status,
            resource_type,
            resource_id,
            "api_request"
        ),
        None => info!(method = %method, path = %path, status, "api_request"),
    }

    response
}

/// The session or stored form a request path addresses, as
/// `(resource_type, id)`. Collection routes and `/forms/export` address
/// neither.
pub fn resource_of(path: &str) -> Option<(&'static str, &str)> {
    let mut segments = path.trim_start_matches('/').split('/');
    let resource_type = match segments.next()? {
        "sessions" => "session",
        "forms" => "form",
        _ => return None,
    };
    let id = segments.next().filter(|s| uuid::Uuid::try_parse(s).is_ok())?;
    Some((resource_type, id))
}

/// An application-level audit event for actions on patient data.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            audit.action = %self.action,
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.details = %details,
            "audit event"
        );
    }
}
