use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("RESEND_API_KEY não configurado")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Erro ao enviar email: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("notification task failed: {0}")]
    Join(String),
}

impl From<ureq::Error> for NotifyError {
    fn from(e: ureq::Error) -> Self {
        NotifyError::Http(e.to_string())
    }
}
