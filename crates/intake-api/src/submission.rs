//! The export/submission boundary: everything that runs on a frozen
//! snapshot after the person presses "send".

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use intake_core::error::{CoreError, PreconditionError};
use intake_core::models::record::FormRecord;
use intake_core::models::submission::{SubmissionRow, SubmissionSummary};
use intake_core::snapshot::FormSnapshot;
use intake_export::dump::FormDump;
use intake_export::error::ExportError;
use intake_export::render::{
    NotificationSummary, notification_subject, render_html, render_notification,
};
use intake_export::styles::DocumentStyles;
use intake_export::{Artifact, ExportFormat};
use intake_notify::error::NotifyError;
use intake_notify::{Attachment, Email, ResendClient};
use intake_storage::error::StorageError;

use crate::middleware::audit::AuditEvent;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("record: {0}")]
    Record(#[from] CoreError),

    #[error("export: {0}")]
    Export(#[from] ExportError),

    #[error("notification: {0}")]
    Notify(#[from] NotifyError),

    #[error("task was cancelled")]
    Cancelled,

    #[error("task failed: {0}")]
    Task(String),
}

/// Where submission rows live.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Insert-only; an existing id is [`StorageError::AlreadyExists`].
    async fn insert(&self, row: &SubmissionRow) -> Result<(), StorageError>;
    async fn get(&self, id: Uuid) -> Result<SubmissionRow, StorageError>;
    async fn list(&self) -> Result<Vec<SubmissionSummary>, StorageError>;
}

/// Delivers the notification email. Returns the provider's message id.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> Result<String, NotifyError>;
}

pub struct S3FormRepository {
    pub client: aws_sdk_s3::Client,
    pub bucket: String,
}

#[async_trait]
impl FormRepository for S3FormRepository {
    async fn insert(&self, row: &SubmissionRow) -> Result<(), StorageError> {
        intake_storage::forms::insert_submission(&self.client, &self.bucket, row).await
    }

    async fn get(&self, id: Uuid) -> Result<SubmissionRow, StorageError> {
        intake_storage::forms::get_submission(&self.client, &self.bucket, id).await
    }

    async fn list(&self) -> Result<Vec<SubmissionSummary>, StorageError> {
        intake_storage::forms::list_submissions(&self.client, &self.bucket).await
    }
}

#[async_trait]
impl Notifier for ResendClient {
    async fn send(&self, email: &Email) -> Result<String, NotifyError> {
        ResendClient::send(self, email).await
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub notification_id: String,
    /// Out-of-range scale answers. They never block a submission.
    pub warnings: Vec<String>,
}

/// Check, store, render and notify, in that order.
///
/// A failed precondition has no side effects. Once the row is stored it
/// stays stored; a later notification failure is reported as an error and
/// can be retried against the stored row.
pub async fn submit(
    snapshot: FormSnapshot,
    forms: &dyn FormRepository,
    notifier: &dyn Notifier,
    styles: &DocumentStyles,
) -> Result<SubmissionReceipt, SubmitError> {
    snapshot.ensure_submittable()?;

    let warnings: Vec<String> = intake_instruments::validate_all(&snapshot)
        .into_iter()
        .map(|e| e.message)
        .collect();
    for warning in &warnings {
        warn!(warning = %warning, "submitted with out-of-range answer");
    }

    let row = SubmissionRow::from_snapshot(&snapshot)?;
    forms.insert(&row).await?;
    AuditEvent::new("submit", "form", row.id.to_string())
        .with_details(serde_json::json!({ "warnings": warnings.len() }))
        .emit();

    let notification_id = notify(&row, notifier, styles).await?;
    info!(form_id = %row.id, "submission complete");

    Ok(SubmissionReceipt {
        id: row.id,
        notification_id,
        warnings,
    })
}

/// Render a stored row and send it to the clinic.
pub async fn notify(
    row: &SubmissionRow,
    notifier: &dyn Notifier,
    styles: &DocumentStyles,
) -> Result<String, SubmitError> {
    let record = row.record()?;
    let email = build_email(&record, row.created_at, styles)?;
    let id = notifier.send(&email).await?;
    AuditEvent::new("notify", "form", row.id.to_string()).emit();
    Ok(id)
}

/// The notification email: summary plus full dump as HTML, PDF attached.
/// HTML and PDF come from the same dump.
pub fn build_email(
    record: &FormRecord,
    submitted_at: jiff::Timestamp,
    styles: &DocumentStyles,
) -> Result<Email, ExportError> {
    let dump = FormDump::from_record(record)?;
    let pdf = intake_export::pdf::generate_pdf(&dump, styles)?;
    let form_html = render_html(&dump, submitted_at)?;
    let summary = NotificationSummary::new(record, submitted_at);
    let full_name = &record.identification.full_name;

    Ok(Email {
        subject: notification_subject(full_name),
        html: render_notification(&summary, &form_html)?,
        attachments: vec![Attachment {
            filename: intake_export::file_name(full_name, ExportFormat::Pdf),
            bytes: pdf,
        }],
    })
}

/// Handle to an export or submission running in the background.
///
/// The task owns its snapshot, so edits made to the session meanwhile
/// cannot reach it.
pub struct BoundaryTask<T> {
    handle: JoinHandle<Result<T, SubmitError>>,
}

impl<T> BoundaryTask<T> {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<T, SubmitError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(SubmitError::Cancelled),
            Err(e) => Err(SubmitError::Task(e.to_string())),
        }
    }
}

pub fn spawn_submission(
    snapshot: FormSnapshot,
    forms: Arc<dyn FormRepository>,
    notifier: Arc<dyn Notifier>,
    styles: Arc<DocumentStyles>,
) -> BoundaryTask<SubmissionReceipt> {
    let handle = tokio::spawn(async move {
        submit(snapshot, forms.as_ref(), notifier.as_ref(), &styles).await
    });
    BoundaryTask { handle }
}

/// Render `snapshot` on the blocking pool. Export is held to the same
/// precondition as submission.
pub fn spawn_export(
    snapshot: FormSnapshot,
    format: ExportFormat,
    styles: Arc<DocumentStyles>,
) -> BoundaryTask<Artifact> {
    let handle = tokio::task::spawn_blocking(move || -> Result<Artifact, SubmitError> {
        snapshot.ensure_submittable()?;
        let artifact = intake_export::export(&snapshot, format, &styles)?;
        AuditEvent::new("export", "form", artifact.file_name.clone())
            .with_details(serde_json::json!({ "format": format }))
            .emit();
        Ok(artifact)
    });
    BoundaryTask { handle }
}
