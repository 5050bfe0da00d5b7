//! Whole-record operations and the stored submissions.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;

use intake_core::models::record::FormRecord;
use intake_core::models::submission::{SubmissionRow, SubmissionSummary};
use intake_core::snapshot::FormSnapshot;

use crate::error::ApiError;
use crate::routes::sessions::ExportQuery;
use crate::state::AppState;
use crate::submission::{self, SubmissionReceipt};

/// Export a record supplied in full by the caller. Cached totals are used
/// as sent.
pub async fn export_record(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
    Json(record): Json<FormRecord>,
) -> Result<Response, ApiError> {
    let artifact =
        submission::spawn_export(FormSnapshot::new(record), query.format, state.styles.clone())
            .join()
            .await?;
    Ok(super::download(artifact))
}

pub async fn submit_record(
    State(state): State<AppState>,
    Json(record): Json<FormRecord>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), ApiError> {
    let receipt = submission::spawn_submission(
        FormSnapshot::new(record),
        state.forms.clone(),
        state.notifier.clone(),
        state.styles.clone(),
    )
    .join()
    .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn list_forms(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionSummary>>, ApiError> {
    Ok(Json(state.forms.list().await?))
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionRow>, ApiError> {
    Ok(Json(state.forms.get(id).await?))
}

#[derive(Serialize)]
pub struct NotificationSent {
    pub id: Uuid,
    pub notification_id: String,
}

/// Re-send the notification for a stored submission.
pub async fn notify_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationSent>, ApiError> {
    let row = state.forms.get(id).await?;
    let notification_id =
        submission::notify(&row, state.notifier.as_ref(), &state.styles).await?;
    Ok(Json(NotificationSent {
        id,
        notification_id,
    }))
}
