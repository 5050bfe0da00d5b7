//! Submitted forms, one JSON object per submission under `forms/`.

use aws_sdk_s3::Client;
use tracing::{info, warn};
use uuid::Uuid;

use intake_core::models::submission::{SubmissionRow, SubmissionSummary};
use intake_core::object_keys;

use crate::error::StorageError;
use crate::objects;

/// Store a new submission. Insert-only: an existing row with the same id
/// is never overwritten.
pub async fn insert_submission(
    client: &Client,
    bucket: &str,
    row: &SubmissionRow,
) -> Result<(), StorageError> {
    let key = object_keys::form(row.id);
    let body = serde_json::to_vec_pretty(row)?;
    objects::put_object_if_absent(client, bucket, &key, body, Some("application/json")).await?;
    info!(form_id = %row.id, "submission stored");
    Ok(())
}

pub async fn get_submission(
    client: &Client,
    bucket: &str,
    id: Uuid,
) -> Result<SubmissionRow, StorageError> {
    let body = objects::get_object(client, bucket, &object_keys::form(id)).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Summaries of every stored submission, newest first. Objects that fail
/// to load are skipped with a warning.
pub async fn list_submissions(
    client: &Client,
    bucket: &str,
) -> Result<Vec<SubmissionSummary>, StorageError> {
    let keys = objects::list_objects(client, bucket, object_keys::FORMS_PREFIX).await?;

    let mut summaries = Vec::new();
    for id in keys.iter().filter_map(|key| object_keys::form_id(key)) {
        match get_submission(client, bucket, id).await {
            Ok(row) => summaries.push(row.summary()),
            Err(e) => warn!(form_id = %id, error = %e, "skipping unreadable submission"),
        }
    }
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(summaries)
}
