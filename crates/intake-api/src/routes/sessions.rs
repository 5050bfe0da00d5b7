//! One open form per session, edited field by field the way the page does.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use intake_core::calculators;
use intake_core::error::CoreError;
use intake_core::models::record::{FormRecord, SlotField};
use intake_core::snapshot::FormSnapshot;
use intake_core::store::FormStore;
use intake_export::ExportFormat;
use intake_instruments::instruments::epworth;

use crate::error::ApiError;
use crate::state::AppState;
use crate::submission::{self, SubmissionReceipt};

#[derive(Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub record: FormRecord,
}

#[derive(Deserialize)]
pub struct SlotUpdate {
    pub value: String,
}

#[derive(Deserialize, Default)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

async fn with_session<T>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut FormStore) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let store = sessions
        .get_mut(id, Timestamp::now())
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))?;
    f(store)
}

async fn snapshot(state: &AppState, id: Uuid) -> Result<FormSnapshot, ApiError> {
    with_session(state, id, |store| Ok(store.snapshot())).await
}

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let id = Uuid::new_v4();
    let store = FormStore::open();
    let record = store.record().clone();
    let now = Timestamp::now();
    let mut sessions = state.sessions.lock().await;
    let expired = sessions.sweep(now);
    if expired > 0 {
        info!(expired, "idle sessions dropped");
    }
    sessions.insert(id, store, now);
    info!(session_id = %id, open = sessions.len(), "session opened");
    (StatusCode::CREATED, Json(SessionView { id, record }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let record = with_session(&state, id, |store| Ok(store.record().clone())).await?;
    Ok(Json(SessionView { id, record }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .lock()
        .await
        .remove(id)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))?;
    info!(session_id = %id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Replace one field, then refresh whatever is computed from it.
pub async fn set_field(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
    Json(value): Json<Value>,
) -> Result<Json<SessionView>, ApiError> {
    let record = with_session(&state, id, |store| {
        store.set_field(&name, value)?;
        store.refresh_derived(&name);
        Ok(store.record().clone())
    })
    .await?;
    Ok(Json(SessionView { id, record }))
}

pub async fn set_slot(
    State(state): State<AppState>,
    Path((id, name, index)): Path<(Uuid, String, usize)>,
    Json(update): Json<SlotUpdate>,
) -> Result<Json<SessionView>, ApiError> {
    let slot = SlotField::from_name(&name).ok_or_else(|| CoreError::NotASlotField(name.clone()))?;
    let record = with_session(&state, id, |store| {
        store.update_array_element(slot, index, update.value)?;
        Ok(store.record().clone())
    })
    .await?;
    Ok(Json(SessionView { id, record }))
}

#[derive(Debug, Serialize)]
pub struct DerivedValues {
    pub age: Option<i32>,
    /// Why the age could not be computed, when it could not.
    pub age_error: Option<String>,
    pub epworth_total: i32,
    pub epworth_band: &'static str,
    pub pack_years: Option<i32>,
}

/// Current calculator outputs. Reads only; the cached fields in the record
/// are left as they are.
pub async fn get_derived(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DerivedValues>, ApiError> {
    let derived = with_session(&state, id, |store| {
        let record = store.record();
        let (age, age_error) = match store.compute_age() {
            Ok(age) => (Some(age), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let epworth_total = calculators::sleepiness_total(&record.epworth.items());
        let pack_years = calculators::pack_years(
            record.smoking.smoking_start_age,
            record.smoking_end_age(),
            record.smoking.cigarettes_per_day,
        );
        Ok(DerivedValues {
            age,
            age_error,
            epworth_total,
            epworth_band: epworth::classify(epworth_total).label(),
            pack_years,
        })
    })
    .await?;
    Ok(Json(derived))
}

pub async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let snapshot = snapshot(&state, id).await?;
    let artifact = submission::spawn_export(snapshot, query.format, state.styles.clone())
        .join()
        .await?;
    Ok(super::download(artifact))
}

pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), ApiError> {
    let snapshot = snapshot(&state, id).await?;
    let receipt = submission::spawn_submission(
        snapshot,
        state.forms.clone(),
        state.notifier.clone(),
        state.styles.clone(),
    )
    .join()
    .await?;
    // Submitted forms are closed; a new one starts with a new session.
    state.sessions.lock().await.remove(id);
    info!(session_id = %id, form_id = %receipt.id, "session submitted and closed");
    Ok((StatusCode::CREATED, Json(receipt)))
}
