#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use intake_api::state::AppState;
use intake_api::submission::{FormRepository, Notifier};
use intake_core::models::record::FormRecord;
use intake_core::models::submission::{SubmissionRow, SubmissionSummary};
use intake_notify::Email;
use intake_notify::error::NotifyError;
use intake_storage::error::StorageError;

#[derive(Default)]
pub struct MemoryForms {
    pub rows: Mutex<HashMap<Uuid, SubmissionRow>>,
}

#[async_trait]
impl FormRepository for MemoryForms {
    async fn insert(&self, row: &SubmissionRow) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&row.id) {
            return Err(StorageError::AlreadyExists {
                key: format!("forms/{}.json", row.id),
            });
        }
        rows.insert(row.id, row.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<SubmissionRow, StorageError> {
        self.rows
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound {
                key: format!("forms/{id}.json"),
            })
    }

    async fn list(&self) -> Result<Vec<SubmissionSummary>, StorageError> {
        Ok(self.rows.lock().unwrap().values().map(|r| r.summary()).collect())
    }
}

/// Rejects every insert as a duplicate.
pub struct DuplicateForms;

#[async_trait]
impl FormRepository for DuplicateForms {
    async fn insert(&self, row: &SubmissionRow) -> Result<(), StorageError> {
        Err(StorageError::AlreadyExists {
            key: format!("forms/{}.json", row.id),
        })
    }

    async fn get(&self, id: Uuid) -> Result<SubmissionRow, StorageError> {
        Err(StorageError::NotFound {
            key: format!("forms/{id}.json"),
        })
    }

    async fn list(&self) -> Result<Vec<SubmissionSummary>, StorageError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Email>>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: &Email) -> Result<String, NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 422,
                body: "invalid".to_string(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("email-{}", sent.len()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub forms: Arc<MemoryForms>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn app_with(notifier: RecordingNotifier) -> TestApp {
    let forms = Arc::new(MemoryForms::default());
    let notifier = Arc::new(notifier);
    let state = AppState::new(forms.clone(), notifier.clone());
    TestApp {
        router: intake_api::router(state),
        forms,
        notifier,
    }
}

pub fn app() -> TestApp {
    app_with(RecordingNotifier::default())
}

pub async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    router.clone().oneshot(req.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// A record that passes the required-field check.
pub fn complete_record() -> FormRecord {
    let mut record = FormRecord::new(jiff::civil::date(2024, 6, 15));
    record.identification.full_name = "Maria Aparecida".to_string();
    record.identification.birth_date = "1970-01-20".to_string();
    record.identification.age = 54;
    record.identification.referral_source = "Outro médico".to_string();
    record.declaration = true;
    record
}
