use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::record::FormRecord;
use crate::snapshot::FormSnapshot;

/// One stored submission: a handful of top-level columns plus the whole
/// record as an opaque blob.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub full_name: String,
    pub birth_date: Option<String>,
    pub age: i32,
    pub referral_source: String,
    pub referred_by: String,
    pub form_data: serde_json::Value,
    pub created_at: jiff::Timestamp,
}

impl SubmissionRow {
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Result<Self, CoreError> {
        let ident = &snapshot.identification;
        Ok(Self {
            id: Uuid::new_v4(),
            full_name: ident.full_name.trim().to_string(),
            birth_date: (!ident.birth_date.is_empty()).then(|| ident.birth_date.clone()),
            age: ident.age,
            referral_source: ident.referral_source.clone(),
            referred_by: ident.referred_by.clone(),
            form_data: serde_json::to_value(snapshot.record())?,
            created_at: jiff::Timestamp::now(),
        })
    }

    /// Decode the stored blob back into a typed record.
    pub fn record(&self) -> Result<FormRecord, CoreError> {
        Ok(serde_json::from_value(self.form_data.clone())?)
    }

    pub fn summary(&self) -> SubmissionSummary {
        SubmissionSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionSummary {
    pub id: Uuid,
    pub full_name: String,
    pub created_at: jiff::Timestamp,
}
