use std::ops::Deref;
use std::sync::Arc;

use crate::error::PreconditionError;
use crate::models::record::FormRecord;
use crate::precondition;

/// A frozen copy of the record handed to export and submission.
///
/// Cloning is cheap and never observes later edits made through the store.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    record: Arc<FormRecord>,
    taken_at: jiff::Timestamp,
}

impl FormSnapshot {
    pub fn new(record: FormRecord) -> Self {
        Self {
            record: Arc::new(record),
            taken_at: jiff::Timestamp::now(),
        }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn taken_at(&self) -> jiff::Timestamp {
        self.taken_at
    }

    pub fn ensure_submittable(&self) -> Result<(), PreconditionError> {
        precondition::check_required(&self.record)
    }
}

impl Deref for FormSnapshot {
    type Target = FormRecord;

    fn deref(&self) -> &FormRecord {
        &self.record
    }
}
