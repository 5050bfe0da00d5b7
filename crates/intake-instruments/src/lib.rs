//! intake-instruments
//!
//! Scored questionnaires embedded in the intake form. Pure data over the
//! record; ranges here are advisory and never block an edit.

pub mod error;
pub mod instruments;
pub mod scoring;

use intake_core::models::record::FormRecord;

use error::InstrumentError;
use scoring::{Domain, Interpretation, ScoreEntry, ValidationError};

/// Trait implemented by each scored questionnaire.
pub trait Instrument: Send + Sync {
    /// Unique identifier (e.g., "epworth").
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// The domains and subscales this instrument measures.
    fn domains(&self) -> &[Domain];

    /// The answers this instrument reads from a record, keyed by subscale.
    fn entries(&self, record: &FormRecord) -> Vec<ScoreEntry>;

    /// Reading of the composite score, when the instrument defines one.
    fn interpret(&self, _record: &FormRecord) -> Option<Interpretation> {
        None
    }

    /// Validate a set of score entries against this instrument's rules.
    fn validate_scores(&self, scores: &[ScoreEntry]) -> Vec<ValidationError> {
        let all_subscales: Vec<_> = self
            .domains()
            .iter()
            .flat_map(|d| &d.subscales)
            .collect();

        let mut errors = Vec::new();
        for entry in scores {
            if let Some(subscale) = all_subscales.iter().find(|s| s.id == entry.subscale_id)
                && !subscale.range.contains(entry.value)
            {
                errors.push(ValidationError {
                    subscale_id: entry.subscale_id.clone(),
                    value: entry.value,
                    expected_range: subscale.range,
                    score_type: subscale.score_type,
                    message: format!(
                        "{}: {} = {} fora do intervalo [{}, {}]",
                        self.name(),
                        subscale.name,
                        entry.value,
                        subscale.range.min,
                        subscale.range.max,
                    ),
                });
            }
        }
        errors
    }

    fn validate_record(&self, record: &FormRecord) -> Vec<ValidationError> {
        self.validate_scores(&self.entries(record))
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::epworth::Epworth),
        Box::new(instruments::snoring::SnoringIntensity),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

/// Like [`get_instrument`], but an unknown ID is an error.
pub fn require_instrument(id: &str) -> Result<Box<dyn Instrument>, InstrumentError> {
    get_instrument(id).ok_or_else(|| InstrumentError::UnknownInstrument(id.to_string()))
}

/// Range problems across every instrument. Used as non-blocking warnings.
pub fn validate_all(record: &FormRecord) -> Vec<ValidationError> {
    all_instruments()
        .iter()
        .flat_map(|i| i.validate_record(record))
        .collect()
}
