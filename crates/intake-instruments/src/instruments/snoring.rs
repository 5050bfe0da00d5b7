use std::sync::LazyLock;

use intake_core::models::record::FormRecord;

use crate::Instrument;
use crate::scoring::{Domain, ScoreEntry, ScoreRange, ScoreType, Subscale};

/// Self-rated snoring intensity, 0 (none) to 10 (very loud).
pub struct SnoringIntensity;

static DOMAINS: LazyLock<Vec<Domain>> = LazyLock::new(|| {
    vec![Domain {
        id: "snoring".to_string(),
        name: "Roncos".to_string(),
        subscales: vec![Subscale {
            id: "snoring_intensity".to_string(),
            name: "Intensidade dos roncos".to_string(),
            score_type: ScoreType::Rating,
            range: ScoreRange::integer(0, 10),
            description: None,
        }],
        composite_score_type: None,
        composite_range: None,
        description: None,
    }]
});

impl Instrument for SnoringIntensity {
    fn id(&self) -> &str {
        "snoring_intensity"
    }

    fn name(&self) -> &str {
        "Intensidade dos roncos"
    }

    fn domains(&self) -> &[Domain] {
        &DOMAINS
    }

    fn entries(&self, record: &FormRecord) -> Vec<ScoreEntry> {
        vec![ScoreEntry::new("snoring_intensity", record.sleep.snoring_intensity)]
    }
}
