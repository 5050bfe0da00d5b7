use std::sync::LazyLock;

use intake_core::models::record::FormRecord;
use intake_core::registry::EPWORTH_ITEMS;

use crate::Instrument;
use crate::scoring::{Domain, Interpretation, ScoreEntry, ScoreRange, ScoreType, Subscale};

/// Totals above this read as excessive daytime sleepiness.
pub const EXCESSIVE_THRESHOLD: i32 = 10;

/// Epworth Sleepiness Scale. 8 situations, each rated 0–3 for the chance of
/// dozing. Total 0–24.
pub struct Epworth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepinessBand {
    Normal,
    Excessive,
}

impl SleepinessBand {
    pub fn label(self) -> &'static str {
        match self {
            SleepinessBand::Normal => "Sonolência normal",
            SleepinessBand::Excessive => "Sonolência excessiva",
        }
    }
}

pub fn classify(total: i32) -> SleepinessBand {
    if total > EXCESSIVE_THRESHOLD {
        SleepinessBand::Excessive
    } else {
        SleepinessBand::Normal
    }
}

static DOMAINS: LazyLock<Vec<Domain>> = LazyLock::new(|| {
    let item_range = ScoreRange::integer(0, 3);
    let total_range = ScoreRange::integer(0, 24);

    let names = [
        "Sentado lendo",
        "Assistindo TV",
        "Sentado inativo em local público",
        "Como passageiro de carro por 1 hora",
        "Descansando à tarde",
        "Sentado conversando com alguém",
        "Sentado após almoço sem álcool",
        "No carro parado no trânsito",
    ];

    let mut subscales: Vec<Subscale> = EPWORTH_ITEMS
        .iter()
        .zip(names)
        .map(|(id, name)| Subscale {
            id: id.to_string(),
            name: name.to_string(),
            score_type: ScoreType::Rating,
            range: item_range,
            description: Some(
                "0 nunca cochilaria, 1 pequena, 2 moderada, 3 alta chance".to_string(),
            ),
        })
        .collect();
    subscales.push(Subscale {
        id: "epworth_total".to_string(),
        name: "Total".to_string(),
        score_type: ScoreType::Raw,
        range: total_range,
        description: None,
    });

    vec![Domain {
        id: "epworth_items".to_string(),
        name: "Escala de Sonolência de Epworth".to_string(),
        subscales,
        composite_score_type: Some(ScoreType::Raw),
        composite_range: Some(total_range),
        description: Some("0-10: sonolência normal, 11+: sonolência excessiva".to_string()),
    }]
});

impl Instrument for Epworth {
    fn id(&self) -> &str {
        "epworth"
    }

    fn name(&self) -> &str {
        "Epworth"
    }

    fn domains(&self) -> &[Domain] {
        &DOMAINS
    }

    fn entries(&self, record: &FormRecord) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = EPWORTH_ITEMS
            .iter()
            .zip(record.epworth.items())
            .map(|(id, value)| ScoreEntry::new(id, value))
            .collect();
        entries.push(ScoreEntry::new("epworth_total", record.epworth.epworth_total));
        entries
    }

    /// Reads the cached total, so the band always agrees with the total
    /// shown next to it.
    fn interpret(&self, record: &FormRecord) -> Option<Interpretation> {
        let total = record.epworth.epworth_total;
        Some(Interpretation {
            score: total,
            label: classify(total).label().to_string(),
        })
    }
}
