//! Flattening a record into the label/value lines every document format
//! prints.

use std::collections::HashSet;

use intake_core::models::record::{FormRecord, NO, YES};
use intake_core::registry::{self, Derived, FieldKind, FieldSpec};
use intake_instruments::{Instrument, all_instruments, instruments::epworth::Epworth};
use serde::Serialize;
use serde_json::Value;

use crate::error::ExportError;

pub const DOCUMENT_TITLE: &str = "FICHA DE PRÉ-AVALIAÇÃO MÉDICA";
pub const NOT_INFORMED: &str = "Não informado";
pub const NO_ITEMS: &str = "Nenhum item informado";

/// Visible fields of one record, grouped by section in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct FormDump {
    pub title: String,
    pub patient: String,
    pub fill_date: String,
    pub sections: Vec<DumpSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DumpSection {
    pub id: String,
    pub title: String,
    pub entries: Vec<DumpEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpEntry {
    pub label: String,
    pub value: String,
}

impl DumpEntry {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl FormDump {
    pub fn from_record(record: &FormRecord) -> Result<Self, ExportError> {
        // A zero on a scored item is an answer, not a blank.
        let scored: HashSet<String> = all_instruments()
            .iter()
            .flat_map(|i| i.domains().to_vec())
            .flat_map(|d| d.subscales)
            .map(|s| s.id)
            .collect();

        let sections = registry::visible_fields(record)?
            .into_iter()
            .map(|visible| {
                let entries = visible
                    .fields
                    .iter()
                    .flat_map(|(spec, value)| {
                        entries_for(spec, value, scored.contains(spec.name), record)
                    })
                    .collect();
                DumpSection {
                    id: visible.section.id.to_string(),
                    title: visible.section.title.to_string(),
                    entries,
                }
            })
            .collect();

        Ok(Self {
            title: DOCUMENT_TITLE.to_string(),
            patient: non_empty(record.identification.full_name.trim()),
            fill_date: display_date(&record.identification.fill_date),
            sections,
        })
    }

    pub fn section(&self, id: &str) -> Option<&DumpSection> {
        self.sections.iter().find(|s| s.id == id)
    }
}

fn entries_for(
    spec: &FieldSpec,
    value: &Value,
    scored: bool,
    record: &FormRecord,
) -> Vec<DumpEntry> {
    match spec.kind {
        FieldKind::Slots { .. } => {
            let filled: Vec<DumpEntry> = value
                .as_array()
                .into_iter()
                .flatten()
                .enumerate()
                .filter_map(|(i, slot)| {
                    let text = slot.as_str()?.trim();
                    (!text.is_empty())
                        .then(|| DumpEntry::new(format!("{} {}", spec.label, i + 1), text))
                })
                .collect();
            if filled.is_empty() {
                vec![DumpEntry::new(&spec.label, NO_ITEMS)]
            } else {
                filled
            }
        }
        _ => {
            let mut text = format_value(spec.kind, value, scored);
            if spec.derived == Some(Derived::SleepinessTotal)
                && let Some(reading) = Epworth.interpret(record)
            {
                text = format!("{text} ({})", reading.label);
            }
            vec![DumpEntry::new(&spec.label, text)]
        }
    }
}

/// Display text for a single value. Slot fields are expanded by the caller.
pub fn format_value(kind: FieldKind, value: &Value, scored: bool) -> String {
    match kind {
        FieldKind::ShortText | FieldKind::LongText | FieldKind::Choice { .. } => {
            non_empty(value.as_str().unwrap_or_default().trim())
        }
        FieldKind::Date => display_date(value.as_str().unwrap_or_default()),
        FieldKind::Integer { unit } => match value.as_i64() {
            Some(0) | None if !scored => NOT_INFORMED.to_string(),
            Some(n) => match unit {
                Some(unit) => format!("{n} {unit}"),
                None => n.to_string(),
            },
            None => NOT_INFORMED.to_string(),
        },
        FieldKind::Boolean => {
            if value.as_bool().unwrap_or(false) {
                YES.to_string()
            } else {
                NO.to_string()
            }
        }
        FieldKind::Tags { .. } => {
            let tags: Vec<&str> = value
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .filter(|t| !t.trim().is_empty())
                .collect();
            non_empty(&tags.join(", "))
        }
        FieldKind::Slots { .. } => NO_ITEMS.to_string(),
    }
}

/// ISO dates as dd/mm/aaaa; anything unparsable is shown as typed.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    match raw.parse::<jiff::civil::Date>() {
        Ok(date) => date.strftime("%d/%m/%Y").to_string(),
        Err(_) => non_empty(raw),
    }
}

fn non_empty(text: &str) -> String {
    if text.is_empty() {
        NOT_INFORMED.to_string()
    } else {
        text.to_string()
    }
}
