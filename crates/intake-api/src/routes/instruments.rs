//! The scored scales embedded in the form, with the record fields each one
//! reads so a client can place the range hints next to the questions.

use axum::Json;
use axum::extract::Path;
use serde::Serialize;

use intake_instruments::scoring::{Domain, ScoreRange};
use intake_instruments::{Instrument, all_instruments, require_instrument};

use crate::error::ApiError;

#[derive(Serialize)]
pub struct InstrumentSummary {
    id: String,
    name: String,
    /// Record fields scored by this instrument, in questionnaire order.
    fields: Vec<String>,
}

#[derive(Serialize)]
pub struct InstrumentDetail {
    id: String,
    name: String,
    domains: Vec<Domain>,
    /// Composite range, when the instrument sums its items.
    total_range: Option<ScoreRange>,
}

fn scored_fields(instrument: &dyn Instrument) -> Vec<String> {
    instrument
        .domains()
        .iter()
        .flat_map(|d| d.subscales.iter().map(|s| s.id.clone()))
        .collect()
}

pub async fn list_instruments() -> Json<Vec<InstrumentSummary>> {
    Json(
        all_instruments()
            .iter()
            .map(|i| InstrumentSummary {
                id: i.id().to_string(),
                name: i.name().to_string(),
                fields: scored_fields(&**i),
            })
            .collect(),
    )
}

pub async fn get_instrument_detail(
    Path(id): Path<String>,
) -> Result<Json<InstrumentDetail>, ApiError> {
    let instrument = require_instrument(&id)?;
    let total_range = instrument.domains().iter().find_map(|d| d.composite_range);

    Ok(Json(InstrumentDetail {
        id: instrument.id().to_string(),
        name: instrument.name().to_string(),
        domains: instrument.domains().to_vec(),
        total_range,
    }))
}
