use axum::Json;
use axum::extract::Path;
use serde::Serialize;

use intake_core::registry::{self, Derived, Section};

use crate::error::ApiError;

pub async fn get_schema() -> Json<&'static [Section]> {
    Json(registry::sections())
}

#[derive(Serialize)]
pub struct FieldDependents {
    pub field: &'static str,
    /// Fields this one reveals.
    pub dependents: Vec<&'static str>,
    /// Calculators that read this field.
    pub derived: Vec<Derived>,
}

pub async fn get_dependents(Path(name): Path<String>) -> Result<Json<FieldDependents>, ApiError> {
    let spec = registry::field(&name)
        .ok_or_else(|| ApiError::NotFound(format!("unknown field: {name}")))?;
    Ok(Json(FieldDependents {
        field: spec.name,
        dependents: registry::dependents(spec.name),
        derived: registry::derived_from(spec.name),
    }))
}
