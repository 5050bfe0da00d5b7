//! The form state store: sole owner and mutation surface of one session's
//! record.

use jiff::civil::Date;
use serde_json::Value;
use tracing::debug;

use crate::calculators;
use crate::error::{CalcError, CoreError};
use crate::models::record::{FormRecord, SlotField};
use crate::registry::{self, Derived};
use crate::snapshot::FormSnapshot;

#[derive(Debug, Clone)]
pub struct FormStore {
    record: FormRecord,
    today: Date,
}

impl FormStore {
    /// A store holding a fresh record, with `today` as the reference date
    /// for the fill date and age calculation.
    pub fn new(today: Date) -> Self {
        Self {
            record: registry::default_record(today),
            today,
        }
    }

    /// A store dated with the system clock.
    pub fn open() -> Self {
        Self::new(jiff::Zoned::now().date())
    }

    pub fn from_record(record: FormRecord, today: Date) -> Self {
        Self { record, today }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn today(&self) -> Date {
        self.today
    }

    /// Statically typed edit. Derived fields are not recomputed.
    pub fn update(&mut self, edit: impl FnOnce(&mut FormRecord)) {
        edit(&mut self.record);
    }

    /// Replace one field by its registry name.
    ///
    /// The value must deserialize into the field's declared type. On error
    /// the record is left as it was.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), CoreError> {
        let spec =
            registry::field(name).ok_or_else(|| CoreError::UnknownField(name.to_string()))?;

        let mut fields = self.record.to_fields()?;
        fields.insert(spec.name.to_string(), value);
        let updated: FormRecord =
            serde_json::from_value(Value::Object(fields)).map_err(|e| CoreError::InvalidValue {
                field: spec.name.to_string(),
                reason: e.to_string(),
            })?;

        debug!(field = spec.name, "field updated");
        self.record = updated;
        Ok(())
    }

    /// Replace one element of a slot field, leaving the others untouched.
    pub fn update_array_element(
        &mut self,
        slot: SlotField,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let capacity = slot.capacity();
        let element = slot
            .slots_mut(&mut self.record)
            .get_mut(index)
            .ok_or(CoreError::SlotOutOfRange {
                field: slot.name(),
                index,
                capacity,
            })?;
        *element = value.into();
        debug!(field = slot.name(), index, "slot updated");
        Ok(())
    }

    /// Store the birth date, then the age computed from it, then the
    /// pack-years that read the age.
    ///
    /// The date is kept even when the age cannot be computed; the cached age
    /// is reset to 0 in that case and the error is returned.
    pub fn set_birth_date(&mut self, birth_date: impl Into<String>) -> Result<i32, CalcError> {
        self.record.identification.birth_date = birth_date.into();
        let result = self.refresh_age();
        self.refresh_derived(Derived::Age.field());
        result
    }

    pub fn compute_age(&self) -> Result<i32, CalcError> {
        calculators::age_from_birth_date(&self.record.identification.birth_date, self.today)
    }

    /// Recompute the cached age. An unusable birth date clears it to 0.
    fn refresh_age(&mut self) -> Result<i32, CalcError> {
        let result = self.compute_age();
        self.record.identification.age = *result.as_ref().unwrap_or(&0);
        result
    }

    /// Sum the Epworth items and cache the total in the record.
    pub fn compute_sleepiness_total(&mut self) -> i32 {
        let total = calculators::sleepiness_total(&self.record.epworth.items());
        self.record.epworth.epworth_total = total;
        total
    }

    /// Compute pack-years over the active smoking branch and cache it.
    ///
    /// When the inputs are incomplete or inconsistent the cached value is
    /// reset to 0 and `None` is returned.
    pub fn compute_pack_years(&mut self) -> Option<i32> {
        let smoking = &self.record.smoking;
        let result = calculators::pack_years(
            smoking.smoking_start_age,
            self.record.smoking_end_age(),
            smoking.cigarettes_per_day,
        );
        self.record.smoking.pack_years = result.unwrap_or(0);
        result
    }

    /// Re-run every calculator that reads `name`. A changed age feeds
    /// pack-years in turn.
    pub fn refresh_derived(&mut self, name: &str) {
        for derived in registry::derived_from(name) {
            match derived {
                Derived::Age => {
                    if let Err(e) = self.refresh_age() {
                        debug!(error = %e, "age reset");
                    }
                    self.refresh_derived(Derived::Age.field());
                }
                Derived::SleepinessTotal => {
                    self.compute_sleepiness_total();
                }
                Derived::PackYears => {
                    self.compute_pack_years();
                }
            }
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot::new(self.record.clone())
    }

    pub fn into_record(self) -> FormRecord {
        self.record
    }
}
