use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::CoreError;

/// Affirmative choice value. Reveals the detail fields of yes/no questions.
pub const YES: &str = "Sim";
pub const NO: &str = "Não";

pub const MEDICATION_SLOTS: usize = 11;
pub const SURGERY_SLOTS: usize = 6;
pub const EXTRA_VACCINE_SLOTS: usize = 3;

/// One patient's answers to the intake questionnaire.
///
/// Section structs are flattened, so the serialized form is a single flat
/// object keyed by the field names listed in the registry. Choice fields are
/// plain strings and are not checked against their option list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct FormRecord {
    #[serde(flatten)]
    pub identification: Identification,
    #[serde(flatten)]
    pub respiratory: Respiratory,
    #[serde(flatten)]
    pub sleep: Sleep,
    #[serde(flatten)]
    pub epworth: Epworth,
    #[serde(flatten)]
    pub cardiovascular: Cardiovascular,
    #[serde(flatten)]
    pub endocrine: Endocrine,
    #[serde(flatten)]
    pub other_systems: OtherSystems,
    #[serde(flatten)]
    pub transfusion: Transfusion,
    #[serde(flatten)]
    pub allergies: Allergies,
    pub medications: [String; MEDICATION_SLOTS],
    pub surgeries: [String; SURGERY_SLOTS],
    #[serde(flatten)]
    pub family: FamilyHistory,
    #[serde(flatten)]
    pub smoking: Smoking,
    #[serde(flatten)]
    pub alcohol: Alcohol,
    #[serde(flatten)]
    pub activity: PhysicalActivity,
    pub diet_type: String,
    #[serde(flatten)]
    pub vaccinations: Vaccinations,
    #[serde(flatten)]
    pub screening: Screening,
    pub declaration: bool,
}

impl FormRecord {
    /// A record with every field at its default and the fill date set.
    pub fn new(today: jiff::civil::Date) -> Self {
        let mut record = Self::default();
        record.identification.fill_date = today.to_string();
        record
    }

    /// The record as a flat `name -> value` map.
    pub fn to_fields(&self) -> Result<Map<String, Value>, CoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::NotAnObject),
        }
    }

    /// Age the smoking interval ends at: the current age for active
    /// smokers, the quit age otherwise.
    pub fn smoking_end_age(&self) -> i32 {
        if self.smoking.smokes_currently == YES {
            self.identification.age
        } else {
            self.smoking.smoking_quit_age
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Identification {
    pub full_name: String,
    /// ISO 8601 calendar date, empty until answered.
    pub birth_date: String,
    pub fill_date: String,
    pub age: i32,
    pub referral_source: String,
    pub referred_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Respiratory {
    pub asthma: String,
    pub asthma_notes: String,
    pub rhinitis: String,
    pub rhinitis_notes: String,
    pub sinusitis: String,
    pub sinusitis_notes: String,
    pub emphysema: String,
    pub emphysema_notes: String,
    pub pneumonia: String,
    pub pneumonia_notes: String,
    pub tuberculosis: String,
    pub tuberculosis_notes: String,
    pub other_respiratory: String,
    pub other_respiratory_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Sleep {
    pub snoring: String,
    pub snoring_frequency: String,
    /// 0–10 on the input surface.
    pub snoring_intensity: i32,
    pub snoring_notes: String,
    pub insomnia: String,
    pub insomnia_notes: String,
    pub daytime_sleepiness: String,
    pub daytime_sleepiness_notes: String,
    pub other_sleep_problems: String,
    pub other_sleep_problems_notes: String,
}

/// Epworth Sleepiness Scale answers. Each item is 0–3 on the input surface;
/// nothing here enforces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Epworth {
    pub epworth_reading: i32,
    pub epworth_tv: i32,
    pub epworth_public_place: i32,
    pub epworth_passenger: i32,
    pub epworth_afternoon_rest: i32,
    pub epworth_conversation: i32,
    pub epworth_after_lunch: i32,
    pub epworth_traffic: i32,
    /// Last value written by the sleepiness calculator.
    pub epworth_total: i32,
}

impl Epworth {
    pub fn items(&self) -> [i32; 8] {
        [
            self.epworth_reading,
            self.epworth_tv,
            self.epworth_public_place,
            self.epworth_passenger,
            self.epworth_afternoon_rest,
            self.epworth_conversation,
            self.epworth_after_lunch,
            self.epworth_traffic,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Cardiovascular {
    pub high_blood_pressure: String,
    pub high_blood_pressure_notes: String,
    pub high_cholesterol: String,
    pub high_cholesterol_notes: String,
    pub arrhythmia: String,
    pub arrhythmia_notes: String,
    pub other_cardiac: String,
    pub other_cardiac_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Endocrine {
    pub diabetes: String,
    pub diabetes_notes: String,
    pub thyroid: String,
    pub thyroid_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct OtherSystems {
    pub neurological: String,
    pub neurological_notes: String,
    pub reflux: String,
    pub reflux_notes: String,
    pub intestinal: String,
    pub intestinal_notes: String,
    pub liver: String,
    pub liver_notes: String,
    pub urinary: String,
    pub urinary_notes: String,
    pub joints: String,
    pub joints_notes: String,
    pub psychiatric: String,
    pub psychiatric_notes: String,
    pub thrombosis: String,
    pub thrombosis_notes: String,
    pub tumors: String,
    pub tumors_notes: String,
    pub accidents: String,
    pub accidents_notes: String,
    pub other_conditions: String,
    pub other_conditions_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Transfusion {
    pub transfusion: String,
    pub transfusion_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Allergies {
    pub drug_allergies: String,
    pub drug_allergies_list: String,
    pub respiratory_allergies: String,
    pub respiratory_allergies_list: String,
    pub food_allergies: String,
    pub food_allergies_list: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct FamilyHistory {
    pub father: String,
    pub father_conditions: String,
    pub father_cause_of_death: String,
    pub mother: String,
    pub mother_conditions: String,
    pub mother_cause_of_death: String,
    pub paternal_grandparents: String,
    pub paternal_grandparents_conditions: String,
    pub paternal_grandparents_cause_of_death: String,
    pub maternal_grandparents: String,
    pub maternal_grandparents_conditions: String,
    pub maternal_grandparents_cause_of_death: String,
    pub siblings: String,
    pub siblings_conditions: String,
    pub children: String,
    pub children_conditions: String,
    pub other_relatives: String,
    pub other_relatives_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Smoking {
    pub smokes_currently: String,
    pub smoking_type: String,
    pub smoked_before: String,
    pub smoking_start_age: i32,
    pub smoking_quit_age: i32,
    pub quit_recently: String,
    pub cigarettes_per_day: i32,
    /// Last value written by the pack-years calculator.
    pub pack_years: i32,
    pub passive_smoking: String,
    pub passive_smoking_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Alcohol {
    pub drinks_alcohol: String,
    pub drank_alcohol_before: String,
    pub alcohol_types: Vec<String>,
    pub alcohol_consumption_level: String,
    pub alcohol_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct PhysicalActivity {
    pub exercises_currently: String,
    pub exercised_before: String,
    pub weekly_frequency: String,
    pub activity_type: String,
    pub weekly_total_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Vaccinations {
    pub influenza: String,
    pub influenza_year: i32,
    pub covid: String,
    pub covid_year: i32,
    pub covid_doses: String,
    pub pneumococcal: String,
    pub pneumococcal_year: i32,
    pub other_vaccines: [String; EXTRA_VACCINE_SLOTS],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Screening {
    pub colonoscopy: String,
    pub colonoscopy_year: i32,
}

/// The fixed-capacity sequence fields. This is the only runtime dispatch
/// over field names that reaches into the record directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SlotField {
    Medications,
    Surgeries,
    OtherVaccines,
}

impl SlotField {
    pub const ALL: [SlotField; 3] = [
        SlotField::Medications,
        SlotField::Surgeries,
        SlotField::OtherVaccines,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SlotField::Medications => "medications",
            SlotField::Surgeries => "surgeries",
            SlotField::OtherVaccines => "other_vaccines",
        }
    }

    pub fn capacity(self) -> usize {
        match self {
            SlotField::Medications => MEDICATION_SLOTS,
            SlotField::Surgeries => SURGERY_SLOTS,
            SlotField::OtherVaccines => EXTRA_VACCINE_SLOTS,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    pub fn slots(self, record: &FormRecord) -> &[String] {
        match self {
            SlotField::Medications => &record.medications,
            SlotField::Surgeries => &record.surgeries,
            SlotField::OtherVaccines => &record.vaccinations.other_vaccines,
        }
    }

    pub fn slots_mut(self, record: &mut FormRecord) -> &mut [String] {
        match self {
            SlotField::Medications => &mut record.medications,
            SlotField::Surgeries => &mut record.surgeries,
            SlotField::OtherVaccines => &mut record.vaccinations.other_vaccines,
        }
    }
}
