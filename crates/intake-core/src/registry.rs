//! The field registry: every field of the questionnaire, in display order,
//! with its label, kind and conditional-reveal rule.
//!
//! Field names are the keys of the flattened [`FormRecord`] serialization.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::models::record::{
    EXTRA_VACCINE_SLOTS, FormRecord, MEDICATION_SLOTS, NO, SURGERY_SLOTS, YES,
};

pub const YES_NO: &[&str] = &[NO, YES];
pub const REFERRAL_SOURCES: &[&str] = &["Outro médico", "Parente ou amigo", "Outros"];
pub const SNORING_FREQUENCIES: &[&str] = &["Ocasional", "Frequente", "Todas as noites"];
pub const SMOKING_TYPES: &[&str] = &["Cigarro", "Charuto", "Cachimbo", "Outros"];
pub const ALCOHOL_TYPES: &[&str] = &[
    "Cerveja",
    "Vinho",
    "Destilados (cachaça, whisky, vodka)",
    "Licores",
];
pub const CONSUMPTION_LEVELS: &[&str] = &["Social/Ocasional", "Moderado", "Excessivo"];
pub const WEEKLY_FREQUENCIES: &[&str] = &["1-2 vezes", "3-4 vezes", "5 ou mais"];
pub const WEEKLY_TOTAL_TIMES: &[&str] = &["Menos de 150 min", "150-300 min", "Mais de 300 min"];
pub const DIET_TYPES: &[&str] = &["Onívora", "Vegetariana", "Vegana", "Outras restrições"];
pub const COVID_DOSES: &[&str] = &["1", "2", "3 ou mais"];

/// Epworth item fields in questionnaire order.
pub const EPWORTH_ITEMS: [&str; 8] = [
    "epworth_reading",
    "epworth_tv",
    "epworth_public_place",
    "epworth_passenger",
    "epworth_afternoon_rest",
    "epworth_conversation",
    "epworth_after_lunch",
    "epworth_traffic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    LongText,
    /// ISO 8601 calendar date held as a string.
    Date,
    Choice { options: &'static [&'static str] },
    Integer { unit: Option<&'static str> },
    Boolean,
    Slots { capacity: usize },
    Tags { options: &'static [&'static str] },
}

/// Reveals a field when `controller` holds `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub controller: &'static str,
    pub value: &'static str,
}

/// Fields whose value is computed from other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Derived {
    Age,
    SleepinessTotal,
    PackYears,
}

impl Derived {
    pub const ALL: [Derived; 3] = [Derived::Age, Derived::SleepinessTotal, Derived::PackYears];

    /// The record field holding the computed value.
    pub fn field(self) -> &'static str {
        match self {
            Derived::Age => "age",
            Derived::SleepinessTotal => "epworth_total",
            Derived::PackYears => "pack_years",
        }
    }

    /// Fields the calculator reads.
    pub fn inputs(self) -> &'static [&'static str] {
        match self {
            Derived::Age => &["birth_date"],
            Derived::SleepinessTotal => &EPWORTH_ITEMS,
            Derived::PackYears => &[
                "smokes_currently",
                "smoking_start_age",
                "smoking_quit_age",
                "cigarettes_per_day",
                "age",
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: String,
    pub kind: FieldKind,
    /// Any matching trigger reveals the field. Empty means always shown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reveal: Vec<Trigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived: Option<Derived>,
}

impl FieldSpec {
    fn new(name: &'static str, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name,
            label: label.into(),
            kind,
            reveal: Vec::new(),
            derived: None,
        }
    }

    fn revealed_by(mut self, controller: &'static str, value: &'static str) -> Self {
        self.reveal.push(Trigger { controller, value });
        self
    }

    fn derived(mut self, derived: Derived) -> Self {
        self.derived = Some(derived);
        self
    }

    pub fn is_conditional(&self) -> bool {
        !self.reveal.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

fn short_text(name: &'static str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::ShortText)
}

fn long_text(name: &'static str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::LongText)
}

fn choice(name: &'static str, label: &str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Choice { options })
}

fn integer(name: &'static str, label: &str, unit: Option<&'static str>) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Integer { unit })
}

fn yes_no(name: &'static str, label: &str) -> FieldSpec {
    choice(name, label, YES_NO)
}

/// A yes/no question followed by the notes field it reveals.
fn condition(name: &'static str, notes: &'static str, label: &str) -> [FieldSpec; 2] {
    [
        yes_no(name, label),
        long_text(notes, &format!("Observações ({label})")).revealed_by(name, YES),
    ]
}

fn relative(
    status: &'static str,
    conditions: &'static str,
    cause: &'static str,
    label: &str,
    options: &'static [&'static str],
) -> [FieldSpec; 3] {
    let deceased = options[1];
    [
        choice(status, label, options),
        long_text(conditions, &format!("Doenças ({label})")),
        long_text(cause, &format!("Motivo do falecimento ({label})")).revealed_by(status, deceased),
    ]
}

fn build_sections() -> Vec<Section> {
    let identification = vec![
        long_text("full_name", "Nome completo"),
        FieldSpec::new("birth_date", "Data de nascimento", FieldKind::Date),
        FieldSpec::new("fill_date", "Data de preenchimento", FieldKind::Date),
        integer("age", "Idade", Some("anos")).derived(Derived::Age),
        choice("referral_source", "Quem fez a indicação", REFERRAL_SOURCES),
        short_text("referred_by", "Quem indicou"),
    ];

    let respiratory = [
        condition("asthma", "asthma_notes", "Asma / Bronquite"),
        condition("rhinitis", "rhinitis_notes", "Rinite"),
        condition("sinusitis", "sinusitis_notes", "Sinusites"),
        condition("emphysema", "emphysema_notes", "Enfisema / DPOC"),
        condition("pneumonia", "pneumonia_notes", "Pneumonias prévias"),
        condition("tuberculosis", "tuberculosis_notes", "Tuberculose"),
        condition(
            "other_respiratory",
            "other_respiratory_notes",
            "Outras doenças respiratórias",
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut sleep = vec![
        yes_no("snoring", "Roncos"),
        choice("snoring_frequency", "Frequência dos roncos", SNORING_FREQUENCIES)
            .revealed_by("snoring", YES),
        integer("snoring_intensity", "Intensidade dos roncos (0-10)", None)
            .revealed_by("snoring", YES),
        long_text("snoring_notes", "Observações sobre os roncos").revealed_by("snoring", YES),
    ];
    sleep.extend(
        [
            condition("insomnia", "insomnia_notes", "Insônia (dificuldade para dormir)"),
            condition(
                "daytime_sleepiness",
                "daytime_sleepiness_notes",
                "Sonolência excessiva durante o dia",
            ),
            condition(
                "other_sleep_problems",
                "other_sleep_problems_notes",
                "Outros problemas do sono",
            ),
        ]
        .into_iter()
        .flatten(),
    );

    let epworth_labels = [
        "Sentado lendo",
        "Assistindo TV",
        "Sentado inativo em local público",
        "Como passageiro de carro por 1 hora",
        "Descansando à tarde",
        "Sentado conversando com alguém",
        "Sentado após almoço sem álcool",
        "No carro parado no trânsito",
    ];
    let mut epworth: Vec<FieldSpec> = EPWORTH_ITEMS
        .iter()
        .zip(epworth_labels)
        .map(|(&name, label)| integer(name, label, None))
        .collect();
    epworth.push(
        integer("epworth_total", "Total da Escala de Epworth", Some("pontos"))
            .derived(Derived::SleepinessTotal),
    );

    let cardiovascular = [
        condition("high_blood_pressure", "high_blood_pressure_notes", "Pressão alta"),
        condition("high_cholesterol", "high_cholesterol_notes", "Colesterol alto"),
        condition("arrhythmia", "arrhythmia_notes", "Arritmias cardíacas"),
        condition("other_cardiac", "other_cardiac_notes", "Outros problemas cardíacos"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let endocrine = [
        condition("diabetes", "diabetes_notes", "Diabetes"),
        condition("thyroid", "thyroid_notes", "Problemas de tireoide"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let other_systems = [
        condition("neurological", "neurological_notes", "Problemas neurológicos"),
        condition("reflux", "reflux_notes", "Refluxo gastroesofágico"),
        condition("intestinal", "intestinal_notes", "Problemas intestinais"),
        condition("liver", "liver_notes", "Problemas no fígado"),
        condition("urinary", "urinary_notes", "Problemas urinários"),
        condition("joints", "joints_notes", "Problemas nas articulações"),
        condition("psychiatric", "psychiatric_notes", "Problemas psiquiátricos"),
        condition("thrombosis", "thrombosis_notes", "Tromboses"),
        condition("tumors", "tumors_notes", "Tumores"),
        condition("accidents", "accidents_notes", "Acidentes graves"),
        condition(
            "other_conditions",
            "other_conditions_notes",
            "Outros problemas de saúde",
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    let transfusion = vec![
        yes_no("transfusion", "Já recebeu transfusão de sangue?"),
        long_text("transfusion_details", "Quando e por que recebeu transfusão")
            .revealed_by("transfusion", YES),
    ];

    let allergies = vec![
        yes_no("drug_allergies", "Alergias a medicamentos"),
        long_text("drug_allergies_list", "Lista de alergias a medicamentos")
            .revealed_by("drug_allergies", YES),
        yes_no("respiratory_allergies", "Alergias respiratórias"),
        long_text("respiratory_allergies_list", "Lista de alergias respiratórias")
            .revealed_by("respiratory_allergies", YES),
        yes_no("food_allergies", "Alergias alimentares"),
        long_text("food_allergies_list", "Lista de alergias alimentares")
            .revealed_by("food_allergies", YES),
    ];

    let medications = vec![FieldSpec::new(
        "medications",
        "Medicação",
        FieldKind::Slots {
            capacity: MEDICATION_SLOTS,
        },
    )];

    let surgeries = vec![FieldSpec::new(
        "surgeries",
        "Cirurgia",
        FieldKind::Slots {
            capacity: SURGERY_SLOTS,
        },
    )];

    let mut family: Vec<FieldSpec> = [
        relative(
            "father",
            "father_conditions",
            "father_cause_of_death",
            "Pai",
            &["Vivo", "Falecido"],
        ),
        relative(
            "mother",
            "mother_conditions",
            "mother_cause_of_death",
            "Mãe",
            &["Viva", "Falecida"],
        ),
        relative(
            "paternal_grandparents",
            "paternal_grandparents_conditions",
            "paternal_grandparents_cause_of_death",
            "Avós paternos",
            &["Vivos", "Falecidos"],
        ),
        relative(
            "maternal_grandparents",
            "maternal_grandparents_conditions",
            "maternal_grandparents_cause_of_death",
            "Avós maternos",
            &["Vivos", "Falecidos"],
        ),
    ]
    .into_iter()
    .flatten()
    .collect();
    family.extend([
        short_text("siblings", "Quantos irmãos?"),
        long_text("siblings_conditions", "Doenças dos irmãos"),
        short_text("children", "Quantos filhos?"),
        long_text("children_conditions", "Doenças dos filhos"),
        yes_no("other_relatives", "Outros parentes com doenças relevantes"),
        long_text("other_relatives_details", "Detalhes sobre outros parentes")
            .revealed_by("other_relatives", YES),
    ]);

    let smoking = vec![
        yes_no("smokes_currently", "Fuma atualmente?"),
        choice("smoking_type", "Tipo de fumo", SMOKING_TYPES).revealed_by("smokes_currently", YES),
        yes_no("smoked_before", "Já fumou anteriormente?").revealed_by("smokes_currently", NO),
        integer("smoking_start_age", "Idade que começou a fumar", Some("anos"))
            .revealed_by("smokes_currently", YES)
            .revealed_by("smoked_before", YES),
        integer("smoking_quit_age", "Idade que parou de fumar", Some("anos"))
            .revealed_by("smoked_before", YES),
        yes_no("quit_recently", "Cessou recentemente (últimos 5 anos)?")
            .revealed_by("smoked_before", YES),
        integer("cigarettes_per_day", "Cigarros por dia", None)
            .revealed_by("smokes_currently", YES)
            .revealed_by("smoked_before", YES),
        integer("pack_years", "Carga tabágica", Some("anos-maço"))
            .revealed_by("smokes_currently", YES)
            .revealed_by("smoked_before", YES)
            .derived(Derived::PackYears),
        yes_no("passive_smoking", "Tabagismo passivo (convive com fumantes)"),
        long_text("passive_smoking_details", "Situação de tabagismo passivo")
            .revealed_by("passive_smoking", YES),
    ];

    let alcohol = vec![
        yes_no("drinks_alcohol", "Consome álcool atualmente?"),
        yes_no("drank_alcohol_before", "Já consumiu álcool anteriormente?")
            .revealed_by("drinks_alcohol", NO),
        FieldSpec::new(
            "alcohol_types",
            "Tipos de bebida",
            FieldKind::Tags {
                options: ALCOHOL_TYPES,
            },
        )
        .revealed_by("drinks_alcohol", YES)
        .revealed_by("drank_alcohol_before", YES),
        choice(
            "alcohol_consumption_level",
            "Classificação do consumo",
            CONSUMPTION_LEVELS,
        )
        .revealed_by("drinks_alcohol", YES)
        .revealed_by("drank_alcohol_before", YES),
        long_text("alcohol_notes", "Observações sobre o consumo")
            .revealed_by("drinks_alcohol", YES)
            .revealed_by("drank_alcohol_before", YES),
    ];

    let activity = vec![
        yes_no("exercises_currently", "Pratica atividade física atualmente?"),
        yes_no("exercised_before", "Já praticou atividade física anteriormente?")
            .revealed_by("exercises_currently", NO),
        choice("weekly_frequency", "Frequência semanal", WEEKLY_FREQUENCIES)
            .revealed_by("exercises_currently", YES)
            .revealed_by("exercised_before", YES),
        long_text("activity_type", "Tipo de atividade")
            .revealed_by("exercises_currently", YES)
            .revealed_by("exercised_before", YES),
        choice("weekly_total_time", "Tempo total semanal", WEEKLY_TOTAL_TIMES)
            .revealed_by("exercises_currently", YES)
            .revealed_by("exercised_before", YES),
    ];

    let diet = vec![choice("diet_type", "Tipo de alimentação", DIET_TYPES)];

    let vaccinations = vec![
        yes_no("influenza", "Vacina da Influenza (Gripe)"),
        integer("influenza_year", "Ano da última vacina da influenza", None)
            .revealed_by("influenza", YES),
        yes_no("covid", "Vacina COVID-19"),
        integer("covid_year", "Ano da última dose de COVID-19", None).revealed_by("covid", YES),
        choice("covid_doses", "Quantas doses de COVID-19?", COVID_DOSES).revealed_by("covid", YES),
        yes_no("pneumococcal", "Vacina Pneumocócica"),
        integer("pneumococcal_year", "Ano da vacina pneumocócica", None)
            .revealed_by("pneumococcal", YES),
        FieldSpec::new(
            "other_vaccines",
            "Outra vacina",
            FieldKind::Slots {
                capacity: EXTRA_VACCINE_SLOTS,
            },
        ),
    ];

    let screening = vec![
        yes_no("colonoscopy", "Colonoscopia"),
        integer("colonoscopy_year", "Ano do último exame", None).revealed_by("colonoscopy", YES),
    ];

    let declaration = vec![FieldSpec::new(
        "declaration",
        "Declaro que todas as informações fornecidas são verdadeiras e completas",
        FieldKind::Boolean,
    )];

    vec![
        section("identification", "Dados Pessoais", identification),
        section("respiratory", "Histórico Respiratório", respiratory),
        section("sleep", "Distúrbios do Sono", sleep),
        section("epworth", "Escala de Sonolência de Epworth", epworth),
        section("cardiovascular", "Sistema Cardiovascular", cardiovascular),
        section("endocrine", "Sistema Endócrino", endocrine),
        section("other_systems", "Outros Sistemas", other_systems),
        section("transfusion", "Transfusão Sanguínea", transfusion),
        section("allergies", "Alergias", allergies),
        section("medications", "Medicações em Uso", medications),
        section("surgeries", "Cirurgias Anteriores", surgeries),
        section("family_history", "História Familiar", family),
        section("smoking", "Hábitos Pessoais - Tabagismo", smoking),
        section("alcohol", "Consumo de Álcool", alcohol),
        section("physical_activity", "Atividade Física", activity),
        section("diet", "Alimentação", diet),
        section("vaccinations", "Vacinações", vaccinations),
        section("screening", "Exames de Rastreamento", screening),
        section("declaration", "Declaração de Veracidade", declaration),
    ]
}

fn section(id: &'static str, title: &'static str, fields: Vec<FieldSpec>) -> Section {
    Section { id, title, fields }
}

static SECTIONS: LazyLock<Vec<Section>> = LazyLock::new(build_sections);

static BY_NAME: LazyLock<HashMap<&'static str, &'static FieldSpec>> = LazyLock::new(|| {
    SECTIONS
        .iter()
        .flat_map(|s| &s.fields)
        .map(|f| (f.name, f))
        .collect()
});

/// All sections in display order.
pub fn sections() -> &'static [Section] {
    &SECTIONS
}

/// Every field in display order.
pub fn fields() -> impl Iterator<Item = &'static FieldSpec> {
    SECTIONS.iter().flat_map(|s| s.fields.iter())
}

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    BY_NAME.get(name).copied()
}

/// Fields revealed by `name`, in display order.
pub fn dependents(name: &str) -> Vec<&'static str> {
    fields()
        .filter(|f| f.reveal.iter().any(|t| t.controller == name))
        .map(|f| f.name)
        .collect()
}

/// Calculators that read `name`.
pub fn derived_from(name: &str) -> Vec<Derived> {
    Derived::ALL
        .into_iter()
        .filter(|d| d.inputs().iter().any(|input| *input == name))
        .collect()
}

pub fn default_record(today: jiff::civil::Date) -> FormRecord {
    FormRecord::new(today)
}

pub fn default_value(name: &str, today: jiff::civil::Date) -> Result<Value, CoreError> {
    let spec = field(name).ok_or_else(|| CoreError::UnknownField(name.to_string()))?;
    default_record(today)
        .to_fields()?
        .remove(spec.name)
        .ok_or_else(|| CoreError::UnknownField(name.to_string()))
}

/// Whether `spec` is shown given the current `values`.
///
/// A trigger only counts when its controller is itself shown, so nested
/// follow-up questions disappear together with their parent.
pub fn is_visible(spec: &FieldSpec, values: &Map<String, Value>) -> bool {
    if spec.reveal.is_empty() {
        return true;
    }
    spec.reveal.iter().any(|trigger| {
        values.get(trigger.controller).and_then(Value::as_str) == Some(trigger.value)
            && field(trigger.controller).is_some_and(|controller| is_visible(controller, values))
    })
}

/// A section with the fields currently shown and their values.
#[derive(Debug, Clone)]
pub struct VisibleSection {
    pub section: &'static Section,
    pub fields: Vec<(&'static FieldSpec, Value)>,
}

/// Visible fields grouped by section, in registry order.
pub fn visible_fields(record: &FormRecord) -> Result<Vec<VisibleSection>, CoreError> {
    let mut values = record.to_fields()?;
    let visible: Vec<(&'static Section, Vec<&'static FieldSpec>)> = sections()
        .iter()
        .map(|section| {
            let shown = section
                .fields
                .iter()
                .filter(|f| is_visible(f, &values))
                .collect();
            (section, shown)
        })
        .collect();

    visible
        .into_iter()
        .map(|(section, specs)| {
            let fields = specs
                .into_iter()
                .map(|spec| {
                    let value = values
                        .remove(spec.name)
                        .ok_or_else(|| CoreError::UnknownField(spec.name.to_string()))?;
                    Ok((spec, value))
                })
                .collect::<Result<Vec<_>, CoreError>>()?;
            Ok(VisibleSection { section, fields })
        })
        .collect()
}
