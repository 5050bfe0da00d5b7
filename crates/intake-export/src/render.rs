use serde::Serialize;
use tera::{Context, Tera};

use intake_core::models::record::FormRecord;

use crate::dump::{self, FormDump, NOT_INFORMED};
use crate::error::ExportError;

// Names end in .html so Tera autoescapes patient-typed text.
const FORM_TEMPLATE: &str = "form.html";
const NOTIFICATION_TEMPLATE: &str = "notification.html";

fn templates() -> Result<Tera, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (FORM_TEMPLATE, include_str!("../templates/form.html.tera")),
        (
            NOTIFICATION_TEMPLATE,
            include_str!("../templates/notification.html.tera"),
        ),
    ])
    .map_err(|e| ExportError::TemplateParse(e.to_string()))?;
    Ok(tera)
}

/// Timestamps in documents are shown as UTC wall-clock time.
pub fn display_timestamp(at: jiff::Timestamp) -> String {
    at.strftime("%d/%m/%Y %H:%M UTC").to_string()
}

/// Render the full form as a standalone HTML document.
pub fn render_html(dump: &FormDump, generated_at: jiff::Timestamp) -> Result<String, ExportError> {
    let tera = templates()?;
    let mut context = Context::new();
    context.insert("dump", dump);
    context.insert("generated_at", &display_timestamp(generated_at));
    Ok(tera.render(FORM_TEMPLATE, &context)?)
}

/// Header block of the notification email.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationSummary {
    pub full_name: String,
    pub birth_date: String,
    pub submitted_at: String,
    pub age: String,
    pub referral_source: String,
    pub referred_by: String,
}

impl NotificationSummary {
    pub fn new(record: &FormRecord, submitted_at: jiff::Timestamp) -> Self {
        let ident = &record.identification;
        let or_blank = |s: &str| {
            let s = s.trim();
            if s.is_empty() {
                NOT_INFORMED.to_string()
            } else {
                s.to_string()
            }
        };
        Self {
            full_name: or_blank(&ident.full_name),
            birth_date: dump::display_date(&ident.birth_date),
            submitted_at: display_timestamp(submitted_at),
            age: if ident.age > 0 {
                ident.age.to_string()
            } else {
                NOT_INFORMED.to_string()
            },
            referral_source: or_blank(&ident.referral_source),
            referred_by: or_blank(&ident.referred_by),
        }
    }
}

pub fn notification_subject(full_name: &str) -> String {
    format!("Novo Formulário Médico - {}", full_name.trim())
}

/// Render the notification email body: a summary followed by the form.
pub fn render_notification(
    summary: &NotificationSummary,
    form_html: &str,
) -> Result<String, ExportError> {
    let tera = templates()?;
    let mut context = Context::new();
    context.insert("summary", summary);
    context.insert("form_html", form_html);
    Ok(tera.render(NOTIFICATION_TEMPLATE, &context)?)
}
