//! intake-export
//!
//! Document artifacts for a filled form: PDF, DOCX and HTML, all built from
//! the same field dump so every format lists the same lines.

pub mod docx;
pub mod dump;
pub mod error;
pub mod pdf;
pub mod render;
pub mod styles;

use serde::{Deserialize, Serialize};
use tracing::info;

use intake_core::models::record::FormRecord;

use dump::FormDump;
use error::ExportError;
use styles::DocumentStyles;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Docx,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Html => "html",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

/// A rendered document ready for download or attachment.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Render `record` in the requested format.
pub fn export(
    record: &FormRecord,
    format: ExportFormat,
    styles: &DocumentStyles,
) -> Result<Artifact, ExportError> {
    let dump = FormDump::from_record(record)?;
    let bytes = match format {
        ExportFormat::Pdf => pdf::generate_pdf(&dump, styles)?,
        ExportFormat::Docx => docx::generate_docx(&dump, styles)?,
        ExportFormat::Html => render::render_html(&dump, jiff::Timestamp::now())?.into_bytes(),
    };
    let file_name = file_name(&record.identification.full_name, format);
    info!(file_name = %file_name, size = bytes.len(), "document exported");
    Ok(Artifact {
        bytes,
        content_type: format.content_type(),
        file_name,
    })
}

/// `ficha-medica-<slug>.<ext>`.
pub fn file_name(full_name: &str, format: ExportFormat) -> String {
    format!("ficha-medica-{}.{}", slug(full_name), format.extension())
}

/// Lowercase ASCII slug with accents folded and runs of anything else
/// collapsed to a single `-`.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        let folded = match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            c => c,
        };
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(folded);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        "paciente".to_string()
    } else {
        out
    }
}
