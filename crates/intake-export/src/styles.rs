use serde::{Deserialize, Serialize};

/// Document styling shared by the PDF and DOCX layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Font for body text in DOCX output. PDF output always uses the
    /// standard Helvetica faces.
    pub body_font: String,

    /// Document title size in points.
    pub title_size: usize,

    /// Section heading size in points.
    pub section_size: usize,

    /// Label/value line size in points.
    pub body_size: usize,

    /// Extra space between lines, as a fraction of the font size.
    pub line_spacing: f64,

    /// Page margin in millimetres (applied uniformly).
    pub margin_mm: f64,
}

impl DocumentStyles {
    pub fn margin_points(&self) -> f64 {
        self.margin_mm * 72.0 / 25.4
    }

    pub fn line_height(&self, size: usize) -> f64 {
        size as f64 * (1.0 + self.line_spacing)
    }
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Arial".to_string(),
            title_size: 16,
            section_size: 12,
            body_size: 10,
            line_spacing: 0.4,
            margin_mm: 20.0,
        }
    }
}
