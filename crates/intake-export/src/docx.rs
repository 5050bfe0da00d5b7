use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use crate::dump::{DumpEntry, FormDump};
use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// Generate a DOCX document with one heading per section and one
/// `label: value` paragraph per entry.
pub fn generate_docx(dump: &FormDump, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("Title", "title", styles.title_size))
        .add_style(heading_style("Heading1", "heading 1", styles.section_size));

    docx = docx
        .add_paragraph(
            heading_paragraph(&dump.title, "Title").align(AlignmentType::Center),
        )
        .add_paragraph(
            body_paragraph(
                &DumpEntry {
                    label: "Data de preenchimento".to_string(),
                    value: dump.fill_date.clone(),
                },
                styles,
            )
            .align(AlignmentType::Center),
        );

    for section in &dump.sections {
        docx = docx.add_paragraph(heading_paragraph(&section.title.to_uppercase(), "Heading1"));
        for entry in &section.entries {
            docx = docx.add_paragraph(body_paragraph(entry, styles));
        }
    }

    docx = docx.add_paragraph(Paragraph::new()).add_paragraph(
        Paragraph::new().align(AlignmentType::Center).add_run(
            Run::new()
                .add_text("Documento gerado automaticamente pelo sistema")
                .italic()
                .fonts(RunFonts::new().ascii(&styles.body_font)),
        ),
    );

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
        .bold()
}

fn heading_paragraph(text: &str, style_id: &str) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text))
}

fn body_paragraph(entry: &DumpEntry, styles: &DocumentStyles) -> Paragraph {
    let fonts = RunFonts::new().ascii(&styles.body_font);
    let size = styles.body_size * 2;
    Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(
            Run::new()
                .add_text(format!("{}: ", entry.label))
                .bold()
                .size(size)
                .fonts(fonts.clone()),
        )
        .add_run(Run::new().add_text(&entry.value).size(size).fonts(fonts))
}
