//! Programmatic PDF layout: text lines on A4 pages using the standard
//! Helvetica faces, so no font files are embedded.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::dump::FormDump;
use crate::error::ExportError;
use crate::styles::DocumentStyles;

/// A4 in points.
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;

/// Average Helvetica glyph width as a fraction of the font size. Good
/// enough for wrapping; lines come out slightly short rather than long.
const AVG_GLYPH_WIDTH: f64 = 0.52;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

const FOOTER: &str = "Documento gerado automaticamente pelo sistema";

/// Generate a PDF listing every entry of the dump, section by section.
pub fn generate_pdf(dump: &FormDump, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut layout = Layout::new(styles);

    layout.centered(BOLD, styles.title_size, &dump.title);
    layout.centered(
        REGULAR,
        styles.body_size,
        &format!("Data de preenchimento: {}", dump.fill_date),
    );
    layout.gap(styles.body_size);

    for section in &dump.sections {
        // Keep a heading together with at least its first line.
        layout.ensure_space(
            styles.line_height(styles.section_size) + styles.line_height(styles.body_size),
        );
        layout.gap(styles.body_size / 2);
        layout.paragraph(BOLD, styles.section_size, &section.title.to_uppercase(), 0.0);
        for entry in &section.entries {
            let line = format!("{}: {}", entry.label, entry.value);
            layout.paragraph(REGULAR, styles.body_size, &line, 8.0);
        }
    }

    build_document(layout.finish())
}

struct Layout<'a> {
    styles: &'a DocumentStyles,
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f64,
}

impl<'a> Layout<'a> {
    fn new(styles: &'a DocumentStyles) -> Self {
        Self {
            styles,
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - styles.margin_points(),
        }
    }

    fn margin(&self) -> f64 {
        self.styles.margin_points()
    }

    fn usable_width(&self) -> f64 {
        PAGE_WIDTH - 2.0 * self.margin()
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT - self.margin();
    }

    /// Start a new page unless `height` more points fit above the footer.
    fn ensure_space(&mut self, height: f64) {
        let floor = self.margin() + self.styles.line_height(self.styles.body_size);
        if self.y - height < floor {
            self.new_page();
        }
    }

    fn gap(&mut self, points: usize) {
        self.y -= points as f64;
    }

    fn text_at(&mut self, font: &str, size: usize, x: f64, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), (size as i64).into()]),
            Operation::new(
                "Td",
                vec![(x.round() as i64).into(), (self.y.round() as i64).into()],
            ),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn centered(&mut self, font: &str, size: usize, text: &str) {
        let line_height = self.styles.line_height(size);
        self.ensure_space(line_height);
        self.y -= line_height;
        let width = text_width(text, size);
        let x = ((PAGE_WIDTH - width) / 2.0).max(self.margin());
        self.text_at(font, size, x, text);
    }

    /// Wrapped text starting at the left margin plus `indent`.
    fn paragraph(&mut self, font: &str, size: usize, text: &str, indent: f64) {
        let line_height = self.styles.line_height(size);
        let max_chars = max_chars(self.usable_width() - indent, size);
        for line in wrap(text, max_chars) {
            self.ensure_space(line_height);
            self.y -= line_height;
            let x = self.margin() + indent;
            self.text_at(font, size, x, &line);
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }

        let total = self.pages.len();
        let size = self.styles.body_size.saturating_sub(2).max(6);
        let y = (self.margin() / 2.0).round() as i64;
        let margin = self.margin().round() as i64;
        for (i, page) in self.pages.iter_mut().enumerate() {
            let number = format!("Página {} de {}", i + 1, total);
            let number_x = (PAGE_WIDTH - self.styles.margin_points() - text_width(&number, size))
                .round() as i64;
            for (x, text) in [(margin, FOOTER.to_string()), (number_x, number)] {
                page.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![REGULAR.into(), (size as i64).into()]),
                    Operation::new("Td", vec![x.into(), y.into()]),
                    Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&text))]),
                    Operation::new("ET", vec![]),
                ]);
            }
        }
        self.pages
    }
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id);
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
        "Count" => kids.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), (PAGE_WIDTH as i64).into(), (PAGE_HEIGHT as i64).into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buf)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_width(text: &str, size: usize) -> f64 {
    text.chars().count() as f64 * size as f64 * AVG_GLYPH_WIDTH
}

fn max_chars(width: f64, size: usize) -> usize {
    ((width / (size as f64 * AVG_GLYPH_WIDTH)).floor() as usize).max(1)
}

/// Greedy word wrap on character counts. Words longer than a line are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in raw_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if len == 0 { word.len() } else { len + 1 + word.len() };
            if needed > max_chars && len > 0 {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(word.iter());
            len += word.len();
        }
        if len > 0 {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Map text onto the WinAnsi code page used by the standard fonts.
/// Latin-1 maps through; a few typographic marks have their own slots and
/// anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{20AC}' => 0x80,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}
