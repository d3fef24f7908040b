//! Paginated PDF page writer
//!
//! Positions are tracked top-down in millimetres from the top margin, the
//! way the text flows, and converted to PDF's bottom-up coordinates only
//! when drawing.

use crate::config::LayoutConfig;
use crate::error::Result;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

/// Points to millimetres.
const PT_TO_MM: f32 = 0.3528;
/// Vertical advance per wrapped line, as a fraction of the font size.
const LINE_ADVANCE: f32 = 0.5;
/// Extra gap after every text block.
const BLOCK_GAP_MM: f32 = 5.0;
const RULE_THICKNESS: f32 = 0.5;
const BOLD_WIDTH_FACTOR: f32 = 1.06;

/// Text colour. PDF output is monochrome apart from secondary grey text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Primary,
    Muted,
}

impl Tone {
    fn color(self) -> Color {
        let level = match self {
            Tone::Primary => 0.0,
            Tone::Muted => 100.0 / 255.0,
        };
        Color::Rgb(Rgb::new(level, level, level, None))
    }
}

pub struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page_width: f32,
    page_height: f32,
    margin: f32,
    cursor: f32,
    page_count: usize,
}

impl PageWriter {
    pub fn new(title: &str, layout: &LayoutConfig) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(layout.page_width_mm),
            Mm(layout.page_height_mm),
            "Layer 1",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            page_width: layout.page_width_mm,
            page_height: layout.page_height_mm,
            margin: layout.margin_mm,
            cursor: layout.margin_mm,
            page_count: 1,
        })
    }

    pub fn text_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn advance(&mut self, mm: f32) {
        self.cursor += mm;
    }

    /// Start a new page when the cursor is within `reserve` of the bottom margin.
    pub fn ensure_room(&mut self, reserve: f32) {
        if self.cursor > self.page_height - self.margin - reserve {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.page_width), Mm(self.page_height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = self.margin;
        self.page_count += 1;
    }

    /// Wrap `text` to the text width and draw it, breaking pages as needed.
    pub fn add_text(&mut self, text: &str, size: f32, bold: bool, tone: Tone) {
        if text.trim().is_empty() {
            return;
        }

        let text = pdf_safe(text);
        let lines = wrap_text(&text, size, bold, self.text_width());

        self.layer.set_fill_color(tone.color());
        for line in lines {
            self.ensure_room(0.0);
            let font = if bold { &self.bold } else { &self.regular };
            self.layer.use_text(
                line,
                size,
                Mm(self.margin),
                Mm(self.page_height - self.cursor),
                font,
            );
            self.cursor += size * LINE_ADVANCE;
        }
        self.cursor += BLOCK_GAP_MM;
    }

    /// Horizontal rule across the text width, `offset` above the cursor.
    pub fn add_rule(&mut self, offset: f32) {
        let y = Mm(self.page_height - (self.cursor - offset));
        self.layer.set_outline_color(Tone::Primary.color());
        self.layer.set_outline_thickness(RULE_THICKNESS);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(self.margin), y), false),
                (Point::new(Mm(self.page_width - self.margin), y), false),
            ],
            is_closed: false,
        });
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Approximate Helvetica advance width in em.
fn glyph_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' | '!' => 0.25,
        ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '/' | '-' => 0.32,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.56,
        _ => 0.53,
    }
}

/// Estimated rendered width of `text` in millimetres.
pub fn measure(text: &str, size: f32, bold: bool) -> f32 {
    let em: f32 = text.chars().map(glyph_em).sum();
    let factor = if bold { BOLD_WIDTH_FACTOR } else { 1.0 };
    em * size * PT_TO_MM * factor
}

/// Greedy word wrap. Words wider than the line are split by character.
pub fn wrap_text(text: &str, size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };

            if measure(&candidate, size, bold) <= max_width {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            let mut chunk = String::new();
            for c in word.chars() {
                chunk.push(c);
                if measure(&chunk, size, bold) > max_width && chunk.chars().count() > 1 {
                    chunk.pop();
                    lines.push(std::mem::take(&mut chunk));
                    chunk.push(c);
                }
            }
            line = chunk;
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Builtin PDF fonts only cover WinAnsi; map common typography to ASCII
/// and drop anything else that cannot be encoded.
pub fn pdf_safe(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '•' | '▪' | '●' | '◦' => Some('-'),
            '\u{2018}' | '\u{2019}' | '\u{201B}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => Some('-'),
            '\u{00A0}' | '\t' => Some(' '),
            c if c.is_ascii() && !c.is_ascii_control() => Some(c),
            c if ('\u{00A1}'..='\u{00FF}').contains(&c) => Some(c),
            _ => None,
        })
        .collect()
}
