use std::path::Path;

use color_eyre::{eyre::WrapErr, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::models::AnswerSet;

// A3 portrait.
const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 420.0;
const MARGIN_MM: f32 = 10.0;
const ROW_HEIGHT_MM: f32 = 10.0;
const BASELINE_OFFSET_MM: f32 = 3.0;
const FONT_SIZE_PT: f32 = 16.0;
const LAYER_NAME: &str = "Answers";

const ROWS_PER_PAGE: usize = ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / ROW_HEIGHT_MM) as usize;
// Average glyph width taken as 0.55 em; 1 pt = 0.3528 mm.
const CHARS_PER_ROW: usize =
    ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / (FONT_SIZE_PT * 0.3528 * 0.55)) as usize;

/// Lays out an [`AnswerSet`] as a PDF: a `Question:` row then an `Answer:` row per pair.
pub struct PdfRenderer {
    font: Option<Vec<u8>>,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfRenderer {
    /// Renderer using the built-in Helvetica font.
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Whether a TrueType font is embedded. Without one only WinAnsi text survives.
    pub fn embeds_font(&self) -> bool {
        self.font.is_some()
    }

    /// Renderer embedding a TrueType font, for text Helvetica cannot show.
    pub fn with_font_file(path: &Path) -> Result<Self> {
        let font = std::fs::read(path)
            .wrap_err_with(|| format!("could not read font file {}", path.display()))?;
        Ok(Self { font: Some(font) })
    }

    pub fn render(&self, answers: &AnswerSet) -> Result<Vec<u8>> {
        let title = format!("Answers for quiz {}", answers.quiz_id);
        let (doc, first_page, first_layer) = PdfDocument::new(
            &title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );

        let font = match &self.font {
            Some(bytes) => doc
                .add_external_font(bytes.as_slice())
                .wrap_err("could not load font")?,
            None => doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .wrap_err("could not load built-in font")?,
        };

        let rows = rows(answers);
        if !self.embeds_font() {
            let lossy = rows.iter().filter(|row| !builtin_font_can_show(row)).count();
            if lossy > 0 {
                tracing::warn!(
                    "{lossy} rows for quiz {} contain characters Helvetica cannot show; configure a font",
                    answers.quiz_id
                );
            }
        }

        let pages = paginate(rows);
        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        for (n, page) in pages.iter().enumerate() {
            if n > 0 {
                let (page_idx, layer_idx) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
                layer = doc.get_page(page_idx).get_layer(layer_idx);
            }

            for (i, row) in page.iter().enumerate() {
                let y = PAGE_HEIGHT_MM - MARGIN_MM - (i as f32 + 1.0) * ROW_HEIGHT_MM
                    + BASELINE_OFFSET_MM;
                layer.use_text(row.as_str(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
            }
        }

        tracing::debug!(
            "rendered {} answers for quiz {} on {} pages",
            answers.len(),
            answers.quiz_id,
            pages.len()
        );

        doc.save_to_bytes().wrap_err("could not serialize pdf")
    }
}

fn rows(answers: &AnswerSet) -> Vec<String> {
    answers
        .iter()
        .flat_map(|pair| {
            let mut rows = wrap(&format!("Question: {}", pair.question), CHARS_PER_ROW);
            rows.extend(wrap(&format!("Answer: {}", pair.answer), CHARS_PER_ROW));
            rows
        })
        .collect()
}

/// Whether every char has a WinAnsi (CP1252) code, the encoding of the built-in fonts.
fn builtin_font_can_show(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}')
            || "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ".contains(c)
    })
}

/// Split rows into pages. There is always at least one page, possibly empty.
fn paginate(rows: Vec<String>) -> Vec<Vec<String>> {
    if rows.is_empty() {
        return vec![Vec::new()];
    }
    rows.chunks(ROWS_PER_PAGE).map(<[String]>::to_vec).collect()
}

/// Greedy word wrap on whitespace. Words longer than `width` are cut.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    rows.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                rows.push(word.into_iter().collect());
                word = rest;
            }

            if current_len > 0 && current_len + 1 + word.len() > width {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        rows.push(current);
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}
