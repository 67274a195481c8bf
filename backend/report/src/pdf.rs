//! PDF report writer.
//!
//! Lays the markdown summary out as plain text with a builtin font; no
//! typography beyond headings rendered larger. Output files carry a random
//! suffix and are never reused across runs.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::info;
use uuid::Uuid;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 14.0;
const LINE_HEIGHT_MM: f32 = 5.5;

/// Longest line that fits the page at body size; longer lines are wrapped.
const WRAP_COLUMNS: usize = 95;

/// Write the summary as a PDF into `output_dir`, returning the file path.
pub fn write_pdf(markdown: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create report dir: {}", output_dir.display()))?;

    let suffix = Uuid::new_v4().simple().to_string();
    let path = output_dir.join(format!("mindgauge-report-{}.pdf", &suffix[..8]));

    let (doc, page1, layer1) =
        PdfDocument::new("MindGauge Report", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "body");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("Failed to load builtin font")?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("Failed to load builtin font")?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for raw_line in markdown.lines() {
        let (text, size, font_ref) = if let Some(rest) = raw_line.strip_prefix("## ") {
            (rest.to_string(), HEADING_SIZE, &bold)
        } else if let Some(rest) = raw_line.strip_prefix("# ") {
            (rest.to_string(), HEADING_SIZE + 2.0, &bold)
        } else {
            (plain_text_line(raw_line), BODY_SIZE, &font)
        };

        for wrapped in wrap_line(&text, WRAP_COLUMNS) {
            if y < MARGIN_MM {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "body");
                layer = doc.get_page(page).get_layer(new_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            layer.use_text(wrapped, size, Mm(MARGIN_MM), Mm(y), font_ref);
            y -= LINE_HEIGHT_MM;
        }
    }

    let file = File::create(&path)
        .with_context(|| format!("Failed to create PDF file: {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .context("Failed to write PDF document")?;

    info!(path = %path.display(), "Wrote PDF report");
    Ok(path)
}

/// Strip the markdown syntax that would look wrong as raw PDF text.
fn plain_text_line(line: &str) -> String {
    line.replace("**", "")
        .replace("> ", "")
        .replace('_', "")
        .replace('⚠', "!")
}

fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    if line.chars().count() <= columns {
        return vec![line.to_string()];
    }
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > columns {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
