//! Heat sheet PDF generation.
//!
//! Collects the per-event text files of a meet, lays them out in two columns
//! on letter pages and writes a PDF using the standard Courier fonts.
//!
//! ## Layout
//!
//! - Page: 8.5 × 11 in, columns 3.5 in wide starting at 0.5 in and 4.5 in
//! - Body from 0.5 in to 10.5 in, 8 pt type on 10 pt leading (72 lines)
//! - One blank line between events; an event that would straddle a column
//!   break starts a fresh column instead, unless it is taller than a column
//! - Meet name header and `Page k of N` footer on every page

use crate::event::{BOLD_CLOSE, BOLD_OPEN};
use crate::{Error, Result};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use std::path::{Path, PathBuf};

const POINTS_PER_INCH: f32 = 72.0;
const PAGE_WIDTH: f32 = 8.5 * POINTS_PER_INCH;
const PAGE_HEIGHT: f32 = 11.0 * POINTS_PER_INCH;
const COLUMN_X: [f32; 2] = [0.5 * POINTS_PER_INCH, 4.5 * POINTS_PER_INCH];
const BODY_TOP: f32 = 10.5 * POINTS_PER_INCH;
const BODY_BOTTOM: f32 = 0.5 * POINTS_PER_INCH;
const HEADER_Y: f32 = 10.65 * POINTS_PER_INCH;
const FOOTER_Y: f32 = 0.25 * POINTS_PER_INCH;

const FONT_SIZE: f32 = 8.0;
const HEADER_FONT_SIZE: f32 = 10.0;
const LEADING: f32 = 10.0;

/// Courier advance width as a fraction of the font size
const COURIER_ADVANCE: f32 = 0.6;

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");
const FONT_ITALIC: Name<'static> = Name(b"F3");

/// Lines that fit in one column
pub const LINES_PER_COLUMN: usize = ((BODY_TOP - BODY_BOTTOM) / LEADING) as usize;

/// File name of an event's text output
pub fn event_file_name(meet_name: &str, event_number: u32) -> String {
    format!("{} - Event #{}.txt", file_safe(meet_name), event_number)
}

fn file_safe(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect()
}

/// Find a meet's event files in `dir`, ordered by event number
pub fn discover_event_files(dir: &Path, meet_name: &str) -> Result<Vec<(u32, PathBuf)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let prefix = format!("{} - Event #", file_safe(meet_name));
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let number = file_name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".txt"))
            .and_then(|digits| digits.parse::<u32>().ok());
        if let Some(number) = number {
            files.push((number, path));
        }
    }

    files.sort_by_key(|(number, _)| *number);
    Ok(files)
}

/// One line of heat sheet text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub bold: bool,
}

impl Line {
    fn blank() -> Self {
        Self {
            text: String::new(),
            bold: false,
        }
    }

    /// Strip bold markup from a line of event text
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim_end_matches(['\r', '\n']);
        match raw
            .strip_prefix(BOLD_OPEN)
            .and_then(|rest| rest.strip_suffix(BOLD_CLOSE))
        {
            Some(inner) => Self {
                text: inner.to_string(),
                bold: true,
            },
            None => Self {
                text: raw.to_string(),
                bold: false,
            },
        }
    }
}

/// Split event blocks into columns of at most `LINES_PER_COLUMN` lines
pub fn layout_columns(blocks: &[Vec<Line>]) -> Vec<Vec<Line>> {
    let mut columns: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for block in blocks {
        let separator = usize::from(!current.is_empty());
        let fits_here = current.len() + separator + block.len() <= LINES_PER_COLUMN;
        let fits_fresh = block.len() <= LINES_PER_COLUMN;

        if fits_here {
            if separator == 1 {
                current.push(Line::blank());
            }
            current.extend(block.iter().cloned());
            continue;
        }

        if fits_fresh {
            columns.push(std::mem::take(&mut current));
            current.extend(block.iter().cloned());
            continue;
        }

        // Taller than a column: flow it line by line
        if separator == 1 {
            current.push(Line::blank());
        }
        for line in block {
            if current.len() == LINES_PER_COLUMN {
                columns.push(std::mem::take(&mut current));
            }
            current.push(line.clone());
        }
    }

    if !current.is_empty() {
        columns.push(current);
    }
    columns
}

/// Read a meet's event files and render the heat sheet PDF
pub fn build_heat_sheet(dir: &Path, meet_name: &str) -> Result<Vec<u8>> {
    let files = discover_event_files(dir, meet_name)?;
    if files.is_empty() {
        return Err(Error::Report(format!(
            "no event files for '{}' in {}",
            meet_name,
            dir.display()
        )));
    }

    let mut blocks = Vec::with_capacity(files.len());
    for (number, path) in &files {
        let text = std::fs::read_to_string(path)?;
        let block: Vec<Line> = text.lines().map(Line::parse).collect();
        tracing::debug!("Event #{}: {} lines", number, block.len());
        blocks.push(block);
    }

    let columns = layout_columns(&blocks);
    tracing::info!(
        "Laid out {} events in {} columns",
        files.len(),
        columns.len()
    );
    Ok(render_pdf(meet_name, &columns))
}

/// Build the heat sheet and write it to `out`
pub fn write_heat_sheet(dir: &Path, meet_name: &str, out: &Path) -> Result<PathBuf> {
    let bytes = build_heat_sheet(dir, meet_name)?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, bytes)?;
    tracing::info!("Wrote heat sheet to {:?}", out);
    Ok(out.to_path_buf())
}

fn render_pdf(meet_name: &str, columns: &[Vec<Line>]) -> Vec<u8> {
    let pages: Vec<&[Vec<Line>]> = columns.chunks(COLUMN_X.len()).collect();
    let page_count = pages.len().max(1);

    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let page_tree_id = alloc();
    let info_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let italic_id = alloc();
    let page_ids: Vec<(Ref, Ref)> = (0..page_count).map(|_| (alloc(), alloc())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_count as i32);
    pdf.document_info(info_id).title(TextStr(meet_name));

    pdf.type1_font(regular_id).base_font(Name(b"Courier"));
    pdf.type1_font(bold_id).base_font(Name(b"Courier-Bold"));
    pdf.type1_font(italic_id).base_font(Name(b"Courier-Oblique"));

    for (index, (page_id, content_id)) in page_ids.iter().enumerate() {
        {
            let mut page = pdf.page(*page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(page_tree_id);
            page.contents(*content_id);
            page.resources()
                .fonts()
                .pair(FONT_REGULAR, regular_id)
                .pair(FONT_BOLD, bold_id)
                .pair(FONT_ITALIC, italic_id);
        }

        let mut content = Content::new();
        write_centered(&mut content, meet_name, HEADER_FONT_SIZE, HEADER_Y);
        write_centered(
            &mut content,
            &format!("Page {} of {}", index + 1, page_count),
            FONT_SIZE,
            FOOTER_Y,
        );

        let page_columns = pages.get(index).copied().unwrap_or(&[]);
        for (column, x) in page_columns.iter().zip(COLUMN_X) {
            for (row, line) in column.iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let y = BODY_TOP - LEADING * (row as f32 + 1.0);
                let font = if line.bold { FONT_BOLD } else { FONT_REGULAR };
                write_text(&mut content, font, FONT_SIZE, x, y, &line.text);
            }
        }

        pdf.stream(*content_id, &content.finish());
    }

    pdf.finish()
}

fn write_centered(content: &mut Content, text: &str, size: f32, y: f32) {
    let width = text.chars().count() as f32 * size * COURIER_ADVANCE;
    let x = ((PAGE_WIDTH - width) / 2.0).max(0.0);
    write_text(content, FONT_ITALIC, size, x, y, text);
}

fn write_text(content: &mut Content, font: Name, size: f32, x: f32, y: f32, text: &str) {
    let encoded = encode_latin(text);
    content.begin_text();
    content.set_font(font, size);
    content.next_line(x, y);
    content.show(Str(&encoded));
    content.end_text();
}

/// Standard Type 1 fonts only cover Latin text; anything else prints as '?'
fn encode_latin(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect()
}
