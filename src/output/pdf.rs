//! PDF report generation
//!
//! The PDF report is laid out from the HTML report:
//! 1. The HTML is parsed and flattened into styled text blocks
//!    (title, headings, paragraphs, list items, table rows)
//! 2. Blocks are word-wrapped to the printable width
//! 3. Lines are placed top to bottom on fixed-size A4 pages, starting a new
//!    page whenever the next line would cross the bottom margin
//! 4. Pages are written with the built-in Helvetica fonts
//!
//! The built-in fonts only cover printable ASCII. Control and non-ASCII
//! characters are percent-encoded before layout, so an `é` in a link is
//! printed as `%C3%A9`.

use crate::output::report::{ReportError, ReportResult};
use percent_encoding::{utf8_percent_encode, CONTROLS};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use scraper::{ElementRef, Html, Selector};

/// A4 page width
const PAGE_WIDTH_MM: f32 = 210.0;

/// A4 page height
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margin on every side
const MARGIN_MM: f32 = 20.0;

/// Points to millimetres
const PT_TO_MM: f32 = 0.352_778;

/// Average glyph width of Helvetica relative to the font size
const AVERAGE_GLYPH_WIDTH: f32 = 0.55;

/// Line height relative to the font size
const LINE_SPACING: f32 = 1.35;

/// Visual role of a block of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Title,
    Heading,
    Body,
    ListItem,
    TableRow,
}

impl BlockStyle {
    fn font_size(&self) -> f32 {
        match self {
            Self::Title => 18.0,
            Self::Heading => 14.0,
            Self::Body | Self::ListItem | Self::TableRow => 10.0,
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, Self::Title | Self::Heading)
    }

    fn indent_mm(&self) -> f32 {
        match self {
            Self::ListItem | Self::TableRow => 5.0,
            _ => 0.0,
        }
    }

    /// Extra space above the first line of a block
    fn space_before_mm(&self) -> f32 {
        match self {
            Self::Title => 0.0,
            Self::Heading => 4.0,
            _ => 0.0,
        }
    }

    fn line_height_mm(&self) -> f32 {
        self.font_size() * LINE_SPACING * PT_TO_MM
    }

    /// Characters that fit on one line at this style's size and indent
    fn max_chars(&self) -> usize {
        let width_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - self.indent_mm();
        let glyph_mm = self.font_size() * AVERAGE_GLYPH_WIDTH * PT_TO_MM;
        ((width_mm / glyph_mm).floor() as usize).max(1)
    }
}

/// A styled block of text extracted from the HTML report
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub style: BlockStyle,
    pub text: String,
}

/// One line placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub style: BlockStyle,
    pub text: String,
    /// Baseline distance from the bottom edge
    pub y_mm: f32,
}

/// Lines assigned to one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Renders an HTML report into PDF bytes
///
/// # Arguments
///
/// * `html` - The HTML report to lay out
/// * `title` - Document title stored in the PDF metadata
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The PDF document
/// * `Err(ReportError::Render)` - The PDF writer failed
pub fn render_pdf_report(html: &str, title: &str) -> ReportResult<Vec<u8>> {
    let pages = layout(html);
    write_pdf(&pages, &encode_for_font(title))
}

/// Flattens the HTML report and places its lines on pages
pub fn layout(html: &str) -> Vec<Page> {
    let blocks: Vec<TextBlock> = extract_blocks(html)
        .into_iter()
        .map(|block| TextBlock {
            text: encode_for_font(&block.text),
            ..block
        })
        .collect();

    paginate(&blocks)
}

/// Extracts styled text blocks in document order
pub fn extract_blocks(html: &str) -> Vec<TextBlock> {
    let document = Html::parse_document(html);
    let Ok(block_selector) = Selector::parse("body h1, body h2, body p, body li, body tr") else {
        return Vec::new();
    };

    document
        .select(&block_selector)
        .filter_map(|element| {
            let style = match element.value().name() {
                "h1" => BlockStyle::Title,
                "h2" => BlockStyle::Heading,
                "li" => BlockStyle::ListItem,
                "tr" => BlockStyle::TableRow,
                _ => BlockStyle::Body,
            };

            let text = match style {
                BlockStyle::TableRow => row_text(&element),
                BlockStyle::ListItem => list_item_text(&element),
                _ => collapse_whitespace(&element.text().collect::<String>()),
            };

            if text.is_empty() {
                None
            } else {
                Some(TextBlock { style, text })
            }
        })
        .collect()
}

/// Joins the cells of a table row
fn row_text(row: &ElementRef) -> String {
    let Ok(cell_selector) = Selector::parse("th, td") else {
        return String::new();
    };

    row.select(&cell_selector)
        .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
        .collect::<Vec<_>>()
        .join("  |  ")
}

/// Text of a list item; image-only items show their source
fn list_item_text(item: &ElementRef) -> String {
    let text = collapse_whitespace(&item.text().collect::<String>());
    if !text.is_empty() {
        return format!("- {}", text);
    }

    Selector::parse("img[src]")
        .ok()
        .and_then(|img_selector| {
            item.select(&img_selector)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(|src| format!("- Image: {}", src))
        })
        .unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Percent-encodes every character outside printable ASCII
fn encode_for_font(text: &str) -> String {
    utf8_percent_encode(text, CONTROLS).to_string()
}

/// Wraps text at word boundaries; words longer than a line are split
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: &str = word;

        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(max_chars);
            lines.push(head.to_string());
            word = tail;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Places wrapped lines on as many pages as needed
fn paginate(blocks: &[TextBlock]) -> Vec<Page> {
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut pages = vec![Page::default()];
    let mut y = top;

    for block in blocks {
        let height = block.style.line_height_mm();

        for (index, line) in wrap(&block.text, block.style.max_chars()).into_iter().enumerate() {
            let space = if index == 0 && y < top {
                block.style.space_before_mm()
            } else {
                0.0
            };

            if y - space - height < MARGIN_MM {
                pages.push(Page::default());
                y = top;
            } else {
                y -= space;
            }

            y -= height;

            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine {
                    style: block.style,
                    text: line,
                    y_mm: y,
                });
            }
        }
    }

    pages
}

/// Writes laid-out pages as a PDF document
fn write_pdf(pages: &[Page], title: &str) -> ReportResult<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Page 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Render(e.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", index + 1),
            );
            doc.get_page(page_index).get_layer(layer_index)
        };

        for line in &page.lines {
            let font: &IndirectFontRef = if line.style.is_bold() { &bold } else { &regular };
            layer.use_text(
                line.text.as_str(),
                line.style.font_size(),
                Mm(MARGIN_MM + line.style.indent_mm()),
                Mm(line.y_mm),
                font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ReportError::Render(e.to_string()))
}
