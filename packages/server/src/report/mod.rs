//! Fixed-layout dataset report.
//!
//! Rendering is split in two: [`ReportRenderer`] places text lines on pages
//! following a [`ReportLayout`], and [`ReportDocument::to_pdf`] encodes the
//! result. Page breaks are decided entirely by the layout policy.

mod pdf;

use chrono::{DateTime, Utc};

use crate::store::{DatasetRecord, ItemRecord};

pub use pdf::ReportError;

/// Coordinates are PDF points with the origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    pub page_width: i64,
    pub page_height: i64,
    pub font_size: i64,
    pub margin_left: i64,
    /// Baseline of the title line.
    pub header_top: i64,
    /// Distance between consecutive header lines.
    pub header_step: i64,
    /// Baseline of the "Equipment Details" section header.
    pub details_top: i64,
    /// Gap between the section header and the first item line.
    pub details_gap: i64,
    /// Distance between consecutive item lines.
    pub line_step: i64,
    /// Cursor position after a page break.
    pub page_top: i64,
    /// A cursor below this value ends the page.
    pub page_bottom: i64,
    /// Maximum number of items listed.
    pub detail_limit: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        // US Letter, Helvetica 12.
        Self {
            page_width: 612,
            page_height: 792,
            font_size: 12,
            margin_left: 100,
            header_top: 750,
            header_step: 20,
            details_top: 600,
            details_gap: 20,
            line_step: 15,
            page_top: 750,
            page_bottom: 100,
            detail_limit: 10,
        }
    }
}

impl ReportLayout {
    pub fn with_detail_limit(mut self, detail_limit: usize) -> Self {
        self.detail_limit = detail_limit;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: i64,
    pub y: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

/// Laid-out report, ready to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub page_width: i64,
    pub page_height: i64,
    pub font_size: i64,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// All text lines in drawing order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}

/// Places text on pages. A break only takes effect once another line is
/// drawn, so a break after the final line never yields a blank page.
struct Canvas {
    pages: Vec<Page>,
    break_pending: bool,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            break_pending: false,
        }
    }

    fn draw(&mut self, x: i64, y: i64, text: String) {
        if self.break_pending {
            self.pages.push(Page::default());
            self.break_pending = false;
        }
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine { x, y, text });
        }
    }

    fn break_page(&mut self) {
        self.break_pending = true;
    }
}

pub struct ReportRenderer {
    layout: ReportLayout,
}

impl ReportRenderer {
    pub fn new(layout: ReportLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Lay out the report for `dataset`.
    ///
    /// `items` must be in store order; only the first `detail_limit` are
    /// listed. Averages come from the header and are never recomputed.
    pub fn render(&self, dataset: &DatasetRecord, items: &[ItemRecord]) -> ReportDocument {
        let layout = &self.layout;
        let x = layout.margin_left;
        let mut canvas = Canvas::new();

        let header = [
            format!("Equipment Parameter Report: {}", dataset.file_name),
            format!("Date: {}", format_timestamp(&dataset.uploaded_at)),
            format!("Total Equipment: {}", dataset.total_count),
            format!("Avg Flowrate: {}", format_average(dataset.avg_flowrate)),
            format!("Avg Pressure: {}", format_average(dataset.avg_pressure)),
            format!("Avg Temperature: {}", format_average(dataset.avg_temperature)),
        ];
        let mut y = layout.header_top;
        for line in header {
            canvas.draw(x, y, line);
            y -= layout.header_step;
        }

        let mut y = layout.details_top;
        canvas.draw(
            x,
            y,
            format!("Equipment Details (First {}):", layout.detail_limit),
        );
        y -= layout.details_gap;

        for item in items.iter().take(layout.detail_limit) {
            canvas.draw(x, y, item_line(item));
            y -= layout.line_step;
            if y < layout.page_bottom {
                canvas.break_page();
                y = layout.page_top;
            }
        }

        ReportDocument {
            page_width: layout.page_width,
            page_height: layout.page_height,
            font_size: layout.font_size,
            pages: canvas.pages,
        }
    }
}

fn format_average(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn item_line(item: &ItemRecord) -> String {
    format!(
        "{} - {}: {} F, {} P, {} T",
        item.name,
        item.kind,
        format_reading(item.flowrate),
        format_reading(item.pressure),
        format_reading(item.temperature),
    )
}

/// Microseconds are printed only when non-zero.
fn format_timestamp(at: &DateTime<Utc>) -> String {
    if at.timestamp_subsec_micros() == 0 {
        at.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}

/// Shortest round-trip digits. Decimal notation, always with a fractional
/// part, for exponents -4..16 (`10.0`, `0.0001`); scientific with a signed
/// two-digit exponent otherwise (`1e-05`, `1.5e+16`).
fn format_reading(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let decimal = value.to_string();
        if decimal.contains('.') {
            decimal
        } else {
            format!("{decimal}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}
