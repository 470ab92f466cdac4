use chrono::Local;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::score::ResultRecord;

const SCHOOL_LINE: &str = "Sishya School, Hosur";
const REPORT_LINE: &str = "Focus Assessment Report (SEL)";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// The report body as ordered label/value pairs. The exporter preserves this
/// set and order; page layout is free to change around it.
pub fn report_fields(record: &ResultRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Student Name", record.student_name.clone()),
        ("Class", record.student_class.clone()),
        ("Focus Accuracy (%)", format!("{:.1}", record.accuracy_pct)),
        (
            "Average Reaction Time (sec)",
            format!("{:.2}", record.avg_reaction_secs),
        ),
        ("Focus Level", record.focus_level.to_string()),
        ("SEL Remark", record.focus_level.remark().to_string()),
    ]
}

/// Filename offered for the downloaded report.
pub fn suggested_filename(record: &ResultRecord) -> String {
    format!("{}_Focus_Report.pdf", record.student_name)
}

// Rough centering for builtin Helvetica; printpdf exposes no metrics for
// builtin fonts, and the header only needs to look centered.
fn centered_x(text: &str, size_pt: f32) -> Mm {
    let approx_width_mm = text.len() as f32 * size_pt * 0.5 * 0.3528;
    Mm(((PAGE_WIDTH_MM - approx_width_mm) / 2.0).max(10.0))
}

/// Render a single-page A4 report to PDF bytes: centered school header,
/// report subtitle, then the fields top-down in their fixed order.
pub fn render_pdf(record: &ResultRecord) -> Result<Vec<u8>, printpdf::Error> {
    let (doc, page, layer) = PdfDocument::new(
        REPORT_LINE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "report",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let layer = doc.get_page(page).get_layer(layer);

    layer.use_text(SCHOOL_LINE, 16.0, centered_x(SCHOOL_LINE, 16.0), Mm(PAGE_HEIGHT_MM - 20.0), &bold);
    layer.use_text(REPORT_LINE, 12.0, centered_x(REPORT_LINE, 12.0), Mm(PAGE_HEIGHT_MM - 30.0), &regular);

    let mut y = PAGE_HEIGHT_MM - 50.0;
    for (label, value) in report_fields(record) {
        layer.use_text(format!("{label}: {value}"), 11.0, Mm(28.0), Mm(y), &regular);
        y -= 9.0;
    }

    let generated = format!("Generated on {}", Local::now().format("%d %b %Y"));
    layer.use_text(generated, 9.0, Mm(28.0), Mm(20.0), &regular);

    doc.save_to_bytes()
}
