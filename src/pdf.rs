//! PDF rendering for the customer outstanding report. Enabled by the `pdf`
//! feature; the rest of the crate never depends on it.

use crate::error::{Result, SalesTrackerError};
use crate::report::CustomerSummary;
use chrono::NaiveDate;
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::style::Style;
use genpdf::{Document, Element};
use std::io::Write;
use std::path::Path;

const FONT_FAMILIES: [&str; 3] = ["LiberationSans", "DejaVuSans", "Arial"];

/// Loads the first usable font family from `font_dir`. A missing or unusable
/// font directory degrades to [`SalesTrackerError::ExportUnavailable`] so the
/// caller can fall back to CSV export.
fn load_font(font_dir: &Path) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>> {
    for family in FONT_FAMILIES {
        if let Ok(font) = genpdf::fonts::from_files(font_dir, family, None) {
            return Ok(font);
        }
    }
    Err(SalesTrackerError::ExportUnavailable(format!(
        "No usable font family found in {}",
        font_dir.display()
    )))
}

fn configure_document(font_dir: &Path) -> Result<Document> {
    let font_family = load_font(font_dir)?;
    let mut doc = Document::new(font_family);
    doc.set_title("Customer Outstanding Report");
    doc.set_font_size(10);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

/// Renders the customer outstanding table as a PDF: title, as-of date, a
/// framed two-column table, and a bold total row.
pub fn write_outstanding_pdf<W: Write>(
    customers: &[CustomerSummary],
    as_of: NaiveDate,
    font_dir: &Path,
    mut writer: W,
) -> Result<()> {
    let mut doc = configure_document(font_dir)?;

    doc.push(Paragraph::new("Customer Outstanding Report").styled(Style::new().bold().with_font_size(14)));
    doc.push(Paragraph::new(format!("As of {}", as_of.format("%Y-%m-%d"))));
    doc.push(Break::new(1));

    let mut table = TableLayout::new(vec![3, 2]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header = table.row();
    header.push_element(Paragraph::new("Customer Name").styled(Style::new().bold()));
    header.push_element(Paragraph::new("Outstanding Amount").styled(Style::new().bold()));
    header
        .push()
        .map_err(|e| SalesTrackerError::DocumentRender(e.to_string()))?;

    let mut total = rust_decimal::Decimal::ZERO;
    for customer in customers {
        total += customer.outstanding_amount;
        let mut row = table.row();
        row.push_element(Paragraph::new(customer.customer_name.clone()));
        row.push_element(Paragraph::new(
            customer.outstanding_amount.round_dp(2).to_string(),
        ));
        row.push()
            .map_err(|e| SalesTrackerError::DocumentRender(e.to_string()))?;
    }

    let mut total_row = table.row();
    total_row.push_element(Paragraph::new("Total").styled(Style::new().bold()));
    total_row.push_element(
        Paragraph::new(total.round_dp(2).to_string()).styled(Style::new().bold()),
    );
    total_row
        .push()
        .map_err(|e| SalesTrackerError::DocumentRender(e.to_string()))?;

    doc.push(table);

    doc.render(&mut writer)
        .map_err(|e| SalesTrackerError::DocumentRender(e.to_string()))?;
    Ok(())
}
