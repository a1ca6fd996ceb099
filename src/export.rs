use crate::error::Result;
use crate::report::CustomerSummary;
use crate::schema::{CanonicalColumn, SalesRecord};
use chrono::NaiveDate;
use std::io::Write;

/// Headers for the record-table export: the canonical source columns followed
/// by the two derived columns. Re-ingesting the export resolves the same
/// canonical schema, so exports round-trip.
fn record_headers() -> Vec<&'static str> {
    let mut headers: Vec<&'static str> = CanonicalColumn::ALL.iter().map(|c| c.name()).collect();
    headers.push("outstanding_amount");
    headers.push("executive_commission");
    headers
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Writes the filtered record table as CSV, derived columns included.
pub fn write_records_csv<W: Write>(records: &[SalesRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(record_headers())?;
    for record in records {
        csv_writer.write_record([
            format_date(record.date),
            record.order_no.clone(),
            record.executive_name.clone(),
            record.customer_name.clone(),
            record.opening_balance.to_string(),
            record.sales_value.to_string(),
            record.sales_return.to_string(),
            record.sales_in_out.to_string(),
            record.paid_amount.to_string(),
            record.cashback.to_string(),
            record.commission.to_string(),
            record.outstanding_amount.to_string(),
            record.executive_commission.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the per-customer outstanding summary as CSV.
pub fn write_outstanding_csv<W: Write>(customers: &[CustomerSummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["customer_name", "outstanding_amount"])?;
    for customer in customers {
        csv_writer.write_record([
            customer.customer_name.clone(),
            customer.outstanding_amount.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the customer outstanding report as aligned plain text: title,
/// as-of date, one row per customer, and a grand total.
pub fn render_outstanding_report(customers: &[CustomerSummary], as_of: NaiveDate) -> String {
    let name_width = customers
        .iter()
        .map(|c| c.customer_name.len())
        .chain(std::iter::once("Customer Name".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str("Customer Outstanding Report\n");
    out.push_str(&format!("As of {}\n\n", as_of.format("%Y-%m-%d")));
    out.push_str(&format!(
        "{:<name_width$}  {:>18}\n",
        "Customer Name", "Outstanding Amount"
    ));
    out.push_str(&format!("{}  {}\n", "-".repeat(name_width), "-".repeat(18)));

    let mut total = rust_decimal::Decimal::ZERO;
    for customer in customers {
        total += customer.outstanding_amount;
        out.push_str(&format!(
            "{:<name_width$}  {:>18}\n",
            customer.customer_name,
            customer.outstanding_amount.round_dp(2)
        ));
    }
    out.push_str(&format!("{}  {}\n", "-".repeat(name_width), "-".repeat(18)));
    out.push_str(&format!(
        "{:<name_width$}  {:>18}\n",
        "Total",
        total.round_dp(2)
    ));
    out
}

/// Encodes a full report as pretty-printed JSON for chart/view adapters.
pub fn report_to_json(report: &crate::report::SalesReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the customer outstanding report as a PDF document. Only available
/// with the `pdf` feature; without it this degrades to
/// [`crate::error::SalesTrackerError::ExportUnavailable`] so callers can fall
/// back to the CSV export with a notice.
#[cfg(feature = "pdf")]
pub fn write_outstanding_pdf<W: Write>(
    customers: &[CustomerSummary],
    as_of: NaiveDate,
    font_dir: &std::path::Path,
    writer: W,
) -> Result<()> {
    crate::pdf::write_outstanding_pdf(customers, as_of, font_dir, writer)
}

#[cfg(not(feature = "pdf"))]
pub fn write_outstanding_pdf<W: Write>(
    _customers: &[CustomerSummary],
    _as_of: NaiveDate,
    _font_dir: &std::path::Path,
    _writer: W,
) -> Result<()> {
    Err(crate::error::SalesTrackerError::ExportUnavailable(
        "PDF export requires the 'pdf' feature".to_string(),
    ))
}
