use crate::coerce::{coerce_amount, coerce_date, RowWarning};
use crate::error::Result;
use crate::schema::{CanonicalColumn, ColumnMap, SalesRecord, SalesTable};
use log::{debug, info};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;

/// The result of loading one delimited-text file: the coerced table plus the
/// data-quality warnings collected along the way. Derived metric fields are
/// still zero at this point; see [`crate::metrics::calculate`].
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: SalesTable,
    pub warnings: Vec<RowWarning>,
}

pub fn load_csv_path<P: AsRef<Path>>(path: P) -> Result<LoadOutcome> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(file)
}

/// Reads a CSV stream with a header row, normalizes the headers against the
/// canonical schema, and coerces every row. Structural problems (missing
/// columns) fail the load; cell-level problems are absorbed with defaults and
/// reported as warnings.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<LoadOutcome> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = ColumnMap::resolve(&headers)?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (i, row) in csv_reader.records().enumerate() {
        let row = row?;
        let row_no = i + 1;
        let cell = |col: CanonicalColumn| row.get(columns.index_of(col)).unwrap_or("");

        let mut amount =
            |col: CanonicalColumn| coerce_amount(cell(col), row_no, col, &mut warnings);
        let opening_balance = amount(CanonicalColumn::OpeningBalance);
        let sales_value = amount(CanonicalColumn::SalesValue);
        let sales_return = amount(CanonicalColumn::SalesReturn);
        let sales_in_out = amount(CanonicalColumn::SalesInOut);
        let paid_amount = amount(CanonicalColumn::PaidAmount);
        let cashback = amount(CanonicalColumn::Cashback);
        let commission = amount(CanonicalColumn::Commission);
        let date = coerce_date(cell(CanonicalColumn::Date), row_no, &mut warnings);

        records.push(SalesRecord {
            date,
            order_no: cell(CanonicalColumn::OrderNo).to_string(),
            executive_name: cell(CanonicalColumn::ExecutiveName).to_string(),
            customer_name: cell(CanonicalColumn::CustomerName).to_string(),
            opening_balance,
            sales_value,
            sales_return,
            sales_in_out,
            paid_amount,
            cashback,
            commission,
            outstanding_amount: Decimal::ZERO,
            executive_commission: Decimal::ZERO,
        });
    }

    info!("Loaded {} sales records", records.len());
    if !warnings.is_empty() {
        debug!("{} cells coerced to defaults during load", warnings.len());
    }

    Ok(LoadOutcome {
        table: SalesTable::new(records),
        warnings,
    })
}
