use crate::error::{Result, SalesTrackerError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of source columns every uploaded table must provide.
/// Input headers are matched case-insensitively after whitespace/underscore
/// normalization, so "Order No", "order_no" and " ORDER  NO " all resolve to
/// [`CanonicalColumn::OrderNo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalColumn {
    Date,
    OrderNo,
    ExecutiveName,
    CustomerName,
    OpeningBalance,
    SalesValue,
    SalesReturn,
    SalesInOut,
    PaidAmount,
    Cashback,
    Commission,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 11] = [
        CanonicalColumn::Date,
        CanonicalColumn::OrderNo,
        CanonicalColumn::ExecutiveName,
        CanonicalColumn::CustomerName,
        CanonicalColumn::OpeningBalance,
        CanonicalColumn::SalesValue,
        CanonicalColumn::SalesReturn,
        CanonicalColumn::SalesInOut,
        CanonicalColumn::PaidAmount,
        CanonicalColumn::Cashback,
        CanonicalColumn::Commission,
    ];

    pub const NUMERIC: [CanonicalColumn; 7] = [
        CanonicalColumn::OpeningBalance,
        CanonicalColumn::SalesValue,
        CanonicalColumn::SalesReturn,
        CanonicalColumn::SalesInOut,
        CanonicalColumn::PaidAmount,
        CanonicalColumn::Cashback,
        CanonicalColumn::Commission,
    ];

    /// Canonical name used in error messages and export headers.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalColumn::Date => "date",
            CanonicalColumn::OrderNo => "order_no",
            CanonicalColumn::ExecutiveName => "executive_name",
            CanonicalColumn::CustomerName => "customer_name",
            CanonicalColumn::OpeningBalance => "opening_balance",
            CanonicalColumn::SalesValue => "sales_value",
            CanonicalColumn::SalesReturn => "sales_return",
            CanonicalColumn::SalesInOut => "sales_in_out",
            CanonicalColumn::PaidAmount => "paid_amount",
            CanonicalColumn::Cashback => "cashback",
            CanonicalColumn::Commission => "commission",
        }
    }

    /// Accepted spellings, in normalized form (lowercase, single spaces).
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalColumn::Date => &["date", "order date", "invoice date"],
            CanonicalColumn::OrderNo => &["order no", "order number", "order id"],
            CanonicalColumn::ExecutiveName => &["executive name", "executive", "sales executive"],
            CanonicalColumn::CustomerName => &["customer name", "customer", "client name"],
            CanonicalColumn::OpeningBalance => &["opening balance", "opening bal"],
            CanonicalColumn::SalesValue => &["sales value", "sale value", "sales amount"],
            CanonicalColumn::SalesReturn => &["sales return", "sale return", "returns"],
            CanonicalColumn::SalesInOut => &[
                "sales in out",
                "sales in and out",
                "sales in/out",
                "sales in & out",
            ],
            CanonicalColumn::PaidAmount => &["paid amount", "amount paid", "paid"],
            CanonicalColumn::Cashback => &["cashback", "cash back"],
            CanonicalColumn::Commission => &["commission", "commission deducted"],
        }
    }
}

impl std::fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercases, trims, and collapses runs of whitespace/underscores to a single
/// space, so header comparison is insensitive to casing and separator style.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolved mapping from canonical column to its index in the input header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: BTreeMap<CanonicalColumn, usize>,
}

impl ColumnMap {
    /// Matches input headers against the canonical set. Collects every
    /// canonical column without a match before failing, so the user sees the
    /// full list of missing columns at once.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| normalize_header(h.as_ref()))
            .collect();

        let mut indices = BTreeMap::new();
        let mut missing = Vec::new();

        for column in CanonicalColumn::ALL {
            let found = column
                .aliases()
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            match found {
                Some(idx) => {
                    indices.insert(column, idx);
                }
                None => missing.push(column.name().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SalesTrackerError::MissingColumns(missing));
        }

        Ok(Self { indices })
    }

    pub fn index_of(&self, column: CanonicalColumn) -> usize {
        // resolve() guarantees every canonical column is present
        self.indices[&column]
    }
}

/// One row of the loaded table. Numeric fields are always populated (0 when the
/// source cell was missing or unparseable); `date` is `None` when the source
/// date could not be parsed. The derived fields are filled by the metrics stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: Option<NaiveDate>,
    pub order_no: String,
    pub executive_name: String,
    pub customer_name: String,
    pub opening_balance: Decimal,
    pub sales_value: Decimal,
    pub sales_return: Decimal,
    pub sales_in_out: Decimal,
    pub paid_amount: Decimal,
    pub cashback: Decimal,
    pub commission: Decimal,
    pub outstanding_amount: Decimal,
    pub executive_commission: Decimal,
}

/// An ordered sequence of records sharing the canonical schema. Pipeline stages
/// consume one table and produce a new one; nothing mutates in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    /// Earliest and latest parsed dates in the table, if any row has one.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some((min, max))
    }

    /// Distinct executive names, sorted, for populating filter controls.
    pub fn executives(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .iter()
            .map(|r| r.executive_name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl From<Vec<SalesRecord>> for SalesTable {
    fn from(records: Vec<SalesRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Date"), "date");
        assert_eq!(normalize_header(" DATE "), "date");
        assert_eq!(normalize_header("Order_No"), "order no");
        assert_eq!(normalize_header("  Executive   Name "), "executive name");
        assert_eq!(normalize_header("sales_in_out"), "sales in out");
    }

    #[test]
    fn test_resolve_accepts_mixed_case_and_separators() {
        let headers = [
            "Date",
            "ORDER NO",
            "Executive_Name",
            "customer name",
            "Opening Balance",
            "Sales Value",
            "Sales Return",
            "Sales In And Out",
            "Paid Amount",
            "CashBack",
            "Commission",
        ];
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(map.index_of(CanonicalColumn::Date), 0);
        assert_eq!(map.index_of(CanonicalColumn::SalesInOut), 7);
        assert_eq!(map.index_of(CanonicalColumn::Commission), 10);
    }

    #[test]
    fn test_resolve_reports_all_missing_columns() {
        let headers = ["date", "order no", "customer name"];
        let err = ColumnMap::resolve(&headers).unwrap_err();
        match err {
            SalesTrackerError::MissingColumns(missing) => {
                assert_eq!(
                    missing,
                    vec![
                        "executive_name",
                        "opening_balance",
                        "sales_value",
                        "sales_return",
                        "sales_in_out",
                        "paid_amount",
                        "cashback",
                        "commission",
                    ]
                );
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_date_range_and_executives() {
        let mk = |date, exec: &str| SalesRecord {
            date,
            order_no: "1".to_string(),
            executive_name: exec.to_string(),
            customer_name: "C".to_string(),
            opening_balance: Decimal::ZERO,
            sales_value: Decimal::ZERO,
            sales_return: Decimal::ZERO,
            sales_in_out: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            cashback: Decimal::ZERO,
            commission: Decimal::ZERO,
            outstanding_amount: Decimal::ZERO,
            executive_commission: Decimal::ZERO,
        };

        let table = SalesTable::new(vec![
            mk(NaiveDate::from_ymd_opt(2024, 3, 1), "Bob"),
            mk(None, "Alice"),
            mk(NaiveDate::from_ymd_opt(2024, 1, 15), "Bob"),
        ]);

        assert_eq!(
            table.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
            ))
        );
        assert_eq!(table.executives(), vec!["Alice", "Bob"]);
    }
}
