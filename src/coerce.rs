use crate::schema::CanonicalColumn;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Date formats tried in order; the first successful parse wins. Day-first
/// forms are tried before US month-first forms, so "01/02/2023" reads as
/// 1 February 2023.
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d.%m.%Y",
];

/// A data-quality issue found while coercing one cell. Warnings never abort
/// the load; the affected cell falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    UnparseableDate,
    UnparseableNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1-based data row number (the header row is not counted).
    pub row: usize,
    pub column: CanonicalColumn,
    pub raw: String,
    pub kind: WarningKind,
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::UnparseableDate => "unparseable date",
            WarningKind::UnparseableNumber => "unparseable number",
        };
        write!(
            f,
            "Row {}, column '{}': {} '{}' (defaulted)",
            self.row, self.column, what, self.raw
        )
    }
}

/// Parses a calendar date from free-form text. Accepts ISO, slash and dash
/// forms, and abbreviated month names; a trailing time component is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Strip "2023-01-15 00:00:00" style timestamps down to the date part.
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    let candidates = [trimmed, date_part];

    for candidate in candidates {
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                return Some(date);
            }
        }
    }
    None
}

/// Parses a decimal amount from free-form text, stripping currency symbols,
/// thousands separators, and surrounding whitespace first. Accounting-style
/// parentheses read as a negative amount. Returns `None` when nothing numeric
/// remains.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut cleaned = raw.trim().to_string();
    if cleaned.is_empty() {
        return None;
    }

    let negative_parens = cleaned.starts_with('(') && cleaned.ends_with(')');
    if negative_parens {
        cleaned = cleaned[1..cleaned.len() - 1].to_string();
    }

    let cleaned: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative_parens { -value } else { value })
}

/// Coerces one date cell, recording a warning when the text is non-empty but
/// unparseable. Empty cells coerce silently: absence is not a data error.
pub fn coerce_date(raw: &str, row: usize, warnings: &mut Vec<RowWarning>) -> Option<NaiveDate> {
    match parse_date(raw) {
        Some(date) => Some(date),
        None => {
            if !raw.trim().is_empty() {
                warnings.push(RowWarning {
                    row,
                    column: CanonicalColumn::Date,
                    raw: raw.trim().to_string(),
                    kind: WarningKind::UnparseableDate,
                });
            }
            None
        }
    }
}

/// Coerces one numeric cell to a decimal, defaulting to 0. Only non-empty
/// unparseable text is flagged; blank cells default silently.
pub fn coerce_amount(
    raw: &str,
    row: usize,
    column: CanonicalColumn,
    warnings: &mut Vec<RowWarning>,
) -> Decimal {
    match parse_amount(raw) {
        Some(value) => value,
        None => {
            if !raw.trim().is_empty() {
                warnings.push(RowWarning {
                    row,
                    column,
                    raw: raw.trim().to_string(),
                    kind: WarningKind::UnparseableNumber,
                });
            }
            Decimal::ZERO
        }
    }
}
