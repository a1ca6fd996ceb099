use crate::error::{Result, SalesTrackerError};
use crate::metrics::team_leader_commission;
use crate::schema::{SalesRecord, SalesTable};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selection applied to a calculated table. `None` means no restriction.
/// Records without a parsed date are excluded only while a date bound is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub executives: Option<BTreeSet<String>>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_executives<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executives = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if to < from {
                return Err(SalesTrackerError::InvalidDateRange { from, to });
            }
        }
        Ok(())
    }

    fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(executives) = &self.executives {
            if !executives.contains(&record.executive_name) {
                return false;
            }
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = record.date else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }
}

/// Applies the filter, preserving record order. An empty result is valid and
/// aggregates over it come out as zeros.
pub fn apply_filter(table: &SalesTable, filter: &RecordFilter) -> Result<SalesTable> {
    filter.validate()?;
    let records = table
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect::<Vec<_>>();
    Ok(SalesTable::new(records))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_name: String,
    pub sales_value: Decimal,
    pub paid_amount: Decimal,
    pub outstanding_amount: Decimal,
    pub record_count: usize,
    pub latest_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub executive_name: String,
    pub sales_value: Decimal,
    pub paid_amount: Decimal,
    pub executive_commission: Decimal,
}

/// Scope-wide sums over a filtered set. `team_leader_commission` is derived
/// from the paid total at this scope and changes with the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrandTotals {
    pub total_sales: Decimal,
    pub total_paid: Decimal,
    pub total_outstanding: Decimal,
    pub total_executive_commission: Decimal,
    pub team_leader_commission: Decimal,
}

impl GrandTotals {
    /// True when the totals came from an empty filtered set; callers render a
    /// zeroed report with a notice rather than an error.
    pub fn is_zero(&self) -> bool {
        self.total_sales.is_zero()
            && self.total_paid.is_zero()
            && self.total_outstanding.is_zero()
            && self.total_executive_commission.is_zero()
    }
}

/// Customer-level overview metrics for the analysis view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerOverview {
    pub customer_count: usize,
    pub average_sales: Decimal,
    pub average_outstanding: Decimal,
}

/// Per-date sums for the trend chart. Records without a date are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub sales_value: Decimal,
    pub paid_amount: Decimal,
}

/// Drill-down for one customer: their records plus their totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_name: String,
    pub records: Vec<SalesRecord>,
    pub sales_value: Decimal,
    pub paid_amount: Decimal,
    pub outstanding_amount: Decimal,
}

pub fn summarize_customers(table: &SalesTable) -> Vec<CustomerSummary> {
    let mut grouped: BTreeMap<String, CustomerSummary> = BTreeMap::new();
    for record in table {
        let entry = grouped
            .entry(record.customer_name.clone())
            .or_insert_with(|| CustomerSummary {
                customer_name: record.customer_name.clone(),
                sales_value: Decimal::ZERO,
                paid_amount: Decimal::ZERO,
                outstanding_amount: Decimal::ZERO,
                record_count: 0,
                latest_date: None,
            });
        entry.sales_value += record.sales_value;
        entry.paid_amount += record.paid_amount;
        entry.outstanding_amount += record.outstanding_amount;
        entry.record_count += 1;
        if record.date > entry.latest_date {
            entry.latest_date = record.date;
        }
    }
    grouped.into_values().collect()
}

pub fn summarize_executives(table: &SalesTable) -> Vec<ExecutiveSummary> {
    let mut grouped: BTreeMap<String, ExecutiveSummary> = BTreeMap::new();
    for record in table {
        let entry = grouped
            .entry(record.executive_name.clone())
            .or_insert_with(|| ExecutiveSummary {
                executive_name: record.executive_name.clone(),
                sales_value: Decimal::ZERO,
                paid_amount: Decimal::ZERO,
                executive_commission: Decimal::ZERO,
            });
        entry.sales_value += record.sales_value;
        entry.paid_amount += record.paid_amount;
        entry.executive_commission += record.executive_commission;
    }
    grouped.into_values().collect()
}

pub fn grand_totals(table: &SalesTable) -> GrandTotals {
    let mut totals = GrandTotals::default();
    for record in table {
        totals.total_sales += record.sales_value;
        totals.total_paid += record.paid_amount;
        totals.total_outstanding += record.outstanding_amount;
        totals.total_executive_commission += record.executive_commission;
    }
    totals.team_leader_commission = team_leader_commission(totals.total_paid);
    totals
}

pub fn customer_overview(customers: &[CustomerSummary]) -> CustomerOverview {
    let count = customers.len();
    if count == 0 {
        return CustomerOverview::default();
    }
    let divisor = Decimal::from(count as u64);
    let total_sales: Decimal = customers.iter().map(|c| c.sales_value).sum();
    let total_outstanding: Decimal = customers.iter().map(|c| c.outstanding_amount).sum();
    CustomerOverview {
        customer_count: count,
        average_sales: total_sales / divisor,
        average_outstanding: total_outstanding / divisor,
    }
}

pub fn daily_trend(table: &SalesTable) -> Vec<TrendPoint> {
    let mut grouped: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();
    for record in table {
        let Some(date) = record.date else { continue };
        let entry = grouped.entry(date).or_insert_with(|| TrendPoint {
            date,
            sales_value: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
        });
        entry.sales_value += record.sales_value;
        entry.paid_amount += record.paid_amount;
    }
    grouped.into_values().collect()
}

pub fn customer_profile(table: &SalesTable, customer_name: &str) -> Result<CustomerProfile> {
    let records: Vec<SalesRecord> = table
        .iter()
        .filter(|record| record.customer_name == customer_name)
        .cloned()
        .collect();
    if records.is_empty() {
        return Err(SalesTrackerError::CustomerNotFound(
            customer_name.to_string(),
        ));
    }
    let sales_value = records.iter().map(|r| r.sales_value).sum();
    let paid_amount = records.iter().map(|r| r.paid_amount).sum();
    let outstanding_amount = records.iter().map(|r| r.outstanding_amount).sum();
    Ok(CustomerProfile {
        customer_name: customer_name.to_string(),
        records,
        sales_value,
        paid_amount,
        outstanding_amount,
    })
}

/// Everything the views and exporters consume for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub records: Vec<SalesRecord>,
    pub customers: Vec<CustomerSummary>,
    pub executives: Vec<ExecutiveSummary>,
    pub totals: GrandTotals,
    pub trend: Vec<TrendPoint>,
}

pub fn build_report(table: &SalesTable, filter: &RecordFilter) -> Result<SalesReport> {
    let filtered = apply_filter(table, filter)?;
    Ok(SalesReport {
        customers: summarize_customers(&filtered),
        executives: summarize_executives(&filtered),
        totals: grand_totals(&filtered),
        trend: daily_trend(&filtered),
        records: filtered.records().to_vec(),
    })
}

impl SalesReport {
    pub fn customer_overview(&self) -> CustomerOverview {
        customer_overview(&self.customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;
    use rust_decimal_macros::dec;

    fn record(date: Option<NaiveDate>, exec: &str, customer: &str, paid: Decimal) -> SalesRecord {
        SalesRecord {
            date,
            order_no: "ORD".to_string(),
            executive_name: exec.to_string(),
            customer_name: customer.to_string(),
            opening_balance: dec!(100),
            sales_value: dec!(50),
            sales_return: dec!(10),
            sales_in_out: dec!(0),
            paid_amount: paid,
            cashback: dec!(5),
            commission: dec!(2),
            outstanding_amount: Decimal::ZERO,
            executive_commission: Decimal::ZERO,
        }
    }

    fn sample_table() -> SalesTable {
        let d = |day| NaiveDate::from_ymd_opt(2023, 6, day);
        let table = SalesTable::new(vec![
            record(d(1), "Alice", "Acme", dec!(80)),
            record(d(2), "Bob", "Globex", dec!(20)),
            record(d(3), "Alice", "Acme", dec!(40)),
            record(None, "Bob", "Initech", dec!(10)),
        ]);
        metrics::calculate(&table)
    }

    #[test]
    fn test_filter_by_executive_preserves_order() {
        let table = sample_table();
        let filter = RecordFilter::all().with_executives(["Alice"]);
        let filtered = apply_filter(&table, &filter).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records()[0].paid_amount, dec!(80));
        assert_eq!(filtered.records()[1].paid_amount, dec!(40));
    }

    #[test]
    fn test_filter_by_date_range_excludes_dateless_rows() {
        let table = sample_table();
        let filter = RecordFilter::all().with_date_range(
            NaiveDate::from_ymd_opt(2023, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        );
        let filtered = apply_filter(&table, &filter).unwrap();
        // Row 1 is before the range; the dateless Initech row is excluded too.
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_no_filter_keeps_dateless_rows() {
        let table = sample_table();
        let filtered = apply_filter(&table, &RecordFilter::all()).unwrap();
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_reversed_date_range_is_rejected() {
        let table = sample_table();
        let filter = RecordFilter::all().with_date_range(
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        );
        let err = apply_filter(&table, &filter).unwrap_err();
        assert!(matches!(err, SalesTrackerError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_customer_summaries() {
        let table = sample_table();
        let customers = summarize_customers(&table);
        assert_eq!(customers.len(), 3);

        let acme = &customers[0];
        assert_eq!(acme.customer_name, "Acme");
        assert_eq!(acme.record_count, 2);
        // Two rows: outstanding 53 and 93.
        assert_eq!(acme.outstanding_amount, dec!(146));
        assert_eq!(acme.latest_date, NaiveDate::from_ymd_opt(2023, 6, 3));
    }

    #[test]
    fn test_executive_summaries() {
        let table = sample_table();
        let executives = summarize_executives(&table);
        assert_eq!(executives.len(), 2);

        let alice = &executives[0];
        assert_eq!(alice.executive_name, "Alice");
        assert_eq!(alice.paid_amount, dec!(120));
        assert_eq!(alice.executive_commission, dec!(1.20));
    }

    #[test]
    fn test_grand_totals_and_team_leader_commission() {
        let table = sample_table();
        let totals = grand_totals(&table);
        assert_eq!(totals.total_paid, dec!(150));
        assert_eq!(totals.team_leader_commission, dec!(0.300));

        // Narrowing the filter changes the commission deterministically.
        let filtered = apply_filter(&table, &RecordFilter::all().with_executives(["Bob"])).unwrap();
        let totals = grand_totals(&filtered);
        assert_eq!(totals.total_paid, dec!(30));
        assert_eq!(totals.team_leader_commission, dec!(0.060));
    }

    #[test]
    fn test_empty_filter_result_yields_zeroed_aggregates() {
        let table = sample_table();
        let filter = RecordFilter::all().with_executives(["Nobody"]);
        let report = build_report(&table, &filter).unwrap();
        assert!(report.records.is_empty());
        assert!(report.customers.is_empty());
        assert!(report.totals.is_zero());
        assert_eq!(report.totals.team_leader_commission, Decimal::ZERO);
        assert_eq!(report.customer_overview(), CustomerOverview::default());
    }

    #[test]
    fn test_daily_trend_groups_by_date() {
        let d = |day| NaiveDate::from_ymd_opt(2023, 6, day);
        let table = metrics::calculate(&SalesTable::new(vec![
            record(d(1), "Alice", "Acme", dec!(80)),
            record(d(1), "Bob", "Globex", dec!(20)),
            record(d(2), "Alice", "Acme", dec!(40)),
        ]));
        let trend = daily_trend(&table);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].paid_amount, dec!(100));
        assert_eq!(trend[0].sales_value, dec!(100));
        assert_eq!(trend[1].paid_amount, dec!(40));
    }

    #[test]
    fn test_customer_profile() {
        let table = sample_table();
        let profile = customer_profile(&table, "Acme").unwrap();
        assert_eq!(profile.records.len(), 2);
        assert_eq!(profile.paid_amount, dec!(120));
        assert_eq!(profile.outstanding_amount, dec!(146));

        let err = customer_profile(&table, "Nobody").unwrap_err();
        assert!(matches!(err, SalesTrackerError::CustomerNotFound(_)));
    }

    #[test]
    fn test_customer_overview_averages() {
        let table = sample_table();
        let overview = customer_overview(&summarize_customers(&table));
        assert_eq!(overview.customer_count, 3);
        // 200 total sales across 3 customers.
        assert_eq!(overview.average_sales.round_dp(2), dec!(66.67));
    }
}
