//! # Sales Tracker
//!
//! A library for deriving outstanding balances and commission figures from
//! tabular sales records, and for building the filtered views, aggregates, and
//! exportable reports a dashboard sits on top of.
//!
//! ## Core Concepts
//!
//! - **Canonical schema**: input headers are matched case-insensitively (with
//!   whitespace/underscore normalization) against a fixed column set
//! - **Lenient coercion**: unparseable cells default (dates to `None`, numbers
//!   to 0) and are flagged, so one bad cell never discards a record
//! - **Derived metrics**: per-record outstanding amount and executive
//!   commission; team-leader commission is an aggregate over the filtered set
//! - **Session context**: each loaded file is an isolated [`ReportSession`];
//!   there is no global state
//!
//! ## Example
//!
//! ```rust
//! use sales_tracker::{RecordFilter, ReportSession};
//!
//! let csv = "\
//! Date,Order No,Executive Name,Customer Name,Opening Balance,Sales Value,\
//! Sales Return,Sales In And Out,Paid Amount,Cashback,Commission
//! 2023-06-01,ORD-1,Alice,Acme,100,50,10,0,80,5,2
//! 2023-06-02,ORD-2,Bob,Globex,0,40,0,0,20,0,0";
//!
//! let session = ReportSession::from_csv_reader(csv.as_bytes()).unwrap();
//! let report = session.report(&RecordFilter::all()).unwrap();
//!
//! assert_eq!(report.records[0].outstanding_amount.to_string(), "53");
//! assert_eq!(report.totals.team_leader_commission.to_string(), "0.200");
//! ```

pub mod coerce;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod metrics;
pub mod report;
pub mod schema;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use coerce::{parse_amount, parse_date, RowWarning, WarningKind};
pub use error::{Result, SalesTrackerError};
pub use export::{
    render_outstanding_report, report_to_json, write_outstanding_csv, write_outstanding_pdf,
    write_records_csv,
};
pub use ingestion::{load_csv_path, load_csv_reader, LoadOutcome};
pub use metrics::{
    calculate, executive_commission, outstanding_amount, team_leader_commission,
    EXECUTIVE_COMMISSION_RATE, TEAM_LEADER_COMMISSION_RATE,
};
pub use report::{
    apply_filter, build_report, customer_profile, CustomerOverview, CustomerProfile,
    CustomerSummary, ExecutiveSummary, GrandTotals, RecordFilter, SalesReport, TrendPoint,
};
pub use schema::{CanonicalColumn, ColumnMap, SalesRecord, SalesTable};

use chrono::NaiveDate;
use log::info;
use std::io::Read;
use std::path::Path;

/// One loaded file's worth of state: the derived table plus the data-quality
/// warnings from the load. Sessions are independent of each other; reports are
/// recomputed from the table on every call.
#[derive(Debug, Clone)]
pub struct ReportSession {
    table: SalesTable,
    warnings: Vec<RowWarning>,
}

impl ReportSession {
    /// Loads a CSV stream, runs the coercion and metric stages, and returns a
    /// session ready to answer filter queries.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let outcome = ingestion::load_csv_reader(reader)?;
        Ok(Self::from_outcome(outcome))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let outcome = ingestion::load_csv_path(path)?;
        Ok(Self::from_outcome(outcome))
    }

    fn from_outcome(outcome: LoadOutcome) -> Self {
        let table = metrics::calculate(&outcome.table);
        info!(
            "Session ready: {} records, {} warnings",
            table.len(),
            outcome.warnings.len()
        );
        Self {
            table,
            warnings: outcome.warnings,
        }
    }

    /// The full derived table, unfiltered.
    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    /// Data-quality warnings collected during the load.
    pub fn warnings(&self) -> &[RowWarning] {
        &self.warnings
    }

    /// Earliest and latest record dates, for initializing a date-range control.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.table.date_range()
    }

    /// Distinct executive names, for populating a multi-select control.
    pub fn executives(&self) -> Vec<String> {
        self.table.executives()
    }

    /// Builds the full report (filtered records, summaries, totals, trend) for
    /// one filter selection.
    pub fn report(&self, filter: &RecordFilter) -> Result<SalesReport> {
        report::build_report(&self.table, filter)
    }

    /// Drill-down for one customer within a filter selection.
    pub fn customer_profile(
        &self,
        filter: &RecordFilter,
        customer_name: &str,
    ) -> Result<CustomerProfile> {
        let filtered = report::apply_filter(&self.table, filter)?;
        report::customer_profile(&filtered, customer_name)
    }
}
