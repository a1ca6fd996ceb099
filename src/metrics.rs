use crate::schema::{SalesRecord, SalesTable};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Per-record commission paid to the executive: 1% of the paid amount.
pub const EXECUTIVE_COMMISSION_RATE: Decimal = dec!(0.01);

/// Team-leader commission: 0.2% of the total paid amount over a filtered set.
/// This is an aggregate, never a per-record field; it must be recomputed
/// whenever the active filter changes.
pub const TEAM_LEADER_COMMISSION_RATE: Decimal = dec!(0.002);

/// Derives the outstanding balance for one record. Negative results are valid
/// (the customer is in credit) and are never clamped.
pub fn outstanding_amount(record: &SalesRecord) -> Decimal {
    record.opening_balance + record.sales_value
        - record.sales_return
        - record.sales_in_out
        - record.paid_amount
        - record.cashback
        - record.commission
}

pub fn executive_commission(record: &SalesRecord) -> Decimal {
    record.paid_amount * EXECUTIVE_COMMISSION_RATE
}

pub fn team_leader_commission(total_paid: Decimal) -> Decimal {
    total_paid * TEAM_LEADER_COMMISSION_RATE
}

/// Produces a new table with both derived fields populated on every record.
/// Pure and row-local: no record depends on any other.
pub fn calculate(table: &SalesTable) -> SalesTable {
    let records = table
        .iter()
        .map(|record| {
            let mut derived = record.clone();
            derived.outstanding_amount = outstanding_amount(record);
            derived.executive_commission = executive_commission(record);
            derived
        })
        .collect::<Vec<_>>();
    SalesTable::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(opening: Decimal, paid: Decimal) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(2023, 6, 1),
            order_no: "ORD-1".to_string(),
            executive_name: "Alice".to_string(),
            customer_name: "Acme".to_string(),
            opening_balance: opening,
            sales_value: Decimal::ZERO,
            sales_return: Decimal::ZERO,
            sales_in_out: Decimal::ZERO,
            paid_amount: paid,
            cashback: Decimal::ZERO,
            commission: Decimal::ZERO,
            outstanding_amount: Decimal::ZERO,
            executive_commission: Decimal::ZERO,
        }
    }

    #[test]
    fn test_outstanding_formula() {
        let mut r = record(dec!(100), dec!(80));
        r.sales_value = dec!(50);
        r.sales_return = dec!(10);
        r.sales_in_out = dec!(0);
        r.cashback = dec!(5);
        r.commission = dec!(2);
        assert_eq!(outstanding_amount(&r), dec!(53));
    }

    #[test]
    fn test_outstanding_can_be_negative() {
        let r = record(dec!(10), dec!(50));
        assert_eq!(outstanding_amount(&r), dec!(-40));
    }

    #[test]
    fn test_executive_commission() {
        assert_eq!(executive_commission(&record(dec!(0), dec!(80))), dec!(0.80));
        assert_eq!(executive_commission(&record(dec!(0), dec!(0))), dec!(0.00));
        assert_eq!(
            executive_commission(&record(dec!(0), dec!(-100))),
            dec!(-1.00)
        );
    }

    #[test]
    fn test_team_leader_commission() {
        assert_eq!(team_leader_commission(dec!(100)), dec!(0.200));
        assert_eq!(team_leader_commission(dec!(0)), dec!(0.000));
    }

    #[test]
    fn test_calculate_fills_derived_fields() {
        let table = SalesTable::new(vec![record(dec!(100), dec!(80))]);
        let derived = calculate(&table);
        assert_eq!(derived.records()[0].outstanding_amount, dec!(20));
        assert_eq!(derived.records()[0].executive_commission, dec!(0.80));
        // Source table is untouched.
        assert_eq!(table.records()[0].outstanding_amount, Decimal::ZERO);
    }
}
