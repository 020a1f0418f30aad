//! Domain Models
//!
//! Request-scoped value types for installment checkout.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date strings that mean "no fixed date yet"
const UNSCHEDULED_MARKERS: [&str; 3] = ["", "TBD", "TBA"];

/// One priced unit in the cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Event date as written by the storefront (None = no fixed date)
    #[serde(default)]
    pub date: Option<String>,

    /// Price per unit in USD
    pub unit_price: Decimal,

    /// Units purchased
    pub quantity: i64,
}

impl LineItem {
    pub fn dated(date: impl Into<String>, unit_price: Decimal, quantity: i64) -> Self {
        Self {
            date: Some(date.into()),
            unit_price,
            quantity,
        }
    }

    /// Item without a fixed date; resolves to the default horizon
    pub fn unscheduled(unit_price: Decimal, quantity: i64) -> Self {
        Self {
            date: None,
            unit_price,
            quantity,
        }
    }

    /// Date text, or None when the item carries the "no fixed date" sentinel
    pub fn fixed_date(&self) -> Option<&str> {
        let raw = self.date.as_deref()?.trim();
        if UNSCHEDULED_MARKERS
            .iter()
            .any(|m| raw.eq_ignore_ascii_case(m))
        {
            None
        } else {
            Some(raw)
        }
    }

    /// Price times quantity, or None if it does not fit in a `Decimal`
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Identity of a schedule: two schedules with the same key are equivalent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleKey {
    pub cycles: u32,
    pub interval_weeks: u32,
}

/// A concrete installment plan ready to offer at checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// Number of installments
    pub cycles: u32,

    /// Weeks between installments
    pub interval_weeks: u32,

    /// Amount charged each cycle, ceiling to the cent
    pub per_cycle_amount: Decimal,

    /// One-time fee added to the first installment
    pub setup_fee: Decimal,

    /// Tax charged each cycle, ceiling to the cent
    pub per_cycle_tax: Decimal,

    /// One date per cycle, starting the day after "today"
    pub payment_dates: Vec<NaiveDate>,

    /// Label shown to the shopper and used as the billing plan name
    pub display_name: String,
}

impl PaymentSchedule {
    pub fn key(&self) -> ScheduleKey {
        ScheduleKey {
            cycles: self.cycles,
            interval_weeks: self.interval_weeks,
        }
    }

    /// Sum of all installments, excluding fee and tax
    pub fn installment_total(&self) -> Decimal {
        self.per_cycle_amount * Decimal::from(self.cycles)
    }

    /// Everything the shopper pays over the life of the plan
    pub fn grand_total(&self) -> Decimal {
        (self.per_cycle_amount + self.per_cycle_tax) * Decimal::from(self.cycles) + self.setup_fee
    }

    /// First charge: one installment plus tax plus the setup fee
    pub fn first_charge(&self) -> Decimal {
        self.per_cycle_amount + self.per_cycle_tax + self.setup_fee
    }

    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.payment_dates.last().copied()
    }
}

/// Human-readable plan label, e.g. "3 PAYMENTS OF $100.00 - 2 WEEK INTERVALS"
pub fn display_name(cycles: u32, per_cycle_amount: Decimal, interval_weeks: u32) -> String {
    if cycles == 1 {
        return format!("1 PAYMENT OF ${:.2}", per_cycle_amount);
    }
    let unit = if interval_weeks == 1 {
        "WEEK INTERVAL"
    } else {
        "WEEK INTERVALS"
    };
    format!(
        "{} PAYMENTS OF ${:.2} - {} {}",
        cycles, per_cycle_amount, interval_weeks, unit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem::dated("2024-06-01", dec!(49.99), 3);
        assert_eq!(item.subtotal(), Some(dec!(149.97)));
        assert_eq!(LineItem::dated("2024-06-01", Decimal::MAX, 2).subtotal(), None);
    }

    #[test]
    fn test_unscheduled_markers() {
        assert_eq!(LineItem::unscheduled(dec!(10), 1).fixed_date(), None);
        assert_eq!(LineItem::dated(" tbd ", dec!(10), 1).fixed_date(), None);
        assert_eq!(LineItem::dated("", dec!(10), 1).fixed_date(), None);
        assert_eq!(
            LineItem::dated("June 1", dec!(10), 1).fixed_date(),
            Some("June 1")
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            display_name(3, dec!(100), 2),
            "3 PAYMENTS OF $100.00 - 2 WEEK INTERVALS"
        );
        assert_eq!(display_name(1, dec!(300), 4), "1 PAYMENT OF $300.00");
        assert_eq!(
            display_name(2, dec!(12.5), 1),
            "2 PAYMENTS OF $12.50 - 1 WEEK INTERVAL"
        );
    }

    #[test]
    fn test_schedule_totals() {
        let schedule = PaymentSchedule {
            cycles: 4,
            interval_weeks: 4,
            per_cycle_amount: dec!(75.00),
            setup_fee: dec!(21.00),
            per_cycle_tax: dec!(6.19),
            payment_dates: Vec::new(),
            display_name: display_name(4, dec!(75), 4),
        };
        assert_eq!(schedule.installment_total(), dec!(300));
        assert_eq!(schedule.first_charge(), dec!(102.19));
        assert_eq!(schedule.grand_total(), dec!(345.76));
        assert_eq!(
            schedule.key(),
            ScheduleKey { cycles: 4, interval_weeks: 4 }
        );
    }
}
