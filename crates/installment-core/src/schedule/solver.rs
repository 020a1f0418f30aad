//! Billing-Schedule Feasibility Solver
//!
//! Resolves one (cycles, interval) pair against the event date and prices
//! it. A zero for either parameter means "derive it from the horizon".

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DERIVATION_SLACK_DAYS, FEASIBILITY_MARGIN_DAYS, ceil_cents, margin_days};
use crate::error::FeasibilityError;
use crate::model::{PaymentSchedule, display_name};
use crate::request::RangeKind;

/// Fee and tax fractions applied to a schedule (0.07 = 7%)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    /// Setup fee as a fraction of the total due
    pub fee_percent: Decimal,

    /// Tax as a fraction of each installment
    pub tax_percent: Decimal,

    /// Setup fee used instead when the schedule has a single payment
    pub single_payment_fee_percent: Decimal,
}

/// Solver bound to one checkout: "today", the event date and the total
#[derive(Clone, Debug)]
pub struct ScheduleSolver {
    today: NaiveDate,
    event_date: NaiveDate,
    total_due: Decimal,
    rates: Rates,
}

impl ScheduleSolver {
    pub fn new(today: NaiveDate, event_date: NaiveDate, total_due: Decimal, rates: Rates) -> Self {
        Self {
            today,
            event_date,
            total_due,
            rates,
        }
    }

    /// Days from today until the event (negative if it has passed)
    pub fn horizon_days(&self) -> i64 {
        (self.event_date - self.today).num_days()
    }

    /// Check and price one schedule.
    ///
    /// At most one of `cycles` / `interval_weeks` may be zero; the missing
    /// one is derived as the largest value that fits before the event.
    pub fn solve(
        &self,
        cycles: u32,
        interval_weeks: u32,
    ) -> Result<PaymentSchedule, FeasibilityError> {
        if cycles == 0 && interval_weeks == 0 {
            return Err(FeasibilityError::Underspecified);
        }

        let horizon_days = self.horizon_days();
        // An unknown parameter contributes nothing to the estimate
        check_margin(margin_days(cycles.max(1), interval_weeks), horizon_days)?;

        let cycles_derived = cycles == 0;
        let (cycles, interval_weeks) = match (cycles, interval_weeks) {
            (1, 0) => (1, 1),
            (c, 0) => (c, derive_interval(c, horizon_days)?),
            (0, i) => (derive_cycles(i, horizon_days)?, i),
            pair => pair,
        };
        check_margin(margin_days(cycles, interval_weeks), horizon_days)?;

        // Only a derived single payment earns the reduced fee
        let single_payment_rate = cycles_derived && cycles == 1;
        Ok(self.price(cycles, interval_weeks, single_payment_rate))
    }

    /// Largest value of `kind` that could fit before the event, if any.
    ///
    /// Cycles need at least one week between payments; an interval needs
    /// room for at least one derived cycle.
    pub fn max_feasible(&self, kind: RangeKind) -> Option<u32> {
        let horizon_days = self.horizon_days();
        if horizon_days < FEASIBILITY_MARGIN_DAYS {
            return None;
        }
        let bound = match kind {
            RangeKind::Cycles => (horizon_days - FEASIBILITY_MARGIN_DAYS) / 7 + 1,
            RangeKind::Interval => (horizon_days - DERIVATION_SLACK_DAYS) / 7,
        };
        match u32::try_from(bound) {
            Ok(0) => None,
            Ok(n) => Some(n),
            Err(_) => Some(u32::MAX),
        }
    }

    /// Build the concrete schedule for an already-feasible pair
    fn price(&self, cycles: u32, interval_weeks: u32, single_payment_rate: bool) -> PaymentSchedule {
        let fee_percent = if single_payment_rate {
            self.rates.single_payment_fee_percent
        } else {
            self.rates.fee_percent
        };

        let per_cycle_amount = ceil_cents(self.total_due / Decimal::from(cycles));
        let setup_fee = ceil_cents(self.total_due * fee_percent);
        let per_cycle_tax = ceil_cents(per_cycle_amount * self.rates.tax_percent);

        let step = 7 * i64::from(interval_weeks);
        let payment_dates = (0..i64::from(cycles))
            .map(|i| self.today + Duration::days(1 + step * i))
            .collect();

        PaymentSchedule {
            cycles,
            interval_weeks,
            per_cycle_amount,
            setup_fee,
            per_cycle_tax,
            payment_dates,
            display_name: display_name(cycles, per_cycle_amount, interval_weeks),
        }
    }
}

fn check_margin(margin_days: i64, horizon_days: i64) -> Result<(), FeasibilityError> {
    if margin_days > horizon_days {
        return Err(FeasibilityError::ExceedsEventDate {
            margin_days,
            horizon_days,
        });
    }
    Ok(())
}

/// Widest interval (weeks) for `cycles` payments; `cycles` is at least 2
fn derive_interval(cycles: u32, horizon_days: i64) -> Result<u32, FeasibilityError> {
    let span = 7 * i64::from(cycles - 1);
    let mut interval = (horizon_days - DERIVATION_SLACK_DAYS) / span;
    // The slack leaves one day less than the margin needs on an exact fit
    if interval.saturating_mul(span) + FEASIBILITY_MARGIN_DAYS > horizon_days {
        interval -= 1;
    }
    match u32::try_from(interval) {
        Ok(0) | Err(_) => Err(FeasibilityError::TooManyCycles),
        Ok(weeks) => Ok(weeks),
    }
}

/// Number of payments `interval_weeks` apart that fit before the event
fn derive_cycles(interval_weeks: u32, horizon_days: i64) -> Result<u32, FeasibilityError> {
    let cycles = (horizon_days - DERIVATION_SLACK_DAYS) / (7 * i64::from(interval_weeks));
    match u32::try_from(cycles) {
        Ok(0) | Err(_) => Err(FeasibilityError::IntervalTooLarge),
        Ok(n) => Ok(n),
    }
}
