//! Schedule Computation
//!
//! Feasibility solving and range search for installment schedules.

mod search;
mod solver;

pub use solver::{Rates, ScheduleSolver};

use rust_decimal::{Decimal, RoundingStrategy};

/// Minimum lead time (days) before the event for a one-cycle schedule
pub const FEASIBILITY_MARGIN_DAYS: i64 = 30;

/// Days held back from the horizon when deriving a cycle count or interval
pub const DERIVATION_SLACK_DAYS: i64 = 29;

/// Days needed before the event for `cycles` payments `interval_weeks` apart.
///
/// Saturates at `i64::MAX`, which no horizon can satisfy.
pub fn margin_days(cycles: u32, interval_weeks: u32) -> i64 {
    let spans = i64::from(cycles.saturating_sub(1));
    7_i64
        .saturating_mul(i64::from(interval_weeks))
        .saturating_mul(spans)
        .saturating_add(FEASIBILITY_MARGIN_DAYS)
}

/// Round up to the cent; the merchant never under-collects
pub fn ceil_cents(amount: Decimal) -> Decimal {
    let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
    cents.rescale(2);
    cents
}
