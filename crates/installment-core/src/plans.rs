//! Plan-List Builder
//!
//! Turns a cart and a list of plan requests into the de-duplicated set of
//! schedules offered at checkout.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{OrderSummary, VendorPolicy, aggregate};
use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::model::{LineItem, PaymentSchedule};
use crate::request::{PlanRequest, RangeKind};
use crate::schedule::{Rates, ScheduleSolver};

/// Schedules offered for one checkout, with the order they were priced from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanQuote {
    pub event_date: NaiveDate,
    pub total_due: Decimal,
    pub schedules: Vec<PaymentSchedule>,
}

/// Builds plan lists against a fixed engine configuration
#[derive(Clone, Debug, Default)]
pub struct PlanBuilder {
    config: EngineConfig,
}

impl PlanBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Build the plans for one vendor's cart.
    ///
    /// `fee_percent` / `tax_percent` fall back to the configured rates, and
    /// an empty `requests` slice falls back to the configured default plans.
    pub fn build_plans(
        &self,
        today: NaiveDate,
        vendor: &str,
        line_items: &[LineItem],
        fee_percent: Option<Decimal>,
        tax_percent: Option<Decimal>,
        requests: &[PlanRequest],
    ) -> Result<PlanQuote, ValidationError> {
        let rates = Rates {
            fee_percent: fee_percent.unwrap_or(self.config.rates.fee_percent),
            tax_percent: tax_percent.unwrap_or(self.config.rates.tax_percent),
            ..self.config.rates
        };
        let requests = if requests.is_empty() {
            &self.config.default_plans[..]
        } else {
            requests
        };

        build_plans(
            today,
            line_items,
            self.config.policy_for(vendor),
            rates,
            requests,
        )
    }
}

/// Aggregate the cart, resolve every request, and drop equivalent schedules.
///
/// Only an aggregation failure is an error; unsatisfiable requests are
/// skipped.
pub fn build_plans(
    today: NaiveDate,
    line_items: &[LineItem],
    policy: VendorPolicy,
    rates: Rates,
    requests: &[PlanRequest],
) -> Result<PlanQuote, ValidationError> {
    let OrderSummary {
        event_date,
        total_due,
    } = aggregate(today, line_items, policy)?;
    let solver = ScheduleSolver::new(today, event_date, total_due, rates);

    let found: Vec<PaymentSchedule> = requests
        .iter()
        .filter_map(|request| {
            let schedule = resolve(&solver, request);
            if schedule.is_none() {
                tracing::warn!(%request, %event_date, "no schedule fits plan request");
            }
            schedule
        })
        .collect();

    let schedules = dedup_schedules(found);
    tracing::info!(
        requested = requests.len(),
        offered = schedules.len(),
        %total_due,
        "built installment plans"
    );

    Ok(PlanQuote {
        event_date,
        total_due,
        schedules,
    })
}

fn resolve(solver: &ScheduleSolver, request: &PlanRequest) -> Option<PaymentSchedule> {
    match *request {
        PlanRequest::CycleRange { low, high } => solver.search_range(RangeKind::Cycles, low, high),
        PlanRequest::IntervalRange { low, high } => {
            solver.search_range(RangeKind::Interval, low, high)
        }
        PlanRequest::ExactPair {
            cycles,
            interval_weeks,
        } => match solver.solve(cycles, interval_weeks) {
            Ok(schedule) => Some(schedule),
            Err(reason) => {
                tracing::debug!(cycles, interval_weeks, %reason, "exact plan rejected");
                None
            }
        },
    }
}

/// Keep the first schedule of each (cycles, interval) pair, preserving order
pub fn dedup_schedules(schedules: Vec<PaymentSchedule>) -> Vec<PaymentSchedule> {
    let mut seen = HashSet::new();
    schedules
        .into_iter()
        .filter(|s| seen.insert(s.key()))
        .collect()
}
