//! Billing-Plan Payload
//!
//! The values a billing-plan provider needs to create an installment plan
//! for a selected schedule, rendered as plain strings. Sending it is the
//! caller's job.

use serde::{Deserialize, Serialize};

use crate::model::PaymentSchedule;

pub const CURRENCY: &str = "USD";

/// Billing frequency unit; schedules are always weekly multiples
pub const FREQUENCY: &str = "WEEK";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPlanDefinition {
    pub name: String,
    pub description: String,
    pub currency: String,
    pub cycles: String,
    pub frequency: String,
    pub frequency_interval: String,
    pub amount: String,
    pub tax: String,
    pub setup_fee: String,
    /// ISO dates, one per cycle
    pub payment_dates: Vec<String>,
}

impl BillingPlanDefinition {
    pub fn from_schedule(schedule: &PaymentSchedule) -> Self {
        let description = match schedule.last_payment_date() {
            Some(last) if schedule.cycles > 1 => format!(
                "{} installments from {} to {}",
                schedule.cycles,
                schedule.payment_dates[0].format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ),
            Some(only) => format!("Single payment on {}", only.format("%Y-%m-%d")),
            None => String::new(),
        };

        Self {
            name: schedule.display_name.clone(),
            description,
            currency: CURRENCY.into(),
            cycles: schedule.cycles.to_string(),
            frequency: FREQUENCY.into(),
            frequency_interval: schedule.interval_weeks.to_string(),
            amount: format!("{:.2}", schedule.per_cycle_amount),
            tax: format!("{:.2}", schedule.per_cycle_tax),
            setup_fee: format!("{:.2}", schedule.setup_fee),
            payment_dates: schedule
                .payment_dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
        }
    }
}

impl From<&PaymentSchedule> for BillingPlanDefinition {
    fn from(schedule: &PaymentSchedule) -> Self {
        Self::from_schedule(schedule)
    }
}
