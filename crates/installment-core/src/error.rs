//! Error Types for the Schedule Engine
//!
//! Two kinds matter to callers: a [`ValidationError`] aborts a whole plan
//! build, a [`FeasibilityError`] only drops one candidate schedule.

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Malformed or inconsistent input at the engine boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Order has no line items")]
    EmptyOrder,

    #[error("Unparsable event date: {date:?}")]
    InvalidDate { date: String },

    #[error("Negative unit price: {price}")]
    NegativePrice { price: Decimal },

    #[error("Negative quantity: {quantity}")]
    NegativeQuantity { quantity: i64 },

    #[error("Invalid plan request {input:?}: {reason}")]
    InvalidPlanRequest { input: String, reason: String },

    #[error("Date arithmetic overflowed")]
    DateOverflow,

    #[error("Order total is too large")]
    AmountOverflow,
}

/// A cycle/interval combination that cannot be offered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeasibilityError {
    #[error("Estimate exceeds event date: needs {margin_days} days, {horizon_days} available")]
    ExceedsEventDate { margin_days: i64, horizon_days: i64 },

    #[error("Too many cycles to fit before the event")]
    TooManyCycles,

    #[error("Interval too large to fit a single cycle")]
    IntervalTooLarge,

    #[error("Neither cycles nor interval given")]
    Underspecified,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Infeasible schedule: {0}")]
    Feasibility(#[from] FeasibilityError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Feasibility failures downgrade a single candidate, never the request
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::Feasibility(_))
    }

    /// Message safe to show a shopper at checkout
    pub fn user_message(&self) -> String {
        match self {
            EngineError::Validation(ValidationError::EmptyOrder) => {
                "Your cart is empty.".into()
            }
            EngineError::Validation(ValidationError::InvalidDate { date }) => {
                format!("We could not read the event date '{}'.", date)
            }
            EngineError::Validation(ValidationError::InvalidPlanRequest { input, .. }) => {
                format!("The payment plan '{}' is not valid.", input)
            }
            EngineError::Validation(_) => "Some items in your cart are invalid.".into(),
            EngineError::Feasibility(_) => {
                "This payment plan is not available for your event date.".into()
            }
            EngineError::Config(_) => "Service configuration error.".into(),
        }
    }
}
