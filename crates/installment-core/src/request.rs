//! Plan Requests
//!
//! Shoppers are offered schedules shaped by merchant-configured requests
//! written in a small text notation:
//!
//! ```text
//! "1:3"   cycle range     largest feasible cycle count in 1..=3
//! "4-4"   interval range  largest feasible interval (weeks) in 4..=4
//! "4,4"   exact pair      4 cycles every 4 weeks, no search
//! ```
//!
//! Strings are parsed once here; the engine only ever sees [`PlanRequest`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The requested shape of one schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanRequest {
    CycleRange { low: u32, high: u32 },
    IntervalRange { low: u32, high: u32 },
    ExactPair { cycles: u32, interval_weeks: u32 },
}

/// Which parameter a range request searches over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeKind {
    Cycles,
    Interval,
}

impl PlanRequest {
    /// Parse a `;`-separated list such as `"1:3;4-4;6,2"`
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ValidationError> {
        input
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for PlanRequest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidPlanRequest {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (sep, make): (char, fn(u32, u32) -> PlanRequest) = if input.contains(':') {
            (':', |low: u32, high: u32| PlanRequest::CycleRange { low, high })
        } else if input.contains('-') {
            ('-', |low: u32, high: u32| PlanRequest::IntervalRange { low, high })
        } else if input.contains(',') {
            (',', |cycles: u32, interval_weeks: u32| PlanRequest::ExactPair {
                cycles,
                interval_weeks,
            })
        } else {
            return Err(invalid("expected 'low:high', 'low-high' or 'cycles,interval'"));
        };

        let (first, second) = input
            .split_once(sep)
            .ok_or_else(|| invalid("missing separator"))?;
        let first: u32 = first
            .trim()
            .parse()
            .map_err(|_| invalid("first value is not a whole number"))?;
        let second: u32 = second
            .trim()
            .parse()
            .map_err(|_| invalid("second value is not a whole number"))?;

        if first == 0 || second == 0 {
            return Err(invalid("values must be at least 1"));
        }
        if sep != ',' && first > second {
            return Err(invalid("range low exceeds high"));
        }

        Ok(make(first, second))
    }
}

impl fmt::Display for PlanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanRequest::CycleRange { low, high } => write!(f, "{}:{}", low, high),
            PlanRequest::IntervalRange { low, high } => write!(f, "{}-{}", low, high),
            PlanRequest::ExactPair {
                cycles,
                interval_weeks,
            } => write!(f, "{},{}", cycles, interval_weeks),
        }
    }
}
