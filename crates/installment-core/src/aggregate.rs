//! Total & Event-Date Aggregation
//!
//! Folds a cart of line items into the two numbers the schedule solver
//! needs: the latest event date and the total amount due.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::LineItem;

/// Months ahead assumed for items with no fixed date
pub const UNSCHEDULED_HORIZON_MONTHS: u32 = 6;

const LITERAL_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Year-less formats, completed with a trailing year before parsing
const YEARLESS_FORMATS: [&str; 3] = ["%B %d %Y", "%b %d %Y", "%m/%d %Y"];

/// How a vendor writes event dates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorPolicy {
    /// Dates carry their own year
    #[default]
    Literal,

    /// Dates omit the year; they refer to the next occurrence from today
    YearlessRelative,
}

/// Event date and amount due for one checkout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub event_date: NaiveDate,
    pub total_due: Decimal,
}

/// Resolve every line item and fold them into an [`OrderSummary`].
///
/// Fails as a whole on the first invalid item; no partial totals.
pub fn aggregate(
    today: NaiveDate,
    line_items: &[LineItem],
    policy: VendorPolicy,
) -> Result<OrderSummary, ValidationError> {
    let mut event_date: Option<NaiveDate> = None;
    let mut total_due = Decimal::ZERO;

    for item in line_items {
        if item.unit_price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice {
                price: item.unit_price,
            });
        }
        if item.quantity < 0 {
            return Err(ValidationError::NegativeQuantity {
                quantity: item.quantity,
            });
        }

        let date = resolve_date(today, item.fixed_date(), policy)?;
        event_date = Some(event_date.map_or(date, |d| d.max(date)));
        total_due = item
            .subtotal()
            .and_then(|subtotal| total_due.checked_add(subtotal))
            .ok_or(ValidationError::AmountOverflow)?;
    }

    let event_date = event_date.ok_or(ValidationError::EmptyOrder)?;
    tracing::debug!(
        items = line_items.len(),
        %event_date,
        %total_due,
        "aggregated order"
    );

    Ok(OrderSummary {
        event_date,
        total_due,
    })
}

/// Turn one item's date text into a calendar date
pub fn resolve_date(
    today: NaiveDate,
    raw: Option<&str>,
    policy: VendorPolicy,
) -> Result<NaiveDate, ValidationError> {
    let Some(raw) = raw else {
        return today
            .checked_add_months(Months::new(UNSCHEDULED_HORIZON_MONTHS))
            .ok_or(ValidationError::DateOverflow);
    };

    if policy == VendorPolicy::YearlessRelative {
        if let Some(date) = parse_yearless(today, raw) {
            return Ok(date);
        }
    }

    parse_literal(raw).ok_or_else(|| ValidationError::InvalidDate {
        date: raw.to_string(),
    })
}

fn parse_literal(raw: &str) -> Option<NaiveDate> {
    LITERAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Next occurrence of a month/day on or after today
fn parse_yearless(today: NaiveDate, raw: &str) -> Option<NaiveDate> {
    let in_year = |year: i32| {
        let text = format!("{} {}", raw, year);
        YEARLESS_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
    };

    // Feb 29 can be up to eight years away (e.g. 2096 -> 2104)
    (today.year()..=today.year() + 8)
        .find_map(|year| in_year(year).filter(|date| *date >= today))
}
