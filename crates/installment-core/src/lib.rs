//! # installment-core
//!
//! Pay-over-time schedules for event ticket checkouts.
//!
//! Given a cart of dated line items and a list of requested plan shapes,
//! the engine finds the installment schedules that finish early enough
//! before the event and prices each one.
//!
//! ## Feasibility
//!
//! Every schedule must leave a 30-day margin between its last payment
//! window and the event:
//!
//! ```text
//! today                                                      event
//!   │ pay#1        pay#2        pay#3                           │
//!   ├──●────────────●────────────●──────────── ≥ 29 days ───────┤
//!   │  +1 day       +7·w days    +14·w days                     │
//!   └─ margin = 7 · w · (cycles − 1) + 30 ≤ days until event ───┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use installment_core::{LineItem, PlanBuilder, PlanRequest};
//!
//! let builder = PlanBuilder::new(EngineConfig::from_env()?);
//! let requests = PlanRequest::parse_list("1:3;4-4;4,4")?;
//! let quote = builder.build_plans(today, "vendor", &items, None, None, &requests)?;
//!
//! for schedule in &quote.schedules {
//!     println!("{}", schedule.display_name);
//! }
//! ```

pub mod aggregate;
pub mod billing;
pub mod config;
pub mod error;
pub mod model;
pub mod plans;
pub mod request;
pub mod schedule;

pub use aggregate::{OrderSummary, VendorPolicy, aggregate};
pub use billing::BillingPlanDefinition;
pub use config::EngineConfig;
pub use error::{EngineError, FeasibilityError, Result, ValidationError};
pub use model::{LineItem, PaymentSchedule, ScheduleKey};
pub use plans::{PlanBuilder, PlanQuote, build_plans, dedup_schedules};
pub use request::{PlanRequest, RangeKind};
pub use schedule::{Rates, ScheduleSolver};
