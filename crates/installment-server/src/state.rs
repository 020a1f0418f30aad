//! Application State

use std::sync::Arc;

use chrono::NaiveDate;
use installment_core::PlanBuilder;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Plan builder holding the engine configuration
    pub builder: Arc<PlanBuilder>,

    /// Source of "today"; read once per request
    pub today: fn() -> NaiveDate,
}

impl AppState {
    pub fn new(builder: PlanBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
            today: local_today,
        }
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
