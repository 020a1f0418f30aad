//! Range search over cycle counts or intervals

use crate::model::PaymentSchedule;
use crate::request::RangeKind;

use super::ScheduleSolver;

impl ScheduleSolver {
    /// Try each value from `high` down to `low`, leaving the other
    /// parameter to be derived; the first feasible schedule wins.
    ///
    /// Returns `None` when no value in the range fits.
    pub fn search_range(&self, kind: RangeKind, low: u32, high: u32) -> Option<PaymentSchedule> {
        // Values above this bound can never fit, so the loop stays short
        let high = high.min(self.max_feasible(kind)?);
        for value in (low..=high).rev() {
            let attempt = match kind {
                RangeKind::Cycles => self.solve(value, 0),
                RangeKind::Interval => self.solve(0, value),
            };
            match attempt {
                Ok(schedule) => return Some(schedule),
                Err(reason) => {
                    tracing::debug!(?kind, value, %reason, "candidate rejected");
                }
            }
        }
        None
    }
}
