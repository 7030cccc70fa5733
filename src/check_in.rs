//! Once-per-day check-in gate

use crate::runtime::DateStore;
use chrono::NaiveDate;

/// A check-in is due when none was recorded, or the last one was on a
/// different calendar day.
pub fn should_inject_check_in(today: NaiveDate, last_stored: Option<NaiveDate>) -> bool {
    last_stored != Some(today)
}

/// Outcome of evaluating the gate for one session start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInDecision {
    pub due: bool,
    pub last_stored: Option<NaiveDate>,
}

/// Check-in gate over a persisted date store
pub struct CheckInGate<D: DateStore> {
    store: D,
}

impl<D: DateStore> CheckInGate<D> {
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Decide whether `today` needs a check-in.
    ///
    /// An unreadable store counts as "never checked in".
    pub async fn evaluate(&self, today: NaiveDate) -> CheckInDecision {
        let last_stored = match self.store.load_last_check_in().await {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read last check-in date");
                None
            }
        };

        CheckInDecision {
            due: should_inject_check_in(today, last_stored),
            last_stored,
        }
    }

    /// Persist `today` as the last check-in date
    pub async fn record_check_in(&self, today: NaiveDate) -> Result<(), String> {
        self.store.save_last_check_in(today).await
    }
}
