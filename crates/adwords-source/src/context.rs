//! Per-run context passed by reference into every pipeline.

use checkpoint::StateStore;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Source of "today" for the report window.
pub trait Clock: Send + Sync {
    /// The current UTC date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Everything a sync run needs besides its collaborators.
pub struct SyncContext {
    /// Accounts, synced in this order
    pub customer_ids: Vec<String>,
    pub state: StateStore,
    pub clock: Arc<dyn Clock>,
}

impl SyncContext {
    pub fn new(customer_ids: Vec<String>, state: StateStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            customer_ids,
            state,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
