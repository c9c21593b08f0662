//! Daily download allowance for anonymous callers.
//!
//! This is advisory client throttling, not a security boundary: the counter
//! lives in process memory, keyed by the local calendar date, and resets
//! whenever the date rolls over. Authenticated callers bypass it entirely.

use chrono::{Local, NaiveDate};
use std::sync::Mutex;

/// Remaining count reported to logged-in callers.
const UNLIMITED: u32 = 9999;

/// Trait for the guest download allowance.
pub trait GuestQuota: Send + Sync {
    /// Downloads left for the caller today.
    fn remaining(&self, is_logged_in: bool) -> u32;

    /// Consume one download if the allowance permits. Returns false, without
    /// mutating state, once the daily ceiling is reached.
    fn try_consume(&self, is_logged_in: bool) -> bool;
}

/// Configuration for the daily counter.
#[derive(Debug, Clone)]
pub struct GuestQuotaConfig {
    /// Maximum anonymous downloads per calendar day.
    pub daily_limit: u32,
}

impl Default for GuestQuotaConfig {
    fn default() -> Self {
        Self { daily_limit: 10 }
    }
}

#[derive(Debug, Clone)]
struct QuotaState {
    date: NaiveDate,
    count: u32,
}

/// Date-keyed counter with an injectable date source.
///
/// The date source is swappable so tests can drive date rollovers
/// deterministically instead of waiting for midnight.
pub struct DailyGuestQuota {
    state: Mutex<QuotaState>,
    config: GuestQuotaConfig,
    today: Box<dyn Fn() -> NaiveDate + Send + Sync>,
}

impl DailyGuestQuota {
    /// Create a counter on the local system clock.
    pub fn new(config: GuestQuotaConfig) -> Self {
        Self::with_date_source(config, || Local::now().date_naive())
    }

    /// Create a counter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GuestQuotaConfig::default())
    }

    /// Create a counter with a custom date source (for testing).
    pub fn with_date_source(
        config: GuestQuotaConfig,
        today: impl Fn() -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        let state = QuotaState {
            date: today(),
            count: 0,
        };
        Self {
            state: Mutex::new(state),
            config,
            today: Box::new(today),
        }
    }

    /// Reset the count when the stored date is not today.
    fn roll_over_if_stale(&self, state: &mut QuotaState) {
        let today = (self.today)();
        if state.date != today {
            state.date = today;
            state.count = 0;
        }
    }
}

impl GuestQuota for DailyGuestQuota {
    fn remaining(&self, is_logged_in: bool) -> u32 {
        if is_logged_in {
            return UNLIMITED;
        }
        let mut state = self.state.lock().unwrap();
        self.roll_over_if_stale(&mut state);
        self.config.daily_limit.saturating_sub(state.count)
    }

    fn try_consume(&self, is_logged_in: bool) -> bool {
        if is_logged_in {
            return true;
        }
        let mut state = self.state.lock().unwrap();
        self.roll_over_if_stale(&mut state);
        if state.count >= self.config.daily_limit {
            return false;
        }
        state.count += 1;
        true
    }
}
