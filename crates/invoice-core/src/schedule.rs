//! Once-a-day job scheduling.
//!
//! [`run_daily`] sleeps until the next local midnight of a [`ReportClock`],
//! claims that date on the [`DailySchedule`] and runs the job inline. A date
//! can be claimed once, so an early wake-up or a second runner sharing the
//! schedule cannot fire the job twice for the same day, and the inline run
//! means a slow job delays the next sleep rather than overlapping with it.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::clock::ReportClock;

/// Sentinel for "never fired".
const NEVER: i32 = i32::MIN;

/// Work performed once per reporting day.
#[async_trait]
pub trait DailyJob: Send + Sync {
    /// Called with the midnight instant that opened the new day.
    async fn run(&self, midnight: DateTime<Utc>);
}

/// Tracks which local dates a daily job has fired for.
#[derive(Debug)]
pub struct DailySchedule {
    clock: ReportClock,
    last_fired: AtomicI32,
}

impl DailySchedule {
    pub fn new(clock: ReportClock) -> Self {
        Self {
            clock,
            last_fired: AtomicI32::new(NEVER),
        }
    }

    pub fn clock(&self) -> &ReportClock {
        &self.clock
    }

    /// Next firing instant after `now`.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.clock.next_midnight(now)
    }

    /// Claim the local date of `midnight`. Returns `false` if that date (or
    /// a later one) was already claimed.
    pub fn try_claim(&self, midnight: DateTime<Utc>) -> bool {
        let day = self.clock.local_date(midnight).num_days_from_ce();
        let mut current = self.last_fired.load(Ordering::Acquire);
        loop {
            if current != NEVER && current >= day {
                return false;
            }
            match self.last_fired.compare_exchange(
                current,
                day,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Local date of the most recent claim.
    pub fn last_fired(&self) -> Option<NaiveDate> {
        match self.last_fired.load(Ordering::Acquire) {
            NEVER => None,
            days => NaiveDate::from_num_days_from_ce_opt(days),
        }
    }
}

/// Run `job` at every local midnight, forever.
pub async fn run_daily<J>(schedule: Arc<DailySchedule>, job: Arc<J>)
where
    J: DailyJob + ?Sized,
{
    info!(timezone = %schedule.clock().timezone(), "Daily scheduler started");
    loop {
        let now = Utc::now();
        let target = schedule.next_fire_after(now);
        let wait = (target - now).to_std().unwrap_or_default();
        debug!(fire_at = %target, wait_secs = wait.as_secs(), "Sleeping until next midnight");
        tokio::time::sleep(wait).await;

        if Utc::now() < target {
            // Woke early; the next iteration recomputes the same target.
            continue;
        }
        if !schedule.try_claim(target) {
            warn!(fire_at = %target, "Daily job already fired for this date, skipping");
            continue;
        }
        job.run(target).await;
    }
}
