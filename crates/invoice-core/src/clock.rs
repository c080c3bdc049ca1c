//! Reporting day boundaries.
//!
//! A reporting day runs from local midnight to local midnight in one fixed
//! timezone, regardless of where chat members are.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone used when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Kyiv;

/// Timestamp format used in chat messages.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts instants to reporting-day boundaries in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportClock {
    tz: Tz,
}

impl Default for ReportClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl ReportClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local calendar date of `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Start of the reporting day containing `instant`.
    pub fn day_start(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.midnight_of(self.local_date(instant))
    }

    /// Start of the current reporting day.
    pub fn today_start(&self) -> DateTime<Utc> {
        self.day_start(Utc::now())
    }

    /// First local midnight strictly after `instant`.
    pub fn next_midnight(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let today = self.local_date(instant);
        match today.succ_opt() {
            Some(tomorrow) => self.midnight_of(tomorrow),
            None => instant + Duration::days(1),
        }
    }

    /// `instant` rendered in local time for chat messages.
    pub fn format_local(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format(DISPLAY_FORMAT)
            .to_string()
    }

    /// Local midnight of `date` as a UTC instant.
    ///
    /// In zones where midnight falls into a DST gap the first valid local
    /// time of that day is used.
    pub fn midnight_of(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = date.and_time(NaiveTime::MIN);
        if let Some(local) = self.tz.from_local_datetime(&naive).earliest() {
            return local.with_timezone(&Utc);
        }
        let shifted = naive + Duration::hours(1);
        match self.tz.from_local_datetime(&shifted).earliest() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&naive),
        }
    }
}
