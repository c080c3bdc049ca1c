//! Midnight rollover of the reporting day.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use invoice_core::{DailyJob, ReportAggregator, ReportClock};
use tracing::{info, warn};

use crate::chat::ChatActions;
use crate::render;

/// Closes the previous reporting day: logs its totals and sends the report
/// to the digest recipients, if any.
pub struct DailyRollover {
    reports: ReportAggregator,
    clock: ReportClock,
    chat: Arc<dyn ChatActions>,
    recipients: Vec<i64>,
}

impl DailyRollover {
    pub fn new(reports: ReportAggregator, clock: ReportClock, chat: Arc<dyn ChatActions>) -> Self {
        Self {
            reports,
            clock,
            chat,
            recipients: Vec::new(),
        }
    }

    /// Send the closed day's report to `recipients`.
    pub fn with_digest(mut self, recipients: Vec<i64>) -> Self {
        self.recipients = recipients;
        self
    }
}

#[async_trait]
impl DailyJob for DailyRollover {
    async fn run(&self, midnight: DateTime<Utc>) {
        let closed_day = self.clock.day_start(midnight - Duration::seconds(1));
        let report = match self.reports.daily_report(closed_day).await {
            Ok(report) => report,
            Err(e) => {
                warn!(day = %self.clock.local_date(closed_day), error = %e, "Failed to build daily report");
                return;
            }
        };

        info!(
            day = %self.clock.local_date(closed_day),
            added = report.totals.added,
            resolved = report.totals.resolved,
            deleted = report.totals.deleted,
            "Reporting day closed"
        );

        if self.recipients.is_empty() {
            return;
        }
        let text = render::daily_report(&report, &self.clock.format_local(midnight));
        for &user_id in &self.recipients {
            if let Err(e) = self.chat.send_html(user_id, &text).await {
                warn!(user_id, error = %e, "Failed to send daily digest");
            }
        }
    }
}
