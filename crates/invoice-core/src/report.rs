//! Daily per-contributor statistics.
//!
//! Three store reads for one window (created, resolved, deleted), grouped by
//! the contributor who added each invoice. Only contributors who added at
//! least one invoice in the window get a row; resolved or deleted invoices
//! of anyone else land in [`DailyReport::unattributed`] and still count in
//! the totals.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use invoice_models::Invoice;
use invoice_store::InvoiceStore;
use tracing::debug;

use crate::error::Result;

/// Added/resolved/deleted counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub added: usize,
    pub resolved: usize,
    pub deleted: usize,
}

impl CategoryCounts {
    pub fn new(added: usize, resolved: usize, deleted: usize) -> Self {
        Self {
            added,
            resolved,
            deleted,
        }
    }
}

/// One contributor's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeStats {
    pub user_id: i64,
    /// Name from the contributor's first "added" record in the window.
    pub name: String,
    pub counts: CategoryCounts,
}

/// Aggregated statistics since a day boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    pub since: DateTime<Utc>,
    pub totals: CategoryCounts,
    /// Rows in order of first appearance among the added invoices.
    pub employees: Vec<EmployeeStats>,
    /// Resolved/deleted invoices whose contributor has no row.
    pub unattributed: CategoryCounts,
}

impl DailyReport {
    /// Group the three result sets of one window.
    pub fn aggregate(
        since: DateTime<Utc>,
        added: &[Invoice],
        resolved: &[Invoice],
        deleted: &[Invoice],
    ) -> Self {
        let mut employees: Vec<EmployeeStats> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for invoice in added {
            let user_id = invoice.added_by.user_id;
            let slot = *index.entry(user_id).or_insert_with(|| {
                employees.push(EmployeeStats {
                    user_id,
                    name: invoice.added_by.full_name.clone(),
                    counts: CategoryCounts::default(),
                });
                employees.len() - 1
            });
            employees[slot].counts.added += 1;
        }

        let mut unattributed = CategoryCounts::default();
        for invoice in resolved {
            match index.get(&invoice.added_by.user_id) {
                Some(&slot) => employees[slot].counts.resolved += 1,
                None => unattributed.resolved += 1,
            }
        }
        for invoice in deleted {
            match index.get(&invoice.added_by.user_id) {
                Some(&slot) => employees[slot].counts.deleted += 1,
                None => unattributed.deleted += 1,
            }
        }

        Self {
            since,
            totals: CategoryCounts::new(added.len(), resolved.len(), deleted.len()),
            employees,
            unattributed,
        }
    }

    pub fn employee(&self, user_id: i64) -> Option<&EmployeeStats> {
        self.employees.iter().find(|e| e.user_id == user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.totals == CategoryCounts::default()
    }
}

/// Computes [`DailyReport`]s from store queries.
#[derive(Clone)]
pub struct ReportAggregator {
    store: Arc<dyn InvoiceStore>,
}

impl ReportAggregator {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Report for everything since `day_start`.
    pub async fn daily_report(&self, day_start: DateTime<Utc>) -> Result<DailyReport> {
        let added = self.store.list_created_since(day_start).await?;
        let resolved = self.store.list_resolved_since(day_start).await?;
        let deleted = self.store.list_deleted_since(day_start).await?;

        let report = DailyReport::aggregate(day_start, &added, &resolved, &deleted);
        debug!(
            since = %day_start,
            added = report.totals.added,
            resolved = report.totals.resolved,
            deleted = report.totals.deleted,
            employees = report.employees.len(),
            "Daily report computed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invoice_models::{Contributor, InvoiceStatus, NewInvoice};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn invoice(message_id: i32, user_id: i64, name: &str) -> Invoice {
        NewInvoice::new(100, message_id, "Client", Contributor::new(user_id, name)).into_invoice(at())
    }

    fn with_status(mut invoice: Invoice, status: InvoiceStatus) -> Invoice {
        invoice.set_status(status, at());
        invoice
    }

    #[test]
    fn test_groups_by_contributor_in_first_appearance_order() {
        let added = vec![
            invoice(1, 7, "Boris"),
            invoice(2, 5, "Anna"),
            invoice(3, 7, "Boris B."),
        ];
        let report = DailyReport::aggregate(at(), &added, &[], &[]);

        assert_eq!(report.employees.len(), 2);
        assert_eq!(report.employees[0].user_id, 7);
        assert_eq!(report.employees[0].name, "Boris");
        assert_eq!(report.employees[0].counts.added, 2);
        assert_eq!(report.employees[1].user_id, 5);
    }

    #[test]
    fn test_unattributed_counts_keep_totals_consistent() {
        let added = vec![invoice(1, 5, "Anna")];
        let resolved = vec![
            with_status(invoice(1, 5, "Anna"), InvoiceStatus::Resolved),
            with_status(invoice(9, 8, "Old"), InvoiceStatus::Resolved),
        ];
        let deleted = vec![with_status(invoice(10, 8, "Old"), InvoiceStatus::Deleted)];

        let report = DailyReport::aggregate(at(), &added, &resolved, &deleted);

        assert!(report.employee(8).is_none());
        assert_eq!(report.totals, CategoryCounts::new(1, 2, 1));
        assert_eq!(report.unattributed, CategoryCounts::new(0, 1, 1));

        let sum = report.employees.iter().fold(report.unattributed, |mut acc, e| {
            acc.added += e.counts.added;
            acc.resolved += e.counts.resolved;
            acc.deleted += e.counts.deleted;
            acc
        });
        assert_eq!(sum, report.totals);
    }

    #[test]
    fn test_empty_window() {
        let report = DailyReport::aggregate(at(), &[], &[], &[]);
        assert!(report.is_empty());
        assert!(report.employees.is_empty());
    }
}
