//! Message text for chat responses.
//!
//! Everything returned here is Telegram HTML unless noted otherwise, so any
//! user-supplied text goes through [`html_escape`].

use invoice_core::DailyReport;
use invoice_models::Invoice;

/// Prefix Telegram puts in front of supergroup and channel ids.
const SUPERGROUP_PREFIX: &str = "-100";

/// Sent when `/list` finds nothing open. Picked by the current second.
const EMPTY_LIST_PLACEHOLDERS: [&str; 10] = [
    "🎯 Every invoice is resolved. Clients are happy and you are on top of it as usual.",
    "🔥 Problems come and go, you stay the master of your craft. Nothing is left open.",
    "🚀 Clearing the whole queue? For this team it is just another day at the top.",
    "💪 No compromises: every invoice closed, every client smiling.",
    "⚡ No hard days when everything gets solved fast and precisely. That is professionalism.",
    "💼 This is more than handling calls, it is a craft. All invoices closed, all clients happy.",
    "🥋 Closing every invoice is a clean sparring round: precise, with no wasted moves.",
    "🌟 Each closed question proves real professionals are not afraid of a challenge.",
    "🍀 Invoices closed and clients happy. The world got a little better thanks to your work.",
    "🔑 Real professionals do not ask how to solve it. They just solve it, and solve it well.",
];

/// Plain-text reply to private messages from users outside the allow-list.
pub const ACCESS_DENIED: &str = "Please contact an administrator to get access.";

/// Plain-text reply to `/add` when it is not a reply to a photo.
pub const ADD_NEEDS_PHOTO: &str = "❌ /add only works as a reply to a message with a photo.";

/// Plain-text reply to `/add` when no client name can be found.
pub const ADD_NEEDS_CLIENT_NAME: &str = "⚠️ An invoice needs a client name. You can:\n\
    - add a caption to the photo message and then use /add, or\n\
    - reply to the photo with /add <client name>.";

/// Escape text for Telegram's HTML parse mode.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Link that opens `message_id` inside `chat_id`.
///
/// Telegram's `t.me/c/` links take the internal chat id, which is the
/// supergroup id without its `-100` prefix.
pub fn deep_link(chat_id: i64, message_id: i32) -> String {
    let raw = chat_id.to_string();
    let internal = match raw.strip_prefix(SUPERGROUP_PREFIX) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => chat_id.unsigned_abs().to_string(),
    };
    format!("https://t.me/c/{}/{}", internal, message_id)
}

/// Numbered listing of open invoices. `now` is the local timestamp shown
/// in the header.
pub fn open_list(invoices: &[Invoice], now: &str) -> String {
    let mut lines = Vec::with_capacity(invoices.len() + 1);
    lines.push(format!(
        "📋 Open invoices as of {}: {}",
        html_escape(now),
        invoices.len()
    ));
    for (idx, invoice) in invoices.iter().enumerate() {
        lines.push(format!(
            "{}. {} — <a href=\"{}\">Link</a>",
            idx + 1,
            html_escape(&invoice.client_name),
            deep_link(invoice.chat_id, invoice.message_id)
        ));
    }
    lines.join("\n")
}

/// Plain-text placeholder for an empty listing.
pub fn empty_list_placeholder(second: u32) -> &'static str {
    EMPTY_LIST_PLACEHOLDERS[second as usize % EMPTY_LIST_PLACEHOLDERS.len()]
}

pub fn daily_report(report: &DailyReport, now: &str) -> String {
    let mut out = format!(
        "📊 Invoice report as of {}:\n\
         ➖ Added: {}\n\
         ✅ Resolved: {}\n\
         ❌ Deleted: {}\n",
        html_escape(now),
        report.totals.added,
        report.totals.resolved,
        report.totals.deleted
    );

    out.push_str("\n📋 Per employee:\n");
    for employee in &report.employees {
        out.push_str(&format!(
            "👤 <b>{}</b>:\n   ➕ Added: {}\n   ✅ Resolved: {}\n   ❌ Deleted: {}\n",
            html_escape(&employee.name),
            employee.counts.added,
            employee.counts.resolved,
            employee.counts.deleted
        ));
    }

    let other = report.unattributed;
    if other.resolved > 0 || other.deleted > 0 {
        out.push_str(&format!(
            "\n🗂 Earlier invoices: ✅ {} resolved, ❌ {} deleted\n",
            other.resolved, other.deleted
        ));
    }
    out
}

/// Plain-text usage. The first configured marker is the one advertised.
pub fn help_text(markers: &[String]) -> String {
    let marker = markers.first().map(String::as_str).unwrap_or("++");
    format!(
        "🛠 Commands:\n\
         /list - Show open invoices.\n\
         /add - Add an invoice. Use it as a reply to the invoice photo.\n\
         /del - Delete an invoice. Reply to it or give its number from /list.\n\
         /report - Today's invoice report (administrators only).\n\
         /help - Show this message.\n\n\
         💬 Also:\n\
         - Reply to an invoice with \"{}\" to mark it resolved.\n\
         - Send a photo with a caption and it is added automatically.",
        marker
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invoice_core::CategoryCounts;
    use invoice_models::{Contributor, NewInvoice};

    #[test]
    fn test_deep_link_strips_supergroup_prefix() {
        assert_eq!(
            deep_link(-1001509336046, 42),
            "https://t.me/c/1509336046/42"
        );
    }

    #[test]
    fn test_deep_link_for_plain_group() {
        assert_eq!(deep_link(-4567, 3), "https://t.me/c/4567/3");
        assert_eq!(deep_link(-100, 3), "https://t.me/c/100/3");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("A&B <i>\"x\"</i>"), "A&amp;B &lt;i&gt;&quot;x&quot;&lt;/i&gt;");
    }

    #[test]
    fn test_open_list_numbering_and_escaping() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let invoices = vec![
            NewInvoice::new(-1001, 1, "Ivanov", Contributor::new(5, "Anna")).into_invoice(at),
            NewInvoice::new(-1001, 2, "<Petrov>", Contributor::new(5, "Anna")).into_invoice(at),
        ];

        let text = open_list(&invoices, "2024-03-01 11:00:00");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "📋 Open invoices as of 2024-03-01 11:00:00: 2");
        assert_eq!(lines[1], "1. Ivanov — <a href=\"https://t.me/c/1/1\">Link</a>");
        assert!(lines[2].starts_with("2. &lt;Petrov&gt;"));
    }

    #[test]
    fn test_placeholder_rotates() {
        assert_eq!(empty_list_placeholder(0), EMPTY_LIST_PLACEHOLDERS[0]);
        assert_eq!(empty_list_placeholder(13), EMPTY_LIST_PLACEHOLDERS[3]);
        assert_eq!(empty_list_placeholder(59), EMPTY_LIST_PLACEHOLDERS[9]);
        assert!(empty_list_placeholder(59).starts_with("🔑"));
    }

    #[test]
    fn test_report_lists_employees_and_earlier_invoices() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let added =
            vec![NewInvoice::new(1, 1, "C", Contributor::new(5, "Anna")).into_invoice(since)];
        let mut report = DailyReport::aggregate(since, &added, &[], &[]);
        report.unattributed = CategoryCounts::new(0, 2, 0);

        let text = daily_report(&report, "now");
        assert!(text.contains("➖ Added: 1"));
        assert!(text.contains("👤 <b>Anna</b>:"));
        assert!(text.contains("Earlier invoices: ✅ 2 resolved"));
    }

    #[test]
    fn test_help_advertises_marker() {
        let text = help_text(&["+1".to_string()]);
        assert!(text.contains("\"+1\""));
        assert!(text.contains("/report"));
    }
}
