//! Dashboard metrics: action-card counters and today's performance stats.
//!
//! Pure functions over an in-memory lead slice (typically the cache
//! snapshot) so the dashboard can recompute on every render.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::DbDailyTask;
use crate::filter::followup_due;
use crate::status::LeadStatus;
use crate::types::Lead;

/// "Today's Performance" card numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub leads_added: u32,
    pub emails_sent: u32,
    pub replies: u32,
    pub calls_booked: u32,
}

/// Leads that still need a first email ("To Email" card).
pub fn leads_to_email(leads: &[Lead]) -> usize {
    leads
        .iter()
        .filter(|l| l.status == LeadStatus::New)
        .count()
}

/// Leads whose dwell time has elapsed with no reply ("Follow-ups" card).
pub fn followups_due(leads: &[Lead], now: DateTime<Utc>) -> usize {
    leads.iter().filter(|l| followup_due(l, now)).count()
}

/// Prospects who replied but haven't been booked yet ("Replied" card).
pub fn replied_not_booked(leads: &[Lead]) -> usize {
    leads
        .iter()
        .filter(|l| {
            l.status == LeadStatus::Replied
                || (l.has_replies && l.status != LeadStatus::Booked)
        })
        .count()
}

/// Compute today's performance from the lead slice and the user's daily
/// task progress. Task counters win when present (they track actions, not
/// just end states); lead timestamps are the fallback.
pub fn today_stats(
    leads: &[Lead],
    tasks: &[DbDailyTask],
    user_id: &str,
    now: DateTime<Utc>,
) -> TodayStats {
    let today = now.date_naive();

    let task_count = |slug: &str| -> Option<u32> {
        tasks
            .iter()
            .find(|t| t.user_id == user_id && t.task_id == slug)
            .map(|t| t.current_count.max(0) as u32)
    };

    let leads_added_today = leads
        .iter()
        .filter(|l| l.created_at.date_naive() == today)
        .count() as u32;

    let replies = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Replied && l.updated_at.date_naive() == today)
        .count() as u32;

    let calls_booked = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Booked && l.updated_at.date_naive() == today)
        .count() as u32;

    TodayStats {
        leads_added: task_count("submit-leads").unwrap_or(leads_added_today),
        emails_sent: task_count("send-emails").unwrap_or(0),
        replies,
        calls_booked,
    }
}
