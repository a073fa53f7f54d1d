//! Per-user, per-day task quotas.
//!
//! Every user gets the same mandatory checklist each day; counters move as
//! a side effect of lead actions (submitting a lead, opening the send-email
//! or follow-up flows) and a task completes itself once its target is hit.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{DbDailyTask, LeadDb};
use crate::error::LeadError;

/// One entry of the mandatory daily checklist.
#[derive(Debug, Clone, Copy)]
pub struct TaskTemplate {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target_count: i32,
    pub icon: &'static str,
}

/// The checklist every user starts each day with.
pub const MANDATORY_TASKS: [TaskTemplate; 5] = [
    TaskTemplate {
        slug: "find-leads",
        title: "Find 10\u{2013}15 new leads",
        description: "Research and identify potential prospects",
        target_count: 12,
        icon: "search",
    },
    TaskTemplate {
        slug: "submit-leads",
        title: "Submit leads using the form",
        description: "Add discovered leads to the system",
        target_count: 5,
        icon: "plus",
    },
    TaskTemplate {
        slug: "send-emails",
        title: "Send cold emails to new leads",
        description: "Reach out to new prospects with initial emails",
        target_count: 8,
        icon: "mail",
    },
    TaskTemplate {
        slug: "follow-up",
        title: "Follow up on pending leads",
        description: "Send follow-up emails to existing leads",
        target_count: 10,
        icon: "repeat",
    },
    TaskTemplate {
        slug: "update-statuses",
        title: "Update statuses",
        description: "Update lead statuses based on responses",
        target_count: 5,
        icon: "edit",
    },
];

/// Calendar-day key for task rows.
pub fn task_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Seed the mandatory checklist for a user/day if it isn't there yet, then
/// return the day's tasks. Safe to call on every dashboard load.
pub fn initialize_daily_tasks(
    db: &LeadDb,
    user_id: &str,
    date: &str,
) -> Result<Vec<DbDailyTask>, LeadError> {
    let now = Utc::now().to_rfc3339();
    // All-or-nothing seed so a half-created checklist never survives
    db.with_transaction(|tx| {
        for template in MANDATORY_TASKS {
            let task = DbDailyTask {
                id: Uuid::new_v4().to_string(),
                task_id: template.slug.to_string(),
                title: template.title.to_string(),
                description: Some(template.description.to_string()),
                target_count: template.target_count,
                current_count: 0,
                completed: false,
                icon: Some(template.icon.to_string()),
                user_id: user_id.to_string(),
                date: date.to_string(),
                created_at: now.clone(),
                updated_at: now.clone(),
            };
            // INSERT OR IGNORE under the (user, date, slug) key
            tx.insert_daily_task(&task)?;
        }
        Ok(())
    })?;
    Ok(db.get_daily_tasks(user_id, date)?)
}

/// Count one unit of progress against a task slug, seeding the day's
/// checklist first if needed. The completed flag flips automatically at the
/// target.
pub fn record_progress(
    db: &LeadDb,
    user_id: &str,
    slug: &str,
    date: &str,
) -> Result<DbDailyTask, LeadError> {
    let task = match db.get_daily_task(user_id, date, slug)? {
        Some(task) => task,
        None => {
            initialize_daily_tasks(db, user_id, date)?;
            db.get_daily_task(user_id, date, slug)?
                .ok_or_else(|| LeadError::NotFound(format!("daily task '{slug}'")))?
        }
    };

    db.increment_daily_task(&task.id)?
        .ok_or_else(|| LeadError::NotFound(format!("daily task '{slug}'")))
}

/// Manual checkbox toggle.
pub fn toggle_task(db: &LeadDb, task_id: &str) -> Result<DbDailyTask, LeadError> {
    let task = db
        .get_daily_task_by_id(task_id)?
        .ok_or_else(|| LeadError::NotFound(format!("daily task {task_id}")))?;
    db.set_daily_task_completed(task_id, !task.completed)?;
    db.get_daily_task_by_id(task_id)?
        .ok_or_else(|| LeadError::NotFound(format!("daily task {task_id}")))
}
