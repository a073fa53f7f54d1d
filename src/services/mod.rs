//! Business logic above the storage layer: lead lifecycle orchestration,
//! dashboard metrics, daily-task quotas, and email templates.

pub mod daily_tasks;
pub mod dashboard;
pub mod leads;
pub mod templates;
