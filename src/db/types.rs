//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),
}

/// A row from the `daily_tasks` table: one checklist item for one user on
/// one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbDailyTask {
    pub id: String,
    /// Template slug, e.g. `submit-leads`.
    pub task_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_count: i32,
    pub current_count: i32,
    pub completed: bool,
    pub icon: Option<String>,
    pub user_id: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A row from the `email_templates` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbEmailTemplate {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub user_id: String,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// What happened, for the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LeadCreated,
    LeadUpdated,
    StatusChanged,
    FollowupSent,
    ReplyReceived,
    LeadDeleted,
}

impl ActivityKind {
    /// String label for SQL storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::LeadCreated => "lead_created",
            ActivityKind::LeadUpdated => "lead_updated",
            ActivityKind::StatusChanged => "status_changed",
            ActivityKind::FollowupSent => "followup_sent",
            ActivityKind::ReplyReceived => "reply_received",
            ActivityKind::LeadDeleted => "lead_deleted",
        }
    }

    /// Parse from SQL string.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "lead_created" => ActivityKind::LeadCreated,
            "status_changed" => ActivityKind::StatusChanged,
            "followup_sent" => ActivityKind::FollowupSent,
            "reply_received" => ActivityKind::ReplyReceived,
            "lead_deleted" => ActivityKind::LeadDeleted,
            _ => ActivityKind::LeadUpdated,
        }
    }
}

/// A row from the `activity` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbActivity {
    pub id: String,
    pub kind: ActivityKind,
    pub user_id: String,
    pub user_name: String,
    pub lead_id: Option<String>,
    pub lead_name: Option<String>,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub created_at: String,
}
