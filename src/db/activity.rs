use chrono::Utc;
use rusqlite::params;
use uuid::Uuid;

use super::{ActivityKind, DbActivity, DbError, LeadDb};
use crate::status::LeadStatus;
use crate::types::{Lead, User};

const ACTIVITY_COLUMNS: &str =
    "id, kind, user_id, user_name, lead_id, lead_name, from_status, to_status, created_at";

impl LeadDb {
    // =========================================================================
    // Activity feed
    // =========================================================================

    /// Append an activity entry for a lead lifecycle event.
    pub fn record_activity(
        &self,
        kind: ActivityKind,
        actor: &User,
        lead: Option<&Lead>,
        from_status: Option<LeadStatus>,
        to_status: Option<LeadStatus>,
    ) -> Result<DbActivity, DbError> {
        let entry = DbActivity {
            id: Uuid::new_v4().to_string(),
            kind,
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            lead_id: lead.map(|l| l.id.clone()),
            lead_name: lead.map(|l| l.company_name.clone()),
            from_status: from_status.map(|s| s.as_str().to_string()),
            to_status: to_status.map(|s| s.as_str().to_string()),
            created_at: Utc::now().to_rfc3339(),
        };
        self.conn.execute(
            "INSERT INTO activity (
                id, kind, user_id, user_name, lead_id, lead_name,
                from_status, to_status, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.id,
                entry.kind.as_str(),
                entry.user_id,
                entry.user_name,
                entry.lead_id,
                entry.lead_name,
                entry.from_status,
                entry.to_status,
                entry.created_at,
            ],
        )?;
        Ok(entry)
    }

    /// Most recent activity entries, newest first.
    pub fn list_recent_activity(&self, limit: i32) -> Result<Vec<DbActivity>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity
             ORDER BY created_at DESC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], Self::map_activity_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Activity for one lead, newest first.
    pub fn list_activity_for_lead(&self, lead_id: &str) -> Result<Vec<DbActivity>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity
             WHERE lead_id = ?1
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params![lead_id], Self::map_activity_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Helper: map a row to `DbActivity`.
    fn map_activity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbActivity> {
        let kind: String = row.get(1)?;
        Ok(DbActivity {
            id: row.get(0)?,
            kind: ActivityKind::from_str_lossy(&kind),
            user_id: row.get(2)?,
            user_name: row.get(3)?,
            lead_id: row.get(4)?,
            lead_name: row.get(5)?,
            from_status: row.get(6)?,
            to_status: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}
