use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{parse_timestamp, DbError, LeadDb};
use crate::status::LeadStatus;
use crate::types::{Lead, LeadStats, OwnerScope};

const LEAD_COLUMNS: &str = "id, company_name, website, contact_person_name, contact_email,
             linkedin_profile, assigned_intern, status, created_at, updated_at,
             followups_sent, has_replies, owner_id";

impl LeadDb {
    // =========================================================================
    // Leads
    // =========================================================================

    /// Insert a fully-populated lead row.
    ///
    /// The unique `(owner_id, LOWER(contact_email))` index backs the
    /// duplicate-email guard; the service layer checks first so it can
    /// surface a typed error instead of a constraint violation.
    pub fn insert_lead(&self, lead: &Lead) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO leads (
                id, company_name, website, contact_person_name, contact_email,
                linkedin_profile, assigned_intern, status, created_at, updated_at,
                followups_sent, has_replies, owner_id
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                lead.id,
                lead.company_name,
                lead.website,
                lead.contact_person_name,
                lead.contact_email,
                lead.linkedin_profile,
                lead.assigned_intern,
                lead.status.as_str(),
                lead.created_at.to_rfc3339(),
                lead.updated_at.to_rfc3339(),
                lead.followups_sent,
                lead.has_replies as i32,
                lead.owner_id,
            ],
        )?;
        Ok(())
    }

    /// Check whether `email` is already used by a lead of the same owner
    /// (case-insensitive).
    pub fn email_exists_for_owner(&self, owner_id: &str, email: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM leads
                WHERE owner_id = ?1 AND LOWER(contact_email) = LOWER(?2)
             )",
            params![owner_id, email],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Get a lead by id.
    pub fn get_lead(&self, id: &str) -> Result<Option<Lead>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::map_lead_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// All leads visible to the given scope, newest first.
    pub fn list_leads(&self, scope: &OwnerScope) -> Result<Vec<Lead>, DbError> {
        let leads = match scope {
            OwnerScope::All => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC"
                ))?;
                let rows = stmt.query_map([], Self::map_lead_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            OwnerScope::Owner(owner_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {LEAD_COLUMNS} FROM leads WHERE owner_id = ?1 ORDER BY created_at DESC"
                ))?;
                let rows = stmt.query_map(params![owner_id], Self::map_lead_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(leads)
    }

    /// Leads assigned to a named intern, within the given scope.
    pub fn list_leads_for_intern(
        &self,
        intern_name: &str,
        scope: &OwnerScope,
    ) -> Result<Vec<Lead>, DbError> {
        let leads = match scope {
            OwnerScope::All => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {LEAD_COLUMNS} FROM leads WHERE assigned_intern = ?1
                     ORDER BY created_at DESC"
                ))?;
                let rows = stmt.query_map(params![intern_name], Self::map_lead_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            OwnerScope::Owner(owner_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {LEAD_COLUMNS} FROM leads
                     WHERE assigned_intern = ?1 AND owner_id = ?2
                     ORDER BY created_at DESC"
                ))?;
                let rows = stmt.query_map(params![intern_name, owner_id], Self::map_lead_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(leads)
    }

    /// Write back every mutable column of a lead. Returns affected row count.
    pub fn update_lead_row(&self, lead: &Lead) -> Result<usize, DbError> {
        let n = self.conn.execute(
            "UPDATE leads SET
                company_name = ?2, website = ?3, contact_person_name = ?4,
                contact_email = ?5, linkedin_profile = ?6, assigned_intern = ?7,
                status = ?8, updated_at = ?9, followups_sent = ?10, has_replies = ?11
             WHERE id = ?1",
            params![
                lead.id,
                lead.company_name,
                lead.website,
                lead.contact_person_name,
                lead.contact_email,
                lead.linkedin_profile,
                lead.assigned_intern,
                lead.status.as_str(),
                lead.updated_at.to_rfc3339(),
                lead.followups_sent,
                lead.has_replies as i32,
            ],
        )?;
        Ok(n)
    }

    /// Set only the status and `updated_at` (manual transition write).
    pub fn update_lead_status(
        &self,
        id: &str,
        status: LeadStatus,
        now: DateTime<Utc>,
    ) -> Result<usize, DbError> {
        let n = self.conn.execute(
            "UPDATE leads SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status.as_str(), now.to_rfc3339()],
        )?;
        Ok(n)
    }

    /// The auto-advance write: one statement sets the next status, counts
    /// the follow-up, and resets the dwell clock.
    pub fn promote_lead(
        &self,
        id: &str,
        next: LeadStatus,
        now: DateTime<Utc>,
    ) -> Result<usize, DbError> {
        let n = self.conn.execute(
            "UPDATE leads SET
                status = ?2,
                followups_sent = followups_sent + 1,
                updated_at = ?3
             WHERE id = ?1",
            params![id, next.as_str(), now.to_rfc3339()],
        )?;
        Ok(n)
    }

    /// Record that the prospect wrote back. Exempts the lead from
    /// auto-advance permanently.
    pub fn set_has_replies(
        &self,
        id: &str,
        has_replies: bool,
        now: DateTime<Utc>,
    ) -> Result<usize, DbError> {
        let n = self.conn.execute(
            "UPDATE leads SET has_replies = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, has_replies as i32, now.to_rfc3339()],
        )?;
        Ok(n)
    }

    /// Hard delete. No soft-delete flag exists for leads.
    pub fn delete_lead(&self, id: &str) -> Result<usize, DbError> {
        let n = self
            .conn
            .execute("DELETE FROM leads WHERE id = ?1", params![id])?;
        Ok(n)
    }

    /// Per-status counts for the stats header.
    pub fn lead_stats(&self, scope: &OwnerScope) -> Result<LeadStats, DbError> {
        let rows: Vec<(String, bool)> = match scope {
            OwnerScope::All => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT status, has_replies FROM leads")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)? != 0))
                })?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            OwnerScope::Owner(owner_id) => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT status, has_replies FROM leads WHERE owner_id = ?1")?;
                let rows = stmt.query_map(params![owner_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)? != 0))
                })?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        let mut stats = LeadStats::default();
        for (status, has_replies) in rows {
            stats.total += 1;
            match LeadStatus::parse_opt(&status) {
                Some(LeadStatus::New) => stats.new += 1,
                Some(LeadStatus::EmailSent) => stats.email_sent += 1,
                Some(LeadStatus::Followup1) => stats.followup_1 += 1,
                Some(LeadStatus::Followup2) => stats.followup_2 += 1,
                Some(LeadStatus::Followup3) => stats.followup_3 += 1,
                Some(LeadStatus::Replied) => stats.replied += 1,
                Some(LeadStatus::Booked) => stats.booked += 1,
                Some(LeadStatus::Converted) => stats.converted += 1,
                Some(LeadStatus::Closed) => stats.closed += 1,
                None => {}
            }
            if has_replies {
                stats.with_replies += 1;
            }
        }
        Ok(stats)
    }

    /// Helper: map a row to `Lead`.
    fn map_lead_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lead> {
        let status: String = row.get(7)?;
        let status = LeadStatus::parse_opt(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                format!("unknown lead status '{status}'").into(),
            )
        })?;
        let created_at: String = row.get(8)?;
        let updated_at: String = row.get(9)?;
        Ok(Lead {
            id: row.get(0)?,
            company_name: row.get(1)?,
            website: row.get(2)?,
            contact_person_name: row.get(3)?,
            contact_email: row.get(4)?,
            linkedin_profile: row.get(5)?,
            assigned_intern: row.get(6)?,
            status,
            created_at: parse_timestamp(8, &created_at)?,
            updated_at: parse_timestamp(9, &updated_at)?,
            followups_sent: row.get(10)?,
            has_replies: row.get::<_, i32>(11)? != 0,
            owner_id: row.get(12)?,
        })
    }
}
