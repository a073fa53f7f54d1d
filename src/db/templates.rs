use chrono::Utc;
use rusqlite::params;

use super::{DbEmailTemplate, DbError, LeadDb};

const TEMPLATE_COLUMNS: &str =
    "id, name, subject, body, user_id, is_public, created_at, updated_at";

impl LeadDb {
    // =========================================================================
    // Email templates
    // =========================================================================

    /// Insert a template row.
    pub fn insert_template(&self, template: &DbEmailTemplate) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO email_templates (
                id, name, subject, body, user_id, is_public, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                template.id,
                template.name,
                template.subject,
                template.body,
                template.user_id,
                template.is_public as i32,
                template.created_at,
                template.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a template by id.
    pub fn get_template(&self, id: &str) -> Result<Option<DbEmailTemplate>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map(params![id], Self::map_template_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Templates a user can see: their own plus any public ones, newest first.
    pub fn list_templates_visible_to(
        &self,
        user_id: &str,
    ) -> Result<Vec<DbEmailTemplate>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM email_templates
             WHERE user_id = ?1 OR is_public = 1
             ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params![user_id], Self::map_template_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Overwrite a template's editable fields.
    pub fn update_template(
        &self,
        id: &str,
        name: &str,
        subject: &str,
        body: &str,
        is_public: bool,
    ) -> Result<usize, DbError> {
        let now = Utc::now().to_rfc3339();
        let n = self.conn.execute(
            "UPDATE email_templates SET
                name = ?2, subject = ?3, body = ?4, is_public = ?5, updated_at = ?6
             WHERE id = ?1",
            params![id, name, subject, body, is_public as i32, now],
        )?;
        Ok(n)
    }

    /// Delete a template row.
    pub fn delete_template(&self, id: &str) -> Result<usize, DbError> {
        let n = self
            .conn
            .execute("DELETE FROM email_templates WHERE id = ?1", params![id])?;
        Ok(n)
    }

    /// Helper: map a row to `DbEmailTemplate`.
    fn map_template_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbEmailTemplate> {
        Ok(DbEmailTemplate {
            id: row.get(0)?,
            name: row.get(1)?,
            subject: row.get(2)?,
            body: row.get(3)?,
            user_id: row.get(4)?,
            is_public: row.get::<_, i32>(5)? != 0,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn sample_template(id: &str, user: &str, is_public: bool) -> DbEmailTemplate {
        let now = Utc::now().to_rfc3339();
        DbEmailTemplate {
            id: id.to_string(),
            name: "Cold intro".to_string(),
            subject: "Quick question about {{company}}".to_string(),
            body: "Hi {{firstName}},".to_string(),
            user_id: user.to_string(),
            is_public,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn test_visibility_is_own_plus_public() {
        let db = test_db();
        db.insert_template(&sample_template("tp1", "u1", false)).unwrap();
        db.insert_template(&sample_template("tp2", "u2", false)).unwrap();
        db.insert_template(&sample_template("tp3", "u2", true)).unwrap();

        let visible = db.list_templates_visible_to("u1").unwrap();
        let ids: Vec<_> = visible.iter().map(|t| t.id.as_str()).collect();
        assert!(ids.contains(&"tp1"));
        assert!(ids.contains(&"tp3"));
        assert!(!ids.contains(&"tp2"));
    }

    #[test]
    fn test_update_and_delete() {
        let db = test_db();
        db.insert_template(&sample_template("tp1", "u1", false)).unwrap();

        let n = db
            .update_template("tp1", "Renamed", "New subject", "New body", true)
            .unwrap();
        assert_eq!(n, 1);
        let got = db.get_template("tp1").unwrap().unwrap();
        assert_eq!(got.name, "Renamed");
        assert!(got.is_public);

        assert_eq!(db.delete_template("tp1").unwrap(), 1);
        assert!(db.get_template("tp1").unwrap().is_none());
    }
}
