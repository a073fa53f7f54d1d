use chrono::Utc;
use rusqlite::params;

use super::{DbDailyTask, DbError, LeadDb};

const TASK_COLUMNS: &str = "id, task_id, title, description, target_count, current_count,
             completed, icon, user_id, date, created_at, updated_at";

impl LeadDb {
    // =========================================================================
    // Daily tasks
    // =========================================================================

    /// Insert a daily task row. `INSERT OR IGNORE` keeps template seeding
    /// idempotent across the `(user_id, date, task_id)` unique key.
    pub fn insert_daily_task(&self, task: &DbDailyTask) -> Result<bool, DbError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO daily_tasks (
                id, task_id, title, description, target_count, current_count,
                completed, icon, user_id, date, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                task.id,
                task.task_id,
                task.title,
                task.description,
                task.target_count,
                task.current_count,
                task.completed as i32,
                task.icon,
                task.user_id,
                task.date,
                task.created_at,
                task.updated_at,
            ],
        )?;
        Ok(n > 0)
    }

    /// All of a user's tasks for one calendar day, oldest first.
    pub fn get_daily_tasks(&self, user_id: &str, date: &str) -> Result<Vec<DbDailyTask>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM daily_tasks
             WHERE user_id = ?1 AND date = ?2
             ORDER BY created_at ASC"
        ))?;
        let rows = stmt.query_map(params![user_id, date], Self::map_task_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Look up one task by its template slug for a user/day.
    pub fn get_daily_task(
        &self,
        user_id: &str,
        date: &str,
        task_slug: &str,
    ) -> Result<Option<DbDailyTask>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM daily_tasks
             WHERE user_id = ?1 AND date = ?2 AND task_id = ?3"
        ))?;
        let mut rows = stmt.query_map(params![user_id, date, task_slug], Self::map_task_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Bump a task's counter by one; `completed` flips on automatically once
    /// the target is reached. Returns the updated row.
    pub fn increment_daily_task(&self, id: &str) -> Result<Option<DbDailyTask>, DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE daily_tasks SET
                current_count = current_count + 1,
                completed = CASE WHEN current_count + 1 >= target_count THEN 1 ELSE completed END,
                updated_at = ?2
             WHERE id = ?1",
            params![id, now],
        )?;
        self.get_daily_task_by_id(id)
    }

    /// Set a task's completed flag directly (manual checkbox toggle).
    pub fn set_daily_task_completed(&self, id: &str, completed: bool) -> Result<usize, DbError> {
        let now = Utc::now().to_rfc3339();
        let n = self.conn.execute(
            "UPDATE daily_tasks SET completed = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, completed as i32, now],
        )?;
        Ok(n)
    }

    /// Get a task by primary key.
    pub fn get_daily_task_by_id(&self, id: &str) -> Result<Option<DbDailyTask>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM daily_tasks WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map(params![id], Self::map_task_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Drop task rows older than `days_to_keep` calendar days.
    pub fn prune_daily_tasks(&self, days_to_keep: i64) -> Result<usize, DbError> {
        let n = self.conn.execute(
            "DELETE FROM daily_tasks WHERE date < date('now', ?1 || ' days')",
            params![format!("-{days_to_keep}")],
        )?;
        Ok(n)
    }

    /// Helper: map a row to `DbDailyTask`.
    fn map_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbDailyTask> {
        Ok(DbDailyTask {
            id: row.get(0)?,
            task_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            target_count: row.get(4)?,
            current_count: row.get(5)?,
            completed: row.get::<_, i32>(6)? != 0,
            icon: row.get(7)?,
            user_id: row.get(8)?,
            date: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn sample_task(id: &str, slug: &str, target: i32) -> DbDailyTask {
        let now = Utc::now().to_rfc3339();
        DbDailyTask {
            id: id.to_string(),
            task_id: slug.to_string(),
            title: "Submit leads using the form".to_string(),
            description: None,
            target_count: target,
            current_count: 0,
            completed: false,
            icon: Some("plus".to_string()),
            user_id: "u1".to_string(),
            date: "2026-08-05".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_is_idempotent_per_user_day_slug() {
        let db = test_db();
        assert!(db.insert_daily_task(&sample_task("t1", "submit-leads", 5)).unwrap());
        assert!(!db.insert_daily_task(&sample_task("t2", "submit-leads", 5)).unwrap());

        let tasks = db.get_daily_tasks("u1", "2026-08-05").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
    }

    #[test]
    fn test_increment_completes_at_target() {
        let db = test_db();
        db.insert_daily_task(&sample_task("t1", "submit-leads", 2)).unwrap();

        let after_one = db.increment_daily_task("t1").unwrap().unwrap();
        assert_eq!(after_one.current_count, 1);
        assert!(!after_one.completed);

        let after_two = db.increment_daily_task("t1").unwrap().unwrap();
        assert_eq!(after_two.current_count, 2);
        assert!(after_two.completed);

        // Counting past the target keeps the flag set
        let after_three = db.increment_daily_task("t1").unwrap().unwrap();
        assert_eq!(after_three.current_count, 3);
        assert!(after_three.completed);
    }

    #[test]
    fn test_prune_drops_old_days_only() {
        let db = test_db();
        let mut old = sample_task("t1", "submit-leads", 5);
        old.date = "2020-01-01".to_string();
        db.insert_daily_task(&old).unwrap();
        let mut fresh = sample_task("t2", "send-emails", 8);
        fresh.date = Utc::now().format("%Y-%m-%d").to_string();
        db.insert_daily_task(&fresh).unwrap();

        let pruned = db.prune_daily_tasks(30).unwrap();
        assert_eq!(pruned, 1);
        assert!(db.get_daily_task_by_id("t1").unwrap().is_none());
        assert!(db.get_daily_task_by_id("t2").unwrap().is_some());
    }

    #[test]
    fn test_toggle_completed_flag() {
        let db = test_db();
        db.insert_daily_task(&sample_task("t1", "submit-leads", 5)).unwrap();
        db.set_daily_task_completed("t1", true).unwrap();
        assert!(db.get_daily_task_by_id("t1").unwrap().unwrap().completed);
        db.set_daily_task_completed("t1", false).unwrap();
        assert!(!db.get_daily_task_by_id("t1").unwrap().unwrap().completed);
    }
}
