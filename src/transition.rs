//! Manual status transitions: the user dragged a card to another column or
//! edited the status field directly.
//!
//! Manual moves bypass the dwell-time table entirely — skipping stages or
//! moving backward is legitimate user intent, not an error.

use chrono::{DateTime, Utc};

use crate::db::LeadDb;
use crate::error::LeadError;
use crate::status::LeadStatus;
use crate::types::Lead;

/// Result of a manual transition request.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The status changed; carries the updated lead.
    Applied(Lead),
    /// Nothing was written: same status, or an unrecognized target.
    NoOp,
}

impl TransitionOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, TransitionOutcome::NoOp)
    }
}

/// Apply a user-requested status change.
///
/// An unrecognized `target` slug is a user-error guard, not a security
/// boundary: it degrades to `NoOp` instead of raising. A target equal to
/// the current status is also a `NoOp` so `updated_at` doesn't churn.
/// `followups_sent` and `has_replies` are never touched here.
pub fn apply_manual_transition(
    db: &LeadDb,
    lead_id: &str,
    target: &str,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, LeadError> {
    let Some(target) = LeadStatus::parse_opt(target) else {
        log::debug!("Manual transition ignored: unrecognized status '{target}'");
        return Ok(TransitionOutcome::NoOp);
    };

    let mut lead = db
        .get_lead(lead_id)?
        .ok_or_else(|| LeadError::NotFound(lead_id.to_string()))?;

    if lead.status == target {
        return Ok(TransitionOutcome::NoOp);
    }

    let n = db.update_lead_status(lead_id, target, now)?;
    if n == 0 {
        // Deleted between the read and the write
        return Err(LeadError::NotFound(lead_id.to_string()));
    }

    log::info!(
        "Manual transition: lead {} {} -> {}",
        lead.id,
        lead.status,
        target
    );
    lead.status = target;
    lead.updated_at = now;
    Ok(TransitionOutcome::Applied(lead))
}

/// What a dragged card was released over.
#[derive(Debug, Clone, Copy)]
pub enum DropTarget<'a> {
    /// A pipeline column; its identity is the target status.
    Column(LeadStatus),
    /// Another lead's card; the target status is that card's column.
    Card(&'a Lead),
}

/// Resolve a drop gesture to the `(lead_id, target_status)` transition
/// contract. Pure — no UI types, no store access — so the gesture mapping
/// is testable on its own. A drop outside any recognized target resolves
/// to `None` (no transition).
pub fn resolve_drop(
    dragged_id: &str,
    over: Option<DropTarget<'_>>,
) -> Option<(String, LeadStatus)> {
    let target = match over? {
        DropTarget::Column(status) => status,
        DropTarget::Card(lead) => lead.status,
    };
    Some((dragged_id.to_string(), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use chrono::Duration;

    fn seed(db: &LeadDb, id: &str, status: LeadStatus) -> Lead {
        let now = Utc::now() - Duration::hours(6);
        let lead = Lead {
            id: id.to_string(),
            company_name: format!("Company {id}"),
            website: String::new(),
            contact_person_name: "Jane Doe".to_string(),
            contact_email: format!("{id}@example.com"),
            linkedin_profile: None,
            assigned_intern: "Jess Alder".to_string(),
            status,
            created_at: now,
            updated_at: now,
            followups_sent: 2,
            has_replies: false,
            owner_id: "u1".to_string(),
        };
        db.insert_lead(&lead).unwrap();
        lead
    }

    #[test]
    fn test_applies_a_status_change() {
        let db = test_db();
        seed(&db, "l1", LeadStatus::New);

        let now = Utc::now();
        let outcome = apply_manual_transition(&db, "l1", "email-sent", now).unwrap();
        match outcome {
            TransitionOutcome::Applied(lead) => {
                assert_eq!(lead.status, LeadStatus::EmailSent);
                assert_eq!(lead.updated_at.timestamp(), now.timestamp());
            }
            TransitionOutcome::NoOp => panic!("expected Applied"),
        }

        let stored = db.get_lead("l1").unwrap().unwrap();
        assert_eq!(stored.status, LeadStatus::EmailSent);
        // Counters survive a manual move untouched
        assert_eq!(stored.followups_sent, 2);
        assert!(!stored.has_replies);
    }

    #[test]
    fn test_same_status_is_a_noop_with_no_write() {
        let db = test_db();
        let before = seed(&db, "l1", LeadStatus::EmailSent);

        let outcome =
            apply_manual_transition(&db, "l1", "email-sent", Utc::now()).unwrap();
        assert!(outcome.is_noop());

        let stored = db.get_lead("l1").unwrap().unwrap();
        assert_eq!(
            stored.updated_at.timestamp(),
            before.updated_at.timestamp(),
            "no-op must not churn updated_at"
        );
    }

    #[test]
    fn test_unknown_status_is_silently_ignored() {
        let db = test_db();
        let before = seed(&db, "l1", LeadStatus::New);

        let outcome =
            apply_manual_transition(&db, "l1", "not-a-real-status", Utc::now()).unwrap();
        assert!(outcome.is_noop());

        let stored = db.get_lead("l1").unwrap().unwrap();
        assert_eq!(stored.status, LeadStatus::New);
        assert_eq!(stored.updated_at.timestamp(), before.updated_at.timestamp());
    }

    #[test]
    fn test_backward_and_stage_skipping_moves_are_legal() {
        let db = test_db();
        seed(&db, "l1", LeadStatus::Followup2);

        // Backward
        let outcome = apply_manual_transition(&db, "l1", "new", Utc::now()).unwrap();
        assert!(!outcome.is_noop());
        assert_eq!(db.get_lead("l1").unwrap().unwrap().status, LeadStatus::New);

        // Straight to the end of the pipeline
        let outcome = apply_manual_transition(&db, "l1", "converted", Utc::now()).unwrap();
        assert!(!outcome.is_noop());
        assert_eq!(
            db.get_lead("l1").unwrap().unwrap().status,
            LeadStatus::Converted
        );
    }

    #[test]
    fn test_missing_lead_surfaces_not_found() {
        let db = test_db();
        let err = apply_manual_transition(&db, "ghost", "booked", Utc::now()).unwrap_err();
        assert!(matches!(err, LeadError::NotFound(_)));
    }

    #[test]
    fn test_resolve_drop_on_column() {
        let resolved = resolve_drop("l1", Some(DropTarget::Column(LeadStatus::Booked)));
        assert_eq!(resolved, Some(("l1".to_string(), LeadStatus::Booked)));
    }

    #[test]
    fn test_resolve_drop_on_card_inherits_its_column() {
        let db = test_db();
        let other = seed(&db, "l2", LeadStatus::Followup1);
        let resolved = resolve_drop("l1", Some(DropTarget::Card(&other)));
        assert_eq!(resolved, Some(("l1".to_string(), LeadStatus::Followup1)));
    }

    #[test]
    fn test_resolve_drop_outside_any_target() {
        assert_eq!(resolve_drop("l1", None), None);
    }
}
