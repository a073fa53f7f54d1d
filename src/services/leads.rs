//! Lead lifecycle orchestration: validates input, writes through the store,
//! records activity, and keeps the session cache + subscribers in sync.

use chrono::Utc;
use uuid::Uuid;

use crate::cache::ChangeEvent;
use crate::db::ActivityKind;
use crate::error::LeadError;
use crate::state::AppState;
use crate::status::LeadStatus;
use crate::transition::{self, TransitionOutcome};
use crate::types::{Lead, LeadPatch, LeadStats, NewLead, OwnerScope, User};

/// Reload the cache from the store and return the visible leads, newest
/// first.
pub fn fetch_leads(state: &AppState, scope: &OwnerScope) -> Result<Vec<Lead>, LeadError> {
    state.with_store(|db| Ok(state.cache.refresh(db, scope)?))?;
    Ok(state.cache.snapshot())
}

/// Create a lead owned by `owner` and auto-assigned to them.
///
/// Fails with `DuplicateEmail` when the contact email is already used by a
/// lead of the same owner; the same email under a different owner is fine.
pub fn create_lead(state: &AppState, input: NewLead, owner: &User) -> Result<Lead, LeadError> {
    if input.company_name.trim().is_empty() {
        return Err(LeadError::MissingField("companyName"));
    }
    if input.contact_person_name.trim().is_empty() {
        return Err(LeadError::MissingField("contactPersonName"));
    }
    if input.contact_email.trim().is_empty() {
        return Err(LeadError::MissingField("contactEmail"));
    }

    let lead = state.with_store(|db| {
        if db.email_exists_for_owner(&owner.id, &input.contact_email)? {
            return Err(LeadError::DuplicateEmail(input.contact_email.clone()));
        }

        let now = Utc::now();
        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            company_name: input.company_name,
            website: input.website,
            contact_person_name: input.contact_person_name,
            contact_email: input.contact_email,
            linkedin_profile: input.linkedin_profile,
            assigned_intern: owner.name.clone(),
            status: input.status.unwrap_or(LeadStatus::New),
            created_at: now,
            updated_at: now,
            followups_sent: 0,
            has_replies: false,
            owner_id: owner.id.clone(),
        };
        db.insert_lead(&lead)?;

        if let Err(e) =
            db.record_activity(ActivityKind::LeadCreated, owner, Some(&lead), None, None)
        {
            log::warn!("Failed to record creation activity for {}: {e}", lead.id);
        }
        Ok(lead)
    })?;

    state.publish_change(ChangeEvent::Created(lead.clone()));
    Ok(lead)
}

/// General edit: apply the non-`None` fields of `patch` and bump
/// `updated_at`.
pub fn update_lead(
    state: &AppState,
    lead_id: &str,
    patch: LeadPatch,
    actor: &User,
) -> Result<Lead, LeadError> {
    let lead = state.with_store(|db| {
        let mut lead = db
            .get_lead(lead_id)?
            .ok_or_else(|| LeadError::NotFound(lead_id.to_string()))?;

        if let Some(ref email) = patch.contact_email {
            let changed = !email.eq_ignore_ascii_case(&lead.contact_email);
            if changed && db.email_exists_for_owner(&lead.owner_id, email)? {
                return Err(LeadError::DuplicateEmail(email.clone()));
            }
        }

        if let Some(v) = patch.company_name {
            lead.company_name = v;
        }
        if let Some(v) = patch.website {
            lead.website = v;
        }
        if let Some(v) = patch.contact_person_name {
            lead.contact_person_name = v;
        }
        if let Some(v) = patch.contact_email {
            lead.contact_email = v;
        }
        if let Some(v) = patch.linkedin_profile {
            lead.linkedin_profile = Some(v);
        }
        if let Some(v) = patch.assigned_intern {
            lead.assigned_intern = v;
        }
        if let Some(v) = patch.status {
            lead.status = v;
        }
        if let Some(v) = patch.followups_sent {
            lead.followups_sent = v;
        }
        if let Some(v) = patch.has_replies {
            lead.has_replies = v;
        }
        lead.updated_at = Utc::now();

        let n = db.update_lead_row(&lead)?;
        if n == 0 {
            return Err(LeadError::NotFound(lead_id.to_string()));
        }

        if let Err(e) =
            db.record_activity(ActivityKind::LeadUpdated, actor, Some(&lead), None, None)
        {
            log::warn!("Failed to record edit activity for {}: {e}", lead.id);
        }
        Ok(lead)
    })?;

    state.publish_change(ChangeEvent::Updated(lead.clone()));
    Ok(lead)
}

/// User-initiated status change (drag-and-drop or direct edit). Returns
/// `NoOp` without writing for an unknown target or an unchanged status.
pub fn change_status(
    state: &AppState,
    lead_id: &str,
    target: &str,
    actor: &User,
) -> Result<TransitionOutcome, LeadError> {
    let outcome = state.with_store(|db| {
        let before = db.get_lead(lead_id)?;
        let outcome = transition::apply_manual_transition(db, lead_id, target, Utc::now())?;

        if let TransitionOutcome::Applied(ref lead) = outcome {
            let from = before.map(|b| b.status);
            if let Err(e) = db.record_activity(
                ActivityKind::StatusChanged,
                actor,
                Some(lead),
                from,
                Some(lead.status),
            ) {
                log::warn!("Failed to record transition activity for {}: {e}", lead.id);
            }
        }
        Ok(outcome)
    })?;

    if let TransitionOutcome::Applied(ref lead) = outcome {
        state.publish_change(ChangeEvent::Updated(lead.clone()));
    }
    Ok(outcome)
}

/// Record an inbound reply. The lead is exempt from auto-advance from here
/// on.
pub fn record_reply(state: &AppState, lead_id: &str, actor: &User) -> Result<Lead, LeadError> {
    let lead = state.with_store(|db| {
        let mut lead = db
            .get_lead(lead_id)?
            .ok_or_else(|| LeadError::NotFound(lead_id.to_string()))?;

        let now = Utc::now();
        db.set_has_replies(lead_id, true, now)?;
        lead.has_replies = true;
        lead.updated_at = now;

        if let Err(e) =
            db.record_activity(ActivityKind::ReplyReceived, actor, Some(&lead), None, None)
        {
            log::warn!("Failed to record reply activity for {}: {e}", lead.id);
        }
        Ok(lead)
    })?;

    state.publish_change(ChangeEvent::Updated(lead.clone()));
    Ok(lead)
}

/// Hard-delete a lead.
pub fn delete_lead(state: &AppState, lead_id: &str, actor: &User) -> Result<(), LeadError> {
    state.with_store(|db| {
        let lead = db
            .get_lead(lead_id)?
            .ok_or_else(|| LeadError::NotFound(lead_id.to_string()))?;

        db.delete_lead(lead_id)?;

        if let Err(e) =
            db.record_activity(ActivityKind::LeadDeleted, actor, Some(&lead), None, None)
        {
            log::warn!("Failed to record deletion activity for {}: {e}", lead.id);
        }
        Ok(())
    })?;

    state.publish_change(ChangeEvent::Deleted(lead_id.to_string()));
    Ok(())
}

/// Per-status counts for the scope.
pub fn lead_stats(state: &AppState, scope: &OwnerScope) -> Result<LeadStats, LeadError> {
    state.with_store(|db| Ok(db.lead_stats(scope)?))
}
