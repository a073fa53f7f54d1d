//! Domain types shared across the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::LeadStatus;

/// Team member roles. Admins and managers see every lead; interns see only
/// leads they own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Intern,
}

/// Authenticated actor, provided by the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    /// The lead visibility scope this user's role grants.
    pub fn lead_scope(&self) -> OwnerScope {
        match self.role {
            UserRole::Admin | UserRole::Manager => OwnerScope::All,
            UserRole::Intern => OwnerScope::Owner(self.id.clone()),
        }
    }
}

/// Which leads a read or an auto-advance run may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerScope {
    /// Every lead (admin/manager roles).
    All,
    /// Only leads owned by this user id (intern role).
    Owner(String),
}

/// A sales prospect under active outreach.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub company_name: String,
    /// Empty string when the prospect has no site.
    pub website: String,
    pub contact_person_name: String,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_profile: Option<String>,
    pub assigned_intern: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub followups_sent: u32,
    pub has_replies: bool,
    pub owner_id: String,
}

/// Fields supplied when creating a lead. Id, timestamps, counters, and the
/// assigned intern are filled in by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub company_name: String,
    #[serde(default)]
    pub website: String,
    pub contact_person_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
    /// Initial stage; defaults to `new` when omitted.
    #[serde(default)]
    pub status: Option<LeadStatus>,
}

/// Partial update for a general lead edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub contact_person_name: Option<String>,
    pub contact_email: Option<String>,
    pub linkedin_profile: Option<String>,
    pub assigned_intern: Option<String>,
    pub status: Option<LeadStatus>,
    pub followups_sent: Option<u32>,
    pub has_replies: Option<bool>,
}

/// Per-status pipeline counts for the stats header.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total: u32,
    pub new: u32,
    pub email_sent: u32,
    pub followup_1: u32,
    pub followup_2: u32,
    pub followup_3: u32,
    pub replied: u32,
    pub booked: u32,
    pub converted: u32,
    pub closed: u32,
    pub with_replies: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User {
            id: "u1".to_string(),
            name: "Jess Alder".to_string(),
            email: "jess@leadflow.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_and_manager_see_all_leads() {
        assert_eq!(user(UserRole::Admin).lead_scope(), OwnerScope::All);
        assert_eq!(user(UserRole::Manager).lead_scope(), OwnerScope::All);
    }

    #[test]
    fn test_intern_scope_is_owner_bound() {
        assert_eq!(
            user(UserRole::Intern).lead_scope(),
            OwnerScope::Owner("u1".to_string())
        );
    }

    #[test]
    fn test_lead_serializes_camel_case() {
        let lead = Lead {
            id: "l1".to_string(),
            company_name: "Acme Corp".to_string(),
            website: String::new(),
            contact_person_name: "Jane Doe".to_string(),
            contact_email: "jane@acme.com".to_string(),
            linkedin_profile: None,
            assigned_intern: "Jess Alder".to_string(),
            status: LeadStatus::New,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            followups_sent: 0,
            has_replies: false,
            owner_id: "u1".to_string(),
        };
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["companyName"], "Acme Corp");
        assert_eq!(json["status"], "new");
        assert_eq!(json["followupsSent"], 0);
        assert!(json.get("linkedinProfile").is_none());
    }
}
