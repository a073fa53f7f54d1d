//! Filtered projections of the lead collection.
//!
//! Pure functions of `(leads, criteria) -> subset`: recomputed on every
//! keystroke/render, never mutating the underlying collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{advance_rule, LeadStatus};
use crate::types::Lead;

/// The dashboard's quick-filter tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickTab {
    #[default]
    All,
    /// Fresh leads that still need a first email.
    NeedsEmail,
    EmailSent,
    /// Any follow-up stage.
    FollowupSent,
    /// Leads whose dwell time has elapsed and that haven't replied.
    FollowupDue,
    ReplyReceived,
    Closed,
}

impl QuickTab {
    /// Route-parameter slug, e.g. `/leads?quick=followup-due`.
    pub fn as_slug(&self) -> &'static str {
        match self {
            QuickTab::All => "all",
            QuickTab::NeedsEmail => "needs-email",
            QuickTab::EmailSent => "email-sent",
            QuickTab::FollowupSent => "followup-sent",
            QuickTab::FollowupDue => "followup-due",
            QuickTab::ReplyReceived => "reply-received",
            QuickTab::Closed => "closed",
        }
    }

    /// Parse a route slug, returning `None` for unrecognized values.
    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "all" => Some(QuickTab::All),
            "needs-email" => Some(QuickTab::NeedsEmail),
            "email-sent" => Some(QuickTab::EmailSent),
            "followup-sent" => Some(QuickTab::FollowupSent),
            "followup-due" => Some(QuickTab::FollowupDue),
            "reply-received" => Some(QuickTab::ReplyReceived),
            "closed" => Some(QuickTab::Closed),
            _ => None,
        }
    }
}

/// Composed filter criteria for the leads view. All parts must pass for a
/// lead to appear (conjunctive).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadQuery {
    /// Case-insensitive substring match against company name OR contact
    /// person name. Empty string matches everything.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub quick: QuickTab,
    /// Exact status filter (the tabular view's status dropdown).
    #[serde(default)]
    pub status: Option<LeadStatus>,
    /// Assigned-intern filter.
    #[serde(default)]
    pub intern: Option<String>,
    /// Only leads updated within the last N days.
    #[serde(default)]
    pub updated_within_days: Option<i64>,
}

/// Project the lead collection through `query`. Pure: the input slice is
/// untouched and the result is a fresh vector.
pub fn filter_leads(leads: &[Lead], query: &LeadQuery, now: DateTime<Utc>) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| matches_search(lead, &query.search))
        .filter(|lead| matches_quick_tab(lead, query.quick, now))
        .filter(|lead| query.status.map_or(true, |s| lead.status == s))
        .filter(|lead| {
            query
                .intern
                .as_deref()
                .map_or(true, |name| lead.assigned_intern == name)
        })
        .filter(|lead| {
            query
                .updated_within_days
                .map_or(true, |days| (now - lead.updated_at).num_days() < days)
        })
        .cloned()
        .collect()
}

fn matches_search(lead: &Lead, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    lead.company_name.to_lowercase().contains(&needle)
        || lead.contact_person_name.to_lowercase().contains(&needle)
}

fn matches_quick_tab(lead: &Lead, tab: QuickTab, now: DateTime<Utc>) -> bool {
    match tab {
        QuickTab::All => true,
        QuickTab::NeedsEmail => lead.status == LeadStatus::New,
        QuickTab::EmailSent => lead.status == LeadStatus::EmailSent,
        QuickTab::FollowupSent => matches!(
            lead.status,
            LeadStatus::Followup1 | LeadStatus::Followup2 | LeadStatus::Followup3
        ),
        QuickTab::FollowupDue => followup_due(lead, now),
        QuickTab::ReplyReceived => lead.has_replies || lead.status == LeadStatus::Replied,
        QuickTab::Closed => {
            matches!(lead.status, LeadStatus::Converted | LeadStatus::Closed)
        }
    }
}

/// A lead is "due" when its dwell-time rule is already satisfied — the same
/// table the auto-advance engine promotes from — and no reply has arrived.
pub fn followup_due(lead: &Lead, now: DateTime<Utc>) -> bool {
    if lead.has_replies {
        return false;
    }
    match advance_rule(lead.status) {
        Some(rule) => (now - lead.updated_at).num_days() >= rule.min_days,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn lead(id: &str, company: &str, contact: &str, status: LeadStatus) -> Lead {
        let now = Utc::now();
        Lead {
            id: id.to_string(),
            company_name: company.to_string(),
            website: String::new(),
            contact_person_name: contact.to_string(),
            contact_email: format!("{id}@example.com"),
            linkedin_profile: None,
            assigned_intern: "Jess Alder".to_string(),
            status,
            created_at: now,
            updated_at: now,
            followups_sent: 0,
            has_replies: false,
            owner_id: "u1".to_string(),
        }
    }

    fn aged(mut l: Lead, days: i64) -> Lead {
        l.updated_at = Utc::now() - Duration::days(days);
        l
    }

    #[test]
    fn test_search_matches_company_or_contact() {
        let leads = vec![
            lead("l1", "Acme Corp", "Jane Doe", LeadStatus::New),
            lead("l2", "Other", "Bob Acme", LeadStatus::New),
            lead("l3", "Other", "Carol", LeadStatus::New),
        ];
        let query = LeadQuery {
            search: "acme".to_string(),
            ..Default::default()
        };
        let hits = filter_leads(&leads, &query, Utc::now());
        let ids: Vec<_> = hits.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
    }

    #[test]
    fn test_quick_tab_buckets() {
        let now = Utc::now();
        let leads = vec![
            lead("new", "A", "a", LeadStatus::New),
            lead("sent", "B", "b", LeadStatus::EmailSent),
            lead("f1", "C", "c", LeadStatus::Followup1),
            lead("f3", "D", "d", LeadStatus::Followup3),
            lead("rep", "E", "e", LeadStatus::Replied),
            lead("conv", "F", "f", LeadStatus::Converted),
            lead("closed", "G", "g", LeadStatus::Closed),
        ];

        let pick = |quick: QuickTab| -> Vec<String> {
            let query = LeadQuery {
                quick,
                ..Default::default()
            };
            filter_leads(&leads, &query, now)
                .into_iter()
                .map(|l| l.id)
                .collect()
        };

        assert_eq!(pick(QuickTab::All).len(), 7);
        assert_eq!(pick(QuickTab::NeedsEmail), vec!["new"]);
        assert_eq!(pick(QuickTab::EmailSent), vec!["sent"]);
        assert_eq!(pick(QuickTab::FollowupSent), vec!["f1", "f3"]);
        assert_eq!(pick(QuickTab::ReplyReceived), vec!["rep"]);
        assert_eq!(pick(QuickTab::Closed), vec!["conv", "closed"]);
    }

    #[test]
    fn test_reply_received_includes_has_replies_flag() {
        let mut l = lead("l1", "A", "a", LeadStatus::Booked);
        l.has_replies = true;
        let query = LeadQuery {
            quick: QuickTab::ReplyReceived,
            ..Default::default()
        };
        assert_eq!(filter_leads(&[l], &query, Utc::now()).len(), 1);
    }

    #[test]
    fn test_followup_due_uses_dwell_table() {
        let now = Utc::now();
        let query = LeadQuery {
            quick: QuickTab::FollowupDue,
            ..Default::default()
        };

        // followup-2 updated 8 days ago (threshold 7): due
        let due = aged(lead("l1", "A", "a", LeadStatus::Followup2), 8);
        assert_eq!(filter_leads(&[due.clone()], &query, now).len(), 1);

        // Same lead with a reply recorded: excluded
        let mut replied = due;
        replied.has_replies = true;
        assert!(filter_leads(&[replied], &query, now).is_empty());

        // email-sent updated 2 days ago (threshold 3): not yet due
        let fresh = aged(lead("l2", "B", "b", LeadStatus::EmailSent), 2);
        assert!(filter_leads(&[fresh], &query, now).is_empty());

        // Stages without a dwell rule are never due, no matter how old
        let stale_new = aged(lead("l3", "C", "c", LeadStatus::New), 90);
        assert!(filter_leads(&[stale_new], &query, now).is_empty());
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let leads = vec![
            lead("l1", "Acme Corp", "Jane", LeadStatus::New),
            lead("l2", "Acme West", "Bob", LeadStatus::EmailSent),
            lead("l3", "Globex", "Jane", LeadStatus::New),
        ];
        let query = LeadQuery {
            search: "acme".to_string(),
            quick: QuickTab::NeedsEmail,
            ..Default::default()
        };
        let hits = filter_leads(&leads, &query, Utc::now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "l1");
    }

    #[test]
    fn test_intern_and_recency_filters() {
        let now = Utc::now();
        let mut a = lead("l1", "A", "a", LeadStatus::New);
        a.assigned_intern = "Sam Rivera".to_string();
        let b = aged(lead("l2", "B", "b", LeadStatus::New), 10);

        let by_intern = LeadQuery {
            intern: Some("Sam Rivera".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_leads(&[a.clone(), b.clone()], &by_intern, now).len(), 1);

        let recent = LeadQuery {
            updated_within_days: Some(7),
            ..Default::default()
        };
        let hits = filter_leads(&[a, b], &recent, now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "l1");
    }

    #[test]
    fn test_slug_round_trip() {
        for tab in [
            QuickTab::All,
            QuickTab::NeedsEmail,
            QuickTab::EmailSent,
            QuickTab::FollowupSent,
            QuickTab::FollowupDue,
            QuickTab::ReplyReceived,
            QuickTab::Closed,
        ] {
            assert_eq!(QuickTab::from_slug(tab.as_slug()), Some(tab));
        }
        assert_eq!(QuickTab::from_slug("bogus"), None);
    }
}
