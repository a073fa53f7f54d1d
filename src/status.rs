//! Pipeline status taxonomy and the dwell-time rule table.
//!
//! Statuses are ordered by pipeline position. The taxonomy is append-only:
//! a status value that has ever been stored keeps its meaning; new stages
//! may only be added at the tail.

use serde::{Deserialize, Serialize};

use crate::error::LeadError;

/// A pipeline stage a lead can sit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "email-sent")]
    EmailSent,
    #[serde(rename = "followup-1")]
    Followup1,
    #[serde(rename = "followup-2")]
    Followup2,
    #[serde(rename = "followup-3")]
    Followup3,
    #[serde(rename = "replied")]
    Replied,
    #[serde(rename = "booked")]
    Booked,
    #[serde(rename = "converted")]
    Converted,
    #[serde(rename = "closed")]
    Closed,
}

/// All statuses in canonical pipeline order.
pub const LEAD_STATUSES: [LeadStatus; 9] = [
    LeadStatus::New,
    LeadStatus::EmailSent,
    LeadStatus::Followup1,
    LeadStatus::Followup2,
    LeadStatus::Followup3,
    LeadStatus::Replied,
    LeadStatus::Booked,
    LeadStatus::Converted,
    LeadStatus::Closed,
];

impl LeadStatus {
    /// String slug for SQL storage and route parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::EmailSent => "email-sent",
            LeadStatus::Followup1 => "followup-1",
            LeadStatus::Followup2 => "followup-2",
            LeadStatus::Followup3 => "followup-3",
            LeadStatus::Replied => "replied",
            LeadStatus::Booked => "booked",
            LeadStatus::Converted => "converted",
            LeadStatus::Closed => "closed",
        }
    }

    /// Display label for column headers and badges.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::EmailSent => "Email Sent",
            LeadStatus::Followup1 => "Follow-up 1",
            LeadStatus::Followup2 => "Follow-up 2",
            LeadStatus::Followup3 => "Follow-up 3",
            LeadStatus::Replied => "Replied",
            LeadStatus::Booked => "Booked",
            LeadStatus::Converted => "Converted",
            LeadStatus::Closed => "Closed",
        }
    }

    /// Parse a slug, returning `None` for unrecognized values.
    ///
    /// Manual transitions use this so an unknown drop target degrades to a
    /// no-op instead of an error.
    pub fn parse_opt(s: &str) -> Option<Self> {
        match s {
            "new" => Some(LeadStatus::New),
            "email-sent" => Some(LeadStatus::EmailSent),
            "followup-1" => Some(LeadStatus::Followup1),
            "followup-2" => Some(LeadStatus::Followup2),
            "followup-3" => Some(LeadStatus::Followup3),
            "replied" => Some(LeadStatus::Replied),
            "booked" => Some(LeadStatus::Booked),
            "converted" => Some(LeadStatus::Converted),
            "closed" => Some(LeadStatus::Closed),
            _ => None,
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::parse_opt(s).ok_or_else(|| LeadError::InvalidStatus(s.to_string()))
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the dwell-time rule table: a lead sitting in a stage for at
/// least `min_days` (measured from `updated_at`) is promoted to `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceRule {
    pub min_days: i64,
    pub next: LeadStatus,
}

/// Dwell-time rule for a status, or `None` if the stage never auto-advances.
///
/// `new` requires a manual email-send action to leave; `followup-3` is the
/// end of the automated sequence; `replied`/`booked`/`converted`/`closed`
/// are exit points.
pub fn advance_rule(status: LeadStatus) -> Option<AdvanceRule> {
    match status {
        LeadStatus::EmailSent => Some(AdvanceRule {
            min_days: 3,
            next: LeadStatus::Followup1,
        }),
        LeadStatus::Followup1 => Some(AdvanceRule {
            min_days: 4,
            next: LeadStatus::Followup2,
        }),
        LeadStatus::Followup2 => Some(AdvanceRule {
            min_days: 7,
            next: LeadStatus::Followup3,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for status in LEAD_STATUSES {
            assert_eq!(LeadStatus::parse_opt(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_parse_unknown_slug() {
        assert_eq!(LeadStatus::parse_opt("not-a-real-status"), None);
        assert!("not-a-real-status".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&LeadStatus::EmailSent).unwrap();
        assert_eq!(json, "\"email-sent\"");
        let parsed: LeadStatus = serde_json::from_str("\"followup-2\"").unwrap();
        assert_eq!(parsed, LeadStatus::Followup2);
    }

    #[test]
    fn test_rule_table_matches_taxonomy() {
        assert_eq!(
            advance_rule(LeadStatus::EmailSent),
            Some(AdvanceRule {
                min_days: 3,
                next: LeadStatus::Followup1
            })
        );
        assert_eq!(
            advance_rule(LeadStatus::Followup1),
            Some(AdvanceRule {
                min_days: 4,
                next: LeadStatus::Followup2
            })
        );
        assert_eq!(
            advance_rule(LeadStatus::Followup2),
            Some(AdvanceRule {
                min_days: 7,
                next: LeadStatus::Followup3
            })
        );
    }

    #[test]
    fn test_terminal_stages_never_advance() {
        for status in [
            LeadStatus::New,
            LeadStatus::Followup3,
            LeadStatus::Replied,
            LeadStatus::Booked,
            LeadStatus::Converted,
            LeadStatus::Closed,
        ] {
            assert!(advance_rule(status).is_none(), "{status} should not advance");
        }
    }
}
