//! Auto-advance engine: moves leads through the dwell-time-gated portion of
//! the pipeline without user interaction.
//!
//! Each run is idempotent — promotion sets the next status AND resets the
//! dwell clock (`updated_at`) in one write, so a lead advanced by one run
//! no longer satisfies its rule on the next.

use chrono::{DateTime, Utc};

use crate::db::LeadDb;
use crate::status::advance_rule;
use crate::types::OwnerScope;

/// Scan all leads visible to `scope` and promote every lead whose dwell
/// time has elapsed. Returns the ids that were advanced; a non-empty result
/// means the caller's in-memory collection is stale and must be refreshed.
///
/// Failure semantics: a fetch failure aborts the run (logged, empty
/// result) and is retried on the next periodic tick. A failed write skips
/// only that lead — its dwell time will still satisfy the threshold next
/// tick.
pub fn run_auto_advance(db: &LeadDb, scope: &OwnerScope, now: DateTime<Utc>) -> Vec<String> {
    let leads = match db.list_leads(scope) {
        Ok(leads) => leads,
        Err(e) => {
            log::warn!("Auto-advance: failed to fetch leads, retrying next tick: {e}");
            return Vec::new();
        }
    };

    let mut advanced = Vec::new();
    for lead in leads {
        // A recorded reply permanently exempts the lead, whatever its status.
        if lead.has_replies {
            continue;
        }
        let Some(rule) = advance_rule(lead.status) else {
            continue;
        };
        let days_elapsed = (now - lead.updated_at).num_days();
        if days_elapsed < rule.min_days {
            continue;
        }

        match db.promote_lead(&lead.id, rule.next, now) {
            Ok(n) if n > 0 => {
                log::info!(
                    "Auto-advanced lead {} ({}): {} -> {} after {} days",
                    lead.id,
                    lead.company_name,
                    lead.status,
                    rule.next,
                    days_elapsed
                );
                advanced.push(lead.id);
            }
            Ok(_) => {
                // Deleted between fetch and write; nothing to retry.
                log::debug!("Auto-advance: lead {} vanished mid-run", lead.id);
            }
            Err(e) => {
                log::warn!("Auto-advance: failed to promote lead {}: {e}", lead.id);
            }
        }
    }
    advanced
}
