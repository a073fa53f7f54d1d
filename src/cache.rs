//! Session-local mirror of the lead store.
//!
//! The store is the source of truth across clients; this cache exists so
//! filtering can run on every keystroke without a refetch. It is explicit
//! state with explicit refresh/apply operations — mutation results and
//! external change notifications drive it, never implicit globals.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::db::{DbError, LeadDb};
use crate::types::{Lead, OwnerScope};

/// A change that happened in the lead store, either locally (a mutation
/// this client made) or remotely (another client, surfaced through the
/// store's notification mechanism).
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    Created(Lead),
    Updated(Lead),
    Deleted(String),
}

/// Id-keyed in-memory lead collection.
#[derive(Default)]
pub struct LeadCache {
    leads: RwLock<HashMap<String, Lead>>,
}

impl LeadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache from the store. Returns the number of leads
    /// loaded.
    pub fn refresh(&self, db: &LeadDb, scope: &OwnerScope) -> Result<usize, DbError> {
        let leads = db.list_leads(scope)?;
        let mut guard = self.leads.write();
        guard.clear();
        guard.extend(leads.into_iter().map(|l| (l.id.clone(), l)));
        Ok(guard.len())
    }

    /// Apply one incremental change without a refetch.
    pub fn apply(&self, event: &ChangeEvent) {
        let mut guard = self.leads.write();
        match event {
            ChangeEvent::Created(lead) | ChangeEvent::Updated(lead) => {
                guard.insert(lead.id.clone(), lead.clone());
            }
            ChangeEvent::Deleted(id) => {
                guard.remove(id);
            }
        }
    }

    /// Current contents, newest first (creation order, matching the store's
    /// listing).
    pub fn snapshot(&self) -> Vec<Lead> {
        let guard = self.leads.read();
        let mut leads: Vec<Lead> = guard.values().cloned().collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        leads
    }

    pub fn get(&self, id: &str) -> Option<Lead> {
        self.leads.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.leads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.read().is_empty()
    }

    /// Drop everything, e.g. on sign-out.
    pub fn clear(&self) {
        self.leads.write().clear();
    }
}
