//! LeadFlow core: lead lifecycle, auto-advance scheduling, and filtered
//! views for a small outbound sales team.
//!
//! The surrounding application supplies an authenticated [`types::User`]
//! and renders whatever [`filter::filter_leads`] projects; this crate owns
//! the store, the status taxonomy, the dwell-time engine, and the manual
//! transition rules.

pub mod cache;
pub mod db;
pub mod engine;
pub mod error;
pub mod filter;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod status;
pub mod transition;
pub mod types;

pub use cache::{ChangeEvent, LeadCache};
pub use engine::run_auto_advance;
pub use error::LeadError;
pub use filter::{filter_leads, LeadQuery, QuickTab};
pub use scheduler::{AdvanceScheduler, SchedulerHandle};
pub use state::AppState;
pub use status::{advance_rule, AdvanceRule, LeadStatus, LEAD_STATUSES};
pub use transition::{apply_manual_transition, resolve_drop, DropTarget, TransitionOutcome};
pub use types::{Lead, LeadPatch, LeadStats, NewLead, OwnerScope, User, UserRole};
