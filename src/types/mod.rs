//! Wire-shape CRM types shared with the dashboard frontend.
//!
//! Every exported type here uses ts-rs and schemars so TypeScript
//! definitions and JSON schemas come from a single Rust source of truth.

#![allow(dead_code)] // Types are for generation and downstream consumers
#![allow(unused_imports)] // Re-exports for the generate_types binary

mod company;
mod contact;
mod opportunity;
mod profile;
mod refs;
mod task;

pub use company::{Company, CompanyPatch, CompanyStatus, NewCompany};
pub use contact::{Contact, ContactPatch, ContactStatus, NewContact};
pub use opportunity::{
    Deal, DealType, NewOpportunity, Opportunity, OpportunityPatch, OpportunityStatus,
};
pub use profile::{Identity, Profile, ProfileRole};
pub use refs::{CompanyRef, ContactRef, OpportunityRef, ProfileRef};
pub use task::{NewTask, Task, TaskKind, TaskPatch, TaskPriority, TaskStatus};
