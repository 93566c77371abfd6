//! Async data-access facade over the CRM's remote store.
//!
//! [`CrmStore`] is the seam between domain logic and persistence: the
//! REST-backed implementation speaks the PostgREST dialect, the
//! in-memory one backs tests and offline use.

mod error;
mod memory;
mod rest;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::{
    RestStore, ENV_SUPABASE_ACCESS_TOKEN, ENV_SUPABASE_ANON_KEY, ENV_SUPABASE_URL,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{
    Company, CompanyPatch, Contact, ContactPatch, Identity, NewCompany, NewContact,
    NewOpportunity, NewTask, Opportunity, OpportunityPatch, Task, TaskPatch,
};

/// Storage backend for the four CRM entities.
///
/// Fetches return rows newest-first (`created_at` descending) with
/// related records embedded. Creates and updates return the stored
/// row as the server sees it, so callers can reconcile rather than
/// guess. Opportunities have no delete: deals leave the pipeline by
/// moving to a terminal stage, keeping history intact.
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Who the store is acting as. Creates attribute ownership to
    /// this identity server-side.
    async fn current_identity(&self) -> Result<Identity, StoreError>;

    async fn fetch_companies(&self) -> Result<Vec<Company>, StoreError>;

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError>;

    async fn update_company(&self, id: Uuid, patch: CompanyPatch)
        -> Result<Company, StoreError>;

    async fn delete_company(&self, id: Uuid) -> Result<(), StoreError>;

    async fn fetch_contacts(&self) -> Result<Vec<Contact>, StoreError>;

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError>;

    async fn update_contact(&self, id: Uuid, patch: ContactPatch)
        -> Result<Contact, StoreError>;

    async fn delete_contact(&self, id: Uuid) -> Result<(), StoreError>;

    async fn fetch_opportunities(&self) -> Result<Vec<Opportunity>, StoreError>;

    async fn create_opportunity(
        &self,
        opportunity: NewOpportunity,
    ) -> Result<Opportunity, StoreError>;

    async fn update_opportunity(
        &self,
        id: Uuid,
        patch: OpportunityPatch,
    ) -> Result<Opportunity, StoreError>;

    async fn fetch_tasks(&self) -> Result<Vec<Task>, StoreError>;

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError>;

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;
}
