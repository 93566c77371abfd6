//! Cached workspace state for one dashboard page.
//!
//! [`CrmState`] owns a store handle plus local caches of the four entity
//! lists. Reads hit the caches; refreshes and mutations go through the
//! store and are raced against a [`CancelToken`], so tearing down the
//! page resolves in-flight calls to [`StoreError::Cancelled`] instead of
//! leaving them dangling.
//!
//! Mutations re-fetch the affected list after the store call returns:
//! the server is the single source of truth, and re-reading beats
//! splicing a locally-guessed row into the cache.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::cancel::{CancelScope, CancelToken};
use crate::overview::DashboardStats;
use crate::pipeline::{PipelineBoard, Stage};
use crate::store::{CrmStore, StoreError};
use crate::types::{
    Company, CompanyPatch, Contact, ContactPatch, Deal, Identity, NewCompany, NewContact,
    NewOpportunity, NewTask, Opportunity, OpportunityPatch, Task, TaskPatch, TaskStatus,
};

/// Per-page snapshot of the CRM plus the handle to mutate it.
pub struct CrmState {
    store: Arc<dyn CrmStore>,
    cancel: CancelToken,
    companies: Vec<Company>,
    contacts: Vec<Contact>,
    opportunities: Vec<Opportunity>,
    tasks: Vec<Task>,
}

impl CrmState {
    /// State with a fresh cancellation scope. Keep the returned
    /// [`CancelScope`] alive for the lifetime of the page; dropping it
    /// cancels every in-flight call on this state.
    pub fn new(store: Arc<dyn CrmStore>) -> (CrmState, CancelScope) {
        let (scope, token) = CancelScope::new();
        (Self::with_token(store, token), scope)
    }

    /// State sharing an existing cancellation scope
    pub fn with_token(store: Arc<dyn CrmStore>, cancel: CancelToken) -> CrmState {
        CrmState {
            store,
            cancel,
            companies: Vec::new(),
            contacts: Vec::new(),
            opportunities: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Race a store call against the cancel token. The token is checked
    /// first, so calls after cancellation fail without touching the store.
    async fn guarded<T>(
        &self,
        operation: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(StoreError::Cancelled),
            result = operation => result,
        }
    }

    /// Who the store is acting as
    pub async fn identity(&self) -> Result<Identity, StoreError> {
        self.guarded(self.store.current_identity()).await
    }

    /// Fetch all four entity lists together and swap the caches in one
    /// step. On any failure (or cancellation) the caches stay as they
    /// were; a page never renders a half-refreshed mix.
    pub async fn refresh_all(&mut self) -> Result<(), StoreError> {
        let (companies, contacts, opportunities, tasks) = self
            .guarded(async {
                let (companies, contacts, opportunities, tasks) = tokio::join!(
                    self.store.fetch_companies(),
                    self.store.fetch_contacts(),
                    self.store.fetch_opportunities(),
                    self.store.fetch_tasks(),
                );
                Ok((companies?, contacts?, opportunities?, tasks?))
            })
            .await?;

        debug!(
            companies = companies.len(),
            contacts = contacts.len(),
            opportunities = opportunities.len(),
            tasks = tasks.len(),
            "refreshed all caches"
        );

        self.companies = companies;
        self.contacts = contacts;
        self.opportunities = opportunities;
        self.tasks = tasks;
        Ok(())
    }

    pub async fn refresh_companies(&mut self) -> Result<(), StoreError> {
        let rows = self.guarded(self.store.fetch_companies()).await?;
        debug!(count = rows.len(), "refreshed companies");
        self.companies = rows;
        Ok(())
    }

    pub async fn refresh_contacts(&mut self) -> Result<(), StoreError> {
        let rows = self.guarded(self.store.fetch_contacts()).await?;
        debug!(count = rows.len(), "refreshed contacts");
        self.contacts = rows;
        Ok(())
    }

    pub async fn refresh_opportunities(&mut self) -> Result<(), StoreError> {
        let rows = self.guarded(self.store.fetch_opportunities()).await?;
        debug!(count = rows.len(), "refreshed opportunities");
        self.opportunities = rows;
        Ok(())
    }

    pub async fn refresh_tasks(&mut self) -> Result<(), StoreError> {
        let rows = self.guarded(self.store.fetch_tasks()).await?;
        debug!(count = rows.len(), "refreshed tasks");
        self.tasks = rows;
        Ok(())
    }

    pub async fn create_company(&mut self, company: NewCompany) -> Result<Company, StoreError> {
        let created = self.guarded(self.store.create_company(company)).await?;
        debug!(id = %created.id, "created company");
        self.refresh_companies().await?;
        Ok(created)
    }

    pub async fn update_company(
        &mut self,
        id: Uuid,
        patch: CompanyPatch,
    ) -> Result<Company, StoreError> {
        let updated = self.guarded(self.store.update_company(id, patch)).await?;
        debug!(%id, "updated company");
        self.refresh_companies().await?;
        Ok(updated)
    }

    pub async fn delete_company(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.guarded(self.store.delete_company(id)).await?;
        debug!(%id, "deleted company");
        self.refresh_companies().await
    }

    pub async fn create_contact(&mut self, contact: NewContact) -> Result<Contact, StoreError> {
        let created = self.guarded(self.store.create_contact(contact)).await?;
        debug!(id = %created.id, "created contact");
        self.refresh_contacts().await?;
        Ok(created)
    }

    pub async fn update_contact(
        &mut self,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, StoreError> {
        let updated = self.guarded(self.store.update_contact(id, patch)).await?;
        debug!(%id, "updated contact");
        self.refresh_contacts().await?;
        Ok(updated)
    }

    pub async fn delete_contact(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.guarded(self.store.delete_contact(id)).await?;
        debug!(%id, "deleted contact");
        self.refresh_contacts().await
    }

    pub async fn create_opportunity(
        &mut self,
        opportunity: NewOpportunity,
    ) -> Result<Opportunity, StoreError> {
        let created = self.guarded(self.store.create_opportunity(opportunity)).await?;
        debug!(id = %created.id, stage = %created.stage, "created opportunity");
        self.refresh_opportunities().await?;
        Ok(created)
    }

    pub async fn update_opportunity(
        &mut self,
        id: Uuid,
        patch: OpportunityPatch,
    ) -> Result<Opportunity, StoreError> {
        let updated = self.guarded(self.store.update_opportunity(id, patch)).await?;
        debug!(%id, "updated opportunity");
        self.refresh_opportunities().await?;
        Ok(updated)
    }

    /// Stage transition, the board's drag-and-drop mutation
    pub async fn move_opportunity(
        &mut self,
        id: Uuid,
        stage: Stage,
    ) -> Result<Opportunity, StoreError> {
        debug!(%id, stage = stage.id(), "moving opportunity");
        self.update_opportunity(id, OpportunityPatch::move_to(stage))
            .await
    }

    pub async fn create_task(&mut self, task: NewTask) -> Result<Task, StoreError> {
        let created = self.guarded(self.store.create_task(task)).await?;
        debug!(id = %created.id, "created task");
        self.refresh_tasks().await?;
        Ok(created)
    }

    pub async fn update_task(&mut self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let updated = self.guarded(self.store.update_task(id, patch)).await?;
        debug!(%id, "updated task");
        self.refresh_tasks().await?;
        Ok(updated)
    }

    /// Status-only task change, the checkbox mutation
    pub async fn update_task_status(
        &mut self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, StoreError> {
        self.update_task(id, TaskPatch::with_status(status)).await
    }

    pub async fn delete_task(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.guarded(self.store.delete_task(id)).await?;
        debug!(%id, "deleted task");
        self.refresh_tasks().await
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Cached opportunities flattened into board cards
    pub fn deals(&self, now: DateTime<Utc>) -> Vec<Deal> {
        self.opportunities
            .iter()
            .map(|o| Deal::from_opportunity(o, now))
            .collect()
    }

    /// Full pipeline board over the cached opportunities
    pub fn pipeline_board(&self, now: DateTime<Utc>) -> PipelineBoard {
        PipelineBoard::build(&self.deals(now))
    }

    /// Overview cards over the cached lists
    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats::build(
            &self.companies,
            &self.contacts,
            &self.opportunities,
            &self.tasks,
        )
    }
}
