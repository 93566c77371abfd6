//! In-memory implementation of [`CrmStore`] for tests and offline use.
//!
//! Mirrors the observable contract of [`RestStore`]: newest-first
//! reads, hydrated joins, server-stamped columns, stage-change
//! bookkeeping. Patches are applied the way a column-level UPDATE
//! would apply them: present fields replace, absent fields stay.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{CrmStore, StoreError};
use crate::types::{
    Company, CompanyPatch, CompanyRef, Contact, ContactPatch, ContactRef, Identity, NewCompany,
    NewContact, NewOpportunity, NewTask, Opportunity, OpportunityPatch, OpportunityRef, Profile,
    ProfileRef, Task, TaskPatch,
};

#[derive(Default)]
struct Inner {
    companies: Vec<Company>,
    contacts: Vec<Contact>,
    opportunities: Vec<Opportunity>,
    tasks: Vec<Task>,
    profiles: Vec<Profile>,
    failure: Option<StoreError>,
}

/// Store backed by process memory.
pub struct MemoryStore {
    identity: Identity,
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_identity(Identity {
            id: Uuid::new_v4(),
            email: "demo@dealflow.local".to_string(),
        })
    }

    /// Store acting as a specific user; creates stamp this identity
    /// as `created_by`.
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Every following operation fails with a clone of `error` until
    /// [`clear_failure`](Self::clear_failure) is called.
    pub fn fail_with(&self, error: StoreError) {
        self.inner.lock().unwrap().failure = Some(error);
    }

    pub fn clear_failure(&self) {
        self.inner.lock().unwrap().failure = None;
    }

    /// Seed rows as-is, bypassing server stamping. For fixtures with
    /// fixed ids and timestamps.
    pub fn seed_companies(&self, rows: impl IntoIterator<Item = Company>) {
        self.inner.lock().unwrap().companies.extend(rows);
    }

    pub fn seed_contacts(&self, rows: impl IntoIterator<Item = Contact>) {
        self.inner.lock().unwrap().contacts.extend(rows);
    }

    pub fn seed_opportunities(&self, rows: impl IntoIterator<Item = Opportunity>) {
        self.inner.lock().unwrap().opportunities.extend(rows);
    }

    pub fn seed_tasks(&self, rows: impl IntoIterator<Item = Task>) {
        self.inner.lock().unwrap().tasks.extend(rows);
    }

    pub fn seed_profiles(&self, rows: impl IntoIterator<Item = Profile>) {
        self.inner.lock().unwrap().profiles.extend(rows);
    }
}

fn gate(inner: &Inner) -> Result<(), StoreError> {
    match &inner.failure {
        Some(error) => Err(error.clone()),
        None => Ok(()),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::unexpected(0, e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::unexpected(0, e.to_string()))
}

/// Builds a stored row from an insert payload plus the columns the
/// server generates.
fn materialize<P: Serialize, T: DeserializeOwned>(
    payload: &P,
    created_by: Uuid,
) -> Result<T, StoreError> {
    let mut value = to_value(payload)?;
    if let Value::Object(map) = &mut value {
        let now = Utc::now();
        map.insert("id".to_string(), json!(Uuid::new_v4()));
        map.insert("created_at".to_string(), json!(now));
        map.insert("updated_at".to_string(), json!(now));
        map.insert("created_by".to_string(), json!(created_by));
    }
    from_value(value)
}

/// Applies a PATCH body column by column and bumps `updated_at`.
fn merge_patch<T: Serialize + DeserializeOwned, P: Serialize>(
    row: &T,
    patch: &P,
) -> Result<T, StoreError> {
    let mut value = to_value(row)?;
    let patch_value = to_value(patch)?;
    if let (Value::Object(map), Value::Object(patch_map)) = (&mut value, patch_value) {
        for (column, new) in patch_map {
            map.insert(column, new);
        }
        map.insert("updated_at".to_string(), json!(Utc::now()));
    }
    from_value(value)
}

fn company_ref(companies: &[Company], id: Option<Uuid>) -> Option<CompanyRef> {
    let id = id?;
    companies
        .iter()
        .find(|company| company.id == id)
        .map(|company| CompanyRef {
            id: company.id,
            name: company.name.clone(),
        })
}

fn contact_ref(contacts: &[Contact], id: Option<Uuid>) -> Option<ContactRef> {
    let id = id?;
    contacts
        .iter()
        .find(|contact| contact.id == id)
        .map(|contact| ContactRef {
            id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
        })
}

fn opportunity_ref(opportunities: &[Opportunity], id: Option<Uuid>) -> Option<OpportunityRef> {
    let id = id?;
    opportunities
        .iter()
        .find(|opportunity| opportunity.id == id)
        .map(|opportunity| OpportunityRef {
            id: opportunity.id,
            title: opportunity.title.clone(),
        })
}

fn profile_ref(profiles: &[Profile], id: Option<Uuid>) -> Option<ProfileRef> {
    let id = id?;
    profiles
        .iter()
        .find(|profile| profile.id == id)
        .map(|profile| ProfileRef {
            id: profile.id,
            full_name: profile.full_name.clone(),
            email: Some(profile.email.clone()),
        })
}

// Joins resolve at read time, like query-time embeds: renaming a
// company shows up in the next contact fetch.

fn hydrate_contact(inner: &Inner, mut row: Contact) -> Contact {
    row.company = company_ref(&inner.companies, Some(row.company_id));
    row
}

fn hydrate_opportunity(inner: &Inner, mut row: Opportunity) -> Opportunity {
    row.company = company_ref(&inner.companies, Some(row.company_id));
    row.contact = contact_ref(&inner.contacts, row.contact_id);
    row.assignee = profile_ref(&inner.profiles, row.assigned_to);
    row
}

fn hydrate_task(inner: &Inner, mut row: Task) -> Task {
    row.company = company_ref(&inner.companies, row.company_id);
    row.contact = contact_ref(&inner.contacts, row.contact_id);
    row.opportunity = opportunity_ref(&inner.opportunities, row.opportunity_id);
    row
}

#[async_trait]
impl CrmStore for MemoryStore {
    async fn current_identity(&self) -> Result<Identity, StoreError> {
        let inner = self.inner.lock().unwrap();
        gate(&inner)?;
        Ok(self.identity.clone())
    }

    async fn fetch_companies(&self) -> Result<Vec<Company>, StoreError> {
        let inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let mut rows = inner.companies.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let row: Company = materialize(&company, self.identity.id)?;
        inner.companies.insert(0, row.clone());
        Ok(row)
    }

    async fn update_company(
        &self,
        id: Uuid,
        patch: CompanyPatch,
    ) -> Result<Company, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let index = inner
            .companies
            .iter()
            .position(|company| company.id == id)
            .ok_or_else(|| StoreError::not_found("company"))?;
        let updated = merge_patch(&inner.companies[index], &patch)?;
        inner.companies[index] = updated;
        Ok(inner.companies[index].clone())
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        inner.companies.retain(|company| company.id != id);
        Ok(())
    }

    async fn fetch_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let mut rows: Vec<Contact> = inner
            .contacts
            .iter()
            .cloned()
            .map(|row| hydrate_contact(&inner, row))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let row: Contact = materialize(&contact, self.identity.id)?;
        inner.contacts.insert(0, row.clone());
        Ok(hydrate_contact(&inner, row))
    }

    async fn update_contact(
        &self,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let index = inner
            .contacts
            .iter()
            .position(|contact| contact.id == id)
            .ok_or_else(|| StoreError::not_found("contact"))?;
        let updated = merge_patch(&inner.contacts[index], &patch)?;
        inner.contacts[index] = updated;
        Ok(hydrate_contact(&inner, inner.contacts[index].clone()))
    }

    async fn delete_contact(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        inner.contacts.retain(|contact| contact.id != id);
        Ok(())
    }

    async fn fetch_opportunities(&self) -> Result<Vec<Opportunity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let mut rows: Vec<Opportunity> = inner
            .opportunities
            .iter()
            .cloned()
            .map(|row| hydrate_opportunity(&inner, row))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create_opportunity(
        &self,
        opportunity: NewOpportunity,
    ) -> Result<Opportunity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let mut row: Opportunity = materialize(&opportunity, self.identity.id)?;
        row.stage_changed_at = Some(row.created_at);
        inner.opportunities.insert(0, row.clone());
        Ok(hydrate_opportunity(&inner, row))
    }

    async fn update_opportunity(
        &self,
        id: Uuid,
        patch: OpportunityPatch,
    ) -> Result<Opportunity, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let index = inner
            .opportunities
            .iter()
            .position(|opportunity| opportunity.id == id)
            .ok_or_else(|| StoreError::not_found("opportunity"))?;
        let previous_stage = inner.opportunities[index].stage.clone();
        let mut updated: Opportunity = merge_patch(&inner.opportunities[index], &patch)?;
        if updated.stage != previous_stage {
            updated.stage_changed_at = Some(Utc::now());
        }
        inner.opportunities[index] = updated;
        Ok(hydrate_opportunity(&inner, inner.opportunities[index].clone()))
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let mut rows: Vec<Task> = inner
            .tasks
            .iter()
            .cloned()
            .map(|row| hydrate_task(&inner, row))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let row: Task = materialize(&task, self.identity.id)?;
        inner.tasks.insert(0, row.clone());
        Ok(hydrate_task(&inner, row))
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        let index = inner
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| StoreError::not_found("task"))?;
        let updated = merge_patch(&inner.tasks[index], &patch)?;
        inner.tasks[index] = updated;
        Ok(hydrate_task(&inner, inner.tasks[index].clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        gate(&inner)?;
        inner.tasks.retain(|task| task.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use crate::types::TaskStatus;

    #[tokio::test]
    async fn test_create_company_stamps_server_columns() {
        let store = MemoryStore::new();
        let identity = store.current_identity().await.unwrap();

        let company = store
            .create_company(NewCompany::named("TechCorp Solutions"))
            .await
            .unwrap();

        assert_eq!(company.name, "TechCorp Solutions");
        assert_eq!(company.created_by, identity.id);
        assert!(!company.id.is_nil());
        assert_eq!(company.created_at, company.updated_at);
    }

    #[tokio::test]
    async fn test_fetch_returns_newest_first() {
        let store = MemoryStore::new();
        store
            .create_company(NewCompany::named("First"))
            .await
            .unwrap();
        store
            .create_company(NewCompany::named("Second"))
            .await
            .unwrap();

        let names: Vec<String> = store
            .fetch_companies()
            .await
            .unwrap()
            .into_iter()
            .map(|company| company.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_contact_rows_carry_company_ref() {
        let store = MemoryStore::new();
        let company = store
            .create_company(NewCompany::named("Green Energy Co"))
            .await
            .unwrap();
        let contact = store
            .create_contact(NewContact::new("Ana", "Martinez", company.id))
            .await
            .unwrap();

        assert_eq!(contact.company.as_ref().unwrap().name, "Green Energy Co");

        let fetched = store.fetch_contacts().await.unwrap();
        assert_eq!(fetched[0].company.as_ref().unwrap().id, company.id);
    }

    #[tokio::test]
    async fn test_update_merges_present_fields_only() {
        let store = MemoryStore::new();
        let company = store
            .create_company(NewCompany::named("TechCorp Solutions"))
            .await
            .unwrap();

        let patch = CompanyPatch {
            phone: Some("+1234567890".to_string()),
            ..CompanyPatch::default()
        };
        let updated = store.update_company(company.id, patch).await.unwrap();

        assert_eq!(updated.name, "TechCorp Solutions");
        assert_eq!(updated.phone.as_deref(), Some("+1234567890"));
        assert!(updated.updated_at >= company.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_company(Uuid::new_v4(), CompanyPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stage_change_refreshes_stage_changed_at() {
        let store = MemoryStore::new();
        let company = store
            .create_company(NewCompany::named("TechCorp Solutions"))
            .await
            .unwrap();
        let opportunity = store
            .create_opportunity(NewOpportunity::new("Project Atlas", company.id))
            .await
            .unwrap();
        assert_eq!(opportunity.stage, "sourcing");
        assert_eq!(opportunity.stage_changed_at, Some(opportunity.created_at));

        let moved = store
            .update_opportunity(opportunity.id, OpportunityPatch::move_to(Stage::Loi))
            .await
            .unwrap();
        assert_eq!(moved.stage, "loi");
        assert!(moved.stage_changed_at.unwrap() >= opportunity.created_at);

        // Non-stage edits leave the stage clock alone
        let stamped = moved.stage_changed_at;
        let patched = store
            .update_opportunity(
                opportunity.id,
                OpportunityPatch {
                    probability: Some(60.0),
                    ..OpportunityPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.stage_changed_at, stamped);
    }

    #[tokio::test]
    async fn test_task_rows_carry_all_refs() {
        let store = MemoryStore::new();
        let company = store
            .create_company(NewCompany::named("Global Manufacturing Inc"))
            .await
            .unwrap();
        let opportunity = store
            .create_opportunity(NewOpportunity::new("Inventory System", company.id))
            .await
            .unwrap();

        let mut new_task = NewTask::titled("Send proposal");
        new_task.company_id = Some(company.id);
        new_task.opportunity_id = Some(opportunity.id);
        let task = store.create_task(new_task).await.unwrap();

        assert_eq!(
            task.company.as_ref().unwrap().name,
            "Global Manufacturing Inc"
        );
        assert_eq!(
            task.opportunity.as_ref().unwrap().title,
            "Inventory System"
        );
    }

    #[tokio::test]
    async fn test_task_status_patch() {
        let store = MemoryStore::new();
        let task = store
            .create_task(NewTask::titled("Follow up call"))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let done = store
            .update_task(task.id, TaskPatch::with_status(TaskStatus::Completed))
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let company = store
            .create_company(NewCompany::named("Ghost Corp"))
            .await
            .unwrap();

        store.delete_company(company.id).await.unwrap();
        assert!(store.fetch_companies().await.unwrap().is_empty());
        store.delete_company(company.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.fail_with(StoreError::network("connection reset"));

        let err = store.fetch_companies().await.unwrap_err();
        assert_eq!(err, StoreError::network("connection reset"));
        assert!(store.current_identity().await.is_err());

        store.clear_failure();
        assert!(store.fetch_companies().await.is_ok());
    }
}
