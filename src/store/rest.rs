//! PostgREST-backed implementation of [`CrmStore`].
//!
//! Speaks the Supabase REST dialect: entity tables under `/rest/v1`,
//! joined sub-objects via the `select` projection, and
//! `Prefer: return=representation` on writes so every mutation comes
//! back with the stored row.

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{CrmStore, StoreError};
use crate::config::StoreConfig;
use crate::types::{
    Company, CompanyPatch, Contact, ContactPatch, Identity, NewCompany, NewContact,
    NewOpportunity, NewTask, Opportunity, OpportunityPatch, Task, TaskPatch,
};

/// Environment variables consulted by [`RestStore::from_env`].
pub const ENV_SUPABASE_URL: &str = "DEALFLOW_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "DEALFLOW_SUPABASE_ANON_KEY";
pub const ENV_SUPABASE_ACCESS_TOKEN: &str = "DEALFLOW_SUPABASE_ACCESS_TOKEN";

// Join projections per table, mirroring what the dashboard reads.
const COMPANY_SELECT: &str = "*";
const CONTACT_SELECT: &str = "*,companies(id,name)";
const OPPORTUNITY_SELECT: &str = "*,companies(id,name),contacts(id,first_name,last_name),assignee:profiles!assigned_to(id,full_name,email)";
const TASK_SELECT: &str =
    "*,companies(id,name),contacts(id,first_name,last_name),opportunities(id,title)";

/// Store implementation over a Supabase-style PostgREST endpoint.
pub struct RestStore {
    base_url: String,
    anon_key: String,
    access_token: String,
    schema: String,
    client: Client,
}

impl RestStore {
    /// `base_url` is the project root, e.g. `https://xyz.supabase.co`.
    /// The access token may equal the anon key for key-only access.
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: access_token.into(),
            schema: "public".to_string(),
            client: Client::new(),
        }
    }

    /// Overrides the Postgres schema sent via the profile headers.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Create from environment variables.
    ///
    /// Required:
    /// - `DEALFLOW_SUPABASE_URL`: project root URL
    /// - `DEALFLOW_SUPABASE_ANON_KEY`: publishable API key
    ///
    /// Optional:
    /// - `DEALFLOW_SUPABASE_ACCESS_TOKEN`: user JWT; falls back to the
    ///   anon key when unset
    pub fn from_env() -> Result<Self, StoreError> {
        let url = env::var(ENV_SUPABASE_URL).ok();
        let anon_key = env::var(ENV_SUPABASE_ANON_KEY).ok();

        match (url, anon_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
                let token = env::var(ENV_SUPABASE_ACCESS_TOKEN)
                    .ok()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| key.clone());
                Ok(Self::new(url, key, token))
            }
            _ => Err(StoreError::auth(format!(
                "{ENV_SUPABASE_URL} and {ENV_SUPABASE_ANON_KEY} must be set"
            ))),
        }
    }

    /// Create from a loaded [`StoreConfig`]. The URL comes from the
    /// config file; keys come from the env vars the config names.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.url.is_empty() {
            return Err(StoreError::validation("store.url is not configured"));
        }
        let anon_key = env::var(&config.anon_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StoreError::auth(format!("{} not set", config.anon_key_env)))?;
        let token = env::var(&config.access_token_env)
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| anon_key.clone());
        Ok(Self::new(&config.url, anon_key, token).with_schema(&config.schema))
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// GET a table with its join projection, newest rows first.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.endpoint(table);
        debug!("store GET: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("select", select), ("order", "created_at.desc")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Accept-Profile", &self.schema)
            .send()
            .await?;

        let response = check(response, table).await?;
        Ok(response.json().await?)
    }

    /// POST one row and return the server's representation of it,
    /// with the same join projection the fetch uses.
    async fn insert_row<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        what: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.endpoint(table);
        debug!("store INSERT: {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("select", select)])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(body)
            .send()
            .await?;

        let response = check(response, what).await?;
        Ok(response.json().await?)
    }

    /// PATCH one row by id and return the updated representation.
    async fn update_row<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        what: &str,
        id: Uuid,
        body: &B,
    ) -> Result<T, StoreError> {
        let url = self.endpoint(table);
        debug!("store UPDATE: {} id={}", url, id);

        let filter = format!("eq.{id}");
        let response = self
            .client
            .patch(&url)
            .query(&[("id", filter.as_str()), ("select", select)])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(body)
            .send()
            .await?;

        let response = check(response, what).await?;
        Ok(response.json().await?)
    }

    /// DELETE one row by id. Idempotent: deleting an absent id is Ok.
    async fn delete_row(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        let url = self.endpoint(table);
        debug!("store DELETE: {} id={}", url, id);

        let filter = format!("eq.{id}");
        let response = self
            .client
            .delete(&url)
            .query(&[("id", filter.as_str())])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Content-Profile", &self.schema)
            .send()
            .await?;

        check(response, table).await?;
        Ok(())
    }
}

#[async_trait]
impl CrmStore for RestStore {
    async fn current_identity(&self) -> Result<Identity, StoreError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        debug!("store GET: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let response = check(response, "identity").await?;
        Ok(response.json().await?)
    }

    async fn fetch_companies(&self) -> Result<Vec<Company>, StoreError> {
        self.fetch_rows("companies", COMPANY_SELECT).await
    }

    async fn create_company(&self, company: NewCompany) -> Result<Company, StoreError> {
        self.insert_row("companies", COMPANY_SELECT, "company", &company)
            .await
    }

    async fn update_company(
        &self,
        id: Uuid,
        patch: CompanyPatch,
    ) -> Result<Company, StoreError> {
        self.update_row("companies", COMPANY_SELECT, "company", id, &patch)
            .await
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete_row("companies", id).await
    }

    async fn fetch_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        self.fetch_rows("contacts", CONTACT_SELECT).await
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        self.insert_row("contacts", CONTACT_SELECT, "contact", &contact)
            .await
    }

    async fn update_contact(
        &self,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, StoreError> {
        self.update_row("contacts", CONTACT_SELECT, "contact", id, &patch)
            .await
    }

    async fn delete_contact(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete_row("contacts", id).await
    }

    async fn fetch_opportunities(&self) -> Result<Vec<Opportunity>, StoreError> {
        self.fetch_rows("opportunities", OPPORTUNITY_SELECT).await
    }

    async fn create_opportunity(
        &self,
        opportunity: NewOpportunity,
    ) -> Result<Opportunity, StoreError> {
        self.insert_row("opportunities", OPPORTUNITY_SELECT, "opportunity", &opportunity)
            .await
    }

    async fn update_opportunity(
        &self,
        id: Uuid,
        patch: OpportunityPatch,
    ) -> Result<Opportunity, StoreError> {
        self.update_row("opportunities", OPPORTUNITY_SELECT, "opportunity", id, &patch)
            .await
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.fetch_rows("tasks", TASK_SELECT).await
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StoreError> {
        self.insert_row("tasks", TASK_SELECT, "task", &task).await
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, StoreError> {
        self.update_row("tasks", TASK_SELECT, "task", id, &patch)
            .await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete_row("tasks", id).await
    }
}

/// Maps a non-success response onto the error taxonomy. `what` is
/// the entity noun used for 404s.
async fn check(response: Response, what: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body, status.as_u16());

    Err(classify_status(status.as_u16(), what, retry_after, message))
}

fn classify_status(status: u16, what: &str, retry_after: Option<u64>, message: String) -> StoreError {
    match status {
        401 | 403 => StoreError::auth(message),
        404 | 406 => StoreError::not_found(what),
        409 => StoreError::conflict(message),
        400 | 422 => StoreError::validation(message),
        429 => StoreError::rate_limited(retry_after),
        code => StoreError::unexpected(code, message),
    }
}

/// PostgREST error bodies are JSON with a `message` field. Fall back
/// to the raw body, then to the bare status.
fn error_message(body: &str, status: u16) -> String {
    #[derive(Deserialize)]
    struct PostgrestError {
        message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<PostgrestError>(body) {
        parsed.message
    } else if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let store = RestStore::new("https://example.supabase.co/", "anon", "anon");
        assert_eq!(
            store.endpoint("companies"),
            "https://example.supabase.co/rest/v1/companies"
        );
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(401, "company", None, "jwt expired".into()),
            StoreError::Auth { .. }
        ));
        assert_eq!(
            classify_status(406, "opportunity", None, String::new()),
            StoreError::not_found("opportunity")
        );
        assert!(matches!(
            classify_status(409, "contact", None, "duplicate key".into()),
            StoreError::Conflict { .. }
        ));
        assert!(matches!(
            classify_status(422, "task", None, "bad column".into()),
            StoreError::Validation { .. }
        ));
        assert_eq!(
            classify_status(429, "task", Some(30), String::new()),
            StoreError::rate_limited(Some(30))
        );
        assert_eq!(
            classify_status(503, "task", None, "down".into()),
            StoreError::unexpected(503, "down")
        );
    }

    #[test]
    fn test_error_message_parses_postgrest_body() {
        let body = r#"{"code":"23505","message":"duplicate key value","details":null}"#;
        assert_eq!(error_message(body, 409), "duplicate key value");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("upstream timeout", 504), "upstream timeout");
        assert_eq!(error_message("", 500), "HTTP 500");
        assert_eq!(error_message("   ", 500), "HTTP 500");
    }

    #[test]
    fn test_join_projections() {
        assert!(OPPORTUNITY_SELECT.contains("assignee:profiles!assigned_to"));
        assert!(TASK_SELECT.contains("opportunities(id,title)"));
        assert!(CONTACT_SELECT.contains("companies(id,name)"));
    }
}
