//! Contact records: the people attached to counterparty companies.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use super::refs::CompanyRef;

/// Lifecycle status of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ContactStatus {
    #[default]
    Active,
    Inactive,
    /// Unqualified inbound; not yet attached to an active relationship
    Lead,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactStatus::Active => write!(f, "active"),
            ContactStatus::Inactive => write!(f, "inactive"),
            ContactStatus::Lead => write!(f, "lead"),
        }
    }
}

/// A contact row, including the company embed from list reads
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    pub company_id: Uuid,
    /// Primary point of contact for the company
    #[serde(default)]
    pub is_primary_contact: bool,
    pub status: ContactStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    /// Joined projection `companies ( id, name )`; read-only
    #[serde(rename = "companies", default)]
    pub company: Option<CompanyRef>,
}

impl Contact {
    /// Display name in "First Last" form
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert payload for a new contact
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    pub company_id: Uuid,
    #[serde(default)]
    pub is_primary_contact: bool,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

impl NewContact {
    /// Minimal payload for a named contact at a company
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, company_id: Uuid) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            mobile: None,
            job_title: None,
            department: None,
            company_id,
            is_primary_contact: false,
            status: ContactStatus::default(),
            notes: None,
            assigned_to: None,
        }
    }
}

/// Partial update for a contact
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary_contact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_row_with_company_embed() {
        let json = serde_json::json!({
            "id": "3f6a5ed2-74c2-4c38-b6d8-5f351a2a9e10",
            "first_name": "Juan",
            "last_name": "Perez",
            "email": "juan.perez@techcorp.com",
            "job_title": "CEO",
            "company_id": "9c5cd92f-8a0a-4b51-9ef9-0b5c6e76f1b2",
            "is_primary_contact": true,
            "status": "active",
            "created_at": "2024-01-12T10:00:00Z",
            "updated_at": "2024-01-12T10:00:00Z",
            "created_by": "a1f7cf0e-6f5d-4f23-9d5b-2a9c62a1d001",
            "companies": { "id": "9c5cd92f-8a0a-4b51-9ef9-0b5c6e76f1b2", "name": "TechCorp Solutions" }
        });
        let contact: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(contact.full_name(), "Juan Perez");
        assert!(contact.is_primary_contact);
        assert_eq!(contact.company.unwrap().name, "TechCorp Solutions");
    }

    #[test]
    fn test_contact_row_without_embed() {
        let json = serde_json::json!({
            "id": "88f1b9a7-52cc-43a9-86d2-b0e35bd7ff21",
            "first_name": "Carlos",
            "last_name": "Lopez",
            "company_id": "9c5cd92f-8a0a-4b51-9ef9-0b5c6e76f1b2",
            "status": "lead",
            "created_at": "2024-01-12T10:00:00Z",
            "updated_at": "2024-01-12T10:00:00Z",
            "created_by": "a1f7cf0e-6f5d-4f23-9d5b-2a9c62a1d001"
        });
        let contact: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(contact.status, ContactStatus::Lead);
        assert!(contact.company.is_none());
        assert!(!contact.is_primary_contact);
    }

    #[test]
    fn test_new_contact_serializes_wire_shape() {
        let company_id = Uuid::new_v4();
        let payload = NewContact::new("Ana", "Martinez", company_id);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["status"], "active");
        assert_eq!(value["company_id"], company_id.to_string());
        assert!(value.get("created_by").is_none());
    }
}
