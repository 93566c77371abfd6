//! Company records: the counterparty organizations tracked in the CRM.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle status of a company record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CompanyStatus {
    Active,
    Inactive,
    /// Not yet a client; still being qualified
    #[default]
    Prospect,
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyStatus::Active => write!(f, "active"),
            CompanyStatus::Inactive => write!(f, "inactive"),
            CompanyStatus::Prospect => write!(f, "prospect"),
        }
    }
}

/// A company row as stored in the `companies` table
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Annual revenue in whole currency units
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    #[serde(default)]
    pub employee_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: CompanyStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    /// Stamped by the store from the session; never sent by clients
    pub created_by: Uuid,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

/// Insert payload for a new company
///
/// `id`, timestamps, and `created_by` are store-generated and deliberately
/// absent here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub annual_revenue: Option<f64>,
    #[serde(default)]
    pub employee_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: CompanyStatus,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

impl NewCompany {
    /// Minimal payload: just a name, everything else defaulted
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a company; only present fields reach the store
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct CompanyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompanyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

impl CompanyPatch {
    /// True when no field is set (a PATCH with this body would be a no-op)
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().is_some_and(serde_json::Map::is_empty))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_deserializes_store_row() {
        let json = serde_json::json!({
            "id": "9c5cd92f-8a0a-4b51-9ef9-0b5c6e76f1b2",
            "name": "Global Manufacturing Inc",
            "industry": "Manufacturing",
            "website": "https://globalmfg.com",
            "annual_revenue": 25_000_000.0,
            "employee_count": 500,
            "status": "active",
            "created_at": "2024-01-10T09:00:00Z",
            "updated_at": "2024-02-01T12:30:00Z",
            "created_by": "a1f7cf0e-6f5d-4f23-9d5b-2a9c62a1d001"
        });
        let company: Company = serde_json::from_value(json).unwrap();
        assert_eq!(company.name, "Global Manufacturing Inc");
        assert_eq!(company.status, CompanyStatus::Active);
        assert_eq!(company.employee_count, Some(500));
        assert!(company.assigned_to.is_none());
    }

    #[test]
    fn test_new_company_named_defaults_to_prospect() {
        let payload = NewCompany::named("Green Energy Co");
        assert_eq!(payload.status, CompanyStatus::Prospect);
        assert!(payload.industry.is_none());
    }

    #[test]
    fn test_new_company_omits_created_by() {
        let payload = NewCompany::named("TechCorp Solutions");
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("created_by").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = CompanyPatch {
            status: Some(CompanyStatus::Inactive),
            ..CompanyPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["status"], "inactive");
    }

    #[test]
    fn test_empty_patch_detected() {
        assert!(CompanyPatch::default().is_empty());
        let patch = CompanyPatch {
            name: Some("Renamed".to_string()),
            ..CompanyPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
