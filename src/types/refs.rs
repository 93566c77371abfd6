//! Read-only embed shapes returned by nested join projections.
//!
//! The store returns these alongside parent rows (e.g. a task row carries
//! `companies ( id, name )`). They are never written back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Company fields embedded in contact, opportunity, and task rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct CompanyRef {
    pub id: Uuid,
    pub name: String,
}

/// Contact fields embedded in opportunity and task rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct ContactRef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl ContactRef {
    /// Display name in "First Last" form
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Opportunity fields embedded in task rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct OpportunityRef {
    pub id: Uuid,
    pub title: String,
}

/// Profile fields embedded via the `assigned_to` foreign key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct ProfileRef {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProfileRef {
    /// Display label: full name, then email, then a fixed fallback
    pub fn label(&self) -> String {
        self.full_name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Unassigned".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_ref_full_name() {
        let contact = ContactRef {
            id: Uuid::new_v4(),
            first_name: "Ana".to_string(),
            last_name: "Martinez".to_string(),
        };
        assert_eq!(contact.full_name(), "Ana Martinez");
    }

    #[test]
    fn test_profile_ref_label_fallbacks() {
        let mut profile = ProfileRef {
            id: Uuid::new_v4(),
            full_name: Some("Sarah Johnson".to_string()),
            email: Some("sarah@example.com".to_string()),
        };
        assert_eq!(profile.label(), "Sarah Johnson");

        profile.full_name = None;
        assert_eq!(profile.label(), "sarah@example.com");

        profile.email = None;
        assert_eq!(profile.label(), "Unassigned");
    }

    #[test]
    fn test_company_ref_deserializes_from_embed() {
        let json = r#"{"id":"72a7efcf-01c5-4d54-bd1f-4837e0a1938c","name":"TechCorp Solutions"}"#;
        let company: CompanyRef = serde_json::from_str(json).unwrap();
        assert_eq!(company.name, "TechCorp Solutions");
    }
}
