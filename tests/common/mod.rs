//! Shared fixtures for the integration tests.
//!
//! The sample companies, contacts, and deals mirror the seed data the
//! CRM ships with, so scenarios read like a real pipeline. They live
//! here and nowhere else: display surfaces source everything through
//! the store.

#![allow(dead_code)] // Not every test binary uses every fixture

use std::sync::Arc;

use dealflow::store::MemoryStore;
use dealflow::types::{Company, Contact, Opportunity, Task};
use serde_json::json;
use uuid::Uuid;

pub fn company_row(name: &str, status: &str) -> Company {
    serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "name": name,
        "status": status,
        "created_at": "2024-01-10T09:00:00Z",
        "updated_at": "2024-01-10T09:00:00Z",
        "created_by": Uuid::new_v4(),
    }))
    .unwrap()
}

pub fn contact_row(first_name: &str, last_name: &str, company: &Company) -> Contact {
    serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "first_name": first_name,
        "last_name": last_name,
        "company_id": company.id,
        "is_primary_contact": true,
        "status": "active",
        "created_at": "2024-01-11T09:00:00Z",
        "updated_at": "2024-01-11T09:00:00Z",
        "created_by": Uuid::new_v4(),
    }))
    .unwrap()
}

pub fn opportunity_row(
    title: &str,
    company: &Company,
    stage: &str,
    amount: Option<f64>,
    probability: f64,
) -> Opportunity {
    serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "title": title,
        "company_id": company.id,
        "amount": amount,
        "currency": "USD",
        "stage": stage,
        "probability": probability,
        "status": "open",
        "created_at": "2024-01-15T09:00:00Z",
        "updated_at": "2024-01-15T09:00:00Z",
        "created_by": Uuid::new_v4(),
    }))
    .unwrap()
}

pub fn task_row(title: &str, status: &str, due_date: Option<&str>) -> Task {
    serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "title": title,
        "status": status,
        "due_date": due_date,
        "created_at": "2024-01-12T09:00:00Z",
        "updated_at": "2024-01-12T09:00:00Z",
        "created_by": Uuid::new_v4(),
    }))
    .unwrap()
}

/// Store preloaded with the stock seed scenario: three companies with a
/// primary contact each, and their opportunities still carrying legacy
/// funnel stage ids from before the catalog migration.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    let techcorp = company_row("TechCorp Solutions", "active");
    let globalmfg = company_row("Global Manufacturing Inc", "active");
    let greenenergy = company_row("Green Energy Co", "prospect");

    store.seed_contacts([
        contact_row("Juan", "Perez", &techcorp),
        contact_row("Carlos", "Lopez", &globalmfg),
        contact_row("Ana", "Martinez", &greenenergy),
    ]);

    store.seed_opportunities([
        opportunity_row(
            "Enterprise CRM Rollout",
            &techcorp,
            "negotiation",
            Some(250_000.0),
            85.0,
        ),
        opportunity_row(
            "Inventory Management System",
            &globalmfg,
            "proposal",
            Some(180_000.0),
            70.0,
        ),
        opportunity_row(
            "Solar Energy Installation",
            &greenenergy,
            "qualification",
            Some(500_000.0),
            60.0,
        ),
    ]);

    store.seed_tasks([
        task_row("Send proposal draft", "pending", Some("2024-02-20")),
        task_row("Review NDA terms", "completed", None),
    ]);

    store.seed_companies([techcorp, globalmfg, greenenergy]);
    store
}
