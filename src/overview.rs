//! Dashboard overview: the headline counts and highlight lists the CRM
//! landing page renders above the pipeline board.
//!
//! Everything here is a pure derivation over already-fetched rows. The
//! caller decides what "today" and "now" mean, so these stay testable
//! and time-zone-agnostic.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{
    Company, CompanyStatus, Contact, Opportunity, OpportunityStatus, Task, TaskStatus,
};

/// Open deals at or above this win probability make the highlight list
pub const HIGH_PROBABILITY_THRESHOLD: f64 = 70.0;

/// The highlight list shows at most this many deals
pub const HIGH_PROBABILITY_LIMIT: usize = 5;

/// Headline counts for the overview cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct DashboardStats {
    pub total_companies: usize,
    pub active_companies: usize,
    pub total_contacts: usize,
    pub total_opportunities: usize,
    pub open_opportunities: usize,
    /// Tasks still in `pending`; in-progress work is not counted here
    pub pending_tasks: usize,
    pub completed_tasks: usize,
    /// Sum of deal amounts over open opportunities, whole currency units
    pub open_pipeline_value: f64,
}

impl DashboardStats {
    pub fn build(
        companies: &[Company],
        contacts: &[Contact],
        opportunities: &[Opportunity],
        tasks: &[Task],
    ) -> DashboardStats {
        DashboardStats {
            total_companies: companies.len(),
            active_companies: companies
                .iter()
                .filter(|c| c.status == CompanyStatus::Active)
                .count(),
            total_contacts: contacts.len(),
            total_opportunities: opportunities.len(),
            open_opportunities: opportunities
                .iter()
                .filter(|o| o.status == OpportunityStatus::Open)
                .count(),
            pending_tasks: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Pending)
                .count(),
            completed_tasks: tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            open_pipeline_value: open_pipeline_value(opportunities),
        }
    }
}

/// Total value of the open pipeline. Closed and lost deals are out; open
/// deals without an amount contribute nothing.
pub fn open_pipeline_value(opportunities: &[Opportunity]) -> f64 {
    opportunities
        .iter()
        .filter(|o| o.status == OpportunityStatus::Open)
        .filter_map(|o| o.amount)
        .sum()
}

/// Tasks due on the given calendar day, any status, in input order
pub fn tasks_due_today(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_due_on(today)).collect()
}

/// Open opportunities at or above the probability threshold, first
/// [`HIGH_PROBABILITY_LIMIT`] in input (newest-first) order
pub fn high_probability_opportunities(opportunities: &[Opportunity]) -> Vec<&Opportunity> {
    opportunities
        .iter()
        .filter(|o| {
            o.status == OpportunityStatus::Open && o.probability >= HIGH_PROBABILITY_THRESHOLD
        })
        .take(HIGH_PROBABILITY_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(status: &str) -> Company {
        serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "name": "Acme Holdings",
            "status": status,
            "created_at": "2024-01-10T09:00:00Z",
            "updated_at": "2024-01-10T09:00:00Z",
            "created_by": uuid::Uuid::new_v4(),
        }))
        .unwrap()
    }

    fn contact() -> Contact {
        serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "first_name": "Dana",
            "last_name": "Reyes",
            "company_id": uuid::Uuid::new_v4(),
            "status": "active",
            "created_at": "2024-01-10T09:00:00Z",
            "updated_at": "2024-01-10T09:00:00Z",
            "created_by": uuid::Uuid::new_v4(),
        }))
        .unwrap()
    }

    fn opportunity(status: &str, amount: Option<f64>, probability: f64) -> Opportunity {
        serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "title": "Deal",
            "company_id": uuid::Uuid::new_v4(),
            "amount": amount,
            "stage": "loi",
            "probability": probability,
            "status": status,
            "created_at": "2024-01-15T09:00:00Z",
            "updated_at": "2024-01-15T09:00:00Z",
            "created_by": uuid::Uuid::new_v4(),
        }))
        .unwrap()
    }

    fn task(status: &str, due_date: Option<&str>) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "title": "Follow up",
            "status": status,
            "due_date": due_date,
            "created_at": "2024-01-10T09:00:00Z",
            "updated_at": "2024-01-10T09:00:00Z",
            "created_by": uuid::Uuid::new_v4(),
        }))
        .unwrap()
    }

    #[test]
    fn test_stats_counts_by_status() {
        let companies = vec![company("active"), company("active"), company("inactive")];
        let contacts = vec![contact()];
        let opportunities = vec![
            opportunity("open", Some(100_000.0), 50.0),
            opportunity("open", None, 80.0),
            opportunity("closed", Some(900_000.0), 100.0),
        ];
        let tasks = vec![
            task("pending", None),
            task("in_progress", None),
            task("completed", None),
            task("completed", None),
        ];

        let stats = DashboardStats::build(&companies, &contacts, &opportunities, &tasks);
        assert_eq!(stats.total_companies, 3);
        assert_eq!(stats.active_companies, 2);
        assert_eq!(stats.total_contacts, 1);
        assert_eq!(stats.total_opportunities, 3);
        assert_eq!(stats.open_opportunities, 2);
        // In-progress tasks are neither pending nor completed
        assert_eq!(stats.pending_tasks, 1);
        assert_eq!(stats.completed_tasks, 2);
        assert!((stats.open_pipeline_value - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_open_pipeline_value_skips_closed_and_missing() {
        let opportunities = vec![
            opportunity("open", Some(250_000.0), 60.0),
            opportunity("open", None, 60.0),
            opportunity("lost", Some(1_000_000.0), 0.0),
        ];
        assert!((open_pipeline_value(&opportunities) - 250_000.0).abs() < f64::EPSILON);
        assert!((open_pipeline_value(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tasks_due_today_matches_calendar_day_any_status() {
        let tasks = vec![
            task("pending", Some("2024-03-15")),
            task("completed", Some("2024-03-15")),
            task("pending", Some("2024-03-16")),
            task("pending", None),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let due = tasks_due_today(&tasks, today);
        assert_eq!(due.len(), 2);
        assert!(due.iter().all(|t| t.is_due_on(today)));
    }

    #[test]
    fn test_high_probability_filters_open_and_threshold() {
        let opportunities = vec![
            opportunity("open", None, 70.0),
            opportunity("open", None, 69.9),
            opportunity("closed", None, 95.0),
            opportunity("open", None, 90.0),
        ];
        let high = high_probability_opportunities(&opportunities);
        assert_eq!(high.len(), 2);
        assert!((high[0].probability - 70.0).abs() < f64::EPSILON);
        assert!((high[1].probability - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_high_probability_caps_at_limit_in_input_order() {
        let opportunities: Vec<Opportunity> = (0..8)
            .map(|i| opportunity("open", None, 70.0 + f64::from(i)))
            .collect();
        let high = high_probability_opportunities(&opportunities);
        assert_eq!(high.len(), HIGH_PROBABILITY_LIMIT);
        // First five of the fetched order, not the five highest
        assert!((high[0].probability - 70.0).abs() < f64::EPSILON);
        assert!((high[4].probability - 74.0).abs() < f64::EPSILON);
    }
}
