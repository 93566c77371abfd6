//! Opportunity records and the pipeline-item DTO derived from them.
//!
//! `Opportunity` is the wire shape of the `opportunities` table. `Deal` is
//! the flattened item the pipeline board consumes; it exists so the frontend
//! never reaches back into joins or timestamps to render a card.

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::pipeline::{Stage, Tone};

use super::refs::{CompanyRef, ContactRef, ProfileRef};

/// Coarse opportunity lifecycle, independent of pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OpportunityStatus {
    #[default]
    Open,
    Closed,
    Lost,
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpportunityStatus::Open => write!(f, "open"),
            OpportunityStatus::Closed => write!(f, "closed"),
            OpportunityStatus::Lost => write!(f, "lost"),
        }
    }
}

/// Transaction structure of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DealType {
    Acquisition,
    Merger,
    Divestiture,
    JointVenture,
    PrivateEquity,
    DebtFinancing,
    Ipo,
}

impl DealType {
    /// Wire id (snake_case)
    pub fn as_str(self) -> &'static str {
        match self {
            DealType::Acquisition => "acquisition",
            DealType::Merger => "merger",
            DealType::Divestiture => "divestiture",
            DealType::JointVenture => "joint_venture",
            DealType::PrivateEquity => "private_equity",
            DealType::DebtFinancing => "debt_financing",
            DealType::Ipo => "ipo",
        }
    }

    /// Badge label
    pub fn label(self) -> &'static str {
        match self {
            DealType::Acquisition => "Acquisition",
            DealType::Merger => "Merger",
            DealType::Divestiture => "Divestiture",
            DealType::JointVenture => "Joint Venture",
            DealType::PrivateEquity => "Private Equity",
            DealType::DebtFinancing => "Debt Financing",
            DealType::Ipo => "IPO",
        }
    }

    /// Badge tone
    pub fn tone(self) -> Tone {
        match self {
            DealType::Acquisition => Tone::Blue,
            DealType::Merger => Tone::Purple,
            DealType::Divestiture => Tone::Red,
            DealType::JointVenture => Tone::Green,
            DealType::PrivateEquity => Tone::Yellow,
            DealType::DebtFinancing => Tone::Gray,
            DealType::Ipo => Tone::Pink,
        }
    }

    /// All deal types, for select options
    pub const ALL: [DealType; 7] = [
        DealType::Acquisition,
        DealType::Merger,
        DealType::Divestiture,
        DealType::JointVenture,
        DealType::PrivateEquity,
        DealType::DebtFinancing,
        DealType::Ipo,
    ];
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// An opportunity row as stored in the `opportunities` table
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub company_id: Uuid,
    #[serde(default)]
    pub contact_id: Option<Uuid>,
    /// Deal size in whole currency units; absent while still being scoped
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Raw stage id. Rows are tolerated as stored; resolution against the
    /// canonical catalog happens at display time, never during decoding.
    pub stage: String,
    /// Win probability, 0 to 100
    pub probability: f64,
    #[serde(default)]
    pub deal_type: Option<DealType>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub actual_close_date: Option<NaiveDate>,
    /// Set by the store whenever the stage column changes
    #[serde(default)]
    #[ts(type = "string | null")]
    pub stage_changed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    pub status: OpportunityStatus,
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
    /// Joined projection `contacts ( id, first_name, last_name )`; read-only
    #[serde(rename = "contacts", default)]
    pub contact: Option<ContactRef>,
    /// Joined projection via the `assigned_to` foreign key; read-only
    #[serde(default)]
    pub assignee: Option<ProfileRef>,
}

/// Insert payload for a new opportunity.
///
/// The stage is typed: new rows always carry a canonical id. Legacy ids only
/// exist in data written before the catalog migration.
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct NewOpportunity {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub company_id: Uuid,
    #[serde(default)]
    pub contact_id: Option<Uuid>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub stage: Stage,
    pub probability: f64,
    #[serde(default)]
    pub deal_type: Option<DealType>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: OpportunityStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

impl NewOpportunity {
    /// Minimal payload: a titled deal at the top of the funnel
    pub fn new(title: impl Into<String>, company_id: Uuid) -> Self {
        Self {
            title: title.into(),
            description: None,
            company_id,
            contact_id: None,
            amount: None,
            currency: default_currency(),
            stage: Stage::Sourcing,
            probability: 0.0,
            deal_type: None,
            expected_close_date: None,
            source: None,
            status: OpportunityStatus::Open,
            notes: None,
            assigned_to: None,
        }
    }
}

/// Partial update for an opportunity; only present fields reach the store
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct OpportunityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<DealType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub actual_close_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OpportunityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
}

impl OpportunityPatch {
    /// Stage transition, the board's drag-and-drop mutation
    pub fn move_to(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }
}

/// One pipeline card: everything the board needs, pre-flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct Deal {
    pub id: Uuid,
    pub title: String,
    /// Target/counterparty company name; "Unknown" when the join is absent
    pub counterparty_name: String,
    pub amount: Option<f64>,
    /// Raw stage id as stored; resolved by the board, not here
    pub stage_id: String,
    pub win_probability: f64,
    pub deal_type: Option<DealType>,
    pub days_in_current_stage: u32,
    pub last_activity_label: String,
    pub owner_label: String,
}

impl Deal {
    /// Flatten a stored row into a board card.
    ///
    /// Days in stage count from `stage_changed_at`, falling back to
    /// `created_at` for rows written before that column existed.
    pub fn from_opportunity(opportunity: &Opportunity, now: DateTime<Utc>) -> Deal {
        let stage_since = opportunity.stage_changed_at.unwrap_or(opportunity.created_at);
        let days_in_current_stage = (now - stage_since).num_days().max(0) as u32;

        Deal {
            id: opportunity.id,
            title: opportunity.title.clone(),
            counterparty_name: opportunity
                .company
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            amount: opportunity.amount,
            stage_id: opportunity.stage.clone(),
            win_probability: opportunity.probability,
            deal_type: opportunity.deal_type,
            days_in_current_stage,
            last_activity_label: relative_day_label(opportunity.updated_at, now),
            owner_label: opportunity
                .assignee
                .as_ref()
                .map(ProfileRef::label)
                .unwrap_or_else(|| "Unassigned".to_string()),
        }
    }
}

/// "today", "1 day ago", "N days ago"
fn relative_day_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - then).num_days();
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{d} days ago"),
    }
}
