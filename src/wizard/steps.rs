//! Step and field catalogs for the deal intake wizard.
//!
//! The flow is a fixed sequence of five steps; each step collects a
//! known subset of the 14 `DealField`s. Catalog data is static so UI
//! layers can render headers and selects without extra lookups.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The five steps of the deal intake flow, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    DealOverview,
    TargetCompany,
    FinancialMetrics,
    TimelineStakeholders,
    StrategicAnalysis,
}

/// Static descriptor for one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, JsonSchema)]
#[ts(export)]
pub struct StepDefinition {
    /// 1-based position in the flow.
    pub number: usize,
    pub title: &'static str,
    pub description: &'static str,
}

impl WizardStep {
    /// All steps in flow order.
    pub const ALL: [WizardStep; 5] = [
        WizardStep::DealOverview,
        WizardStep::TargetCompany,
        WizardStep::FinancialMetrics,
        WizardStep::TimelineStakeholders,
        WizardStep::StrategicAnalysis,
    ];

    /// 1-based step number.
    pub fn number(&self) -> usize {
        self.definition().number
    }

    /// Looks up a step by its 1-based number.
    pub fn from_number(number: usize) -> Option<WizardStep> {
        match number {
            1 => Some(WizardStep::DealOverview),
            2 => Some(WizardStep::TargetCompany),
            3 => Some(WizardStep::FinancialMetrics),
            4 => Some(WizardStep::TimelineStakeholders),
            5 => Some(WizardStep::StrategicAnalysis),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.definition().title
    }

    pub fn definition(&self) -> StepDefinition {
        match self {
            WizardStep::DealOverview => StepDefinition {
                number: 1,
                title: "Deal Overview",
                description: "Basic deal information and type",
            },
            WizardStep::TargetCompany => StepDefinition {
                number: 2,
                title: "Target Company",
                description: "Company details and industry",
            },
            WizardStep::FinancialMetrics => StepDefinition {
                number: 3,
                title: "Financial Metrics",
                description: "Valuation and financial data",
            },
            WizardStep::TimelineStakeholders => StepDefinition {
                number: 4,
                title: "Timeline & Stakeholders",
                description: "Key dates and contacts",
            },
            WizardStep::StrategicAnalysis => StepDefinition {
                number: 5,
                title: "Strategic Analysis",
                description: "Rationale and synergies",
            },
        }
    }

    /// Fields collected on this step, in form order.
    pub fn fields(&self) -> &'static [DealField] {
        match self {
            WizardStep::DealOverview => &[DealField::DealName, DealField::DealType],
            WizardStep::TargetCompany => &[DealField::TargetCompany, DealField::Industry],
            WizardStep::FinancialMetrics => &[
                DealField::TransactionSizeMin,
                DealField::TransactionSizeMax,
                DealField::Revenue,
                DealField::Ebitda,
            ],
            WizardStep::TimelineStakeholders => &[
                DealField::ExpectedClosing,
                DealField::ExclusivityPeriod,
                DealField::LeadContact,
                DealField::InvestmentBank,
            ],
            WizardStep::StrategicAnalysis => {
                &[DealField::StrategicRationale, DealField::Synergies]
            }
        }
    }
}

/// Closed set of fields the wizard collects. Wire ids are the
/// snake_case names used in form state and the submission payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DealField {
    DealName,
    DealType,
    TargetCompany,
    Industry,
    TransactionSizeMin,
    TransactionSizeMax,
    Revenue,
    Ebitda,
    ExpectedClosing,
    ExclusivityPeriod,
    LeadContact,
    InvestmentBank,
    StrategicRationale,
    Synergies,
}

impl DealField {
    /// All fields across the flow, in step order.
    pub const ALL: [DealField; 14] = [
        DealField::DealName,
        DealField::DealType,
        DealField::TargetCompany,
        DealField::Industry,
        DealField::TransactionSizeMin,
        DealField::TransactionSizeMax,
        DealField::Revenue,
        DealField::Ebitda,
        DealField::ExpectedClosing,
        DealField::ExclusivityPeriod,
        DealField::LeadContact,
        DealField::InvestmentBank,
        DealField::StrategicRationale,
        DealField::Synergies,
    ];

    /// Stable snake_case id used in payloads and bindings.
    pub fn as_str(&self) -> &'static str {
        match self {
            DealField::DealName => "deal_name",
            DealField::DealType => "deal_type",
            DealField::TargetCompany => "target_company",
            DealField::Industry => "industry",
            DealField::TransactionSizeMin => "transaction_size_min",
            DealField::TransactionSizeMax => "transaction_size_max",
            DealField::Revenue => "revenue",
            DealField::Ebitda => "ebitda",
            DealField::ExpectedClosing => "expected_closing",
            DealField::ExclusivityPeriod => "exclusivity_period",
            DealField::LeadContact => "lead_contact",
            DealField::InvestmentBank => "investment_bank",
            DealField::StrategicRationale => "strategic_rationale",
            DealField::Synergies => "synergies",
        }
    }

    /// Human-readable form label.
    pub fn label(&self) -> &'static str {
        match self {
            DealField::DealName => "Deal Name",
            DealField::DealType => "Deal Type",
            DealField::TargetCompany => "Target Company Name",
            DealField::Industry => "Industry Sector",
            DealField::TransactionSizeMin => "Transaction Size Min (USD)",
            DealField::TransactionSizeMax => "Transaction Size Max (USD)",
            DealField::Revenue => "Annual Revenue (USD)",
            DealField::Ebitda => "EBITDA (USD)",
            DealField::ExpectedClosing => "Expected Closing Date",
            DealField::ExclusivityPeriod => "Exclusivity Period End",
            DealField::LeadContact => "Lead Contact",
            DealField::InvestmentBank => "Investment Bank",
            DealField::StrategicRationale => "Strategic Rationale",
            DealField::Synergies => "Expected Synergies",
        }
    }
}

impl std::fmt::Display for DealField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the industry sector select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, JsonSchema)]
#[ts(export)]
pub struct IndustryOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Industry sectors offered on the target-company step.
pub const INDUSTRIES: [IndustryOption; 10] = [
    IndustryOption {
        value: "technology",
        label: "Technology",
    },
    IndustryOption {
        value: "healthcare",
        label: "Healthcare",
    },
    IndustryOption {
        value: "financial_services",
        label: "Financial Services",
    },
    IndustryOption {
        value: "manufacturing",
        label: "Manufacturing",
    },
    IndustryOption {
        value: "retail",
        label: "Retail",
    },
    IndustryOption {
        value: "energy",
        label: "Energy",
    },
    IndustryOption {
        value: "real_estate",
        label: "Real Estate",
    },
    IndustryOption {
        value: "telecommunications",
        label: "Telecommunications",
    },
    IndustryOption {
        value: "consumer_goods",
        label: "Consumer Goods",
    },
    IndustryOption {
        value: "automotive",
        label: "Automotive",
    },
];
