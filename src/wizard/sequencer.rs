//! Linear sequencer for the five-step deal intake flow.
//!
//! The sequencer tracks the active step and a flat map of field
//! values. It never validates or persists anything itself: field
//! values are raw strings, numeric interpretation happens at the
//! derivation helpers, and submission hands the snapshot to a
//! caller-supplied [`WizardHost`].

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::steps::{DealField, WizardStep};

/// Number of steps in the flow.
pub const TOTAL_STEPS: usize = WizardStep::ALL.len();

/// Placeholder shown where a multiple cannot be computed.
pub const MULTIPLE_PLACEHOLDER: &str = "N/A";

/// Flat snapshot of every wizard field, handed to the host on submit.
///
/// Values are the raw strings the user entered. Required-ness and
/// numeric parsing are the host's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct DealSubmission {
    pub deal_name: String,
    pub deal_type: String,
    pub target_company: String,
    pub industry: String,
    pub transaction_size_min: String,
    pub transaction_size_max: String,
    pub revenue: String,
    pub ebitda: String,
    pub expected_closing: String,
    pub exclusivity_period: String,
    pub lead_contact: String,
    pub investment_bank: String,
    pub strategic_rationale: String,
    pub synergies: String,
}

/// Callbacks supplied by whoever embeds the wizard.
pub trait WizardHost {
    /// Receives the full field snapshot. Persisting it and deciding
    /// whether to close or reset the wizard are the host's job.
    fn on_submit(&mut self, submission: DealSubmission);

    /// The user dismissed the wizard without submitting.
    fn on_close(&mut self) {}
}

/// State machine for the deal intake flow.
///
/// `current_step` stays within `[1, TOTAL_STEPS]`; navigation
/// saturates at both ends and never errors. Field values persist
/// across navigation in both directions.
#[derive(Debug, Clone)]
pub struct DealWizard {
    current_step: usize,
    fields: BTreeMap<DealField, String>,
}

impl Default for DealWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl DealWizard {
    pub fn new() -> Self {
        Self {
            current_step: 1,
            fields: BTreeMap::new(),
        }
    }

    /// 1-based number of the active step.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Catalog entry for the active step.
    pub fn step(&self) -> WizardStep {
        // current_step is kept within [1, TOTAL_STEPS]
        WizardStep::ALL[self.current_step - 1]
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == TOTAL_STEPS
    }

    /// Moves forward one step, saturating on the last step.
    pub fn advance(&mut self) {
        if self.current_step < TOTAL_STEPS {
            self.current_step += 1;
        }
    }

    /// Moves back one step, saturating on step 1.
    pub fn retreat(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Share of the flow reached, as a percentage of total steps.
    pub fn progress_percent(&self) -> f64 {
        self.current_step as f64 / TOTAL_STEPS as f64 * 100.0
    }

    /// Replaces one field's value. No validation, no coercion: bad
    /// numeric input surfaces at the derivation helpers instead.
    pub fn set_field(&mut self, field: DealField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Current value for a field, empty when never set.
    pub fn field(&self, field: DealField) -> &str {
        self.fields.get(&field).map_or("", String::as_str)
    }

    /// Snapshot of all fields for the submission payload.
    pub fn submission(&self) -> DealSubmission {
        DealSubmission {
            deal_name: self.field(DealField::DealName).to_string(),
            deal_type: self.field(DealField::DealType).to_string(),
            target_company: self.field(DealField::TargetCompany).to_string(),
            industry: self.field(DealField::Industry).to_string(),
            transaction_size_min: self.field(DealField::TransactionSizeMin).to_string(),
            transaction_size_max: self.field(DealField::TransactionSizeMax).to_string(),
            revenue: self.field(DealField::Revenue).to_string(),
            ebitda: self.field(DealField::Ebitda).to_string(),
            expected_closing: self.field(DealField::ExpectedClosing).to_string(),
            exclusivity_period: self.field(DealField::ExclusivityPeriod).to_string(),
            lead_contact: self.field(DealField::LeadContact).to_string(),
            investment_bank: self.field(DealField::InvestmentBank).to_string(),
            strategic_rationale: self.field(DealField::StrategicRationale).to_string(),
            synergies: self.field(DealField::Synergies).to_string(),
        }
    }

    /// Hands the full snapshot to the host. Wizard state is left
    /// untouched so the host decides what happens next.
    pub fn submit(&self, host: &mut dyn WizardHost) {
        host.on_submit(self.submission());
    }

    /// Dismisses the wizard without submitting.
    pub fn close(&self, host: &mut dyn WizardHost) {
        host.on_close();
    }

    /// Transaction size over annual revenue, e.g. `"2.0x"`.
    ///
    /// `None` when either operand is missing or non-numeric, or when
    /// the denominator is zero. Infinity and NaN never escape.
    pub fn revenue_multiple(&self) -> Option<String> {
        ratio_label(
            self.field(DealField::TransactionSizeMin),
            self.field(DealField::Revenue),
        )
    }

    /// Transaction size over EBITDA, same rules as
    /// [`revenue_multiple`](Self::revenue_multiple).
    pub fn ebitda_multiple(&self) -> Option<String> {
        ratio_label(
            self.field(DealField::TransactionSizeMin),
            self.field(DealField::Ebitda),
        )
    }

    /// Revenue multiple with the `"N/A"` placeholder filled in.
    pub fn revenue_multiple_label(&self) -> String {
        self.revenue_multiple()
            .unwrap_or_else(|| MULTIPLE_PLACEHOLDER.to_string())
    }

    /// EBITDA multiple with the `"N/A"` placeholder filled in.
    pub fn ebitda_multiple_label(&self) -> String {
        self.ebitda_multiple()
            .unwrap_or_else(|| MULTIPLE_PLACEHOLDER.to_string())
    }
}

/// Formats `numerator / denominator` to one decimal plus an `x`
/// suffix. `None` unless both sides parse and the ratio is finite.
fn ratio_label(numerator: &str, denominator: &str) -> Option<String> {
    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        Some(format!("{ratio:.1}x"))
    } else {
        None
    }
}
