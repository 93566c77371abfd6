//! Deal intake wizard: a five-step form flow with a flat string
//! field map and host callbacks for submission.

mod sequencer;
mod steps;

pub use sequencer::{
    DealSubmission, DealWizard, WizardHost, MULTIPLE_PLACEHOLDER, TOTAL_STEPS,
};
pub use steps::{DealField, IndustryOption, StepDefinition, WizardStep, INDUSTRIES};
