//! Pipeline-board domain: the canonical stage catalog and the pure
//! aggregation layer the dashboard renders from.

mod currency;
mod metrics;
mod stage;

pub use currency::format_currency;
pub use metrics::{
    average_probability, deals_in_stage, total_amount, PipelineBoard, PipelineSummary,
    Staleness, StageColumn, StageMetrics, UnknownStageGroup,
};
pub use stage::{Stage, StageDefinition, StageDisplay, Tone};
