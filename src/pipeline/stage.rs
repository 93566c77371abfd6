//! Canonical pipeline-stage catalog.
//!
//! Exactly one stage taxonomy exists: the eleven-stage M&A funnel below.
//! Ids from the retired generic sales funnel still appear in older rows and
//! resolve through [`Stage::from_legacy`]; anything else degrades to a
//! neutral fallback display instead of failing.

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

/// Semantic color token carried as display metadata.
///
/// The frontend maps tones to its own styling; this crate never emits CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Tone {
    /// Neutral; also the fallback for unknown stage ids
    #[default]
    Gray,
    Slate,
    Blue,
    Cyan,
    Purple,
    Pink,
    Yellow,
    Orange,
    Green,
    Emerald,
    Red,
}

/// One pipeline stage, in board order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Stage {
    Sourcing,
    Nda,
    Teaser,
    Ioi,
    Loi,
    DueDiligence,
    SpaNegotiation,
    Closing,
    ClosedWon,
    ClosedLost,
    OnHold,
}

/// Static display metadata for one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, JsonSchema)]
#[ts(export)]
pub struct StageDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub tone: Tone,
}

/// Retired generic-funnel ids mapped onto the canonical catalog.
///
/// `closed_won`/`closed_lost` kept their ids across taxonomies, so they
/// resolve canonically and are absent here.
static LEGACY_STAGE_IDS: Lazy<HashMap<&'static str, Stage>> = Lazy::new(|| {
    HashMap::from([
        ("prospecting", Stage::Sourcing),
        ("lead", Stage::Sourcing),
        ("qualification", Stage::Teaser),
        ("qualified", Stage::Teaser),
        ("proposal", Stage::Ioi),
        ("negotiation", Stage::SpaNegotiation),
    ])
});

impl Stage {
    /// All stages in board (column) order
    pub const ALL: [Stage; 11] = [
        Stage::Sourcing,
        Stage::Nda,
        Stage::Teaser,
        Stage::Ioi,
        Stage::Loi,
        Stage::DueDiligence,
        Stage::SpaNegotiation,
        Stage::Closing,
        Stage::ClosedWon,
        Stage::ClosedLost,
        Stage::OnHold,
    ];

    /// Canonical wire id
    pub fn id(self) -> &'static str {
        self.definition().id
    }

    /// Column heading
    pub fn title(self) -> &'static str {
        self.definition().title
    }

    /// Position in board order
    pub fn ordinal(self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Stage::ALL.len())
    }

    /// Won or lost; the deal no longer progresses
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::ClosedWon | Stage::ClosedLost)
    }

    /// Exact canonical-id lookup
    pub fn from_id(id: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|stage| stage.id() == id)
    }

    /// Migration lookup for retired generic-funnel ids
    pub fn from_legacy(id: &str) -> Option<Stage> {
        LEGACY_STAGE_IDS.get(id).copied()
    }

    /// Canonical id first, then the legacy migration table
    pub fn resolve(id: &str) -> Option<Stage> {
        Stage::from_id(id).or_else(|| Stage::from_legacy(id))
    }

    /// Full static definition
    pub fn definition(self) -> StageDefinition {
        match self {
            Stage::Sourcing => StageDefinition {
                id: "sourcing",
                title: "Sourcing",
                description: "Deal identification and initial screening",
                tone: Tone::Gray,
            },
            Stage::Nda => StageDefinition {
                id: "nda",
                title: "NDA",
                description: "Non-disclosure agreement execution",
                tone: Tone::Blue,
            },
            Stage::Teaser => StageDefinition {
                id: "teaser",
                title: "Teaser",
                description: "Teaser document review",
                tone: Tone::Purple,
            },
            Stage::Ioi => StageDefinition {
                id: "ioi",
                title: "IOI",
                description: "Indication of Interest preparation and submission",
                tone: Tone::Cyan,
            },
            Stage::Loi => StageDefinition {
                id: "loi",
                title: "LOI",
                description: "Letter of Intent negotiation",
                tone: Tone::Yellow,
            },
            Stage::DueDiligence => StageDefinition {
                id: "due_diligence",
                title: "Due Diligence",
                description: "Comprehensive due diligence process",
                tone: Tone::Orange,
            },
            Stage::SpaNegotiation => StageDefinition {
                id: "spa_negotiation",
                title: "SPA Negotiation",
                description: "Purchase agreement drafting and negotiation",
                tone: Tone::Pink,
            },
            Stage::Closing => StageDefinition {
                id: "closing",
                title: "Closing",
                description: "Final negotiations and closing",
                tone: Tone::Green,
            },
            Stage::ClosedWon => StageDefinition {
                id: "closed_won",
                title: "Closed Won",
                description: "Deal completed",
                tone: Tone::Emerald,
            },
            Stage::ClosedLost => StageDefinition {
                id: "closed_lost",
                title: "Closed Lost",
                description: "Deal terminated",
                tone: Tone::Red,
            },
            Stage::OnHold => StageDefinition {
                id: "on_hold",
                title: "On Hold",
                description: "Paused pending internal or market conditions",
                tone: Tone::Slate,
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Resolved display metadata for a raw stage id, total over all inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct StageDisplay {
    pub label: String,
    pub tone: Tone,
}

impl StageDisplay {
    /// Look up a raw id from a stored row.
    ///
    /// Canonical and migratable ids get catalog metadata; anything else
    /// falls back to the raw id with a neutral tone. Never fails.
    pub fn resolve(raw_id: &str) -> StageDisplay {
        match Stage::resolve(raw_id) {
            Some(stage) => {
                let def = stage.definition();
                StageDisplay {
                    label: def.title.to_string(),
                    tone: def.tone,
                }
            }
            None => StageDisplay {
                label: raw_id.to_string(),
                tone: Tone::Gray,
            },
        }
    }
}
