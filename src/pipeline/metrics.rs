//! Board aggregation: per-stage metrics, overview totals, and staleness.
//!
//! Everything here is a pure function over already-fetched deals. The board
//! itself is built in one pass; the standalone functions remain for callers
//! that only need a single figure.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Deal;

use super::stage::{Stage, StageDisplay, Tone};

/// How long a deal has sat in its current stage, bucketed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Staleness {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl Staleness {
    /// Threshold ladder, evaluated top-down with strict comparisons.
    ///
    /// Total over all day counts: more than 45 days is critical, more than
    /// 30 is a warning, everything else (including exactly 30 and 45's
    /// lower neighbor) is normal.
    pub fn classify(days_in_stage: u32) -> Staleness {
        if days_in_stage > 45 {
            Staleness::Critical
        } else if days_in_stage > 30 {
            Staleness::Warning
        } else {
            Staleness::Normal
        }
    }

    /// Indicator tone for the card footer
    pub fn tone(self) -> Tone {
        match self {
            Staleness::Normal => Tone::Green,
            Staleness::Warning => Tone::Yellow,
            Staleness::Critical => Tone::Red,
        }
    }
}

/// Deals whose stored id matches the given canonical stage exactly
pub fn deals_in_stage<'a>(deals: &'a [Deal], stage: Stage) -> Vec<&'a Deal> {
    deals
        .iter()
        .filter(|deal| deal.stage_id == stage.id())
        .collect()
}

/// Sum of deal amounts; a missing amount contributes zero
pub fn total_amount<'a, I>(deals: I) -> f64
where
    I: IntoIterator<Item = &'a Deal>,
{
    deals
        .into_iter()
        .map(|deal| deal.amount.unwrap_or(0.0))
        .sum()
}

/// Arithmetic mean of win probabilities; zero for an empty input, never NaN
pub fn average_probability<'a, I>(deals: I) -> f64
where
    I: IntoIterator<Item = &'a Deal>,
{
    let (sum, count) = deals
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, count), deal| {
            (sum + deal.win_probability, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Aggregates for one group of deals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct StageMetrics {
    pub deal_count: usize,
    pub total_amount: f64,
    pub average_probability: f64,
}

impl StageMetrics {
    fn for_deals(deals: &[Deal]) -> StageMetrics {
        StageMetrics {
            deal_count: deals.len(),
            total_amount: total_amount(deals),
            average_probability: average_probability(deals),
        }
    }
}

/// One board column: a canonical stage with its deals and aggregates
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct StageColumn {
    pub stage: Stage,
    pub metrics: StageMetrics,
    pub deals: Vec<Deal>,
}

/// Deals whose stage id resolved to nothing: surfaced, never dropped
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct UnknownStageGroup {
    pub stage_id: String,
    pub display: StageDisplay,
    pub metrics: StageMetrics,
    pub deals: Vec<Deal>,
}

/// Board-level headline figures over the full deal list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct PipelineSummary {
    pub total_value: f64,
    pub deal_count: usize,
    pub average_deal_size: f64,
    pub average_probability: f64,
}

impl PipelineSummary {
    pub fn build(deals: &[Deal]) -> PipelineSummary {
        let total_value = total_amount(deals);
        let deal_count = deals.len();
        let average_deal_size = if deal_count == 0 {
            0.0
        } else {
            total_value / deal_count as f64
        };
        PipelineSummary {
            total_value,
            deal_count,
            average_deal_size,
            average_probability: average_probability(deals),
        }
    }
}

/// The whole board, grouped in a single O(n) pass
#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct PipelineBoard {
    /// Every catalog stage in order, empty columns included
    pub columns: Vec<StageColumn>,
    /// Unresolvable stage ids, in order of first appearance
    pub unknown: Vec<UnknownStageGroup>,
    pub summary: PipelineSummary,
}

impl PipelineBoard {
    /// Group deals by resolved stage. Legacy ids land in their migrated
    /// column; unresolvable ids collect into [`PipelineBoard::unknown`].
    pub fn build(deals: &[Deal]) -> PipelineBoard {
        let mut by_stage: Vec<Vec<Deal>> = (0..Stage::ALL.len()).map(|_| Vec::new()).collect();
        let mut unknown_groups: Vec<(String, Vec<Deal>)> = Vec::new();

        for deal in deals {
            match Stage::resolve(&deal.stage_id) {
                Some(stage) => by_stage[stage.ordinal()].push(deal.clone()),
                None => {
                    match unknown_groups
                        .iter_mut()
                        .find(|(id, _)| *id == deal.stage_id)
                    {
                        Some((_, group)) => group.push(deal.clone()),
                        None => unknown_groups.push((deal.stage_id.clone(), vec![deal.clone()])),
                    }
                }
            }
        }

        let columns = Stage::ALL
            .into_iter()
            .zip(by_stage)
            .map(|(stage, deals)| StageColumn {
                stage,
                metrics: StageMetrics::for_deals(&deals),
                deals,
            })
            .collect();

        let unknown = unknown_groups
            .into_iter()
            .map(|(stage_id, deals)| UnknownStageGroup {
                display: StageDisplay::resolve(&stage_id),
                metrics: StageMetrics::for_deals(&deals),
                stage_id,
                deals,
            })
            .collect();

        PipelineBoard {
            columns,
            unknown,
            summary: PipelineSummary::build(deals),
        }
    }

    /// Column for a canonical stage
    pub fn column(&self, stage: Stage) -> &StageColumn {
        &self.columns[stage.ordinal()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn deal(stage_id: &str, amount: Option<f64>, probability: f64) -> Deal {
        Deal {
            id: Uuid::new_v4(),
            title: "deal".to_string(),
            counterparty_name: "Counterparty".to_string(),
            amount,
            stage_id: stage_id.to_string(),
            win_probability: probability,
            deal_type: None,
            days_in_current_stage: 0,
            last_activity_label: "today".to_string(),
            owner_label: "Unassigned".to_string(),
        }
    }

    #[test]
    fn test_average_probability_empty_is_zero() {
        let deals: Vec<Deal> = Vec::new();
        let avg = average_probability(&deals);
        assert!((avg - 0.0).abs() < f64::EPSILON);
        assert!(!avg.is_nan());
    }

    #[test]
    fn test_average_probability_mean() {
        let deals = vec![deal("loi", None, 40.0), deal("loi", None, 60.0)];
        assert!((average_probability(&deals) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_amount_treats_missing_as_zero() {
        let deals = vec![deal("loi", Some(100.0), 50.0), deal("loi", None, 50.0)];
        assert!((total_amount(&deals) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_staleness_boundaries_are_strict() {
        assert_eq!(Staleness::classify(0), Staleness::Normal);
        assert_eq!(Staleness::classify(30), Staleness::Normal);
        assert_eq!(Staleness::classify(31), Staleness::Warning);
        assert_eq!(Staleness::classify(45), Staleness::Warning);
        assert_eq!(Staleness::classify(46), Staleness::Critical);
        assert_eq!(Staleness::classify(76), Staleness::Critical);
    }

    #[test]
    fn test_loi_stage_aggregation_scenario() {
        let deals = vec![
            deal("loi", Some(1_000_000.0), 70.0),
            deal("loi", Some(2_000_000.0), 50.0),
            deal("sourcing", Some(9_000_000.0), 10.0),
        ];

        let in_loi = deals_in_stage(&deals, Stage::Loi);
        assert_eq!(in_loi.len(), 2);
        assert!((total_amount(in_loi.iter().copied()) - 3_000_000.0).abs() < f64::EPSILON);
        assert!((average_probability(in_loi) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_board_has_all_columns_even_when_empty() {
        let board = PipelineBoard::build(&[]);
        assert_eq!(board.columns.len(), Stage::ALL.len());
        assert!(board.unknown.is_empty());
        assert_eq!(board.summary.deal_count, 0);
        assert!((board.summary.average_deal_size - 0.0).abs() < f64::EPSILON);
        for column in &board.columns {
            assert_eq!(column.metrics.deal_count, 0);
        }
    }

    #[test]
    fn test_board_migrates_legacy_ids_into_canonical_columns() {
        let deals = vec![
            deal("negotiation", Some(180_000.0), 70.0),
            deal("spa_negotiation", Some(20_000.0), 30.0),
        ];
        let board = PipelineBoard::build(&deals);
        let column = board.column(Stage::SpaNegotiation);
        assert_eq!(column.metrics.deal_count, 2);
        assert!((column.metrics.total_amount - 200_000.0).abs() < f64::EPSILON);
        assert!(board.unknown.is_empty());
    }

    #[test]
    fn test_board_collects_unknown_ids_without_dropping() {
        let deals = vec![
            deal("archived_2019", Some(5.0), 1.0),
            deal("loi", Some(10.0), 2.0),
            deal("archived_2019", None, 3.0),
        ];
        let board = PipelineBoard::build(&deals);
        assert_eq!(board.unknown.len(), 1);
        let group = &board.unknown[0];
        assert_eq!(group.stage_id, "archived_2019");
        assert_eq!(group.display.label, "archived_2019");
        assert_eq!(group.display.tone, Tone::Gray);
        assert_eq!(group.metrics.deal_count, 2);
        // Summary still covers every deal, known or not
        assert_eq!(board.summary.deal_count, 3);
        assert!((board.summary.total_value - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_math() {
        let deals = vec![
            deal("loi", Some(1_000_000.0), 70.0),
            deal("closing", Some(2_000_000.0), 50.0),
        ];
        let summary = PipelineSummary::build(&deals);
        assert!((summary.total_value - 3_000_000.0).abs() < f64::EPSILON);
        assert_eq!(summary.deal_count, 2);
        assert!((summary.average_deal_size - 1_500_000.0).abs() < f64::EPSILON);
        assert!((summary.average_probability - 60.0).abs() < f64::EPSILON);
    }
}
