use serde::{Deserialize, Serialize};

use super::domain::Proposal;
use super::stats::GroupStats;

pub const PRICE_WEIGHT: f64 = 0.30;
pub const RATING_WEIGHT: f64 = 0.25;
pub const PRODUCTION_TIME_WEIGHT: f64 = 0.15;
pub const DISTANCE_WEIGHT: f64 = 0.15;
pub const RESPONSE_TIME_WEIGHT: f64 = 0.10;
pub const TRACK_RECORD_WEIGHT: f64 = 0.05;

/// Upper bound of the absolute 0-5 rating scale.
pub const MAX_RATING: f64 = 5.0;
/// Completed orders in the category at which the track-record component saturates.
pub const TRACK_RECORD_SATURATION: f64 = 10.0;

/// Relative importance of each normalized factor in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub price: f64,
    pub rating: f64,
    pub production_time: f64,
    pub distance: f64,
    pub response_time: f64,
    pub track_record: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price: PRICE_WEIGHT,
            rating: RATING_WEIGHT,
            production_time: PRODUCTION_TIME_WEIGHT,
            distance: DISTANCE_WEIGHT,
            response_time: RESPONSE_TIME_WEIGHT,
            track_record: TRACK_RECORD_WEIGHT,
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, factor: ScoreFactor) -> f64 {
        match factor {
            ScoreFactor::Price => self.price,
            ScoreFactor::Rating => self.rating,
            ScoreFactor::ProductionTime => self.production_time,
            ScoreFactor::Distance => self.distance,
            ScoreFactor::ResponseTime => self.response_time,
            ScoreFactor::TrackRecord => self.track_record,
        }
    }

    pub fn total(&self) -> f64 {
        ScoreFactor::ALL
            .iter()
            .map(|factor| self.weight(*factor))
            .sum()
    }
}

/// Buyer-facing criteria, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreFactor {
    Price,
    Rating,
    ProductionTime,
    Distance,
    ResponseTime,
    TrackRecord,
}

impl ScoreFactor {
    pub const ALL: [ScoreFactor; 6] = [
        ScoreFactor::Price,
        ScoreFactor::Rating,
        ScoreFactor::ProductionTime,
        ScoreFactor::Distance,
        ScoreFactor::ResponseTime,
        ScoreFactor::TrackRecord,
    ];
}

/// One factor's share of a composite score, kept for transparent comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Composite score and the components it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer applying group-relative min-max normalization and fixed weights.
#[derive(Debug, Clone, Default)]
pub struct NormalizedScorer {
    weights: ScoringWeights,
}

impl NormalizedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, proposal: &Proposal, stats: &GroupStats) -> f64 {
        self.breakdown(proposal, stats).total
    }

    pub fn breakdown(&self, proposal: &Proposal, stats: &GroupStats) -> ScoreBreakdown {
        let components: Vec<ScoreComponent> = ScoreFactor::ALL
            .iter()
            .map(|factor| {
                let normalized = normalized_value(*factor, proposal, stats);
                let weight = self.weights.weight(*factor);
                ScoreComponent {
                    factor: *factor,
                    normalized,
                    weight,
                    contribution: normalized * weight,
                }
            })
            .collect();

        let weight_sum = self.weights.total();
        let raw_total: f64 = components
            .iter()
            .map(|component| component.contribution)
            .sum();

        let total = if weight_sum > 0.0 {
            (raw_total / weight_sum).clamp(0.0, 1.0)
        } else {
            0.0
        };

        ScoreBreakdown { total, components }
    }
}

fn normalized_value(factor: ScoreFactor, proposal: &Proposal, stats: &GroupStats) -> f64 {
    match factor {
        ScoreFactor::Price => stats.preco.lower_is_better(proposal.preco_total),
        ScoreFactor::Distance => stats.distancia.lower_is_better(proposal.distancia_km),
        ScoreFactor::ProductionTime => stats
            .producao
            .lower_is_better(proposal.tempo_medio_producao_horas),
        ScoreFactor::ResponseTime => stats
            .resposta
            .lower_is_better(proposal.tempo_resposta_minutos),
        ScoreFactor::Rating => (proposal.nota_geral / MAX_RATING).clamp(0.0, 1.0),
        ScoreFactor::TrackRecord => {
            (f64::from(proposal.historico_na_categoria) / TRACK_RECORD_SATURATION).min(1.0)
        }
    }
}
