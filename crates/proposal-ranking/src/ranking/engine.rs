use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::badges::{apply_badges, assign_badges, compare_candidates};
use super::domain::{
    Badge, GraficaId, OrderId, Proposal, ProposalContext, ProposalId, ProposalWithScore,
};
use super::pricing::classify;
use super::scorer::{NormalizedScorer, ScoringWeights};
use super::stats::aggregate;
use super::validation::{partition, InvalidProposalRecord};

/// Failures that abort a ranking run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("no proposals to compare")]
    EmptyProposalSet,
    #[error("no valid proposals to compare ({} rejected)", rejected.len())]
    NoValidProposals { rejected: Vec<InvalidProposalRecord> },
}

/// Stateless engine turning one order's proposals into a comparable ranking.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    scorer: NormalizedScorer,
}

impl RankingEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            scorer: NormalizedScorer::new(weights),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.scorer.weights()
    }

    /// Rank every valid proposal in `proposals`.
    ///
    /// Invalid records are excluded from statistics and badges and returned in
    /// [`RankingOutcome::flagged`]. `scored` keeps the input order of the valid records.
    pub fn rank(&self, proposals: &[Proposal]) -> Result<RankingOutcome, RankingError> {
        if proposals.is_empty() {
            return Err(RankingError::EmptyProposalSet);
        }

        let partition = partition(proposals);
        for record in &partition.flagged {
            warn!(
                proposal_id = %record.proposal.id,
                position = record.position,
                "{}",
                record.summary()
            );
        }

        if partition.valid.is_empty() {
            return Err(RankingError::NoValidProposals {
                rejected: partition.flagged,
            });
        }

        let stats = aggregate(&partition.valid)?;

        let mut scored: Vec<ProposalWithScore> = partition
            .valid
            .into_iter()
            .map(|proposal| {
                let breakdown = self.scorer.breakdown(&proposal, &stats);
                let price = classify(&proposal, stats.preco_medio);
                ProposalWithScore {
                    proposal,
                    score: breakdown.total,
                    badges: BTreeSet::new(),
                    preco_status: price.preco_status,
                    preco_percentual_vs_media: price.preco_percentual_vs_media,
                    componentes: breakdown.components,
                }
            })
            .collect();

        let context = assign_badges(&scored, &stats).ok_or(RankingError::EmptyProposalSet)?;
        apply_badges(&mut scored, &context);

        debug!(
            scored = scored.len(),
            flagged = partition.flagged.len(),
            recomendada = %context.recomendada_id,
            preco_medio = context.preco_medio,
            "ranked proposal set"
        );

        Ok(RankingOutcome {
            context,
            scored,
            flagged: partition.flagged,
        })
    }
}

/// Ranks `proposals` with the default weights.
pub fn rank_proposals(proposals: &[Proposal]) -> Result<RankingOutcome, RankingError> {
    RankingEngine::default().rank(proposals)
}

/// Immutable result of one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingOutcome {
    pub context: ProposalContext,
    pub scored: Vec<ProposalWithScore>,
    #[serde(default)]
    pub flagged: Vec<InvalidProposalRecord>,
}

/// Orderings offered to buyers comparing proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Score,
    Price,
    Distance,
    Rating,
    ProductionTime,
}

impl RankingOutcome {
    pub fn find(&self, id: &ProposalId) -> Option<&ProposalWithScore> {
        self.scored.iter().find(|entry| entry.id() == id)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.flagged.iter().map(InvalidProposalRecord::summary).collect()
    }

    pub fn badge_holder(&self, badge: Badge) -> Option<&ProposalWithScore> {
        self.find(self.context.winner(badge))
    }

    /// Scored proposals ordered best-first by `key`, ties broken by price then id.
    pub fn sorted_by(&self, key: SortKey) -> Vec<&ProposalWithScore> {
        let mut ordered: Vec<&ProposalWithScore> = self.scored.iter().collect();
        ordered.sort_by(|a, b| compare_by_key(a, b, key));
        ordered
    }

    /// Builds the hand-off payload for accepting one scored proposal.
    pub fn select(&self, id: &ProposalId) -> Result<ProposalSelection, SelectionError> {
        if let Some(entry) = self.find(id) {
            return Ok(ProposalSelection {
                pedido_id: entry.proposal.pedido_id.clone(),
                proposta_id: entry.proposal.id.clone(),
                grafica_id: entry.proposal.grafica_id.clone(),
                preco_total: entry.proposal.preco_total,
            });
        }

        if self.flagged.iter().any(|record| &record.proposal.id == id) {
            Err(SelectionError::Flagged(id.clone()))
        } else {
            Err(SelectionError::UnknownProposal(id.clone()))
        }
    }
}

fn compare_by_key(a: &ProposalWithScore, b: &ProposalWithScore, key: SortKey) -> Ordering {
    let tie_break = |ordering: Ordering| {
        ordering
            .then_with(|| a.proposal.preco_total.total_cmp(&b.proposal.preco_total))
            .then_with(|| a.proposal.id.cmp(&b.proposal.id))
    };

    match key {
        SortKey::Score => compare_candidates(a, b, Badge::Recomendada),
        SortKey::Rating => compare_candidates(a, b, Badge::MelhorAvaliacao),
        SortKey::ProductionTime => compare_candidates(a, b, Badge::MaisRapida),
        SortKey::Price => tie_break(Ordering::Equal),
        SortKey::Distance => {
            tie_break(a.proposal.distancia_km.total_cmp(&b.proposal.distancia_km))
        }
    }
}

/// Data the order-acceptance workflow writes back onto the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSelection {
    pub pedido_id: OrderId,
    pub proposta_id: ProposalId,
    pub grafica_id: GraficaId,
    pub preco_total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("proposal '{0}' is not part of this comparison")]
    UnknownProposal(ProposalId),
    #[error("proposal '{0}' was excluded from ranking and cannot be selected")]
    Flagged(ProposalId),
}
