//! Proposal ranking and recommendation for a single buyer order.
//!
//! The pipeline is pure: validation splits the input, [`stats`] builds the group
//! frame, the scorer and price classifier enrich each proposal, and the badge
//! assigner picks one winner per category.

pub(crate) mod badges;
pub mod domain;
pub(crate) mod engine;
pub mod pricing;
pub mod router;
pub mod scorer;
pub mod stats;
pub mod validation;

#[cfg(test)]
mod tests;

pub use badges::assign_badges;
pub use domain::{
    Badge, DeliveryType, GraficaId, OrderId, PrecoStatus, PrintTechnology, Proposal,
    ProposalContext, ProposalId, ProposalWithScore, UnknownVariant, VendorTier,
};
pub use engine::{
    rank_proposals, ProposalSelection, RankingEngine, RankingError, RankingOutcome,
    SelectionError, SortKey,
};
pub use pricing::{classify, PriceClassification, PRICE_BAND_PERCENT};
pub use router::ranking_router;
pub use scorer::{
    NormalizedScorer, ScoreBreakdown, ScoreComponent, ScoreFactor, ScoringWeights,
};
pub use stats::{aggregate, GroupStats, MetricRange};
pub use validation::{InvalidProposalRecord, ProposalField, ValidationIssue};
