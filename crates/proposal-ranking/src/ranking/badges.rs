use std::cmp::Ordering;

use super::domain::{Badge, ProposalContext, ProposalWithScore};
use super::stats::GroupStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Highest,
    Lowest,
}

impl Direction {
    fn of(badge: Badge) -> Self {
        match badge {
            Badge::MaisRapida => Direction::Lowest,
            Badge::Recomendada | Badge::MelhorCustoBeneficio | Badge::MelhorAvaliacao => {
                Direction::Highest
            }
        }
    }
}

/// Metric each category is decided on.
fn metric(badge: Badge, scored: &ProposalWithScore) -> f64 {
    match badge {
        Badge::Recomendada => scored.score,
        Badge::MelhorCustoBeneficio => scored.score / scored.proposal.preco_total,
        Badge::MelhorAvaliacao => scored.proposal.nota_geral,
        Badge::MaisRapida => scored.proposal.tempo_medio_producao_horas,
    }
}

/// Orders `a` before `b` when `a` is the better candidate for `badge`: best
/// metric first, then lower `precoTotal`, then the lexicographically smaller id.
pub(crate) fn compare_candidates(
    a: &ProposalWithScore,
    b: &ProposalWithScore,
    badge: Badge,
) -> Ordering {
    let primary = match Direction::of(badge) {
        Direction::Highest => metric(badge, b).total_cmp(&metric(badge, a)),
        Direction::Lowest => metric(badge, a).total_cmp(&metric(badge, b)),
    };

    primary
        .then_with(|| a.proposal.preco_total.total_cmp(&b.proposal.preco_total))
        .then_with(|| a.proposal.id.cmp(&b.proposal.id))
}

fn pick(scored: &[ProposalWithScore], badge: Badge) -> Option<&ProposalWithScore> {
    scored
        .iter()
        .min_by(|a, b| compare_candidates(a, b, badge))
}

/// Selects one winner per category and frames them with the group figures.
/// Returns `None` for an empty slice.
pub fn assign_badges(
    scored: &[ProposalWithScore],
    stats: &GroupStats,
) -> Option<ProposalContext> {
    let winner = |badge| pick(scored, badge).map(|candidate| candidate.id().clone());

    Some(ProposalContext {
        menor_distancia: stats.menor_distancia,
        melhor_custo_beneficio_id: winner(Badge::MelhorCustoBeneficio)?,
        melhor_avaliacao_id: winner(Badge::MelhorAvaliacao)?,
        mais_rapida_id: winner(Badge::MaisRapida)?,
        recomendada_id: winner(Badge::Recomendada)?,
        preco_medio: stats.preco_medio,
        preco_medio_por_m2: stats.preco_medio_por_m2,
    })
}

/// Stamps each winner's badge set.
pub(crate) fn apply_badges(scored: &mut [ProposalWithScore], context: &ProposalContext) {
    for entry in scored.iter_mut() {
        for badge in Badge::ALL {
            if context.winner(badge) == entry.id() {
                entry.badges.insert(badge);
            }
        }
    }
}
