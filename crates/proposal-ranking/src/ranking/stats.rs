use serde::{Deserialize, Serialize};

use super::domain::Proposal;
use super::engine::RankingError;

/// Closed interval observed for one metric across the group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    fn of<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |range, value| match range {
            None => Some(Self {
                min: value,
                max: value,
            }),
            Some(range) => Some(Self {
                min: range.min.min(value),
                max: range.max.max(value),
            }),
        })
    }

    pub fn spread(&self) -> f64 {
        self.max - self.min
    }

    /// Min-max normalization where the smallest value maps to 1.0.
    ///
    /// A group with no spread normalizes every member to 1.0.
    pub fn lower_is_better(&self, value: f64) -> f64 {
        let spread = self.spread();
        if spread <= 0.0 {
            return 1.0;
        }
        (1.0 - (value - self.min) / spread).clamp(0.0, 1.0)
    }
}

/// Aggregates computed once per order and used as the normalization frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub preco_medio: f64,
    pub preco_medio_por_m2: Option<f64>,
    pub menor_distancia: f64,
    pub preco: MetricRange,
    pub distancia: MetricRange,
    pub producao: MetricRange,
    pub resposta: MetricRange,
    pub historico: MetricRange,
}

/// Computes group statistics over already-validated proposals.
pub fn aggregate(proposals: &[Proposal]) -> Result<GroupStats, RankingError> {
    let range = |metric: fn(&Proposal) -> f64| {
        MetricRange::of(proposals.iter().map(metric)).ok_or(RankingError::EmptyProposalSet)
    };

    let preco = range(|p| p.preco_total)?;
    let distancia = range(|p| p.distancia_km)?;
    let producao = range(|p| p.tempo_medio_producao_horas)?;
    let resposta = range(|p| p.tempo_resposta_minutos)?;
    let historico = range(|p| f64::from(p.historico_na_categoria))?;

    let preco_medio = stable_mean(proposals.iter().map(|p| p.preco_total))
        .ok_or(RankingError::EmptyProposalSet)?;
    let preco_medio_por_m2 = stable_mean(proposals.iter().filter_map(|p| p.preco_por_m2));

    Ok(GroupStats {
        preco_medio,
        preco_medio_por_m2,
        menor_distancia: distancia.min,
        preco,
        distancia,
        producao,
        resposta,
        historico,
    })
}

/// Arithmetic mean summed in ascending order, so any permutation of the
/// same values yields the same bits.
fn stable_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let total: f64 = values.iter().sum();
    Some(total / values.len() as f64)
}
