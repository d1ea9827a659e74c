use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{Proposal, ProposalId};
use super::scorer::MAX_RATING;

/// Numeric proposal fields subject to sanity checks, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProposalField {
    PrecoTotal,
    PrecoPorM2,
    NotaGeral,
    NotaPrazo,
    NotaQualidade,
    NotaAtendimento,
    DistanciaKm,
    TempoMedioProducaoHoras,
    TempoRespostaMinutos,
}

impl ProposalField {
    pub const fn wire_name(self) -> &'static str {
        match self {
            ProposalField::PrecoTotal => "precoTotal",
            ProposalField::PrecoPorM2 => "precoPorM2",
            ProposalField::NotaGeral => "notaGeral",
            ProposalField::NotaPrazo => "notaPrazo",
            ProposalField::NotaQualidade => "notaQualidade",
            ProposalField::NotaAtendimento => "notaAtendimento",
            ProposalField::DistanciaKm => "distanciaKm",
            ProposalField::TempoMedioProducaoHoras => "tempoMedioProducaoHoras",
            ProposalField::TempoRespostaMinutos => "tempoRespostaMinutos",
        }
    }
}

impl fmt::Display for ProposalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A single reason a proposal was excluded from ranking.
///
/// Non-finite values are not echoed back, JSON has no representation for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    NotFinite { field: ProposalField },
    Negative { field: ProposalField, value: f64 },
    NotPositive { field: ProposalField, value: f64 },
    RatingOutOfRange { field: ProposalField, value: f64 },
    DuplicateId { id: ProposalId },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NotFinite { field } => write!(f, "{field} is not a finite number"),
            ValidationIssue::Negative { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            ValidationIssue::NotPositive { field, value } => {
                write!(f, "{field} must be greater than zero (got {value})")
            }
            ValidationIssue::RatingOutOfRange { field, value } => {
                write!(f, "{field} must be within 0..={MAX_RATING} (got {value})")
            }
            ValidationIssue::DuplicateId { id } => {
                write!(f, "proposal id '{id}' already appeared earlier in the set")
            }
        }
    }
}

/// A proposal that failed sanity checks, kept with its input position for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidProposalRecord {
    pub position: usize,
    pub proposal: Proposal,
    pub issues: Vec<ValidationIssue>,
}

impl InvalidProposalRecord {
    pub fn summary(&self) -> String {
        let reasons: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        format!(
            "proposal '{}' (position {}) excluded: {}",
            self.proposal.id,
            self.position,
            reasons.join("; ")
        )
    }
}

/// Result of splitting an input set into rankable and flagged proposals.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    pub valid: Vec<Proposal>,
    pub flagged: Vec<InvalidProposalRecord>,
}

pub(crate) fn partition(proposals: &[Proposal]) -> Partition {
    let mut seen: HashSet<&ProposalId> = HashSet::with_capacity(proposals.len());
    let mut partition = Partition::default();

    for (position, proposal) in proposals.iter().enumerate() {
        let mut issues = check_proposal(proposal);
        // Only ranked records claim an id.
        if seen.contains(&proposal.id) {
            issues.push(ValidationIssue::DuplicateId {
                id: proposal.id.clone(),
            });
        } else if issues.is_empty() {
            seen.insert(&proposal.id);
        }

        if issues.is_empty() {
            partition.valid.push(proposal.clone());
        } else {
            partition.flagged.push(InvalidProposalRecord {
                position,
                proposal: proposal.clone(),
                issues,
            });
        }
    }

    partition
}

/// Collects every numeric sanity violation on a single proposal.
pub fn check_proposal(proposal: &Proposal) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    positive(&mut issues, ProposalField::PrecoTotal, proposal.preco_total);
    if let Some(per_area) = proposal.preco_por_m2 {
        non_negative(&mut issues, ProposalField::PrecoPorM2, per_area);
    }
    non_negative(&mut issues, ProposalField::DistanciaKm, proposal.distancia_km);
    positive(
        &mut issues,
        ProposalField::TempoMedioProducaoHoras,
        proposal.tempo_medio_producao_horas,
    );
    non_negative(
        &mut issues,
        ProposalField::TempoRespostaMinutos,
        proposal.tempo_resposta_minutos,
    );

    rating(&mut issues, ProposalField::NotaGeral, Some(proposal.nota_geral));
    rating(&mut issues, ProposalField::NotaPrazo, proposal.nota_prazo);
    rating(&mut issues, ProposalField::NotaQualidade, proposal.nota_qualidade);
    rating(
        &mut issues,
        ProposalField::NotaAtendimento,
        proposal.nota_atendimento,
    );

    issues
}

fn positive(issues: &mut Vec<ValidationIssue>, field: ProposalField, value: f64) {
    if !value.is_finite() {
        issues.push(ValidationIssue::NotFinite { field });
    } else if value <= 0.0 {
        issues.push(ValidationIssue::NotPositive { field, value });
    }
}

fn non_negative(issues: &mut Vec<ValidationIssue>, field: ProposalField, value: f64) {
    if !value.is_finite() {
        issues.push(ValidationIssue::NotFinite { field });
    } else if value < 0.0 {
        issues.push(ValidationIssue::Negative { field, value });
    }
}

fn rating(issues: &mut Vec<ValidationIssue>, field: ProposalField, value: Option<f64>) {
    match value {
        Some(value) if !value.is_finite() => issues.push(ValidationIssue::NotFinite { field }),
        Some(value) if !(0.0..=MAX_RATING).contains(&value) => {
            issues.push(ValidationIssue::RatingOutOfRange { field, value })
        }
        _ => {}
    }
}
