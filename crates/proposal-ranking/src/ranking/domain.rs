use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scorer::ScoreComponent;

/// Identifier wrapper for a vendor proposal. Ordered lexicographically for tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the buyer order (`pedido`) a proposal answers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Identifier of the print shop (`gráfica`) that submitted a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraficaId(pub String);

/// A single vendor's quote against one buyer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub pedido_id: OrderId,
    pub grafica_id: GraficaId,
    pub preco_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco_por_m2: Option<f64>,
    pub delivery_type: DeliveryType,
    pub aceita_cupom: bool,
    pub nota_geral: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nota_prazo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nota_qualidade: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nota_atendimento: Option<f64>,
    pub nivel: VendorTier,
    pub distancia_km: f64,
    pub tempo_medio_producao_horas: f64,
    pub historico_na_categoria: u32,
    pub tempo_resposta_minutos: f64,
    pub tecnologia: PrintTechnology,
}

/// How the finished job reaches the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    Retirada,
    EntregaPaga,
    EntregaGratis,
}

impl DeliveryType {
    pub const fn label(self) -> &'static str {
        match self {
            DeliveryType::Retirada => "retirada no local",
            DeliveryType::EntregaPaga => "entrega paga",
            DeliveryType::EntregaGratis => "entrega grátis",
        }
    }
}

/// Vendor reputation tier. Informational only, it never feeds the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorTier {
    Bronze,
    Prata,
    Ouro,
}

impl VendorTier {
    pub const fn label(self) -> &'static str {
        match self {
            VendorTier::Bronze => "bronze",
            VendorTier::Prata => "prata",
            VendorTier::Ouro => "ouro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrintTechnology {
    Digital,
    Offset,
    Serigrafia,
    Sublimacao,
    Flexografia,
    GrandeFormato,
    Laser,
}

impl PrintTechnology {
    pub const fn label(self) -> &'static str {
        match self {
            PrintTechnology::Digital => "digital",
            PrintTechnology::Offset => "offset",
            PrintTechnology::Serigrafia => "serigrafia",
            PrintTechnology::Sublimacao => "sublimação",
            PrintTechnology::Flexografia => "flexografia",
            PrintTechnology::GrandeFormato => "grande formato",
            PrintTechnology::Laser => "laser",
        }
    }
}

/// Price position of a proposal relative to its group's mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrecoStatus {
    AbaixoMedia,
    NaMedia,
    AcimaMedia,
}

impl PrecoStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PrecoStatus::AbaixoMedia => "abaixo da média",
            PrecoStatus::NaMedia => "na média",
            PrecoStatus::AcimaMedia => "acima da média",
        }
    }
}

/// Category awarded to at most one proposal per order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Recomendada,
    MelhorCustoBeneficio,
    MelhorAvaliacao,
    MaisRapida,
}

impl Badge {
    pub const ALL: [Badge; 4] = [
        Badge::Recomendada,
        Badge::MelhorCustoBeneficio,
        Badge::MelhorAvaliacao,
        Badge::MaisRapida,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Badge::Recomendada => "recomendada",
            Badge::MelhorCustoBeneficio => "melhor custo-benefício",
            Badge::MelhorAvaliacao => "melhor avaliação",
            Badge::MaisRapida => "mais rápida",
        }
    }
}

/// A proposal enriched with its group-relative ranking fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalWithScore {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub score: f64,
    pub badges: BTreeSet<Badge>,
    pub preco_status: PrecoStatus,
    pub preco_percentual_vs_media: f64,
    pub componentes: Vec<ScoreComponent>,
}

impl ProposalWithScore {
    pub fn id(&self) -> &ProposalId {
        &self.proposal.id
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

/// Group summary for one order comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalContext {
    pub menor_distancia: f64,
    pub melhor_custo_beneficio_id: ProposalId,
    pub melhor_avaliacao_id: ProposalId,
    pub mais_rapida_id: ProposalId,
    pub recomendada_id: ProposalId,
    pub preco_medio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco_medio_por_m2: Option<f64>,
}

impl ProposalContext {
    /// Whether the proposal sits at the group's minimum distance.
    pub fn is_closest(&self, proposal: &Proposal) -> bool {
        proposal.distancia_km == self.menor_distancia
    }

    pub fn winner(&self, badge: Badge) -> &ProposalId {
        match badge {
            Badge::Recomendada => &self.recomendada_id,
            Badge::MelhorCustoBeneficio => &self.melhor_custo_beneficio_id,
            Badge::MelhorAvaliacao => &self.melhor_avaliacao_id,
            Badge::MaisRapida => &self.mais_rapida_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for DeliveryType {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_token(raw).as_str() {
            "RETIRADA" | "RETIRADA_NO_LOCAL" => Ok(DeliveryType::Retirada),
            "ENTREGA_PAGA" => Ok(DeliveryType::EntregaPaga),
            "ENTREGA_GRATIS" => Ok(DeliveryType::EntregaGratis),
            _ => Err(UnknownVariant {
                kind: "deliveryType",
                value: raw.to_string(),
            }),
        }
    }
}

impl FromStr for VendorTier {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_token(raw).as_str() {
            "BRONZE" => Ok(VendorTier::Bronze),
            "PRATA" => Ok(VendorTier::Prata),
            "OURO" => Ok(VendorTier::Ouro),
            _ => Err(UnknownVariant {
                kind: "nivel",
                value: raw.to_string(),
            }),
        }
    }
}

impl FromStr for PrintTechnology {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize_token(raw).as_str() {
            "DIGITAL" => Ok(PrintTechnology::Digital),
            "OFFSET" => Ok(PrintTechnology::Offset),
            "SERIGRAFIA" => Ok(PrintTechnology::Serigrafia),
            "SUBLIMACAO" => Ok(PrintTechnology::Sublimacao),
            "FLEXOGRAFIA" => Ok(PrintTechnology::Flexografia),
            "GRANDE_FORMATO" => Ok(PrintTechnology::GrandeFormato),
            "LASER" => Ok(PrintTechnology::Laser),
            _ => Err(UnknownVariant {
                kind: "tecnologia",
                value: raw.to_string(),
            }),
        }
    }
}

/// Uppercases, folds Portuguese accents and maps separators to `_`.
pub(crate) fn normalize_token(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'A',
            'é' | 'ê' | 'É' | 'Ê' => 'E',
            'í' | 'Í' => 'I',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'O',
            'ú' | 'Ú' => 'U',
            'ç' | 'Ç' => 'C',
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect();

    folded
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
