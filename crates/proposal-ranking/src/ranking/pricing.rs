use serde::{Deserialize, Serialize};

use super::domain::{PrecoStatus, Proposal};

/// Half-width, in percent, of the band around the mean counted as "na média".
pub const PRICE_BAND_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceClassification {
    pub preco_status: PrecoStatus,
    pub preco_percentual_vs_media: f64,
}

/// Places a proposal's price relative to the group mean.
pub fn classify(proposal: &Proposal, preco_medio: f64) -> PriceClassification {
    let percentual = if preco_medio == 0.0 {
        0.0
    } else {
        (proposal.preco_total - preco_medio) / preco_medio * 100.0
    };

    let status = if percentual < -PRICE_BAND_PERCENT {
        PrecoStatus::AbaixoMedia
    } else if percentual > PRICE_BAND_PERCENT {
        PrecoStatus::AcimaMedia
    } else {
        PrecoStatus::NaMedia
    };

    PriceClassification {
        preco_status: status,
        preco_percentual_vs_media: percentual,
    }
}
