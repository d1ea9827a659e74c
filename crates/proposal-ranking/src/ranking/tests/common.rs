use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::ranking::domain::{
    DeliveryType, GraficaId, OrderId, PrintTechnology, Proposal, ProposalId, VendorTier,
};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn id(raw: &str) -> ProposalId {
    ProposalId(raw.to_string())
}

/// Baseline proposal for order `pedido-4821`; tests override what they exercise.
pub(super) fn proposal(raw_id: &str, preco_total: f64) -> Proposal {
    Proposal {
        id: id(raw_id),
        pedido_id: OrderId("pedido-4821".to_string()),
        grafica_id: GraficaId(format!("grafica-{raw_id}")),
        preco_total,
        preco_por_m2: None,
        delivery_type: DeliveryType::EntregaPaga,
        aceita_cupom: false,
        nota_geral: 4.0,
        nota_prazo: None,
        nota_qualidade: None,
        nota_atendimento: None,
        nivel: VendorTier::Prata,
        distancia_km: 5.0,
        tempo_medio_producao_horas: 48.0,
        historico_na_categoria: 3,
        tempo_resposta_minutos: 30.0,
        tecnologia: PrintTechnology::Digital,
    }
}

/// Three shops quoting the same banner job.
///
/// `p-a` is cheapest (best value), `p-b` is best overall and best rated,
/// `p-c` is fastest. Composite scores: 0.53, 0.765, 0.55375.
pub(super) fn order_set() -> Vec<Proposal> {
    vec![
        Proposal {
            nota_geral: 4.4,
            distancia_km: 10.0,
            tempo_medio_producao_horas: 72.0,
            tempo_resposta_minutos: 60.0,
            historico_na_categoria: 2,
            preco_por_m2: Some(40.0),
            nivel: VendorTier::Bronze,
            ..proposal("p-a", 100.0)
        },
        Proposal {
            nota_geral: 4.8,
            distancia_km: 2.0,
            tempo_medio_producao_horas: 48.0,
            tempo_resposta_minutos: 10.0,
            historico_na_categoria: 12,
            delivery_type: DeliveryType::EntregaGratis,
            nivel: VendorTier::Ouro,
            ..proposal("p-b", 150.0)
        },
        Proposal {
            nota_geral: 4.5,
            distancia_km: 5.0,
            tempo_medio_producao_horas: 24.0,
            tempo_resposta_minutos: 30.0,
            historico_na_categoria: 5,
            preco_por_m2: Some(70.0),
            tecnologia: PrintTechnology::GrandeFormato,
            ..proposal("p-c", 200.0)
        },
    ]
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&body).expect("valid json");
    (status, value)
}
