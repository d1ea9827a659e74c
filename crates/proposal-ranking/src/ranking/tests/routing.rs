use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::ranking::domain::Proposal;
use crate::ranking::router::{
    rank_handler, ranking_router, selection_handler, RankingState, SelectionRequest,
};
use crate::ranking::RankingEngine;

fn state(max_proposals: usize) -> RankingState {
    RankingState {
        engine: Arc::new(RankingEngine::default()),
        max_proposals,
    }
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("build request")
}

#[tokio::test]
async fn ranking_route_returns_context_and_scored_proposals() {
    let router = ranking_router(Arc::new(RankingEngine::default()), 50);
    let body = serde_json::to_value(order_set()).expect("serialize proposals");

    let response = router
        .oneshot(post_json("/api/v1/proposals/ranking", &body))
        .await
        .expect("router responds");

    let (status, payload) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["context"]["recomendadaId"], "p-b");
    assert_eq!(payload["context"]["maisRapidaId"], "p-c");
    assert_eq!(payload["context"]["precoMedio"], 150.0);
    assert_eq!(payload["scored"][0]["precoStatus"], "ABAIXO_MEDIA");
    assert_eq!(payload["scored"][0]["precoTotal"], 100.0);
    assert_eq!(payload["scored"][1]["badges"], json!(["RECOMENDADA", "MELHOR_AVALIACAO"]));
    assert_eq!(payload["flagged"], json!([]));
}

#[tokio::test]
async fn empty_ranking_request_is_unprocessable() {
    let response = rank_handler(State(state(50)), axum::Json(Vec::new())).await;

    let (status, payload) = read_json(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["error"], "no proposals to compare");
}

#[tokio::test]
async fn all_invalid_request_lists_rejections() {
    let proposals = vec![Proposal {
        nota_geral: 6.0,
        ..proposal("p-1", 100.0)
    }];

    let response = rank_handler(State(state(50)), axum::Json(proposals)).await;

    let (status, payload) = read_json(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["rejected"][0]["issues"][0]["kind"], "ratingOutOfRange");
    assert_eq!(payload["rejected"][0]["issues"][0]["field"], "notaGeral");
}

#[tokio::test]
async fn oversized_request_is_rejected_before_ranking() {
    let response = rank_handler(State(state(2)), axum::Json(order_set())).await;

    let (status, payload) = read_json(response).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("limit of 2"));
}

#[tokio::test]
async fn selection_route_returns_hand_off_payload() {
    let router = ranking_router(Arc::new(RankingEngine::default()), 50);
    let body = json!({
        "proposals": order_set(),
        "propostaId": "p-a",
    });

    let response = router
        .oneshot(post_json("/api/v1/proposals/selection", &body))
        .await
        .expect("router responds");

    let (status, payload) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["pedidoId"], "pedido-4821");
    assert_eq!(payload["graficaId"], "grafica-p-a");
    assert_eq!(payload["precoTotal"], 100.0);
}

#[tokio::test]
async fn selecting_an_unknown_proposal_is_not_found() {
    let request = SelectionRequest {
        proposals: order_set(),
        proposta_id: id("p-404"),
    };

    let response = selection_handler(State(state(50)), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn selecting_a_flagged_proposal_is_unprocessable() {
    let mut proposals = order_set();
    proposals.push(Proposal {
        distancia_km: -3.0,
        ..proposal("p-bad", 90.0)
    });
    let request = SelectionRequest {
        proposals,
        proposta_id: id("p-bad"),
    };

    let response = selection_handler(State(state(50)), axum::Json(request)).await;

    let (status, payload) = read_json(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(payload["warnings"].as_array().map(Vec::len), Some(1));
}
