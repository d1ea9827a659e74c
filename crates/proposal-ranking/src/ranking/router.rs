use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::domain::{Proposal, ProposalId};
use super::engine::{RankingEngine, RankingError, SelectionError};

/// Shared state for the ranking endpoints.
#[derive(Debug, Clone)]
pub struct RankingState {
    pub engine: Arc<RankingEngine>,
    pub max_proposals: usize,
}

/// Payload for accepting one proposal out of a comparison.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub proposals: Vec<Proposal>,
    pub proposta_id: ProposalId,
}

/// Router builder exposing the ranking engine over HTTP.
pub fn ranking_router(engine: Arc<RankingEngine>, max_proposals: usize) -> Router {
    Router::new()
        .route("/api/v1/proposals/ranking", post(rank_handler))
        .route("/api/v1/proposals/selection", post(selection_handler))
        .with_state(RankingState {
            engine,
            max_proposals,
        })
}

pub(crate) async fn rank_handler(
    State(state): State<RankingState>,
    axum::Json(proposals): axum::Json<Vec<Proposal>>,
) -> Response {
    if let Some(response) = reject_oversized(&state, proposals.len()) {
        return response;
    }

    match state.engine.rank(&proposals) {
        Ok(outcome) => {
            info!(
                scored = outcome.scored.len(),
                flagged = outcome.flagged.len(),
                "proposal ranking served"
            );
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Err(error) => ranking_error_response(error),
    }
}

pub(crate) async fn selection_handler(
    State(state): State<RankingState>,
    axum::Json(request): axum::Json<SelectionRequest>,
) -> Response {
    if let Some(response) = reject_oversized(&state, request.proposals.len()) {
        return response;
    }

    let outcome = match state.engine.rank(&request.proposals) {
        Ok(outcome) => outcome,
        Err(error) => return ranking_error_response(error),
    };

    match outcome.select(&request.proposta_id) {
        Ok(selection) => {
            info!(proposta_id = %selection.proposta_id, "proposal selected");
            (StatusCode::OK, axum::Json(selection)).into_response()
        }
        Err(error @ SelectionError::UnknownProposal(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error @ SelectionError::Flagged(_)) => {
            let payload = json!({
                "error": error.to_string(),
                "warnings": outcome.warnings(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

fn reject_oversized(state: &RankingState, count: usize) -> Option<Response> {
    if count <= state.max_proposals {
        return None;
    }

    let payload = json!({
        "error": format!(
            "{count} proposals exceed the limit of {} per comparison",
            state.max_proposals
        ),
    });
    Some((StatusCode::PAYLOAD_TOO_LARGE, axum::Json(payload)).into_response())
}

fn ranking_error_response(error: RankingError) -> Response {
    let payload = match &error {
        RankingError::EmptyProposalSet => json!({ "error": error.to_string() }),
        RankingError::NoValidProposals { rejected } => json!({
            "error": error.to_string(),
            "rejected": rejected,
        }),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
