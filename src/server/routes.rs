//! HTTP routes: supply, balances, wallet connect, transfer

use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::messages;
use crate::core::paths::api as paths;
use crate::error::QueryError;
use crate::node::{connect_failure_message, Node, WalletStatus};
use crate::supply::SupplySnapshot;
use crate::transfer::{Feedback, TransferRequest};

#[derive(Clone)]
pub struct NodeState { pub node: Arc<Node> }

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"error": message.into()})))
}

pub fn create_router(node: Arc<Node>) -> Router {
    Router::new()
        .route(paths::HEALTH, get(health))
        .route(paths::SUPPLY, get(supply))
        .route(paths::BALANCE, get(balance))
        .route(paths::OWNER, get(owner))
        .route(paths::WALLET_CONNECT, post(wallet_connect))
        .route(paths::WALLET_STATUS, get(wallet_status))
        .route(paths::TRANSFER, post(transfer))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(NodeState { node })
}

async fn health(State(s): State<NodeState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": s.node.config().app,
        "network": s.node.network().as_str(),
        "contract": s.node.contract_address(),
    }))
}

fn supply_json(snapshot: &SupplySnapshot) -> Value {
    json!({
        "total_supply": snapshot.total_supply,
        "formatted": snapshot.formatted(),
        "fetched_at": snapshot.fetched_at,
    })
}

/// Cached snapshot when the watcher has one, otherwise a live query.
async fn supply(State(s): State<NodeState>) -> Result<Json<Value>, ApiError> {
    if let Some(snapshot) = s.node.supply_watcher().latest().await {
        return Ok(Json(supply_json(&snapshot)));
    }
    let snapshot = s
        .node
        .total_supply()
        .await
        .map_err(|_| api_error(StatusCode::BAD_GATEWAY, messages::SUPPLY_FETCH_FAILED))?;
    Ok(Json(supply_json(&snapshot)))
}

async fn balance(State(s): State<NodeState>, Path(address): Path<String>) -> Result<Json<Value>, ApiError> {
    match s.node.balance_of(&address).await {
        Ok(amount) => Ok(Json(json!({"address": address, "balance": amount, "formatted": amount.to_btc_string()}))),
        Err(e @ QueryError::MissingAddress) => Err(api_error(StatusCode::BAD_REQUEST, e.user_message())),
        Err(e) => {
            tracing::warn!(%address, error = %e, "balance query failed");
            Err(api_error(StatusCode::BAD_GATEWAY, e.user_message()))
        }
    }
}

async fn owner(State(s): State<NodeState>) -> Result<Json<Value>, ApiError> {
    let owner = s
        .node
        .owner()
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e.to_string()))?;
    Ok(Json(json!({"owner": owner})))
}

async fn wallet_connect(State(s): State<NodeState>) -> Result<Json<WalletStatus>, (StatusCode, Json<Feedback>)> {
    s.node
        .connect_wallet()
        .await
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(Feedback::failure(connect_failure_message(&e)))))
}

async fn wallet_status(State(s): State<NodeState>) -> Json<WalletStatus> {
    Json(s.node.wallet_status().await)
}

/// Always 200: the outcome is in the body.
async fn transfer(State(s): State<NodeState>, Json(request): Json<TransferRequest>) -> Json<Feedback> {
    Json(s.node.transfer(&request).await)
}
