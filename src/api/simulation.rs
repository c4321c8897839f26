// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mock chain endpoints. All require a bearer token; none persist anything.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, ApiJson},
    models::{
        BalanceResponse, SimulateTransactionRequest, TokenizationSimulationResponse,
        TransactionHistoryResponse, TransactionResponse,
    },
    state::AppState,
};

/// Simulate a token purchase or sale.
#[utoipa::path(
    post,
    path = "/api/simulation/simulate-transaction",
    tag = "Simulation",
    security(("bearer_auth" = [])),
    request_body = SimulateTransactionRequest,
    responses(
        (status = 200, description = "Simulated transaction", body = TransactionResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn simulate_transaction(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SimulateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let order = request.validate()?;
    let transaction = state
        .simulator
        .transaction(
            &user.user_id,
            order.asset_id,
            order.token_amount,
            order.transaction_type,
        )
        .await;

    Ok(Json(TransactionResponse {
        success: true,
        transaction,
    }))
}

/// Simulated SOL and USDC balance of the caller's wallet.
#[utoipa::path(
    get,
    path = "/api/simulation/wallet-balance",
    tag = "Simulation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Simulated balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn wallet_balance(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        success: true,
        balance: state.simulator.wallet_balance().await,
    })
}

/// Simulate deploying a token contract for an asset. The contract address
/// is not stored; send it to the tokenization status endpoint to keep it.
#[utoipa::path(
    post,
    path = "/api/simulation/tokenize/{asset_id}",
    tag = "Simulation",
    security(("bearer_auth" = [])),
    params(("asset_id" = String, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Simulated tokenization", body = TokenizationSimulationResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn tokenize(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Json<TokenizationSimulationResponse> {
    Json(TokenizationSimulationResponse {
        success: true,
        tokenization: state.simulator.tokenize(asset_id).await,
    })
}

/// Simulated transaction history, newest first.
#[utoipa::path(
    get,
    path = "/api/simulation/transaction-history",
    tag = "Simulation",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Simulated history", body = TransactionHistoryResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn transaction_history(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Json<TransactionHistoryResponse> {
    Json(TransactionHistoryResponse {
        success: true,
        transactions: state.simulator.history(&user.user_id).await,
    })
}
