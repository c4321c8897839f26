// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AssetCountResponse, AssetInput, AssetListResponse, AssetResponse, AssetUpdateResponse,
        AuthResponse, BalanceResponse, ConnectWalletRequest, InvestRequest, LoginRequest,
        MessageResponse, RegisterRequest, SimulateTransactionRequest,
        TokenizationSimulationResponse, TokenizationRequest, TransactionHistoryResponse,
        TransactionResponse, UpdateProfileRequest, UserProfile, UserPublic, UserResponse,
    },
    simulation::{SimulatedTransaction, TokenizationResult, WalletBalance},
    state::AppState,
    storage::{
        AssetDocument, AssetStatus, AssetType, InvestorEntry, StoredAsset, TokenizationStatus,
        UserRef, UserSummary,
    },
};

pub mod assets;
pub mod auth;
pub mod health;
pub mod simulation;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/update-profile", patch(auth::update_profile))
        .route("/auth/connect-wallet", post(auth::connect_wallet))
        .route(
            "/assets",
            get(assets::list_assets).post(assets::create_asset),
        )
        .route("/assets/user/assets", get(assets::user_assets))
        .route("/assets/user/investments", get(assets::user_investments))
        .route(
            "/assets/{id}",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/assets/{id}/invest", post(assets::invest))
        .route("/assets/{id}/tokenization", patch(assets::update_tokenization))
        .route(
            "/simulation/simulate-transaction",
            post(simulation::simulate_transaction),
        )
        .route("/simulation/wallet-balance", get(simulation::wallet_balance))
        .route("/simulation/tokenize/{asset_id}", post(simulation::tokenize))
        .route(
            "/simulation/transaction-history",
            get(simulation::transaction_history),
        );

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        auth::connect_wallet,
        assets::list_assets,
        assets::get_asset,
        assets::create_asset,
        assets::update_asset,
        assets::delete_asset,
        assets::user_assets,
        assets::user_investments,
        assets::invest,
        assets::update_tokenization,
        simulation::simulate_transaction,
        simulation::wallet_balance,
        simulation::tokenize,
        simulation::transaction_history
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ConnectWalletRequest,
            AuthResponse,
            UserResponse,
            UserPublic,
            UserProfile,
            AssetInput,
            AssetResponse,
            AssetListResponse,
            AssetCountResponse,
            AssetUpdateResponse,
            MessageResponse,
            InvestRequest,
            TokenizationRequest,
            StoredAsset,
            AssetDocument,
            AssetType,
            AssetStatus,
            TokenizationStatus,
            InvestorEntry,
            UserRef,
            UserSummary,
            SimulateTransactionRequest,
            SimulatedTransaction,
            TransactionResponse,
            WalletBalance,
            BalanceResponse,
            TokenizationResult,
            TokenizationSimulationResponse,
            TransactionHistoryResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Assets", description = "Asset catalogue, investments and tokenization"),
        (name = "Simulation", description = "Mock chain transactions and balances")
    )
)]
struct ApiDoc;
