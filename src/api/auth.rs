// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity endpoints: registration, login and profile management.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{hash_password, verify_password, Auth},
    error::{ApiError, ApiJson},
    models::{
        AuthResponse, ConnectWalletRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
        UserPublic, UserResponse,
    },
    state::AppState,
    storage::{StorageError, StoredUser, UserRepository},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn user_not_found(err: StorageError, context: &str) -> ApiError {
    match err {
        StorageError::NotFound(_) => ApiError::not_found("User not found"),
        other => ApiError::storage(other, context),
    }
}

fn issue_token(state: &AppState, user: &StoredUser, context: &str) -> Result<String, ApiError> {
    state
        .tokens
        .issue(&user.id, &user.name, user.role)
        .map_err(|e| ApiError::internal(context, e))
}

/// Register a new account and return a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    const CONTEXT: &str = "Unable to register user";

    let new_user = request.validate()?;
    let password = new_user.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(CONTEXT, e))?
        .map_err(|e| ApiError::internal(CONTEXT, e))?;
    let user = StoredUser::new(new_user.name, new_user.email, password_hash, new_user.role);

    UserRepository::new(&state.db)
        .create(&user)
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::bad_request("Email already registered"),
            other => ApiError::storage(other, CONTEXT),
        })?;

    let token = issue_token(&state, &user, CONTEXT)?;
    tracing::info!(user_id = %user.id, role = %user.role, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            user: UserPublic::from(&user),
            token,
        }),
    ))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    const CONTEXT: &str = "Unable to login";

    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.trim().is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Please provide email and password"));
    };

    let user = UserRepository::new(&state.db)
        .find_by_email(&email)
        .map_err(|e| ApiError::storage(e, CONTEXT))?;

    let verified = match user.as_ref().map(|u| u.password_hash.clone()) {
        Some(stored) => tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| ApiError::internal(CONTEXT, e))?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::info!("login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let token = issue_token(&state, &user, CONTEXT)?;
    tracing::debug!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        success: true,
        user: UserPublic::from(&user),
        token,
    }))
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn me(
    Auth(caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepository::new(&state.db)
        .get(&caller.user_id)
        .map_err(|e| user_not_found(e, "Unable to fetch user profile"))?;

    Ok(Json(UserResponse {
        success: true,
        user: user.into(),
    }))
}

/// Update name, wallet address or profile image. Empty values are ignored.
#[utoipa::path(
    patch,
    path = "/api/auth/update-profile",
    tag = "Auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile(
    Auth(caller): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;

    let user = UserRepository::new(&state.db)
        .update(&caller.user_id, |user| request.apply(user))
        .map_err(|e| user_not_found(e, "Unable to update profile"))?;

    Ok(Json(UserResponse {
        success: true,
        user: user.into(),
    }))
}

/// Bind a wallet address to the caller's account.
#[utoipa::path(
    post,
    path = "/api/auth/connect-wallet",
    tag = "Auth",
    security(("bearer_auth" = [])),
    request_body = ConnectWalletRequest,
    responses(
        (status = 200, description = "Wallet connected", body = UserResponse),
        (status = 400, description = "Missing wallet address"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn connect_wallet(
    Auth(caller): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ConnectWalletRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let wallet_address = request
        .wallet_address()
        .ok_or_else(|| ApiError::bad_request("Please provide wallet address"))?
        .to_string();

    let user = UserRepository::new(&state.db)
        .update(&caller.user_id, |user| {
            user.wallet_address = Some(wallet_address.clone())
        })
        .map_err(|e| user_not_found(e, "Unable to connect wallet"))?;

    tracing::info!(user_id = %user.id, "wallet connected");

    Ok(Json(UserResponse {
        success: true,
        user: user.into(),
    }))
}
