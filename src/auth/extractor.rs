// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser, Capability};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Validates the `Authorization: Bearer <token>` header against the
/// configured signing secret.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.tokens.verify(token)?;
        parts.extensions.insert(user.clone());

        Ok(Auth(user))
    }
}

/// Extractor that requires the `ManageAsset` capability
/// (`asset-owner` or `admin`).
pub struct AssetManager(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AssetManager {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.can(Capability::ManageAsset) {
            tracing::info!(
                user_id = %user.user_id,
                role = %user.role,
                "asset management refused for role"
            );
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AssetManager(user))
    }
}
