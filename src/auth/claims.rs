// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::{Capability, Role};

/// Claims carried by an RWABridge bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Canonical user ID
    pub user_id: String,
    /// Display name at the time of issue
    pub name: String,
    /// Role at the time of issue
    pub role: Role,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the primary type used throughout the application to represent
/// the caller of a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            name: claims.name,
            role: claims.role,
            expires_at: claims.exp,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Owner-or-admin gate for mutating a resource.
    pub fn may_modify(&self, owner_user_id: &str) -> bool {
        self.user_id == owner_user_id || self.can(Capability::Administer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(role: Role) -> TokenClaims {
        TokenClaims {
            user_id: "user_123".to_string(),
            name: "Asha".to_string(),
            role,
            iat: 1_700_000_000,
            exp: 1_702_592_000,
        }
    }

    #[test]
    fn claims_serialize_with_camel_case_user_id() {
        let json = serde_json::to_value(sample_claims(Role::User)).unwrap();
        assert_eq!(json["userId"], "user_123");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn from_claims_copies_identity() {
        let user = AuthenticatedUser::from_claims(sample_claims(Role::AssetOwner));
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.name, "Asha");
        assert_eq!(user.role, Role::AssetOwner);
        assert_eq!(user.expires_at, 1_702_592_000);
    }

    #[test]
    fn may_modify_allows_owner_and_admin_only() {
        let owner = AuthenticatedUser::from_claims(sample_claims(Role::AssetOwner));
        assert!(owner.may_modify("user_123"));
        assert!(!owner.may_modify("someone_else"));

        let mut admin = AuthenticatedUser::from_claims(sample_claims(Role::Admin));
        admin.user_id = "admin_1".to_string();
        assert!(admin.may_modify("someone_else"));
    }
}
