// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and the capabilities they grant.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Manages every asset and may override ownership
/// - `AssetOwner` - Lists assets and manages the ones they own
/// - `User` - Browses and invests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Investor account
    User,
    /// Account that lists and tokenizes assets
    AssetOwner,
    /// Full administrative access
    Admin,
}

/// Operations gated by role rather than by resource ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create assets and drive their tokenization.
    ManageAsset,
    /// Act on any user's resources.
    Administer,
}

impl Role {
    /// The single role check used across the service.
    pub fn can(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::Admin, _) => true,
            (Role::AssetOwner, Capability::ManageAsset) => true,
            _ => false,
        }
    }

    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "asset-owner" => Some(Role::AssetOwner),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::AssetOwner => "asset-owner",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    /// New registrations are investors unless they ask otherwise.
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_capabilities() {
        assert!(Role::Admin.can(Capability::ManageAsset));
        assert!(Role::Admin.can(Capability::Administer));
    }

    #[test]
    fn asset_owner_manages_but_does_not_administer() {
        assert!(Role::AssetOwner.can(Capability::ManageAsset));
        assert!(!Role::AssetOwner.can(Capability::Administer));
    }

    #[test]
    fn user_has_no_capabilities() {
        assert!(!Role::User.can(Capability::ManageAsset));
        assert!(!Role::User.can(Capability::Administer));
    }

    #[test]
    fn parse_accepts_wire_names() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("Asset-Owner"), Some(Role::AssetOwner));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("client"), None);
    }

    #[test]
    fn serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Role::AssetOwner).unwrap(),
            r#""asset-owner""#
        );
        let role: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::default(), Role::User);
    }
}
