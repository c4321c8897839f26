// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and role capabilities for the RWABridge API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with email and password
//! 2. Server verifies the salted PBKDF2 hash and issues an HS256 token
//!    carrying `{userId, name, role}` (default validity 30 days)
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. The `Auth` extractor verifies signature and expiry
//!
//! ## Authorization
//!
//! - Role checks go through [`Role::can`] with a [`Capability`]
//! - Resource checks go through [`AuthenticatedUser::may_modify`]
//!   (owner or admin)

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod tokens;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{AssetManager, Auth};
pub use password::{hash_password, verify_password};
pub use roles::{Capability, Role};
pub use tokens::TokenKeys;
