// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for one entity type over the
//! shared [`Database`](super::Database).

pub mod assets;
pub mod users;

pub use assets::{
    AssetDocument, AssetRepository, AssetStatus, AssetType, InvestorEntry, StoredAsset,
    TokenizationStatus,
};
pub use users::{normalize_email, Projection, StoredUser, UserRef, UserRepository, UserSummary};
