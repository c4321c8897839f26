// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and assets in an embedded redb database.
//!
//! ## Layout
//!
//! - `database`: table definitions, `Database` handle and `StorageError`
//! - `repository`: typed repositories (`UserRepository`, `AssetRepository`)
//! - `query`: filter/search/sort/paginate engine for asset listings
//! - `ledger`: validated investment values
//! - `ownership`: owner-or-admin checks for mutations

pub mod database;
pub mod ledger;
pub mod ownership;
pub mod query;
pub mod repository;

pub use database::{Database, StorageError, StorageResult};
pub use ledger::{Investment, LedgerError};
pub use ownership::{OwnedResource, OwnershipEnforcer};
pub use query::{AssetPage, AssetQuery, SortField, SortKey};
pub use repository::{
    normalize_email, AssetDocument, AssetRepository, AssetStatus, AssetType, InvestorEntry,
    Projection, StoredAsset, StoredUser, TokenizationStatus, UserRef, UserRepository,
    UserSummary,
};
