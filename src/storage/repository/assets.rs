// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset repository.
//!
//! Assets are stored as JSON documents in the `assets` table, each with its
//! embedded investor participation list. Mutations go through
//! [`AssetRepository::update`], which runs the whole read-modify-write in a
//! single redb write transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{Database, StorageError, StorageResult, ASSETS};
use super::super::ledger::{Investment, LedgerError};
use super::super::query::{AssetPage, AssetQuery};
use super::users::{UserRef, UserSummary};

// =============================================================================
// Enumerations
// =============================================================================

/// Kind of real-world asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AssetType {
    RealEstate,
    Agriculture,
    Infrastructure,
    Equity,
    Art,
    Commodity,
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::RealEstate,
        AssetType::Agriculture,
        AssetType::Infrastructure,
        AssetType::Equity,
        AssetType::Art,
        AssetType::Commodity,
        AssetType::Other,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::RealEstate => "real-estate",
            AssetType::Agriculture => "agriculture",
            AssetType::Infrastructure => "infrastructure",
            AssetType::Equity => "equity",
            AssetType::Art => "art",
            AssetType::Commodity => "commodity",
            AssetType::Other => "other",
        }
    }
}

/// Lifecycle state of an asset. Any value may be written by the owner or
/// an admin; there is no enforced transition graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    Draft,
    Pending,
    Active,
    Funded,
    Completed,
    Cancelled,
}

impl AssetStatus {
    pub const ALL: [AssetStatus; 6] = [
        AssetStatus::Draft,
        AssetStatus::Pending,
        AssetStatus::Active,
        AssetStatus::Funded,
        AssetStatus::Completed,
        AssetStatus::Cancelled,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Draft => "draft",
            AssetStatus::Pending => "pending",
            AssetStatus::Active => "active",
            AssetStatus::Funded => "funded",
            AssetStatus::Completed => "completed",
            AssetStatus::Cancelled => "cancelled",
        }
    }

    /// States an asset is not expected to leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetStatus::Completed | AssetStatus::Cancelled)
    }
}

/// Progress of the (simulated) on-chain tokenization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizationStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TokenizationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not-started" => Some(TokenizationStatus::NotStarted),
            "in-progress" => Some(TokenizationStatus::InProgress),
            "completed" => Some(TokenizationStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenizationStatus::NotStarted => "not-started",
            TokenizationStatus::InProgress => "in-progress",
            TokenizationStatus::Completed => "completed",
        }
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Supporting document attached to an asset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

/// One investor's cumulative participation in an asset.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvestorEntry {
    pub user: UserRef,
    pub tokens_owned: u64,
    pub investment_amount: f64,
    /// Time of the most recent top-up
    pub investment_date: DateTime<Utc>,
}

/// Asset stored in the asset store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredAsset {
    /// Unique asset identifier (UUID)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub asset_type: AssetType,
    pub location: String,
    pub total_value: f64,
    pub currency: String,
    /// Upper-case token ticker
    pub token_symbol: String,
    pub total_tokens: u64,
    pub token_price: f64,
    pub min_investment: f64,
    /// Expected annual yield in percent
    pub expected_yield: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub documents: Vec<AssetDocument>,
    pub status: AssetStatus,
    pub tokenization_status: TokenizationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    pub owner: UserRef,
    /// At most one entry per user
    #[serde(default)]
    pub investors: Vec<InvestorEntry>,
    /// Incremented on every committed write
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl super::super::OwnedResource for StoredAsset {
    fn owner_user_id(&self) -> &str {
        self.owner.id()
    }

    fn resource_name(&self) -> String {
        format!("asset {}", self.id)
    }
}

impl StoredAsset {
    /// Whether `user_id` holds an investor entry.
    pub fn has_investor(&self, user_id: &str) -> bool {
        self.investors.iter().any(|entry| entry.user.id() == user_id)
    }

    /// Accumulate an investment into the caller's entry, creating it on
    /// first investment. Only `active` assets accept investments.
    pub fn record_investment(
        &mut self,
        investor_id: &str,
        investment: Investment,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if self.status != AssetStatus::Active {
            return Err(LedgerError::NotActive);
        }

        match self
            .investors
            .iter_mut()
            .find(|entry| entry.user.id() == investor_id)
        {
            Some(entry) => {
                let tokens = entry
                    .tokens_owned
                    .checked_add(investment.tokens())
                    .ok_or(LedgerError::Overflow)?;
                let amount = entry.investment_amount + investment.amount();
                if !amount.is_finite() {
                    return Err(LedgerError::Overflow);
                }
                entry.tokens_owned = tokens;
                entry.investment_amount = amount;
                entry.investment_date = at;
            }
            None => self.investors.push(InvestorEntry {
                user: UserRef::from(investor_id),
                tokens_owned: investment.tokens(),
                investment_amount: investment.amount(),
                investment_date: at,
            }),
        }
        Ok(())
    }

    /// Overwrite the tokenization state. Completion forces `status` to
    /// `active` whatever it was before; returns the status it replaced when
    /// that happened.
    pub fn set_tokenization(
        &mut self,
        status: TokenizationStatus,
        contract_address: Option<String>,
    ) -> Option<AssetStatus> {
        self.tokenization_status = status;
        if let Some(address) = contract_address.filter(|a| !a.trim().is_empty()) {
            self.contract_address = Some(address.trim().to_string());
        }

        if status == TokenizationStatus::Completed && self.status != AssetStatus::Active {
            let previous = self.status;
            self.status = AssetStatus::Active;
            return Some(previous);
        }
        None
    }

    /// Tokens held across all investors.
    pub fn tokens_subscribed(&self) -> u64 {
        self.investors
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.tokens_owned))
    }

    /// Resolve the owner reference (and optionally investor references).
    pub fn resolve_users(&mut self, users: &HashMap<String, UserSummary>, investors: bool) {
        self.owner.resolve(users);
        if investors {
            for entry in &mut self.investors {
                entry.user.resolve(users);
            }
        }
    }

    /// Every user id referenced by this asset.
    pub fn referenced_user_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.owner.id()).chain(self.investors.iter().map(|e| e.user.id()))
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for asset operations.
pub struct AssetRepository<'a> {
    db: &'a Database,
}

impl<'a> AssetRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new asset.
    pub fn create(&self, asset: &StoredAsset) -> StorageResult<()> {
        let json = serde_json::to_vec(asset)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ASSETS)?;
            if table.get(asset.id.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("Asset {}", asset.id)));
            }
            table.insert(asset.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an asset by ID.
    pub fn get(&self, asset_id: &str) -> StorageResult<StoredAsset> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ASSETS)?;
        match table.get(asset_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("Asset {asset_id}"))),
        }
    }

    /// Read-modify-write one asset atomically.
    ///
    /// `apply` sees the committed state of the asset; if it returns an error
    /// the transaction is dropped and nothing is written. On success the
    /// version is bumped and `updatedAt` refreshed before commit.
    pub fn update<E, F>(&self, asset_id: &str, apply: F) -> Result<StoredAsset, E>
    where
        E: From<StorageError>,
        F: FnOnce(&mut StoredAsset) -> Result<(), E>,
    {
        let write_txn = self.db.begin_write().map_err(E::from)?;
        let asset = {
            let mut table = write_txn
                .open_table(ASSETS)
                .map_err(|e| E::from(StorageError::from(e)))?;

            let existing_bytes = {
                let existing = table
                    .get(asset_id)
                    .map_err(|e| E::from(StorageError::from(e)))?
                    .ok_or_else(|| E::from(StorageError::NotFound(format!("Asset {asset_id}"))))?;
                existing.value().to_vec()
            };

            let mut asset: StoredAsset =
                serde_json::from_slice(&existing_bytes).map_err(|e| E::from(StorageError::from(e)))?;
            apply(&mut asset)?;
            asset.version += 1;
            asset.updated_at = Utc::now();

            let json = serde_json::to_vec(&asset).map_err(|e| E::from(StorageError::from(e)))?;
            table
                .insert(asset_id, json.as_slice())
                .map_err(|e| E::from(StorageError::from(e)))?;
            asset
        };
        write_txn.commit().map_err(|e| E::from(StorageError::from(e)))?;
        Ok(asset)
    }

    /// Apply an investment from `investor_id` (Investment Ledger Operation).
    pub fn invest(
        &self,
        asset_id: &str,
        investor_id: &str,
        investment: Investment,
    ) -> Result<StoredAsset, LedgerError> {
        self.update(asset_id, |asset| {
            asset.record_investment(investor_id, investment, Utc::now())
        })
    }

    /// Delete an asset.
    pub fn delete(&self, asset_id: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ASSETS)?;
            if table.remove(asset_id)?.is_none() {
                return Err(StorageError::NotFound(format!("Asset {asset_id}")));
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Run a filter/sort/paginate query.
    pub fn list(&self, query: &AssetQuery) -> StorageResult<AssetPage> {
        Ok(query.run(self.list_all()?))
    }

    /// Assets owned by a user, newest first.
    pub fn list_by_owner(&self, owner_user_id: &str) -> StorageResult<Vec<StoredAsset>> {
        self.list_where(|asset| asset.owner.id() == owner_user_id)
    }

    /// Assets in which a user holds an investor entry, newest first.
    pub fn list_by_investor(&self, investor_user_id: &str) -> StorageResult<Vec<StoredAsset>> {
        self.list_where(|asset| asset.has_investor(investor_user_id))
    }

    fn list_where<P>(&self, predicate: P) -> StorageResult<Vec<StoredAsset>>
    where
        P: Fn(&StoredAsset) -> bool,
    {
        let mut assets: Vec<StoredAsset> =
            self.list_all()?.into_iter().filter(|a| predicate(a)).collect();
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(assets)
    }

    /// Every asset in storage order.
    pub fn list_all(&self) -> StorageResult<Vec<StoredAsset>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ASSETS)?;

        let mut assets = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            match serde_json::from_slice::<StoredAsset>(value.value()) {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::warn!(asset_id = %key.value(), error = %e, "Skipping unreadable asset");
                }
            }
        }
        Ok(assets)
    }
}

#[cfg(test)]
pub(crate) fn sample_asset(owner_id: &str) -> StoredAsset {
    let now = Utc::now();
    StoredAsset {
        id: uuid::Uuid::new_v4().to_string(),
        title: "Test Property".to_string(),
        description: "A test property".to_string(),
        asset_type: AssetType::RealEstate,
        location: "Mumbai, India".to_string(),
        total_value: 10_000_000.0,
        currency: "INR".to_string(),
        token_symbol: "TPROP".to_string(),
        total_tokens: 1000,
        token_price: 10_000.0,
        min_investment: 50_000.0,
        expected_yield: 8.0,
        images: Vec::new(),
        documents: Vec::new(),
        status: AssetStatus::Active,
        tokenization_status: TokenizationStatus::NotStarted,
        contract_address: None,
        owner: UserRef::from(owner_id),
        investors: Vec::new(),
        version: 0,
        created_at: now,
        updated_at: now,
    }
}
