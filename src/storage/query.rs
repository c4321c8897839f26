// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset list query engine: filter, search, sort and paginate.
//!
//! Filtering and counting share one predicate, so `total` always describes
//! the same set the page was cut from.

use std::cmp::Ordering;

use super::repository::assets::StoredAsset;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Sentinel accepted by `assetType` and `status` meaning "no filter".
const ALL: &str = "all";

/// Asset field that can appear in a sort expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
    Location,
    AssetType,
    Status,
    TokenSymbol,
    TotalValue,
    TotalTokens,
    TokenPrice,
    MinInvestment,
    ExpectedYield,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "title" => SortField::Title,
            "location" => SortField::Location,
            "assetType" => SortField::AssetType,
            "status" => SortField::Status,
            "tokenSymbol" => SortField::TokenSymbol,
            "totalValue" => SortField::TotalValue,
            "totalTokens" => SortField::TotalTokens,
            "tokenPrice" => SortField::TokenPrice,
            "minInvestment" => SortField::MinInvestment,
            "expectedYield" => SortField::ExpectedYield,
            _ => return None,
        })
    }

    fn compare(&self, a: &StoredAsset, b: &StoredAsset) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Location => a.location.cmp(&b.location),
            SortField::AssetType => a.asset_type.as_str().cmp(b.asset_type.as_str()),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::TokenSymbol => a.token_symbol.cmp(&b.token_symbol),
            SortField::TotalValue => a.total_value.total_cmp(&b.total_value),
            SortField::TotalTokens => a.total_tokens.cmp(&b.total_tokens),
            SortField::TokenPrice => a.token_price.total_cmp(&b.token_price),
            SortField::MinInvestment => a.min_investment.total_cmp(&b.min_investment),
            SortField::ExpectedYield => a.expected_yield.total_cmp(&b.expected_yield),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    /// Parse a comma-separated list such as `-totalValue,title`.
    /// Unknown names are dropped; an empty result means newest first.
    pub fn parse_list(raw: Option<&str>) -> Vec<SortKey> {
        let keys: Vec<SortKey> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| {
                let (descending, name) = match s.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, s),
                };
                SortField::parse(name).map(|field| SortKey { field, descending })
            })
            .collect();

        if keys.is_empty() {
            vec![SortKey {
                field: SortField::CreatedAt,
                descending: true,
            }]
        } else {
            keys
        }
    }
}

/// A parsed asset list request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuery {
    pub asset_type: Option<String>,
    pub status: Option<String>,
    /// Lower-cased search needle
    pub search: Option<String>,
    pub sort: Vec<SortKey>,
    pub page: u64,
    pub limit: u64,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            asset_type: None,
            status: None,
            search: None,
            sort: SortKey::parse_list(None),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct AssetPage {
    pub assets: Vec<StoredAsset>,
    /// Matching assets before pagination
    pub total: u64,
    pub num_of_pages: u64,
}

fn exact_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
        .map(str::to_string)
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as u64)
        .unwrap_or(default)
}

impl AssetQuery {
    /// Build a query from raw query-string values. Never fails: bad paging
    /// values fall back to the defaults and `limit` is capped.
    pub fn from_params(
        asset_type: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
        sort: Option<&str>,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Self {
        Self {
            asset_type: exact_filter(asset_type),
            status: exact_filter(status),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            sort: SortKey::parse_list(sort),
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    pub fn matches(&self, asset: &StoredAsset) -> bool {
        if let Some(asset_type) = &self.asset_type {
            if asset.asset_type.as_str() != asset_type {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if asset.status.as_str() != status {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            return asset.title.to_lowercase().contains(needle)
                || asset.location.to_lowercase().contains(needle);
        }
        true
    }

    fn compare(&self, a: &StoredAsset, b: &StoredAsset) -> Ordering {
        self.sort
            .iter()
            .map(|key| {
                let ordering = key.field.compare(a, b);
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }

    /// Apply the query to a full set of assets.
    pub fn run(&self, assets: Vec<StoredAsset>) -> AssetPage {
        let mut matching: Vec<StoredAsset> =
            assets.into_iter().filter(|a| self.matches(a)).collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total = matching.len() as u64;
        let num_of_pages = total.div_ceil(self.limit);
        let skip = (self.page - 1).saturating_mul(self.limit);

        let assets = matching
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect();

        AssetPage {
            assets,
            total,
            num_of_pages,
        }
    }
}
