// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Field names are camelCase
//! on the wire and every response carries a `success` flag.
//!
//! Request bodies use `Option` fields so that a missing value produces the
//! field-specific 400 message instead of a generic deserialization error.
//! Validation lives next to the request type that needs it.
//!
//! ## Model Categories
//!
//! - **Identity**: register, login, profile and wallet binding
//! - **Assets**: create/update input, list parameters, list/detail bodies
//! - **Ledger**: investment and tokenization status requests
//! - **Simulation**: mock chain request and response bodies

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::error::ApiError;
use crate::simulation::{SimulatedTransaction, TokenizationResult, WalletBalance};
use crate::storage::{
    normalize_email, AssetDocument, AssetStatus, AssetType, Investment, LedgerError,
    StoredAsset, StoredUser, TokenizationStatus, UserRef,
};

pub const NAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
pub const DEFAULT_CURRENCY: &str = "INR";

/// Trimmed, non-empty string or `None`.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Numeric field that clients may send either as a JSON number or as a
/// numeric string (`5`, `"5"`, `"50000.00"`). `null`, an absent key and a
/// blank string all read as `None`.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, found \"{text}\"")))
        }
    }
}

/// Loose `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

// =============================================================================
// Identity Models
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `user` (default), `asset-owner` or `admin`
    pub role: Option<String>,
}

/// Registration input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let name = present(self.name.as_deref())
            .ok_or_else(|| ApiError::bad_request("Please provide name"))?;
        if name.chars().count() > NAME_MAX_LEN {
            return Err(ApiError::bad_request(format!(
                "Name cannot be more than {NAME_MAX_LEN} characters"
            )));
        }

        let email = present(self.email.as_deref())
            .map(normalize_email)
            .ok_or_else(|| ApiError::bad_request("Please provide email"))?;
        if !is_valid_email(&email) {
            return Err(ApiError::bad_request("Please provide a valid email"));
        }

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("Please provide password"))?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {PASSWORD_MIN_LEN} characters"
            )));
        }

        let role = match present(self.role.as_deref()) {
            None => Role::default(),
            Some(raw) => Role::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("Invalid role: {raw}")))?,
        };

        Ok(NewUser {
            name: name.to_string(),
            email,
            password,
            role,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub wallet_address: Option<String>,
    pub profile_image: Option<String>,
}

impl UpdateProfileRequest {
    /// Apply the non-empty fields.
    pub fn apply(&self, user: &mut StoredUser) {
        if let Some(name) = present(self.name.as_deref()) {
            user.name = name.to_string();
        }
        if let Some(wallet) = present(self.wallet_address.as_deref()) {
            user.wallet_address = Some(wallet.to_string());
        }
        if let Some(image) = present(self.profile_image.as_deref()) {
            user.profile_image = Some(image.to_string());
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match present(self.name.as_deref()) {
            Some(name) if name.chars().count() > NAME_MAX_LEN => Err(ApiError::bad_request(
                format!("Name cannot be more than {NAME_MAX_LEN} characters"),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletRequest {
    pub wallet_address: Option<String>,
}

impl ConnectWalletRequest {
    pub fn wallet_address(&self) -> Option<&str> {
        present(self.wallet_address.as_deref())
    }
}

/// User fields returned with a token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub wallet_address: Option<String>,
    pub kyc_verified: bool,
}

impl From<&StoredUser> for UserPublic {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            wallet_address: user.wallet_address.clone(),
            kyc_verified: user.kyc_verified,
        }
    }
}

/// Full profile without the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub wallet_address: Option<String>,
    pub profile_image: Option<String>,
    pub kyc_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            wallet_address: user.wallet_address,
            profile_image: user.profile_image,
            kyc_verified: user.kyc_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserPublic,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

// =============================================================================
// Asset Models
// =============================================================================

/// Asset fields accepted on create (all required ones present) and on
/// update (any subset). `investors` is not accepted; `owner` is only
/// honoured on update by an admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub asset_type: Option<String>,
    pub location: Option<String>,
    pub total_value: Option<f64>,
    pub currency: Option<String>,
    pub token_symbol: Option<String>,
    pub total_tokens: Option<u64>,
    pub token_price: Option<f64>,
    pub min_investment: Option<f64>,
    pub expected_yield: Option<f64>,
    pub images: Option<Vec<String>>,
    pub documents: Option<Vec<AssetDocument>>,
    pub status: Option<String>,
    pub tokenization_status: Option<String>,
    pub contract_address: Option<String>,
    /// New owner id (admin only, update only)
    pub owner: Option<String>,
}

fn check_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Please provide an asset title"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ApiError::bad_request(format!(
            "Title cannot be more than {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_description(description: &str) -> Result<String, ApiError> {
    if description.trim().is_empty() {
        return Err(ApiError::bad_request("Please provide a description"));
    }
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ApiError::bad_request(format!(
            "Description cannot be more than {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(description.to_string())
}

fn check_asset_type(raw: &str) -> Result<AssetType, ApiError> {
    AssetType::parse(raw.trim())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid asset type: {raw}")))
}

fn check_status(raw: &str) -> Result<AssetStatus, ApiError> {
    AssetStatus::parse(raw.trim())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid asset status: {raw}")))
}

pub fn check_tokenization_status(raw: &str) -> Result<TokenizationStatus, ApiError> {
    TokenizationStatus::parse(raw.trim())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid tokenization status: {raw}")))
}

fn check_amount(value: f64, field: &str) -> Result<f64, ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::bad_request(format!("{field} must be a non-negative number")));
    }
    Ok(value)
}

fn check_required<T>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::bad_request(message))
}

fn check_location(location: &str) -> Result<String, ApiError> {
    present(Some(location))
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Please provide asset location"))
}

fn check_token_symbol(symbol: &str) -> Result<String, ApiError> {
    present(Some(symbol))
        .map(str::to_uppercase)
        .ok_or_else(|| ApiError::bad_request("Please provide token symbol"))
}

impl AssetInput {
    /// Build a new asset owned by `owner_id`.
    pub fn into_new_asset(self, owner_id: &str) -> Result<StoredAsset, ApiError> {
        let title = check_title(self.title.as_deref().unwrap_or_default())?;
        let description = check_description(self.description.as_deref().unwrap_or_default())?;
        let asset_type = check_asset_type(&check_required(
            present(self.asset_type.as_deref()),
            "Please specify asset type",
        )?)?;
        let location = check_location(self.location.as_deref().unwrap_or_default())?;
        let total_value = check_amount(
            check_required(self.total_value, "Please provide total asset value")?,
            "totalValue",
        )?;
        let token_symbol = check_token_symbol(self.token_symbol.as_deref().unwrap_or_default())?;
        let total_tokens =
            check_required(self.total_tokens, "Please provide total number of tokens")?;
        let token_price = check_amount(
            check_required(self.token_price, "Please provide token price")?,
            "tokenPrice",
        )?;
        let min_investment = check_amount(
            check_required(
                self.min_investment,
                "Please provide minimum investment amount",
            )?,
            "minInvestment",
        )?;
        let expected_yield = check_amount(self.expected_yield.unwrap_or(0.0), "expectedYield")?;
        let status = match present(self.status.as_deref()) {
            Some(raw) => check_status(raw)?,
            None => AssetStatus::default(),
        };
        let tokenization_status = match present(self.tokenization_status.as_deref()) {
            Some(raw) => check_tokenization_status(raw)?,
            None => TokenizationStatus::default(),
        };

        let now = Utc::now();
        Ok(StoredAsset {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description,
            asset_type,
            location,
            total_value,
            currency: present(self.currency.as_deref())
                .unwrap_or(DEFAULT_CURRENCY)
                .to_string(),
            token_symbol,
            total_tokens,
            token_price,
            min_investment,
            expected_yield,
            images: self.images.unwrap_or_default(),
            documents: self.documents.unwrap_or_default(),
            status,
            tokenization_status,
            contract_address: present(self.contract_address.as_deref()).map(str::to_string),
            owner: UserRef::from(owner_id),
            investors: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate every supplied field before touching `asset`, then apply
    /// them. Ownership changes are handled by the caller.
    pub fn apply_to(&self, asset: &mut StoredAsset) -> Result<(), ApiError> {
        let title = self.title.as_deref().map(check_title).transpose()?;
        let description = self
            .description
            .as_deref()
            .map(check_description)
            .transpose()?;
        let asset_type = self.asset_type.as_deref().map(check_asset_type).transpose()?;
        let location = self.location.as_deref().map(check_location).transpose()?;
        let total_value = self
            .total_value
            .map(|v| check_amount(v, "totalValue"))
            .transpose()?;
        let token_symbol = self
            .token_symbol
            .as_deref()
            .map(check_token_symbol)
            .transpose()?;
        let token_price = self
            .token_price
            .map(|v| check_amount(v, "tokenPrice"))
            .transpose()?;
        let min_investment = self
            .min_investment
            .map(|v| check_amount(v, "minInvestment"))
            .transpose()?;
        let expected_yield = self
            .expected_yield
            .map(|v| check_amount(v, "expectedYield"))
            .transpose()?;
        let status = self.status.as_deref().map(check_status).transpose()?;
        let tokenization_status = self
            .tokenization_status
            .as_deref()
            .map(check_tokenization_status)
            .transpose()?;

        if let Some(v) = title {
            asset.title = v;
        }
        if let Some(v) = description {
            asset.description = v;
        }
        if let Some(v) = asset_type {
            asset.asset_type = v;
        }
        if let Some(v) = location {
            asset.location = v;
        }
        if let Some(v) = total_value {
            asset.total_value = v;
        }
        if let Some(v) = present(self.currency.as_deref()) {
            asset.currency = v.to_string();
        }
        if let Some(v) = token_symbol {
            asset.token_symbol = v;
        }
        if let Some(v) = self.total_tokens {
            asset.total_tokens = v;
        }
        if let Some(v) = token_price {
            asset.token_price = v;
        }
        if let Some(v) = min_investment {
            asset.min_investment = v;
        }
        if let Some(v) = expected_yield {
            asset.expected_yield = v;
        }
        if let Some(v) = &self.images {
            asset.images = v.clone();
        }
        if let Some(v) = &self.documents {
            asset.documents = v.clone();
        }
        if let Some(v) = status {
            asset.status = v;
        }
        if let Some(v) = tokenization_status {
            asset.tokenization_status = v;
        }
        if let Some(v) = &self.contract_address {
            asset.contract_address = present(Some(v.as_str())).map(str::to_string);
        }
        Ok(())
    }

    pub fn new_owner(&self) -> Option<&str> {
        present(self.owner.as_deref())
    }
}

/// Query parameters of `GET /api/assets`. Kept as raw strings; the query
/// engine decides how lenient to be.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssetListParams {
    /// Exact asset type, or `all`
    pub asset_type: Option<String>,
    /// Exact status, or `all`
    pub status: Option<String>,
    /// Case-insensitive substring of title or location
    pub search: Option<String>,
    /// Comma-separated fields, `-` prefix for descending
    pub sort: Option<String>,
    /// 1-based page (default 1)
    pub page: Option<String>,
    /// Page size (default 10, max 100)
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetListResponse {
    pub success: bool,
    pub assets: Vec<StoredAsset>,
    pub total_assets: u64,
    pub num_of_pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetResponse {
    pub success: bool,
    pub asset: StoredAsset,
}

/// Asset mutation result with a confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetUpdateResponse {
    pub success: bool,
    pub message: String,
    pub asset: StoredAsset,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetCountResponse {
    pub success: bool,
    pub count: usize,
    pub assets: Vec<StoredAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Ledger Models
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestRequest {
    #[serde(default, deserialize_with = "number_or_string")]
    #[schema(value_type = Option<f64>)]
    pub tokens_amount: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    #[schema(value_type = Option<f64>)]
    pub investment_amount: Option<f64>,
}

impl InvestRequest {
    /// Absent amounts count as zero, and so as missing.
    pub fn investment(&self) -> Result<Investment, LedgerError> {
        Investment::from_request(
            self.tokens_amount.unwrap_or(0.0),
            self.investment_amount.unwrap_or(0.0),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationRequest {
    /// `not-started`, `in-progress` or `completed`
    pub tokenization_status: Option<String>,
    pub contract_address: Option<String>,
}

// =============================================================================
// Simulation Models
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionRequest {
    pub asset_id: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    #[schema(value_type = Option<f64>)]
    pub token_amount: Option<f64>,
    /// `buy` or `sell`
    pub transaction_type: Option<String>,
}

/// Simulation input after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOrder {
    pub asset_id: String,
    pub token_amount: f64,
    pub transaction_type: String,
}

impl SimulateTransactionRequest {
    pub fn validate(self) -> Result<TransactionOrder, ApiError> {
        let missing =
            || ApiError::bad_request("Please provide assetId, tokenAmount, and transactionType");

        let asset_id = present(self.asset_id.as_deref()).ok_or_else(missing)?;
        let token_amount = self
            .token_amount
            .filter(|v| *v != 0.0 && v.is_finite())
            .ok_or_else(missing)?;
        let transaction_type = present(self.transaction_type.as_deref()).ok_or_else(missing)?;

        Ok(TransactionOrder {
            asset_id: asset_id.to_string(),
            token_amount,
            transaction_type: transaction_type.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub success: bool,
    pub transaction: SimulatedTransaction,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub success: bool,
    pub balance: WalletBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenizationSimulationResponse {
    pub success: bool,
    pub tokenization: TokenizationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionHistoryResponse {
    pub success: bool,
    pub transactions: Vec<SimulatedTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn register(name: &str, email: &str, password: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            role: role.map(Into::into),
        }
    }

    fn complete_input() -> AssetInput {
        AssetInput {
            title: Some("  Green Acres ".into()),
            description: Some("Farmland".into()),
            asset_type: Some("agriculture".into()),
            location: Some("Nashik".into()),
            total_value: Some(5_000_000.0),
            token_symbol: Some("grn".into()),
            total_tokens: Some(500),
            token_price: Some(10_000.0),
            min_investment: Some(10_000.0),
            ..Default::default()
        }
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("a@.io"));
    }

    #[test]
    fn register_normalises_and_defaults_role() {
        let user = register(" Asha ", " Asha@Example.COM ", "secret1", None)
            .validate()
            .unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn register_rejects_bad_input() {
        let cases = [
            register("", "a@b.co", "secret1", None),
            register(&"x".repeat(51), "a@b.co", "secret1", None),
            register("Asha", "not-an-email", "secret1", None),
            register("Asha", "a@b.co", "12345", None),
            register("Asha", "a@b.co", "secret1", Some("superuser")),
        ];
        for case in cases {
            let err = case.validate().unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn register_accepts_asset_owner_role() {
        let user = register("Ravi", "ravi@example.com", "secret1", Some("asset-owner"))
            .validate()
            .unwrap();
        assert_eq!(user.role, Role::AssetOwner);
    }

    #[test]
    fn new_asset_applies_defaults_and_normalisation() {
        let asset = complete_input().into_new_asset("owner-1").unwrap();
        assert_eq!(asset.title, "Green Acres");
        assert_eq!(asset.token_symbol, "GRN");
        assert_eq!(asset.currency, "INR");
        assert_eq!(asset.status, AssetStatus::Draft);
        assert_eq!(asset.tokenization_status, TokenizationStatus::NotStarted);
        assert_eq!(asset.expected_yield, 0.0);
        assert_eq!(asset.owner.id(), "owner-1");
        assert!(asset.investors.is_empty());
    }

    #[test]
    fn new_asset_reports_first_missing_field() {
        let mut input = complete_input();
        input.title = None;
        assert_eq!(
            input.into_new_asset("o").unwrap_err().message,
            "Please provide an asset title"
        );

        let mut input = complete_input();
        input.token_price = None;
        assert_eq!(
            input.into_new_asset("o").unwrap_err().message,
            "Please provide token price"
        );
    }

    #[test]
    fn new_asset_rejects_unknown_asset_type() {
        let mut input = complete_input();
        input.asset_type = Some("spaceship".into());
        assert_eq!(
            input.into_new_asset("o").unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut asset = complete_input().into_new_asset("owner-1").unwrap();
        let before = asset.clone();

        let patch = AssetInput {
            title: Some("Renamed".into()),
            status: Some("bogus".into()),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut asset).is_err());
        assert_eq!(asset, before);

        let patch = AssetInput {
            title: Some("Renamed".into()),
            status: Some("active".into()),
            token_symbol: Some("ren".into()),
            ..Default::default()
        };
        patch.apply_to(&mut asset).unwrap();
        assert_eq!(asset.title, "Renamed");
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.token_symbol, "REN");
        assert_eq!(asset.location, before.location);
    }

    #[test]
    fn plain_update_stores_tokenization_status_without_activating() {
        let mut asset = complete_input().into_new_asset("owner-1").unwrap();
        asset.status = AssetStatus::Pending;

        let patch = AssetInput {
            tokenization_status: Some("completed".into()),
            ..Default::default()
        };
        patch.apply_to(&mut asset).unwrap();
        assert_eq!(asset.tokenization_status, TokenizationStatus::Completed);
        assert_eq!(asset.status, AssetStatus::Pending);
    }

    #[test]
    fn update_profile_ignores_empty_fields() {
        let mut user = StoredUser::new(
            "Asha".into(),
            "asha@example.com".into(),
            "hash".into(),
            Role::User,
        );
        UpdateProfileRequest {
            name: Some("".into()),
            wallet_address: Some("So1Wallet".into()),
            profile_image: None,
        }
        .apply(&mut user);
        assert_eq!(user.name, "Asha");
        assert_eq!(user.wallet_address.as_deref(), Some("So1Wallet"));
    }

    #[test]
    fn simulate_transaction_requires_all_fields() {
        let err = SimulateTransactionRequest {
            asset_id: Some("a1".into()),
            token_amount: None,
            transaction_type: Some("buy".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.message,
            "Please provide assetId, tokenAmount, and transactionType"
        );

        let order = SimulateTransactionRequest {
            asset_id: Some("a1".into()),
            token_amount: Some(4.0),
            transaction_type: Some("sell".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(order.token_amount, 4.0);
    }

    #[test]
    fn user_public_serializes_null_wallet() {
        let user = StoredUser::new("A".into(), "a@b.co".into(), "h".into(), Role::Admin);
        let json = serde_json::to_value(UserPublic::from(&user)).unwrap();
        assert!(json["walletAddress"].is_null());
        assert_eq!(json["kycVerified"], false);
        assert_eq!(json["role"], "admin");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn amounts_accept_numbers_and_numeric_strings() {
        let request: InvestRequest =
            serde_json::from_str(r#"{"tokensAmount":"5","investmentAmount":"50000.00"}"#)
                .unwrap();
        let investment = request.investment().unwrap();
        assert_eq!(investment.tokens(), 5);
        assert_eq!(investment.amount(), 50_000.0);

        let request: InvestRequest =
            serde_json::from_str(r#"{"tokensAmount":3,"investmentAmount":300}"#).unwrap();
        assert_eq!(request.investment().unwrap().tokens(), 3);

        let order = serde_json::from_str::<SimulateTransactionRequest>(
            r#"{"assetId":"a1","tokenAmount":"5","transactionType":"buy"}"#,
        )
        .unwrap()
        .validate()
        .unwrap();
        assert_eq!(order.token_amount, 5.0);
    }

    #[test]
    fn string_amounts_keep_missing_and_negative_rules() {
        let blank: InvestRequest =
            serde_json::from_str(r#"{"tokensAmount":"","investmentAmount":"100"}"#).unwrap();
        assert!(matches!(blank.investment(), Err(LedgerError::MissingAmount)));

        let absent: InvestRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(absent.investment(), Err(LedgerError::MissingAmount)));

        let negative: InvestRequest =
            serde_json::from_str(r#"{"tokensAmount":"-2","investmentAmount":"100"}"#).unwrap();
        assert!(matches!(negative.investment(), Err(LedgerError::NegativeAmount)));

        let fractional: InvestRequest =
            serde_json::from_str(r#"{"tokensAmount":"1.5","investmentAmount":"100"}"#).unwrap();
        assert!(matches!(fractional.investment(), Err(LedgerError::FractionalTokens)));

        assert!(serde_json::from_str::<InvestRequest>(r#"{"tokensAmount":"five"}"#).is_err());
    }
}
