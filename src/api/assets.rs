// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset catalogue and investment endpoints.
//!
//! Reads are public. Creating an asset and changing its tokenization
//! status require the `ManageAsset` capability; every mutation of an
//! existing asset additionally requires the caller to own it or be an
//! admin, checked inside the same write transaction as the change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{AssetManager, Auth, AuthenticatedUser, Capability},
    error::{ApiError, ApiJson, ApiQuery},
    models::{
        check_tokenization_status, AssetCountResponse, AssetInput, AssetListParams,
        AssetListResponse, AssetResponse, AssetUpdateResponse, InvestRequest, MessageResponse,
        TokenizationRequest,
    },
    state::AppState,
    storage::{
        AssetQuery, AssetRepository, LedgerError, OwnershipEnforcer, Projection,
        StorageError, StorageResult, StoredAsset, UserRef, UserRepository,
    },
};

fn asset_not_found(asset_id: &str) -> ApiError {
    ApiError::not_found(format!("No asset found with id {asset_id}"))
}

fn storage_failure(err: StorageError, asset_id: &str, context: &str) -> ApiError {
    match err {
        StorageError::NotFound(_) => asset_not_found(asset_id),
        other => ApiError::storage(other, context),
    }
}

/// Failure inside an asset write transaction: either the store failed or
/// the request was refused after seeing the current document.
enum WriteFailure {
    Storage(StorageError),
    Rejected(ApiError),
}

impl From<StorageError> for WriteFailure {
    fn from(err: StorageError) -> Self {
        WriteFailure::Storage(err)
    }
}

impl From<ApiError> for WriteFailure {
    fn from(err: ApiError) -> Self {
        WriteFailure::Rejected(err)
    }
}

impl WriteFailure {
    fn into_api(self, asset_id: &str, context: &str) -> ApiError {
        match self {
            WriteFailure::Storage(err) => storage_failure(err, asset_id, context),
            WriteFailure::Rejected(err) => err,
        }
    }
}

fn require_owner(asset: &StoredAsset, user: &AuthenticatedUser, action: &str) -> Result<(), ApiError> {
    asset.verify_ownership(user).map_err(|_| {
        tracing::info!(asset_id = %asset.id, user_id = %user.user_id, "{action} refused for non-owner");
        ApiError::forbidden(format!("Not authorized to {action} this asset"))
    })
}

/// Replace user ids with projections. Owners always; investors on request.
fn resolve_users(
    state: &AppState,
    assets: &mut [StoredAsset],
    projection: Projection,
    investors: bool,
) -> StorageResult<()> {
    let ids: Vec<String> = assets
        .iter()
        .flat_map(|asset| {
            let owner = std::iter::once(asset.owner.id());
            let investor_ids = asset
                .investors
                .iter()
                .filter(move |_| investors)
                .map(|entry| entry.user.id());
            owner.chain(investor_ids)
        })
        .map(str::to_string)
        .collect();

    let users = UserRepository::new(&state.db).summaries(ids.iter().map(String::as_str), projection)?;
    for asset in assets.iter_mut() {
        asset.resolve_users(&users, investors);
    }
    Ok(())
}

/// List assets with filtering, search, sorting and pagination.
#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "Assets",
    params(AssetListParams),
    responses(
        (status = 200, description = "One page of assets", body = AssetListResponse),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn list_assets(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AssetListParams>,
) -> Result<Json<AssetListResponse>, ApiError> {
    const CONTEXT: &str = "Unable to fetch assets";

    let query = AssetQuery::from_params(
        params.asset_type.as_deref(),
        params.status.as_deref(),
        params.search.as_deref(),
        params.sort.as_deref(),
        params.page.as_deref(),
        params.limit.as_deref(),
    );

    let mut page = AssetRepository::new(&state.db)
        .list(&query)
        .map_err(|e| ApiError::storage(e, CONTEXT))?;
    resolve_users(&state, &mut page.assets, Projection::NameEmail, false)
        .map_err(|e| ApiError::storage(e, CONTEXT))?;

    Ok(Json(AssetListResponse {
        success: true,
        assets: page.assets,
        total_assets: page.total,
        num_of_pages: page.num_of_pages,
    }))
}

/// Get one asset with owner and investor details.
#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    tag = "Assets",
    params(("id" = String, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset details", body = AssetResponse),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<AssetResponse>, ApiError> {
    const CONTEXT: &str = "Unable to fetch asset";

    let asset = AssetRepository::new(&state.db)
        .get(&asset_id)
        .map_err(|e| storage_failure(e, &asset_id, CONTEXT))?;

    let mut assets = [asset];
    resolve_users(&state, &mut assets, Projection::NameEmailWallet, true)
        .map_err(|e| ApiError::storage(e, CONTEXT))?;
    let [asset] = assets;

    Ok(Json(AssetResponse {
        success: true,
        asset,
    }))
}

/// Create an asset owned by the caller.
#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "Assets",
    security(("bearer_auth" = [])),
    request_body = AssetInput,
    responses(
        (status = 201, description = "Asset created", body = AssetResponse),
        (status = 400, description = "Invalid asset fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role may not create assets")
    )
)]
pub async fn create_asset(
    AssetManager(user): AssetManager,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AssetInput>,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    let asset = input.into_new_asset(&user.user_id)?;

    AssetRepository::new(&state.db)
        .create(&asset)
        .map_err(|e| ApiError::storage(e, "Unable to create asset"))?;

    tracing::info!(asset_id = %asset.id, owner = %user.user_id, "asset created");

    Ok((
        StatusCode::CREATED,
        Json(AssetResponse {
            success: true,
            asset,
        }),
    ))
}

/// Partially update an asset. Only the owner or an admin may do this;
/// only an admin may reassign the owner.
#[utoipa::path(
    patch,
    path = "/api/assets/{id}",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Asset ID")),
    request_body = AssetInput,
    responses(
        (status = 200, description = "Updated asset", body = AssetResponse),
        (status = 400, description = "Invalid asset fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn update_asset(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    ApiJson(input): ApiJson<AssetInput>,
) -> Result<Json<AssetResponse>, ApiError> {
    const CONTEXT: &str = "Unable to update asset";

    let new_owner = match input.new_owner() {
        Some(owner_id) => {
            if !user.can(Capability::Administer) {
                return Err(ApiError::forbidden("Not authorized to change the asset owner"));
            }
            let exists = UserRepository::new(&state.db)
                .exists(owner_id)
                .map_err(|e| ApiError::storage(e, CONTEXT))?;
            if !exists {
                return Err(ApiError::bad_request(format!("No user found with id {owner_id}")));
            }
            Some(owner_id.to_string())
        }
        None => None,
    };

    let asset = AssetRepository::new(&state.db)
        .update(&asset_id, |asset| -> Result<(), WriteFailure> {
            require_owner(asset, &user, "update")?;
            input.apply_to(asset)?;
            if let Some(owner_id) = &new_owner {
                asset.owner = UserRef::from(owner_id.as_str());
            }
            Ok(())
        })
        .map_err(|e| e.into_api(&asset_id, CONTEXT))?;

    tracing::info!(asset_id = %asset.id, user_id = %user.user_id, version = asset.version, "asset updated");

    Ok(Json(AssetResponse {
        success: true,
        asset,
    }))
}

/// Delete an asset. Only the owner or an admin may do this.
#[utoipa::path(
    delete,
    path = "/api/assets/{id}",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn delete_asset(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    const CONTEXT: &str = "Unable to delete asset";
    let repo = AssetRepository::new(&state.db);

    let asset = repo
        .get(&asset_id)
        .map_err(|e| storage_failure(e, &asset_id, CONTEXT))?;
    require_owner(&asset, &user, "delete")?;

    repo.delete(&asset_id)
        .map_err(|e| storage_failure(e, &asset_id, CONTEXT))?;

    tracing::info!(asset_id = %asset_id, user_id = %user.user_id, "asset deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Asset successfully deleted".to_string(),
    }))
}

/// Assets owned by the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/assets/user/assets",
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's assets", body = AssetCountResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn user_assets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<AssetCountResponse>, ApiError> {
    let assets = AssetRepository::new(&state.db)
        .list_by_owner(&user.user_id)
        .map_err(|e| ApiError::storage(e, "Unable to fetch user assets"))?;

    Ok(Json(AssetCountResponse {
        success: true,
        count: assets.len(),
        assets,
    }))
}

/// Assets the caller has invested in, newest first.
#[utoipa::path(
    get,
    path = "/api/assets/user/investments",
    tag = "Assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's investments", body = AssetCountResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn user_investments(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<AssetCountResponse>, ApiError> {
    let assets = AssetRepository::new(&state.db)
        .list_by_investor(&user.user_id)
        .map_err(|e| ApiError::storage(e, "Unable to fetch user investments"))?;

    Ok(Json(AssetCountResponse {
        success: true,
        count: assets.len(),
        assets,
    }))
}

/// Invest in an active asset. Repeated investments by the same user
/// accumulate into one investor entry.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/invest",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Asset ID")),
    request_body = InvestRequest,
    responses(
        (status = 200, description = "Investment recorded", body = AssetUpdateResponse),
        (status = 400, description = "Missing amounts or asset not active"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn invest(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    ApiJson(request): ApiJson<InvestRequest>,
) -> Result<Json<AssetUpdateResponse>, ApiError> {
    let investment = request.investment()?;

    let asset = AssetRepository::new(&state.db)
        .invest(&asset_id, &user.user_id, investment)
        .map_err(|e| match e {
            LedgerError::Storage(err) => {
                storage_failure(err, &asset_id, "Unable to process investment")
            }
            other => ApiError::from(other),
        })?;

    tracing::info!(
        asset_id = %asset_id,
        investor = %user.user_id,
        tokens = investment.tokens(),
        amount = investment.amount(),
        "investment applied"
    );

    Ok(Json(AssetUpdateResponse {
        success: true,
        message: "Investment successful".to_string(),
        asset,
    }))
}

/// Record tokenization progress. `completed` also makes the asset active.
#[utoipa::path(
    patch,
    path = "/api/assets/{id}/tokenization",
    tag = "Assets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Asset ID")),
    request_body = TokenizationRequest,
    responses(
        (status = 200, description = "Tokenization status updated", body = AssetUpdateResponse),
        (status = 400, description = "Missing or invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or role may not manage assets"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn update_tokenization(
    AssetManager(user): AssetManager,
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    ApiJson(request): ApiJson<TokenizationRequest>,
) -> Result<Json<AssetUpdateResponse>, ApiError> {
    let raw_status = request
        .tokenization_status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide tokenization status"))?;
    let status = check_tokenization_status(raw_status)?;

    let mut replaced = None;
    let asset = AssetRepository::new(&state.db)
        .update(&asset_id, |asset| -> Result<(), WriteFailure> {
            require_owner(asset, &user, "update")?;
            replaced = asset.set_tokenization(status, request.contract_address.clone());
            Ok(())
        })
        .map_err(|e| e.into_api(&asset_id, "Unable to update tokenization status"))?;

    if let Some(previous) = replaced.filter(|s| s.is_terminal()) {
        tracing::warn!(
            asset_id = %asset_id,
            previous = previous.as_str(),
            "tokenization completion reactivated a closed asset"
        );
    }
    tracing::info!(
        asset_id = %asset_id,
        tokenization = status.as_str(),
        status = asset.status.as_str(),
        "tokenization status changed"
    );

    Ok(Json(AssetUpdateResponse {
        success: true,
        message: "Tokenization status updated".to_string(),
        asset,
    }))
}
