// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository (identity store).
//!
//! Users are stored as JSON documents in the `users` table. The
//! `user_emails` index enforces one account per normalised email.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{Database, StorageError, StorageResult, USERS, USER_EMAILS};
use crate::auth::Role;

/// User stored in the identity store. Carries the credential hash, so it
/// is never serialized into an API response directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    /// Normalised (trimmed, lower-case) email
    pub email: String,
    /// Salted PBKDF2 hash, see `auth::password`
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub kyc_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            role,
            wallet_address: None,
            profile_image: None,
            kyc_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Reduced user projection embedded in asset responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

/// Which user fields a resolved reference exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// `name`, `email`
    NameEmail,
    /// `name`, `email`, `walletAddress`
    NameEmailWallet,
}

impl UserSummary {
    pub fn project(user: &StoredUser, projection: Projection) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            wallet_address: match projection {
                Projection::NameEmail => None,
                Projection::NameEmailWallet => user.wallet_address.clone(),
            },
        }
    }
}

/// Non-owning reference to a user: an id as stored, or a resolved
/// projection when a response asks for it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Resolved(UserSummary),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Id(id) => id,
            UserRef::Resolved(summary) => &summary.id,
        }
    }

    /// Replace an id with its projection when the user is known.
    /// Dangling references stay as bare ids.
    pub fn resolve(&mut self, users: &HashMap<String, UserSummary>) {
        if let Some(summary) = users.get(self.id()) {
            *self = UserRef::Resolved(summary.clone());
        }
    }
}

impl From<&str> for UserRef {
    fn from(value: &str) -> Self {
        UserRef::Id(value.to_string())
    }
}

/// Normalise an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new user. Fails with `AlreadyExists` and writes nothing if
    /// the email is taken.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let email = normalize_email(&user.email);
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("User with email {email}")));
            }
            emails.insert(email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("User {user_id}"))),
        }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        Ok(table.get(user_id)?.is_some())
    }

    /// Look up a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let email = normalize_email(email);
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        let Some(user_id) = emails.get(email.as_str())?.map(|v| v.value().to_string()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Apply `apply` to a user inside one write transaction and refresh
    /// `updatedAt`. The email index is not touched; email is immutable.
    pub fn update<F>(&self, user_id: &str, apply: F) -> StorageResult<StoredUser>
    where
        F: FnOnce(&mut StoredUser),
    {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut table = write_txn.open_table(USERS)?;

            let existing_bytes = {
                let existing = table
                    .get(user_id)?
                    .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))?;
                existing.value().to_vec()
            };

            let mut user: StoredUser = serde_json::from_slice(&existing_bytes)?;
            apply(&mut user);
            user.updated_at = Utc::now();

            let json = serde_json::to_vec(&user)?;
            table.insert(user_id, json.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Resolve a set of user ids to projections. Unknown ids are omitted.
    pub fn summaries<'i, I>(
        &self,
        user_ids: I,
        projection: Projection,
    ) -> StorageResult<HashMap<String, UserSummary>>
    where
        I: IntoIterator<Item = &'i str>,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;

        let mut summaries = HashMap::new();
        for user_id in user_ids {
            if summaries.contains_key(user_id) {
                continue;
            }
            if let Some(value) = table.get(user_id)? {
                let user: StoredUser = serde_json::from_slice(value.value())?;
                summaries.insert(user.id.clone(), UserSummary::project(&user, projection));
            }
        }
        Ok(summaries)
    }
}
