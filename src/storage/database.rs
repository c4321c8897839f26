// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `user_emails`: normalised email → user_id (uniqueness index)
//! - `assets`: asset_id → serialized StoredAsset
//!
//! redb admits a single write transaction at a time. Every read-modify-write
//! in the repositories runs inside one write transaction, which makes it the
//! per-document lock for concurrent updates.

use std::path::Path;

use redb::{ReadTransaction, TableDefinition, WriteTransaction};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: lowercase email → user_id.
pub(crate) const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Primary table: asset_id → serialized StoredAsset (JSON bytes).
pub(crate) const ASSETS: TableDefinition<&str, &[u8]> = TableDefinition::new("assets");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("permission denied: user {user_id} cannot modify {resource}")]
    PermissionDenied { user_id: String, resource: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID document database shared by all repositories.
pub struct Database {
    db: redb::Database,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = redb::Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(ASSETS)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "document store opened");
        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> StorageResult<ReadTransaction> {
        use redb::ReadableDatabase;
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Verify every table can be opened for reading.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.begin_read()?;
        read_txn.open_table(USERS)?;
        read_txn.open_table(USER_EMAILS)?;
        read_txn.open_table(ASSETS)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn temp_db() -> (Database, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("test.redb")).unwrap();
    (db, dir)
}
