// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::simulation::Simulator;
use crate::storage::Database;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Embedded document store
    pub db: Arc<Database>,
    /// Bearer token signing and verification keys
    pub tokens: Arc<TokenKeys>,
    /// Mock chain generator
    pub simulator: Arc<Simulator>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenKeys, simulator: Simulator) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            simulator: Arc::new(simulator),
        }
    }

    /// Build the state described by `config` around an opened database.
    pub fn from_config(config: &Config, db: Database) -> Self {
        Self::new(
            db,
            TokenKeys::from_config(&config.jwt),
            Simulator::new(config.simulated_latency),
        )
    }
}

/// State over a fresh temporary database with simulated latency disabled.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    let (db, dir) = crate::storage::database::temp_db();
    let config = Config {
        simulated_latency: false,
        ..Config::default()
    };
    (AppState::from_config(&config, db), dir)
}
