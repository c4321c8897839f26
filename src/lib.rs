// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RWABridge - Tokenized Real-World Asset Service
//!
//! REST backend for registering users, listing tokenizable real-world
//! assets, recording investments and simulating on-chain tokenization.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer tokens, password hashing and role capabilities
//! - `config` - Environment configuration
//! - `simulation` - Mock chain transactions, balances and contracts
//! - `storage` - Embedded document store (redb), query engine and ledger

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod simulation;
pub mod state;
pub mod storage;
