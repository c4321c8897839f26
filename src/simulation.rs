// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Mock Chain Simulation
//!
//! Generates transaction, balance, tokenization and history payloads that
//! look like Solana activity. Nothing here touches storage; a generated
//! contract address is only persisted if the client later calls the
//! tokenization status endpoint with it.
//!
//! Each call sleeps first to imitate network latency.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Per-token network fee in SOL.
pub const FEE_PER_TOKEN: f64 = 0.000005;

const TRANSACTION_DELAY: Duration = Duration::from_millis(1500);
const BALANCE_DELAY: Duration = Duration::from_millis(1500);
const TOKENIZATION_DELAY: Duration = Duration::from_millis(2000);
const HISTORY_DELAY: Duration = Duration::from_millis(1500);

const TRANSACTION_HASH_PREFIX: &str = "sol_";
const CONTRACT_PREFIX: &str = "sol";

/// Simulated on-chain transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedTransaction {
    pub id: String,
    pub asset_id: String,
    pub user_id: String,
    pub token_amount: f64,
    pub transaction_type: String,
    pub transaction_hash: String,
    /// Always `completed`
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Fee in SOL, six decimals
    pub fee: String,
}

/// Simulated wallet balance. Amounts are decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WalletBalance {
    pub sol: String,
    pub usdc: String,
}

/// Simulated tokenization outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationResult {
    pub asset_id: String,
    pub contract_address: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub transaction_hash: String,
}

/// Random base36 string of `len` characters.
pub fn base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

pub fn format_fee(token_amount: f64) -> String {
    format!("{:.6}", FEE_PER_TOKEN * token_amount)
}

/// Mock chain generator.
#[derive(Debug, Clone)]
pub struct Simulator {
    latency: bool,
}

impl Simulator {
    /// `latency = false` skips the artificial delays (tests, local dev).
    pub fn new(latency: bool) -> Self {
        Self { latency }
    }

    async fn delay(&self, duration: Duration) {
        if self.latency {
            tokio::time::sleep(duration).await;
        }
    }

    fn transaction_record(
        user_id: &str,
        asset_id: String,
        token_amount: f64,
        transaction_type: String,
        hash_len: usize,
        timestamp: DateTime<Utc>,
    ) -> SimulatedTransaction {
        SimulatedTransaction {
            id: base36(8),
            asset_id,
            user_id: user_id.to_string(),
            token_amount,
            transaction_type,
            transaction_hash: format!("{TRANSACTION_HASH_PREFIX}{}", base36(hash_len)),
            status: "completed".to_string(),
            timestamp,
            fee: format_fee(token_amount),
        }
    }

    /// Simulate a buy or sell of asset tokens.
    pub async fn transaction(
        &self,
        user_id: &str,
        asset_id: String,
        token_amount: f64,
        transaction_type: String,
    ) -> SimulatedTransaction {
        self.delay(TRANSACTION_DELAY).await;
        let tx = Self::transaction_record(
            user_id,
            asset_id,
            token_amount,
            transaction_type,
            26,
            Utc::now(),
        );
        tracing::debug!(tx_id = %tx.id, hash = %tx.transaction_hash, "simulated transaction");
        tx
    }

    /// Simulate a SOL/USDC wallet balance.
    pub async fn wallet_balance(&self) -> WalletBalance {
        self.delay(BALANCE_DELAY).await;
        let mut rng = rand::thread_rng();
        WalletBalance {
            sol: format!("{:.4}", rng.gen_range(0.0..10.0)),
            usdc: format!("{:.2}", rng.gen_range(0.0..1000.0)),
        }
    }

    /// Simulate deploying a token contract for an asset.
    pub async fn tokenize(&self, asset_id: String) -> TokenizationResult {
        self.delay(TOKENIZATION_DELAY).await;
        let result = TokenizationResult {
            asset_id,
            contract_address: format!("{CONTRACT_PREFIX}{}", base36(26)),
            status: "completed".to_string(),
            timestamp: Utc::now(),
            transaction_hash: format!("{TRANSACTION_HASH_PREFIX}{}", base36(13)),
        };
        tracing::debug!(
            asset_id = %result.asset_id,
            contract = %result.contract_address,
            "simulated tokenization"
        );
        result
    }

    /// Simulate 1 to 10 past transactions, newest first.
    pub async fn history(&self, user_id: &str) -> Vec<SimulatedTransaction> {
        self.delay(HISTORY_DELAY).await;
        let mut rng = rand::thread_rng();
        let now = Utc::now();
        let count = rng.gen_range(1..=10);

        let mut transactions: Vec<SimulatedTransaction> = (0..count)
            .map(|_| {
                let transaction_type = if rng.gen_bool(0.5) { "buy" } else { "sell" };
                let token_amount = (rng.gen_range(0.0..100.0_f64) * 100.0).round() / 100.0;
                let days_ago = rng.gen_range(0..30);
                Self::transaction_record(
                    user_id,
                    base36(8),
                    token_amount,
                    transaction_type.to_string(),
                    13,
                    now - chrono::Duration::days(days_ago),
                )
            })
            .collect();

        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base36(s: &str) -> bool {
        s.bytes().all(|b| BASE36.contains(&b))
    }

    #[test]
    fn base36_has_requested_length_and_alphabet() {
        let value = base36(26);
        assert_eq!(value.len(), 26);
        assert!(is_base36(&value));
    }

    #[test]
    fn fee_is_fixed_rate_with_six_decimals() {
        assert_eq!(format_fee(10.0), "0.000050");
        assert_eq!(format_fee(1000.0), "0.005000");
    }

    #[tokio::test]
    async fn transaction_has_expected_shape() {
        let tx = Simulator::new(false)
            .transaction("user-1", "asset-1".into(), 10.0, "buy".into())
            .await;

        assert_eq!(tx.status, "completed");
        assert_eq!(tx.fee, "0.000050");
        assert_eq!(tx.id.len(), 8);
        let hash = tx.transaction_hash.strip_prefix("sol_").unwrap();
        assert_eq!(hash.len(), 26);
        assert!(is_base36(hash));
    }

    #[tokio::test]
    async fn balance_is_within_range() {
        let balance = Simulator::new(false).wallet_balance().await;
        let sol: f64 = balance.sol.parse().unwrap();
        let usdc: f64 = balance.usdc.parse().unwrap();
        assert!((0.0..=10.0).contains(&sol));
        assert!((0.0..=1000.0).contains(&usdc));
        assert_eq!(balance.sol.split('.').nth(1).map(str::len), Some(4));
        assert_eq!(balance.usdc.split('.').nth(1).map(str::len), Some(2));
    }

    #[tokio::test]
    async fn tokenization_returns_contract_address() {
        let result = Simulator::new(false).tokenize("asset-9".into()).await;
        assert_eq!(result.asset_id, "asset-9");
        assert_eq!(result.status, "completed");
        assert!(result.contract_address.starts_with("sol"));
        assert_eq!(result.contract_address.len(), 29);
    }

    #[tokio::test]
    async fn history_is_bounded_and_sorted_newest_first() {
        let history = Simulator::new(false).history("user-1").await;
        assert!((1..=10).contains(&history.len()));
        assert!(history
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp));
        assert!(history
            .iter()
            .all(|tx| tx.transaction_type == "buy" || tx.transaction_type == "sell"));
        assert!(history.iter().all(|tx| tx.user_id == "user-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_the_call() {
        let started = tokio::time::Instant::now();
        Simulator::new(true).tokenize("asset-1".into()).await;
        assert!(started.elapsed() >= TOKENIZATION_DELAY);
    }
}
