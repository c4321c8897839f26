// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Investment ledger values.
//!
//! An [`Investment`] can only be built from a positive token count and a
//! positive, finite amount, so a recorded investment never decreases an
//! investor's holdings.

use super::database::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("tokens amount and investment amount are required")]
    MissingAmount,

    #[error("tokens amount and investment amount must not be negative")]
    NegativeAmount,

    #[error("tokens amount must be a whole number")]
    FractionalTokens,

    #[error("accumulated holdings exceed the representable range")]
    Overflow,

    #[error("asset is not open for investment")]
    NotActive,
}

/// A validated investment delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Investment {
    tokens: u64,
    amount: f64,
}

impl Investment {
    /// Validate raw request values. Zero counts as missing.
    pub fn new(tokens: i64, amount: f64) -> Result<Self, LedgerError> {
        if tokens < 0 || amount < 0.0 {
            return Err(LedgerError::NegativeAmount);
        }
        if tokens == 0 || amount == 0.0 || !amount.is_finite() {
            return Err(LedgerError::MissingAmount);
        }
        Ok(Self {
            tokens: tokens as u64,
            amount,
        })
    }

    /// Validate request values where the token count arrived as a JSON
    /// number or numeric string. The count must be whole.
    pub fn from_request(tokens: f64, amount: f64) -> Result<Self, LedgerError> {
        if tokens < 0.0 || amount < 0.0 {
            return Err(LedgerError::NegativeAmount);
        }
        if !tokens.is_finite() {
            return Err(LedgerError::MissingAmount);
        }
        if tokens.fract() != 0.0 {
            return Err(LedgerError::FractionalTokens);
        }
        if tokens > i64::MAX as f64 {
            return Err(LedgerError::Overflow);
        }
        Self::new(tokens as i64, amount)
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_values() {
        let investment = Investment::new(5, 50_000.0).unwrap();
        assert_eq!(investment.tokens(), 5);
        assert_eq!(investment.amount(), 50_000.0);
    }

    #[test]
    fn zero_is_treated_as_missing() {
        assert!(matches!(Investment::new(0, 10.0), Err(LedgerError::MissingAmount)));
        assert!(matches!(Investment::new(3, 0.0), Err(LedgerError::MissingAmount)));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(Investment::new(-1, 10.0), Err(LedgerError::NegativeAmount)));
        assert!(matches!(Investment::new(1, -10.0), Err(LedgerError::NegativeAmount)));
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        assert!(Investment::new(1, f64::NAN).is_err());
        assert!(Investment::new(1, f64::INFINITY).is_err());
    }

    #[test]
    fn request_values_must_be_whole_token_counts() {
        let investment = Investment::from_request(5.0, 50_000.0).unwrap();
        assert_eq!(investment.tokens(), 5);

        assert!(matches!(
            Investment::from_request(2.5, 10.0),
            Err(LedgerError::FractionalTokens)
        ));
        assert!(matches!(
            Investment::from_request(0.0, 10.0),
            Err(LedgerError::MissingAmount)
        ));
        assert!(matches!(
            Investment::from_request(-3.0, 10.0),
            Err(LedgerError::NegativeAmount)
        ));
        assert!(matches!(
            Investment::from_request(1e30, 10.0),
            Err(LedgerError::Overflow)
        ));
    }
}
