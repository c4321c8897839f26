// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Salted one-way credential hashing (PBKDF2-HMAC-SHA256).
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt base64>$<hash base64>`.

use std::num::NonZeroU32;

use base64ct::{Base64, Encoding};
use ring::{
    digest, pbkdf2,
    rand::{SecureRandom, SystemRandom},
};

use super::AuthError;

const SCHEME: &str = "pbkdf2-sha256";
const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;
static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| AuthError::InternalError("salt generation failed".to_string()))?;

    let iterations = NonZeroU32::new(ITERATIONS)
        .ok_or_else(|| AuthError::InternalError("invalid iteration count".to_string()))?;
    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(ALGORITHM, iterations, &salt, password.as_bytes(), &mut hash);

    Ok(format!(
        "{SCHEME}${ITERATIONS}${}${}",
        Base64::encode_string(&salt),
        Base64::encode_string(&hash)
    ))
}

/// Constant-time check of a plaintext password against a stored hash.
///
/// Unparseable stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Some(iterations) = iterations.parse().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (Base64::decode_vec(salt), Base64::decode_vec(hash)) else {
        return false;
    };

    pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &hash).is_ok()
}
