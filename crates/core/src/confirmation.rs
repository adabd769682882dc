//! Confirmation codes emailed at signup and exchanged for an access token.
//!
//! Codes are short random alphanumeric strings. Only their SHA-256 hash is
//! stored, so a database leak does not expose codes that are still valid.

use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::types::Timestamp;

/// Number of characters in a confirmation code.
pub const CONFIRMATION_CODE_LEN: usize = 6;

/// Generate a fresh random confirmation code.
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CONFIRMATION_CODE_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 hex digest of a confirmation code.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether `code` matches a stored hash. Compares in constant time.
pub fn verify_code(code: &str, stored_hash: &str) -> bool {
    hash_code(code).as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Whether a code issued at `issued_at` has outlived `ttl_mins` at `now`.
pub fn is_expired(issued_at: Timestamp, ttl_mins: i64, now: Timestamp) -> bool {
    now - issued_at > chrono::Duration::minutes(ttl_mins)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn generated_codes_have_fixed_length_and_charset() {
        let code = generate_code();
        assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_codes_differ() {
        // 62^6 possibilities; a collision here would point at a broken RNG.
        assert_ne!(generate_code(), generate_code());
    }

    #[test]
    fn hash_is_stable_hex() {
        let hash = hash_code("Ab3dE9");
        assert_eq!(hash, hash_code("Ab3dE9"));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn verify_matches_only_the_original_code() {
        let hash = hash_code("Ab3dE9");
        assert!(verify_code("Ab3dE9", &hash));
        assert!(!verify_code("ab3de9", &hash));
        assert!(!verify_code("", &hash));
    }

    #[test]
    fn verify_rejects_truncated_hash() {
        let hash = hash_code("Ab3dE9");
        assert!(!verify_code("Ab3dE9", &hash[..32]));
        assert!(!verify_code("Ab3dE9", ""));
    }

    #[test]
    fn expiry_boundary() {
        let issued = Utc::now();
        assert!(!is_expired(issued, 60, issued + chrono::Duration::minutes(60)));
        assert!(is_expired(issued, 60, issued + chrono::Duration::minutes(61)));
    }
}
