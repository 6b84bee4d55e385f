//! Cryptographic utilities for session token generation and hashing.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Number of random bytes in a session token.
const TOKEN_BYTES: usize = 32;

/// Prefix identifying bank-operations session tokens.
pub const TOKEN_PREFIX: &str = "bos_";

/// Computes SHA-256 hash of the input and returns it as a hex string.
///
/// Session tokens are stored hashed; only this digest ever reaches the
/// database.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new opaque session token.
///
/// Format: `bos_` followed by 32 random bytes, base64url-encoded without
/// padding (43 characters).
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(bytes))
}

/// Extracts the loggable prefix from a session token (first 8 characters
/// after `bos_`).
///
/// Returns `None` when the value does not look like a session token. The
/// prefix is safe to log; the full token is not.
pub fn token_prefix(token: &str) -> Option<&str> {
    if token.starts_with(TOKEN_PREFIX) && token.len() >= TOKEN_PREFIX.len() + 8 {
        Some(&token[TOKEN_PREFIX.len()..TOKEN_PREFIX.len() + 8])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
    }

    #[test]
    fn test_sha256_hex_different_inputs() {
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }

    #[test]
    fn test_generate_session_token_format() {
        let token = generate_session_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        // 4 prefix chars + 43 base64url chars for 32 bytes
        assert_eq!(token.len(), 47);
    }

    #[test]
    fn test_generate_session_token_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(token_prefix("bos_abcdefgh12345"), Some("abcdefgh"));
        assert_eq!(token_prefix("bos_short"), None);
        assert_eq!(token_prefix("invalid_token"), None);
        assert_eq!(token_prefix(""), None);
    }

    #[test]
    fn test_token_prefix_of_generated_token() {
        let token = generate_session_token();
        let prefix = token_prefix(&token).unwrap();
        assert_eq!(prefix.len(), 8);
        assert!(token.contains(prefix));
    }
}
