// ABOUTME: Password hashing for admin accounts using Argon2
// ABOUTME: Still verifies legacy unsalted SHA-256 hex digests and generates one-off passwords

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

const SALT_SIZE: usize = 16;
const GENERATED_PASSWORD_BYTES: usize = 12;

pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    let salt_string =
        SaltString::encode_b64(&salt).map_err(|_| anyhow!("Failed to encode salt"))?;
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|_| anyhow!("Failed to hash password"))?;

    Ok(password_hash.to_string())
}

fn legacy_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.chars().all(|c| c.is_ascii_hexdigit())
}

/// Checks a password against an Argon2 PHC string or a legacy SHA-256 hex digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_legacy_digest(stored) {
        return legacy_digest(password).eq_ignore_ascii_case(stored);
    }

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// True when the stored hash predates Argon2 and should be replaced.
pub fn needs_rehash(stored: &str) -> bool {
    is_legacy_digest(stored)
}

/// A 16-character URL-safe random password.
pub fn generate_password() -> String {
    let mut bytes = [0u8; GENERATED_PASSWORD_BYTES];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_round_trip() {
        let hash = hash_password("MediCaps$Secure").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("MediCaps$Secure", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!needs_rehash(&hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_legacy_sha256_digest_verifies() {
        // sha256("admin123")
        let legacy = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";
        assert!(verify_password("admin123", legacy));
        assert!(!verify_password("admin124", legacy));
        assert!(needs_rehash(legacy));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), 16);
        assert!(password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
