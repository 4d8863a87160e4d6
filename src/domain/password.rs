//! Credential hashing.
//!
//! Two schemes are supported. SHA-256 produces an unsalted, reproducible
//! base64 digest; Argon2 produces a salted PHC string. New digests use the
//! configured scheme, verification detects the scheme from the stored value.

use std::str::FromStr;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

use crate::config::ARGON2_DIGEST_PREFIX;
use crate::errors::{AppError, AppResult};

/// Algorithm used for newly hashed credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    Sha256,
    Argon2,
}

impl FromStr for HashScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashScheme::Sha256),
            "argon2" => Ok(HashScheme::Argon2),
            other => Err(format!("unknown password scheme '{}'", other)),
        }
    }
}

impl HashScheme {
    /// Infer the scheme a stored digest was produced with.
    pub fn of_digest(digest: &str) -> Self {
        if digest.starts_with(ARGON2_DIGEST_PREFIX) {
            HashScheme::Argon2
        } else {
            HashScheme::Sha256
        }
    }
}

/// One-way password hasher.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    scheme: HashScheme,
}

impl CredentialHasher {
    pub fn new(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    /// Hash a plaintext password with the configured scheme.
    pub fn hash(&self, plain_text: &str) -> AppResult<String> {
        match self.scheme {
            HashScheme::Sha256 => Ok(sha256_digest(plain_text)),
            HashScheme::Argon2 => argon2_digest(plain_text),
        }
    }

    /// Check a plaintext password against a stored digest of either scheme.
    pub fn verify(&self, plain_text: &str, digest: &str) -> bool {
        match HashScheme::of_digest(digest) {
            HashScheme::Sha256 => constant_time_eq(sha256_digest(plain_text).as_bytes(), digest.as_bytes()),
            HashScheme::Argon2 => match PasswordHash::new(digest) {
                Ok(parsed) => Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    tracing::warn!("Stored password digest is malformed: {}", e);
                    false
                }
            },
        }
    }
}

/// SHA-256 of the UTF-8 bytes, standard base64.
pub fn sha256_digest(plain_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain_text.as_bytes());
    general_purpose::STANDARD.encode(hasher.finalize())
}

fn argon2_digest(plain_text: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
    Ok(hash.to_string())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_is_deterministic() {
        let hasher = CredentialHasher::new(HashScheme::Sha256);

        let first = hasher.hash("Pass123!").unwrap();
        let second = hasher.hash("Pass123!").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 44);
        assert_ne!(first, "Pass123!");
    }

    #[test]
    fn test_sha256_distinguishes_inputs() {
        assert_ne!(sha256_digest("Pass123!"), sha256_digest("Pass124!"));
    }

    #[test]
    fn test_sha256_known_vector() {
        // echo -n "abc" | sha256sum | xxd -r -p | base64
        assert_eq!(
            sha256_digest("abc"),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_argon2_salts_each_hash() {
        let hasher = CredentialHasher::new(HashScheme::Argon2);

        let first = hasher.hash("SamePassword123").unwrap();
        let second = hasher.hash("SamePassword123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("SamePassword123", &first));
        assert!(hasher.verify("SamePassword123", &second));
        assert!(!hasher.verify("OtherPassword123", &first));
    }

    #[test]
    fn test_verify_detects_scheme() {
        let argon = CredentialHasher::new(HashScheme::Argon2);
        let legacy = sha256_digest("Pass123!");

        assert_eq!(HashScheme::of_digest(&legacy), HashScheme::Sha256);
        assert!(argon.verify("Pass123!", &legacy));
        assert!(!argon.verify("wrong", &legacy));
    }

    #[test]
    fn test_malformed_argon2_digest_fails_closed() {
        let hasher = CredentialHasher::new(HashScheme::Argon2);
        assert!(!hasher.verify("anything", "$argon2id$garbage"));
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("SHA256".parse::<HashScheme>().unwrap(), HashScheme::Sha256);
        assert_eq!("argon2".parse::<HashScheme>().unwrap(), HashScheme::Argon2);
        assert!("md5".parse::<HashScheme>().is_err());
    }
}
