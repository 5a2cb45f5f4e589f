//! Salted password hashing
//!
//! The digest is SHA-256 over the decoded salt bytes followed by the UTF-8
//! password bytes. Salt and digest are stored base64-encoded.
//!
//! Surrounding whitespace on a stored salt or digest is ignored, so values
//! written by line-wrapping base64 encoders (with a trailing newline) still
//! verify.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use crate::error::{SplitError, Result};
use crate::SALT_LENGTH;

/// Generate a random salt, base64-encoded
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rng().fill(&mut salt);
    STANDARD.encode(salt)
}

/// Hash a password with a base64-encoded salt
///
/// # Example
/// ```
/// use splitcore::crypto::password::{generate_salt, hash_password};
///
/// let salt = generate_salt();
/// let hash = hash_password("Secret123", &salt).unwrap();
/// assert_eq!(hash, hash_password("Secret123", &salt).unwrap());
/// ```
pub fn hash_password(password: &str, salt: &str) -> Result<String> {
    let salt_bytes = STANDARD
        .decode(salt.trim())
        .map_err(|e| SplitError::InvalidOperation(format!("Invalid password salt: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&salt_bytes);
    hasher.update(password.as_bytes());
    Ok(STANDARD.encode(hasher.finalize()))
}

/// Check a password against a stored salt and hash
pub fn verify_hash(password: &str, salt: &str, hash: &str) -> Result<bool> {
    let computed = hash_password(password, salt)?;
    Ok(computed.as_bytes().ct_eq(hash.trim().as_bytes()).into())
}
