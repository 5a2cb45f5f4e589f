//! Password protection for SplitBill users
//!
//! Passwords are stored as a base64 SHA-256 digest of a random salt
//! followed by the password bytes. The salt is stored next to the hash.

pub mod password;
mod validator;

pub use password::{generate_salt, hash_password, verify_hash};
pub use validator::{PasswordValidator, PasswordValidation, PasswordRule};
