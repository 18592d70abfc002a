// ============================
// authgate-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Scrypt block size (r); fixed, only the work factor rotates
const SCRYPT_R: u32 = 8;

/// Scrypt parallelism (p)
const SCRYPT_P: u32 = 1;

/// Derived key length in bytes
const SCRYPT_KEY_LEN: usize = 32;

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

/// Hash a password using scrypt with the given work factor (log2 of N).
///
/// The cost is read from configuration at each call site, so rotating it
/// affects the next hash without touching already-stored ones: the PHC
/// string embeds the parameters it was produced with.
pub fn hash_password(plain: &str, cost_factor: u8) -> anyhow::Result<String> {
    let params = Params::new(cost_factor, SCRYPT_R, SCRYPT_P, SCRYPT_KEY_LEN)?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored PHC hash string.
///
/// Parameters are taken from the hash itself; the comparison is constant
/// time inside the scrypt crate.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.len() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}

/// Hash a password and zeroize the plaintext buffer.
pub fn hash_password_secure(plain: &mut String, cost_factor: u8) -> anyhow::Result<String> {
    let hash = hash_password(plain, cost_factor);
    plain.zeroize();
    hash
}
