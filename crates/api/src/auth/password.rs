//! Password hashing and verification using Argon2id

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString},
    Argon2,
};
use rand::{rngs::OsRng, TryRngCore};

use super::AuthError;

fn random_salt() -> Result<SaltString, AuthError> {
    let mut bytes = [0u8; Salt::RECOMMENDED_LENGTH];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::HashingFailure(format!("entropy source failed: {e}")))?;

    SaltString::encode_b64(&bytes)
        .map_err(|e| AuthError::HashingFailure(format!("failed to encode salt: {e}")))
}

/// Hash a password using Argon2id
///
/// Returns the PHC-formatted hash string that carries the salt and parameters.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = random_salt()?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingFailure(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash
///
/// A mismatch is `Ok(false)`. Only a malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::HashingFailure(format!("invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::HashingFailure(format!(
            "password verification failed: {e}"
        ))),
    }
}

/// Hash of a random password nobody knows
///
/// Login verifies against this when the email is unknown so that both
/// failure paths cost one Argon2 verification.
pub fn generate_decoy_hash() -> Result<String, AuthError> {
    let mut secret = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut secret)
        .map_err(|e| AuthError::HashingFailure(format!("entropy source failed: {e}")))?;

    hash_password(&hex::encode(secret))
}
