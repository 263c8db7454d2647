//! Security helpers (password hashing, registration password policy)

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::error::Result;

/// Hash a password with Argon2 using a freshly generated salt.
/// Output is a PHC string suitable for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored PHC hash string.
/// A mismatch is `Ok(false)`; only malformed hashes are errors.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Registration password policy: at least 8 characters, at least one letter,
/// one digit and one special character, drawn only from letters, digits
/// and `@$!%*?&`.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
