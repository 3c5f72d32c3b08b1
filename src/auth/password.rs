use argon2::{
    Argon2,
    password_hash::{Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use once_cell::sync::Lazy;

/// Checked in place of a stored hash when the login email is unknown.
static UNKNOWN_USER_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("unknown-user-placeholder").ok());

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), Error> {
    let parsed = PasswordHash::new(hashed)?;

    Argon2::default().verify_password(password.as_bytes(), &parsed)
}

/// Spends the same argon2 work as a real check and always fails.
pub fn verify_unknown_user(password: &str) -> Result<(), Error> {
    match UNKNOWN_USER_HASH.as_deref() {
        Some(hashed) => verify_password(password, hashed).and(Err(Error::Password)),
        None => Err(Error::Password),
    }
}
