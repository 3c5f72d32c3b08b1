use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::role::Role;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// login email
    pub sub: String,
    /// display name derived from the email
    pub name: String,
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

/// Part of the email before `@`, used as a greeting name.
pub fn display_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

pub fn generate_access_token(
    email: &str,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let claims = Claims {
        sub: email.to_string(),
        name: display_name(email).to_string(),
        role: role.id(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
