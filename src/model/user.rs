use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: u64,
    pub email: String,
    /// argon2 PHC string
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@company.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}
