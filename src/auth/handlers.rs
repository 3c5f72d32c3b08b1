use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::{
        jwt::{display_name, generate_access_token},
        password::{verify_password, verify_unknown_user},
    },
    config::Config,
    db,
    error::ApiError,
    model::{role::Role, user::LoginRequest},
};

pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Serialize, ToSchema)]
pub struct LoginUser {
    #[schema(example = "admin")]
    pub name: String,
    #[schema(example = "admin@company.com")]
    pub email: String,
    #[schema(value_type = String, example = "Admin")]
    pub role: Role,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: &'static str,
    #[schema(example = 900)]
    pub expires_in: usize,
    pub user: LoginUser,
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Shape checks applied before any credential lookup.
pub fn check_login_format(req: &LoginRequest) -> Result<(), ApiError> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::BadRequest(
            "Please enter a valid email address".into(),
        ));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

/// Login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Malformed email or short password", body = Object, example = json!({
            "message": "Please enter a valid email address"
        })),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, user), fields(email = %user.email))]
pub async fn login(
    user: web::Json<LoginRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    check_login_format(&user)?;

    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    let db_user = db::find_user_by_email(pool.get_ref(), &user.email)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error while fetching user");
            ApiError::Internal
        })?;

    let Some(db_user) = db_user else {
        let _ = verify_unknown_user(&user.password);
        info!("Invalid credentials: user not found");
        return Err(invalid());
    };

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(invalid());
    }

    let role = Role::from_id(db_user.role_id).ok_or_else(|| {
        error!(user_id = db_user.id, role_id = db_user.role_id, "Unknown role on user");
        ApiError::Internal
    })?;

    debug!(user_id = db_user.id, "Generating access token");

    let (access_token, _) =
        generate_access_token(&db_user.email, role, &config.jwt_secret, config.access_token_ttl)
            .map_err(|e| {
                error!(error = %e, "Failed to sign access token");
                ApiError::Internal
            })?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: config.access_token_ttl,
        user: LoginUser {
            name: display_name(&db_user.email).to_string(),
            email: db_user.email.clone(),
            role,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("asha@company.com"));
        assert!(is_valid_email("a.b@mail.co.in"));
        assert!(!is_valid_email("asha@company"));
        assert!(!is_valid_email("asha company@x.com"));
        assert!(!is_valid_email("@company.com"));
        assert!(!is_valid_email("asha@.com"));
        assert!(!is_valid_email("asha@company."));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn password_must_have_four_characters() {
        assert!(check_login_format(&request("a@b.co", "abcd")).is_ok());
        let err = check_login_format(&request("a@b.co", "abc")).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 4 characters long");
    }

    #[test]
    fn email_is_checked_first() {
        let err = check_login_format(&request("nope", "")).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");
    }
}
