use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::{auth::jwt::Claims, error::ApiError, model::role::Role};

/// The caller, as established by `auth_middleware`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = Role::from_id(claims.role)
            .ok_or_else(|| ApiError::Unauthorized("Invalid role".into()))?;

        Ok(AuthUser {
            email: claims.sub,
            name: claims.name,
            role,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("Missing token".into())),
        )
    }
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> Result<(), ApiError> {
        if matches!(self.role, Role::Admin | Role::Hr) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("HR/Admin only"))
        }
    }
}
