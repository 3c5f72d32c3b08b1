use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::model::problem::Problem;

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Missing required fields")]
    Validation { missing: Vec<String> },
    #[display(fmt = "{}", _0)]
    BadRequest(String),
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),
    #[display(fmt = "{}", _0)]
    Unauthorized(String),
    #[display(fmt = "{}", _0)]
    Forbidden(&'static str),
    #[display(fmt = "Failed to fetch data")]
    Fetch,
    #[display(fmt = "Something went wrong, Contact with system admin")]
    Internal,
}

impl ApiError {
    /// Missing fields win; any other problem becomes a plain bad request.
    pub fn from_problems(problems: &[Problem]) -> Self {
        let missing: Vec<String> = problems
            .iter()
            .filter_map(Problem::missing_field)
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            let reasons: Vec<String> = problems.iter().map(ToString::to_string).collect();
            ApiError::BadRequest(reasons.join(", "))
        } else {
            ApiError::Validation { missing }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Fetch | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation { missing } => json!({
                "message": self.to_string(),
                "missing": missing,
            }),
            _ => json!({ "message": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
