pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod payroll;

use chrono::{Local, NaiveDate};
use tracing::error;

use crate::error::ApiError;

/// Maps a read failure to the generic fetch error, logging the cause.
pub(crate) fn fetch_failed(what: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
    move |e| {
        error!(error = %e, what, "Failed to fetch");
        ApiError::Fetch
    }
}

/// Maps a write failure to an internal error, logging the cause.
pub(crate) fn write_failed(what: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
    move |e| {
        error!(error = %e, what, "Failed to write");
        ApiError::Internal
    }
}

pub(crate) fn wall_clock_today() -> NaiveDate {
    Local::now().date_naive()
}
