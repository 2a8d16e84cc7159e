//! Web interface: router, handlers and HTML templates

pub mod admin_users;
pub mod customers;
pub mod dashboard;
pub mod licenses;
pub mod login;
pub mod products;
pub mod server;
pub mod templates;

pub use server::run_server;

use crate::error::{Error, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::CustomerNotFound(_)
            | Error::ProductNotFound(_)
            | Error::LicenseNotFound(_)
            | Error::UserNotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateUsername(_)
            | Error::DuplicateCustomerNumber(_)
            | Error::InvalidField { .. } => StatusCode::BAD_REQUEST,
            _ => {
                tracing::error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Empty form fields mean "no value"
pub(crate) fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional ISO date form field
pub(crate) fn parse_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<NaiveDate>()
        .map(Some)
        .map_err(|_| Error::InvalidField {
            field,
            value: value.to_string(),
        })
}

/// Parse an optional numeric form field
pub(crate) fn parse_u32(field: &'static str, value: &str) -> Result<Option<u32>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| Error::InvalidField {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none("".to_string()), None);
        assert_eq!(blank_to_none("   ".to_string()), None);
        assert_eq!(blank_to_none(" x ".to_string()), Some("x".to_string()));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("start_date", "").unwrap(), None);
        assert_eq!(
            parse_date("start_date", "2026-08-05").unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap())
        );
        assert!(parse_date("start_date", "yesterday").is_err());
    }

    #[test]
    fn test_parse_u32() {
        assert_eq!(parse_u32("seats", "").unwrap(), None);
        assert_eq!(parse_u32("seats", "25").unwrap(), Some(25));
        assert!(parse_u32("seats", "many").is_err());
    }
}
