use std::str::FromStr;

use axum::response::Response;

use pharmacy_core::DomainError;

use crate::app::errors;

/// Parse a numeric path id, answering 400 `invalid_id` otherwise.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}

/// Unwrap an extractor result, answering 400 on a malformed request.
pub fn extracted<T, E: std::fmt::Display>(result: Result<T, E>) -> Result<T, Response> {
    result.map_err(errors::bad_request)
}
