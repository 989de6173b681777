use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;

/// `scheme://host` the client addressed, used to build absolute file URLs.
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy sets it, otherwise
/// `http`. The host comes from the `Host` header, falling back to the request
/// URI authority.
#[derive(Debug, Clone)]
pub struct RequestOrigin(pub String);

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .ok_or_else(|| AppError::Validation("Missing Host header".into()))?;

        Ok(RequestOrigin(format!("{scheme}://{host}")))
    }
}
