//! Request extractors shared by the route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated caller's account id.
///
/// Authentication itself happens in the fronting proxy; this service only
/// consumes the resolved identity and enforces authorization on top of it.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the authenticated caller, extracted from [`USER_ID_HEADER`].
///
/// Operations that need a caller fail fast with 401 when the header is
/// missing or not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("missing x-user-id header".into()))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("malformed x-user-id header".into()))?;

        let user_id = Uuid::parse_str(value)
            .map_err(|_| AppError::Unauthorized("x-user-id is not a valid UUID".into()))?;

        Ok(CallerIdentity(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(value: Option<&str>) -> Result<CallerIdentity, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        CallerIdentity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_valid_uuid() {
        let id = Uuid::new_v4();
        let caller = extract(Some(&id.to_string())).await.unwrap();
        assert_eq!(caller.0, id);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn garbage_header_is_unauthorized() {
        let err = extract(Some("not-a-uuid")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
