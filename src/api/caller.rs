//! Caller identity, as established by the authentication layer in front of
//! this service.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::checkout::CheckoutError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user making the request. Rejects with 401 when the
/// header is absent or blank; wrap in `Option` where guests are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = CheckoutError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CurrentUser(id.to_string()))
            .ok_or(CheckoutError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CurrentUser, CheckoutError> {
        let (mut parts, _) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_user_id_read_from_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, " user-42 ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap(), CurrentUser("user-42".to_string()));
    }

    #[tokio::test]
    async fn test_missing_or_blank_header_is_unauthenticated() {
        let missing = Request::builder().body(()).unwrap();
        assert!(matches!(
            extract(missing).await.unwrap_err(),
            CheckoutError::Unauthenticated
        ));

        let blank = Request::builder().header(USER_ID_HEADER, "  ").body(()).unwrap();
        assert!(matches!(
            extract(blank).await.unwrap_err(),
            CheckoutError::Unauthenticated
        ));
    }
}
