//! Caller identity extractor
//!
//! The upstream auth gateway authenticates the diner and forwards the
//! identity in headers. This server never authenticates on its own.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::utils::validation::{MAX_ROLE_LEN, MAX_USER_ID_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Authenticated user id header
pub const USER_ID_HEADER: &str = "x-user-id";

/// Role header (`operator` for staff actions)
pub const USER_ROLE_HEADER: &str = "x-user-role";

const OPERATOR_ROLE: &str = "operator";

/// Caller as forwarded by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: Option<String>,
}

impl AuthenticatedUser {
    pub fn is_operator(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(OPERATOR_ROLE))
    }

    /// 403 unless the caller is an operator
    pub fn require_operator(&self) -> AppResult<()> {
        if self.is_operator() {
            return Ok(());
        }
        tracing::warn!(user_id = %self.user_id, "Operator action denied");
        Err(AppError::permission_denied("Operator role required"))
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "Missing caller identity");
                AppError::not_authenticated()
            })?;
        validate_required_text(user_id, USER_ID_HEADER, MAX_USER_ID_LEN)?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_ROLE_LEN)
            .map(str::to_string);

        Ok(Self {
            user_id: user_id.to_string(),
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, StatusCode};

    async fn extract(req: Request<()>) -> Result<AuthenticatedUser, AppError> {
        let (mut parts, _) = req.into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let err = extract(Request::builder().body(()).unwrap()).await.unwrap_err();
        assert_eq!(err.http_status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_and_role() {
        let user = extract(
            Request::builder()
                .header(USER_ID_HEADER, "alice")
                .header(USER_ROLE_HEADER, "Operator")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(user.user_id, "alice");
        assert!(user.is_operator());
        assert!(user.require_operator().is_ok());
    }

    #[tokio::test]
    async fn test_diner_is_not_operator() {
        let user = extract(
            Request::builder()
                .header(USER_ID_HEADER, "bob")
                .body(())
                .unwrap(),
        )
        .await
        .unwrap();
        let err = user.require_operator().unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
    }
}
