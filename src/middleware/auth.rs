//! Bearer token verification.
//!
//! Tokens are issued by the external identity provider and signed with the
//! shared HS256 secret; this service only verifies them and scopes every query
//! to the `sub` claim.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::header,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
    }

    /// Mint a token for `user_id`. Used by the seed binary and tests.
    pub fn issue(&self, user_id: &str, ttl: Duration) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }
}

/// The authenticated shop owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let claims = JwtKeys::from_ref(state).verify(token)?;
        if claims.sub.is_empty() {
            return Err(AppError::Unauthorized("Token has no subject".into()));
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(header_value: Option<&str>) -> axum::http::request::Parts {
        let mut builder = Request::builder().uri("/api/shops");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[tokio::test]
    async fn accepts_token_signed_with_shared_secret() {
        let keys = JwtKeys::new("test-secret");
        let token = keys.issue("user_1", Duration::hours(1)).expect("token");
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let user = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .expect("authenticated");
        assert_eq!(user.user_id, "user_1");
    }

    #[tokio::test]
    async fn rejects_missing_and_foreign_tokens() {
        let keys = JwtKeys::new("test-secret");

        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let foreign = JwtKeys::new("other-secret")
            .issue("user_1", Duration::hours(1))
            .expect("token");
        let mut parts = parts_with(Some(&format!("Bearer {foreign}")));
        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let keys = JwtKeys::new("test-secret");
        let token = keys.issue("user_1", Duration::hours(-2)).expect("token");
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
