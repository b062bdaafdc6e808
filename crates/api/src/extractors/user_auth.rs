//! Caller identity extractors.
//!
//! The identity provider issues the bearer token; this service only verifies
//! it. Browsers cannot set headers on a WebSocket upgrade, so the token is
//! also accepted from the `access_token` query parameter.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, Uri},
};
use domain::DomainError;
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAuth {
    pub user_id: Uuid,
    /// Display name from the token, if the provider sent one.
    pub name: Option<String>,
}

impl UserAuth {
    pub fn from_token(jwt: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt.validate_token(token)?;
        let user_id = extract_user_id(&claims)?;
        Ok(Self {
            user_id,
            name: claims.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn query_token(uri: &Uri) -> Option<&str> {
    uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == ACCESS_TOKEN_PARAM && !value.is_empty()).then_some(value)
    })
}

/// Header first, then query string.
pub fn request_token<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    bearer_token(headers).or_else(|| query_token(uri))
}

/// Resolves the caller from a request, reusing what `require_user_auth`
/// already stored when it ran.
pub fn authenticate(parts: &Parts, jwt: &JwtConfig) -> Result<UserAuth, ApiError> {
    if let Some(auth) = parts.extensions.get::<UserAuth>() {
        return Ok(auth.clone());
    }

    let token = request_token(&parts.headers, &parts.uri)
        .ok_or(DomainError::NotAuthenticated)?;

    UserAuth::from_token(jwt, token).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    })
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, &state.jwt)
    }
}

/// Caller identity for routes that also serve anonymous visitors. An invalid
/// token is treated the same as no token.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUserAuth(authenticate(parts, &state.jwt).ok()))
    }
}
