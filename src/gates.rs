//! Request gates, expressed as axum extractors.
//!
//! A route declares its gate chain in its handler signature: `BearerAuth`
//! for an identity-provider token, `SessionAuth` for the session cookie, and
//! `OwnerEmail<G>` to additionally require that the `email` query parameter
//! names the caller authenticated by gate `G`.

use std::marker::PhantomData;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts, Query};
use http::header::AUTHORIZATION;
use http::request::Parts;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::Identity;
use crate::providers::{BEARER, SESSION};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Gates that end in an authenticated identity.
pub trait Authenticated {
    fn identity(&self) -> &Identity;
}

/// Caller verified from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerAuth(pub Identity);

/// Caller verified from the session cookie.
#[derive(Debug, Clone)]
pub struct SessionAuth(pub Identity);

impl Authenticated for BearerAuth {
    fn identity(&self) -> &Identity {
        &self.0
    }
}

impl Authenticated for SessionAuth {
    fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Query string of the owner-scoped list routes.
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// The `email` query parameter, checked against the identity from gate `G`.
#[derive(Debug, Clone)]
pub struct OwnerEmail<G> {
    pub email: String,
    gate: PhantomData<G>,
}

/// Retrieves the client IP (for logging purposes).
fn client_ip(parts: &Parts) -> String {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Splits `Bearer <token>`; anything else yields `None`.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }
    Some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, HTTPError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                debug!("Missing or malformed bearer Authorization header");
                HTTPError::unauthorized()
            })?;

        state
            .auth
            .authenticate(BEARER, token, &client_ip(parts))
            .await
            .map(BearerAuth)
            .ok_or_else(HTTPError::unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, HTTPError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(state.session.cookie_name())
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                debug!("Session cookie missing");
                HTTPError::unauthorized()
            })?;

        state
            .auth
            .authenticate(SESSION, &token, &client_ip(parts))
            .await
            .map(SessionAuth)
            .ok_or_else(HTTPError::unauthorized)
    }
}

#[async_trait]
impl<G> FromRequestParts<AppState> for OwnerEmail<G>
where
    G: FromRequestParts<AppState, Rejection = HTTPError> + Authenticated + Send,
{
    type Rejection = HTTPError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, HTTPError> {
        let gate = G::from_request_parts(parts, state).await?;

        let Query(query) =
            Query::<EmailQuery>::try_from_uri(&parts.uri).map_err(|_| HTTPError::forbidden())?;

        match query.email {
            Some(email) if gate.identity().owns(&email) => Ok(OwnerEmail {
                email,
                gate: PhantomData,
            }),
            requested => {
                warn!(
                    "Email mismatch: token for {:?} asked for {:?}",
                    gate.identity().email,
                    requested
                );
                Err(HTTPError::forbidden())
            }
        }
    }
}
