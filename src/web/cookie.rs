//! The `taco_session` cookie.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap,
    },
};

use crate::session::SessionId;

pub const SESSION_COOKIE: &str = "taco_session";

/// The session id sent by the client, if any parses.
///
/// Never rejects: a missing, malformed, or unknown id just means the handler
/// starts a new session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionCookie(pub Option<SessionId>);

impl<S: Send + Sync> FromRequestParts<S> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_id(&parts.headers)))
    }
}

fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

/// `Set-Cookie` header that binds the browser to `id`.
pub fn set_session(id: SessionId) -> [(axum::http::HeaderName, String); 1] {
    [(
        SET_COOKIE,
        format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"),
    )]
}

/// `Set-Cookie` header that removes the session cookie.
pub fn clear_session() -> [(axum::http::HeaderName, String); 1] {
    [(
        SET_COOKIE,
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    )]
}
