//! Anonymous visitor sessions
//!
//! Each visitor is identified by a UUID carried in the `quotes_session`
//! cookie. The key is the vote-uniqueness discriminant and the handle for the
//! visitor's last-shown quote.

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{db, ApiError, AppState};

/// Cookie carrying the session key
pub const SESSION_COOKIE: &str = "quotes_session";

/// Session key of the current request, inserted by [`session_middleware`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(pub String);

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ensure every request carries a session
///
/// Reuses the key from the cookie when it is a well-formed UUID, otherwise
/// issues a new one and sets the cookie on the response.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (key, is_new) = match session_key_from_headers(request.headers()) {
        Some(key) => (key, false),
        None => {
            let key = Uuid::new_v4().to_string();
            debug!("Issuing new session {}", key);
            (key, true)
        }
    };

    db::sessions::touch_session(&state.db, &key).await?;

    request.extensions_mut().insert(SessionKey(key.clone()));
    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, key);
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::Internal(format!("Invalid session cookie: {}", e)))?;
        response.headers_mut().append(SET_COOKIE, value);
    }

    Ok(response)
}

/// Extract a valid session key from the request's Cookie headers
///
/// The first `quotes_session` value that parses as a UUID wins; malformed
/// duplicates are skipped.
pub fn session_key_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|uuid| uuid.to_string())
}
