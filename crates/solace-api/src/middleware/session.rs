use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "solace_session";

/// Session id of the caller, inserted into request extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Session cookie middleware.
///
/// Reads the `solace_session` cookie, or mints a fresh id when it is
/// missing or malformed, and (re)sets the cookie on the response so its
/// lifetime follows the session's idle timeout.
pub async fn session_cookie(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let id = session_from_cookies(req.headers()).unwrap_or_else(|| {
        let id = Uuid::new_v4();
        tracing::debug!(session_id = %id, "minted session id");
        id
    });

    req.extensions_mut().insert(SessionId(id));
    let mut response = next.run(req).await;

    match HeaderValue::from_str(&set_cookie_value(id, state.session_ttl.as_secs())) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::warn!(error = %e, "could not encode session cookie"),
    }

    response
}

pub fn session_from_cookies(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim_matches('"')).ok())
}

fn set_cookie_value(id: Uuid, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let id = Uuid::new_v4();
        let map = headers(&[&format!("theme=dark; {SESSION_COOKIE}={id}; lang=ko")]);
        assert_eq!(session_from_cookies(&map), Some(id));
    }

    #[test]
    fn reads_across_multiple_cookie_headers() {
        let id = Uuid::new_v4();
        let map = headers(&["theme=dark", &format!("{SESSION_COOKIE}={id}")]);
        assert_eq!(session_from_cookies(&map), Some(id));
    }

    #[test]
    fn malformed_or_missing_is_none() {
        assert_eq!(session_from_cookies(&headers(&[])), None);
        assert_eq!(
            session_from_cookies(&headers(&[&format!("{SESSION_COOKIE}=not-a-uuid")])),
            None
        );
        assert_eq!(session_from_cookies(&headers(&["other=1"])), None);
    }

    #[test]
    fn cookie_attributes() {
        let value = set_cookie_value(Uuid::nil(), 600);
        assert_eq!(
            value,
            "solace_session=00000000-0000-0000-0000-000000000000; Path=/; Max-Age=600; HttpOnly; SameSite=Lax"
        );
    }
}
