//! Anti-forgery protection for cookie-based sessions
//!
//! Double-submit scheme: login sets a readable `csrf` cookie next to the
//! HTTP-only session cookie, and state-changing requests authenticated via
//! the cookie must echo it in the `x-csrf-token` header. Bearer-token
//! requests are not cookie-bound and are exempt, as are the external
//! provider callback paths.

use axum::{
    extract::Request,
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, CSRF_COOKIE, CSRF_HEADER, SESSION_COOKIE};
use crate::error::ApiError;

pub async fn csrf_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    check(request.method(), request.headers(), request.uri().path())?;
    Ok(next.run(request).await)
}

fn check(method: &Method, headers: &HeaderMap, path: &str) -> Result<(), ApiError> {
    // Reads never mutate state
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(());
    }

    // Provider callbacks carry their own state parameter instead
    if path.starts_with("/signin-") {
        return Ok(());
    }

    // Bearer-authenticated clients are not riding the cookie jar
    if headers.contains_key(header::AUTHORIZATION) {
        return Ok(());
    }

    // Only cookie sessions need the token; anonymous requests fail
    // authentication on their own
    if auth::cookie_value(headers, SESSION_COOKIE).is_none() {
        return Ok(());
    }

    let cookie_token = auth::cookie_value(headers, CSRF_COOKIE);
    let header_token = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());

    match (cookie_token.as_deref(), header_token) {
        (Some(cookie), Some(header)) if !cookie.is_empty() && cookie == header => Ok(()),
        _ => Err(ApiError::forbidden("Anti-forgery token missing or invalid")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn reads_are_exempt() {
        let h = headers(&[("cookie", "session=tok")]);
        assert!(check(&Method::GET, &h, "/api/shifts").is_ok());
    }

    #[test]
    fn bearer_requests_are_exempt() {
        let h = headers(&[("authorization", "Bearer tok")]);
        assert!(check(&Method::POST, &h, "/api/shifts").is_ok());
    }

    #[test]
    fn cookie_session_without_token_is_forbidden() {
        let h = headers(&[("cookie", "session=tok; csrf=abc")]);
        let err = check(&Method::POST, &h, "/api/shifts").unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn mismatched_token_is_forbidden() {
        let h = headers(&[("cookie", "session=tok; csrf=abc"), ("x-csrf-token", "xyz")]);
        assert!(check(&Method::POST, &h, "/api/shifts").is_err());
    }

    #[test]
    fn matching_token_passes() {
        let h = headers(&[("cookie", "session=tok; csrf=abc"), ("x-csrf-token", "abc")]);
        assert!(check(&Method::POST, &h, "/api/shifts").is_ok());
    }

    #[test]
    fn provider_callbacks_are_exempt() {
        let h = headers(&[("cookie", "session=tok")]);
        assert!(check(&Method::POST, &h, "/signin-google").is_ok());
    }
}
