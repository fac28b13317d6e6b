//! Common API types and helpers

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Plain `302 Found` redirect. The browser form flows expect a
/// literal 302 rather than axum's 303 See Other.
pub fn found(location: impl AsRef<str>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.as_ref().to_string())],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_is_302() {
        let response = found("/events/spring-fest?success=1");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/events/spring-fest?success=1"
        );
    }
}
