//! CORS header assembly
//!
//! Headers are built by hand from a [`CorsProfile`] rather than through a
//! middleware layer: preflight and success responses use different
//! policies, and the success policy pairs a wildcard origin with
//! credentials, which `tower_http::cors` refuses to emit.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::config::CorsProfile;

/// Build the CORS headers for a response to a request from `request_origin`
pub fn cors_headers(profile: &CorsProfile, request_origin: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        ACCESS_CONTROL_ALLOW_ORIGIN,
        profile.origin_for(request_origin),
    );
    insert(&mut headers, ACCESS_CONTROL_ALLOW_METHODS, &profile.allow_methods);
    insert(&mut headers, ACCESS_CONTROL_ALLOW_HEADERS, &profile.allow_headers);
    if let Some(max_age) = profile.max_age {
        insert(&mut headers, ACCESS_CONTROL_MAX_AGE, &max_age.to_string());
    }
    if profile.allow_credentials {
        insert(&mut headers, ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
    }
    headers
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => warn!(header = %name, value, "invalid CORS header value, skipping"),
    }
}
