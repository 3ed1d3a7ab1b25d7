use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Path of the run endpoint
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_path(),
        }
    }
}

/// The two CORS header sets the endpoint sends.
///
/// Preflight and success responses deliberately use different policies;
/// error responses carry no CORS headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Headers for `OPTIONS` responses
    #[serde(default = "CorsProfile::preflight")]
    pub preflight: CorsProfile,

    /// Headers for successful run responses
    #[serde(default = "CorsProfile::response")]
    pub response: CorsProfile,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            preflight: CorsProfile::preflight(),
            response: CorsProfile::response(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsProfile {
    /// Reflect the request's `Origin` header back
    #[serde(default)]
    pub echo_origin: bool,

    /// Origin sent when not echoing, or when the request has no `Origin`
    #[serde(default = "wildcard")]
    pub allow_origin: String,

    pub allow_methods: String,

    pub allow_headers: String,

    /// `Access-Control-Max-Age` in seconds
    #[serde(default)]
    pub max_age: Option<u64>,

    /// Send `Access-Control-Allow-Credentials: true`
    #[serde(default)]
    pub allow_credentials: bool,
}

impl CorsProfile {
    pub fn preflight() -> Self {
        Self {
            echo_origin: true,
            allow_origin: wildcard(),
            allow_methods: "GET, POST, OPTIONS".to_owned(),
            allow_headers: "Content-Type".to_owned(),
            max_age: Some(86400),
            allow_credentials: false,
        }
    }

    pub fn response() -> Self {
        Self {
            echo_origin: false,
            allow_origin: wildcard(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_owned(),
            allow_headers: "Content-Type, Accept, Authorization, X-Requested-With".to_owned(),
            max_age: None,
            allow_credentials: true,
        }
    }

    /// Origin value to send for a request carrying `request_origin`
    pub fn origin_for<'a>(&'a self, request_origin: Option<&'a str>) -> &'a str {
        match request_origin {
            Some(origin) if self.echo_origin && !origin.is_empty() => origin,
            _ => &self.allow_origin,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_path() -> String {
    "/".to_owned()
}

fn wildcard() -> String {
    "*".to_owned()
}
