use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::runner::{RunOutcome, Runner};
use crate::server::cors::cors_headers;
use crate::server::error::ApiError;

/// Body of a successful run
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub output: String,
    pub error: String,
}

impl From<&RunOutcome> for RunResponse {
    fn from(outcome: &RunOutcome) -> Self {
        Self {
            output: outcome.output(),
            error: outcome.error(),
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "javarun"
    }))
}

/// The run endpoint. `OPTIONS` answers the CORS preflight; every other
/// method compiles and runs the code in the body.
#[instrument(skip_all, fields(%method))]
pub async fn run_endpoint(
    State(runner): State<Runner>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let cors = &runner.config().cors;
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if method == Method::OPTIONS {
        return (StatusCode::OK, cors_headers(&cors.preflight, origin)).into_response();
    }

    match run(&runner, &body).await {
        Ok(outcome) => (
            StatusCode::OK,
            cors_headers(&cors.response, origin),
            Json(RunResponse::from(&outcome)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn run(runner: &Runner, body: &[u8]) -> Result<RunOutcome, ApiError> {
    let code = extract_code(body)?;
    Ok(runner.run(&code).await?)
}

/// Pull the code out of a request body.
///
/// The body is parsed as JSON and `code` read from it; a body that isn't
/// JSON at all, or is JSON `null`, is taken as the code itself. An empty
/// body counts as `{}`.
pub fn extract_code(body: &[u8]) -> Result<String, ApiError> {
    let text = String::from_utf8_lossy(body);
    if text.is_empty() {
        return Ok(String::new());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Null) => {
            warn!("body is JSON null, treating body as code");
            Ok(text.into_owned())
        }
        Ok(value) => {
            debug!(body = %value, "parsed body");
            code_from_json(&value)
        }
        Err(e) => {
            warn!(error = %e, "JSON parsing failed, treating body as code");
            Ok(text.into_owned())
        }
    }
}

fn code_from_json(value: &Value) -> Result<String, ApiError> {
    match value.get("code") {
        Some(Value::String(code)) => Ok(code.clone()),
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(String::new()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(String::new()),
        Some(_) => Err(ApiError::InvalidCode("code must be a string".to_owned())),
    }
}
