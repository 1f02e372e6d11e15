use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::response::Response;
use serde_json::Value;
use url::Url;

use crate::errors::AppError;
use crate::proxy::body::InboundBody;
use crate::proxy::filter::{self, FilterResult};
use crate::proxy::headers::{merge_headers, relay_response_headers, upstream_request_headers};
use crate::proxy::transform;
use crate::AppState;

/// Prefix every forwarded path must carry.
pub const API_PREFIX: &str = "/v1/";

/// The handler for every non-preflight request.
#[tracing::instrument(skip(state, req), fields(method = %req.method(), path = %req.uri().path()))]
pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();
    let body = InboundBody::new(body);

    // -- 1. Target URL --
    // Dot segments (`..`, `%2e%2e`) are resolved here, before the gate sees the path.
    let target = transform::rewrite_url(&state.config.upstream_url, &parts.uri)?;

    // -- 2. Path gate --
    if !target.path().starts_with(API_PREFIX) {
        tracing::debug!(normalized = %target.path(), "path outside {}, rejecting", API_PREFIX);
        return Err(AppError::NotFound);
    }

    // -- 3. Dispatch --
    if parts.method == Method::POST && target.path() == state.config.image_generation_path {
        return image_generation(&state, &parts.headers, body, target).await;
    }

    passthrough(&state, parts.method, &parts.headers, body, target).await
}

/// Forward as-is: same method, headers (minus hop-by-hop), body.
async fn passthrough(
    state: &AppState,
    method: Method,
    inbound_headers: &HeaderMap,
    body: InboundBody,
    target: Url,
) -> Result<Response, AppError> {
    tracing::debug!(upstream = %target, "forwarding request unchanged");

    let payload = body.read(state.config.max_body_bytes).await?;
    let payload = (!payload.is_empty()).then_some(payload);

    let upstream_resp = state
        .upstream_client
        .forward(method, target, upstream_request_headers(inbound_headers), payload)
        .await?;

    let status = upstream_resp.status();
    let mut resp_headers = relay_response_headers(upstream_resp.headers(), false);
    if state.config.passthrough_cors {
        resp_headers = merge_headers(
            &resp_headers,
            [(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(crate::proxy::cors::ALLOW_ORIGIN),
            )],
        );
    }
    tracing::debug!(status = status.as_u16(), "upstream responded");

    let mut response = Response::new(Body::from_stream(upstream_resp.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = resp_headers;
    Ok(response)
}

/// Image generation: strip parameters the upstream rejects, then relay the
/// JSON answer with CORS headers attached.
async fn image_generation(
    state: &AppState,
    inbound_headers: &HeaderMap,
    body: InboundBody,
    target: Url,
) -> Result<Response, AppError> {
    let content_type = inbound_headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.contains("application/json") {
        tracing::debug!(content_type, "rejecting non-JSON image generation request");
        return Err(AppError::UnsupportedContentType);
    }

    let raw = body.read(state.config.max_body_bytes).await?;
    let original: Value = serde_json::from_slice(&raw)?;
    if original.is_null() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Cannot read properties of null (request body is null)"
        )));
    }

    let FilterResult {
        body: filtered,
        dropped,
    } = filter::filter_params(&original, state.config.image_params.as_slice());
    if !dropped.is_empty() {
        tracing::debug!(?dropped, "dropping unsupported image generation parameters");
    }

    // Only these two headers go upstream on this path.
    let mut upstream_headers = HeaderMap::new();
    upstream_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    // A missing Authorization is omitted rather than sent as the literal "null".
    if let Some(auth) = inbound_headers.get(header::AUTHORIZATION) {
        upstream_headers.insert(header::AUTHORIZATION, auth.clone());
    }

    let payload = serde_json::to_vec(&Value::Object(filtered))?;
    let upstream_resp = state
        .upstream_client
        .forward(Method::POST, target, upstream_headers, Some(payload.into()))
        .await?;

    let status = upstream_resp.status();
    let resp_headers = upstream_resp.headers().clone();
    let resp_body = upstream_resp
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(format!("upstream body read failed: {}", e)))?;
    tracing::debug!(status = status.as_u16(), "upstream responded");

    let data: Value = serde_json::from_slice(&resp_body)?;
    let out = serde_json::to_vec(&data)?;

    let overrides: [(HeaderName, HeaderValue); 2] = [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(crate::proxy::cors::ALLOW_ORIGIN),
        ),
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ),
    ];
    let headers = merge_headers(&relay_response_headers(&resp_headers, true), overrides);

    let mut response = Response::new(Body::from(out));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
