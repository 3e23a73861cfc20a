//! Guard Middleware
//!
//! Runs the probe filter in front of every routed handler.

use axum::Json;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_caller;
use platform::store::DurableStore;
use std::sync::Arc;

use crate::application::probe::ProbeFilter;
use crate::domain::value_objects::{AdmissionDecision, EndpointClass, RejectionKind, Verdict};
use crate::presentation::dto::ErrorBody;

/// Middleware state
#[derive(Clone)]
pub struct GateState<S>
where
    S: DurableStore + Clone + Send + Sync + 'static,
{
    pub probe: Arc<ProbeFilter<S>>,
}

/// Middleware that evaluates the probe filter before every handler
///
/// Rejections short-circuit with 403 (probe) or 429 (throttle) and the
/// JSON error body. Allowed requests proceed and carry the rate-limit
/// metadata headers on the response.
pub async fn guard<S>(
    axum::extract::State(state): axum::extract::State<GateState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: DurableStore + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let caller = extract_caller(headers, direct_ip);

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|s| s.to_string());

    let method = req.method();
    let class = if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
        EndpointClass::Api
    } else {
        EndpointClass::Mutation
    };

    let verdict = state
        .probe
        .evaluate(&path, user_agent.as_deref(), query.as_deref(), &caller, class)
        .await;

    match verdict {
        Verdict::Reject { kind, admission } => rejection_response(kind, admission.as_ref()),
        Verdict::Pass { admission } => {
            let mut response = next.run(req).await;
            if let Some(decision) = admission {
                append_rate_limit_headers(response.headers_mut(), &decision);
            }
            response
        }
    }
}

/// Build the HTTP response for a rejection
fn rejection_response(kind: RejectionKind, admission: Option<&AdmissionDecision>) -> Response {
    match kind {
        RejectionKind::Throttled => {
            let mut response =
                (StatusCode::TOO_MANY_REQUESTS, Json(ErrorBody::throttled())).into_response();

            if let Some(decision) = admission {
                let headers = response.headers_mut();
                append_rate_limit_headers(headers, decision);
                if let Some(secs) = decision.retry_after_secs {
                    insert_header(headers, header::RETRY_AFTER, &secs.to_string());
                }
            }

            response
        }
        _ => (StatusCode::FORBIDDEN, Json(ErrorBody::forbidden())).into_response(),
    }
}

/// Attach X-RateLimit-* metadata, allow or deny alike
fn append_rate_limit_headers(headers: &mut HeaderMap, decision: &AdmissionDecision) {
    insert_header(headers, "x-ratelimit-limit", &decision.limit.to_string());
    insert_header(
        headers,
        "x-ratelimit-remaining",
        &decision.remaining.to_string(),
    );
    insert_header(
        headers,
        "x-ratelimit-reset",
        &decision.reset_at_secs().to_string(),
    );
}

fn insert_header(
    headers: &mut HeaderMap,
    name: impl axum::http::header::IntoHeaderName,
    value: &str,
) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}
