use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue};

/// Connection-scoped headers. The HTTP stack re-derives these on every hop,
/// so they are never copied between inbound, upstream and outbound messages.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Ordered merge: every value in `base`, then each override replaces all
/// values of the same name (names compare case-insensitively).
pub fn merge_headers<I>(base: &HeaderMap, overrides: I) -> HeaderMap
where
    I: IntoIterator<Item = (HeaderName, HeaderValue)>,
{
    let mut merged = base.clone();
    for (name, value) in overrides {
        merged.insert(name, value);
    }
    merged
}

/// Inbound headers safe to replay against the upstream host.
/// `host` and `content-length` are dropped: the client sets both for the new request.
pub fn upstream_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        if is_hop_by_hop(name) || name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Upstream response headers to relay to the caller. Hop-by-hop headers are
/// always dropped; `content-length` and `content-encoding` only when the body
/// is re-serialized (`body_rewritten`).
pub fn relay_response_headers(upstream: &HeaderMap, body_rewritten: bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        let describes_old_body =
            name == header::CONTENT_LENGTH || name == header::CONTENT_ENCODING;
        if is_hop_by_hop(name) || (body_rewritten && describes_old_body) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
