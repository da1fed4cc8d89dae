//! HTTP middleware.
//!
//! Layer order (outermost first): host validation, transport security,
//! CSRF origin checks.

mod csrf;
mod hosts;
mod security;

use axum::http::{header, HeaderMap, Uri};

use crate::config::SecurityPolicy;

pub use csrf::csrf_origin_middleware;
pub use hosts::allowed_host_middleware;
pub use security::security_middleware;

/// Host the client asked for, honouring `X-Forwarded-Host` behind the proxy.
pub fn request_host(headers: &HeaderMap, policy: &SecurityPolicy) -> Option<String> {
    let forwarded = policy
        .use_forwarded_host
        .then(|| headers.get("X-Forwarded-Host"))
        .flatten()
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|h| !h.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
        })
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

/// Whether the request reached the proxy over HTTPS.
pub fn is_secure(uri: &Uri, headers: &HeaderMap, policy: &SecurityPolicy) -> bool {
    if uri.scheme_str() == Some("https") {
        return true;
    }
    policy.trust_forwarded_proto
        && headers
            .get("X-Forwarded-Proto")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_host_wins() {
        let policy = SecurityPolicy::for_mode(false);
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:10000"));
        assert_eq!(request_host(&headers, &policy).as_deref(), Some("internal:10000"));

        headers.insert("x-forwarded-host", HeaderValue::from_static("example.com, proxy"));
        assert_eq!(request_host(&headers, &policy).as_deref(), Some("example.com"));
    }

    #[test]
    fn test_forwarded_proto_marks_secure() {
        let policy = SecurityPolicy::for_mode(false);
        let uri: Uri = "/en/".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert!(!is_secure(&uri, &headers, &policy));

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert!(is_secure(&uri, &headers, &policy));
    }
}
