//! Client identification utilities
//!
//! The HTTP gateway and the gRPC server expose request headers through
//! different types. [`HeaderReader`] abstracts over both so the metadata
//! extraction and the auth guard are written once.

use std::net::SocketAddr;

/// Read-only access to request headers (names are lowercase)
pub trait HeaderReader {
    fn header(&self, name: &str) -> Option<&str>;
}

impl HeaderReader for http::HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl HeaderReader for tonic::metadata::MetadataMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

pub const AUTHORIZATION: &str = "authorization";
pub const GATEWAY_USER_AGENT: &str = "grpcgateway-user-agent";
pub const USER_AGENT: &str = "user-agent";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Per-request metadata shared by every handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub authorization: Option<String>,
    pub user_agent: String,
    pub client_ip: String,
}

impl RequestMeta {
    pub fn extract(headers: &impl HeaderReader, peer: Option<SocketAddr>) -> Self {
        Self {
            authorization: headers
                .header(AUTHORIZATION)
                .map(str::to_string),
            user_agent: extract_user_agent(headers),
            client_ip: extract_client_ip(headers, peer),
        }
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }
}

/// `grpcgateway-user-agent` first, then `user-agent`
pub fn extract_user_agent(headers: &impl HeaderReader) -> String {
    [GATEWAY_USER_AGENT, USER_AGENT]
        .into_iter()
        .filter_map(|name| headers.header(name))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to the peer address.
pub fn extract_client_ip(headers: &impl HeaderReader, peer: Option<SocketAddr>) -> String {
    if let Some(first) = headers
        .header(X_FORWARDED_FOR)
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }
    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};
    use tonic::metadata::{MetadataMap, MetadataValue};

    fn peer() -> Option<SocketAddr> {
        Some("10.1.2.3:5000".parse().unwrap())
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        assert_eq!(extract_client_ip(&headers, peer()), "192.168.1.1");
    }

    #[test]
    fn test_extract_client_ip_peer() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers, peer()), "10.1.2.3");
        assert_eq!(extract_client_ip(&headers, None), "");
    }

    #[test]
    fn test_gateway_user_agent_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8"));
        assert_eq!(extract_user_agent(&headers), "curl/8");

        headers.insert(GATEWAY_USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        assert_eq!(extract_user_agent(&headers), "Mozilla/5.0");
    }

    #[test]
    fn test_request_meta_from_grpc_metadata() {
        let mut metadata = MetadataMap::new();
        metadata.insert(AUTHORIZATION, MetadataValue::from_static("Bearer abc"));
        metadata.insert(USER_AGENT, MetadataValue::from_static("grpc-rust/0.14"));

        let meta = RequestMeta::extract(&metadata, peer());
        assert_eq!(meta.authorization(), Some("Bearer abc"));
        assert_eq!(meta.user_agent, "grpc-rust/0.14");
        assert_eq!(meta.client_ip, "10.1.2.3");
    }
}
