//! Mock admin API shared by the integration tests.
//!
//! The mock answers unauthenticated requests with a digest challenge and
//! only serves requests whose `Authorization` header carries a correct
//! digest response for the test credentials.

#![allow(dead_code)]

use std::collections::HashMap;

use md5::{Digest, Md5};
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const PUBLIC_KEY: &str = "test-public";
pub const PRIVATE_KEY: &str = "test-private";
pub const REALM: &str = "MMS Public API";
pub const NONCE: &str = "b6f1a0c2d3e4f5a6b7c8d9e0f1a2b3c4";
pub const CHALLENGE: &str = r#"Digest realm="MMS Public API", domain="", nonce="b6f1a0c2d3e4f5a6b7c8d9e0f1a2b3c4", algorithm=MD5, qop="auth", stale=false"#;

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Matches requests carrying a valid digest response for the test keys.
pub struct ValidDigest;

impl wiremock::Match for ValidDigest {
    fn matches(&self, request: &Request) -> bool {
        let Some(header) = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
        else {
            return false;
        };
        let Some(params) = header.strip_prefix("Digest ") else {
            return false;
        };

        let params: HashMap<&str, &str> = params
            .split(", ")
            .filter_map(|part| part.split_once('='))
            .map(|(k, v)| (k, v.trim_matches('"')))
            .collect();

        let (Some(uri), Some(nc), Some(cnonce), Some(response)) = (
            params.get("uri"),
            params.get("nc"),
            params.get("cnonce"),
            params.get("response"),
        ) else {
            return false;
        };

        let ha1 = md5_hex(&format!("{PUBLIC_KEY}:{REALM}:{PRIVATE_KEY}"));
        let ha2 = md5_hex(&format!("{}:{uri}", request.method.as_str()));
        let expected = md5_hex(&format!("{ha1}:{NONCE}:{nc}:{cnonce}:auth:{ha2}"));

        params.get("username") == Some(&PUBLIC_KEY)
            && *uri == request.url.path()
            && *response == expected
    }
}

pub async fn server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(401).insert_header("WWW-Authenticate", CHALLENGE))
        .with_priority(10)
        .mount(&server)
        .await;

    server
}

pub async fn mount_projects(server: &MockServer, projects: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/atlas/v1.0/groups"))
        .and(ValidDigest)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": [],
            "results": projects,
            "totalCount": 1,
        })))
        .with_priority(1)
        .mount(server)
        .await;
}

/// API root on the mock server.
pub fn base_url(server: &MockServer) -> String {
    format!("{}/api/atlas/v1.0", server.uri())
}
