#![allow(clippy::unwrap_used)]

use super::request_executor::build_url;
use super::*;

#[test]
fn test_build_url() {
    let base_url = "https://generativelanguage.googleapis.com";

    let url1 = build_url(base_url, "v1beta", "gemini-2.5-flash", "generateContent", None).unwrap();
    assert_eq!(
        url1,
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
    );

    let url2 =
        build_url(base_url, "v1beta", "models/gemini-2.5-pro", "streamGenerateContent", Some("alt=sse"))
            .unwrap();
    assert_eq!(
        url2,
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:streamGenerateContent?alt=sse"
    );
}

#[test]
fn test_build_url_encodes_model_as_one_segment() {
    let base_url = "https://generativelanguage.googleapis.com";

    let url = build_url(base_url, "v1beta", "../files/x?alt=json#frag", "generateContent", None).unwrap();
    assert_eq!(
        url,
        "https://generativelanguage.googleapis.com/v1beta/models/..%2Ffiles%2Fx%3Falt=json%23frag:generateContent"
    );

    let parsed = url::Url::parse(&url).unwrap();
    assert_eq!(parsed.query(), None);
    assert_eq!(parsed.fragment(), None);
    assert_eq!(parsed.path_segments().unwrap().count(), 3);
}

#[test]
fn test_build_url_keeps_base_path_prefix() {
    let url = build_url("http://proxy.local/gemini", "v1beta", "m", "generateContent", Some("alt=sse")).unwrap();
    assert_eq!(url, "http://proxy.local/gemini/v1beta/models/m:generateContent?alt=sse");
}

#[test]
fn test_build_url_rejects_unparseable_base() {
    let err = build_url("not a url", "v1beta", "m", "generateContent", None).unwrap_err();
    assert!(matches!(err, GatewayError::Internal { .. }));
}

#[test]
fn test_build_headers_carries_key_out_of_url() {
    let headers = build_headers("AIzaKey").unwrap_or_default();
    assert_eq!(headers.get(API_KEY_HEADER).map(|v| v.is_sensitive()), Some(true));
    assert_eq!(headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()), Some("AIzaKey"));
    assert!(build_headers("bad\nkey").is_err());
}

#[test]
fn test_new_normalizes_base_url() {
    let client = UpstreamClient::new(Client::new(), "http://localhost:9999/", "/v1beta/");
    assert_eq!(
        client.model_url("m", "generateContent", None).unwrap(),
        "http://localhost:9999/v1beta/models/m:generateContent"
    );
}

#[test]
fn test_from_config_uses_configured_endpoint() {
    let config = GatewayConfig {
        upstream_base_url: "http://127.0.0.1:1".to_string(),
        ..GatewayConfig::default()
    };
    let client = match UpstreamClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => panic!("client build failed: {}", e),
    };
    assert!(client.model_url("m", "x", None).unwrap().starts_with("http://127.0.0.1:1/v1beta/"));
}
