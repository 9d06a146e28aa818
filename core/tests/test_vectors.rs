//! Verify `build_request` against JSON test vectors stored in `test-vectors/`.
//!
//! Each case gives a builder configuration and either the expected request
//! or the expected configuration error message. Bodies are compared as
//! parsed JSON so field ordering does not matter.

use simple_http_client::{ClientError, HttpMethod, SimpleHttpClient};

fn parse_method(s: &str) -> HttpMethod {
    s.parse().unwrap_or_else(|_| panic!("unknown method: {s}"))
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

#[test]
fn build_test_vectors() {
    let raw = include_str!("../../test-vectors/build.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = case["method"].as_str().unwrap();
        let url = case["url"].as_str().unwrap();

        let mut client = match case.get("payload") {
            Some(payload) => SimpleHttpClient::with_body(method, url, payload),
            None => SimpleHttpClient::new(method, url),
        };
        if let Some(headers) = case.get("headers") {
            for (key, value) in string_pairs(headers) {
                client = client.set_header(key, value);
            }
        }

        let result = client.build_request();

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert!(matches!(err, ClientError::Configuration(_)), "{name}: expected configuration error");
            assert_eq!(err.to_string(), expected_error.as_str().unwrap(), "{name}: message");
            continue;
        }

        let req = result.unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, expected_req["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");

        if case.get("payload").is_some() {
            let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(body, expected_req["body"], "{name}: body");
        } else {
            assert!(req.body.is_none(), "{name}: body should be None");
        }
    }
}
