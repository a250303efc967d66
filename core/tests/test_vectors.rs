//! Verify build methods and the password engine against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use social_core::{validate_password, ApiClient, HttpMethod, HttpRequest, QueryParams, QueryValue};

const BASE_URL: &str = "http://localhost:3000";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_query(value: &serde_json::Value) -> Option<QueryParams> {
    let pairs = value.as_array()?;
    let mut params = QueryParams::new();
    for pair in pairs {
        let key = pair[0].as_str().unwrap();
        let value = match &pair[1] {
            serde_json::Value::String(s) => QueryValue::from(s.as_str()),
            serde_json::Value::Bool(b) => QueryValue::from(*b),
            serde_json::Value::Number(n) => QueryValue::Int(n.as_i64().unwrap()),
            other => panic!("unsupported query value: {other}"),
        };
        params.set(key, value);
    }
    Some(params)
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["url"].as_str().unwrap()), "{name}: url");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    if expected["body"].is_null() {
        assert!(req.body.is_none(), "{name}: body should be None");
    } else {
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, expected["body"], "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// URL joining
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    let raw = include_str!("../../test-vectors/urls.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let client = ApiClient::new(case["base_url"].as_str().unwrap()).unwrap();
        let url = client.build_url(case["path"].as_str().unwrap());
        assert_eq!(url, case["expected_url"].as_str().unwrap(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = ApiClient::new(BASE_URL).unwrap();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let path = case["path"].as_str().unwrap();
        let body = case.get("body").filter(|b| !b.is_null());

        let req = match case["op"].as_str().unwrap() {
            "fetch" => c.build_fetch(path, parse_query(&case["query"]).as_ref()),
            "submit" => c.build_submit(path, body).unwrap(),
            "replace" => c.build_replace(path, body).unwrap(),
            "remove" => c.build_remove(path),
            other => panic!("{name}: unknown op: {other}"),
        };
        assert_request(name, &req, &case["expected_request"]);
    }
}

// ---------------------------------------------------------------------------
// Password validation
// ---------------------------------------------------------------------------

#[test]
fn password_test_vectors() {
    let raw = include_str!("../../test-vectors/password.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let candidate = case["candidate"].as_str().unwrap();
        let outcome = validate_password(candidate);
        let actual = serde_json::to_value(&outcome).unwrap();
        assert_eq!(actual, case["expected"], "candidate {candidate:?}");
        assert_eq!(outcome.is_valid(), case["expected"].is_null(), "candidate {candidate:?}");
    }
}
