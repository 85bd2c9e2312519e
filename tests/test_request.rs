use snooze::http::request::{Method, Request, RequestBuilder};
use std::collections::HashMap;

#[test]
fn test_request_query_retrieval() {
    let mut query = HashMap::new();
    query.insert("connid".to_string(), "abc".to_string());

    let req = Request {
        method: Method::POST,
        target: "/v1/kill?connid=abc".to_string(),
        version: "HTTP/1.1".to_string(),
        route: Some("v1/kill".to_string()),
        query,
    };

    assert_eq!(req.route(), Some("v1/kill"));
    assert_eq!(req.query_arg("connid"), Some("abc"));
    assert_eq!(req.query_arg("timeout"), None);
    assert!(req.has_query());
}

#[test]
fn test_builder_splits_target() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/v1/sleep?connid=7&timeout=250")
        .build()
        .unwrap();

    assert_eq!(req.route(), Some("v1/sleep"));
    assert_eq!(req.query_arg("connid"), Some("7"));
    assert_eq!(req.query_arg("timeout"), Some("250"));
    assert_eq!(req.version, "HTTP/1.1");
}

#[test]
fn test_builder_requires_method_and_target() {
    assert!(RequestBuilder::new().target("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("POST"), Some(Method::POST));
    assert_eq!(Method::from_str("INVALID"), None);
    assert_eq!(Method::from_str("post"), None); // Case-sensitive
}

#[test]
fn test_request_method_from_token() {
    assert_eq!(Method::from_token("GET"), Method::GET);
    assert_eq!(Method::from_token("PATCH"), Method::Other("PATCH".to_string()));
    assert_eq!(Method::from_token("post"), Method::Other("post".to_string()));
    assert_ne!(Method::from_token("post"), Method::POST);
}
