use serde_json::json;

use crate::cli::api_client::*;
use crate::table::RequestParams;

fn params(value: serde_json::Value) -> RequestParams {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[test]
fn test_new_with_explicit_url() {
    let client = ApiClient::new(Some("http://custom:8080".to_string()));
    assert_eq!(client.base_url(), "http://custom:8080");
}

#[test]
fn test_new_with_default() {
    let client = ApiClient::new(None);
    // Actual value depends on SEARCH_TABLE_API_URL if set
    assert!(!client.base_url().is_empty());
}

#[test]
fn test_page_source_joins_paths() {
    let client = ApiClient::new(Some("http://explicit:7777/".to_string()));
    assert_eq!(
        client.page_source("/api/users").url(),
        "http://explicit:7777/api/users"
    );
    assert_eq!(
        client.page_source("api/users").url(),
        "http://explicit:7777/api/users"
    );
}

#[test]
fn test_query_pairs_unquotes_strings_and_skips_nulls() {
    let pairs = query_pairs(&params(json!({
        "name": "ada",
        "role": null,
        "page": 2,
        "active": true
    })));

    assert_eq!(
        pairs,
        vec![
            ("active".to_string(), "true".to_string()),
            ("name".to_string(), "ada".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn test_query_pairs_repeats_array_keys() {
    let pairs = query_pairs(&params(json!({ "tag": ["a", "b", null] })));

    assert_eq!(
        pairs,
        vec![
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
        ]
    );
}
