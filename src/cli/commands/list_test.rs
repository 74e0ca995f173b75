use std::collections::HashMap;
use std::io::Write;

use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::cli::api_client::ApiClient;
use crate::cli::commands::list::*;
use crate::cli::error::CliError;
use crate::table::{FetchError, FirstPageIndex, RequestError};

// =============================================================================
// Integration Tests - Test the list command against a real HTTP server
// =============================================================================

const NAMES: [&str; 5] = ["ada", "bob", "cleo", "dan", "eve"];

/// 0-based paginated listing of `NAMES`, filtered by `name` prefix
fn users_page(params: &HashMap<String, String>) -> Value {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = params.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
    let prefix = params.get("name").cloned().unwrap_or_default();

    let matching: Vec<Value> = NAMES
        .iter()
        .enumerate()
        .filter(|(_, name)| name.starts_with(&prefix))
        .map(|(i, name)| json!({ "id": i + 1, "name": name }))
        .collect();
    let total = matching.len();
    let list: Vec<Value> = matching.into_iter().skip(page * size).take(size).collect();

    json!({
        "page": page,
        "size": size,
        "total": total,
        "totalPage": total.div_ceil(size),
        "list": list
    })
}

/// Spawn a test HTTP server serving a paginated user list
async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route(
            "/api/users",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(users_page(&params))
            }),
        )
        .route(
            "/api/wrapped",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({ "code": 0, "data": users_page(&params) }))
            }),
        )
        .route(
            "/api/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database offline") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, handle)
}

fn args(path: &str, page: usize) -> ListArgs {
    ListArgs {
        path: path.to_string(),
        page,
        size: Some(2),
        first_page: Some(0),
        format: "json".to_string(),
        ..ListArgs::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_translates_ui_page_to_zero_based_request() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let output = list_page(&api_client, args("/api/users", 2)).await.unwrap();
    let page: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(page["page"], 2);
    assert_eq!(page["requestPage"], 1);
    assert_eq!(page["total"], 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["list"][0]["name"], "cleo");
    assert_eq!(page["list"][1]["name"], "dan");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_sends_filters() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let mut list_args = args("/api/users", 1);
    list_args.filters = vec![("name".to_string(), "e".to_string())];
    let output = list_page(&api_client, list_args).await.unwrap();
    let page: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(page["total"], 1);
    assert_eq!(page["list"][0]["name"], "eve");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_renders_table_with_footer() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let mut list_args = args("api/users", 3);
    list_args.format = "table".to_string();
    let output = list_page(&api_client, list_args).await.unwrap();

    assert!(output.contains("eve"));
    assert!(!output.contains("ada"));
    assert!(output.ends_with("Page 3 of 3 (5 total)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_reports_empty_page() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let mut list_args = args("/api/users", 1);
    list_args.format = "table".to_string();
    list_args.filters = vec![("name".to_string(), "zed".to_string())];
    let output = list_page(&api_client, list_args).await.unwrap();

    assert_eq!(output, "No items found (page 1).");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_reads_enveloped_response() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let mut list_args = args("/api/wrapped", 1);
    list_args.envelope = Some("data".to_string());
    let output = list_page(&api_client, list_args).await.unwrap();
    let page: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(page["list"][0]["name"], "ada");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_without_envelope_fails_to_decode_wrapped_body() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let err = list_page(&api_client, args("/api/wrapped", 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Fetch(FetchError::List {
            source: RequestError::Decode { .. }
        })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_surfaces_server_errors() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));

    let err = list_page(&api_client, args("/api/broken", 1))
        .await
        .unwrap_err();

    match err {
        CliError::Fetch(FetchError::List {
            source: RequestError::Server { status, message },
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database offline");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let api_client = ApiClient::new(Some(url));

    let err = list_page(&api_client, args("/api/users", 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Fetch(FetchError::List {
            source: RequestError::Network { .. }
        })
    ));
}

#[test]
fn test_resolve_options_from_config_with_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first_page_index: 0\npage_size: 25\npage_size_options: [25, 50]").unwrap();

    let list_args = ListArgs {
        config: Some(file.path().to_path_buf()),
        size: Some(50),
        ..ListArgs::default()
    };
    let options = resolve_options(&list_args).unwrap();

    assert_eq!(options.first_page_index, FirstPageIndex::Zero);
    assert_eq!(options.page_size, 50);
    assert_eq!(options.page_size_options, vec![25, 50]);
}

#[test]
fn test_resolve_options_rejects_bad_first_page() {
    let list_args = ListArgs {
        first_page: Some(3),
        ..ListArgs::default()
    };

    let err = resolve_options(&list_args).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument { .. }));
}

#[test]
fn test_resolve_options_rejects_zero_size() {
    let list_args = ListArgs {
        size: Some(0),
        ..ListArgs::default()
    };

    assert!(resolve_options(&list_args).is_err());
}

#[test]
fn test_load_options_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = load_options(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, CliError::ConfigRead { .. }));
}

#[test]
fn test_load_options_invalid_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "first_page_index: 7").unwrap();

    let err = load_options(file.path()).unwrap_err();
    assert!(matches!(err, CliError::ConfigParse { .. }));
}
