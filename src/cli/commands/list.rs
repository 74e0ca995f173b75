use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::render_rows;
use crate::table::{
    FirstPageIndex, PaginationOptions, RequestParams, SearchTable, SearchTableOptions,
};

/// Arguments for fetching one page of a remote list
#[derive(Debug, Default)]
pub struct ListArgs {
    /// Collection path relative to the API URL
    pub path: String,
    /// 1-based page to show
    pub page: usize,
    pub size: Option<usize>,
    pub first_page: Option<u8>,
    pub filters: Vec<(String, String)>,
    pub config: Option<PathBuf>,
    pub envelope: Option<String>,
    pub format: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageOutput {
    page: usize,
    request_page: usize,
    size: usize,
    total: usize,
    total_pages: usize,
    list: Vec<Value>,
}

/// Load pagination options from a YAML file
pub fn load_options(path: &Path) -> CliResult<PaginationOptions> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    PaginationOptions::from_yaml_str(&source).map_err(|source| CliError::ConfigParse { source })
}

/// Resolve options from the config file, then command-line overrides
pub fn resolve_options(args: &ListArgs) -> CliResult<PaginationOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => PaginationOptions::default(),
    };

    if let Some(size) = args.size {
        if size == 0 {
            return Err(CliError::InvalidArgument {
                message: "page size must be at least 1".to_string(),
            });
        }
        options.page_size = size;
    }
    if let Some(first_page) = args.first_page {
        options.first_page_index = FirstPageIndex::try_from(first_page)
            .map_err(|message| CliError::InvalidArgument { message })?;
    }

    Ok(options)
}

/// Fetch one page of the list at `args.path` and render it
pub async fn list_page(api_client: &ApiClient, args: ListArgs) -> CliResult<String> {
    let options = resolve_options(&args)?;
    let form: RequestParams = args
        .filters
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    let source = api_client
        .page_source(&args.path)
        .with_envelope(args.envelope.clone());

    let table: SearchTable<RequestParams, RequestParams, Value> =
        SearchTable::new(SearchTableOptions::new(form, source).pagination(options));
    match args.page {
        0 | 1 => table.search().await?,
        page => table.change_page(page).await?,
    };

    info!(
        path = %args.path,
        page = table.current_page(),
        total = table.total(),
        "fetched page"
    );

    match args.format.as_str() {
        "json" => {
            let output = PageOutput {
                page: table.current_page(),
                request_page: table.request_page(),
                size: table.page_size(),
                total: table.total(),
                total_pages: table.total_pages(),
                list: table.table_data(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        _ => {
            let rows = table.table_data();
            if rows.is_empty() {
                return Ok(format!("No items found (page {}).", table.current_page()));
            }
            Ok(format!(
                "{}\nPage {} of {} ({} total)",
                render_rows(&rows),
                table.current_page(),
                table.total_pages(),
                table.total()
            ))
        }
    }
}
