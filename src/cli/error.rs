use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::table::FetchError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(
        code(search_table::cli::config_read),
        help("Pass an existing YAML file to --config, or omit it to use the defaults.")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pagination config")]
    #[diagnostic(
        code(search_table::cli::config_parse),
        help(
            "Expected keys: first_page_index (0 or 1), page_size, page_size_options.\nExample:\n  first_page_index: 0\n  page_size: 20"
        )
    )]
    ConfigParse {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid argument: {message}")]
    #[diagnostic(code(search_table::cli::invalid_argument))]
    InvalidArgument { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(search_table::cli::output))]
    Output { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
