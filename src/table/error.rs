//! Error types for the search-table core.
//!
//! `RequestError` is what injected request functions report. `FetchError`
//! describes which step of a fetch cycle failed and carries the underlying
//! `RequestError` as its source.

use miette::Diagnostic;
use thiserror::Error;

/// Failure reported by an injected request function or params builder.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Network error: {message}")]
    #[diagnostic(code(search_table::request::network))]
    Network { message: String },

    #[error("Server error ({status}): {message}")]
    #[diagnostic(code(search_table::request::server))]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {message}")]
    #[diagnostic(code(search_table::request::decode))]
    Decode { message: String },

    #[error("Invalid request parameters: {message}")]
    #[diagnostic(
        code(search_table::request::invalid_params),
        help("The default parameter builder needs form data that serializes to a JSON object.")
    )]
    InvalidParams { message: String },
}

impl RequestError {
    pub fn network(message: impl Into<String>) -> Self {
        RequestError::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        RequestError::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        RequestError::InvalidParams {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(e: serde_json::Error) -> Self {
        RequestError::decode(e.to_string())
    }
}

/// Failure of one fetch cycle.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Failed to build request parameters")]
    #[diagnostic(code(search_table::fetch::params))]
    Params {
        #[source]
        source: RequestError,
    },

    #[error("List request failed")]
    #[diagnostic(code(search_table::fetch::list))]
    List {
        #[source]
        source: RequestError,
    },

    #[error("Side request failed")]
    #[diagnostic(code(search_table::fetch::side_request))]
    SideRequest {
        #[source]
        source: RequestError,
    },
}

impl FetchError {
    /// The request error underneath this failure.
    pub fn request_error(&self) -> &RequestError {
        match self {
            FetchError::Params { source }
            | FetchError::List { source }
            | FetchError::SideRequest { source } => source,
        }
    }
}

/// Result type for injected request functions.
pub type RequestResult<T> = Result<T, RequestError>;

/// Result type for fetch cycles.
pub type FetchResult<T> = Result<T, FetchError>;
