//! Request-side contract: the pagination response shape, page parameters, and
//! the seams through which list requests are injected.

use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{RequestError, RequestResult};

/// Paginated list response every remote list call must return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationData<T> {
    /// Page index in the server's own convention (0- or 1-based)
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub total_page: usize,
    pub list: Vec<T>,
}

/// Page position sent along with every list request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageParams {
    /// Request page, already normalized to the server's first-page convention
    pub page: usize,
    pub size: usize,
}

/// Default request parameter representation: a flat JSON object.
pub type RequestParams = Map<String, Value>;

/// Merge serialized form data with page parameters.
///
/// `page` and `size` overwrite form fields of the same name.
pub fn merge_params<F: Serialize>(form_data: &F, page: PageParams) -> RequestResult<RequestParams> {
    let mut params = match serde_json::to_value(form_data)
        .map_err(|e| RequestError::invalid_params(e.to_string()))?
    {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(RequestError::invalid_params(format!(
                "form data must serialize to an object, got {}",
                json_kind(&other)
            )));
        }
    };
    params.insert("page".to_string(), Value::from(page.page));
    params.insert("size".to_string(), Value::from(page.size));
    Ok(params)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Primary list request. Implemented for any `Fn(P) -> impl Future`.
pub trait PageSource<P, R> {
    fn fetch_page(&self, params: P) -> LocalBoxFuture<'static, RequestResult<PaginationData<R>>>;
}

impl<Func, Fut, P, R> PageSource<P, R> for Func
where
    Func: Fn(P) -> Fut,
    Fut: Future<Output = RequestResult<PaginationData<R>>> + 'static,
{
    fn fetch_page(&self, params: P) -> LocalBoxFuture<'static, RequestResult<PaginationData<R>>> {
        self(params).boxed_local()
    }
}

/// Secondary request fired alongside the list request. Its value is discarded.
pub trait SideRequest<P> {
    fn call(&self, params: P) -> LocalBoxFuture<'static, RequestResult<()>>;
}

impl<Func, Fut, P, V> SideRequest<P> for Func
where
    Func: Fn(P) -> Fut,
    Fut: Future<Output = RequestResult<V>> + 'static,
{
    fn call(&self, params: P) -> LocalBoxFuture<'static, RequestResult<()>> {
        self(params).map(|result| result.map(|_| ())).boxed_local()
    }
}
