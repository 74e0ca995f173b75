//! Search form + paginated table state.
//!
//! # Architecture
//!
//! - `form`: form data, validation rules and the form element slot
//! - `pagination`: UI page vs. request page, page size and totals
//! - `request`: the `{page, size, total, totalPage, list}` contract and the
//!   injected request seams
//! - `controller`: `SearchTable`, which ties the above to a fetch cycle
//! - `notifier`: change events for UI bindings
//! - `error`: request and fetch-cycle errors

mod controller;
mod error;
mod form;
mod notifier;
mod pagination;
mod request;


pub use controller::{FetchOutcome, OverlapPolicy, SearchTable, SearchTableOptions};
pub use error::{FetchError, FetchResult, RequestError, RequestResult};
pub use form::{FormRef, FormRule, FormState, RuleSet, Trigger, Triggers, ValidationRules};
pub use notifier::{ChangeNotifier, TableEvent};
pub use pagination::{
    DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, FirstPageIndex, Pagination, PaginationOptions,
};
pub use request::{
    PageParams, PageSource, PaginationData, RequestParams, SideRequest, merge_params,
};
