//! Reactive hooks binding the search-table state to Leptos signals

mod use_form;
mod use_pagination;
mod use_search_table;

pub use use_form::*;
pub use use_pagination::*;
pub use use_search_table::*;

#[cfg(test)]
mod use_search_table_test;
