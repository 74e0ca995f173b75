//! Leptos bindings for the search-table state.

pub mod hooks;
