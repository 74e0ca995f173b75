use leptos::prelude::*;

use crate::table::{Pagination, PaginationData, PaginationOptions};

/// Return type for use_pagination hook
#[derive(Clone, Copy)]
pub struct UsePaginationReturn {
    pub state: ReadSignal<Pagination>,
    /// Page sent to the server
    pub page: Memo<usize>,
    /// 1-based page for the pagination control
    pub current_page: Memo<usize>,
    pub page_size: Memo<usize>,
    pub page_size_options: Memo<Vec<usize>>,
    pub total: Memo<usize>,
    pub total_pages: Memo<usize>,
    pub set_current_page: Callback<usize>,
    pub set_page_size: Callback<usize>,
    apply_response: Callback<PaginationData<()>>,
}

impl UsePaginationReturn {
    /// Overwrite position and totals from a server response
    pub fn update_page_data<T>(&self, response: &PaginationData<T>) {
        self.apply_response.run(PaginationData {
            page: response.page,
            size: response.size,
            total: response.total,
            total_page: response.total_page,
            list: Vec::new(),
        });
    }
}

/// Hook for managing pagination state
///
/// # Example
/// ```rust,ignore
/// let pagination = use_pagination(PaginationOptions::default());
///
/// view! {
///     <Pagination
///         current_page=pagination.current_page
///         total_pages=pagination.total_pages
///         on_change=pagination.set_current_page
///     />
/// }
/// ```
pub fn use_pagination(options: PaginationOptions) -> UsePaginationReturn {
    let state = RwSignal::new(Pagination::new(options));

    let set_current_page = Callback::new(move |page: usize| {
        state.update(|p| p.set_current_page(page));
    });

    let set_page_size = Callback::new(move |size: usize| {
        state.update(|p| {
            p.set_page_size(size);
            p.set_current_page(1);
        });
    });

    let apply_response = Callback::new(move |response: PaginationData<()>| {
        state.update(|p| p.update_from_response(&response));
    });

    pagination_signals(state, set_current_page, set_page_size, apply_response)
}

/// Derived signals over `state`. Writes go through the given callbacks, so an
/// owner of the real state can route them elsewhere.
pub(crate) fn pagination_signals(
    state: RwSignal<Pagination>,
    set_current_page: Callback<usize>,
    set_page_size: Callback<usize>,
    apply_response: Callback<PaginationData<()>>,
) -> UsePaginationReturn {
    let page = Memo::new(move |_| state.with(Pagination::request_page));
    let current_page = Memo::new(move |_| state.with(Pagination::current_page));
    let page_size = Memo::new(move |_| state.with(Pagination::page_size));
    let page_size_options = Memo::new(move |_| state.with(|p| p.page_size_options().to_vec()));
    let total = Memo::new(move |_| state.with(Pagination::total));
    let total_pages = Memo::new(move |_| state.with(Pagination::total_pages));

    UsePaginationReturn {
        state: state.read_only(),
        page,
        current_page,
        page_size,
        page_size_options,
        total,
        total_pages,
        set_current_page,
        set_page_size,
        apply_response,
    }
}
