use leptos::prelude::*;
use leptos::task::spawn_local;
use tokio::sync::broadcast::error::RecvError;

use super::{UseFormReturn, UsePaginationReturn, pagination_signals, use_form};
use crate::table::{Pagination, PaginationData, SearchTable, SearchTableOptions, TableEvent};

/// Return type for use_search_table hook
pub struct UseSearchTableReturn<F, T>
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub form: UseFormReturn<F>,
    pub pagination: UsePaginationReturn,
    pub loading: ReadSignal<bool>,
    pub table_data: ReadSignal<Vec<T>>,
    /// Message of the last failed fetch, cleared by the next successful one
    pub last_error: ReadSignal<Option<String>>,
    pub on_search: Callback<()>,
    pub on_current_page_change: Callback<usize>,
    pub on_page_size_change: Callback<usize>,
}

/// Signals mirroring a controller's observable state.
pub(crate) struct TableMirror<T: Send + Sync + 'static> {
    pub(crate) loading: RwSignal<bool>,
    pub(crate) table_data: RwSignal<Vec<T>>,
    pub(crate) pagination: RwSignal<Pagination>,
    pub(crate) last_error: RwSignal<Option<String>>,
}

impl<T: Send + Sync + 'static> Clone for TableMirror<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for TableMirror<T> {}

impl<T> TableMirror<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(pagination: Pagination) -> Self {
        Self {
            loading: RwSignal::new(false),
            table_data: RwSignal::new(Vec::new()),
            pagination: RwSignal::new(pagination),
            last_error: RwSignal::new(None),
        }
    }

    /// Apply one received event. Returns `false` once the table is gone.
    pub(crate) fn apply<F, P, R>(
        &self,
        received: Result<TableEvent, RecvError>,
        table: StoredValue<SearchTable<F, P, R, T>, LocalStorage>,
    ) -> bool
    where
        F: Clone + 'static,
        P: Clone + 'static,
        R: 'static,
    {
        match received {
            Ok(TableEvent::LoadingChanged { loading }) => {
                let _ = self.loading.try_set(loading);
            }
            Ok(TableEvent::PageChanged { .. }) => {
                let Some(state) = table.try_with_value(|t| t.pagination()) else {
                    return false;
                };
                let _ = self.pagination.try_set(state);
            }
            Ok(TableEvent::DataUpdated { .. }) => {
                let Some((rows, state)) =
                    table.try_with_value(|t| (t.table_data(), t.pagination()))
                else {
                    return false;
                };
                let _ = self.table_data.try_set(rows);
                let _ = self.pagination.try_set(state);
                let _ = self.last_error.try_set(None);
            }
            Ok(TableEvent::FetchFailed { message }) => {
                let _ = self.last_error.try_set(Some(message));
            }
            // Missed events: resync state, the error stays as it was
            Err(RecvError::Lagged(_)) => {
                let Some((rows, state, busy)) =
                    table.try_with_value(|t| (t.table_data(), t.pagination(), t.loading()))
                else {
                    return false;
                };
                let _ = self.table_data.try_set(rows);
                let _ = self.pagination.try_set(state);
                let _ = self.loading.try_set(busy);
            }
            Err(RecvError::Closed) => return false,
        }
        true
    }
}

/// Hook wiring a search form, pagination and a list request together
///
/// Fetches once when the component mounts. Form edits go to `form.form_data`
/// and are picked up by the next search or page change.
///
/// # Example
/// ```rust,ignore
/// let users = use_search_table(
///     SearchTableOptions::new(UserFilter::default(), |params| api::users::list(params))
///         .pagination(PaginationOptions { first_page_index: FirstPageIndex::Zero, ..Default::default() }),
/// );
///
/// view! {
///     <button on:click=move |_| users.on_search.run(())>"Search"</button>
///     <UserTable rows=users.table_data loading=users.loading/>
///     <Pagination
///         current_page=users.pagination.current_page
///         total_pages=users.pagination.total_pages
///         on_change=users.pagination.set_current_page
///     />
/// }
/// ```
pub fn use_search_table<F, P, R, T>(
    options: SearchTableOptions<F, P, R, T>,
) -> UseSearchTableReturn<F, T>
where
    F: Clone + Send + Sync + 'static,
    P: Clone + 'static,
    R: 'static,
    T: Clone + Send + Sync + 'static,
{
    let table = SearchTable::new(options);
    let form = use_form(table.form_data(), table.rules());
    let mirror = TableMirror::new(table.pagination());
    let TableMirror {
        loading,
        table_data,
        pagination: pagination_state,
        last_error,
    } = mirror;

    let mut events = table.subscribe();
    let stored = StoredValue::new_local(table);
    let form_data = form.form_data;

    // Ends when the owner drops the table
    spawn_local(async move {
        while mirror.apply(events.recv().await, stored) {}
    });

    let sync_form = move |table: &SearchTable<F, P, R, T>| {
        table.update_form(|data| *data = form_data.get_untracked());
    };

    let on_search = Callback::new(move |_: ()| {
        if let Some(fetch) = stored.try_with_value(|table| {
            sync_form(table);
            table.search()
        }) {
            spawn_local(async move {
                let _ = fetch.await;
            });
        }
    });

    let on_current_page_change = Callback::new(move |page: usize| {
        if let Some(fetch) = stored.try_with_value(|table| {
            sync_form(table);
            table.change_page(page)
        }) {
            spawn_local(async move {
                let _ = fetch.await;
            });
        }
    });

    let on_page_size_change = Callback::new(move |size: usize| {
        if let Some(fetch) = stored.try_with_value(|table| {
            sync_form(table);
            table.change_page_size(size)
        }) {
            spawn_local(async move {
                let _ = fetch.await;
            });
        }
    });

    let apply_response = Callback::new(move |response: PaginationData<()>| {
        if let Some(state) = stored.try_with_value(|table| {
            table.update_page_data(&response);
            table.pagination()
        }) {
            pagination_state.set(state);
        }
    });

    // Pagination controls drive the controller, never the mirror directly
    let pagination = pagination_signals(
        pagination_state,
        on_current_page_change,
        on_page_size_change,
        apply_response,
    );

    // Initial fetch once the component is mounted
    Effect::new(move || {
        if let Some(fetch) = stored.try_with_value(|table| {
            sync_form(table);
            table.mount()
        }) {
            spawn_local(async move {
                let _ = fetch.await;
            });
        }
    });

    UseSearchTableReturn {
        form,
        pagination,
        loading: loading.read_only(),
        table_data: table_data.read_only(),
        last_error: last_error.read_only(),
        on_search,
        on_current_page_change,
        on_page_size_change,
    }
}
