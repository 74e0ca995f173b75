//! Search form + paginated table controller.
//!
//! `SearchTable` owns a form, pagination state, a loading flag and the current
//! rows. User actions adjust the page position and run a fetch cycle:
//! build params, call the list request (and optional side request)
//! concurrently, then store rows and totals.
//!
//! The handle is `Clone` and single-threaded. Action methods mutate state
//! immediately and return a `'static` future, so callers can hand them to
//! `spawn_local` or await them in place.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures_util::future::{self, LocalBoxFuture};
use futures_util::{FutureExt, TryFutureExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use super::error::{FetchError, FetchResult, RequestResult};
use super::form::{FormRef, FormState, ValidationRules};
use super::notifier::{ChangeNotifier, TableEvent};
use super::pagination::{Pagination, PaginationOptions};
use super::request::{
    PageParams, PageSource, PaginationData, RequestParams, SideRequest, merge_params,
};

type ParamsBuilder<F, P> = Rc<dyn Fn(F, PageParams) -> LocalBoxFuture<'static, RequestResult<P>>>;
type DataFormatter<R, T> = Rc<dyn Fn(Vec<R>) -> Vec<T>>;

/// What happens when a fetch cycle completes after a newer one was started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Every completing cycle writes its result; the last to resolve wins.
    #[default]
    LastResolved,
    /// Completions of cycles older than the latest issued one are discarded.
    LatestIssued,
}

/// Result of a fetch cycle that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows and totals were stored.
    Applied { cycle: u64, rows: usize },
    /// A newer cycle was issued first; nothing was stored.
    Superseded { cycle: u64, latest: u64 },
}

/// Construction options for [`SearchTable`].
pub struct SearchTableOptions<F, P, R, T = R> {
    default_form_data: F,
    form_rules: ValidationRules,
    pagination: PaginationOptions,
    params_builder: ParamsBuilder<F, P>,
    request: Rc<dyn PageSource<P, R>>,
    side_request: Option<Rc<dyn SideRequest<P>>>,
    data_formatter: DataFormatter<R, T>,
    overlap: OverlapPolicy,
}

impl<F, R> SearchTableOptions<F, RequestParams, R, R>
where
    F: Serialize + 'static,
    R: 'static,
{
    /// Options whose request params are the form fields merged with
    /// `page` and `size`.
    pub fn new(
        default_form_data: F,
        request: impl PageSource<RequestParams, R> + 'static,
    ) -> Self {
        Self::with_async_params_builder(
            default_form_data,
            |form: F, page| future::ready(merge_params(&form, page)),
            request,
        )
    }
}

impl<F, P, R> SearchTableOptions<F, P, R, R>
where
    F: 'static,
    P: 'static,
    R: 'static,
{
    /// Options with a synchronous params builder.
    pub fn with_params_builder(
        default_form_data: F,
        builder: impl Fn(&F, PageParams) -> P + 'static,
        request: impl PageSource<P, R> + 'static,
    ) -> Self {
        Self::with_async_params_builder(
            default_form_data,
            move |form: F, page| future::ready(Ok(builder(&form, page))),
            request,
        )
    }

    /// Options with an asynchronous params builder. A builder error fails the
    /// fetch cycle before any request is sent.
    pub fn with_async_params_builder<Fut>(
        default_form_data: F,
        builder: impl Fn(F, PageParams) -> Fut + 'static,
        request: impl PageSource<P, R> + 'static,
    ) -> Self
    where
        Fut: Future<Output = RequestResult<P>> + 'static,
    {
        Self {
            default_form_data,
            form_rules: ValidationRules::new(),
            pagination: PaginationOptions::default(),
            params_builder: Rc::new(move |form: F, page: PageParams| {
                builder(form, page).boxed_local()
            }),
            request: Rc::new(request),
            side_request: None,
            data_formatter: Rc::new(|list: Vec<R>| list),
            overlap: OverlapPolicy::default(),
        }
    }
}

impl<F, P, R, T> SearchTableOptions<F, P, R, T> {
    pub fn pagination(mut self, options: PaginationOptions) -> Self {
        self.pagination = options;
        self
    }

    pub fn rules(mut self, rules: ValidationRules) -> Self {
        self.form_rules = rules;
        self
    }

    /// Request sent with the same params as the list request. Its value is
    /// ignored but its failure fails the cycle.
    pub fn side_request(mut self, request: impl SideRequest<P> + 'static) -> Self {
        self.side_request = Some(Rc::new(request));
        self
    }

    pub fn overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap = policy;
        self
    }

    /// Transform response items into table rows.
    pub fn data_formatter<U>(
        self,
        formatter: impl Fn(Vec<R>) -> Vec<U> + 'static,
    ) -> SearchTableOptions<F, P, R, U> {
        SearchTableOptions {
            default_form_data: self.default_form_data,
            form_rules: self.form_rules,
            pagination: self.pagination,
            params_builder: self.params_builder,
            request: self.request,
            side_request: self.side_request,
            data_formatter: Rc::new(formatter),
            overlap: self.overlap,
        }
    }
}

struct Hooks<F, P, R, T> {
    params_builder: ParamsBuilder<F, P>,
    request: Rc<dyn PageSource<P, R>>,
    side_request: Option<Rc<dyn SideRequest<P>>>,
    data_formatter: DataFormatter<R, T>,
    overlap: OverlapPolicy,
}

struct TableState<F, T> {
    form: FormState<F>,
    pagination: Pagination,
    loading: bool,
    table_data: Vec<T>,
    issued: u64,
    mounted: bool,
}

/// Search form + paginated table controller handle.
pub struct SearchTable<F, P, R, T = R> {
    state: Rc<RefCell<TableState<F, T>>>,
    hooks: Rc<Hooks<F, P, R, T>>,
    notifier: ChangeNotifier,
}

impl<F, P, R, T> Clone for SearchTable<F, P, R, T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            hooks: Rc::clone(&self.hooks),
            notifier: self.notifier.clone(),
        }
    }
}

impl<F, P, R, T> SearchTable<F, P, R, T>
where
    F: Clone + 'static,
    P: Clone + 'static,
    R: 'static,
    T: 'static,
{
    pub fn new(options: SearchTableOptions<F, P, R, T>) -> Self {
        let state = TableState {
            form: FormState::with_rules(options.default_form_data, options.form_rules),
            pagination: Pagination::new(options.pagination),
            loading: false,
            table_data: Vec::new(),
            issued: 0,
            mounted: false,
        };
        let hooks = Hooks {
            params_builder: options.params_builder,
            request: options.request,
            side_request: options.side_request,
            data_formatter: options.data_formatter,
            overlap: options.overlap,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            hooks: Rc::new(hooks),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Reset to the first page and fetch. Use after the filters changed.
    pub fn search(&self) -> impl Future<Output = FetchResult<FetchOutcome>> + use<F, P, R, T> {
        self.move_to(|pagination| pagination.set_current_page(1));
        self.fetch()
    }

    /// Go to UI page `page` and fetch. Page size is kept.
    pub fn change_page(
        &self,
        page: usize,
    ) -> impl Future<Output = FetchResult<FetchOutcome>> + use<F, P, R, T> {
        self.move_to(|pagination| pagination.set_current_page(page));
        self.fetch()
    }

    /// Change the page size, go back to the first page, and fetch.
    pub fn change_page_size(
        &self,
        size: usize,
    ) -> impl Future<Output = FetchResult<FetchOutcome>> + use<F, P, R, T> {
        self.move_to(|pagination| {
            pagination.set_page_size(size);
            pagination.set_current_page(1);
        });
        self.fetch()
    }

    /// Initial fetch for when the owning view becomes active.
    ///
    /// Runs `search` the first time only; later calls resolve to `None`
    /// without issuing a request.
    pub fn mount(
        &self,
    ) -> impl Future<Output = Option<FetchResult<FetchOutcome>>> + use<F, P, R, T> {
        let first = {
            let mut state = self.state.borrow_mut();
            !std::mem::replace(&mut state.mounted, true)
        };
        let search = first.then(|| self.search());
        async move {
            match search {
                Some(search) => Some(search.await),
                None => None,
            }
        }
    }

    /// Overwrite page position and totals from a response.
    pub fn update_page_data<X>(&self, response: &PaginationData<X>) {
        self.state
            .borrow_mut()
            .pagination
            .update_from_response(response);
    }

    fn move_to(&self, change: impl FnOnce(&mut Pagination)) {
        let (current_page, page_size) = {
            let mut state = self.state.borrow_mut();
            change(&mut state.pagination);
            (state.pagination.current_page(), state.pagination.page_size())
        };
        self.notifier.notify(TableEvent::PageChanged {
            current_page,
            page_size,
        });
    }

    /// Start a fetch cycle. Params are built from the state at call time.
    fn fetch(&self) -> impl Future<Output = FetchResult<FetchOutcome>> + use<F, P, R, T> {
        let (cycle, form_data, page_params) = {
            let mut state = self.state.borrow_mut();
            state.issued += 1;
            (
                state.issued,
                state.form.data().clone(),
                state.pagination.page_params(),
            )
        };
        debug!(
            cycle,
            page = page_params.page,
            size = page_params.size,
            "starting fetch cycle"
        );
        let params = (self.hooks.params_builder)(form_data, page_params);
        let table = self.clone();

        async move {
            let params = match params.await {
                Ok(params) => params,
                Err(source) => {
                    let err = FetchError::Params { source };
                    debug!(cycle, error = %err, "request params could not be built");
                    // Older cycles still in flight will settle as superseded
                    // and never clear the flag themselves.
                    if table.hooks.overlap == OverlapPolicy::LatestIssued
                        && table.superseded(cycle).is_none()
                    {
                        table.set_loading(false);
                    }
                    table.notifier.notify(TableEvent::FetchFailed {
                        message: err.to_string(),
                    });
                    return Err(err);
                }
            };

            if let Some(outcome) = table.superseded(cycle) {
                debug!(cycle, "fetch cycle superseded before its request was sent");
                return Ok(outcome);
            }

            table.set_loading(true);
            let result = table.request(params).await;
            table.settle(cycle, result)
        }
    }

    async fn request(&self, params: P) -> FetchResult<PaginationData<R>> {
        let list = self
            .hooks
            .request
            .fetch_page(params.clone())
            .map_err(|source| FetchError::List { source });

        match &self.hooks.side_request {
            Some(side) => {
                let side = side
                    .call(params)
                    .map_err(|source| FetchError::SideRequest { source });
                future::try_join(list, side).await.map(|(data, ())| data)
            }
            None => list.await,
        }
    }

    fn settle(
        &self,
        cycle: u64,
        result: FetchResult<PaginationData<R>>,
    ) -> FetchResult<FetchOutcome> {
        if let Some(outcome) = self.superseded(cycle) {
            debug!(cycle, "discarding superseded fetch cycle");
            return Ok(outcome);
        }

        match result {
            Ok(mut data) => {
                let rows = (self.hooks.data_formatter)(std::mem::take(&mut data.list));
                let row_count = rows.len();
                let event = {
                    let mut state = self.state.borrow_mut();
                    state.table_data = rows;
                    state.pagination.update_from_response(&data);
                    TableEvent::DataUpdated {
                        rows: row_count,
                        current_page: state.pagination.current_page(),
                        total: state.pagination.total(),
                        total_pages: state.pagination.total_pages(),
                    }
                };
                debug!(cycle, rows = row_count, total = data.total, "fetch cycle applied");
                self.notifier.notify(event);
                self.set_loading(false);
                Ok(FetchOutcome::Applied {
                    cycle,
                    rows: row_count,
                })
            }
            Err(err) => {
                debug!(cycle, error = %err, "fetch cycle failed");
                self.set_loading(false);
                self.notifier.notify(TableEvent::FetchFailed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// `Superseded` when a newer cycle was issued and the policy drops stale ones.
    fn superseded(&self, cycle: u64) -> Option<FetchOutcome> {
        let latest = self.state.borrow().issued;
        (self.hooks.overlap == OverlapPolicy::LatestIssued && cycle < latest)
            .then_some(FetchOutcome::Superseded { cycle, latest })
    }

    fn set_loading(&self, loading: bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            std::mem::replace(&mut state.loading, loading) != loading
        };
        if changed {
            self.notifier.notify(TableEvent::LoadingChanged { loading });
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.notifier.subscribe()
    }

    pub fn form_data(&self) -> F {
        self.state.borrow().form.data().clone()
    }

    /// Edit the form data in place, as a bound input would.
    pub fn update_form(&self, edit: impl FnOnce(&mut F)) {
        edit(self.state.borrow_mut().form.data_mut());
    }

    pub fn reset_form(&self) {
        self.state.borrow_mut().form.reset();
    }

    pub fn rules(&self) -> ValidationRules {
        self.state.borrow().form.rules().clone()
    }

    pub fn form_ref(&self) -> FormRef {
        self.state.borrow().form.element().clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Borrow the current rows.
    pub fn with_table_data<O>(&self, read: impl FnOnce(&[T]) -> O) -> O {
        read(&self.state.borrow().table_data)
    }

    pub fn current_page(&self) -> usize {
        self.state.borrow().pagination.current_page()
    }

    pub fn request_page(&self) -> usize {
        self.state.borrow().pagination.request_page()
    }

    pub fn page_size(&self) -> usize {
        self.state.borrow().pagination.page_size()
    }

    pub fn page_size_options(&self) -> Vec<usize> {
        self.state.borrow().pagination.page_size_options().to_vec()
    }

    pub fn total(&self) -> usize {
        self.state.borrow().pagination.total()
    }

    pub fn total_pages(&self) -> usize {
        self.state.borrow().pagination.total_pages()
    }

    /// Snapshot of the pagination state.
    pub fn pagination(&self) -> Pagination {
        self.state.borrow().pagination.clone()
    }
}

impl<F, P, R, T> SearchTable<F, P, R, T>
where
    F: Clone + 'static,
    P: Clone + 'static,
    R: 'static,
    T: Clone + 'static,
{
    pub fn table_data(&self) -> Vec<T> {
        self.with_table_data(|rows| rows.to_vec())
    }
}
