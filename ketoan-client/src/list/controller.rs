//! Generic query controller for paginated list views
//!
//! Setters update the query descriptor and immediately spawn a fetch. Each
//! fetch carries a generation number; only the latest generation may write
//! to the published snapshot, so a slow response for an abandoned query can
//! never overwrite a newer one.

use std::sync::Arc;

use parking_lot::Mutex;
use shared::query::{FilterDimension, FilterValue, QueryDescriptor, SortKey};
use shared::response::PageEnvelope;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::snapshot::{ListSnapshot, LoadStatus};
use super::source::{Endpoint, ListSource, ListView};
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::session::{SessionEvent, SessionStore};

/// How a fetch ended, as seen by whoever holds its ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    Errored,
    /// A later fetch or the end of the session replaced this one
    Superseded,
    /// The controller was dropped first
    Cancelled,
}

/// Handle on one issued fetch
#[derive(Debug)]
pub struct FetchTicket<T> {
    generation: u64,
    rx: watch::Receiver<ListSnapshot<T>>,
}

impl<T> FetchTicket<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait until this fetch is applied or superseded
    pub async fn settled(mut self) -> FetchOutcome {
        loop {
            {
                let snapshot = self.rx.borrow_and_update();
                if snapshot.generation != self.generation {
                    return FetchOutcome::Superseded;
                }
                match snapshot.status {
                    LoadStatus::Loaded => return FetchOutcome::Loaded,
                    LoadStatus::Errored => return FetchOutcome::Errored,
                    LoadStatus::Idle | LoadStatus::Loading => {}
                }
            }
            if self.rx.changed().await.is_err() {
                return FetchOutcome::Cancelled;
            }
        }
    }
}

struct QueryState<S> {
    descriptor: QueryDescriptor,
    sort: S,
}

/// Search, filter, sort and page state of one list view.
///
/// Must be used from within a Tokio runtime; every state change spawns the
/// fetch for the new descriptor. Dropping the controller cancels whatever
/// is still in flight.
pub struct QueryController<V: ListView> {
    view: V,
    source: Arc<dyn ListSource<V::Row>>,
    state: Mutex<QueryState<V::Sort>>,
    snapshot: Arc<watch::Sender<ListSnapshot<V::Row>>>,
    in_flight: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel: CancellationToken,
    keep_stale_rows: bool,
}

impl<V: ListView> QueryController<V> {
    pub fn new(view: V, source: impl ListSource<V::Row> + 'static) -> Self {
        let descriptor = QueryDescriptor::new(view.default_sort(), view.page_size());
        let (snapshot, _) = watch::channel(ListSnapshot::idle(descriptor.clone()));
        Self {
            state: Mutex::new(QueryState {
                descriptor,
                sort: view.default_sort(),
            }),
            view,
            source: Arc::new(source),
            snapshot: Arc::new(snapshot),
            in_flight: Arc::new(Mutex::new(None)),
            cancel: CancellationToken::new(),
            keep_stale_rows: false,
        }
    }

    /// Controller fetching `view` through the authenticated pipeline
    pub fn for_client<C: HttpClient + 'static>(view: V, client: Arc<C>) -> Self {
        let endpoint = Endpoint::for_view(client, &view);
        Self::new(view, endpoint)
    }

    /// Keep the previous page's rows visible while the next one loads.
    pub fn keep_stale_rows(mut self, keep: bool) -> Self {
        self.keep_stale_rows = keep;
        self
    }

    /// Override the view's page size. Resets to page 1.
    pub fn with_page_size(self, limit: u32) -> Self {
        {
            let mut state = self.state.lock();
            state.descriptor.limit = limit;
            state.descriptor.page = 1;
        }
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Initial load
    pub fn start(&self) -> FetchTicket<V::Row> {
        self.fetch()
    }

    pub fn set_search_text(&self, text: impl Into<String>) -> FetchTicket<V::Row> {
        let text = text.into();
        self.update(|state| {
            state.descriptor.search = text;
            state.descriptor.page = 1;
        })
    }

    /// Set one categorical filter. `"all"` clears it.
    pub fn set_filter(
        &self,
        dimension: FilterDimension,
        value: &str,
    ) -> ClientResult<FetchTicket<V::Row>> {
        if !self.view.accepts(dimension) {
            return Err(ClientError::Validation(format!(
                "{} does not filter by {dimension}",
                self.view.path()
            )));
        }
        let value = FilterValue::normalize(value);
        Ok(self.update(|state| {
            state.descriptor.set_filter(dimension, value);
            state.descriptor.page = 1;
        }))
    }

    /// Drop every filter and the search text
    pub fn clear_filters(&self) -> FetchTicket<V::Row> {
        self.update(|state| {
            state.descriptor.filters.clear();
            state.descriptor.search.clear();
            state.descriptor.page = 1;
        })
    }

    /// Change the sort field, keeping direction and page
    pub fn set_sort_field(&self, field: V::Sort) -> FetchTicket<V::Row> {
        self.update(|state| {
            state.sort = field;
            state.descriptor.sort_by = field.as_str().to_string();
        })
    }

    pub fn toggle_sort_direction(&self) -> FetchTicket<V::Row> {
        self.update(|state| {
            state.descriptor.sort_order = state.descriptor.sort_order.toggled();
        })
    }

    /// Jump to page `page`. Not clamped; the server answers out-of-range
    /// pages with empty data.
    pub fn go_to_page(&self, page: u32) -> FetchTicket<V::Row> {
        self.update(|state| state.descriptor.page = page)
    }

    /// Next page, if the last loaded page was not the final one
    pub fn next_page(&self) -> Option<FetchTicket<V::Row>> {
        let pages = self.loaded_pages()?;
        let current = self.current_page();
        (current < pages).then(|| self.go_to_page(current + 1))
    }

    /// Previous page, unless already on the first
    pub fn previous_page(&self) -> Option<FetchTicket<V::Row>> {
        let current = self.current_page();
        (current > 1).then(|| self.go_to_page(current - 1))
    }

    /// Re-issue the current descriptor
    pub fn refresh(&self) -> FetchTicket<V::Row> {
        self.fetch()
    }

    pub fn descriptor(&self) -> QueryDescriptor {
        self.state.lock().descriptor.clone()
    }

    pub fn sort_field(&self) -> V::Sort {
        self.state.lock().sort
    }

    pub fn current_page(&self) -> u32 {
        self.state.lock().descriptor.page
    }

    pub fn snapshot(&self) -> ListSnapshot<V::Row> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<V::Row>> {
        self.snapshot.subscribe()
    }

    fn loaded_pages(&self) -> Option<u32> {
        self.snapshot
            .borrow()
            .envelope
            .as_deref()
            .map(|envelope| envelope.pagination.pages)
    }

    fn update(&self, change: impl FnOnce(&mut QueryState<V::Sort>)) -> FetchTicket<V::Row> {
        let mut state = self.state.lock();
        change(&mut state);
        self.issue(&state.descriptor)
    }

    /// Issue a fetch for the current descriptor, superseding any other.
    pub fn fetch(&self) -> FetchTicket<V::Row> {
        let state = self.state.lock();
        self.issue(&state.descriptor)
    }

    /// Must be called with the state lock held: descriptor order, generation
    /// order and the in-flight slot then always agree.
    fn issue(&self, descriptor: &QueryDescriptor) -> FetchTicket<V::Row> {
        let query = descriptor.clone();
        let keep_rows = self.keep_stale_rows;
        let mut generation = 0;
        self.snapshot.send_modify(|snapshot| {
            snapshot.generation += 1;
            generation = snapshot.generation;
            snapshot.status = LoadStatus::Loading;
            snapshot.query = query.clone();
            snapshot.error = None;
            if !keep_rows {
                snapshot.envelope = None;
            }
        });
        let ticket = FetchTicket {
            generation,
            rx: self.snapshot.subscribe(),
        };

        tracing::debug!(
            path = %self.view.path(),
            generation,
            page = query.page,
            search = %query.search,
            "Fetching list page"
        );

        let source = self.source.clone();
        let tx = self.snapshot.clone();
        let cancel = self.cancel.child_token();
        let path = self.view.path();
        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = source.fetch_page(&query) => result,
            };
            if let Err(e) = &result {
                tracing::warn!(path = %path, generation, error = %e, "List fetch failed");
            }
            if !tx.send_if_modified(|snapshot| apply_result(snapshot, generation, result)) {
                tracing::debug!(path = %path, generation, "Discarding stale list response");
            }
        });

        if let Some(previous) = self.in_flight.lock().replace(handle) {
            previous.abort();
        }
        ticket
    }

    /// Stop in-flight work when the session ends.
    ///
    /// The listener lives until the controller is dropped.
    pub fn watch_session(&self, session: &SessionStore) {
        let mut events = session.subscribe();
        let cancel = self.cancel.clone();
        let tx = self.snapshot.clone();
        let in_flight = self.in_flight.clone();
        let path = self.view.path();

        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => event,
                };
                match event {
                    Ok(event) if event.is_end() => {
                        if let Some(handle) = in_flight.lock().take() {
                            handle.abort();
                        }
                        tracing::info!(path = %path, ?event, "Session ended, abandoning list fetch");
                        tx.send_modify(|snapshot| end_session(snapshot, &event));
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Session listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

impl<V: ListView> Drop for QueryController<V> {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.in_flight.lock().take() {
            handle.abort();
        }
    }
}

/// Apply a finished fetch if it is still the latest. Returns whether the
/// snapshot changed.
fn apply_result<T>(
    snapshot: &mut ListSnapshot<T>,
    generation: u64,
    result: ClientResult<PageEnvelope<T>>,
) -> bool {
    if snapshot.generation != generation {
        return false;
    }
    match result {
        Ok(envelope) => {
            snapshot.status = LoadStatus::Loaded;
            snapshot.envelope = Some(Arc::new(envelope));
            snapshot.error = None;
        }
        Err(e) => {
            snapshot.status = LoadStatus::Errored;
            snapshot.envelope = None;
            snapshot.error = Some(Arc::new(e));
        }
    }
    true
}

fn end_session<T>(snapshot: &mut ListSnapshot<T>, event: &SessionEvent) {
    let cause = match event {
        SessionEvent::Terminated { .. } => "session terminated",
        _ => "logged out",
    };
    // Bumping the generation fences off a response that raced the abort
    snapshot.generation += 1;
    snapshot.status = LoadStatus::Errored;
    snapshot.envelope = None;
    snapshot.error = Some(Arc::new(ClientError::SessionTerminated(Box::new(
        ClientError::Unauthorized(cause.to_string()),
    ))));
}
