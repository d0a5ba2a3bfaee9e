use std::sync::Arc;

use shared::query::QueryDescriptor;
use shared::response::PageEnvelope;

use crate::error::ClientError;
use crate::pagination::PaginationView;

/// Load state of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// What a list view renders at a point in time.
#[derive(Debug)]
pub struct ListSnapshot<T> {
    pub status: LoadStatus,
    /// Generation of the latest issued fetch
    pub generation: u64,
    /// Descriptor of the latest issued fetch
    pub query: QueryDescriptor,
    /// Last applied page. Absent while errored, and while loading unless the
    /// controller keeps stale rows.
    pub envelope: Option<Arc<PageEnvelope<T>>>,
    pub error: Option<Arc<ClientError>>,
}

impl<T> Clone for ListSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            generation: self.generation,
            query: self.query.clone(),
            envelope: self.envelope.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T> ListSnapshot<T> {
    pub(crate) fn idle(query: QueryDescriptor) -> Self {
        Self {
            status: LoadStatus::Idle,
            generation: 0,
            query,
            envelope: None,
            error: None,
        }
    }

    /// Rows to render, in server order
    pub fn rows(&self) -> &[T] {
        self.envelope
            .as_deref()
            .map(|envelope| envelope.data.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Loaded, and nothing matched. Views show a "no results" state.
    pub fn is_empty(&self) -> bool {
        self.status == LoadStatus::Loaded
            && self.envelope.as_deref().is_none_or(|envelope| envelope.is_empty())
    }

    /// Pagination bar for the current page, once a page is available
    pub fn pagination(&self) -> Option<PaginationView> {
        self.envelope
            .as_deref()
            .map(|envelope| PaginationView::from_meta(&envelope.pagination, self.query.page))
    }
}
