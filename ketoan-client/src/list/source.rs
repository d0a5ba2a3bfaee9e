use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::query::{DEFAULT_PAGE_SIZE, FilterDimension, QueryDescriptor, SortKey};
use shared::response::PageEnvelope;

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiRequest, HttpClient, decode};

/// Static description of one list view: endpoint, filters and sort fields.
pub trait ListView: Send + Sync + 'static {
    type Row: DeserializeOwned + Send + Sync + 'static;
    type Sort: SortKey;

    /// Endpoint path, relative to the API base URL
    fn path(&self) -> String;

    /// Filter dimensions the endpoint accepts
    fn filters(&self) -> &'static [FilterDimension] {
        &[]
    }

    fn default_sort(&self) -> Self::Sort;

    fn page_size(&self) -> u32 {
        DEFAULT_PAGE_SIZE
    }

    fn accepts(&self, dimension: FilterDimension) -> bool {
        self.filters().contains(&dimension)
    }
}

/// Where a controller gets its pages from
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &QueryDescriptor) -> ClientResult<PageEnvelope<T>>;
}

/// A list endpoint reached through the authenticated pipeline
pub struct Endpoint<C, T> {
    client: Arc<C>,
    path: String,
    _row: PhantomData<fn() -> T>,
}

impl<C, T> Endpoint<C, T> {
    pub fn new(client: Arc<C>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _row: PhantomData,
        }
    }

    /// Endpoint serving `view`
    pub fn for_view<V: ListView<Row = T>>(client: Arc<C>, view: &V) -> Self {
        Self::new(client, view.path())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<C, T> Clone for Endpoint<C, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            _row: PhantomData,
        }
    }
}

#[async_trait]
impl<C, T> ListSource<T> for Endpoint<C, T>
where
    C: HttpClient + 'static,
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &QueryDescriptor) -> ClientResult<PageEnvelope<T>> {
        let request = ApiRequest::get(self.path.as_str()).with_query(query.to_query_pairs());
        let envelope: PageEnvelope<T> = decode(self.client.send_json(request).await?)?;
        if !envelope.success {
            return Err(ClientError::Api {
                status: 200,
                message: format!("{} reported failure", self.path),
            });
        }
        if !envelope.is_consistent() {
            tracing::warn!(
                path = %self.path,
                rows = envelope.data.len(),
                limit = envelope.pagination.limit,
                total = envelope.pagination.total,
                pages = envelope.pagination.pages,
                "Inconsistent pagination metadata"
            );
        }
        Ok(envelope)
    }
}
