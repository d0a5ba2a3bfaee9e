use std::sync::Arc;

use serde_json::Value;
use shared::models::{
    AdminAccountant, AdminBusinessOwner, AdminInvoiceIn, AdminOutputInvoice, AdminProduct,
    AdminStorageItem, AdminUser, SystemStats, TaxStatistics, TaxStatisticsQuery, UserCreate,
    UserRole, UserRoleUpdate, UserUpdate,
};
use shared::response::{DataResponse, MessageResponse};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::{ApiRequest, HttpClient, decode};
use crate::list::{Endpoint, ListView, QueryController};
use crate::views::{
    AccountantsView, BusinessOwnersView, InvoicesInView, OutputInvoicesView, ProductsView,
    StorageItemsView, UsersView,
};

/// `/admin/*` endpoints
#[derive(Debug)]
pub struct AdminApi<C> {
    client: Arc<C>,
    /// Overrides each view's own page size when set
    page_size: Option<u32>,
}

impl<C> Clone for AdminApi<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            page_size: self.page_size,
        }
    }
}

impl<C: HttpClient + 'static> AdminApi<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            page_size: None,
        }
    }

    /// Admin service using the configured list page size
    pub fn from_config(client: Arc<C>, config: &ClientConfig) -> Self {
        Self::new(client).with_page_size(config.page_size)
    }

    /// Page size for every controller built by [`AdminApi::controller`]
    pub fn with_page_size(mut self, limit: u32) -> Self {
        self.page_size = Some(limit);
        self
    }

    async fn call<T: serde::de::DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        decode(self.client.send_json(request).await?)
    }

    // ========================================================================
    // Single records
    // ========================================================================

    pub async fn user(&self, user_id: &str) -> ClientResult<DataResponse<AdminUser>> {
        self.call(ApiRequest::get(format!("/admin/users/{user_id}")))
            .await
    }

    pub async fn business_owner(
        &self,
        owner_id: &str,
    ) -> ClientResult<DataResponse<AdminBusinessOwner>> {
        self.call(ApiRequest::get(format!("/admin/business-owners/{owner_id}")))
            .await
    }

    pub async fn accountant(
        &self,
        accountant_id: &str,
    ) -> ClientResult<DataResponse<AdminAccountant>> {
        self.call(ApiRequest::get(format!("/admin/accountants/{accountant_id}")))
            .await
    }

    // ========================================================================
    // User management
    // ========================================================================

    pub async fn create_user(&self, body: &UserCreate) -> ClientResult<DataResponse<AdminUser>> {
        self.call(ApiRequest::post("/admin/users").with_body(body)?)
            .await
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        body: &UserUpdate,
    ) -> ClientResult<DataResponse<AdminUser>> {
        self.call(ApiRequest::put(format!("/admin/users/{user_id}")).with_body(body)?)
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> ClientResult<MessageResponse> {
        match self
            .client
            .send_json(ApiRequest::delete(format!("/admin/users/{user_id}")))
            .await?
        {
            Value::Null => Ok(MessageResponse::default()),
            value => decode(value),
        }
    }

    pub async fn update_user_role(
        &self,
        user_id: &str,
        role: UserRole,
    ) -> ClientResult<DataResponse<AdminUser>> {
        let request = ApiRequest::patch(format!("/admin/users/{user_id}/role"))
            .with_body(&UserRoleUpdate { role })?;
        self.call(request).await
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Platform-wide counters
    pub async fn system_stats(&self) -> ClientResult<DataResponse<SystemStats>> {
        self.call(ApiRequest::get("/admin/stats/system")).await
    }

    /// User growth breakdown. The backend does not fix its shape.
    pub async fn user_stats(&self) -> ClientResult<DataResponse<Value>> {
        self.call(ApiRequest::get("/admin/stats/users")).await
    }

    /// Invoice volume breakdown. The backend does not fix its shape.
    pub async fn invoice_stats(&self) -> ClientResult<DataResponse<Value>> {
        self.call(ApiRequest::get("/admin/stats/invoices")).await
    }

    /// Tax totals of one business owner for a month, quarter or year
    pub async fn tax_statistics(
        &self,
        owner_id: &str,
        query: &TaxStatisticsQuery,
    ) -> ClientResult<DataResponse<TaxStatistics>> {
        let request = ApiRequest::get(format!("/admin/business-owners/{owner_id}/tax-statistics"))
            .with_query(query.to_query_pairs());
        self.call(request).await
    }

    // ========================================================================
    // List endpoints
    // ========================================================================

    pub fn business_owners(&self) -> Endpoint<C, AdminBusinessOwner> {
        Endpoint::for_view(self.client.clone(), &BusinessOwnersView)
    }

    pub fn invoices_in(&self, owner_id: &str) -> Endpoint<C, AdminInvoiceIn> {
        Endpoint::for_view(self.client.clone(), &InvoicesInView::new(owner_id))
    }

    pub fn output_invoices(&self, owner_id: &str) -> Endpoint<C, AdminOutputInvoice> {
        Endpoint::for_view(self.client.clone(), &OutputInvoicesView::new(owner_id))
    }

    pub fn storage_items(&self, owner_id: &str) -> Endpoint<C, AdminStorageItem> {
        Endpoint::for_view(self.client.clone(), &StorageItemsView::new(owner_id))
    }

    pub fn products(&self, owner_id: &str) -> Endpoint<C, AdminProduct> {
        Endpoint::for_view(self.client.clone(), &ProductsView::new(owner_id))
    }

    pub fn accountants(&self) -> Endpoint<C, AdminAccountant> {
        Endpoint::for_view(self.client.clone(), &AccountantsView)
    }

    pub fn users(&self) -> Endpoint<C, AdminUser> {
        Endpoint::for_view(self.client.clone(), &UsersView)
    }

    /// Controller for `view`, fetching through this client and stopping when
    /// the session ends.
    pub fn controller<V: ListView>(&self, view: V) -> QueryController<V> {
        let mut controller = QueryController::for_client(view, self.client.clone());
        if let Some(limit) = self.page_size {
            controller = controller.with_page_size(limit);
        }
        controller.watch_session(self.client.session());
        controller
    }
}
