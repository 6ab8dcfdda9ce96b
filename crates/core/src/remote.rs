use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::{CategoryId, CategoryRecord, RegionId, RegionRecord, ServiceCatalogEntry, ServiceId};
use crate::domain::company::{CompanyId, CompanyRecord, CompanySummary};
use crate::domain::customer::{CustomerId, CustomerRecord, CustomerSummary};
use crate::domain::deal::{DealId, DealRecord};
use crate::domain::package::PackageOffering;
use crate::domain::pricing::PricingQuote;
use crate::payload::{CreateDealRequest, UpdateDealRequest};

/// Failure of a single remote call. Lookup paths treat these as non-fatal
/// (empty result set or summary fallback); only edit-mode seeding and
/// submission surface them to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("remote returned status {code}: {message}")]
    Status { code: u16, message: String },
    #[error("could not decode remote response: {0}")]
    Decode(String),
    #[error("request timed out")]
    Timeout,
}

/// One page of registry search results. `full_page` is the has-more
/// heuristic: the page came back with exactly the requested page size, so a
/// further page may exist. One extra near-empty request at the true end is
/// expected and not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub full_page: bool,
}

impl<T> SearchPage<T> {
    pub fn from_items(items: Vec<T>, page_size: u32) -> Self {
        let full_page = items.len() as u32 >= page_size;
        Self { items, full_page }
    }
}

/// Outcome of a create/update submission. A non-success receipt is data,
/// not an error: the wizard surfaces `message` as a form-level error and
/// keeps the draft intact for correction and resubmission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub success: bool,
    #[serde(default)]
    pub deal_id: Option<DealId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Contract with the remote operations console API.
#[async_trait]
pub trait RemoteOps: Send + Sync {
    async fn search_companies(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage<CompanySummary>, RemoteError>;

    async fn search_customers(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage<CustomerSummary>, RemoteError>;

    async fn company_detail(&self, id: &CompanyId) -> Result<CompanyRecord, RemoteError>;

    async fn customer_detail(&self, id: &CustomerId) -> Result<CustomerRecord, RemoteError>;

    async fn list_regions(&self) -> Result<Vec<RegionRecord>, RemoteError>;

    async fn list_service_categories(&self) -> Result<Vec<CategoryRecord>, RemoteError>;

    async fn list_services_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<ServiceCatalogEntry>, RemoteError>;

    async fn quote_pricing(
        &self,
        region: &RegionId,
        service_ids: &[ServiceId],
    ) -> Result<Vec<PricingQuote>, RemoteError>;

    async fn list_packages(&self, region: &RegionId) -> Result<Vec<PackageOffering>, RemoteError>;

    async fn create_deal(&self, request: &CreateDealRequest) -> Result<SubmitReceipt, RemoteError>;

    async fn update_deal(&self, request: &UpdateDealRequest) -> Result<SubmitReceipt, RemoteError>;

    async fn deal_detail(&self, id: &DealId) -> Result<DealRecord, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::SearchPage;

    #[test]
    fn full_page_heuristic_derives_from_page_size() {
        let full: SearchPage<u32> = SearchPage::from_items(vec![1, 2, 3], 3);
        assert!(full.full_page);

        let short: SearchPage<u32> = SearchPage::from_items(vec![1], 3);
        assert!(!short.full_page);
    }
}
