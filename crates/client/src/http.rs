use std::time::Duration;

use async_trait::async_trait;
use dealdesk_core::config::ApiConfig;
use dealdesk_core::domain::catalog::{
    CategoryId, CategoryRecord, RegionId, RegionRecord, ServiceCatalogEntry, ServiceId,
};
use dealdesk_core::domain::company::{CompanyId, CompanyRecord, CompanySummary};
use dealdesk_core::domain::customer::{CustomerId, CustomerRecord, CustomerSummary};
use dealdesk_core::domain::deal::{DealId, DealRecord};
use dealdesk_core::domain::package::PackageOffering;
use dealdesk_core::domain::pricing::PricingQuote;
use dealdesk_core::payload::{CreateDealRequest, UpdateDealRequest};
use dealdesk_core::remote::{RemoteError, RemoteOps, SearchPage, SubmitReceipt};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Serialize)]
struct QuotePricingBody<'a> {
    region_id: &'a RegionId,
    service_ids: &'a [ServiceId],
}

/// `RemoteOps` over the console's JSON API. One instance per process;
/// cheap to clone (the inner `reqwest::Client` is pooled).
#[derive(Clone)]
pub struct HttpRemoteOps {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpRemoteOps {
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| RemoteError::Transport(error.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.token.expose_secret())
            .header("x-correlation-id", Uuid::new_v4().simple().to_string())
    }

    async fn send<T>(&self, request: RequestBuilder, operation: &'static str) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
    {
        let response = self.authorized(request).send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        debug!(event_name = "remote.call_ok", operation, status = status.as_u16(), "remote call succeeded");
        response
            .json::<T>()
            .await
            .map_err(|error| RemoteError::Decode(error.to_string()))
    }

    /// Submission endpoints: a rejected body still decodes into a receipt so
    /// the wizard can surface the message instead of a raw status error.
    async fn send_submit(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<SubmitReceipt, RemoteError> {
        let response = self.authorized(request).send().await.map_err(map_transport)?;
        let status = response.status();
        if status.is_success() {
            return response
                .json::<SubmitReceipt>()
                .await
                .map_err(|error| RemoteError::Decode(error.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        if let Ok(receipt) = serde_json::from_str::<SubmitReceipt>(&body) {
            warn!(
                event_name = "remote.submit_rejected",
                operation,
                status = status.as_u16(),
                "submission rejected by the remote"
            );
            return Ok(receipt);
        }
        Err(RemoteError::Status { code: status.as_u16(), message: truncate(&body) })
    }
}

fn map_transport(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(error.to_string())
    }
}

async fn status_error(status: StatusCode, response: Response) -> RemoteError {
    let message = response.text().await.unwrap_or_default();
    RemoteError::Status { code: status.as_u16(), message: truncate(&message) }
}

fn truncate(message: &str) -> String {
    const MAX: usize = 200;
    let trimmed = message.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        trimmed[..end].to_string()
    }
}

#[async_trait]
impl RemoteOps for HttpRemoteOps {
    async fn search_companies(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage<CompanySummary>, RemoteError> {
        let items: Vec<CompanySummary> = self
            .send(
                self.client.get(self.url("companies/search")).query(&[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ]),
                "search_companies",
            )
            .await?;
        Ok(SearchPage::from_items(items, page_size))
    }

    async fn search_customers(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage<CustomerSummary>, RemoteError> {
        let items: Vec<CustomerSummary> = self
            .send(
                self.client.get(self.url("customers/search")).query(&[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ]),
                "search_customers",
            )
            .await?;
        Ok(SearchPage::from_items(items, page_size))
    }

    async fn company_detail(&self, id: &CompanyId) -> Result<CompanyRecord, RemoteError> {
        self.send(self.client.get(self.url(&format!("companies/{}", id.0))), "company_detail")
            .await
    }

    async fn customer_detail(&self, id: &CustomerId) -> Result<CustomerRecord, RemoteError> {
        self.send(self.client.get(self.url(&format!("customers/{}", id.0))), "customer_detail")
            .await
    }

    async fn list_regions(&self) -> Result<Vec<RegionRecord>, RemoteError> {
        self.send(self.client.get(self.url("regions")), "list_regions").await
    }

    async fn list_service_categories(&self) -> Result<Vec<CategoryRecord>, RemoteError> {
        self.send(self.client.get(self.url("service-categories")), "list_service_categories").await
    }

    async fn list_services_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<ServiceCatalogEntry>, RemoteError> {
        self.send(
            self.client.get(self.url(&format!("service-categories/{}/services", category.0))),
            "list_services_by_category",
        )
        .await
    }

    async fn quote_pricing(
        &self,
        region: &RegionId,
        service_ids: &[ServiceId],
    ) -> Result<Vec<PricingQuote>, RemoteError> {
        self.send(
            self.client
                .post(self.url("pricing/quote"))
                .json(&QuotePricingBody { region_id: region, service_ids }),
            "quote_pricing",
        )
        .await
    }

    async fn list_packages(&self, region: &RegionId) -> Result<Vec<PackageOffering>, RemoteError> {
        self.send(
            self.client.get(self.url("packages")).query(&[("region", region.0.clone())]),
            "list_packages",
        )
        .await
    }

    async fn create_deal(&self, request: &CreateDealRequest) -> Result<SubmitReceipt, RemoteError> {
        self.send_submit(self.client.post(self.url("deals")).json(request), "create_deal").await
    }

    async fn update_deal(&self, request: &UpdateDealRequest) -> Result<SubmitReceipt, RemoteError> {
        self.send_submit(
            self.client.put(self.url(&format!("deals/{}", request.deal_id.0))).json(request),
            "update_deal",
        )
        .await
    }

    async fn deal_detail(&self, id: &DealId) -> Result<DealRecord, RemoteError> {
        self.send(self.client.get(self.url(&format!("deals/{}", id.0))), "deal_detail").await
    }
}
