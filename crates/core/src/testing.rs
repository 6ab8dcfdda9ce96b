//! In-memory `RemoteOps` double shared by the crate's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::catalog::{
    CategoryId, CategoryRecord, RegionId, RegionRecord, ServiceCatalogEntry, ServiceId,
};
use crate::domain::company::{CompanyId, CompanyRecord, CompanySummary};
use crate::domain::customer::{CustomerId, CustomerRecord, CustomerSummary};
use crate::domain::deal::{DealId, DealRecord};
use crate::domain::package::PackageOffering;
use crate::domain::pricing::PricingQuote;
use crate::payload::{CreateDealRequest, UpdateDealRequest};
use crate::remote::{RemoteError, RemoteOps, SearchPage, SubmitReceipt};

pub struct MockRemote {
    companies: Vec<CompanySummary>,
    customers: Vec<CustomerSummary>,
    company_records: HashMap<String, CompanyRecord>,
    customer_records: HashMap<String, CustomerRecord>,
    regions: Vec<RegionRecord>,
    categories: Vec<CategoryRecord>,
    services: HashMap<String, Vec<ServiceCatalogEntry>>,
    services_error: Option<RemoteError>,
    packages: HashMap<String, Vec<PackageOffering>>,
    deals: HashMap<String, DealRecord>,
    quote_fee: Decimal,
    create_receipt: Mutex<SubmitReceipt>,
    update_receipt: Mutex<SubmitReceipt>,
    service_lookups: AtomicUsize,
    pricing_calls: AtomicUsize,
    package_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    last_create: Mutex<Option<CreateDealRequest>>,
    last_update: Mutex<Option<UpdateDealRequest>>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            customers: Vec::new(),
            company_records: HashMap::new(),
            customer_records: HashMap::new(),
            regions: vec![
                RegionRecord {
                    region_id: RegionId("KL".to_string()),
                    name: "Kerala".to_string(),
                    districts: vec!["Ernakulam".to_string(), "Thrissur".to_string()],
                },
                RegionRecord {
                    region_id: RegionId("TN".to_string()),
                    name: "Tamil Nadu".to_string(),
                    districts: vec!["Chennai".to_string()],
                },
            ],
            categories: vec![CategoryRecord {
                category_id: CategoryId("5".to_string()),
                name: "Tax Services".to_string(),
            }],
            services: HashMap::new(),
            services_error: None,
            packages: HashMap::new(),
            deals: HashMap::new(),
            quote_fee: Decimal::new(10_000, 2),
            create_receipt: Mutex::new(SubmitReceipt {
                success: true,
                deal_id: Some(DealId("D-NEW".to_string())),
                message: None,
            }),
            update_receipt: Mutex::new(SubmitReceipt {
                success: true,
                deal_id: None,
                message: None,
            }),
            service_lookups: AtomicUsize::new(0),
            pricing_calls: AtomicUsize::new(0),
            package_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            last_create: Mutex::new(None),
            last_update: Mutex::new(None),
        }
    }
}

impl MockRemote {
    pub fn with_companies(mut self, companies: Vec<CompanySummary>) -> Self {
        self.companies = companies;
        self
    }

    pub fn with_customers(mut self, customers: Vec<CustomerSummary>) -> Self {
        self.customers = customers;
        self
    }

    pub fn with_company_record(mut self, record: CompanyRecord) -> Self {
        self.company_records.insert(record.company_id.0.clone(), record);
        self
    }

    pub fn with_customer_record(mut self, record: CustomerRecord) -> Self {
        self.customer_records.insert(record.customer_id.0.clone(), record);
        self
    }

    pub fn with_services(mut self, category: &str, entries: Vec<ServiceCatalogEntry>) -> Self {
        self.services.insert(category.to_string(), entries);
        self
    }

    pub fn with_services_error(mut self, error: RemoteError) -> Self {
        self.services_error = Some(error);
        self
    }

    pub fn with_packages(mut self, region: &str, offerings: Vec<PackageOffering>) -> Self {
        self.packages.insert(region.to_string(), offerings);
        self
    }

    pub fn with_deal(mut self, record: DealRecord) -> Self {
        self.deals.insert(record.deal_id.0.clone(), record);
        self
    }

    pub fn with_quote_fee(mut self, fee: Decimal) -> Self {
        self.quote_fee = fee;
        self
    }

    pub fn with_create_receipt(self, receipt: SubmitReceipt) -> Self {
        self.set_create_receipt(receipt);
        self
    }

    pub fn set_create_receipt(&self, receipt: SubmitReceipt) {
        *self.create_receipt.lock().expect("receipt lock") = receipt;
    }

    pub fn service_lookups(&self) -> usize {
        self.service_lookups.load(Ordering::SeqCst)
    }

    pub fn pricing_calls(&self) -> usize {
        self.pricing_calls.load(Ordering::SeqCst)
    }

    pub fn package_calls(&self) -> usize {
        self.package_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn last_create(&self) -> Option<CreateDealRequest> {
        self.last_create.lock().expect("request lock").clone()
    }

    pub fn last_update(&self) -> Option<UpdateDealRequest> {
        self.last_update.lock().expect("request lock").clone()
    }
}

#[async_trait]
impl RemoteOps for MockRemote {
    async fn search_companies(
        &self,
        _query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage<CompanySummary>, RemoteError> {
        let items = if page == 0 { self.companies.clone() } else { Vec::new() };
        Ok(SearchPage::from_items(items, page_size))
    }

    async fn search_customers(
        &self,
        _query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage<CustomerSummary>, RemoteError> {
        let items = if page == 0 { self.customers.clone() } else { Vec::new() };
        Ok(SearchPage::from_items(items, page_size))
    }

    async fn company_detail(&self, id: &CompanyId) -> Result<CompanyRecord, RemoteError> {
        self.company_records
            .get(&id.0)
            .cloned()
            .ok_or_else(|| RemoteError::Status { code: 404, message: "company not found".into() })
    }

    async fn customer_detail(&self, id: &CustomerId) -> Result<CustomerRecord, RemoteError> {
        self.customer_records
            .get(&id.0)
            .cloned()
            .ok_or_else(|| RemoteError::Status { code: 404, message: "customer not found".into() })
    }

    async fn list_regions(&self) -> Result<Vec<RegionRecord>, RemoteError> {
        Ok(self.regions.clone())
    }

    async fn list_service_categories(&self) -> Result<Vec<CategoryRecord>, RemoteError> {
        Ok(self.categories.clone())
    }

    async fn list_services_by_category(
        &self,
        category: &CategoryId,
    ) -> Result<Vec<ServiceCatalogEntry>, RemoteError> {
        self.service_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.services_error {
            return Err(error.clone());
        }
        Ok(self.services.get(&category.0).cloned().unwrap_or_default())
    }

    async fn quote_pricing(
        &self,
        _region: &RegionId,
        service_ids: &[ServiceId],
    ) -> Result<Vec<PricingQuote>, RemoteError> {
        self.pricing_calls.fetch_add(1, Ordering::SeqCst);
        Ok(service_ids
            .iter()
            .map(|id| PricingQuote {
                service_id: id.clone(),
                professional_fee: self.quote_fee,
                vendor_fee: Decimal::ZERO,
                contractor_fee: Decimal::ZERO,
                govt_fee: Decimal::ZERO,
            })
            .collect())
    }

    async fn list_packages(&self, region: &RegionId) -> Result<Vec<PackageOffering>, RemoteError> {
        self.package_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.packages.get(&region.0).cloned().unwrap_or_default())
    }

    async fn create_deal(&self, request: &CreateDealRequest) -> Result<SubmitReceipt, RemoteError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_create.lock().expect("request lock") = Some(request.clone());
        Ok(self.create_receipt.lock().expect("receipt lock").clone())
    }

    async fn update_deal(&self, request: &UpdateDealRequest) -> Result<SubmitReceipt, RemoteError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().expect("request lock") = Some(request.clone());
        Ok(self.update_receipt.lock().expect("receipt lock").clone())
    }

    async fn deal_detail(&self, id: &DealId) -> Result<DealRecord, RemoteError> {
        self.deals
            .get(&id.0)
            .cloned()
            .ok_or_else(|| RemoteError::Status { code: 404, message: "deal not found".into() })
    }
}

/// Shared record builders for wizard-level tests.
pub mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::domain::catalog::{CategoryId, RegionId, ServiceCatalogEntry, ServiceId};
    use crate::domain::company::{CompanyId, CompanyRecord, CompanySummary};
    use crate::domain::customer::{CustomerId, CustomerRecord, CustomerSummary};
    use crate::domain::deal::{DealId, DealRecord, DealType};
    use crate::domain::package::{PackageId, PackageOffering, PackageService};

    pub fn company_summary(id: &str, name: &str) -> CompanySummary {
        CompanySummary {
            company_id: CompanyId(id.to_string()),
            name: name.to_string(),
            contact: "9876543210".to_string(),
            tax_id: "GSTIN-22AAAAA".to_string(),
        }
    }

    pub fn company_record(id: &str, name: &str) -> CompanyRecord {
        CompanyRecord {
            company_id: CompanyId(id.to_string()),
            name: name.to_string(),
            tax_id: "GSTIN-22AAAAA".to_string(),
            contact: "9876543210".to_string(),
            email: "ops@acme.in".to_string(),
            region: "Kerala".to_string(),
            district: "Ernakulam".to_string(),
            language: "ml".to_string(),
            customers: vec![customer_summary("CU-7", "Priya Nair")],
        }
    }

    pub fn customer_summary(id: &str, name: &str) -> CustomerSummary {
        CustomerSummary {
            customer_id: CustomerId(id.to_string()),
            name: name.to_string(),
            contact: "9447000111".to_string(),
            email: "priya@example.in".to_string(),
        }
    }

    pub fn customer_record(id: &str, name: &str) -> CustomerRecord {
        CustomerRecord {
            customer_id: CustomerId(id.to_string()),
            name: name.to_string(),
            contact: "9447000111".to_string(),
            email: "priya@example.in".to_string(),
            region: "Kerala".to_string(),
            district: "Ernakulam".to_string(),
            language: "ml".to_string(),
            contact_consent: true,
            closure_date: NaiveDate::from_ymd_opt(2026, 9, 30),
        }
    }

    pub fn catalog_entry(id: &str, category: &str) -> ServiceCatalogEntry {
        ServiceCatalogEntry {
            service_id: ServiceId(id.to_string()),
            name: format!("Service {id}"),
            category_id: CategoryId(category.to_string()),
            code: format!("CODE-{id}"),
            description: String::new(),
        }
    }

    pub fn package_offering(id: &str, name: &str) -> PackageOffering {
        PackageOffering {
            package_id: PackageId(id.to_string()),
            name: name.to_string(),
            services: vec![
                PackageService {
                    service_id: ServiceId("SVC-1".to_string()),
                    name: "Registration".to_string(),
                    monthly_fee: Decimal::new(10_000, 2),
                    yearly_fee: Decimal::new(100_000, 2),
                },
                PackageService {
                    service_id: ServiceId("SVC-2".to_string()),
                    name: "Filing".to_string(),
                    monthly_fee: Decimal::new(5_000, 2),
                    yearly_fee: Decimal::new(50_000, 2),
                },
            ],
        }
    }

    pub fn deal_record(deal_id: &str, company_id: &str, customer_id: &str) -> DealRecord {
        DealRecord {
            deal_id: DealId(deal_id.to_string()),
            company_id: CompanyId(company_id.to_string()),
            customer_id: CustomerId(customer_id.to_string()),
            converted_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
            deal_type: DealType::Individual,
            company_name: "Acme Logistics".to_string(),
            company_tax_id: "GSTIN-22AAAAA".to_string(),
            company_contact: "9876543210".to_string(),
            company_email: "ops@acme.in".to_string(),
            company_region: "Kerala".to_string(),
            company_district: "Ernakulam".to_string(),
            company_language: "ml".to_string(),
            service_region: Some(RegionId("KL".to_string())),
            category_id: Some(CategoryId("5".to_string())),
            service_ids: vec![ServiceId("SVC-1".to_string())],
            package_id: None,
            billing_cadence: None,
            customer_name: "Priya Nair".to_string(),
            customer_contact: "9447000111".to_string(),
            customer_email: "priya@example.in".to_string(),
            customer_region: "Kerala".to_string(),
            customer_district: "Ernakulam".to_string(),
            customer_language: "ml".to_string(),
            contact_consent: true,
            closure_date: NaiveDate::from_ymd_opt(2026, 9, 30),
        }
    }
}
