use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::domain::catalog::{CategoryRecord, RegionRecord, ServiceCatalogEntry};
use crate::domain::company::{CompanyFields, CompanySummary};
use crate::domain::customer::{CustomerFields, CustomerSummary};
use crate::domain::deal::{DealId, DealRecord};
use crate::draft::{Cascade, DealDraft, DraftAction, DraftDefaults, OfferingMode};
use crate::errors::ApplicationError;
use crate::offering::{CategoryServiceCache, PackageResolver, PricingEngine};
use crate::payload::{compose_create, compose_update, DealPayload, OfferingSelection};
use crate::remote::{RemoteError, RemoteOps, SubmitReceipt};
use crate::resolve::EntityResolver;
use crate::session::SessionIdentity;
use crate::wizard::steps::{self, FieldErrors, WizardStep};

#[derive(Clone, Debug)]
pub enum WizardMode {
    Create,
    Edit { prior: DealRecord },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced(WizardStep),
    /// The final step validated clean; the caller should submit.
    Complete,
    Blocked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { deal_id: Option<DealId> },
    Updated,
    /// The remote rejected the submission (or was unreachable). The draft is
    /// left intact for correction and resubmission.
    Rejected { message: String },
    /// A step failed validation; the wizard jumped back to it.
    Blocked { step: WizardStep },
}

/// The step state machine. Owns the accumulated draft, runs per-step
/// validation, gates forward transitions, and drives the dependent fetchers
/// as inputs change. All mutation happens on the single interaction task;
/// handlers run to completion before the next event is processed.
pub struct WizardController {
    backend: Arc<dyn RemoteOps>,
    session: SessionIdentity,
    correlation_id: String,
    mode: WizardMode,
    step: WizardStep,
    draft: DealDraft,
    errors: FieldErrors,
    form_error: Option<String>,
    company: EntityResolver<CompanySummary, CompanyFields>,
    customer: EntityResolver<CustomerSummary, CustomerFields>,
    catalog_cache: CategoryServiceCache,
    services: Vec<ServiceCatalogEntry>,
    categories: Vec<CategoryRecord>,
    regions: Vec<RegionRecord>,
    pricing: PricingEngine,
    packages: PackageResolver,
}

impl WizardController {
    fn build(
        backend: Arc<dyn RemoteOps>,
        session: SessionIdentity,
        search: &SearchConfig,
        mode: WizardMode,
        draft: DealDraft,
    ) -> Self {
        let debounce = Duration::from_millis(search.debounce_ms);
        Self {
            backend,
            session,
            correlation_id: Uuid::new_v4().simple().to_string(),
            mode,
            step: WizardStep::Company,
            draft,
            errors: FieldErrors::new(),
            form_error: None,
            company: EntityResolver::new("company", debounce, search.page_size),
            customer: EntityResolver::new("customer", debounce, search.page_size),
            catalog_cache: CategoryServiceCache::new(),
            services: Vec::new(),
            categories: Vec::new(),
            regions: Vec::new(),
            pricing: PricingEngine::new(),
            packages: PackageResolver::new(),
        }
    }

    /// Open a fresh wizard, optionally pre-filled from caller-supplied
    /// defaults (e.g. a catalog "learn more" action).
    pub async fn open_create(
        backend: Arc<dyn RemoteOps>,
        session: SessionIdentity,
        search: &SearchConfig,
        defaults: Option<DraftDefaults>,
    ) -> Self {
        let mut draft = defaults.map(DealDraft::from_defaults).unwrap_or_default();
        if draft.service_region.is_none() {
            draft.service_region = session.default_region.clone();
        }
        let mut controller = Self::build(backend, session, search, WizardMode::Create, draft);
        controller.load_reference_data().await;
        controller.reload_services().await;
        controller.refresh_offering().await;
        info!(
            event_name = "wizard.opened",
            correlation_id = %controller.correlation_id,
            mode = "create",
            "wizard session opened"
        );
        controller
    }

    /// Open the wizard against an existing deal. The draft is hydrated from
    /// the remote record before any input is accepted; failure here is fatal
    /// because there is nothing sensible to edit.
    pub async fn open_edit(
        backend: Arc<dyn RemoteOps>,
        session: SessionIdentity,
        search: &SearchConfig,
        deal_id: &DealId,
    ) -> Result<Self, ApplicationError> {
        let prior = backend.deal_detail(deal_id).await?;
        let draft = DealDraft::from_record(&prior);
        let mut controller =
            Self::build(backend, session, search, WizardMode::Edit { prior: prior.clone() }, draft);
        controller.company.mark_existing(
            prior.company_id.0.clone(),
            CompanyFields {
                name: prior.company_name.clone(),
                tax_id: prior.company_tax_id.clone(),
                contact: prior.company_contact.clone(),
                email: prior.company_email.clone(),
                region: prior.company_region.clone(),
                district: prior.company_district.clone(),
                language: prior.company_language.clone(),
            },
        );
        controller.customer.mark_existing(
            prior.customer_id.0.clone(),
            CustomerFields {
                name: prior.customer_name.clone(),
                contact: prior.customer_contact.clone(),
                email: prior.customer_email.clone(),
                region: prior.customer_region.clone(),
                district: prior.customer_district.clone(),
                language: prior.customer_language.clone(),
                contact_consent: prior.contact_consent,
                closure_date: prior.closure_date,
            },
        );
        controller.load_reference_data().await;
        controller.reload_services().await;
        controller.refresh_offering().await;
        info!(
            event_name = "wizard.opened",
            correlation_id = %controller.correlation_id,
            mode = "edit",
            deal_id = %prior.deal_id.0,
            "wizard session opened"
        );
        Ok(controller)
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &DealDraft {
        &self.draft
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn company(&self) -> &EntityResolver<CompanySummary, CompanyFields> {
        &self.company
    }

    pub fn company_mut(&mut self) -> &mut EntityResolver<CompanySummary, CompanyFields> {
        &mut self.company
    }

    pub fn customer(&self) -> &EntityResolver<CustomerSummary, CustomerFields> {
        &self.customer
    }

    pub fn customer_mut(&mut self) -> &mut EntityResolver<CustomerSummary, CustomerFields> {
        &mut self.customer
    }

    pub fn services(&self) -> &[ServiceCatalogEntry] {
        &self.services
    }

    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    pub fn regions(&self) -> &[RegionRecord] {
        &self.regions
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    pub fn packages(&self) -> &PackageResolver {
        &self.packages
    }

    /// District options for a region value as entered in a form field.
    /// Always a subset of the selected region's own districts.
    pub fn districts_for(&self, region: &str) -> &[String] {
        self.regions
            .iter()
            .find(|record| record.region_id.0 == region || record.name == region)
            .map(|record| record.districts.as_slice())
            .unwrap_or(&[])
    }

    /// Run the validator for the current step. On failure the field errors
    /// are populated and the step does not change; on success the errors for
    /// the step being left are cleared.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let errors = steps::validate(self.step, &self.draft);
        if !errors.is_empty() {
            info!(
                event_name = "wizard.advance_blocked",
                step = ?self.step,
                missing = errors.len(),
                "step validation failed"
            );
            self.errors = errors;
            return AdvanceOutcome::Blocked;
        }
        self.errors.clear();
        match self.step.next() {
            Some(next) => {
                info!(event_name = "wizard.advanced", from = ?self.step, to = ?next, "step advanced");
                self.step = next;
                AdvanceOutcome::Advanced(next)
            }
            None => AdvanceOutcome::Complete,
        }
    }

    /// Move back one step. Always succeeds and never clears entered data or
    /// errors of the step being revisited.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            info!(event_name = "wizard.retreated", from = ?self.step, to = ?previous, "step retreated");
            self.step = previous;
        }
        self.step
    }

    /// Apply one field mutation and run whatever cascades it requires.
    pub async fn update_field(&mut self, action: DraftAction) {
        let cascades = self.draft.apply(action);
        for cascade in cascades {
            match cascade {
                Cascade::ReloadServices => self.reload_services().await,
                Cascade::RefreshOffering => self.refresh_offering().await,
            }
        }
    }

    /// Debounced company search: waits the window, then fetches and applies
    /// unless a newer query superseded this one meanwhile.
    pub async fn search_companies(&mut self, text: &str) {
        let ticket = self.company.search_mut().begin(text);
        self.company.search().wait_debounce().await;
        if !self.company.search().is_current(&ticket) {
            return;
        }
        let page_size = self.company.search().page_size();
        let result = self.backend.search_companies(ticket.query(), ticket.page(), page_size).await;
        self.company.search_mut().accept(&ticket, result);
    }

    pub async fn load_more_companies(&mut self) {
        let Some(ticket) = self.company.search_mut().begin_load_more() else {
            return;
        };
        let page_size = self.company.search().page_size();
        let result = self.backend.search_companies(ticket.query(), ticket.page(), page_size).await;
        self.company.search_mut().accept(&ticket, result);
    }

    pub async fn search_customers(&mut self, text: &str) {
        let ticket = self.customer.search_mut().begin(text);
        self.customer.search().wait_debounce().await;
        if !self.customer.search().is_current(&ticket) {
            return;
        }
        let page_size = self.customer.search().page_size();
        let result = self.backend.search_customers(ticket.query(), ticket.page(), page_size).await;
        self.customer.search_mut().accept(&ticket, result);
    }

    pub async fn load_more_customers(&mut self) {
        let Some(ticket) = self.customer.search_mut().begin_load_more() else {
            return;
        };
        let page_size = self.customer.search().page_size();
        let result = self.backend.search_customers(ticket.query(), ticket.page(), page_size).await;
        self.customer.search_mut().accept(&ticket, result);
    }

    /// Select an existing company: hydrate its record, overwrite the draft's
    /// company fields, and donate its linked customers to the customer
    /// resolver's candidate pool.
    pub async fn select_company(&mut self, candidate: &CompanySummary) {
        let detail = self.backend.company_detail(&candidate.company_id).await;
        let linked_customers = detail.as_ref().map(|record| record.customers.clone()).ok();
        self.company.select(candidate, async move { detail.map(|record| record.fields()) }).await;
        self.sync_company_fields();
        if let Some(customers) = linked_customers {
            self.customer.seed_candidates(customers);
        }
    }

    pub async fn select_customer(&mut self, candidate: &CustomerSummary) {
        let detail = self.backend.customer_detail(&candidate.customer_id).await;
        self.customer.select(candidate, async move { detail.map(|record| record.fields()) }).await;
        self.sync_customer_fields();
    }

    pub fn clear_company_to_new_entry(&mut self) {
        self.company.clear_to_new_entry();
        self.draft.company_name.clear();
        self.draft.company_tax_id.clear();
        self.draft.company_contact.clear();
        self.draft.company_email.clear();
        self.draft.company_region.clear();
        self.draft.company_district.clear();
        self.draft.company_language.clear();
    }

    pub fn clear_customer_to_new_entry(&mut self) {
        self.customer.clear_to_new_entry();
        self.draft.customer_name.clear();
        self.draft.customer_contact.clear();
        self.draft.customer_email.clear();
        self.draft.customer_region.clear();
        self.draft.customer_district.clear();
        self.draft.customer_language.clear();
        self.draft.contact_consent = false;
        self.draft.closure_date = None;
    }

    /// Validate every step, compose the create- or update-shaped body, and
    /// submit it. A rejection becomes a form-level message and the draft is
    /// kept for retry.
    pub async fn submit(&mut self) -> SubmitOutcome {
        for step in WizardStep::ALL {
            let errors = steps::validate(step, &self.draft);
            if !errors.is_empty() {
                info!(
                    event_name = "wizard.submit_blocked",
                    step = ?step,
                    missing = errors.len(),
                    "submission blocked by step validation"
                );
                self.step = step;
                self.errors = errors;
                return SubmitOutcome::Blocked { step };
            }
        }

        let receipt = match self.draft.mode {
            OfferingMode::Individual => {
                let selection = OfferingSelection::Individual {
                    quotes: self.pricing.quotes(),
                    catalog: &self.services,
                    category: self.current_category_record(),
                };
                self.dispatch(selection).await
            }
            OfferingMode::Package => {
                let Some(package_id) = self.draft.selected_package_id.clone() else {
                    return self.reject("no package selected".to_string());
                };
                let Some(offering) = self.packages.find(&package_id) else {
                    return self.reject("the selected package is no longer offered".to_string());
                };
                let selection = OfferingSelection::Package {
                    offering,
                    cadence: self.draft.billing_cadence.unwrap_or_default(),
                };
                self.dispatch(selection).await
            }
        };

        match receipt {
            Ok(receipt) if receipt.success => {
                self.form_error = None;
                info!(
                    event_name = "wizard.submitted",
                    correlation_id = %self.correlation_id,
                    "deal submission accepted"
                );
                match &self.mode {
                    WizardMode::Create => SubmitOutcome::Created { deal_id: receipt.deal_id },
                    WizardMode::Edit { .. } => SubmitOutcome::Updated,
                }
            }
            Ok(receipt) => {
                let message =
                    receipt.message.unwrap_or_else(|| "the submission was rejected".to_string());
                self.reject(message)
            }
            Err(error) => {
                warn!(
                    event_name = "wizard.submit_failed",
                    correlation_id = %self.correlation_id,
                    error = %error,
                    "deal submission did not reach the remote"
                );
                self.reject(format!("submission failed: {error}"))
            }
        }
    }

    fn reject(&mut self, message: String) -> SubmitOutcome {
        self.form_error = Some(message.clone());
        SubmitOutcome::Rejected { message }
    }

    async fn dispatch(
        &self,
        selection: OfferingSelection<'_>,
    ) -> Result<SubmitReceipt, RemoteError> {
        let payload = match &self.mode {
            WizardMode::Create => DealPayload::Create(compose_create(
                &self.draft,
                self.company.reference(),
                self.customer.reference(),
                selection,
                &self.session,
            )),
            WizardMode::Edit { prior } => {
                DealPayload::Update(compose_update(&self.draft, prior, selection))
            }
        };
        match &payload {
            DealPayload::Create(request) => self.backend.create_deal(request).await,
            DealPayload::Update(request) => self.backend.update_deal(request).await,
        }
    }

    fn current_category_record(&self) -> Option<&CategoryRecord> {
        let category = self.draft.category.as_ref()?;
        self.categories.iter().find(|record| &record.category_id == category)
    }

    fn sync_company_fields(&mut self) {
        let fields = self.company.reference().fields().clone();
        self.draft.company_name = fields.name;
        self.draft.company_tax_id = fields.tax_id;
        self.draft.company_contact = fields.contact;
        self.draft.company_email = fields.email;
        self.draft.company_region = fields.region;
        self.draft.company_district = fields.district;
        self.draft.company_language = fields.language;
    }

    fn sync_customer_fields(&mut self) {
        let fields = self.customer.reference().fields().clone();
        self.draft.customer_name = fields.name;
        self.draft.customer_contact = fields.contact;
        self.draft.customer_email = fields.email;
        self.draft.customer_region = fields.region;
        self.draft.customer_district = fields.district;
        self.draft.customer_language = fields.language;
        self.draft.contact_consent = fields.contact_consent;
        self.draft.closure_date = fields.closure_date;
    }

    async fn load_reference_data(&mut self) {
        match self.backend.list_regions().await {
            Ok(regions) => self.regions = regions,
            Err(error) => {
                warn!(
                    event_name = "wizard.regions_unavailable",
                    error = %error,
                    "region list failed; district options will be empty"
                );
            }
        }
        match self.backend.list_service_categories().await {
            Ok(categories) => self.categories = categories,
            Err(error) => {
                warn!(
                    event_name = "wizard.categories_unavailable",
                    error = %error,
                    "category list failed"
                );
            }
        }
    }

    async fn reload_services(&mut self) {
        match self.draft.category.clone() {
            Some(category) => {
                self.services = self.catalog_cache.services(&category, self.backend.as_ref()).await;
            }
            None => self.services.clear(),
        }
    }

    async fn refresh_offering(&mut self) {
        match self.draft.mode {
            OfferingMode::Individual => {
                let ticket = self
                    .pricing
                    .rekey(self.draft.service_region.as_ref(), &self.draft.selected_service_ids);
                if let Some(ticket) = ticket {
                    let result =
                        self.backend.quote_pricing(&ticket.key.region, &ticket.key.service_ids).await;
                    self.pricing.accept(&ticket, result);
                }
            }
            OfferingMode::Package => {
                let ticket = self.packages.rekey(self.draft.service_region.as_ref());
                if let Some(ticket) = ticket {
                    let result = self.backend.list_packages(&ticket.region).await;
                    self.packages.accept(&ticket, result);
                }
            }
        }
    }
}
