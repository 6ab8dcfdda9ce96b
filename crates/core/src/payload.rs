use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CategoryId, CategoryRecord, ServiceCatalogEntry, ServiceId};
use crate::domain::company::{CompanyFields, CompanyId};
use crate::domain::customer::{CustomerFields, CustomerId};
use crate::domain::deal::{DealId, DealRecord, DealType};
use crate::domain::package::{BillingCadence, PackageId, PackageOffering};
use crate::domain::pricing::PricingQuote;
use crate::draft::DealDraft;
use crate::offering::packages::line_totals;
use crate::resolve::EntityReference;
use crate::session::SessionIdentity;

/// One flattened service line of a submission. Package services expand into
/// the same shape as individually selected ones, so downstream consumers
/// never branch on the offering's origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub service_id: ServiceId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub professional_fee: Decimal,
    pub vendor_fee: Decimal,
    pub contractor_fee: Decimal,
    pub govt_fee: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<PackageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

/// New/existing duality for the company sub-object: an existing company is
/// referenced by id only, a new one ships the full entered fields for
/// server-side creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CompanyPayload {
    Existing { is_existing: bool, existing_company_id: CompanyId },
    New {
        is_existing: bool,
        name: String,
        tax_id: String,
        contact: String,
        email: String,
        region: String,
        district: String,
        language: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CustomerPayload {
    Existing { is_existing: bool, existing_customer_id: CustomerId },
    New {
        is_existing: bool,
        name: String,
        contact: String,
        email: String,
        region: String,
        district: String,
        language: String,
        contact_consent: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        closure_date: Option<NaiveDate>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateDealRequest {
    pub deal_type: DealType,
    pub associate_id: String,
    pub franchise_id: String,
    pub company: CompanyPayload,
    pub customer: CustomerPayload,
    pub services: Vec<ServiceLine>,
}

/// Update bodies are flatter: the prior deal's identifiers and original
/// conversion timestamp are carried unchanged, and no creation payloads are
/// re-sent for entities that already exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateDealRequest {
    pub deal_id: DealId,
    pub deal_type: DealType,
    pub company_id: CompanyId,
    pub customer_id: CustomerId,
    pub converted_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_email: String,
    pub customer_region: String,
    pub customer_district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closure_date: Option<NaiveDate>,
    pub services: Vec<ServiceLine>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DealPayload {
    Create(CreateDealRequest),
    Update(UpdateDealRequest),
}

/// The offering the Service step settled on, with the lookup data needed to
/// name its lines.
#[derive(Clone, Copy, Debug)]
pub enum OfferingSelection<'a> {
    Individual {
        quotes: &'a [PricingQuote],
        catalog: &'a [ServiceCatalogEntry],
        category: Option<&'a CategoryRecord>,
    },
    Package { offering: &'a PackageOffering, cadence: BillingCadence },
}

pub fn service_lines(selection: OfferingSelection<'_>) -> Vec<ServiceLine> {
    match selection {
        OfferingSelection::Individual { quotes, catalog, category } => quotes
            .iter()
            .map(|quote| {
                let entry = catalog.iter().find(|entry| entry.service_id == quote.service_id);
                ServiceLine {
                    service_id: quote.service_id.clone(),
                    name: entry.map(|entry| entry.name.clone()).unwrap_or_default(),
                    category_id: entry
                        .map(|entry| entry.category_id.clone())
                        .or_else(|| category.map(|record| record.category_id.clone())),
                    category_name: category.map(|record| record.name.clone()),
                    professional_fee: quote.professional_fee,
                    vendor_fee: quote.vendor_fee,
                    contractor_fee: quote.contractor_fee,
                    govt_fee: quote.govt_fee,
                    total: quote.total(),
                    package_id: None,
                    package_name: None,
                }
            })
            .collect(),
        OfferingSelection::Package { offering, cadence } => line_totals(offering, cadence)
            .into_iter()
            .map(|line| ServiceLine {
                service_id: line.service_id,
                name: line.name,
                category_id: None,
                category_name: None,
                professional_fee: Decimal::ZERO,
                vendor_fee: Decimal::ZERO,
                contractor_fee: Decimal::ZERO,
                govt_fee: Decimal::ZERO,
                total: line.fee,
                package_id: Some(offering.package_id.clone()),
                package_name: Some(offering.name.clone()),
            })
            .collect(),
    }
}

fn company_payload(reference: &EntityReference<CompanyFields>, draft: &DealDraft) -> CompanyPayload {
    match reference {
        EntityReference::Existing { id, .. } => CompanyPayload::Existing {
            is_existing: true,
            existing_company_id: CompanyId(id.clone()),
        },
        EntityReference::New { .. } => CompanyPayload::New {
            is_existing: false,
            name: draft.company_name.clone(),
            tax_id: draft.company_tax_id.clone(),
            contact: draft.company_contact.clone(),
            email: draft.company_email.clone(),
            region: draft.company_region.clone(),
            district: draft.company_district.clone(),
            language: draft.company_language.clone(),
        },
    }
}

fn customer_payload(
    reference: &EntityReference<CustomerFields>,
    draft: &DealDraft,
) -> CustomerPayload {
    match reference {
        EntityReference::Existing { id, .. } => CustomerPayload::Existing {
            is_existing: true,
            existing_customer_id: CustomerId(id.clone()),
        },
        EntityReference::New { .. } => CustomerPayload::New {
            is_existing: false,
            name: draft.customer_name.clone(),
            contact: draft.customer_contact.clone(),
            email: draft.customer_email.clone(),
            region: draft.customer_region.clone(),
            district: draft.customer_district.clone(),
            language: draft.customer_language.clone(),
            contact_consent: draft.contact_consent,
            closure_date: draft.closure_date,
        },
    }
}

/// Build the create-shaped body from the accumulated wizard state. Ownership
/// fields come from the injected session identity.
pub fn compose_create(
    draft: &DealDraft,
    company: &EntityReference<CompanyFields>,
    customer: &EntityReference<CustomerFields>,
    selection: OfferingSelection<'_>,
    session: &SessionIdentity,
) -> CreateDealRequest {
    CreateDealRequest {
        deal_type: draft.mode.into(),
        associate_id: session.associate_id.clone(),
        franchise_id: session.franchise_id.clone(),
        company: company_payload(company, draft),
        customer: customer_payload(customer, draft),
        services: service_lines(selection),
    }
}

/// Build the update-shaped body: prior identifiers unchanged, current step
/// values, freshly rebuilt service lines.
pub fn compose_update(
    draft: &DealDraft,
    prior: &DealRecord,
    selection: OfferingSelection<'_>,
) -> UpdateDealRequest {
    UpdateDealRequest {
        deal_id: prior.deal_id.clone(),
        deal_type: draft.mode.into(),
        company_id: prior.company_id.clone(),
        customer_id: prior.customer_id.clone(),
        converted_at: prior.converted_at,
        customer_name: draft.customer_name.clone(),
        customer_contact: draft.customer_contact.clone(),
        customer_email: draft.customer_email.clone(),
        customer_region: draft.customer_region.clone(),
        customer_district: draft.customer_district.clone(),
        closure_date: draft.closure_date,
        services: service_lines(selection),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{compose_create, compose_update, service_lines, OfferingSelection};
    use crate::domain::catalog::{CategoryId, CategoryRecord, ServiceCatalogEntry, ServiceId};
    use crate::domain::company::CompanyFields;
    use crate::domain::customer::CustomerFields;
    use crate::domain::deal::{DealId, DealRecord, DealType};
    use crate::domain::package::{BillingCadence, PackageId, PackageOffering, PackageService};
    use crate::domain::pricing::PricingQuote;
    use crate::draft::{DealDraft, DraftAction, OfferingMode};
    use crate::resolve::EntityReference;
    use crate::session::SessionIdentity;

    fn quote(id: &str) -> PricingQuote {
        PricingQuote {
            service_id: ServiceId(id.to_string()),
            professional_fee: Decimal::new(1_000, 2),
            vendor_fee: Decimal::new(200, 2),
            contractor_fee: Decimal::new(300, 2),
            govt_fee: Decimal::new(500, 2),
        }
    }

    fn catalog_entry(id: &str) -> ServiceCatalogEntry {
        ServiceCatalogEntry {
            service_id: ServiceId(id.to_string()),
            name: format!("Service {id}"),
            category_id: CategoryId("5".to_string()),
            code: format!("CODE-{id}"),
            description: String::new(),
        }
    }

    fn entered_draft() -> DealDraft {
        let mut draft = DealDraft::default();
        draft.apply(DraftAction::SetCompanyName("Acme Logistics".to_string()));
        draft.apply(DraftAction::SetCompanyRegion("Kerala".to_string()));
        draft.apply(DraftAction::SetCompanyDistrict("Ernakulam".to_string()));
        draft.apply(DraftAction::SetCustomerName("Priya Nair".to_string()));
        draft.apply(DraftAction::SetCustomerContact("9447000111".to_string()));
        draft.apply(DraftAction::SetCustomerEmail("priya@example.in".to_string()));
        draft.apply(DraftAction::SetCustomerRegion("Kerala".to_string()));
        draft.apply(DraftAction::SetCustomerDistrict("Ernakulam".to_string()));
        draft.apply(DraftAction::SetClosureDate(NaiveDate::from_ymd_opt(2026, 9, 30)));
        draft
    }

    #[test]
    fn create_body_mixes_new_company_with_existing_customer_reference() {
        let draft = entered_draft();
        let company = EntityReference::New { fields: CompanyFields::default() };
        let customer = EntityReference::Existing {
            id: "7".to_string(),
            fields: CustomerFields::default(),
        };
        let quotes = [quote("SVC-1")];
        let catalog = [catalog_entry("SVC-1")];
        let session = SessionIdentity::new("ASSOC-9", "FR-1");

        let request = compose_create(
            &draft,
            &company,
            &customer,
            OfferingSelection::Individual { quotes: &quotes, catalog: &catalog, category: None },
            &session,
        );

        let body = serde_json::to_value(&request).expect("serializable request");
        assert_eq!(body["company"]["name"], "Acme Logistics");
        assert_eq!(body["company"]["is_existing"], false);
        assert!(body["company"].get("existing_company_id").is_none());

        assert_eq!(body["customer"]["existing_customer_id"], "7");
        assert_eq!(body["customer"]["is_existing"], true);
        assert!(
            body["customer"].get("name").is_none(),
            "existing customer must not carry a generated name overwrite"
        );

        assert_eq!(body["deal_type"], "Individual");
        assert_eq!(body["associate_id"], "ASSOC-9");
        assert_eq!(body["services"][0]["name"], "Service SVC-1");
        assert_eq!(body["services"][0]["category_id"], "5");
    }

    #[test]
    fn package_selection_flattens_into_uniform_service_lines() {
        let offering = PackageOffering {
            package_id: PackageId("PKG-1".to_string()),
            name: "Startup Bundle".to_string(),
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
        };

        let lines = service_lines(OfferingSelection::Package {
            offering: &offering,
            cadence: BillingCadence::Yearly,
        });

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].package_id, Some(PackageId("PKG-1".to_string())));
        assert_eq!(lines[0].package_name.as_deref(), Some("Startup Bundle"));
        assert_eq!(lines[0].total, Decimal::new(100_000, 2));
        assert_eq!(lines[1].total, Decimal::new(50_000, 2));
    }

    #[test]
    fn update_body_carries_prior_identifiers_unchanged() {
        let mut draft = entered_draft();
        draft.apply(DraftAction::SetCustomerName("Priya N".to_string()));

        let prior = DealRecord {
            deal_id: DealId("D-100".to_string()),
            company_id: crate::domain::company::CompanyId("C-42".to_string()),
            customer_id: crate::domain::customer::CustomerId("CU-7".to_string()),
            converted_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
            deal_type: DealType::Individual,
            company_name: "Acme Logistics".to_string(),
            company_tax_id: String::new(),
            company_contact: String::new(),
            company_email: String::new(),
            company_region: "Kerala".to_string(),
            company_district: "Ernakulam".to_string(),
            company_language: String::new(),
            service_region: None,
            category_id: None,
            service_ids: Vec::new(),
            package_id: None,
            billing_cadence: None,
            customer_name: "Priya Nair".to_string(),
            customer_contact: "9447000111".to_string(),
            customer_email: "priya@example.in".to_string(),
            customer_region: "Kerala".to_string(),
            customer_district: "Ernakulam".to_string(),
            customer_language: String::new(),
            contact_consent: true,
            closure_date: None,
        };

        let quotes = [quote("SVC-1")];
        let catalog = [catalog_entry("SVC-1")];
        let request = compose_update(
            &draft,
            &prior,
            OfferingSelection::Individual { quotes: &quotes, catalog: &catalog, category: None },
        );

        assert_eq!(request.deal_id, DealId("D-100".to_string()));
        assert_eq!(request.converted_at, prior.converted_at);
        assert_eq!(request.customer_name, "Priya N");

        let body = serde_json::to_value(&request).expect("serializable request");
        assert!(body.get("company").is_none(), "updates never re-send creation payloads");
        assert_eq!(body["company_id"], "C-42");
        assert_eq!(body["customer_id"], "CU-7");
    }

    #[test]
    fn individual_lines_fall_back_to_the_category_record_for_naming() {
        let quotes = [quote("SVC-9")];
        let category =
            CategoryRecord { category_id: CategoryId("5".to_string()), name: "Tax".to_string() };

        let lines = service_lines(OfferingSelection::Individual {
            quotes: &quotes,
            catalog: &[],
            category: Some(&category),
        });

        assert_eq!(lines[0].category_id, Some(CategoryId("5".to_string())));
        assert_eq!(lines[0].category_name.as_deref(), Some("Tax"));
        assert_eq!(lines[0].total, Decimal::new(2_000, 2));
    }
}
