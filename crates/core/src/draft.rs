use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CategoryId, RegionId, ServiceId};
use crate::domain::deal::{DealRecord, DealType};
use crate::domain::package::{BillingCadence, PackageId};

/// Which offering shape the Service step is building. Mirrors `DealType` on
/// the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferingMode {
    #[default]
    Individual,
    Package,
}

impl From<OfferingMode> for DealType {
    fn from(value: OfferingMode) -> Self {
        match value {
            OfferingMode::Individual => DealType::Individual,
            OfferingMode::Package => DealType::Package,
        }
    }
}

impl From<DealType> for OfferingMode {
    fn from(value: DealType) -> Self {
        match value {
            DealType::Individual => OfferingMode::Individual,
            DealType::Package => OfferingMode::Package,
        }
    }
}

/// The single mutable form model for one wizard session. Field groups map
/// one-to-one onto the three steps; everything starts empty and is destroyed
/// with the wizard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealDraft {
    // Company step
    pub company_name: String,
    pub company_tax_id: String,
    pub company_contact: String,
    pub company_email: String,
    pub company_region: String,
    pub company_district: String,
    pub company_language: String,

    // Service step
    pub service_region: Option<RegionId>,
    pub mode: OfferingMode,
    pub category: Option<CategoryId>,
    pub selected_service_ids: Vec<ServiceId>,
    pub selected_package_id: Option<PackageId>,
    pub billing_cadence: Option<BillingCadence>,

    // Customer step
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_email: String,
    pub customer_region: String,
    pub customer_district: String,
    pub customer_language: String,
    pub contact_consent: bool,
    pub closure_date: Option<NaiveDate>,
}

/// Caller-supplied prefill for a fresh wizard (e.g. arriving from a catalog
/// "learn more" action with a service already chosen).
#[derive(Clone, Debug, Default)]
pub struct DraftDefaults {
    pub service_region: Option<RegionId>,
    pub mode: Option<OfferingMode>,
    pub category: Option<CategoryId>,
    pub service_ids: Vec<ServiceId>,
    pub package_id: Option<PackageId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftAction {
    SetCompanyName(String),
    SetCompanyTaxId(String),
    SetCompanyContact(String),
    SetCompanyEmail(String),
    SetCompanyRegion(String),
    SetCompanyDistrict(String),
    SetCompanyLanguage(String),

    SetServiceRegion(Option<RegionId>),
    SetMode(OfferingMode),
    SetCategory(Option<CategoryId>),
    ToggleService(ServiceId),
    SelectPackage(Option<PackageId>),
    SetBillingCadence(Option<BillingCadence>),

    SetCustomerName(String),
    SetCustomerContact(String),
    SetCustomerEmail(String),
    SetCustomerRegion(String),
    SetCustomerDistrict(String),
    SetCustomerLanguage(String),
    SetContactConsent(bool),
    SetClosureDate(Option<NaiveDate>),
}

/// Downstream work a reducer step requires. The controller maps these onto
/// the cascading fetchers; the reducer itself stays pure and synchronous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cascade {
    /// The active category changed: the service list must be (re)loaded.
    ReloadServices,
    /// The offering inputs changed: pricing (individual mode) or the package
    /// list (package mode) must be refreshed.
    RefreshOffering,
}

impl DealDraft {
    /// Seed a fresh draft from caller-supplied defaults.
    pub fn from_defaults(defaults: DraftDefaults) -> Self {
        Self {
            service_region: defaults.service_region,
            mode: defaults.mode.unwrap_or_default(),
            category: defaults.category,
            selected_service_ids: defaults.service_ids,
            selected_package_id: defaults.package_id,
            ..Self::default()
        }
    }

    /// Rebuild the full draft from a remote deal record for edit mode.
    pub fn from_record(record: &DealRecord) -> Self {
        Self {
            company_name: record.company_name.clone(),
            company_tax_id: record.company_tax_id.clone(),
            company_contact: record.company_contact.clone(),
            company_email: record.company_email.clone(),
            company_region: record.company_region.clone(),
            company_district: record.company_district.clone(),
            company_language: record.company_language.clone(),
            service_region: record.service_region.clone(),
            mode: record.deal_type.into(),
            category: record.category_id.clone(),
            selected_service_ids: record.service_ids.clone(),
            selected_package_id: record.package_id.clone(),
            billing_cadence: record.billing_cadence,
            customer_name: record.customer_name.clone(),
            customer_contact: record.customer_contact.clone(),
            customer_email: record.customer_email.clone(),
            customer_region: record.customer_region.clone(),
            customer_district: record.customer_district.clone(),
            customer_language: record.customer_language.clone(),
            contact_consent: record.contact_consent,
            closure_date: record.closure_date,
        }
    }

    /// Apply one field mutation. All clearing rules live here: a changed
    /// region clears its dependent district, leaving an offering mode clears
    /// that mode's selections, and a changed category clears the selected
    /// services. Returns the cascades the change requires.
    pub fn apply(&mut self, action: DraftAction) -> Vec<Cascade> {
        match action {
            DraftAction::SetCompanyName(value) => {
                self.company_name = value;
                Vec::new()
            }
            DraftAction::SetCompanyTaxId(value) => {
                self.company_tax_id = value;
                Vec::new()
            }
            DraftAction::SetCompanyContact(value) => {
                self.company_contact = value;
                Vec::new()
            }
            DraftAction::SetCompanyEmail(value) => {
                self.company_email = value;
                Vec::new()
            }
            DraftAction::SetCompanyRegion(value) => {
                if self.company_region != value {
                    self.company_district.clear();
                }
                self.company_region = value;
                Vec::new()
            }
            DraftAction::SetCompanyDistrict(value) => {
                self.company_district = value;
                Vec::new()
            }
            DraftAction::SetCompanyLanguage(value) => {
                self.company_language = value;
                Vec::new()
            }

            DraftAction::SetServiceRegion(value) => {
                if self.service_region == value {
                    return Vec::new();
                }
                self.service_region = value;
                // A package chosen for another region is no longer offered.
                self.selected_package_id = None;
                self.billing_cadence = None;
                vec![Cascade::RefreshOffering]
            }
            DraftAction::SetMode(mode) => {
                if self.mode == mode {
                    return Vec::new();
                }
                match self.mode {
                    OfferingMode::Individual => {
                        self.selected_service_ids.clear();
                    }
                    OfferingMode::Package => {
                        self.selected_package_id = None;
                        self.billing_cadence = None;
                    }
                }
                self.mode = mode;
                vec![Cascade::RefreshOffering]
            }
            DraftAction::SetCategory(value) => {
                if self.category == value {
                    return Vec::new();
                }
                self.category = value;
                self.selected_service_ids.clear();
                vec![Cascade::ReloadServices, Cascade::RefreshOffering]
            }
            DraftAction::ToggleService(service_id) => {
                if let Some(position) =
                    self.selected_service_ids.iter().position(|id| id == &service_id)
                {
                    self.selected_service_ids.remove(position);
                } else {
                    self.selected_service_ids.push(service_id);
                }
                vec![Cascade::RefreshOffering]
            }
            DraftAction::SelectPackage(value) => {
                self.selected_package_id = value;
                if self.selected_package_id.is_some() && self.billing_cadence.is_none() {
                    self.billing_cadence = Some(BillingCadence::default());
                }
                Vec::new()
            }
            DraftAction::SetBillingCadence(value) => {
                self.billing_cadence = value;
                Vec::new()
            }

            DraftAction::SetCustomerName(value) => {
                self.customer_name = value;
                Vec::new()
            }
            DraftAction::SetCustomerContact(value) => {
                self.customer_contact = value;
                Vec::new()
            }
            DraftAction::SetCustomerEmail(value) => {
                self.customer_email = value;
                Vec::new()
            }
            DraftAction::SetCustomerRegion(value) => {
                if self.customer_region != value {
                    self.customer_district.clear();
                }
                self.customer_region = value;
                Vec::new()
            }
            DraftAction::SetCustomerDistrict(value) => {
                self.customer_district = value;
                Vec::new()
            }
            DraftAction::SetCustomerLanguage(value) => {
                self.customer_language = value;
                Vec::new()
            }
            DraftAction::SetContactConsent(value) => {
                self.contact_consent = value;
                Vec::new()
            }
            DraftAction::SetClosureDate(value) => {
                self.closure_date = value;
                Vec::new()
            }
        }
    }
}
