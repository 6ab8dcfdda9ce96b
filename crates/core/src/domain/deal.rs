use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CategoryId, RegionId, ServiceId};
use crate::domain::company::CompanyId;
use crate::domain::customer::CustomerId;
use crate::domain::package::{BillingCadence, PackageId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

/// Mirrors the Service step's offering mode on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealType {
    #[default]
    Individual,
    Package,
}

/// Server-side deal record, consumed to seed the wizard in edit mode. The
/// core never lists or deletes deals; it creates one or updates this one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub deal_id: DealId,
    pub company_id: CompanyId,
    pub customer_id: CustomerId,
    pub converted_at: DateTime<Utc>,
    pub deal_type: DealType,

    pub company_name: String,
    pub company_tax_id: String,
    pub company_contact: String,
    pub company_email: String,
    pub company_region: String,
    pub company_district: String,
    pub company_language: String,

    pub service_region: Option<RegionId>,
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub service_ids: Vec<ServiceId>,
    pub package_id: Option<PackageId>,
    pub billing_cadence: Option<BillingCadence>,

    pub customer_name: String,
    pub customer_contact: String,
    pub customer_email: String,
    pub customer_region: String,
    pub customer_district: String,
    pub customer_language: String,
    #[serde(default)]
    pub contact_consent: bool,
    pub closure_date: Option<NaiveDate>,
}
