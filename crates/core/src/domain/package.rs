use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ServiceId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCadence {
    #[default]
    Monthly,
    Yearly,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageService {
    pub service_id: ServiceId,
    pub name: String,
    pub monthly_fee: Decimal,
    pub yearly_fee: Decimal,
}

impl PackageService {
    pub fn fee_for(&self, cadence: BillingCadence) -> Decimal {
        match cadence {
            BillingCadence::Monthly => self.monthly_fee,
            BillingCadence::Yearly => self.yearly_fee,
        }
    }
}

/// A pre-defined service bundle offered in a region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOffering {
    pub package_id: PackageId,
    pub name: String,
    pub services: Vec<PackageService>,
}
