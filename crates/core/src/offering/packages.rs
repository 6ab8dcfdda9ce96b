use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::catalog::{RegionId, ServiceId};
use crate::domain::package::{BillingCadence, PackageOffering};
use crate::remote::RemoteError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageTicket {
    generation: u64,
    pub region: RegionId,
}

/// One flattened line of a package at a chosen cadence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLine {
    pub service_id: ServiceId,
    pub name: String,
    pub fee: Decimal,
}

/// Region-keyed package list with the same last-key-wins discipline as the
/// pricing engine. Cadence totals are a pure computation over the loaded
/// offerings, so switching cadence never refetches.
#[derive(Debug, Default)]
pub struct PackageResolver {
    generation: u64,
    region: Option<RegionId>,
    packages: Vec<PackageOffering>,
}

impl PackageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn packages(&self) -> &[PackageOffering] {
        &self.packages
    }

    pub fn find(&self, package_id: &crate::domain::package::PackageId) -> Option<&PackageOffering> {
        self.packages.iter().find(|offering| &offering.package_id == package_id)
    }

    pub fn rekey(&mut self, region: Option<&RegionId>) -> Option<PackageTicket> {
        self.generation += 1;
        match region {
            Some(region) => {
                self.region = Some(region.clone());
                Some(PackageTicket { generation: self.generation, region: region.clone() })
            }
            None => {
                self.region = None;
                self.packages.clear();
                None
            }
        }
    }

    pub fn accept(
        &mut self,
        ticket: &PackageTicket,
        result: Result<Vec<PackageOffering>, RemoteError>,
    ) -> bool {
        if ticket.generation != self.generation || Some(&ticket.region) != self.region.as_ref() {
            debug!(
                event_name = "packages.response_stale",
                region = %ticket.region.0,
                "discarding stale package list"
            );
            return false;
        }

        match result {
            Ok(packages) => {
                self.packages = packages;
            }
            Err(error) => {
                warn!(
                    event_name = "packages.list_failed",
                    region = %ticket.region.0,
                    error = %error,
                    "package list failed; clearing offerings"
                );
                self.packages.clear();
            }
        }
        true
    }
}

/// Fee per service selected from the offering by cadence.
pub fn line_totals(offering: &PackageOffering, cadence: BillingCadence) -> Vec<PackageLine> {
    offering
        .services
        .iter()
        .map(|service| PackageLine {
            service_id: service.service_id.clone(),
            name: service.name.clone(),
            fee: service.fee_for(cadence),
        })
        .collect()
}
