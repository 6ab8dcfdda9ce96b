pub mod config;
pub mod domain;
pub mod draft;
pub mod errors;
pub mod offering;
pub mod payload;
pub mod remote;
pub mod resolve;
pub mod search;
pub mod session;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::catalog::{
    CategoryId, CategoryRecord, RegionId, RegionRecord, ServiceCatalogEntry, ServiceId,
};
pub use domain::company::{CompanyFields, CompanyId, CompanyRecord, CompanySummary};
pub use domain::customer::{CustomerFields, CustomerId, CustomerRecord, CustomerSummary};
pub use domain::deal::{DealId, DealRecord, DealType};
pub use domain::package::{BillingCadence, PackageId, PackageOffering, PackageService};
pub use domain::pricing::PricingQuote;
pub use draft::{Cascade, DealDraft, DraftAction, DraftDefaults, OfferingMode};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use payload::{
    compose_create, compose_update, CompanyPayload, CreateDealRequest, CustomerPayload,
    DealPayload, OfferingSelection, ServiceLine, UpdateDealRequest,
};
pub use remote::{RemoteError, RemoteOps, SearchPage, SubmitReceipt};
pub use resolve::{AcquisitionMode, EntityReference, EntityResolver};
pub use search::{DebouncedSearchClient, SearchOutcome, SearchTicket};
pub use session::SessionIdentity;
pub use wizard::{AdvanceOutcome, SubmitOutcome, WizardController, WizardMode, WizardStep};
