pub mod catalog;
pub mod packages;
pub mod pricing;

pub use catalog::CategoryServiceCache;
pub use packages::{PackageLine, PackageResolver, PackageTicket};
pub use pricing::{PricingEngine, PricingKey, PricingTicket, QuoteOutcome};
