use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ServiceId;

/// Per-service fee breakdown returned by the pricing endpoint for one
/// `(region, service set)` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub service_id: ServiceId,
    pub professional_fee: Decimal,
    pub vendor_fee: Decimal,
    pub contractor_fee: Decimal,
    pub govt_fee: Decimal,
}

impl PricingQuote {
    pub fn total(&self) -> Decimal {
        self.professional_fee + self.vendor_fee + self.contractor_fee + self.govt_fee
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::PricingQuote;
    use crate::domain::catalog::ServiceId;

    #[test]
    fn total_sums_all_fee_components() {
        let quote = PricingQuote {
            service_id: ServiceId("SVC-1".to_string()),
            professional_fee: Decimal::new(1_500, 2),
            vendor_fee: Decimal::new(250, 2),
            contractor_fee: Decimal::new(750, 2),
            govt_fee: Decimal::new(100, 2),
        };

        assert_eq!(quote.total(), Decimal::new(2_600, 2));
    }
}
