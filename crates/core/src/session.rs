use serde::{Deserialize, Serialize};

use crate::domain::catalog::RegionId;

/// Identity of the logged-in associate, injected at wizard construction time.
///
/// The remote API stamps ownership on created deals from these values; the
/// core never reads them from ambient state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub associate_id: String,
    pub franchise_id: String,
    pub default_region: Option<RegionId>,
}

impl SessionIdentity {
    pub fn new(associate_id: impl Into<String>, franchise_id: impl Into<String>) -> Self {
        Self {
            associate_id: associate_id.into(),
            franchise_id: franchise_id.into(),
            default_region: None,
        }
    }

    pub fn with_default_region(mut self, region: RegionId) -> Self {
        self.default_region = Some(region);
        self
    }
}
