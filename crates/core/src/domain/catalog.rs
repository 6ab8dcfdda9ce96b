use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

/// A region and the districts that belong to it. A district selection is
/// only ever valid against the districts of the currently selected region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub region_id: RegionId,
    pub name: String,
    pub districts: Vec<String>,
}

impl RegionRecord {
    pub fn has_district(&self, district: &str) -> bool {
        self.districts.iter().any(|known| known == district)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub service_id: ServiceId,
    pub name: String,
    pub category_id: CategoryId,
    pub code: String,
    pub description: String,
}
