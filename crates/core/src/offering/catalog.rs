use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::catalog::{CategoryId, ServiceCatalogEntry};
use crate::remote::{RemoteError, RemoteOps};

/// Session-lifetime memo of category → service list. Service catalogs are
/// treated as static for the duration of one wizard session, so a category
/// is fetched at most once; failures are not cached and retry on the next
/// request for the same category.
#[derive(Debug, Default)]
pub struct CategoryServiceCache {
    entries: HashMap<CategoryId, Vec<ServiceCatalogEntry>>,
}

impl CategoryServiceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn services<B>(&mut self, category: &CategoryId, backend: &B) -> Vec<ServiceCatalogEntry>
    where
        B: RemoteOps + ?Sized,
    {
        if let Some(cached) = self.entries.get(category) {
            debug!(
                event_name = "catalog.cache_hit",
                category = %category.0,
                services = cached.len(),
                "serving category services from session cache"
            );
            return cached.clone();
        }

        match backend.list_services_by_category(category).await {
            Ok(services) => {
                self.entries.insert(category.clone(), services.clone());
                services
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.lookup_failed",
                    category = %category.0,
                    error = %error,
                    "category service lookup failed; returning empty list"
                );
                Vec::new()
            }
        }
    }

    pub fn cached(&self, category: &CategoryId) -> Option<&[ServiceCatalogEntry]> {
        self.entries.get(category).map(Vec::as_slice)
    }
}
