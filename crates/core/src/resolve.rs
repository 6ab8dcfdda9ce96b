use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::company::{CompanyFields, CompanySummary};
use crate::domain::customer::{CustomerFields, CustomerSummary};
use crate::domain::RegistrySummary;
use crate::remote::RemoteError;
use crate::search::DebouncedSearchClient;

/// How the wizard is acquiring this entity: manual entry or existing-record
/// lookup. Orthogonal to which `EntityReference` variant currently holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcquisitionMode {
    #[default]
    NewEntry,
    Existing,
}

/// Resolution state for one entity slot. Exactly one variant holds at any
/// time; `Existing` carries the hydrated record fields, `New` carries
/// nothing (manual entry lives in the draft).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityReference<F> {
    New { fields: F },
    Existing { id: String, fields: F },
}

impl<F: Default> Default for EntityReference<F> {
    fn default() -> Self {
        Self::New { fields: F::default() }
    }
}

impl<F> EntityReference<F> {
    pub fn is_existing(&self) -> bool {
        matches!(self, Self::Existing { .. })
    }

    pub fn existing_id(&self) -> Option<&str> {
        match self {
            Self::Existing { id, .. } => Some(id),
            Self::New { .. } => None,
        }
    }

    pub fn fields(&self) -> &F {
        match self {
            Self::New { fields } | Self::Existing { fields, .. } => fields,
        }
    }
}

/// Search-result row that can fall back to partial form fields when detail
/// hydration fails.
pub trait CandidateSummary<F>: RegistrySummary + Clone {
    fn partial_fields(&self) -> F;
}

impl CandidateSummary<CompanyFields> for CompanySummary {
    fn partial_fields(&self) -> CompanyFields {
        self.fallback_fields()
    }
}

impl CandidateSummary<CustomerFields> for CustomerSummary {
    fn partial_fields(&self) -> CustomerFields {
        self.fallback_fields()
    }
}

/// Dual-mode acquisition for one entity type: a debounced registry search in
/// existing mode, full-record hydration on selection, and a reversible
/// clear-and-re-enter path back to manual entry.
#[derive(Debug)]
pub struct EntityResolver<S, F> {
    entity: &'static str,
    acquisition: AcquisitionMode,
    search: DebouncedSearchClient<S>,
    reference: EntityReference<F>,
}

impl<S, F> EntityResolver<S, F>
where
    S: CandidateSummary<F>,
    F: Default,
{
    pub fn new(entity: &'static str, debounce: Duration, page_size: u32) -> Self {
        Self {
            entity,
            acquisition: AcquisitionMode::NewEntry,
            search: DebouncedSearchClient::new(debounce, page_size),
            reference: EntityReference::default(),
        }
    }

    pub fn acquisition(&self) -> AcquisitionMode {
        self.acquisition
    }

    pub fn reference(&self) -> &EntityReference<F> {
        &self.reference
    }

    pub fn search(&self) -> &DebouncedSearchClient<S> {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut DebouncedSearchClient<S> {
        &mut self.search
    }

    pub fn toggle_existing_mode(&mut self) {
        self.acquisition = match self.acquisition {
            AcquisitionMode::NewEntry => AcquisitionMode::Existing,
            AcquisitionMode::Existing => AcquisitionMode::NewEntry,
        };
    }

    /// Select a search candidate and hydrate its full record. Hydration
    /// failure is non-fatal: the summary's own fields are kept instead, so
    /// the user still proceeds with partial data.
    pub async fn select<Fut>(&mut self, candidate: &S, hydrate: Fut)
    where
        Fut: Future<Output = Result<F, RemoteError>>,
    {
        let id = candidate.registry_id().to_string();
        let fields = match hydrate.await {
            Ok(fields) => {
                info!(
                    event_name = "resolve.candidate_hydrated",
                    entity = self.entity,
                    id = %id,
                    "hydrated existing record"
                );
                fields
            }
            Err(error) => {
                warn!(
                    event_name = "resolve.hydration_failed",
                    entity = self.entity,
                    id = %id,
                    error = %error,
                    "detail hydration failed; keeping summary fields"
                );
                candidate.partial_fields()
            }
        };
        self.acquisition = AcquisitionMode::Existing;
        self.reference = EntityReference::Existing { id, fields };
    }

    /// Mark the slot as an already-known existing record without a search,
    /// e.g. when seeding edit mode from a deal record.
    pub fn mark_existing(&mut self, id: String, fields: F) {
        self.acquisition = AcquisitionMode::Existing;
        self.reference = EntityReference::Existing { id, fields };
    }

    /// Discard any hydrated values and return to manual entry.
    pub fn clear_to_new_entry(&mut self) {
        self.acquisition = AcquisitionMode::NewEntry;
        self.reference = EntityReference::default();
    }

    /// Replace the candidate pool without a query (e.g. customers linked
    /// under a just-selected company) and switch into existing mode when the
    /// pool is non-empty.
    pub fn seed_candidates(&mut self, candidates: Vec<S>) {
        let seeded = candidates.len();
        self.search.seed(candidates);
        if seeded > 0 {
            self.acquisition = AcquisitionMode::Existing;
        }
        info!(
            event_name = "resolve.pool_seeded",
            entity = self.entity,
            candidates = seeded,
            "candidate pool seeded"
        );
    }
}
