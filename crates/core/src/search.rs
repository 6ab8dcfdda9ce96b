use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::RegistrySummary;
use crate::remote::{RemoteError, SearchPage};

/// Marks one issued search request. A ticket is only applied while it still
/// matches the client's current generation and expected page; anything else
/// is a superseded in-flight response and is discarded on arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    page: u32,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { appended: usize },
    Superseded,
}

/// Debounced, cancelable registry search with incremental pagination.
///
/// The client is a passive state machine: callers `begin` a query (or
/// `begin_load_more`), await `wait_debounce`, perform the fetch, and hand the
/// response back through `accept`. Supersession is decided at accept time by
/// generation comparison, so a slow response for an old query can never
/// overwrite a newer one regardless of arrival order.
#[derive(Debug)]
pub struct DebouncedSearchClient<T> {
    debounce: Duration,
    page_size: u32,
    generation: u64,
    query: String,
    results: Vec<T>,
    has_more: bool,
    next_page: u32,
}

impl<T> DebouncedSearchClient<T>
where
    T: RegistrySummary + Clone,
{
    pub fn new(debounce: Duration, page_size: u32) -> Self {
        Self {
            debounce,
            page_size,
            generation: 0,
            query: String::new(),
            results: Vec::new(),
            has_more: false,
            next_page: 0,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Restart the debounce window for a new query. Any ticket issued before
    /// this call is superseded from this point on.
    pub fn begin(&mut self, query: &str) -> SearchTicket {
        self.generation += 1;
        self.query = query.to_string();
        self.next_page = 0;
        self.has_more = false;
        SearchTicket { generation: self.generation, page: 0, query: self.query.clone() }
    }

    /// Issue a ticket for the next page of the current query, if the last
    /// applied page indicated more results.
    pub fn begin_load_more(&mut self) -> Option<SearchTicket> {
        if !self.has_more {
            return None;
        }
        Some(SearchTicket {
            generation: self.generation,
            page: self.next_page,
            query: self.query.clone(),
        })
    }

    /// Replace the visible candidate pool without a query, superseding any
    /// in-flight search. Used when a selected company donates its linked
    /// customers.
    pub fn seed(&mut self, items: Vec<T>) {
        self.generation += 1;
        self.query.clear();
        self.results = items;
        self.has_more = false;
        self.next_page = 0;
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation && ticket.page == self.next_page
    }

    pub async fn wait_debounce(&self) {
        tokio::time::sleep(self.debounce).await;
    }

    /// Apply one fetched page. A failed fetch is non-fatal: the result set
    /// goes empty and the next keystroke retries transparently.
    pub fn accept(
        &mut self,
        ticket: &SearchTicket,
        page: Result<SearchPage<T>, RemoteError>,
    ) -> SearchOutcome {
        if !self.is_current(ticket) {
            debug!(
                event_name = "search.response_superseded",
                query = %ticket.query,
                page = ticket.page,
                "discarding stale search response"
            );
            return SearchOutcome::Superseded;
        }

        match page {
            Ok(page) => {
                let filtered: Vec<T> = if ticket.query.is_empty() {
                    page.items
                } else {
                    page.items
                        .into_iter()
                        .filter(|item| item.matches_query(&ticket.query))
                        .collect()
                };
                let appended = filtered.len();
                if ticket.page == 0 {
                    self.results = filtered;
                } else {
                    self.results.extend(filtered);
                }
                self.has_more = page.full_page;
                self.next_page = ticket.page + 1;
                SearchOutcome::Applied { appended }
            }
            Err(error) => {
                warn!(
                    event_name = "search.request_failed",
                    query = %ticket.query,
                    page = ticket.page,
                    error = %error,
                    "registry search failed; showing empty result set"
                );
                if ticket.page == 0 {
                    self.results.clear();
                }
                self.has_more = false;
                SearchOutcome::Applied { appended: 0 }
            }
        }
    }
}
