use tracing::{debug, warn};

use crate::domain::catalog::{RegionId, ServiceId};
use crate::domain::pricing::PricingQuote;
use crate::remote::RemoteError;

/// The pair a quote set is valid for. Service ids are held sorted so that
/// selection order does not produce distinct keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingKey {
    pub region: RegionId,
    pub service_ids: Vec<ServiceId>,
}

impl PricingKey {
    pub fn new(region: RegionId, mut service_ids: Vec<ServiceId>) -> Self {
        service_ids.sort_by(|a, b| a.0.cmp(&b.0));
        Self { region, service_ids }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingTicket {
    generation: u64,
    pub key: PricingKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteOutcome {
    Applied,
    Stale,
}

/// Region- and selection-keyed quote state. Every rekey bumps a generation;
/// a response is applied only when its ticket still matches the current
/// generation at arrival time, so a slow response for a superseded selection
/// can never overwrite newer quotes.
#[derive(Debug, Default)]
pub struct PricingEngine {
    generation: u64,
    current: Option<PricingKey>,
    quotes: Vec<PricingQuote>,
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quotes(&self) -> &[PricingQuote] {
        &self.quotes
    }

    pub fn current_key(&self) -> Option<&PricingKey> {
        self.current.as_ref()
    }

    /// Re-key for a changed `(region, service set)`. An empty region or
    /// selection clears the quotes and issues no ticket: there is nothing to
    /// fetch.
    pub fn rekey(
        &mut self,
        region: Option<&RegionId>,
        service_ids: &[ServiceId],
    ) -> Option<PricingTicket> {
        self.generation += 1;
        match region {
            Some(region) if !service_ids.is_empty() => {
                let key = PricingKey::new(region.clone(), service_ids.to_vec());
                self.current = Some(key.clone());
                Some(PricingTicket { generation: self.generation, key })
            }
            _ => {
                self.current = None;
                self.quotes.clear();
                None
            }
        }
    }

    pub fn accept(
        &mut self,
        ticket: &PricingTicket,
        result: Result<Vec<PricingQuote>, RemoteError>,
    ) -> QuoteOutcome {
        if ticket.generation != self.generation || Some(&ticket.key) != self.current.as_ref() {
            debug!(
                event_name = "pricing.response_stale",
                region = %ticket.key.region.0,
                services = ticket.key.service_ids.len(),
                "discarding stale pricing response"
            );
            return QuoteOutcome::Stale;
        }

        match result {
            Ok(quotes) => {
                self.quotes = quotes;
                QuoteOutcome::Applied
            }
            Err(error) => {
                warn!(
                    event_name = "pricing.quote_failed",
                    region = %ticket.key.region.0,
                    error = %error,
                    "pricing quote failed; clearing quotes"
                );
                self.quotes.clear();
                QuoteOutcome::Applied
            }
        }
    }
}
