pub mod catalog;
pub mod company;
pub mod customer;
pub mod deal;
pub mod package;
pub mod pricing;

/// A registry entry that can be offered as a search candidate.
///
/// `matches_query` backs the client-side post-filter: the remote search may
/// ignore the query for some fields, so results are re-filtered locally
/// before display.
pub trait RegistrySummary {
    fn registry_id(&self) -> &str;
    fn matches_query(&self, query: &str) -> bool;
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
