use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerSummary;
use crate::domain::{contains_ignore_case, RegistrySummary};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Form-level company identity, as entered in the Company step or hydrated
/// from an existing registry record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFields {
    pub name: String,
    pub tax_id: String,
    pub contact: String,
    pub email: String,
    pub region: String,
    pub district: String,
    pub language: String,
}

/// Slim search-result row returned by the company registry search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company_id: CompanyId,
    pub name: String,
    pub contact: String,
    pub tax_id: String,
}

impl CompanySummary {
    /// Partial fields used when detail hydration fails: better than losing
    /// the selection entirely.
    pub fn fallback_fields(&self) -> CompanyFields {
        CompanyFields {
            name: self.name.clone(),
            tax_id: self.tax_id.clone(),
            contact: self.contact.clone(),
            ..CompanyFields::default()
        }
    }
}

impl RegistrySummary for CompanySummary {
    fn registry_id(&self) -> &str {
        &self.company_id.0
    }

    fn matches_query(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.contact, query)
            || contains_ignore_case(&self.tax_id, query)
    }
}

/// Fully hydrated company record, including the customers already linked
/// under it. Those customers seed the customer resolver's candidate pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company_id: CompanyId,
    pub name: String,
    pub tax_id: String,
    pub contact: String,
    pub email: String,
    pub region: String,
    pub district: String,
    pub language: String,
    #[serde(default)]
    pub customers: Vec<CustomerSummary>,
}

impl CompanyRecord {
    pub fn fields(&self) -> CompanyFields {
        CompanyFields {
            name: self.name.clone(),
            tax_id: self.tax_id.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            region: self.region.clone(),
            district: self.district.clone(),
            language: self.language.clone(),
        }
    }
}
