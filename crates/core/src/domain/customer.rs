use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{contains_ignore_case, RegistrySummary};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

/// Form-level customer identity for the Customer step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub region: String,
    pub district: String,
    pub language: String,
    pub contact_consent: bool,
    pub closure_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub name: String,
    pub contact: String,
    pub email: String,
}

impl CustomerSummary {
    pub fn fallback_fields(&self) -> CustomerFields {
        CustomerFields {
            name: self.name.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            ..CustomerFields::default()
        }
    }
}

impl RegistrySummary for CustomerSummary {
    fn registry_id(&self) -> &str {
        &self.customer_id.0
    }

    fn matches_query(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.contact, query)
            || contains_ignore_case(&self.email, query)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub region: String,
    pub district: String,
    pub language: String,
    #[serde(default)]
    pub contact_consent: bool,
    #[serde(default)]
    pub closure_date: Option<NaiveDate>,
}

impl CustomerRecord {
    pub fn fields(&self) -> CustomerFields {
        CustomerFields {
            name: self.name.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            region: self.region.clone(),
            district: self.district.clone(),
            language: self.language.clone(),
            contact_consent: self.contact_consent,
            closure_date: self.closure_date,
        }
    }
}
