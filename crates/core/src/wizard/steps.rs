use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::{DealDraft, OfferingMode};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    Company,
    Service,
    Customer,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Company, WizardStep::Service, WizardStep::Customer];

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Company => Some(Self::Service),
            Self::Service => Some(Self::Customer),
            Self::Customer => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Company => None,
            Self::Service => Some(Self::Company),
            Self::Customer => Some(Self::Service),
        }
    }
}

/// Field key → message map for one step. Empty means the step may be left.
pub type FieldErrors = BTreeMap<String, String>;

fn require(errors: &mut FieldErrors, key: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(key.to_string(), message.to_string());
    }
}

/// Exact required-field set per step. Validation is local: no network call
/// is ever made to decide whether a step may advance.
pub fn validate(step: WizardStep, draft: &DealDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        WizardStep::Company => {
            require(&mut errors, "company_name", &draft.company_name, "company name is required");
            require(&mut errors, "company_region", &draft.company_region, "region is required");
            require(
                &mut errors,
                "company_district",
                &draft.company_district,
                "district is required",
            );
        }
        WizardStep::Service => {
            if draft.service_region.is_none() {
                errors.insert("service_region".to_string(), "region is required".to_string());
            }
            match draft.mode {
                OfferingMode::Individual => {
                    if draft.category.is_none() {
                        errors.insert("category".to_string(), "category is required".to_string());
                    }
                    if draft.selected_service_ids.is_empty() {
                        errors.insert(
                            "services".to_string(),
                            "select at least one service".to_string(),
                        );
                    }
                }
                OfferingMode::Package => {
                    if draft.selected_package_id.is_none() {
                        errors.insert("package".to_string(), "select a package".to_string());
                    }
                }
            }
        }
        WizardStep::Customer => {
            require(
                &mut errors,
                "customer_name",
                &draft.customer_name,
                "customer name is required",
            );
            require(
                &mut errors,
                "customer_contact",
                &draft.customer_contact,
                "contact number is required",
            );
            require(&mut errors, "customer_email", &draft.customer_email, "email is required");
            require(&mut errors, "customer_region", &draft.customer_region, "region is required");
            require(
                &mut errors,
                "customer_district",
                &draft.customer_district,
                "district is required",
            );
            if draft.closure_date.is_none() {
                errors.insert(
                    "closure_date".to_string(),
                    "expected closure date is required".to_string(),
                );
            }
        }
    }
    errors
}

/// Error-typed variant of `validate` for callers that run the wizard
/// headlessly and want a single failure per incomplete step.
pub fn ensure_complete(step: WizardStep, draft: &DealDraft) -> Result<(), DomainError> {
    let errors = validate(step, draft);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::StepIncomplete {
            step,
            missing_fields: errors.into_keys().collect(),
        })
    }
}
