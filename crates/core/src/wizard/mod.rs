pub mod controller;
pub mod steps;

pub use controller::{AdvanceOutcome, SubmitOutcome, WizardController, WizardMode};
pub use steps::{ensure_complete, validate, FieldErrors, WizardStep};
