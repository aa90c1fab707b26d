//! Conditional multi-step form engine.
//!
//! A `FormEngine` holds a validated list of step definitions; each applicant
//! gets a `FormSession` that accumulates typed answers, evaluates conditional
//! field visibility, and follows data-dependent branch rules until the
//! terminal step.

pub mod domain;
pub mod engine;
pub mod steps;

pub use domain::{
    BranchRule, ConditionalRule, FieldError, FieldOption, FieldType, FieldValidator, FieldValue,
    FormAnswers, FormField, FormStep, StepId, StepPredicate,
};
pub use engine::{ConfigurationError, FormEngine, FormEngineError, FormSession, StepOutcome};
pub use steps::{
    application_form_steps, fast_track_eligible, low_sensitivity,
    requires_environmental_assessment,
};
