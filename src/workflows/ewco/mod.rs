//! England Woodland Creation Offer grant application workflow.
//!
//! Two independent cores: a pure payment calculation engine and a branching
//! multi-step form engine. The service facade composes them with an
//! application repository and exposes them through the HTTP router.

pub mod domain;
pub mod form;
pub mod payments;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationStatusView, LandParcel, Sensitivity,
    WoodlandChoice,
};
pub use form::{
    ConfigurationError, FieldError, FieldType, FieldValue, FormAnswers, FormEngine,
    FormEngineError, FormField, FormSession, FormStep, StepId, StepOutcome,
};
pub use payments::{
    BenefitCategory, InvalidInputError, PaymentBreakdown, PaymentEngine, PaymentInput,
    PaymentRates,
};
pub use repository::{ApplicationRepository, InMemoryRepository, RepositoryError};
pub use router::application_router;
pub use service::{
    GrantApplicationService, ServiceError, SessionId, StepSubmission, StepView,
};
