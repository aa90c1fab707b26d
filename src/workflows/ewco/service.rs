use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, LandParcel, Sensitivity, WoodlandChoice,
};
use super::form::{
    fast_track_eligible, low_sensitivity, FieldError, FormAnswers, FormEngine, FormEngineError,
    FormSession, FormStep, StepId,
};
use super::payments::{
    BenefitCategory, InvalidInputError, PaymentBreakdown, PaymentEngine, PaymentInput,
};
use super::repository::{ApplicationRepository, RepositoryError};

/// Identifier for an in-flight form session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id(now: DateTime<Utc>) -> ApplicationId {
    let sequence = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("EWCO-{}-{sequence:06}", now.year()))
}

fn next_session_id() -> SessionId {
    let sequence = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{sequence:06}"))
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("session not found")]
    SessionNotFound,
    #[error("session store unavailable")]
    SessionStoreUnavailable,
    #[error("submitted answers are missing '{0}'")]
    MissingAnswer(&'static str),
    #[error(transparent)]
    Form(#[from] FormEngineError),
    #[error(transparent)]
    Payment(#[from] InvalidInputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// View of a step presented to the applicant: metadata plus the fields that
/// are visible under the answers accumulated so far.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub step_id: StepId,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: Vec<super::form::FormField>,
}

/// Outcome of submitting one step through the service facade.
#[derive(Debug, Clone)]
pub enum StepSubmission {
    Rejected { errors: Vec<FieldError> },
    Advanced { next_step: StepView },
    Completed { application: Application },
}

/// Service composing the form engine, payment engine, and repository.
///
/// Sessions are scoped per applicant: each holds its own `FormSession` keyed
/// by a generated id, with no cross-session sharing.
pub struct GrantApplicationService<R> {
    form: FormEngine,
    payments: PaymentEngine,
    repository: Arc<R>,
    sessions: Mutex<HashMap<SessionId, FormSession>>,
}

impl<R> GrantApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_engines(FormEngine::standard(), PaymentEngine::default(), repository)
    }

    pub fn with_engines(form: FormEngine, payments: PaymentEngine, repository: Arc<R>) -> Self {
        Self {
            form,
            payments,
            repository,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionId, FormSession>>, ServiceError> {
        self.sessions
            .lock()
            .map_err(|_| ServiceError::SessionStoreUnavailable)
    }

    /// Open a new form session and return the first step.
    pub fn start_session(&self) -> Result<(SessionId, StepView), ServiceError> {
        let session = self.form.start();
        let view = step_view(&session, session.current_step_id())?;
        let session_id = next_session_id();
        self.sessions()?.insert(session_id.clone(), session);
        info!(session_id = %session_id.0, "form session opened");
        Ok((session_id, view))
    }

    /// The active step of a session, with currently visible fields.
    pub fn current_step(&self, session_id: &SessionId) -> Result<StepView, ServiceError> {
        let sessions = self.sessions()?;
        let session = sessions
            .get(session_id)
            .ok_or(ServiceError::SessionNotFound)?;
        step_view(session, session.current_step_id())
    }

    /// Visible fields for any configured step of a session.
    pub fn visible_fields(
        &self,
        session_id: &SessionId,
        step_id: StepId,
    ) -> Result<Vec<super::form::FormField>, ServiceError> {
        let sessions = self.sessions()?;
        let session = sessions
            .get(session_id)
            .ok_or(ServiceError::SessionNotFound)?;
        Ok(session
            .visible_fields(step_id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Submit raw JSON values for the active step.
    ///
    /// Values are coerced against the step's field definitions before the
    /// form engine sees them, so type mismatches surface as per-field errors
    /// at the boundary. Completing the final step finalizes the application.
    pub fn submit_step(
        &self,
        session_id: &SessionId,
        step_id: StepId,
        values: BTreeMap<String, Value>,
    ) -> Result<StepSubmission, ServiceError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(session_id)
            .ok_or(ServiceError::SessionNotFound)?;

        let step = session.step(step_id)?;
        let (typed, coercion_errors) = coerce_values(step, values);
        if !coercion_errors.is_empty() {
            return Ok(StepSubmission::Rejected {
                errors: coercion_errors,
            });
        }

        let outcome = match session.submit_step(step_id, typed) {
            Ok(outcome) => outcome,
            Err(error) => {
                if matches!(error, FormEngineError::Configuration(_)) {
                    // Step definitions are broken; the session cannot continue.
                    sessions.remove(session_id);
                }
                return Err(error.into());
            }
        };

        if outcome.rejected() {
            return Ok(StepSubmission::Rejected {
                errors: outcome.errors,
            });
        }

        match outcome.next_step {
            Some(next_id) => Ok(StepSubmission::Advanced {
                next_step: step_view(session, next_id)?,
            }),
            None => {
                let answers = session.answers().clone();
                drop(sessions);
                // The session is kept until the application is stored, so a
                // failed finalization does not discard the answers.
                let application = self.finalize(&answers)?;
                self.sessions()?.remove(session_id);
                Ok(StepSubmission::Completed { application })
            }
        }
    }

    /// Return to the previously visited step of a session.
    pub fn go_back(&self, session_id: &SessionId) -> Result<StepView, ServiceError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(session_id)
            .ok_or(ServiceError::SessionNotFound)?;
        let step_id = session.go_back();
        step_view(session, step_id)
    }

    /// Fetch a submitted application.
    pub fn get(&self, id: &ApplicationId) -> Result<Application, ServiceError> {
        let application = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    /// All submitted applications.
    pub fn list(&self) -> Result<Vec<Application>, ServiceError> {
        Ok(self.repository.list()?)
    }

    /// Run the payment engine directly, for the standalone calculator.
    pub fn estimate_payment(
        &self,
        input: &PaymentInput,
    ) -> Result<PaymentBreakdown, InvalidInputError> {
        self.payments.calculate(input)
    }

    fn finalize(&self, answers: &FormAnswers) -> Result<Application, ServiceError> {
        let area = answers
            .number("landArea")
            .ok_or(ServiceError::MissingAnswer("landArea"))?;
        let benefit: BenefitCategory = answers
            .choice("additionalBenefits")
            .unwrap_or("none")
            .parse()?;
        let sensitive = !low_sensitivity(answers);

        let payment = self.payments.calculate(&PaymentInput {
            area_hectares: area,
            low_sensitivity: !sensitive,
            benefit,
        })?;

        let now = Utc::now();
        let application = Application {
            id: next_application_id(now),
            applicant_name: required_text(answers, "applicantName")?,
            applicant_email: required_text(answers, "applicantEmail")?,
            organization_name: answers.text("organizationName").map(str::to_string),
            land: LandParcel {
                area_hectares: area,
                county: required_choice(answers, "county")?,
                soil_type: required_choice(answers, "soilType")?,
                current_land_use: required_choice(answers, "currentLandUse")?,
                sensitivity: if sensitive {
                    Sensitivity::High
                } else {
                    Sensitivity::Low
                },
            },
            woodland: WoodlandChoice {
                woodland_type: required_choice(answers, "woodlandType")?,
                primary_species: required_choice(answers, "species")?,
                planting_density: required_choice(answers, "plantingDensity")?,
                additional_benefit: benefit,
            },
            environmental_assessment_accepted: answers.choice_is("eiaRequired", "accept"),
            fast_track_eligible: fast_track_eligible(answers),
            payment,
            status: ApplicationStatus::Submitted,
            submitted_at: now,
        };

        self.repository.insert(application.clone())?;
        info!(
            application_id = %application.id.0,
            fast_track = application.fast_track_eligible,
            total = application.payment.total,
            "grant application submitted"
        );
        Ok(application)
    }
}

fn required_text(answers: &FormAnswers, id: &'static str) -> Result<String, ServiceError> {
    answers
        .text(id)
        .map(str::to_string)
        .ok_or(ServiceError::MissingAnswer(id))
}

fn required_choice(answers: &FormAnswers, id: &'static str) -> Result<String, ServiceError> {
    answers
        .choice(id)
        .map(str::to_string)
        .ok_or(ServiceError::MissingAnswer(id))
}

fn step_view(session: &FormSession, step_id: StepId) -> Result<StepView, ServiceError> {
    let step = session.step(step_id)?;
    let fields = session
        .visible_fields(step_id)?
        .into_iter()
        .cloned()
        .collect();
    Ok(StepView {
        step_id: step.id,
        title: step.title,
        description: step.description,
        fields,
    })
}

fn coerce_values(
    step: &FormStep,
    values: BTreeMap<String, Value>,
) -> (BTreeMap<String, super::form::FieldValue>, Vec<FieldError>) {
    let mut typed = BTreeMap::new();
    let mut errors = Vec::new();
    for (field_id, raw) in values {
        match step.field(&field_id) {
            None => errors.push(FieldError::new(field_id, "field is not part of this step")),
            Some(field) => match field.field_type.coerce(&raw) {
                Ok(value) => {
                    typed.insert(field_id, value);
                }
                Err(message) => errors.push(FieldError::new(field_id, message)),
            },
        }
    }
    (typed, errors)
}
