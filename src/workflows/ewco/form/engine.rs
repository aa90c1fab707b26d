use std::collections::BTreeMap;

use super::domain::{FieldError, FieldValue, FormAnswers, FormField, FormStep, StepId};

/// Faults in the step configuration itself. These indicate a bug in the step
/// definitions rather than bad user input, so they abort the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("form must define at least one step")]
    EmptyStepList,
    #[error("duplicate step id '{0}' in step list")]
    DuplicateStep(StepId),
    #[error("step '{from}' branches to '{next}', which is not in the configured step list")]
    UnknownBranchTarget { from: StepId, next: StepId },
}

/// Errors raised while driving a form session.
#[derive(Debug, thiserror::Error)]
pub enum FormEngineError {
    #[error("step '{0}' is not part of this form")]
    UnknownStep(StepId),
    #[error("expected step '{expected}', got '{submitted}'")]
    StepMismatch { expected: StepId, submitted: StepId },
    #[error("field '{field}' is not defined on step '{step}'")]
    UnknownField { step: StepId, field: String },
    #[error("session already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Validated step configuration; sessions are spawned from it.
#[derive(Debug, Clone)]
pub struct FormEngine {
    steps: Vec<FormStep>,
}

impl FormEngine {
    pub fn new(steps: Vec<FormStep>) -> Result<Self, ConfigurationError> {
        if steps.is_empty() {
            return Err(ConfigurationError::EmptyStepList);
        }
        for (index, step) in steps.iter().enumerate() {
            if steps[..index].iter().any(|earlier| earlier.id == step.id) {
                return Err(ConfigurationError::DuplicateStep(step.id));
            }
        }
        Ok(Self { steps })
    }

    /// The standard EWCO application form.
    pub fn standard() -> Self {
        Self::new(super::steps::application_form_steps())
            .expect("standard step definitions are valid")
    }

    pub fn steps(&self) -> &[FormStep] {
        &self.steps
    }

    pub fn step(&self, id: StepId) -> Option<&FormStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn start(&self) -> FormSession {
        FormSession::new(self.steps.clone())
    }
}

/// Result of a step submission. An empty error list with `next_step: None`
/// means the form completed; a non-empty error list means the step was
/// rejected and the session did not move.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub next_step: Option<StepId>,
    pub errors: Vec<FieldError>,
}

impl StepOutcome {
    pub fn rejected(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn completed(&self) -> bool {
        self.errors.is_empty() && self.next_step.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    InProgress,
    Submitted,
}

/// One applicant's traversal through the configured steps.
///
/// The session keeps the accumulated typed answers and an explicit traversal
/// stack so "previous" retraces the actual path taken, not the array order,
/// which matters once branch rules skip steps.
#[derive(Debug, Clone)]
pub struct FormSession {
    steps: Vec<FormStep>,
    current: StepId,
    answers: FormAnswers,
    history: Vec<StepId>,
    state: SessionState,
}

impl FormSession {
    pub(crate) fn new(steps: Vec<FormStep>) -> Self {
        let current = steps[0].id;
        Self {
            steps,
            current,
            answers: FormAnswers::default(),
            history: Vec::new(),
            state: SessionState::InProgress,
        }
    }

    pub fn current_step_id(&self) -> StepId {
        self.current
    }

    pub fn answers(&self) -> &FormAnswers {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.state == SessionState::Submitted
    }

    pub fn visited(&self) -> &[StepId] {
        &self.history
    }

    pub fn step(&self, id: StepId) -> Result<&FormStep, FormEngineError> {
        self.steps
            .iter()
            .find(|step| step.id == id)
            .ok_or(FormEngineError::UnknownStep(id))
    }

    /// Fields of `step_id` that are visible under the accumulated answers.
    pub fn visible_fields(&self, step_id: StepId) -> Result<Vec<&FormField>, FormEngineError> {
        let step = self.step(step_id)?;
        Ok(step
            .fields
            .iter()
            .filter(|field| field_visible(field, &self.answers))
            .collect())
    }

    /// Submit values for the active step.
    ///
    /// On success the merged answers are committed, the step is pushed onto
    /// the traversal stack, and the branch rule decides the next step. On
    /// validation failure nothing is committed and the errors are returned.
    pub fn submit_step(
        &mut self,
        step_id: StepId,
        values: BTreeMap<String, FieldValue>,
    ) -> Result<StepOutcome, FormEngineError> {
        if self.state == SessionState::Submitted {
            return Err(FormEngineError::AlreadySubmitted);
        }
        if step_id != self.current {
            return Err(FormEngineError::StepMismatch {
                expected: self.current,
                submitted: step_id,
            });
        }

        let step = self.step(step_id)?.clone();
        let mut errors = Vec::new();
        let mut merged = self.answers.clone();

        for (field_id, value) in &values {
            let field = step.field(field_id).ok_or_else(|| {
                FormEngineError::UnknownField {
                    step: step_id,
                    field: field_id.clone(),
                }
            })?;
            if field.field_type.accepts(value) {
                merged.insert(field_id.clone(), value.clone());
            } else {
                errors.push(FieldError::new(
                    field_id.clone(),
                    format!("expected a {} value", field.field_type.label()),
                ));
            }
        }

        // Visibility is evaluated over the merged data so conditional fields
        // within the submitted step see their dependency. Hidden fields are
        // exempt from validation and their submitted values are discarded.
        for field in &step.fields {
            if !field_visible(field, &merged) {
                merged.remove(field.id);
                continue;
            }
            if errors.iter().any(|error| error.field == field.id) {
                continue;
            }
            match merged.get(field.id) {
                None => {
                    if field.required {
                        errors.push(FieldError::new(field.id, format!("{} is required", field.label)));
                    }
                }
                Some(value) => {
                    if field.required && value.is_empty() {
                        errors.push(FieldError::new(field.id, format!("{} is required", field.label)));
                    } else if let Some(validator) = field.validator {
                        if let Some(message) = validator(value) {
                            errors.push(FieldError::new(field.id, message));
                        }
                    }
                }
            }
        }

        if errors.is_empty() && !(step.validation)(&merged) {
            errors.push(FieldError::new(
                step.id.key(),
                "answers for this step failed validation",
            ));
        }

        if !errors.is_empty() {
            return Ok(StepOutcome {
                next_step: None,
                errors,
            });
        }

        self.answers = merged;
        match (step.next_step)(&self.answers) {
            Some(next_id) => {
                if self.steps.iter().all(|step| step.id != next_id) {
                    return Err(ConfigurationError::UnknownBranchTarget {
                        from: step_id,
                        next: next_id,
                    }
                    .into());
                }
                self.history.push(step_id);
                self.current = next_id;
                Ok(StepOutcome {
                    next_step: Some(next_id),
                    errors: Vec::new(),
                })
            }
            None => {
                self.state = SessionState::Submitted;
                Ok(StepOutcome {
                    next_step: None,
                    errors: Vec::new(),
                })
            }
        }
    }

    /// Move to the previously visited step, retracing the actual traversal.
    /// A no-op on the first step. Accumulated answers are retained.
    pub fn go_back(&mut self) -> StepId {
        if self.state == SessionState::InProgress {
            if let Some(previous) = self.history.pop() {
                self.current = previous;
            }
        }
        self.current
    }
}

fn field_visible(field: &FormField, answers: &FormAnswers) -> bool {
    match field.conditional {
        None => true,
        Some(rule) => answers
            .get(rule.depends_on)
            .map(|value| value.matches_any(rule.values))
            .unwrap_or(false),
    }
}
