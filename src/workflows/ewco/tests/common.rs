use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::ewco::domain::{Application, ApplicationId};
use crate::workflows::ewco::form::{FieldValue, FormEngine, FormSession, StepId};
use crate::workflows::ewco::repository::{ApplicationRepository, InMemoryRepository, RepositoryError};
use crate::workflows::ewco::service::{GrantApplicationService, SessionId, StepSubmission};
use crate::workflows::ewco::application_router;

pub(super) fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

pub(super) fn choice(value: &str) -> FieldValue {
    FieldValue::Choice(value.to_string())
}

pub(super) fn number(value: f64) -> FieldValue {
    FieldValue::Number(value)
}

pub(super) fn files(names: &[&str]) -> FieldValue {
    FieldValue::Files(names.iter().map(|name| name.to_string()).collect())
}

pub(super) fn answers(values: Vec<(&str, FieldValue)>) -> BTreeMap<String, FieldValue> {
    values
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

pub(super) fn session() -> FormSession {
    FormEngine::standard().start()
}

pub(super) fn applicant_details() -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("applicantName", text("Jo Hartley")),
        ("applicantEmail", text("jo.hartley@example.org")),
        ("organizationType", choice("individual")),
    ])
}

pub(super) fn organization_applicant_details() -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("applicantName", text("Jo Hartley")),
        ("applicantEmail", text("jo.hartley@example.org")),
        ("organizationType", choice("organization")),
        ("organizationName", text("Hartley Estates Ltd")),
    ])
}

pub(super) fn land_details(area: f64) -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("landArea", number(area)),
        ("county", choice("devon")),
        ("currentLandUse", choice("agricultural")),
        ("soilType", choice("loam")),
    ])
}

pub(super) fn sensitivity_answers(
    protected: &str,
    rare_species: &str,
    archaeology: &str,
) -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("inProtectedArea", choice(protected)),
        ("hasRareSpecies", choice(rare_species)),
        ("hasArchaeology", choice(archaeology)),
    ])
}

pub(super) fn low_sensitivity_answers() -> BTreeMap<String, FieldValue> {
    sensitivity_answers("no", "no", "no")
}

pub(super) fn environmental_assessment_answers() -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("eiaRequired", choice("accept")),
        ("eiaConsultant", text("Greenfield Ecology")),
    ])
}

pub(super) fn woodland_answers(benefit: &str) -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("woodlandType", choice("broadleaf")),
        ("species", choice("oak")),
        ("plantingDensity", choice("1100")),
        ("additionalBenefits", choice(benefit)),
    ])
}

pub(super) fn documents_answers() -> BTreeMap<String, FieldValue> {
    answers(vec![
        ("wcpDocument", files(&["woodland-creation-plan.pdf"])),
        ("mapDocument", files(&["site-map.pdf"])),
        ("landOwnership", files(&["title-deeds.pdf"])),
    ])
}

/// Submit one step and assert it advanced (or completed) rather than rejected.
pub(super) fn submit_ok(
    session: &mut FormSession,
    step_id: StepId,
    values: BTreeMap<String, FieldValue>,
) -> Option<StepId> {
    let outcome = session
        .submit_step(step_id, values)
        .expect("step submission executes");
    assert!(
        outcome.errors.is_empty(),
        "step {step_id} rejected: {:?}",
        outcome.errors
    );
    outcome.next_step
}

// JSON-shaped payloads mirroring what the HTTP boundary receives.

pub(super) fn applicant_details_json() -> BTreeMap<String, Value> {
    json_values(vec![
        ("applicantName", json!("Jo Hartley")),
        ("applicantEmail", json!("jo.hartley@example.org")),
        ("organizationType", json!("individual")),
    ])
}

pub(super) fn land_details_json(area: Value) -> BTreeMap<String, Value> {
    json_values(vec![
        ("landArea", area),
        ("county", json!("devon")),
        ("currentLandUse", json!("agricultural")),
        ("soilType", json!("loam")),
    ])
}

pub(super) fn sensitivity_json(
    protected: &str,
    rare_species: &str,
    archaeology: &str,
) -> BTreeMap<String, Value> {
    json_values(vec![
        ("inProtectedArea", json!(protected)),
        ("hasRareSpecies", json!(rare_species)),
        ("hasArchaeology", json!(archaeology)),
    ])
}

pub(super) fn environmental_assessment_json() -> BTreeMap<String, Value> {
    json_values(vec![("eiaRequired", json!("accept"))])
}

pub(super) fn woodland_json(benefit: &str) -> BTreeMap<String, Value> {
    json_values(vec![
        ("woodlandType", json!("broadleaf")),
        ("species", json!("oak")),
        ("plantingDensity", json!("1100")),
        ("additionalBenefits", json!(benefit)),
    ])
}

pub(super) fn documents_json() -> BTreeMap<String, Value> {
    json_values(vec![
        ("wcpDocument", json!(["woodland-creation-plan.pdf"])),
        ("mapDocument", json!(["site-map.pdf"])),
        ("landOwnership", json!(["title-deeds.pdf"])),
    ])
}

fn json_values(values: Vec<(&str, Value)>) -> BTreeMap<String, Value> {
    values
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

pub(super) fn build_service() -> Arc<GrantApplicationService<InMemoryRepository>> {
    Arc::new(GrantApplicationService::new(Arc::new(
        InMemoryRepository::default(),
    )))
}

pub(super) fn build_router() -> axum::Router {
    application_router(build_service())
}

/// Drive a session from the first step through submission on the fast-track
/// path (low sensitivity answers, no environmental assessment step).
pub(super) fn complete_fast_track_session(
    service: &GrantApplicationService<InMemoryRepository>,
    session_id: &SessionId,
    area: f64,
    benefit: &str,
) -> Application {
    let steps: Vec<(StepId, BTreeMap<String, Value>)> = vec![
        (StepId::ApplicantDetails, applicant_details_json()),
        (StepId::LandDetails, land_details_json(json!(area))),
        (StepId::SensitivityAssessment, sensitivity_json("no", "no", "no")),
        (StepId::WoodlandType, woodland_json(benefit)),
        (StepId::Documents, documents_json()),
    ];

    let mut completed = None;
    for (step_id, values) in steps {
        match service
            .submit_step(session_id, step_id, values)
            .expect("step submission executes")
        {
            StepSubmission::Rejected { errors } => {
                panic!("step {step_id} rejected: {errors:?}")
            }
            StepSubmission::Advanced { .. } => {}
            StepSubmission::Completed { application } => completed = Some(application),
        }
    }
    completed.expect("final step completes the application")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Repository stub that fails every operation, for exercising the 500 path.
pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
