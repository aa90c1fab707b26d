use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::ApplicationId;
use super::form::{FormEngineError, StepId};
use super::payments::{BenefitCategory, PaymentInput};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{GrantApplicationService, ServiceError, SessionId, StepSubmission};

/// Router builder exposing HTTP endpoints for the payment calculator and the
/// multi-step application form.
pub fn application_router<R>(service: Arc<GrantApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/payments/calculate", post(calculate_handler::<R>))
        .route(
            "/api/v1/applications/sessions",
            post(start_session_handler::<R>),
        )
        .route(
            "/api/v1/applications/sessions/:session_id",
            get(current_step_handler::<R>),
        )
        .route(
            "/api/v1/applications/sessions/:session_id/steps/:step_id",
            post(submit_step_handler::<R>),
        )
        .route(
            "/api/v1/applications/sessions/:session_id/back",
            post(go_back_handler::<R>),
        )
        .route("/api/v1/applications", get(list_handler::<R>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalculateRequest {
    pub area_hectares: f64,
    #[serde(default)]
    pub low_sensitivity: bool,
    #[serde(default)]
    pub benefit_category: BenefitCategory,
}

pub(crate) async fn calculate_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
    Json(request): Json<CalculateRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let input = PaymentInput {
        area_hectares: request.area_hectares,
        low_sensitivity: request.low_sensitivity,
        benefit: request.benefit_category,
    };
    match service.estimate_payment(&input) {
        Ok(breakdown) => (StatusCode::OK, Json(breakdown)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn start_session_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.start_session() {
        Ok((session_id, step)) => {
            let payload = json!({ "session_id": session_id, "step": step });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn current_step_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.current_step(&SessionId(session_id)) {
        Ok(step) => (StatusCode::OK, Json(json!({ "step": step }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn submit_step_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
    Path((session_id, step_id)): Path<(String, String)>,
    Json(values): Json<BTreeMap<String, Value>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Some(step_id) = StepId::from_key(&step_id) else {
        let payload = json!({ "error": format!("unknown step '{step_id}'") });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    match service.submit_step(&SessionId(session_id), step_id, values) {
        Ok(StepSubmission::Rejected { errors }) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Ok(StepSubmission::Advanced { next_step }) => {
            let payload = json!({ "complete": false, "next_step": next_step });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(StepSubmission::Completed { application }) => {
            let payload = json!({ "complete": true, "application": application });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn go_back_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.go_back(&SessionId(session_id)) {
        Ok(step) => (StatusCode::OK, Json(json!({ "step": step }))).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list() {
        Ok(applications) => {
            let views: Vec<_> = applications
                .iter()
                .map(|application| application.status_view())
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<GrantApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(application) => {
            (StatusCode::OK, Json(application.status_view())).into_response()
        }
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "application not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::SessionNotFound => StatusCode::NOT_FOUND,
        ServiceError::Form(FormEngineError::StepMismatch { .. })
        | ServiceError::Form(FormEngineError::AlreadySubmitted) => StatusCode::CONFLICT,
        ServiceError::Form(FormEngineError::UnknownStep(_))
        | ServiceError::Form(FormEngineError::UnknownField { .. }) => StatusCode::NOT_FOUND,
        ServiceError::Payment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Form(FormEngineError::Configuration(_))
        | ServiceError::MissingAnswer(_)
        | ServiceError::SessionStoreUnavailable
        | ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
