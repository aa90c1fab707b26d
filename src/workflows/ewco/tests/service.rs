use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::workflows::ewco::domain::{ApplicationId, ApplicationStatus, Sensitivity};
use crate::workflows::ewco::form::StepId;
use crate::workflows::ewco::payments::{BenefitCategory, InvalidInputError, PaymentInput};
use crate::workflows::ewco::service::{GrantApplicationService, ServiceError, SessionId, StepSubmission};

#[test]
fn starting_a_session_returns_the_first_step() {
    let service = build_service();
    let (session_id, step) = service.start_session().expect("session opens");

    assert!(!session_id.0.is_empty());
    assert_eq!(step.step_id, StepId::ApplicantDetails);
    assert_eq!(step.title, "Applicant Details");
    // organizationName stays hidden until an organization type is chosen.
    assert!(step.fields.iter().all(|field| field.id != "organizationName"));
}

#[test]
fn session_ids_are_unique() {
    let service = build_service();
    let (first, _) = service.start_session().expect("session opens");
    let (second, _) = service.start_session().expect("session opens");
    assert_ne!(first, second);
}

#[test]
fn unknown_sessions_are_reported_as_missing() {
    let service = build_service();
    let missing = SessionId("session-does-not-exist".to_string());
    assert!(matches!(
        service.current_step(&missing),
        Err(ServiceError::SessionNotFound)
    ));
}

#[test]
fn fast_track_application_completes_and_is_stored() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    let application = complete_fast_track_session(&service, &session_id, 15.5, "biodiversity");

    assert!(application.id.0.starts_with("EWCO-"));
    assert_eq!(application.applicant_name, "Jo Hartley");
    assert_eq!(application.applicant_email, "jo.hartley@example.org");
    assert_eq!(application.organization_name, None);
    assert_eq!(application.land.area_hectares, 15.5);
    assert_eq!(application.land.county, "devon");
    assert_eq!(application.land.sensitivity, Sensitivity::Low);
    assert_eq!(
        application.woodland.additional_benefit,
        BenefitCategory::Biodiversity
    );
    assert!(application.fast_track_eligible);
    assert!(!application.environmental_assessment_accepted);
    assert_eq!(application.status, ApplicationStatus::Submitted);
    // Low sensitivity answers earn the per-hectare payment.
    assert_eq!(application.payment.low_sensitivity_payment, 15.5 * 1_100.0);

    let fetched = service.get(&application.id).expect("application stored");
    assert_eq!(fetched, application);

    // The session is closed once the application is finalized.
    assert!(matches!(
        service.current_step(&session_id),
        Err(ServiceError::SessionNotFound)
    ));
}

#[test]
fn environmental_assessment_path_marks_the_application() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    let submissions = [
        (StepId::ApplicantDetails, applicant_details_json()),
        (StepId::LandDetails, land_details_json(json!(10.0))),
        (StepId::SensitivityAssessment, sensitivity_json("no", "no", "yes")),
        (StepId::EnvironmentalAssessment, environmental_assessment_json()),
        (StepId::WoodlandType, woodland_json("none")),
    ];
    for (step_id, values) in submissions {
        match service
            .submit_step(&session_id, step_id, values)
            .expect("step submission executes")
        {
            StepSubmission::Advanced { .. } => {}
            other => panic!("expected to advance past {step_id}, got {other:?}"),
        }
    }

    let application = match service
        .submit_step(&session_id, StepId::Documents, documents_json())
        .expect("step submission executes")
    {
        StepSubmission::Completed { application } => application,
        other => panic!("expected completion, got {other:?}"),
    };

    assert!(application.environmental_assessment_accepted);
    assert!(!application.fast_track_eligible);
    assert_eq!(application.land.sensitivity, Sensitivity::High);
    assert_eq!(application.payment.low_sensitivity_payment, 0.0);
}

#[test]
fn application_ids_are_unique_and_dated() {
    let service = build_service();

    let (first_session, _) = service.start_session().expect("session opens");
    let first = complete_fast_track_session(&service, &first_session, 5.0, "none");

    let (second_session, _) = service.start_session().expect("session opens");
    let second = complete_fast_track_session(&service, &second_session, 5.0, "none");

    assert_ne!(first.id, second.id);
    assert!(first.id.0.starts_with("EWCO-"));
    assert!(second.id.0.starts_with("EWCO-"));
}

#[test]
fn numbers_posted_as_strings_are_coerced() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    service
        .submit_step(&session_id, StepId::ApplicantDetails, applicant_details_json())
        .expect("step submission executes");

    let outcome = service
        .submit_step(
            &session_id,
            StepId::LandDetails,
            land_details_json(json!("12.5")),
        )
        .expect("step submission executes");
    assert!(matches!(outcome, StepSubmission::Advanced { .. }));
}

#[test]
fn mistyped_json_values_reject_the_step() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    service
        .submit_step(&session_id, StepId::ApplicantDetails, applicant_details_json())
        .expect("step submission executes");

    let outcome = service
        .submit_step(
            &session_id,
            StepId::LandDetails,
            land_details_json(json!("several")),
        )
        .expect("step submission executes");
    match outcome {
        StepSubmission::Rejected { errors } => {
            assert!(errors.iter().any(|e| e.field == "landArea"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    // The session survives a rejected submission.
    let step = service.current_step(&session_id).expect("session alive");
    assert_eq!(step.step_id, StepId::LandDetails);
}

#[test]
fn unknown_json_fields_reject_the_step() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    let mut values = applicant_details_json();
    values.insert("favouriteTree".to_string(), json!("oak"));

    let outcome = service
        .submit_step(&session_id, StepId::ApplicantDetails, values)
        .expect("step submission executes");
    match outcome {
        StepSubmission::Rejected { errors } => {
            assert!(errors.iter().any(|e| e.field == "favouriteTree"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn going_back_returns_the_previous_step_view() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    service
        .submit_step(&session_id, StepId::ApplicantDetails, applicant_details_json())
        .expect("step submission executes");

    let step = service.go_back(&session_id).expect("session alive");
    assert_eq!(step.step_id, StepId::ApplicantDetails);
}

#[test]
fn visible_fields_reflect_accumulated_answers() {
    let service = build_service();
    let (session_id, _) = service.start_session().expect("session opens");

    let mut values = applicant_details_json();
    values.insert("organizationType".to_string(), json!("organization"));
    values.insert("organizationName".to_string(), json!("Hartley Estates Ltd"));
    service
        .submit_step(&session_id, StepId::ApplicantDetails, values)
        .expect("step submission executes");

    let fields = service
        .visible_fields(&session_id, StepId::ApplicantDetails)
        .expect("step exists");
    assert!(fields.iter().any(|field| field.id == "organizationName"));
}

#[test]
fn payment_estimates_pass_through_to_the_engine() {
    let service = build_service();

    let breakdown = service
        .estimate_payment(&PaymentInput {
            area_hectares: 15.5,
            low_sensitivity: false,
            benefit: BenefitCategory::Biodiversity,
        })
        .expect("valid input");
    assert_eq!(breakdown.total, 380_990.0);

    let result = service.estimate_payment(&PaymentInput {
        area_hectares: -1.0,
        low_sensitivity: false,
        benefit: BenefitCategory::None,
    });
    assert_eq!(result, Err(InvalidInputError::NonPositiveArea(-1.0)));
}

#[test]
fn repository_failures_surface_from_finalization() {
    let service = Arc::new(GrantApplicationService::new(Arc::new(UnavailableRepository)));
    let (session_id, _) = service.start_session().expect("session opens");

    let submissions = [
        (StepId::ApplicantDetails, applicant_details_json()),
        (StepId::LandDetails, land_details_json(json!(5.0))),
        (StepId::SensitivityAssessment, sensitivity_json("no", "no", "no")),
        (StepId::WoodlandType, woodland_json("none")),
    ];
    for (step_id, values) in submissions {
        service
            .submit_step(&session_id, step_id, values)
            .expect("step submission executes");
    }

    let result = service.submit_step(&session_id, StepId::Documents, documents_json());
    assert!(matches!(result, Err(ServiceError::Repository(_))));

    // Nothing was stored, and the session keeps its accumulated answers.
    let step = service
        .current_step(&session_id)
        .expect("session survives the failed finalization");
    assert_eq!(step.step_id, StepId::Documents);
}

#[test]
fn listing_returns_every_stored_application() {
    let service = build_service();
    assert!(service.list().expect("repository reachable").is_empty());

    let (first_session, _) = service.start_session().expect("session opens");
    let first = complete_fast_track_session(&service, &first_session, 12.0, "carbon");

    let (second_session, _) = service.start_session().expect("session opens");
    let second = complete_fast_track_session(&service, &second_session, 3.0, "none");

    let applications = service.list().expect("repository reachable");
    assert_eq!(applications.len(), 2);
    assert!(applications.iter().any(|a| a.id == first.id));
    assert!(applications.iter().any(|a| a.id == second.id));
}

#[test]
fn missing_applications_are_not_found() {
    let service = build_service();
    let result = service.get(&ApplicationId("EWCO-2026-999999".to_string()));
    assert!(matches!(
        result,
        Err(ServiceError::Repository(
            crate::workflows::ewco::repository::RepositoryError::NotFound
        ))
    ));
}
