use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payments::{BenefitCategory, PaymentBreakdown};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Sensitivity classification derived from the assessment answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    High,
}

impl Sensitivity {
    pub const fn label(self) -> &'static str {
        match self {
            Sensitivity::Low => "low",
            Sensitivity::High => "high",
        }
    }
}

/// The land a woodland is proposed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandParcel {
    pub area_hectares: f64,
    pub county: String,
    pub soil_type: String,
    pub current_land_use: String,
    pub sensitivity: Sensitivity,
}

/// The applicant's woodland design choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoodlandChoice {
    pub woodland_type: String,
    pub primary_species: String,
    pub planting_density: String,
    pub additional_benefit: BenefitCategory,
}

/// High level status tracked throughout the grant application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under-review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Completed grant application produced when a form session finalizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    pub land: LandParcel,
    pub woodland: WoodlandChoice,
    pub environmental_assessment_accepted: bool,
    pub fast_track_eligible: bool,
    pub payment: PaymentBreakdown,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Application {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            status: self.status.label(),
            fast_track_eligible: self.fast_track_eligible,
            total_payment: self.payment.total,
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub fast_track_eligible: bool,
    pub total_payment: f64,
}
