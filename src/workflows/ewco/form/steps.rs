//! Standard EWCO application form definition.
//!
//! Field ids and option tables mirror the published application journey:
//! applicant details, land details, a sensitivity assessment that decides
//! whether an Environmental Impact Assessment step is needed, woodland type
//! selection, and supporting documents.

use super::domain::{
    ConditionalRule, FieldOption, FieldType, FieldValue, FormAnswers, FormField, FormStep, StepId,
};

const YES_NO_UNSURE: &[FieldOption] = &[
    FieldOption { value: "yes", label: "Yes" },
    FieldOption { value: "no", label: "No" },
    FieldOption { value: "unsure", label: "I'm not sure" },
];

const ORGANIZATION_TYPES: &[FieldOption] = &[
    FieldOption { value: "individual", label: "Individual landowner" },
    FieldOption { value: "organization", label: "Organization or business" },
    FieldOption { value: "public-body", label: "Public body" },
];

const COUNTIES: &[FieldOption] = &[
    FieldOption { value: "bedfordshire", label: "Bedfordshire" },
    FieldOption { value: "berkshire", label: "Berkshire" },
    FieldOption { value: "buckinghamshire", label: "Buckinghamshire" },
    FieldOption { value: "cambridgeshire", label: "Cambridgeshire" },
    FieldOption { value: "cheshire", label: "Cheshire" },
    FieldOption { value: "cornwall", label: "Cornwall" },
    FieldOption { value: "cumbria", label: "Cumbria" },
    FieldOption { value: "derbyshire", label: "Derbyshire" },
    FieldOption { value: "devon", label: "Devon" },
    FieldOption { value: "dorset", label: "Dorset" },
    FieldOption { value: "durham", label: "Durham" },
    FieldOption { value: "essex", label: "Essex" },
    FieldOption { value: "gloucestershire", label: "Gloucestershire" },
    FieldOption { value: "hampshire", label: "Hampshire" },
    FieldOption { value: "hertfordshire", label: "Hertfordshire" },
    FieldOption { value: "kent", label: "Kent" },
    FieldOption { value: "lancashire", label: "Lancashire" },
    FieldOption { value: "leicestershire", label: "Leicestershire" },
    FieldOption { value: "lincolnshire", label: "Lincolnshire" },
    FieldOption { value: "norfolk", label: "Norfolk" },
    FieldOption { value: "northumberland", label: "Northumberland" },
    FieldOption { value: "nottinghamshire", label: "Nottinghamshire" },
    FieldOption { value: "oxfordshire", label: "Oxfordshire" },
    FieldOption { value: "shropshire", label: "Shropshire" },
    FieldOption { value: "somerset", label: "Somerset" },
    FieldOption { value: "staffordshire", label: "Staffordshire" },
    FieldOption { value: "suffolk", label: "Suffolk" },
    FieldOption { value: "surrey", label: "Surrey" },
    FieldOption { value: "sussex", label: "Sussex" },
    FieldOption { value: "warwickshire", label: "Warwickshire" },
    FieldOption { value: "wiltshire", label: "Wiltshire" },
    FieldOption { value: "yorkshire", label: "Yorkshire" },
];

const LAND_USES: &[FieldOption] = &[
    FieldOption { value: "agricultural", label: "Agricultural land" },
    FieldOption { value: "grassland", label: "Grassland" },
    FieldOption { value: "scrubland", label: "Scrubland" },
    FieldOption { value: "brownfield", label: "Brownfield site" },
    FieldOption { value: "other", label: "Other" },
];

const SOIL_TYPES: &[FieldOption] = &[
    FieldOption { value: "clay", label: "Clay" },
    FieldOption { value: "loam", label: "Loam" },
    FieldOption { value: "sand", label: "Sand" },
    FieldOption { value: "chalk", label: "Chalk" },
    FieldOption { value: "peat", label: "Peat" },
    FieldOption { value: "mixed", label: "Mixed" },
];

const PROTECTED_AREA_TYPES: &[FieldOption] = &[
    FieldOption { value: "sssi", label: "Site of Special Scientific Interest (SSSI)" },
    FieldOption { value: "nationalpark", label: "National Park" },
    FieldOption { value: "aonb", label: "Area of Outstanding Natural Beauty" },
    FieldOption { value: "sac", label: "Special Area of Conservation" },
    FieldOption { value: "spa", label: "Special Protection Area" },
    FieldOption { value: "ramsar", label: "Ramsar site" },
    FieldOption { value: "other", label: "Other designated area" },
];

const EIA_RESPONSES: &[FieldOption] = &[
    FieldOption { value: "accept", label: "I understand and will complete the EIA" },
    FieldOption { value: "decline", label: "I do not want to proceed with the EIA" },
];

const WOODLAND_TYPES: &[FieldOption] = &[
    FieldOption { value: "broadleaf", label: "Broadleaf woodland (native species)" },
    FieldOption { value: "conifer", label: "Conifer woodland" },
    FieldOption { value: "mixed", label: "Mixed woodland (broadleaf and conifer)" },
    FieldOption { value: "agroforestry", label: "Agroforestry system" },
];

const SPECIES: &[FieldOption] = &[
    FieldOption { value: "oak", label: "English Oak" },
    FieldOption { value: "beech", label: "Beech" },
    FieldOption { value: "ash", label: "Ash" },
    FieldOption { value: "birch", label: "Birch" },
    FieldOption { value: "alder", label: "Alder" },
    FieldOption { value: "scots-pine", label: "Scots Pine" },
    FieldOption { value: "norway-spruce", label: "Norway Spruce" },
    FieldOption { value: "douglas-fir", label: "Douglas Fir" },
    FieldOption { value: "mixed-native", label: "Mixed native species" },
    FieldOption { value: "other", label: "Other (please specify)" },
];

const PLANTING_DENSITIES: &[FieldOption] = &[
    FieldOption { value: "1100", label: "1,100 trees/ha (3m x 3m spacing)" },
    FieldOption { value: "1600", label: "1,600 trees/ha (2.5m x 2.5m spacing)" },
    FieldOption { value: "2500", label: "2,500 trees/ha (2m x 2m spacing)" },
    FieldOption { value: "natural", label: "Natural regeneration" },
];

const BENEFIT_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "carbon", label: "Enhanced carbon sequestration" },
    FieldOption { value: "biodiversity", label: "Biodiversity enhancement" },
    FieldOption { value: "water", label: "Water quality improvement" },
    FieldOption { value: "flood", label: "Flood risk reduction" },
    FieldOption { value: "access", label: "Public access provision" },
    FieldOption { value: "multiple", label: "Multiple benefits" },
    FieldOption { value: "none", label: "No additional benefits" },
];

fn always_valid(_: &FormAnswers) -> bool {
    true
}

fn email_format(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(address) if !address.contains('@') => {
            Some("Enter an email address in the correct format".to_string())
        }
        _ => None,
    }
}

fn positive_area(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Number(area) if !area.is_finite() || *area <= 0.0 => {
            Some("Enter a land area greater than zero hectares".to_string())
        }
        _ => None,
    }
}

/// An Environmental Impact Assessment is needed for designated or otherwise
/// sensitive land, and for any proposal over 50 hectares.
pub fn requires_environmental_assessment(answers: &FormAnswers) -> bool {
    answers.choice_is("inProtectedArea", "yes")
        || answers.choice_is("hasRareSpecies", "yes")
        || answers.choice_is("hasArchaeology", "yes")
        || answers
            .number("landArea")
            .map(|area| area > 50.0)
            .unwrap_or(false)
}

/// Land is low sensitivity only when every sensitivity question was answered
/// "no"; an "unsure" answer is treated as sensitive.
pub fn low_sensitivity(answers: &FormAnswers) -> bool {
    answers.choice_is("inProtectedArea", "no")
        && answers.choice_is("hasRareSpecies", "no")
        && answers.choice_is("hasArchaeology", "no")
}

/// Fast-track processing applies to low sensitivity land of at most 50 ha.
pub fn fast_track_eligible(answers: &FormAnswers) -> bool {
    low_sensitivity(answers)
        && answers
            .number("landArea")
            .map(|area| area <= 50.0)
            .unwrap_or(false)
}

fn to_land_details(_: &FormAnswers) -> Option<StepId> {
    Some(StepId::LandDetails)
}

fn to_sensitivity_assessment(_: &FormAnswers) -> Option<StepId> {
    Some(StepId::SensitivityAssessment)
}

fn sensitivity_branch(answers: &FormAnswers) -> Option<StepId> {
    if requires_environmental_assessment(answers) {
        Some(StepId::EnvironmentalAssessment)
    } else {
        Some(StepId::WoodlandType)
    }
}

fn to_woodland_type(_: &FormAnswers) -> Option<StepId> {
    Some(StepId::WoodlandType)
}

fn to_documents(_: &FormAnswers) -> Option<StepId> {
    Some(StepId::Documents)
}

fn terminal(_: &FormAnswers) -> Option<StepId> {
    None
}

pub fn application_form_steps() -> Vec<FormStep> {
    vec![
        FormStep {
            id: StepId::ApplicantDetails,
            title: "Applicant Details",
            description: "Tell us about yourself and your organization",
            fields: vec![
                FormField {
                    id: "applicantName",
                    field_type: FieldType::Text,
                    label: "Full name",
                    hint: Some("Enter your full name as it appears on official documents"),
                    required: true,
                    options: None,
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "applicantEmail",
                    field_type: FieldType::Text,
                    label: "Email address",
                    hint: Some("We will use this to contact you about your application"),
                    required: true,
                    options: None,
                    validator: Some(email_format),
                    conditional: None,
                },
                FormField {
                    id: "organizationType",
                    field_type: FieldType::Radio,
                    label: "Are you applying as an individual or organization?",
                    hint: None,
                    required: true,
                    options: Some(ORGANIZATION_TYPES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "organizationName",
                    field_type: FieldType::Text,
                    label: "Organization name",
                    hint: None,
                    required: true,
                    options: None,
                    validator: None,
                    conditional: Some(ConditionalRule {
                        depends_on: "organizationType",
                        values: &["organization", "public-body"],
                    }),
                },
            ],
            validation: always_valid,
            next_step: to_land_details,
        },
        FormStep {
            id: StepId::LandDetails,
            title: "Land Details",
            description: "Provide information about the land where you want to create woodland",
            fields: vec![
                FormField {
                    id: "landArea",
                    field_type: FieldType::Number,
                    label: "Total land area (hectares)",
                    hint: Some("Minimum 1 hectare required for EWCO"),
                    required: true,
                    options: None,
                    validator: Some(positive_area),
                    conditional: None,
                },
                FormField {
                    id: "county",
                    field_type: FieldType::Select,
                    label: "County",
                    hint: None,
                    required: true,
                    options: Some(COUNTIES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "currentLandUse",
                    field_type: FieldType::Select,
                    label: "Current land use",
                    hint: None,
                    required: true,
                    options: Some(LAND_USES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "soilType",
                    field_type: FieldType::Select,
                    label: "Predominant soil type",
                    hint: None,
                    required: true,
                    options: Some(SOIL_TYPES),
                    validator: None,
                    conditional: None,
                },
            ],
            validation: always_valid,
            next_step: to_sensitivity_assessment,
        },
        FormStep {
            id: StepId::SensitivityAssessment,
            title: "Land Sensitivity Assessment",
            description: "We need to assess the environmental sensitivity of your land",
            fields: vec![
                FormField {
                    id: "inProtectedArea",
                    field_type: FieldType::Radio,
                    label: "Is the land in or near a protected environmental area?",
                    hint: Some(
                        "This includes Sites of Special Scientific Interest (SSSI), National \
                         Parks, Areas of Outstanding Natural Beauty, or other designated areas",
                    ),
                    required: true,
                    options: Some(YES_NO_UNSURE),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "protectedAreaType",
                    field_type: FieldType::Select,
                    label: "Type of protected area",
                    hint: None,
                    required: true,
                    options: Some(PROTECTED_AREA_TYPES),
                    validator: None,
                    conditional: Some(ConditionalRule {
                        depends_on: "inProtectedArea",
                        values: &["yes"],
                    }),
                },
                FormField {
                    id: "hasRareSpecies",
                    field_type: FieldType::Radio,
                    label: "Are there any rare or protected species on the land?",
                    hint: None,
                    required: true,
                    options: Some(YES_NO_UNSURE),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "hasArchaeology",
                    field_type: FieldType::Radio,
                    label: "Are there any archaeological features on the land?",
                    hint: None,
                    required: true,
                    options: Some(YES_NO_UNSURE),
                    validator: None,
                    conditional: None,
                },
            ],
            validation: always_valid,
            next_step: sensitivity_branch,
        },
        FormStep {
            id: StepId::EnvironmentalAssessment,
            title: "Environmental Impact Assessment",
            description: "Based on your land details, an Environmental Impact Assessment may be required",
            fields: vec![
                FormField {
                    id: "eiaRequired",
                    field_type: FieldType::Radio,
                    label: "Environmental Impact Assessment Required",
                    hint: Some(
                        "Due to the sensitivity of your land or the size of the proposed \
                         woodland, you will need to complete an Environmental Impact Assessment",
                    ),
                    required: true,
                    options: Some(EIA_RESPONSES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "eiaConsultant",
                    field_type: FieldType::Text,
                    label: "Environmental consultant name (optional)",
                    hint: Some(
                        "If you are using an environmental consultant, please provide their \
                         name and contact details",
                    ),
                    required: false,
                    options: None,
                    validator: None,
                    conditional: Some(ConditionalRule {
                        depends_on: "eiaRequired",
                        values: &["accept"],
                    }),
                },
            ],
            validation: always_valid,
            next_step: to_woodland_type,
        },
        FormStep {
            id: StepId::WoodlandType,
            title: "Woodland Type Selection",
            description: "Choose the type of woodland you want to create",
            fields: vec![
                FormField {
                    id: "woodlandType",
                    field_type: FieldType::Radio,
                    label: "Primary woodland type",
                    hint: None,
                    required: true,
                    options: Some(WOODLAND_TYPES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "species",
                    field_type: FieldType::Select,
                    label: "Primary tree species",
                    hint: None,
                    required: true,
                    options: Some(SPECIES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "plantingDensity",
                    field_type: FieldType::Select,
                    label: "Planting density (trees per hectare)",
                    hint: None,
                    required: true,
                    options: Some(PLANTING_DENSITIES),
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "additionalBenefits",
                    field_type: FieldType::Radio,
                    label: "Will this woodland provide additional environmental benefits?",
                    hint: Some("Additional benefits may qualify for extra payments"),
                    required: true,
                    options: Some(BENEFIT_OPTIONS),
                    validator: None,
                    conditional: None,
                },
            ],
            validation: always_valid,
            next_step: to_documents,
        },
        FormStep {
            id: StepId::Documents,
            title: "Supporting Documents",
            description: "Upload the required documents for your application",
            fields: vec![
                FormField {
                    id: "wcpDocument",
                    field_type: FieldType::File,
                    label: "Woodland Creation Plan (WCP)",
                    hint: Some(
                        "Upload your completed Woodland Creation Plan. Accepted formats: PDF, \
                         DOC, DOCX",
                    ),
                    required: true,
                    options: None,
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "mapDocument",
                    field_type: FieldType::File,
                    label: "Site map and boundary files",
                    hint: Some(
                        "Upload detailed maps showing the proposed woodland area. Accepted \
                         formats: PDF, JPG, PNG, KML",
                    ),
                    required: true,
                    options: None,
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "environmentalSurveys",
                    field_type: FieldType::File,
                    label: "Environmental surveys (if applicable)",
                    hint: Some(
                        "Upload any environmental or ecological surveys. Accepted formats: \
                         PDF, DOC, DOCX",
                    ),
                    required: false,
                    options: None,
                    validator: None,
                    conditional: None,
                },
                FormField {
                    id: "landOwnership",
                    field_type: FieldType::File,
                    label: "Proof of land ownership or management rights",
                    hint: Some(
                        "Upload documents proving you own or have rights to manage the land. \
                         Accepted formats: PDF, DOC, DOCX",
                    ),
                    required: true,
                    options: None,
                    validator: None,
                    conditional: None,
                },
            ],
            validation: always_valid,
            next_step: terminal,
        },
    ]
}
