use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier for a configured form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    ApplicantDetails,
    LandDetails,
    SensitivityAssessment,
    EnvironmentalAssessment,
    WoodlandType,
    Documents,
}

impl StepId {
    pub const fn key(self) -> &'static str {
        match self {
            StepId::ApplicantDetails => "applicant-details",
            StepId::LandDetails => "land-details",
            StepId::SensitivityAssessment => "sensitivity-assessment",
            StepId::EnvironmentalAssessment => "environmental-assessment",
            StepId::WoodlandType => "woodland-type",
            StepId::Documents => "documents",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "applicant-details" => Some(StepId::ApplicantDetails),
            "land-details" => Some(StepId::LandDetails),
            "sensitivity-assessment" => Some(StepId::SensitivityAssessment),
            "environmental-assessment" => Some(StepId::EnvironmentalAssessment),
            "woodland-type" => Some(StepId::WoodlandType),
            "documents" => Some(StepId::Documents),
            _ => None,
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Closed set of input kinds a step can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    MultiSelect,
    File,
    Radio,
    Checkbox,
}

impl FieldType {
    pub const fn label(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::File => "file",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Whether a typed value is acceptable for a field of this kind.
    pub fn accepts(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldType::Text, FieldValue::Text(_))
                | (FieldType::Number, FieldValue::Number(_))
                | (FieldType::Select, FieldValue::Choice(_))
                | (FieldType::Radio, FieldValue::Choice(_))
                | (FieldType::MultiSelect, FieldValue::MultiChoice(_))
                | (FieldType::File, FieldValue::Files(_))
                | (FieldType::Checkbox, FieldValue::Checked(_))
        )
    }

    /// Coerce a raw JSON value into the tagged representation for this kind.
    ///
    /// Browser forms post numbers as strings, so numeric fields accept both.
    pub fn coerce(self, raw: &Value) -> Result<FieldValue, String> {
        match self {
            FieldType::Text => match raw {
                Value::String(text) => Ok(FieldValue::Text(text.clone())),
                _ => Err("expected a text value".to_string()),
            },
            FieldType::Number => match raw {
                Value::Number(number) => number
                    .as_f64()
                    .map(FieldValue::Number)
                    .ok_or_else(|| "expected a numeric value".to_string()),
                Value::String(text) => text
                    .trim()
                    .parse::<f64>()
                    .map(FieldValue::Number)
                    .map_err(|_| format!("'{text}' is not a number")),
                _ => Err("expected a numeric value".to_string()),
            },
            FieldType::Select | FieldType::Radio => match raw {
                Value::String(choice) => Ok(FieldValue::Choice(choice.clone())),
                _ => Err("expected a single option value".to_string()),
            },
            FieldType::MultiSelect => string_list(raw)
                .map(FieldValue::MultiChoice)
                .ok_or_else(|| "expected a list of option values".to_string()),
            FieldType::File => string_list(raw)
                .map(FieldValue::Files)
                .ok_or_else(|| "expected a list of file names".to_string()),
            FieldType::Checkbox => match raw {
                Value::Bool(checked) => Ok(FieldValue::Checked(*checked)),
                _ => Err("expected true or false".to_string()),
            },
        }
    }
}

fn string_list(raw: &Value) -> Option<Vec<String>> {
    match raw {
        Value::String(single) => Some(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

/// Typed answer value, tagged by the field kind that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Choice(String),
    MultiChoice(Vec<String>),
    Checked(bool),
    Files(Vec<String>),
}

impl FieldValue {
    /// An "empty" answer does not satisfy a required field.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) | FieldValue::Choice(text) => text.trim().is_empty(),
            FieldValue::MultiChoice(items) | FieldValue::Files(items) => items.is_empty(),
            FieldValue::Checked(checked) => !checked,
            FieldValue::Number(_) => false,
        }
    }

    /// Set membership test used by conditional visibility clauses.
    pub fn matches_any(&self, allowed: &[&str]) -> bool {
        match self {
            FieldValue::Text(value) | FieldValue::Choice(value) => {
                allowed.contains(&value.as_str())
            }
            FieldValue::MultiChoice(values) => {
                values.iter().any(|value| allowed.contains(&value.as_str()))
            }
            FieldValue::Checked(checked) => allowed.contains(if *checked { &"yes" } else { &"no" }),
            FieldValue::Number(_) | FieldValue::Files(_) => false,
        }
    }
}

/// One selectable option for select, radio, and multiselect fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Visibility clause: the field shows only while the dependent answer is one
/// of the listed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionalRule {
    pub depends_on: &'static str,
    pub values: &'static [&'static str],
}

/// Field-level validator returning a message when the value is unacceptable.
pub type FieldValidator = fn(&FieldValue) -> Option<String>;

/// Definition of one input collected by a step.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [FieldOption]>,
    #[serde(skip)]
    pub validator: Option<FieldValidator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional: Option<ConditionalRule>,
}

/// Step predicate over the accumulated answers; false blocks progression.
pub type StepPredicate = fn(&FormAnswers) -> bool;

/// Branch rule deciding the next step from accumulated answers. `None` marks
/// the terminal step.
pub type BranchRule = fn(&FormAnswers) -> Option<StepId>;

/// Definition of one step in the application form.
#[derive(Debug, Clone)]
pub struct FormStep {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: Vec<FormField>,
    pub validation: StepPredicate,
    pub next_step: BranchRule,
}

impl FormStep {
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// Accumulated, typed answers across all steps seen so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormAnswers {
    values: BTreeMap<String, FieldValue>,
}

impl FormAnswers {
    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, value: FieldValue) {
        self.values.insert(id.into(), value);
    }

    pub fn remove(&mut self, id: &str) -> Option<FieldValue> {
        self.values.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text or single-choice answer as a string slice.
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.values.get(id) {
            Some(FieldValue::Text(value)) | Some(FieldValue::Choice(value)) => Some(value),
            _ => None,
        }
    }

    pub fn choice(&self, id: &str) -> Option<&str> {
        match self.values.get(id) {
            Some(FieldValue::Choice(value)) => Some(value),
            _ => None,
        }
    }

    pub fn choice_is(&self, id: &str, expected: &str) -> bool {
        self.choice(id) == Some(expected)
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        match self.values.get(id) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }
}

impl FromIterator<(String, FieldValue)> for FormAnswers {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Per-field validation failure surfaced back to the active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
