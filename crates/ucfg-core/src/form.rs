//! Form submission → [`EditPatch`]
//!
//! The rendered form has, per field, one primary control (text box, number
//! box, checkbox or select) and one free-text override box. On submit each
//! field is serialized according to its [`TypeHint`]; a non-empty override
//! always wins over the primary control. Only `# string` fields are quoted;
//! free text is written as typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::merge::{EditPatch, PatchValue};
use crate::types::{FieldDescriptor, ParsedConfig, TypeHint};

/// Value of a field's primary control at submit time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ControlValue {
    Text(String),
    Number(String),
    Checked(bool),
    Selected(String),
}

/// One submitted form row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedField {
    pub control: ControlValue,
    #[serde(default)]
    pub override_value: Option<String>,
}

impl SubmittedField {
    pub fn new(control: ControlValue) -> Self {
        Self {
            control,
            override_value: None,
        }
    }

    pub fn with_override(mut self, value: impl Into<String>) -> Self {
        self.override_value = Some(value.into());
        self
    }
}

/// Everything a form posts, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSubmission {
    pub fields: BTreeMap<String, SubmittedField>,
}

impl FormSubmission {
    /// The submission an untouched form would produce
    pub fn from_parsed(parsed: &ParsedConfig) -> Self {
        let fields = parsed
            .fields()
            .map(|f| (f.name.clone(), initial_submission(f)))
            .collect();
        Self { fields }
    }

    pub fn set(&mut self, name: impl Into<String>, field: SubmittedField) {
        self.fields.insert(name.into(), field);
    }

    /// Serialize every submitted row that names a known field
    ///
    /// Rows for unknown fields and unparsable numbers are skipped.
    pub fn to_patch(&self, parsed: &ParsedConfig) -> EditPatch {
        let mut patch = EditPatch::new();

        for (name, submitted) in &self.fields {
            let Some(field) = parsed.field(name) else {
                debug!("submitted field {} not in config, skipping", name);
                continue;
            };

            if let Some(value) = serialize_field(field, submitted) {
                patch.insert(name.clone(), value);
            }
        }

        patch
    }
}

/// Serialize one submitted row per its field's type
pub fn serialize_field(field: &FieldDescriptor, submitted: &SubmittedField) -> Option<PatchValue> {
    if let Some(raw) = submitted.override_value.as_deref().filter(|v| !v.is_empty()) {
        return Some(PatchValue::Text(raw.to_string()));
    }

    match (&field.type_hint, &submitted.control) {
        (TypeHint::Number, ControlValue::Number(n) | ControlValue::Text(n)) => {
            match n.trim().parse::<i64>() {
                // Unchanged value keeps its spelling (`08` stays `08`)
                Ok(n) if field.raw_value.trim().parse::<i64>().ok() == Some(n) => {
                    Some(PatchValue::Text(field.raw_value.clone()))
                }
                Ok(n) => Some(PatchValue::Integer(n)),
                Err(_) => {
                    debug!("unparsable number {:?} for {}", n, field.name);
                    None
                }
            }
        }
        (TypeHint::Boolean, ControlValue::Checked(b)) => Some(PatchValue::Bool(*b)),
        (TypeHint::Enumerated(_), ControlValue::Selected(s)) => Some(PatchValue::Text(s.clone())),
        (TypeHint::String, ControlValue::Text(s)) if field.is_quoted_string() => {
            Some(PatchValue::Text(format!("\"{}\"", s)))
        }
        (TypeHint::String, ControlValue::Text(s)) if s.is_empty() => {
            debug!("empty free text for {}, skipping", field.name);
            None
        }
        (TypeHint::String, ControlValue::Text(s)) => Some(PatchValue::Text(s.clone())),
        (hint, control) => {
            debug!(
                "control {:?} does not match {} field {}",
                control,
                hint.type_name(),
                field.name
            );
            None
        }
    }
}

fn initial_submission(field: &FieldDescriptor) -> SubmittedField {
    let control = match &field.type_hint {
        TypeHint::String => ControlValue::Text(field.control_value.clone().unwrap_or_default()),
        TypeHint::Number => ControlValue::Number(field.control_value.clone().unwrap_or_default()),
        TypeHint::Boolean => ControlValue::Checked(field.checked()),
        TypeHint::Enumerated(options) => ControlValue::Selected(
            field
                .selected()
                .or_else(|| options.first().map(String::as_str))
                .unwrap_or_default()
                .to_string(),
        ),
    };

    SubmittedField {
        control,
        override_value: field.override_value.clone(),
    }
}
