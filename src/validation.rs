//! Field errors collected over a whole validation pass.
//!
//! Serialises as `{"field": ["message", ...]}`. Failures that concern no
//! single field are filed under `non_field_errors`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub mod message {
    pub const REQUIRED: &str = "This field is required.";
    pub const BLANK: &str = "This field may not be blank.";
    pub const UNIQUE: &str = "This field must be unique.";
    pub const READ_ONLY: &str = "This field is read-only.";
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok` if nothing was collected.
    pub fn check(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Presence check for a field the caller must send.
    ///
    /// A blank value is recorded and cleared, so later rules skip it.
    pub fn required(
        &mut self,
        field: &str,
        value: &mut Option<String>,
        missing: &str,
        blank: &str,
    ) {
        match value {
            None => self.add(field, missing),
            Some(v) if v.trim().is_empty() => {
                self.add(field, blank);
                *value = None;
            }
            Some(_) => {}
        }
    }

    /// Like [`FieldErrors::required`], for a field that may be left out.
    pub fn not_blank(&mut self, field: &str, value: &mut Option<String>) {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            self.add(field, message::BLANK);
            *value = None;
        }
    }

    /// Files the failures reported by `validator`.
    pub fn merge(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors.iter() {
                self.add(&field, describe(error));
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = Self::default();
        field_errors.merge(&errors);
        field_errors
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &*error.code {
        "length" => describe_length(error),
        code => format!("Invalid value ({code})."),
    }
}

fn describe_length(error: &ValidationError) -> String {
    let bound = |name: &str| error.params.get(name).and_then(Value::as_u64);
    let length = error
        .params
        .get("value")
        .and_then(Value::as_str)
        .map(|value| value.chars().count() as u64);

    match (length, bound("min"), bound("max")) {
        (Some(length), Some(min), _) if length < min => {
            format!("Ensure this field has at least {min} characters.")
        }
        (_, _, Some(max)) => format!("Ensure this field has no more than {max} characters."),
        (_, Some(min), None) => format!("Ensure this field has at least {min} characters."),
        _ => "Ensure this field has a valid length.".to_owned(),
    }
}
