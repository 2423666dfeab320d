//! Proposal form structure: schema, validation, and the built-in layouts.
//!
//! A form structure is a JSON array of sections. Each section has a title and
//! an ordered list of field definitions. The stored document is kept exactly
//! as submitted (including keys this module does not know about); the typed
//! view below exists only to check the shape before it is persisted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// One section of the proposal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub fields: Vec<FieldDefinition>,
}

/// One input field inside a [`Section`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `structure` is a well-formed form definition.
///
/// Returns the typed sections on success. Every failure is a
/// [`CoreError::Validation`] naming the offending section or field.
pub fn validate_structure(structure: &Value) -> Result<Vec<Section>, CoreError> {
    let items = structure.as_array().ok_or_else(|| {
        CoreError::Validation("Form structure must be an array of sections".into())
    })?;

    let mut sections = Vec::with_capacity(items.len());
    let mut seen_field_ids = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(CoreError::Validation(format!(
                "Section {index} must be an object"
            )));
        }
        let section: Section = serde_json::from_value(item.clone()).map_err(|e| {
            CoreError::Validation(format!("Section {index} is malformed: {e}"))
        })?;

        if section.title.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Section {index} must have a title"
            )));
        }

        for field in &section.fields {
            validate_field(field, &section.title)?;
            if !seen_field_ids.insert(field.id.clone()) {
                return Err(CoreError::Validation(format!(
                    "Field id '{}' is used more than once",
                    field.id
                )));
            }
        }

        sections.push(section);
    }

    Ok(sections)
}

fn validate_field(field: &FieldDefinition, section_title: &str) -> Result<(), CoreError> {
    if field.id.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "A field in section '{section_title}' has an empty id"
        )));
    }
    if field.field_type.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Field '{}' must have a type",
            field.id
        )));
    }
    if field.label.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "Field '{}' must have a label",
            field.id
        )));
    }
    if let (Some(min), Some(max)) = (field.min_length, field.max_length) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "Field '{}' has minLength {min} greater than maxLength {max}",
                field.id
            )));
        }
    }
    if let Some(pattern) = &field.pattern {
        regex::Regex::new(pattern).map_err(|e| {
            CoreError::Validation(format!("Field '{}' has an invalid pattern: {e}", field.id))
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in layouts
// ---------------------------------------------------------------------------

/// Structure served when nothing has been saved yet: one empty section.
pub fn default_structure() -> Value {
    json!([{ "title": "Basic Information", "fields": [] }])
}

/// Email pattern used by the seeded email fields.
const EMAIL_FIELD_PATTERN: &str = r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,4}$";

/// Layout inserted by the bootstrap seeder into an empty store.
pub fn initial_structure() -> Value {
    json!([
        {
            "id": 1,
            "title": "Account Manager Information",
            "fields": [
                { "id": "manager_name", "type": "text", "label": "Name",
                  "required": true, "minLength": 2, "maxLength": 100 },
                { "id": "manager_contact", "type": "text", "label": "Contact Number",
                  "required": true, "minLength": 10, "maxLength": 20 },
                { "id": "manager_email", "type": "email", "label": "Email",
                  "required": true, "pattern": EMAIL_FIELD_PATTERN, "maxLength": 255 }
            ]
        },
        {
            "id": 2,
            "title": "Client Information",
            "fields": [
                { "id": "company_name", "type": "text", "label": "Company name",
                  "required": true, "minLength": 2, "maxLength": 100 },
                { "id": "client_name", "type": "text", "label": "Client name",
                  "required": true, "minLength": 2, "maxLength": 100 },
                { "id": "client_email", "type": "email", "label": "Client email",
                  "required": true, "pattern": EMAIL_FIELD_PATTERN, "maxLength": 255 },
                { "id": "company_number", "type": "text", "label": "Company number",
                  "required": true, "minLength": 5, "maxLength": 20 }
            ]
        },
        {
            "id": 3,
            "title": "Add on Services",
            "fields": [
                { "id": "premium_service", "type": "checkbox",
                  "label": "Premium Services/Quick Delivery (within 2 weeks)", "required": false },
                { "id": "evening_test", "type": "checkbox",
                  "label": "Evening Test (After 6pm)", "required": false },
                { "id": "weekend_holiday", "type": "checkbox",
                  "label": "Weekend/Holiday", "required": false },
                { "id": "onsite_delivery", "type": "checkbox",
                  "label": "On-Site Delivery", "required": false }
            ]
        }
    ])
}
