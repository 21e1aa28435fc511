use stepform_core::{AppError, AppResult};
use stepform_domain::{FieldKind, FieldValue, Language};

use super::{FALLBACK_LANGUAGE, WizardSession};
use crate::validation_schema::is_field_active;

/// What a front end shows for the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    /// Zero-based step index.
    pub index: usize,
    /// Number of steps.
    pub total: usize,
    /// Heading.
    pub title: Option<String>,
    /// Text under the heading.
    pub description: Option<String>,
    /// Visible fields in display order.
    pub fields: Vec<FieldView>,
}

impl StepView {
    /// Returns whether this step ends with submission.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// One visible field with its current value and error.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    /// Field name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Help text.
    pub description: Option<String>,
    /// Placeholder for empty inputs.
    pub placeholder: Option<String>,
    /// Widget kind.
    pub kind: FieldKind,
    /// Current value.
    pub value: Option<FieldValue>,
    /// Error from the last validation.
    pub error: Option<String>,
    /// Whether the field is marked as required.
    pub required: bool,
}

impl WizardSession {
    /// Describes the current step; fields with unmet dependencies are left out.
    pub fn current_step_view(&self) -> AppResult<StepView> {
        let index = self.current_step()?;
        let step = self
            .schema
            .step(index)
            .ok_or_else(|| AppError::Internal(format!("step {index} is outside the schema")))?;
        let fields = step
            .fields()
            .iter()
            .filter(|field| is_field_active(field, &self.values))
            .map(|field| FieldView {
                name: field.name().to_owned(),
                label: field.label().to_owned(),
                description: field.description().map(str::to_owned),
                placeholder: field.placeholder().map(str::to_owned),
                kind: field.kind().clone(),
                value: self.values.get(field.name()).cloned(),
                error: self.errors.get(field.name()).cloned(),
                required: field.rule().is_required(),
            })
            .collect();

        Ok(StepView {
            index,
            total: self.schema.len(),
            title: step.title().map(str::to_owned),
            description: step.description().map(str::to_owned),
            fields,
        })
    }

    /// Returns interface text in the active language.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        self.ports
            .translator
            .translate(self.display_language(), key)
    }

    /// Returns interface text with `{{name}}` placeholders filled in.
    #[must_use]
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.ports
            .translator
            .translate_with(self.display_language(), key, args)
    }

    fn display_language(&self) -> Language {
        self.language.unwrap_or(FALLBACK_LANGUAGE)
    }
}
