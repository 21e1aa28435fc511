use std::collections::HashMap;

use stepform_core::{AppError, AppResult};

use crate::field::FieldDescriptor;

/// Ordered group of fields shown together.
#[derive(Debug, Clone)]
pub struct Step {
    title: Option<String>,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl Step {
    /// Creates a step from its fields in display order.
    #[must_use]
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: None,
            description: None,
            fields,
        }
    }

    /// Sets the heading shown above the step.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the text shown under the heading.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the heading.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the text under the heading.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the names of the fields in this step.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDescriptor::name)
    }
}

/// Immutable ordered sequence of steps with a flat field namespace.
#[derive(Debug, Clone)]
pub struct StepSchema {
    steps: Vec<Step>,
    positions: HashMap<String, (usize, usize)>,
}

impl StepSchema {
    /// Creates a schema, checking names and dependencies across all steps.
    pub fn new(steps: Vec<Step>) -> AppResult<Self> {
        if steps.is_empty() {
            return Err(AppError::Validation(
                "step schema must include at least one step".to_owned(),
            ));
        }

        let mut positions = HashMap::new();
        for (step_index, step) in steps.iter().enumerate() {
            for (field_index, field) in step.fields().iter().enumerate() {
                if positions
                    .insert(field.name().to_owned(), (step_index, field_index))
                    .is_some()
                {
                    return Err(AppError::Validation(format!(
                        "duplicate field name '{}' in step schema",
                        field.name()
                    )));
                }
            }
        }

        let schema = Self { steps, positions };
        for field in schema.fields() {
            let Some(dependency) = field.dependency() else {
                continue;
            };
            let Some(controller) = schema.field(dependency.field_name()) else {
                return Err(AppError::Validation(format!(
                    "field '{}' depends on unknown field '{}'",
                    field.name(),
                    dependency.field_name()
                )));
            };

            if controller.value_type() != dependency.condition().value_type() {
                return Err(AppError::Validation(format!(
                    "field '{}' compares {} field '{}' with a {} literal",
                    field.name(),
                    controller.value_type(),
                    controller.name(),
                    dependency.condition().value_type()
                )));
            }
        }

        Ok(schema)
    }

    /// Returns all steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns one step by index.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; a schema has at least one step.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the index of the final step.
    #[must_use]
    pub fn last_step_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Returns every field of every step in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.steps.iter().flat_map(|step| step.fields().iter())
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        let (step_index, field_index) = self.positions.get(name)?;
        self.steps.get(*step_index)?.fields().get(*field_index)
    }
}

#[cfg(test)]
mod tests {
    use super::{Step, StepSchema};
    use crate::field::{FieldDescriptor, FieldKind, TextInputType};
    use crate::rule::FieldRule;

    fn text_field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(
            name,
            name,
            FieldKind::Text {
                input_type: TextInputType::Text,
            },
            FieldRule::optional(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn switch_field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name, FieldKind::Switch, FieldRule::optional())
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn names_must_be_unique_across_steps() {
        let result = StepSchema::new(vec![
            Step::new(vec![text_field("city")]),
            Step::new(vec![text_field("city")]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn dependencies_must_reference_known_fields() {
        let dependent = text_field("telegram")
            .depends_on("has_telegram", true)
            .unwrap_or_else(|_| unreachable!());
        let result = StepSchema::new(vec![Step::new(vec![dependent])]);
        assert!(result.is_err());
    }

    #[test]
    fn dependency_literals_must_fit_the_controller() {
        let dependent = text_field("telegram")
            .depends_on("has_telegram", "yes")
            .unwrap_or_else(|_| unreachable!());
        let result = StepSchema::new(vec![Step::new(vec![
            switch_field("has_telegram"),
            dependent,
        ])]);
        assert!(result.is_err());
    }

    #[test]
    fn fields_are_found_by_name_in_document_order() {
        let schema = StepSchema::new(vec![
            Step::new(vec![text_field("firstname"), text_field("lastname")]).with_title("Identity"),
            Step::new(vec![text_field("city")]),
        ])
        .unwrap_or_else(|_| unreachable!());

        let names: Vec<&str> = schema.fields().map(FieldDescriptor::name).collect();
        assert_eq!(names, vec!["firstname", "lastname", "city"]);
        assert_eq!(schema.field("lastname").map(FieldDescriptor::name), Some("lastname"));
        assert_eq!(schema.last_step_index(), 1);
        assert!(schema.field("nationality").is_none());
    }

    #[test]
    fn empty_schemas_are_rejected() {
        assert!(StepSchema::new(Vec::new()).is_err());
    }
}
