//! Effective validation rules derived from the schema and current values.
//!
//! Everything here is pure: the same schema and values always produce the
//! same rules, so the map can be rebuilt after every edit.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use stepform_domain::{FieldDescriptor, FieldRule, FieldValue, FieldValues, StepSchema};

use crate::wizard_ports::StoredValues;

/// Rule in force for one field under the current values.
#[derive(Debug, Clone, Copy)]
pub enum EffectiveRule<'a> {
    /// The field is active and its own rule applies.
    Enforced(&'a FieldRule),
    /// The field's dependency is unmet; every value is accepted.
    Exempt,
}

impl EffectiveRule<'_> {
    /// Validates a value, returning the failure message.
    pub fn validate(&self, value: Option<&FieldValue>, today: NaiveDate) -> Result<(), String> {
        match self {
            Self::Enforced(rule) => rule.validate(value, today),
            Self::Exempt => Ok(()),
        }
    }

    /// Returns whether a value must be provided.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match self {
            Self::Enforced(rule) => rule.is_required(),
            Self::Exempt => false,
        }
    }
}

/// Failed validation of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Message from the field's rule.
    pub message: String,
}

/// Field name to effective rule, covering every field of the schema.
#[derive(Debug, Clone)]
pub struct EffectiveValidationMap<'a> {
    rules: BTreeMap<&'a str, EffectiveRule<'a>>,
}

impl<'a> EffectiveValidationMap<'a> {
    /// Derives the effective rule of every field in document order.
    #[must_use]
    pub fn build(schema: &'a StepSchema, values: &FieldValues) -> Self {
        let rules = schema
            .fields()
            .map(|field| {
                let rule = if is_field_active(field, values) {
                    EffectiveRule::Enforced(field.rule())
                } else {
                    EffectiveRule::Exempt
                };
                (field.name(), rule)
            })
            .collect();

        Self { rules }
    }

    /// Returns the effective rule for a field.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<EffectiveRule<'a>> {
        self.rules.get(name).copied()
    }

    /// Returns the number of fields covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the map covers no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validates only the named fields, in the order given.
    ///
    /// Names unknown to the schema are skipped.
    pub fn validate_fields<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
        values: &FieldValues,
        today: NaiveDate,
    ) -> Vec<FieldError> {
        names
            .into_iter()
            .filter_map(|name| {
                let rule = self.rules.get(name)?;
                rule.validate(values.get(name), today)
                    .err()
                    .map(|message| FieldError {
                        field: name.to_owned(),
                        message,
                    })
            })
            .collect()
    }
}

/// Returns whether a field is visible, validated, and submitted.
///
/// Uses strict equality: a field gated on `false` is active only when its
/// controller holds `false`, not when the controller is unset.
#[must_use]
pub fn is_field_active(field: &FieldDescriptor, values: &FieldValues) -> bool {
    field.dependency().is_none_or(|dependency| {
        dependency
            .condition()
            .matches(values.get(dependency.field_name()))
    })
}

/// Copies the values of active fields, dropping every inactive field's value.
#[must_use]
pub fn filter_inactive_values(schema: &StepSchema, values: &FieldValues) -> FieldValues {
    schema
        .fields()
        .filter(|field| is_field_active(field, values))
        .filter_map(|field| {
            values
                .get(field.name())
                .map(|value| (field.name().to_owned(), value.clone()))
        })
        .collect()
}

/// Merges stored values over schema defaults.
///
/// Stored entries for unknown fields or of the wrong type are ignored.
#[must_use]
pub fn default_values(schema: &StepSchema, stored: &StoredValues) -> FieldValues {
    schema
        .fields()
        .filter_map(|field| {
            stored
                .get(field.name())
                .and_then(|value| field.value_type().decode_stored(value))
                .or_else(|| field.default_value().cloned())
                .map(|value| (field.name().to_owned(), value))
        })
        .collect()
}

/// Encodes values for the persistence port.
#[must_use]
pub fn stored_values(values: &FieldValues) -> StoredValues {
    values
        .iter()
        .map(|(name, value)| (name.clone(), value.to_stored()))
        .collect()
}
