//! Declarative validation rules bound to fields.
//!
//! A rule is interpreted by [`FieldRule::validate`]; it carries the localized
//! messages it reports, so the validator never formats user-facing text.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use regex::Regex;
use stepform_core::{AppError, AppResult};

use crate::value::FieldValue;

const EMAIL_MAX_LENGTH: usize = 254;

/// One constraint a present value must satisfy.
#[derive(Debug, Clone)]
pub enum Check {
    /// Text length in characters.
    Length {
        /// Inclusive minimum.
        min: Option<usize>,
        /// Inclusive maximum.
        max: Option<usize>,
    },
    /// Numeric bounds.
    Range {
        /// Inclusive minimum.
        min: Option<f64>,
        /// Inclusive maximum.
        max: Option<f64>,
    },
    /// Text must match the expression.
    Pattern(Regex),
    /// Text must not match the expression.
    ForbiddenPattern(Regex),
    /// Text must be structurally an email address.
    Email,
    /// Text, or every list item, must be one of the values.
    OneOf(Vec<String>),
    /// Number of list items or files.
    ItemCount {
        /// Inclusive minimum.
        min: Option<usize>,
        /// Inclusive maximum.
        max: Option<usize>,
    },
    /// List items must not repeat.
    UniqueItems,
    /// Date must yield an age between the bounds, relative to today.
    AgeBetween {
        /// Youngest accepted age in full years.
        min_years: u32,
        /// Oldest accepted age in full years.
        max_years: u32,
    },
    /// Date bounds.
    DateRange {
        /// Inclusive minimum.
        min: Option<NaiveDate>,
        /// Inclusive maximum.
        max: Option<NaiveDate>,
    },
    /// Boolean must be `true`.
    MustBeTrue,
    /// Every file must have one of the MIME types.
    FileTypes(Vec<String>),
    /// Every file must be at most this many bytes.
    MaxFileSize(usize),
}

impl Check {
    /// Compiles a pattern check.
    pub fn pattern(expression: &str) -> AppResult<Self> {
        compile(expression).map(Self::Pattern)
    }

    /// Compiles a forbidden pattern check.
    pub fn forbidden_pattern(expression: &str) -> AppResult<Self> {
        compile(expression).map(Self::ForbiddenPattern)
    }

    /// Returns `None` when the check does not apply to this value shape.
    fn evaluate(&self, value: &FieldValue, today: NaiveDate) -> Option<bool> {
        let passed = match (self, value) {
            (Self::Length { min, max }, FieldValue::Text(text)) => {
                within(text.chars().count(), *min, *max)
            }
            (Self::Range { min, max }, FieldValue::Number(number)) => {
                !number.is_nan()
                    && min.is_none_or(|min| *number >= min)
                    && max.is_none_or(|max| *number <= max)
            }
            (Self::Pattern(regex), FieldValue::Text(text)) => regex.is_match(text),
            (Self::ForbiddenPattern(regex), FieldValue::Text(text)) => !regex.is_match(text),
            (Self::Email, FieldValue::Text(text)) => is_email(text),
            (Self::OneOf(allowed), FieldValue::Text(text)) => allowed.contains(text),
            (Self::OneOf(allowed), FieldValue::List(items)) => {
                items.iter().all(|item| allowed.contains(item))
            }
            (Self::ItemCount { min, max }, FieldValue::List(items)) => {
                within(items.len(), *min, *max)
            }
            (Self::ItemCount { min, max }, FieldValue::Files(files)) => {
                within(files.len(), *min, *max)
            }
            (Self::UniqueItems, FieldValue::List(items)) => {
                let mut seen = HashSet::new();
                items.iter().all(|item| seen.insert(item.as_str()))
            }
            (
                Self::AgeBetween {
                    min_years,
                    max_years,
                },
                FieldValue::Date(date),
            ) => {
                let (earliest, latest) = age_bounds(today, *min_years, *max_years);
                earliest.is_none_or(|earliest| *date >= earliest)
                    && latest.is_none_or(|latest| *date <= latest)
            }
            (Self::DateRange { min, max }, FieldValue::Date(date)) => {
                min.is_none_or(|min| *date >= min) && max.is_none_or(|max| *date <= max)
            }
            (Self::MustBeTrue, FieldValue::Boolean(flag)) => *flag,
            (Self::FileTypes(accepted), FieldValue::Files(files)) => files
                .iter()
                .all(|file| accepted.iter().any(|mime| mime == file.content_type())),
            (Self::MaxFileSize(limit), FieldValue::Files(files)) => {
                files.iter().all(|file| file.size() <= *limit)
            }
            _ => return None,
        };

        Some(passed)
    }
}

#[derive(Debug, Clone)]
struct RuleConstraint {
    check: Check,
    message: String,
}

/// Absent or empty values fail with the message when required and skip the
/// checks when optional.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Presence {
    Required { message: String },
    Optional,
}

/// Validation rule bound to one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    presence: Presence,
    type_message: String,
    constraints: Vec<RuleConstraint>,
    permissive: bool,
}

impl FieldRule {
    /// Creates a rule for a field that must be filled in.
    #[must_use]
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            presence: Presence::Required {
                message: message.into(),
            },
            type_message: "invalid value".to_owned(),
            constraints: Vec::new(),
            permissive: false,
        }
    }

    /// Creates a rule for a field that may be left empty.
    #[must_use]
    pub fn optional() -> Self {
        Self {
            presence: Presence::Optional,
            type_message: "invalid value".to_owned(),
            constraints: Vec::new(),
            permissive: false,
        }
    }

    /// Creates the rule that accepts every value, including absent ones.
    #[must_use]
    pub fn any() -> Self {
        Self {
            permissive: true,
            ..Self::optional()
        }
    }

    /// Sets the message reported for values of the wrong shape.
    #[must_use]
    pub fn with_type_message(mut self, message: impl Into<String>) -> Self {
        self.type_message = message.into();
        self
    }

    /// Appends a check with its failure message.
    #[must_use]
    pub fn with_check(mut self, check: Check, message: impl Into<String>) -> Self {
        self.constraints.push(RuleConstraint {
            check,
            message: message.into(),
        });
        self
    }

    /// Returns whether the rule must be satisfied with a non-empty value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.permissive && matches!(self.presence, Presence::Required { .. })
    }

    /// Validates a value, returning the first failure message.
    pub fn validate(&self, value: Option<&FieldValue>, today: NaiveDate) -> Result<(), String> {
        if self.permissive {
            return Ok(());
        }

        let Some(value) = value.filter(|value| !value.is_empty()) else {
            return match &self.presence {
                Presence::Required { message } => Err(message.clone()),
                Presence::Optional => Ok(()),
            };
        };

        for constraint in &self.constraints {
            match constraint.check.evaluate(value, today) {
                Some(true) => {}
                Some(false) => return Err(constraint.message.clone()),
                None => return Err(self.type_message.clone()),
            }
        }

        Ok(())
    }
}

/// Returns the `(earliest, latest)` birth dates for an age range on `today`.
#[must_use]
pub fn age_bounds(
    today: NaiveDate,
    min_years: u32,
    max_years: u32,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let years_before =
        |years: u32| today.checked_sub_months(Months::new(years.saturating_mul(12)));
    (years_before(max_years), years_before(min_years))
}

fn compile(expression: &str) -> AppResult<Regex> {
    Regex::new(expression).map_err(|error| {
        AppError::Validation(format!("invalid rule pattern '{expression}': {error}"))
    })
}

fn within(count: usize, min: Option<usize>, max: Option<usize>) -> bool {
    min.is_none_or(|min| count >= min) && max.is_none_or(|max| count <= max)
}

/// Checks the stored text as is; surrounding whitespace is not an address.
fn is_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LENGTH || value.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
