use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stepform_core::{AppError, AppResult, NonEmptyString};

use crate::rule::FieldRule;
use crate::value::{ConditionValue, FieldValue, ValueType};

/// One choice offered by a choice-based field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    value: NonEmptyString,
    label: String,
    flag: Option<String>,
}

impl FieldOption {
    /// Creates a validated option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            value: NonEmptyString::new(value)?,
            label: label.into(),
            flag: None,
        })
    }

    /// Attaches the country code of a flag shown next to the label.
    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Returns the submitted option value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the optional flag country code.
    #[must_use]
    pub fn flag(&self) -> Option<&str> {
        self.flag.as_deref()
    }
}

/// Input flavour of a single-line text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputType {
    /// Plain text.
    #[default]
    Text,
    /// Email address.
    Email,
    /// Number, stored as a numeric value.
    Number,
    /// Web address.
    Url,
    /// Telephone number typed as text.
    Tel,
}

/// Closed set of widgets a field can be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line input.
    Text {
        /// Input flavour.
        input_type: TextInputType,
    },
    /// Multi-line input.
    Textarea,
    /// Single checkbox.
    Checkbox,
    /// Several checkboxes over the options.
    MultiCheckbox {
        /// Offered options.
        options: Vec<FieldOption>,
    },
    /// Drop-down list.
    Select {
        /// Offered options.
        options: Vec<FieldOption>,
    },
    /// Radio group.
    Radio {
        /// Offered options.
        options: Vec<FieldOption>,
    },
    /// On/off switch.
    Switch,
    /// Searchable list.
    Combobox {
        /// Offered options.
        options: Vec<FieldOption>,
    },
    /// Year/month/day picker.
    Birthdate {
        /// Earliest selectable date.
        min_date: Option<NaiveDate>,
        /// Latest selectable date.
        max_date: Option<NaiveDate>,
    },
    /// File picker.
    File {
        /// Accepted MIME types; empty accepts anything.
        accept: Vec<String>,
    },
    /// Phone number input.
    Phone {
        /// Country preselected in the picker.
        default_country: Option<String>,
        /// Whether numbers are entered in international format.
        international: bool,
    },
}

impl FieldKind {
    /// Returns a stable name for the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Textarea => "textarea",
            Self::Checkbox => "checkbox",
            Self::MultiCheckbox { .. } => "multicheckbox",
            Self::Select { .. } => "select",
            Self::Radio { .. } => "radio",
            Self::Switch => "switch",
            Self::Combobox { .. } => "combobox",
            Self::Birthdate { .. } => "birthdate",
            Self::File { .. } => "file",
            Self::Phone { .. } => "phone",
        }
    }

    /// Returns the value type fields of this kind hold.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text {
                input_type: TextInputType::Number,
            } => ValueType::Number,
            Self::Text { .. }
            | Self::Textarea
            | Self::Select { .. }
            | Self::Radio { .. }
            | Self::Combobox { .. }
            | Self::Phone { .. } => ValueType::Text,
            Self::Checkbox | Self::Switch => ValueType::Boolean,
            Self::MultiCheckbox { .. } => ValueType::List,
            Self::Birthdate { .. } => ValueType::Date,
            Self::File { .. } => ValueType::Files,
        }
    }

    /// Returns the options of choice-based kinds.
    #[must_use]
    pub fn options(&self) -> &[FieldOption] {
        match self {
            Self::MultiCheckbox { options }
            | Self::Select { options }
            | Self::Radio { options }
            | Self::Combobox { options } => options.as_slice(),
            _ => &[],
        }
    }

    fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::MultiCheckbox { .. } | Self::Select { .. } | Self::Radio { .. } | Self::Combobox { .. }
        )
    }
}

/// Controlling field and the literal it must equal for a field to be active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDependency {
    field_name: NonEmptyString,
    condition: ConditionValue,
}

impl FieldDependency {
    /// Creates a dependency on another field.
    pub fn new(field_name: impl Into<String>, condition: impl Into<ConditionValue>) -> AppResult<Self> {
        Ok(Self {
            field_name: NonEmptyString::new(field_name)?,
            condition: condition.into(),
        })
    }

    /// Returns the controlling field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    /// Returns the literal the controlling value must equal.
    #[must_use]
    pub fn condition(&self) -> &ConditionValue {
        &self.condition
    }
}

/// Description of one logical input.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: NonEmptyString,
    label: NonEmptyString,
    description: Option<String>,
    placeholder: Option<String>,
    kind: FieldKind,
    rule: FieldRule,
    default: Option<FieldValue>,
    dependency: Option<FieldDependency>,
}

impl FieldDescriptor {
    /// Creates a validated field descriptor with an optional rule and no default.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        rule: FieldRule,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;

        if kind.is_choice() {
            if kind.options().is_empty() {
                return Err(AppError::Validation(format!(
                    "{} field '{}' requires at least one option",
                    kind.as_str(),
                    name.as_str()
                )));
            }

            let mut seen = HashSet::new();
            for option in kind.options() {
                if !seen.insert(option.value()) {
                    return Err(AppError::Validation(format!(
                        "duplicate option value '{}' in field '{}'",
                        option.value(),
                        name.as_str()
                    )));
                }
            }
        }

        Ok(Self {
            label: NonEmptyString::new(label).map_err(|_| {
                AppError::Validation(format!("field '{}' requires a label", name.as_str()))
            })?,
            name,
            description: None,
            placeholder: None,
            kind,
            rule,
            default: None,
            dependency: None,
        })
    }

    /// Sets the help text shown under the label.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Sets the placeholder shown in empty inputs.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = non_blank(placeholder.into());
        self
    }

    /// Sets the initial value, which must match the field's value type.
    pub fn with_default(mut self, default: FieldValue) -> AppResult<Self> {
        if default.value_type() != self.value_type() {
            return Err(AppError::Validation(format!(
                "default for field '{}' must be a {} value, got {}",
                self.name.as_str(),
                self.value_type(),
                default.value_type()
            )));
        }

        self.default = Some(default);
        Ok(self)
    }

    /// Makes the field active only while another field equals `condition`.
    pub fn depends_on(
        mut self,
        field_name: impl Into<String>,
        condition: impl Into<ConditionValue>,
    ) -> AppResult<Self> {
        let dependency = FieldDependency::new(field_name, condition)?;
        if dependency.field_name() == self.name.as_str() {
            return Err(AppError::Validation(format!(
                "field '{}' cannot depend on itself",
                self.name.as_str()
            )));
        }

        self.dependency = Some(dependency);
        Ok(self)
    }

    /// Returns the unique field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the optional help text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the optional placeholder.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns the widget kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the value type decided by the kind.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.kind.value_type()
    }

    /// Returns the field's own rule.
    #[must_use]
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// Returns the initial value.
    #[must_use]
    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    /// Returns the dependency, if any.
    #[must_use]
    pub fn dependency(&self) -> Option<&FieldDependency> {
        self.dependency.as_ref()
    }

    /// Checks that a value has this field's value type.
    pub fn accepts(&self, value: &FieldValue) -> AppResult<()> {
        if value.value_type() != self.value_type() {
            return Err(AppError::Validation(format!(
                "field '{}' holds {} values, got {}",
                self.name.as_str(),
                self.value_type(),
                value.value_type()
            )));
        }

        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
