//! Domain model for step-by-step forms: fields, rules, values, and schemas.

#![forbid(unsafe_code)]

mod field;
mod language;
mod rule;
mod step;
mod value;

pub use field::{FieldDependency, FieldDescriptor, FieldKind, FieldOption, TextInputType};
pub use language::Language;
pub use rule::{Check, FieldRule, age_bounds};
pub use step::{Step, StepSchema};
pub use value::{
    ConditionValue, DATE_FORMAT, FieldValue, FieldValues, FileUpload, ValueType, format_date,
    parse_date,
};
