use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stepform_core::{AppResult, NonEmptyString};

/// Calendar date format used for storage and submission.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Flat field name to value map shared by every step.
///
/// A missing key is the "undefined" value.
pub type FieldValues = BTreeMap<String, FieldValue>;

/// One file picked by the applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: NonEmptyString,
    content_type: NonEmptyString,
    bytes: Vec<u8>,
}

impl FileUpload {
    /// Creates a validated file upload.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> AppResult<Self> {
        Ok(Self {
            file_name: NonEmptyString::new(file_name)?,
            content_type: NonEmptyString::new(content_type)?,
            bytes,
        })
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    /// Returns the file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn to_stored(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            "file_name".to_owned(),
            Value::String(self.file_name().to_owned()),
        );
        object.insert(
            "content_type".to_owned(),
            Value::String(self.content_type().to_owned()),
        );
        object.insert("data".to_owned(), Value::String(BASE64.encode(&self.bytes)));
        Value::Object(object)
    }

    fn from_stored(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let file_name = object.get("file_name")?.as_str()?;
        let content_type = object.get("content_type")?.as_str()?;
        let bytes = BASE64.decode(object.get("data")?.as_str()?).ok()?;

        Self::new(file_name, content_type, bytes).ok()
    }
}

/// Value shapes a field can hold, decided once from the field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free or chosen text.
    Text,
    /// Numeric input.
    Number,
    /// On/off input.
    Boolean,
    /// Calendar date without time.
    Date,
    /// Uploaded files.
    Files,
    /// Several chosen option values.
    List,
}

impl ValueType {
    /// Returns a stable name for the value type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Files => "files",
            Self::List => "list",
        }
    }

    /// Decodes a persisted JSON value for a field of this type.
    ///
    /// Returns `None` when the stored entry does not fit the type.
    #[must_use]
    pub fn decode_stored(self, value: &Value) -> Option<FieldValue> {
        match self {
            Self::Text => value.as_str().map(|text| FieldValue::Text(text.to_owned())),
            Self::Number => value.as_f64().map(FieldValue::Number),
            Self::Boolean => value.as_bool().map(FieldValue::Boolean),
            Self::Date => value.as_str().and_then(parse_date).map(FieldValue::Date),
            Self::List => value
                .as_array()?
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::List),
            Self::Files => value
                .as_array()?
                .iter()
                .map(FileUpload::from_stored)
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::Files),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Current value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Uploaded files.
    Files(Vec<FileUpload>),
    /// Chosen option values.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the value type of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Number(_) => ValueType::Number,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Date(_) => ValueType::Date,
            Self::Files(_) => ValueType::Files,
            Self::List(_) => ValueType::List,
        }
    }

    /// Returns whether the value counts as not filled in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Files(files) => files.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Number(_) | Self::Boolean(_) | Self::Date(_) => false,
        }
    }

    /// Encodes the value for the persistence port.
    #[must_use]
    pub fn to_stored(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Date(date) => Value::String(format_date(*date)),
            Self::Files(files) => Value::Array(files.iter().map(FileUpload::to_stored).collect()),
            Self::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Literal a dependent field compares its controlling field against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// Boolean literal.
    Boolean(bool),
    /// Numeric literal.
    Number(f64),
    /// Text literal.
    Text(String),
}

impl ConditionValue {
    /// Strict equality against the controlling field's current value.
    ///
    /// An absent value never matches, and literals of another type never match.
    #[must_use]
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        match (self, value) {
            (Self::Boolean(expected), Some(FieldValue::Boolean(actual))) => expected == actual,
            (Self::Number(expected), Some(FieldValue::Number(actual))) => expected == actual,
            (Self::Text(expected), Some(FieldValue::Text(actual))) => expected == actual,
            _ => false,
        }
    }

    /// Returns the value type this literal can match.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Boolean(_) => ValueType::Boolean,
            Self::Number(_) => ValueType::Number,
            Self::Text(_) => ValueType::Text,
        }
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses either a `YYYY-MM-DD` date or an RFC 3339 timestamp, keeping the UTC date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|timestamp| timestamp.naive_utc().date())
    })
}
