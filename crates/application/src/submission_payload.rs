use stepform_domain::{FieldValue, FieldValues, FileUpload, Language, StepSchema, format_date};

/// Name of the part carrying the interface language.
pub const LANGUAGE_PART: &str = "language";

/// Body of one multipart entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PartBody {
    /// Plain text part.
    Text(String),
    /// File part carrying name, type and bytes.
    File(FileUpload),
}

/// Named multipart entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionPart {
    /// Part name; repeated for list and file values.
    pub name: String,
    /// Part contents.
    pub body: PartBody,
}

/// Ordered multipart payload sent when the applicant submits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionPayload {
    parts: Vec<SubmissionPart>,
}

impl SubmissionPayload {
    /// Serializes active values in schema order, after the language part.
    ///
    /// Callers pass values that already exclude inactive fields. Absent
    /// values produce no part.
    #[must_use]
    pub fn build(schema: &StepSchema, values: &FieldValues, language: Option<Language>) -> Self {
        let mut parts = Vec::new();
        if let Some(language) = language {
            parts.push(SubmissionPart {
                name: LANGUAGE_PART.to_owned(),
                body: PartBody::Text(language.code().to_owned()),
            });
        }

        for field in schema.fields() {
            let Some(value) = values.get(field.name()) else {
                continue;
            };
            push_value(&mut parts, field.name(), value);
        }

        Self { parts }
    }

    /// Returns the parts in wire order.
    #[must_use]
    pub fn parts(&self) -> &[SubmissionPart] {
        &self.parts
    }

    /// Returns the text bodies of every part with this name.
    #[must_use]
    pub fn text_values(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|part| part.name == name)
            .filter_map(|part| match &part.body {
                PartBody::Text(text) => Some(text.as_str()),
                PartBody::File(_) => None,
            })
            .collect()
    }

    /// Returns the files attached under this name.
    #[must_use]
    pub fn files(&self, name: &str) -> Vec<&FileUpload> {
        self.parts
            .iter()
            .filter(|part| part.name == name)
            .filter_map(|part| match &part.body {
                PartBody::File(file) => Some(file),
                PartBody::Text(_) => None,
            })
            .collect()
    }
}

fn push_value(parts: &mut Vec<SubmissionPart>, name: &str, value: &FieldValue) {
    let text = |body: String| SubmissionPart {
        name: name.to_owned(),
        body: PartBody::Text(body),
    };

    match value {
        FieldValue::Text(content) => parts.push(text(content.clone())),
        FieldValue::Number(number) => parts.push(text(number.to_string())),
        FieldValue::Boolean(flag) => parts.push(text(flag.to_string())),
        FieldValue::Date(date) => parts.push(text(format_date(*date))),
        FieldValue::List(items) => parts.extend(items.iter().cloned().map(text)),
        FieldValue::Files(files) => parts.extend(files.iter().cloned().map(|file| SubmissionPart {
            name: name.to_owned(),
            body: PartBody::File(file),
        })),
    }
}
