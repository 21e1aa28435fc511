use chrono::NaiveDate;
use stepform_core::AppResult;
use stepform_domain::{FieldDescriptor, FieldKind, FieldOption, FieldRule, Language, StepSchema};

use crate::wizard_ports::{FormSchemaSource, Translator};

mod options;
mod steps;


const MIN_AGE_YEARS: u32 = 18;
const MAX_AGE_YEARS: u32 = 40;
const NAME_MAX_LENGTH: usize = 64;
const NOTES_MAX_LENGTH: usize = 5000;
const MIN_PLANNED_CONTENT: usize = 3;
const MIN_EXISTING_CONTENT: usize = 2;
const MIN_PHOTOS: usize = 5;
const MAX_PHOTOS: usize = 10;
const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;
const PHOTO_CONTENT_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

const PHONE_PATTERN: &str = r"^\+[0-9]{10,15}$";
const INSTAGRAM_PATTERN: &str = r"^@?[A-Za-z0-9._]{1,30}$";
const TELEGRAM_PATTERN: &str = r"^@?[A-Za-z0-9_]{5,32}$";
const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9._-]+$";
const USERNAME_SEPARATOR_RUN: &str = r"[-._]{2}";

/// Seven-step creator application form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicantForm;

impl FormSchemaSource for ApplicantForm {
    fn build_schema(
        &self,
        translator: &dyn Translator,
        language: Language,
        today: NaiveDate,
    ) -> AppResult<StepSchema> {
        let labels = Labels {
            translator,
            language,
        };

        StepSchema::new(vec![
            steps::identity(&labels, today)?,
            steps::location(&labels)?,
            steps::contact(&labels)?,
            steps::experience(&labels)?,
            steps::content(&labels)?,
            steps::platform(&labels)?,
            steps::finalize(&labels)?,
        ])
    }
}

/// Translation lookups for one language.
struct Labels<'a> {
    translator: &'a dyn Translator,
    language: Language,
}

impl Labels<'_> {
    fn text(&self, key: &str) -> String {
        self.translator.translate(self.language, key)
    }

    fn text_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.translator.translate_with(self.language, key, args)
    }

    fn required(&self) -> FieldRule {
        FieldRule::required(self.text("errors.required"))
            .with_type_message(self.text("errors.invalid_type"))
    }

    fn optional(&self) -> FieldRule {
        FieldRule::optional().with_type_message(self.text("errors.invalid_type"))
    }

    /// Field with its translated label and description.
    fn field(&self, name: &str, kind: FieldKind, rule: FieldRule) -> AppResult<FieldDescriptor> {
        let field = FieldDescriptor::new(
            name,
            self.text(&format!("fields.{name}.label")),
            kind,
            rule,
        )?;

        Ok(field.with_description(self.text(&format!("fields.{name}.description"))))
    }

    fn placeholder(&self, name: &str) -> String {
        self.text(&format!("fields.{name}.placeholder"))
    }

    fn options(&self, group: &str, values: &[&str]) -> AppResult<Vec<FieldOption>> {
        values
            .iter()
            .map(|value| FieldOption::new(*value, self.text(&format!("options.{group}.{value}"))))
            .collect()
    }

    fn step_title(&self, step: &str) -> String {
        self.text(&format!("steps.{step}.title"))
    }

    fn step_description(&self, step: &str) -> String {
        self.text(&format!("steps.{step}.description"))
    }
}
