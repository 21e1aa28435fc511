use chrono::NaiveDate;
use stepform_core::AppResult;
use stepform_domain::{Language, StepSchema};

use super::Translator;

/// Factory producing the localized step schema.
///
/// Called again whenever the language changes; the field names and types it
/// produces must not depend on the language.
pub trait FormSchemaSource: Send + Sync {
    /// Builds the full schema for one language.
    fn build_schema(
        &self,
        translator: &dyn Translator,
        language: Language,
        today: NaiveDate,
    ) -> AppResult<StepSchema>;
}
