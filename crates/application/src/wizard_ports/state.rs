use async_trait::async_trait;
use serde_json::{Map, Value};
use stepform_core::AppResult;
use stepform_domain::Language;

/// Snapshot of field values as written to durable storage.
pub type StoredValues = Map<String, Value>;

/// Durable storage port for wizard progress.
///
/// The four slots are independent: clearing the language keeps the step,
/// values, and submitted flag.
#[async_trait]
pub trait WizardStateRepository: Send + Sync {
    /// Returns the chosen language, if any.
    async fn load_language(&self) -> AppResult<Option<Language>>;

    /// Stores or clears the chosen language.
    async fn save_language(&self, language: Option<Language>) -> AppResult<()>;

    /// Returns the current step index, zero when never saved.
    async fn load_step(&self) -> AppResult<usize>;

    /// Stores the current step index.
    async fn save_step(&self, step: usize) -> AppResult<()>;

    /// Returns the last value snapshot, empty when never saved.
    async fn load_values(&self) -> AppResult<StoredValues>;

    /// Stores the full value snapshot.
    async fn save_values(&self, values: StoredValues) -> AppResult<()>;

    /// Returns whether the form was submitted.
    async fn load_submitted(&self) -> AppResult<bool>;

    /// Stores the submitted flag.
    async fn save_submitted(&self, submitted: bool) -> AppResult<()>;
}
