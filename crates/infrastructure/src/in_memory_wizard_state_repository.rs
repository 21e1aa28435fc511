use async_trait::async_trait;
use stepform_application::{StoredValues, WizardStateRepository};
use stepform_core::AppResult;
use stepform_domain::Language;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct WizardSlots {
    language: Option<Language>,
    step: usize,
    values: StoredValues,
    submitted: bool,
}

/// Wizard progress kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryWizardStateRepository {
    slots: RwLock<WizardSlots>,
}

impl InMemoryWizardStateRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WizardStateRepository for InMemoryWizardStateRepository {
    async fn load_language(&self) -> AppResult<Option<Language>> {
        Ok(self.slots.read().await.language)
    }

    async fn save_language(&self, language: Option<Language>) -> AppResult<()> {
        self.slots.write().await.language = language;
        Ok(())
    }

    async fn load_step(&self) -> AppResult<usize> {
        Ok(self.slots.read().await.step)
    }

    async fn save_step(&self, step: usize) -> AppResult<()> {
        self.slots.write().await.step = step;
        Ok(())
    }

    async fn load_values(&self) -> AppResult<StoredValues> {
        Ok(self.slots.read().await.values.clone())
    }

    async fn save_values(&self, values: StoredValues) -> AppResult<()> {
        self.slots.write().await.values = values;
        Ok(())
    }

    async fn load_submitted(&self) -> AppResult<bool> {
        Ok(self.slots.read().await.submitted)
    }

    async fn save_submitted(&self, submitted: bool) -> AppResult<()> {
        self.slots.write().await.submitted = submitted;
        Ok(())
    }
}
