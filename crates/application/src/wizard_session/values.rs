use stepform_core::{AppError, AppResult};
use stepform_domain::FieldValue;

use super::WizardSession;

impl WizardSession {
    /// Stores a value for a field and persists the snapshot.
    pub async fn set_value(&mut self, name: &str, value: FieldValue) -> AppResult<()> {
        self.current_step()?;
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| AppError::NotFound(format!("unknown field '{name}'")))?;
        field.accepts(&value)?;

        self.values.insert(name.to_owned(), value);
        self.errors.remove(name);
        self.persist_values().await
    }

    /// Makes a field's value absent and persists the snapshot.
    pub async fn clear_value(&mut self, name: &str) -> AppResult<()> {
        self.current_step()?;
        if self.schema.field(name).is_none() {
            return Err(AppError::NotFound(format!("unknown field '{name}'")));
        }

        self.values.remove(name);
        self.errors.remove(name);
        self.persist_values().await
    }
}
