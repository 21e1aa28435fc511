use stepform_core::{AppError, AppResult};
use stepform_domain::Language;
use tracing::info;

use super::{AdvanceOutcome, WizardPhase, WizardSession, build_schema, resume_phase};
use crate::validation_schema::{EffectiveValidationMap, default_values};
use crate::wizard_ports::StoredValues;

impl WizardSession {
    /// Leaves the language gate and resumes persisted progress.
    pub async fn choose_language(&mut self, language: Language) -> AppResult<WizardPhase> {
        if self.phase != WizardPhase::AwaitingLanguage {
            return Err(AppError::Conflict(
                "language can only be chosen at the language gate".to_owned(),
            ));
        }

        let schema = build_schema(&self.ports, language)?;
        let repository = self.ports.state_repository.clone();
        repository.save_language(Some(language)).await?;

        self.phase = resume_phase(repository.as_ref(), &schema).await?;
        self.schema = schema;
        self.language = Some(language);
        self.errors.clear();

        info!(language = %language, phase = ?self.phase, "language chosen");
        Ok(self.phase)
    }

    /// Returns to the language gate, keeping step and values.
    pub async fn change_language(&mut self) -> AppResult<()> {
        self.ports.state_repository.save_language(None).await?;
        self.language = None;
        self.phase = WizardPhase::AwaitingLanguage;
        self.errors.clear();

        info!("language cleared");
        Ok(())
    }

    /// Validates the current step, then moves forward or submits.
    pub async fn advance(&mut self) -> AppResult<AdvanceOutcome> {
        let step = self.current_step()?;
        let today = self.ports.clock.today();

        let errors = {
            let Some(current) = self.schema.step(step) else {
                return Err(AppError::Internal(format!(
                    "step {step} is outside the schema"
                )));
            };
            EffectiveValidationMap::build(&self.schema, &self.values).validate_fields(
                current.field_names(),
                &self.values,
                today,
            )
        };

        self.errors.clear();
        if !errors.is_empty() {
            for error in &errors {
                self.errors
                    .insert(error.field.clone(), error.message.clone());
            }
            info!(step, invalid_fields = errors.len(), "step blocked by validation");
            return Ok(AdvanceOutcome::Blocked { errors });
        }

        if step < self.schema.last_step_index() {
            let next = step + 1;
            self.ports.state_repository.save_step(next).await?;
            self.phase = WizardPhase::InProgress { step: next };
            info!(step = next, "advanced to next step");
            return Ok(AdvanceOutcome::Advanced { step: next });
        }

        self.submit().await
    }

    /// Moves back one step without validating.
    pub async fn retreat(&mut self) -> AppResult<WizardPhase> {
        let step = self.current_step()?;
        if step == 0 {
            return Ok(self.phase);
        }

        let previous = step - 1;
        self.ports.state_repository.save_step(previous).await?;
        self.phase = WizardPhase::InProgress { step: previous };
        self.errors.clear();
        Ok(self.phase)
    }

    /// Restores schema defaults and returns to the first step.
    pub async fn reset(&mut self) -> AppResult<()> {
        self.current_step()?;

        self.values = default_values(&self.schema, &StoredValues::new());
        self.errors.clear();
        self.persist_values().await?;
        self.ports.state_repository.save_step(0).await?;
        self.phase = WizardPhase::InProgress { step: 0 };

        info!("wizard reset to defaults");
        Ok(())
    }
}
