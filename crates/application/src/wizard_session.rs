use std::collections::BTreeMap;
use std::sync::Arc;

use stepform_core::{AppError, AppResult};
use stepform_domain::{FieldValues, Language, StepSchema};
use tracing::info;

use crate::validation_schema::{FieldError, default_values, stored_values};
use crate::wizard_ports::{
    Clock, FormSchemaSource, SubmissionGateway, Translator, WizardStateRepository,
};

mod navigation;
mod submission;
mod values;
mod view;

#[cfg(test)]
mod tests;

pub use view::{FieldView, StepView};

/// Language used to build the schema before one is chosen.
const FALLBACK_LANGUAGE: Language = Language::English;

/// Where the applicant currently is in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// No language chosen yet; only the language gate is shown.
    AwaitingLanguage,
    /// Filling in the step at this index.
    InProgress {
        /// Zero-based step index.
        step: usize,
    },
    /// The form was accepted by the endpoint.
    Submitted,
}

/// Result of pressing next or submit.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Moved to the following step.
    Advanced {
        /// New step index.
        step: usize,
    },
    /// The current step has invalid fields; nothing changed.
    Blocked {
        /// Failures in step order.
        errors: Vec<FieldError>,
    },
    /// The endpoint accepted the submission.
    Submitted,
    /// The endpoint rejected the submission or could not be reached.
    SubmissionFailed {
        /// Response status, absent for transport failures.
        status: Option<u16>,
    },
}

/// Collaborators a session talks to.
#[derive(Clone)]
pub struct WizardPorts {
    /// Durable storage for progress.
    pub state_repository: Arc<dyn WizardStateRepository>,
    /// Delivery of the final payload.
    pub submission_gateway: Arc<dyn SubmissionGateway>,
    /// Localized strings.
    pub translator: Arc<dyn Translator>,
    /// Current date for age rules.
    pub clock: Arc<dyn Clock>,
    /// Schema factory.
    pub schema_source: Arc<dyn FormSchemaSource>,
}

/// Step-by-step form session driven by one front end.
pub struct WizardSession {
    ports: WizardPorts,
    language: Option<Language>,
    schema: StepSchema,
    phase: WizardPhase,
    values: FieldValues,
    errors: BTreeMap<String, String>,
}

impl WizardSession {
    /// Restores the session from persisted progress.
    pub async fn restore(ports: WizardPorts) -> AppResult<Self> {
        let repository = ports.state_repository.clone();
        let language = repository.load_language().await?;
        let schema = build_schema(&ports, language.unwrap_or(FALLBACK_LANGUAGE))?;
        let values = default_values(&schema, &repository.load_values().await?);

        let phase = match language {
            None => WizardPhase::AwaitingLanguage,
            Some(_) => resume_phase(repository.as_ref(), &schema).await?,
        };

        info!(
            language = language.map(|language| language.code()).unwrap_or("none"),
            phase = ?phase,
            stored_values = values.len(),
            "wizard session restored"
        );

        Ok(Self {
            ports,
            language,
            schema,
            phase,
            values,
            errors: BTreeMap::new(),
        })
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// Returns the chosen language.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Returns the schema for the active language.
    #[must_use]
    pub fn schema(&self) -> &StepSchema {
        &self.schema
    }

    /// Returns the current values.
    #[must_use]
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Returns the error shown for a field, if any.
    #[must_use]
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    fn current_step(&self) -> AppResult<usize> {
        match self.phase {
            WizardPhase::InProgress { step } => Ok(step),
            WizardPhase::AwaitingLanguage => Err(AppError::Conflict(
                "choose a language before filling in the form".to_owned(),
            )),
            WizardPhase::Submitted => Err(AppError::Conflict(
                "the form was already submitted".to_owned(),
            )),
        }
    }

    async fn persist_values(&self) -> AppResult<()> {
        self.ports
            .state_repository
            .save_values(stored_values(&self.values))
            .await
    }
}

fn build_schema(ports: &WizardPorts, language: Language) -> AppResult<StepSchema> {
    ports
        .schema_source
        .build_schema(ports.translator.as_ref(), language, ports.clock.today())
}

/// Phase entered once a language is known.
async fn resume_phase(
    repository: &dyn WizardStateRepository,
    schema: &StepSchema,
) -> AppResult<WizardPhase> {
    if repository.load_submitted().await? {
        return Ok(WizardPhase::Submitted);
    }

    let step = repository.load_step().await?.min(schema.last_step_index());
    Ok(WizardPhase::InProgress { step })
}
