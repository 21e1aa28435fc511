use stepform_core::AppResult;
use tracing::{info, warn};

use super::{AdvanceOutcome, WizardPhase, WizardSession};
use crate::submission_payload::SubmissionPayload;
use crate::validation_schema::{default_values, filter_inactive_values};
use crate::wizard_ports::StoredValues;

impl WizardSession {
    /// Sends the active values; only a 2xx response completes the wizard.
    pub(super) async fn submit(&mut self) -> AppResult<AdvanceOutcome> {
        let active_values = filter_inactive_values(&self.schema, &self.values);
        let payload = SubmissionPayload::build(&self.schema, &active_values, self.language);

        info!(parts = payload.parts().len(), "submitting application");

        match self.ports.submission_gateway.submit(&payload).await {
            Ok(response) if response.is_success() => {
                self.ports.state_repository.save_submitted(true).await?;
                self.values = default_values(&self.schema, &StoredValues::new());
                self.persist_values().await?;
                self.phase = WizardPhase::Submitted;

                info!(status = response.status, "application submitted");
                Ok(AdvanceOutcome::Submitted)
            }
            Ok(response) => {
                warn!(status = response.status, "application rejected by endpoint");
                Ok(AdvanceOutcome::SubmissionFailed {
                    status: Some(response.status),
                })
            }
            Err(error) => {
                warn!(error = %error, "failed to deliver application");
                Ok(AdvanceOutcome::SubmissionFailed { status: None })
            }
        }
    }
}
