use async_trait::async_trait;
use stepform_core::AppResult;

use crate::submission_payload::SubmissionPayload;

/// Status returned by the submission endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResponse {
    /// HTTP status code.
    pub status: u16,
}

impl SubmissionResponse {
    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Transport port delivering the collected answers.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Sends one payload and reports the response status.
    ///
    /// Transport failures are errors; any received status is a response.
    async fn submit(&self, payload: &SubmissionPayload) -> AppResult<SubmissionResponse>;
}
