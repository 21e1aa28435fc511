use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use stepform_application::{PartBody, SubmissionGateway, SubmissionPayload, SubmissionResponse};
use stepform_core::{AppError, AppResult};
use tracing::info;

/// Multipart POST of the application to `{base_url}/`.
pub struct HttpSubmissionGateway {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionGateway {
    /// Creates a gateway posting to the root of `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &str) -> Self {
        Self {
            http_client,
            endpoint: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    /// Returns the URL submissions are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> AppResult<SubmissionResponse> {
        let form = build_form(payload)?;
        let response = self
            .http_client
            .post(self.endpoint.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "submission transport error for '{}': {error}",
                    self.endpoint
                ))
            })?;

        let status = response.status().as_u16();
        info!(endpoint = %self.endpoint, status, "submission endpoint responded");
        Ok(SubmissionResponse { status })
    }
}

fn build_form(payload: &SubmissionPayload) -> AppResult<Form> {
    payload
        .parts()
        .iter()
        .try_fold(Form::new(), |form, part| match &part.body {
            PartBody::Text(text) => Ok(form.text(part.name.clone(), text.clone())),
            PartBody::File(file) => {
                let file_part = Part::bytes(file.bytes().to_vec())
                    .file_name(file.file_name().to_owned())
                    .mime_str(file.content_type())
                    .map_err(|error| {
                        AppError::Validation(format!(
                            "invalid content type '{}' for file '{}': {error}",
                            file.content_type(),
                            file.file_name()
                        ))
                    })?;
                Ok(form.part(part.name.clone(), file_part))
            }
        })
}
