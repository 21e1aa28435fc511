//! Wizard session, validation, submission payloads, and ports.

#![forbid(unsafe_code)]

mod applicant_form;
mod submission_payload;
mod validation_schema;
mod wizard_ports;
mod wizard_session;

pub use applicant_form::ApplicantForm;
pub use submission_payload::{LANGUAGE_PART, PartBody, SubmissionPart, SubmissionPayload};
pub use validation_schema::{
    EffectiveRule, EffectiveValidationMap, FieldError, default_values, filter_inactive_values,
    is_field_active, stored_values,
};
pub use wizard_ports::{
    Clock, FormSchemaSource, StoredValues, SubmissionGateway, SubmissionResponse, Translator,
    WizardStateRepository,
};
pub use wizard_session::{
    AdvanceOutcome, FieldView, StepView, WizardPhase, WizardPorts, WizardSession,
};
