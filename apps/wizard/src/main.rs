//! Stepform terminal wizard runtime.

#![forbid(unsafe_code)]

mod attachments;
mod birthdate;
mod config;
mod phone;
mod terminal;

use std::sync::Arc;

use stepform_application::{
    AdvanceOutcome, ApplicantForm, Clock, WizardPhase, WizardPorts, WizardSession,
};
use stepform_core::{AppError, AppResult};
use stepform_infrastructure::{
    HttpSubmissionGateway, JsonFileWizardStateRepository, StaticTranslator, SystemClock,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::WizardConfig;
use crate::terminal::{FieldEdit, MenuAction, Terminal};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WizardConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let ports = WizardPorts {
        state_repository: Arc::new(
            JsonFileWizardStateRepository::open(config.state_path.clone()).await?,
        ),
        submission_gateway: Arc::new(HttpSubmissionGateway::new(
            http_client,
            config.api_base_url.as_str(),
        )),
        translator: Arc::new(StaticTranslator::new()?),
        clock: clock.clone(),
        schema_source: Arc::new(ApplicantForm),
    };

    info!(
        api_base_url = %config.api_base_url,
        state_path = %config.state_path.display(),
        http_timeout_secs = config.http_timeout.as_secs(),
        "stepform-wizard started"
    );

    let mut session = WizardSession::restore(ports).await?;
    run(&mut session, &Terminal::new(clock)).await
}

async fn run(session: &mut WizardSession, terminal: &Terminal) -> AppResult<()> {
    loop {
        match session.phase() {
            WizardPhase::AwaitingLanguage => {
                let language = terminal
                    .choose_language(&session.translate("ui.choose_language"), session.language())?;
                session.choose_language(language).await?;
            }
            WizardPhase::Submitted => {
                terminal.show_success(session);
                return Ok(());
            }
            WizardPhase::InProgress { .. } => {
                fill_current_step(session, terminal).await?;

                let view = session.current_step_view()?;
                match terminal.choose_action(session, &view)? {
                    MenuAction::Next => {
                        let outcome = session.advance().await?;
                        report(session, terminal, &outcome);
                    }
                    MenuAction::Previous => {
                        session.retreat().await?;
                    }
                    MenuAction::Reset => {
                        if terminal.confirm(&session.translate("ui.confirm_reset"))? {
                            session.reset().await?;
                        }
                    }
                    MenuAction::ChangeLanguage => session.change_language().await?,
                    MenuAction::Quit => return Ok(()),
                }
            }
        }
    }
}

/// Prompts every visible field of the current step in order.
///
/// The view is rebuilt after each answer so fields switched on by an earlier
/// answer are prompted in the same pass.
async fn fill_current_step(session: &mut WizardSession, terminal: &Terminal) -> AppResult<()> {
    let view = session.current_step_view()?;
    terminal.show_step(session, &view);

    let mut position = 0;
    loop {
        let view = session.current_step_view()?;
        let Some(field) = view.fields.get(position) else {
            return Ok(());
        };

        match terminal.edit_field(session, field).await? {
            FieldEdit::Keep => {}
            FieldEdit::Clear => session.clear_value(&field.name).await?,
            FieldEdit::Set(value) => match session.set_value(&field.name, value).await {
                Ok(()) => {}
                Err(AppError::Validation(message)) => {
                    warn!(field = %field.name, error = %message, "value rejected");
                    terminal.notice(&format!("  ! {}", session.translate("errors.invalid_type")));
                    continue;
                }
                Err(error) => return Err(error),
            },
        }

        position += 1;
    }
}

fn report(session: &WizardSession, terminal: &Terminal, outcome: &AdvanceOutcome) {
    match outcome {
        AdvanceOutcome::Advanced { .. } | AdvanceOutcome::Submitted => {}
        AdvanceOutcome::Blocked { .. } => terminal.notice(&session.translate("ui.fix_errors")),
        AdvanceOutcome::SubmissionFailed { status: Some(status) } => {
            terminal.notice(&session.translate_with(
                "ui.submission_failed_status",
                &[("status", &status.to_string())],
            ));
        }
        AdvanceOutcome::SubmissionFailed { status: None } => {
            terminal.notice(&session.translate("ui.submission_failed"));
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
