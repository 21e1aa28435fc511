use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use stepform_core::{AppError, AppResult};
use stepform_domain::{FieldValue, FileUpload, Language};
use tokio::sync::Mutex;

use crate::applicant_form::ApplicantForm;
use crate::submission_payload::SubmissionPayload;
use crate::wizard_ports::{
    Clock, StoredValues, SubmissionGateway, SubmissionResponse, Translator, WizardStateRepository,
};
use crate::{AdvanceOutcome, WizardPhase, WizardPorts, WizardSession};

#[derive(Default)]
struct FakeStateRepository {
    language: Mutex<Option<Language>>,
    step: Mutex<usize>,
    values: Mutex<StoredValues>,
    submitted: Mutex<bool>,
}

#[async_trait]
impl WizardStateRepository for FakeStateRepository {
    async fn load_language(&self) -> AppResult<Option<Language>> {
        Ok(*self.language.lock().await)
    }

    async fn save_language(&self, language: Option<Language>) -> AppResult<()> {
        *self.language.lock().await = language;
        Ok(())
    }

    async fn load_step(&self) -> AppResult<usize> {
        Ok(*self.step.lock().await)
    }

    async fn save_step(&self, step: usize) -> AppResult<()> {
        *self.step.lock().await = step;
        Ok(())
    }

    async fn load_values(&self) -> AppResult<StoredValues> {
        Ok(self.values.lock().await.clone())
    }

    async fn save_values(&self, values: StoredValues) -> AppResult<()> {
        *self.values.lock().await = values;
        Ok(())
    }

    async fn load_submitted(&self) -> AppResult<bool> {
        Ok(*self.submitted.lock().await)
    }

    async fn save_submitted(&self, submitted: bool) -> AppResult<()> {
        *self.submitted.lock().await = submitted;
        Ok(())
    }
}

enum Reply {
    Status(u16),
    Unreachable,
}

struct FakeSubmissionGateway {
    replies: Mutex<Vec<Reply>>,
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl FakeSubmissionGateway {
    fn replying(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            payloads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SubmissionGateway for FakeSubmissionGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> AppResult<SubmissionResponse> {
        self.payloads.lock().await.push(payload.clone());
        let mut replies = self.replies.lock().await;
        if replies.is_empty() {
            return Ok(SubmissionResponse { status: 201 });
        }

        match replies.remove(0) {
            Reply::Status(status) => Ok(SubmissionResponse { status }),
            Reply::Unreachable => Err(AppError::Internal("connection refused".to_owned())),
        }
    }
}

struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, language: Language, key: &str) -> String {
        format!("{}:{key}", language.code())
    }
}

struct FixedClock;

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        date(2026, 10, 16)
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| unreachable!())
}

fn ports(
    repository: Arc<FakeStateRepository>,
    gateway: Arc<FakeSubmissionGateway>,
) -> WizardPorts {
    WizardPorts {
        state_repository: repository,
        submission_gateway: gateway,
        translator: Arc::new(KeyTranslator),
        clock: Arc::new(FixedClock),
        schema_source: Arc::new(ApplicantForm),
    }
}

async fn session_with(
    repository: Arc<FakeStateRepository>,
    gateway: Arc<FakeSubmissionGateway>,
) -> WizardSession {
    WizardSession::restore(ports(repository, gateway))
        .await
        .unwrap_or_else(|_| unreachable!())
}

async fn started_session(
    repository: Arc<FakeStateRepository>,
    gateway: Arc<FakeSubmissionGateway>,
) -> WizardSession {
    let mut session = session_with(repository, gateway).await;
    session
        .choose_language(Language::English)
        .await
        .unwrap_or_else(|_| unreachable!());
    session
}

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_owned())
}

fn list(items: &[&str]) -> FieldValue {
    FieldValue::List(items.iter().map(|item| (*item).to_owned()).collect())
}

fn photos(count: usize) -> FieldValue {
    FieldValue::Files(
        (0..count)
            .map(|index| {
                FileUpload::new(format!("photo-{index}.png"), "image/png", vec![0x89, 0x50])
                    .unwrap_or_else(|_| unreachable!())
            })
            .collect(),
    )
}

async fn set(session: &mut WizardSession, name: &str, value: FieldValue) {
    session
        .set_value(name, value)
        .await
        .unwrap_or_else(|_| unreachable!());
}

async fn advance(session: &mut WizardSession) -> AdvanceOutcome {
    session.advance().await.unwrap_or_else(|_| unreachable!())
}

/// Fills every required field and walks to the final step.
async fn fill_to_final_step(session: &mut WizardSession) {
    let answers = [
        vec![
            ("firstname", text("Ada")),
            ("lastname", text("Lovelace")),
            ("birthdate", FieldValue::Date(date(2001, 10, 16))),
            ("nationality", text("FR")),
        ],
        vec![("city", text("Lyon")), ("country", text("FR"))],
        vec![
            ("whatsapp", text("+33612345678")),
            ("email", text("ada@example.org")),
            ("has_telegram", FieldValue::Boolean(false)),
            ("telegram", text("!! stale handle !!")),
        ],
        vec![
            ("experience", text("ONE_TO_3_YEARS")),
            ("english_level", text("FLUENT")),
            ("hardware", text("Phone with a good camera")),
        ],
        vec![
            ("time_per_day", text("ONE_TO_3H")),
            ("planned_content", list(&["PHOTOS", "VIDEOS", "STORIES"])),
            ("existing_content", list(&["PHOTOS", "STORIES"])),
        ],
        Vec::new(),
    ];

    for (index, step_answers) in answers.into_iter().enumerate() {
        for (name, value) in step_answers {
            set(session, name, value).await;
        }
        assert_eq!(
            advance(session).await,
            AdvanceOutcome::Advanced { step: index + 1 }
        );
    }

    set(session, "photos", photos(5)).await;
    set(session, "terms_accepted", FieldValue::Boolean(true)).await;
}

#[tokio::test]
async fn fresh_session_waits_for_a_language() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = session_with(repository, gateway).await;

    assert_eq!(session.phase(), WizardPhase::AwaitingLanguage);
    let result = session.set_value("firstname", text("Ada")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(matches!(session.advance().await, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn choosing_a_language_starts_at_the_first_step() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway).await;

    assert_eq!(session.phase(), WizardPhase::InProgress { step: 0 });
    assert_eq!(*repository.language.lock().await, Some(Language::English));
    assert!(matches!(
        session.choose_language(Language::French).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn first_step_enforces_required_fields_and_age_range() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway).await;

    let AdvanceOutcome::Blocked { errors } = advance(&mut session).await else {
        unreachable!()
    };
    let firstname_error = errors
        .iter()
        .find(|error| error.field == "firstname")
        .map(|error| error.message.as_str());
    assert_eq!(firstname_error, Some("en:errors.required"));
    assert_eq!(session.error("firstname"), Some("en:errors.required"));
    assert_eq!(session.phase(), WizardPhase::InProgress { step: 0 });

    set(&mut session, "firstname", text("Ada")).await;
    set(&mut session, "lastname", text("Lovelace")).await;
    set(&mut session, "nationality", text("FR")).await;
    set(&mut session, "birthdate", FieldValue::Date(date(2016, 10, 16))).await;
    assert_eq!(session.error("firstname"), None);

    let AdvanceOutcome::Blocked { errors } = advance(&mut session).await else {
        unreachable!()
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "birthdate");
    assert_eq!(errors[0].message, "en:errors.age_range");

    set(&mut session, "birthdate", FieldValue::Date(date(2001, 10, 16))).await;
    assert_eq!(
        advance(&mut session).await,
        AdvanceOutcome::Advanced { step: 1 }
    );
    assert_eq!(*repository.step.lock().await, 1);
}

#[tokio::test]
async fn only_the_current_step_is_validated() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository, gateway).await;

    set(&mut session, "email", text("not an email")).await;
    set(&mut session, "firstname", text("Ada")).await;
    set(&mut session, "lastname", text("Lovelace")).await;
    set(&mut session, "nationality", text("FR")).await;
    set(&mut session, "birthdate", FieldValue::Date(date(2001, 10, 16))).await;

    assert_eq!(
        advance(&mut session).await,
        AdvanceOutcome::Advanced { step: 1 }
    );
}

#[tokio::test]
async fn unmet_telegram_dependency_hides_and_exempts_the_handle() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway).await;
    *repository.step.lock().await = 2;
    session
        .change_language()
        .await
        .unwrap_or_else(|_| unreachable!());
    session
        .choose_language(Language::English)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(session.phase(), WizardPhase::InProgress { step: 2 });

    set(&mut session, "whatsapp", text("+33612345678")).await;
    set(&mut session, "email", text("ada@example.org")).await;
    set(&mut session, "telegram", text("!!")).await;

    let view = session
        .current_step_view()
        .unwrap_or_else(|_| unreachable!());
    assert!(view.fields.iter().any(|field| field.name == "telegram"));
    assert!(matches!(
        advance(&mut session).await,
        AdvanceOutcome::Blocked { .. }
    ));

    set(&mut session, "has_telegram", FieldValue::Boolean(false)).await;
    let view = session
        .current_step_view()
        .unwrap_or_else(|_| unreachable!());
    assert!(!view.fields.iter().any(|field| field.name == "telegram"));
    assert_eq!(
        advance(&mut session).await,
        AdvanceOutcome::Advanced { step: 3 }
    );
}

#[tokio::test]
async fn accepted_submission_completes_and_clears_values() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(vec![Reply::Status(201)]));
    let mut session = started_session(repository.clone(), gateway.clone()).await;

    fill_to_final_step(&mut session).await;
    assert_eq!(advance(&mut session).await, AdvanceOutcome::Submitted);

    assert_eq!(session.phase(), WizardPhase::Submitted);
    assert!(*repository.submitted.lock().await);
    assert_eq!(session.values().get("firstname"), None);
    assert_eq!(
        session.values().get("has_telegram"),
        Some(&FieldValue::Boolean(true))
    );
    assert!(!repository.values.lock().await.contains_key("firstname"));

    let payloads = gateway.payloads.lock().await;
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload.parts()[0].name, "language");
    assert_eq!(payload.text_values("language"), vec!["en"]);
    assert!(payload.text_values("telegram").is_empty());
    assert!(payload.text_values("username").is_empty());
    assert_eq!(payload.text_values("birthdate"), vec!["2001-10-16"]);
    assert_eq!(payload.text_values("has_telegram"), vec!["false"]);
    assert_eq!(payload.files("photos").len(), 5);
}

#[tokio::test]
async fn rejected_submission_stays_on_the_final_step() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(vec![
        Reply::Status(422),
        Reply::Unreachable,
    ]));
    let mut session = started_session(repository.clone(), gateway).await;

    fill_to_final_step(&mut session).await;
    assert_eq!(
        advance(&mut session).await,
        AdvanceOutcome::SubmissionFailed { status: Some(422) }
    );
    assert_eq!(session.phase(), WizardPhase::InProgress { step: 6 });
    assert_eq!(session.values().get("firstname"), Some(&text("Ada")));

    assert_eq!(
        advance(&mut session).await,
        AdvanceOutcome::SubmissionFailed { status: None }
    );
    assert!(!*repository.submitted.lock().await);
}

#[tokio::test]
async fn retreat_stops_at_the_first_step() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway).await;

    assert_eq!(
        session.retreat().await.unwrap_or_else(|_| unreachable!()),
        WizardPhase::InProgress { step: 0 }
    );

    fill_to_final_step(&mut session).await;
    assert_eq!(
        session.retreat().await.unwrap_or_else(|_| unreachable!()),
        WizardPhase::InProgress { step: 5 }
    );
    assert_eq!(*repository.step.lock().await, 5);
}

#[tokio::test]
async fn reset_restores_defaults_and_first_step() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway).await;
    let defaults = session.values().clone();

    fill_to_final_step(&mut session).await;
    session.reset().await.unwrap_or_else(|_| unreachable!());

    assert_eq!(session.values(), &defaults);
    assert_eq!(session.phase(), WizardPhase::InProgress { step: 0 });
    assert_eq!(*repository.step.lock().await, 0);
    assert_eq!(
        repository.values.lock().await.get("has_telegram"),
        Some(&Value::Bool(true))
    );
    assert!(!repository.values.lock().await.contains_key("firstname"));
}

#[tokio::test]
async fn changing_language_keeps_progress() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway).await;

    fill_to_final_step(&mut session).await;
    session
        .change_language()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(session.phase(), WizardPhase::AwaitingLanguage);
    assert_eq!(*repository.language.lock().await, None);

    let phase = session
        .choose_language(Language::French)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(phase, WizardPhase::InProgress { step: 6 });
    assert_eq!(session.values().get("firstname"), Some(&text("Ada")));
    assert_eq!(session.translate("ui.next"), "fr:ui.next");
    let view = session
        .current_step_view()
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(view.title.as_deref(), Some("fr:steps.finalize.title"));
    assert!(view.is_last());
}

#[tokio::test]
async fn restart_restores_progress_and_values() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository.clone(), gateway.clone()).await;
    set(&mut session, "firstname", text("Ada")).await;
    set(&mut session, "birthdate", FieldValue::Date(date(2001, 10, 16))).await;
    set(&mut session, "planned_content", list(&["PHOTOS", "AUDIO"])).await;
    let before = session.values().clone();
    drop(session);

    let restored = session_with(repository, gateway).await;
    assert_eq!(restored.phase(), WizardPhase::InProgress { step: 0 });
    assert_eq!(restored.language(), Some(Language::English));
    assert_eq!(restored.values(), &before);
}

#[tokio::test]
async fn submitted_flag_survives_restart() {
    let repository = Arc::new(FakeStateRepository::default());
    *repository.language.lock().await = Some(Language::Spanish);
    *repository.submitted.lock().await = true;
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));

    let mut session = session_with(repository, gateway).await;
    assert_eq!(session.phase(), WizardPhase::Submitted);
    assert!(matches!(session.reset().await, Err(AppError::Conflict(_))));
    assert!(session.current_step_view().is_err());
}

#[tokio::test]
async fn stored_step_past_the_end_is_clamped() {
    let repository = Arc::new(FakeStateRepository::default());
    *repository.language.lock().await = Some(Language::French);
    *repository.step.lock().await = 42;
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));

    let session = session_with(repository, gateway).await;
    assert_eq!(session.phase(), WizardPhase::InProgress { step: 6 });
}

#[tokio::test]
async fn values_are_checked_against_the_schema() {
    let repository = Arc::new(FakeStateRepository::default());
    let gateway = Arc::new(FakeSubmissionGateway::replying(Vec::new()));
    let mut session = started_session(repository, gateway).await;

    assert!(matches!(
        session.set_value("nickname", text("Ada")).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        session
            .set_value("has_telegram", text("yes"))
            .await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        session.clear_value("nickname").await,
        Err(AppError::NotFound(_))
    ));

    set(&mut session, "firstname", text("Ada")).await;
    session
        .clear_value("firstname")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(session.values().get("firstname"), None);
}
