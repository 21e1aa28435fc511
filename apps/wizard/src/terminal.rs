//! Dialoguer prompts for each field kind.

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use stepform_application::{Clock, FieldView, StepView, WizardSession};
use stepform_core::{AppError, AppResult};
use stepform_domain::{FieldKind, FieldOption, FieldValue, Language, TextInputType};

use crate::attachments::{read_upload, split_paths};
use crate::birthdate::DateBounds;
use crate::phone::{dial_code, to_international};

/// What the applicant did with one field prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Keep,
    Set(FieldValue),
    Clear,
}

/// Entries of the menu shown after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Next,
    Previous,
    Reset,
    ChangeLanguage,
    Quit,
}

pub struct Terminal {
    theme: ColorfulTheme,
    clock: Arc<dyn Clock>,
}

impl Terminal {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            clock,
        }
    }

    pub fn choose_language(&self, prompt: &str, current: Option<Language>) -> AppResult<Language> {
        let items: Vec<String> = Language::ALL
            .iter()
            .map(|language| format!("{} {}", language.flag(), language.native_label()))
            .collect();
        let default = current
            .and_then(|current| Language::ALL.iter().position(|language| *language == current))
            .unwrap_or(0);

        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(default)
            .interact()
            .map_err(prompt_failed)?;

        Language::ALL
            .get(index)
            .copied()
            .ok_or_else(|| AppError::Internal(format!("language choice {index} is out of range")))
    }

    pub fn show_step(&self, session: &WizardSession, view: &StepView) {
        println!();
        println!(
            "{}",
            session.translate_with(
                "ui.step_progress",
                &[
                    ("current", &(view.index + 1).to_string()),
                    ("total", &view.total.to_string()),
                ],
            )
        );
        if let Some(title) = &view.title {
            println!("== {title} ==");
        }
        if let Some(description) = &view.description {
            println!("{description}");
        }
        println!("{}", session.translate("ui.required_fields"));
    }

    pub fn notice(&self, message: &str) {
        println!("{message}");
    }

    pub fn show_success(&self, session: &WizardSession) {
        println!();
        println!("{}", session.translate("ui.success.title"));
        println!("{}", session.translate("ui.success.description"));
    }

    pub fn confirm(&self, prompt: &str) -> AppResult<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(prompt_failed)
    }

    pub fn choose_action(&self, session: &WizardSession, view: &StepView) -> AppResult<MenuAction> {
        let mut actions = vec![MenuAction::Next];
        if view.index > 0 {
            actions.push(MenuAction::Previous);
        }
        actions.extend([MenuAction::Reset, MenuAction::ChangeLanguage, MenuAction::Quit]);

        let items: Vec<String> = actions
            .iter()
            .map(|action| {
                session.translate(match action {
                    MenuAction::Next if view.is_last() => "ui.submit",
                    MenuAction::Next => "ui.next",
                    MenuAction::Previous => "ui.previous",
                    MenuAction::Reset => "ui.reset",
                    MenuAction::ChangeLanguage => "ui.change_language",
                    MenuAction::Quit => "ui.quit",
                })
            })
            .collect();

        let index = Select::with_theme(&self.theme)
            .with_prompt(session.translate("ui.action"))
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_failed)?;

        actions
            .get(index)
            .copied()
            .ok_or_else(|| AppError::Internal(format!("menu choice {index} is out of range")))
    }

    /// Prompts for one field with its current value preselected.
    pub async fn edit_field(&self, session: &WizardSession, field: &FieldView) -> AppResult<FieldEdit> {
        println!();
        if let Some(description) = &field.description {
            println!("  {description}");
        }
        if let Some(error) = &field.error {
            println!("  ! {error}");
        }

        let prompt = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };

        match &field.kind {
            FieldKind::Text { input_type } => self.edit_text(session, field, &prompt, *input_type),
            FieldKind::Textarea => self.edit_text(session, field, &prompt, TextInputType::Text),
            FieldKind::Checkbox | FieldKind::Switch => {
                let current = matches!(field.value, Some(FieldValue::Boolean(true)));
                let checked = Confirm::with_theme(&self.theme)
                    .with_prompt(prompt)
                    .default(current)
                    .interact()
                    .map_err(prompt_failed)?;
                Ok(FieldEdit::Set(FieldValue::Boolean(checked)))
            }
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Combobox { options } => self.edit_choice(session, field, &prompt, options),
            FieldKind::MultiCheckbox { options } => self.edit_multi_choice(field, &prompt, options),
            FieldKind::Birthdate { min_date, max_date } => {
                self.edit_birthdate(session, field, &prompt, *min_date, *max_date)
            }
            FieldKind::File { .. } => self.edit_files(session, field, &prompt).await,
            FieldKind::Phone {
                default_country, ..
            } => self.edit_phone(field, &prompt, default_country.as_deref()),
        }
    }

    fn edit_text(
        &self,
        session: &WizardSession,
        field: &FieldView,
        prompt: &str,
        input_type: TextInputType,
    ) -> AppResult<FieldEdit> {
        let initial = initial_text(field.value.as_ref());
        if initial.is_empty()
            && let Some(placeholder) = &field.placeholder
        {
            println!("  ({placeholder})");
        }

        loop {
            let typed = self.read_line(prompt, &initial)?;
            if typed.is_empty() {
                return Ok(FieldEdit::Clear);
            }
            if input_type != TextInputType::Number {
                return Ok(FieldEdit::Set(FieldValue::Text(typed)));
            }

            match typed.replace(',', ".").parse::<f64>() {
                Ok(number) if number.is_finite() => {
                    return Ok(FieldEdit::Set(FieldValue::Number(number)));
                }
                _ => self.notice(&format!("  ! {}", session.translate("errors.invalid_number"))),
            }
        }
    }

    fn edit_phone(
        &self,
        field: &FieldView,
        prompt: &str,
        default_country: Option<&str>,
    ) -> AppResult<FieldEdit> {
        let prompt = match default_country.and_then(dial_code) {
            Some(dial) => format!("{prompt} (+{dial})"),
            None => prompt.to_owned(),
        };
        let typed = self.read_line(&prompt, &initial_text(field.value.as_ref()))?;
        let number = to_international(&typed, default_country);
        if number.is_empty() {
            return Ok(FieldEdit::Clear);
        }

        Ok(FieldEdit::Set(FieldValue::Text(number)))
    }

    fn edit_choice(
        &self,
        session: &WizardSession,
        field: &FieldView,
        prompt: &str,
        options: &[FieldOption],
    ) -> AppResult<FieldEdit> {
        let mut items: Vec<String> = options.iter().map(option_label).collect();
        if !field.required {
            items.push(session.translate("ui.not_set"));
        }
        let current = match &field.value {
            Some(FieldValue::Text(value)) => options.iter().position(|option| option.value() == value),
            _ => None,
        };

        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(current.unwrap_or(0))
            .max_length(12)
            .interact()
            .map_err(prompt_failed)?;

        Ok(options.get(index).map_or(FieldEdit::Clear, |option| {
            FieldEdit::Set(FieldValue::Text(option.value().to_owned()))
        }))
    }

    fn edit_multi_choice(
        &self,
        field: &FieldView,
        prompt: &str,
        options: &[FieldOption],
    ) -> AppResult<FieldEdit> {
        let items: Vec<String> = options.iter().map(option_label).collect();
        let checked: Vec<bool> = options
            .iter()
            .map(|option| match &field.value {
                Some(FieldValue::List(values)) => values.iter().any(|value| value == option.value()),
                _ => false,
            })
            .collect();

        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .defaults(&checked)
            .interact()
            .map_err(prompt_failed)?;

        let values: Vec<String> = picked
            .into_iter()
            .filter_map(|index| options.get(index))
            .map(|option| option.value().to_owned())
            .collect();
        if values.is_empty() {
            return Ok(FieldEdit::Clear);
        }

        Ok(FieldEdit::Set(FieldValue::List(values)))
    }

    fn edit_birthdate(
        &self,
        session: &WizardSession,
        field: &FieldView,
        prompt: &str,
        min_date: Option<NaiveDate>,
        max_date: Option<NaiveDate>,
    ) -> AppResult<FieldEdit> {
        let bounds = DateBounds::new(min_date, max_date, self.clock.today());
        let current = match field.value {
            Some(FieldValue::Date(date)) => bounds.clamp(date),
            _ => bounds.latest,
        };
        println!("  {prompt}");

        let years = bounds.years();
        let year = self.pick(&session.translate("ui.year"), &years, current.year(), |year| {
            year.to_string()
        })?;
        let months = bounds.months(year);
        let month = self.pick(&session.translate("ui.month"), &months, current.month(), |month| {
            session.translate(&format!("months.{month}"))
        })?;
        let days = bounds.days(year, month);
        let day = self.pick(&session.translate("ui.day"), &days, current.day(), |day| {
            day.to_string()
        })?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| FieldEdit::Set(FieldValue::Date(date)))
            .ok_or_else(|| AppError::Internal(format!("picked an impossible date {year}-{month}-{day}")))
    }

    async fn edit_files(
        &self,
        session: &WizardSession,
        field: &FieldView,
        prompt: &str,
    ) -> AppResult<FieldEdit> {
        if let Some(FieldValue::Files(files)) = &field.value {
            let count = files.len().to_string();
            println!(
                "  {}",
                session.translate_with("ui.selected_files", &[("count", &count)])
            );
            println!("  ({})", session.translate("ui.keep_current"));
        }
        let prompt = format!("{prompt} ({})", session.translate("ui.file_paths"));

        'prompt: loop {
            let typed = self.read_line(&prompt, "")?;
            let paths = split_paths(&typed);
            if paths.is_empty() {
                return Ok(FieldEdit::Keep);
            }

            let mut uploads = Vec::with_capacity(paths.len());
            for path in paths {
                match read_upload(Path::new(path)).await {
                    Ok(upload) => uploads.push(upload),
                    Err(error) => {
                        tracing::warn!(path, error = %error, "could not attach file");
                        self.notice(&format!(
                            "  ! {}",
                            session.translate_with("ui.file_read_error", &[("path", path)])
                        ));
                        continue 'prompt;
                    }
                }
            }

            return Ok(FieldEdit::Set(FieldValue::Files(uploads)));
        }
    }

    fn pick<T: Copy + PartialEq>(
        &self,
        prompt: &str,
        choices: &[T],
        current: T,
        label: impl Fn(T) -> String,
    ) -> AppResult<T> {
        let items: Vec<String> = choices.iter().map(|choice| label(*choice)).collect();
        let default = choices
            .iter()
            .position(|choice| *choice == current)
            .unwrap_or(0);

        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(default)
            .max_length(12)
            .interact()
            .map_err(prompt_failed)?;

        choices
            .get(index)
            .copied()
            .ok_or_else(|| AppError::Internal(format!("choice {index} is out of range")))
    }

    fn read_line(&self, prompt: &str, initial: &str) -> AppResult<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()
            .map(|typed| typed.trim().to_owned())
            .map_err(prompt_failed)
    }
}

fn option_label(option: &FieldOption) -> String {
    match option.flag() {
        Some(flag) => format!("{flag} {}", option.label()),
        None => option.label().to_owned(),
    }
}

fn initial_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn prompt_failed(error: dialoguer::Error) -> AppError {
    AppError::Internal(format!("terminal prompt failed: {error}"))
}
