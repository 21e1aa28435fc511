use chrono::NaiveDate;
use stepform_core::AppResult;
use stepform_domain::{
    Check, FieldDescriptor, FieldKind, FieldRule, FieldValue, Step, TextInputType, age_bounds,
};

use super::options::{CONTENT_KIND, COUNTRY_CODES, ENGLISH_LEVEL, EXPERIENCE, TIME_PER_DAY};
use super::{
    INSTAGRAM_PATTERN, Labels, MAX_AGE_YEARS, MAX_PHOTO_BYTES, MAX_PHOTOS, MIN_AGE_YEARS,
    MIN_EXISTING_CONTENT, MIN_PHOTOS, MIN_PLANNED_CONTENT, NAME_MAX_LENGTH, NOTES_MAX_LENGTH,
    PHONE_PATTERN, PHOTO_CONTENT_TYPES, TELEGRAM_PATTERN, USERNAME_PATTERN,
    USERNAME_SEPARATOR_RUN,
};

const PLAIN_TEXT: FieldKind = FieldKind::Text {
    input_type: TextInputType::Text,
};

const NUMBER: FieldKind = FieldKind::Text {
    input_type: TextInputType::Number,
};

pub(super) fn identity(labels: &Labels<'_>, today: NaiveDate) -> AppResult<Step> {
    let (earliest, latest) = age_bounds(today, MIN_AGE_YEARS, MAX_AGE_YEARS);
    let min_age = MIN_AGE_YEARS.to_string();
    let max_age = MAX_AGE_YEARS.to_string();

    let fields = vec![
        labels
            .field("firstname", PLAIN_TEXT, name_rule(labels))?
            .with_placeholder(labels.placeholder("firstname")),
        labels
            .field("lastname", PLAIN_TEXT, name_rule(labels))?
            .with_placeholder(labels.placeholder("lastname")),
        labels.field(
            "birthdate",
            FieldKind::Birthdate {
                min_date: earliest,
                max_date: latest,
            },
            labels
                .required()
                .with_type_message(labels.text("errors.invalid_date"))
                .with_check(
                    Check::AgeBetween {
                        min_years: MIN_AGE_YEARS,
                        max_years: MAX_AGE_YEARS,
                    },
                    labels.text_with(
                        "errors.age_range",
                        &[("min", min_age.as_str()), ("max", max_age.as_str())],
                    ),
                ),
        )?,
        labels.field(
            "nationality",
            country_kind(labels)?,
            country_rule(labels),
        )?,
    ];

    Ok(step(labels, "identity", fields))
}

pub(super) fn location(labels: &Labels<'_>) -> AppResult<Step> {
    let fields = vec![
        labels
            .field("city", PLAIN_TEXT, name_rule(labels))?
            .with_placeholder(labels.placeholder("city")),
        labels.field("country", country_kind(labels)?, country_rule(labels))?,
    ];

    Ok(step(labels, "location", fields))
}

pub(super) fn contact(labels: &Labels<'_>) -> AppResult<Step> {
    let fields = vec![
        labels
            .field(
                "whatsapp",
                FieldKind::Phone {
                    default_country: Some(labels.language.flag().to_owned()),
                    international: true,
                },
                labels
                    .required()
                    .with_check(Check::pattern(PHONE_PATTERN)?, labels.text("errors.invalid_phone")),
            )?
            .with_placeholder(labels.placeholder("whatsapp")),
        labels
            .field(
                "email",
                FieldKind::Text {
                    input_type: TextInputType::Email,
                },
                labels
                    .required()
                    .with_check(Check::Email, labels.text("errors.invalid_email")),
            )?
            .with_placeholder(labels.placeholder("email")),
        labels
            .field(
                "instagram",
                PLAIN_TEXT,
                labels.optional().with_check(
                    Check::pattern(INSTAGRAM_PATTERN)?,
                    labels.text("errors.invalid_instagram"),
                ),
            )?
            .with_placeholder(labels.placeholder("instagram")),
        labels
            .field("has_telegram", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(true))?,
        labels
            .field(
                "telegram",
                PLAIN_TEXT,
                labels.required().with_check(
                    Check::pattern(TELEGRAM_PATTERN)?,
                    labels.text("errors.invalid_telegram"),
                ),
            )?
            .with_placeholder(labels.placeholder("telegram"))
            .depends_on("has_telegram", true)?,
    ];

    Ok(step(labels, "contact", fields))
}

pub(super) fn experience(labels: &Labels<'_>) -> AppResult<Step> {
    let fields = vec![
        labels.field(
            "experience",
            FieldKind::Radio {
                options: labels.options("experience", &EXPERIENCE)?,
            },
            choice_rule(labels, &EXPERIENCE),
        )?,
        labels.field(
            "english_level",
            FieldKind::Select {
                options: labels.options("english_level", &ENGLISH_LEVEL)?,
            },
            choice_rule(labels, &ENGLISH_LEVEL),
        )?,
        labels
            .field("hardware", FieldKind::Textarea, labels.required())?
            .with_placeholder(labels.placeholder("hardware")),
    ];

    Ok(step(labels, "experience", fields))
}

pub(super) fn content(labels: &Labels<'_>) -> AppResult<Step> {
    let fields = vec![
        labels
            .field("comfortable_with_videos", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(false))?,
        labels
            .field("promote_on_social_media", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(false))?,
        labels.field(
            "time_per_day",
            FieldKind::Radio {
                options: labels.options("time_per_day", &TIME_PER_DAY)?,
            },
            choice_rule(labels, &TIME_PER_DAY),
        )?,
        labels.field(
            "planned_content",
            FieldKind::MultiCheckbox {
                options: labels.options("content_kind", &CONTENT_KIND)?,
            },
            content_rule(labels, MIN_PLANNED_CONTENT),
        )?,
        labels.field(
            "existing_content",
            FieldKind::MultiCheckbox {
                options: labels.options("content_kind", &CONTENT_KIND)?,
            },
            content_rule(labels, MIN_EXISTING_CONTENT),
        )?,
    ];

    Ok(step(labels, "content", fields))
}

pub(super) fn platform(labels: &Labels<'_>) -> AppResult<Step> {
    let non_negative = || Check::Range {
        min: Some(0.0),
        max: None,
    };

    let fields = vec![
        labels
            .field("country_blocked", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(false))?,
        labels
            .field("has_creator_page", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(false))?,
        labels
            .field(
                "username",
                PLAIN_TEXT,
                labels
                    .required()
                    .with_check(
                        Check::Length {
                            min: Some(5),
                            max: Some(24),
                        },
                        labels.text_with("errors.length_between", &[("min", "5"), ("max", "24")]),
                    )
                    .with_check(
                        Check::pattern(USERNAME_PATTERN)?,
                        labels.text("errors.invalid_username"),
                    )
                    .with_check(
                        Check::forbidden_pattern(USERNAME_SEPARATOR_RUN)?,
                        labels.text("errors.username_separators"),
                    ),
            )?
            .with_placeholder(labels.placeholder("username"))
            .depends_on("has_creator_page", true)?,
        labels
            .field("is_verified", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(false))?
            .depends_on("has_creator_page", true)?,
        labels
            .field("is_paid", FieldKind::Switch, labels.optional())?
            .with_default(FieldValue::Boolean(false))?
            .depends_on("has_creator_page", true)?,
        labels
            .field(
                "follower_count",
                NUMBER,
                labels
                    .required()
                    .with_type_message(labels.text("errors.invalid_number"))
                    .with_check(non_negative(), labels.text("errors.negative_number")),
            )?
            .with_placeholder(labels.placeholder("follower_count"))
            .depends_on("has_creator_page", true)?,
        labels
            .field(
                "monthly_income",
                NUMBER,
                labels
                    .optional()
                    .with_type_message(labels.text("errors.invalid_number"))
                    .with_check(non_negative(), labels.text("errors.negative_number")),
            )?
            .with_placeholder(labels.placeholder("monthly_income"))
            .depends_on("has_creator_page", true)?,
    ];

    Ok(step(labels, "platform", fields))
}

pub(super) fn finalize(labels: &Labels<'_>) -> AppResult<Step> {
    let accepted_types: Vec<String> = PHOTO_CONTENT_TYPES
        .iter()
        .map(|mime| (*mime).to_owned())
        .collect();
    let max_megabytes = (MAX_PHOTO_BYTES / (1024 * 1024)).to_string();
    let min_photos = MIN_PHOTOS.to_string();
    let max_photos = MAX_PHOTOS.to_string();
    let max_notes = NOTES_MAX_LENGTH.to_string();

    let fields = vec![
        labels.field(
            "photos",
            FieldKind::File {
                accept: accepted_types.clone(),
            },
            labels
                .required()
                .with_check(
                    Check::ItemCount {
                        min: Some(MIN_PHOTOS),
                        max: Some(MAX_PHOTOS),
                    },
                    labels.text_with(
                        "errors.file_count",
                        &[("min", min_photos.as_str()), ("max", max_photos.as_str())],
                    ),
                )
                .with_check(
                    Check::FileTypes(accepted_types),
                    labels.text("errors.file_type"),
                )
                .with_check(
                    Check::MaxFileSize(MAX_PHOTO_BYTES),
                    labels.text_with("errors.file_too_large", &[("max", max_megabytes.as_str())]),
                ),
        )?,
        labels
            .field(
                "applicant_notes",
                FieldKind::Textarea,
                labels.optional().with_check(
                    Check::Length {
                        min: None,
                        max: Some(NOTES_MAX_LENGTH),
                    },
                    labels.text_with("errors.too_long", &[("max", max_notes.as_str())]),
                ),
            )?
            .with_placeholder(labels.placeholder("applicant_notes")),
        labels
            .field(
                "terms_accepted",
                FieldKind::Checkbox,
                FieldRule::required(labels.text("errors.terms_required"))
                    .with_type_message(labels.text("errors.invalid_type"))
                    .with_check(Check::MustBeTrue, labels.text("errors.terms_required")),
            )?
            .with_default(FieldValue::Boolean(false))?,
    ];

    Ok(step(labels, "finalize", fields))
}

fn step(labels: &Labels<'_>, id: &str, fields: Vec<FieldDescriptor>) -> Step {
    Step::new(fields)
        .with_title(labels.step_title(id))
        .with_description(labels.step_description(id))
}

fn name_rule(labels: &Labels<'_>) -> FieldRule {
    let max = NAME_MAX_LENGTH.to_string();
    labels.required().with_check(
        Check::Length {
            min: Some(1),
            max: Some(NAME_MAX_LENGTH),
        },
        labels.text_with("errors.too_long", &[("max", max.as_str())]),
    )
}

fn country_kind(labels: &Labels<'_>) -> AppResult<FieldKind> {
    let options = labels
        .options("country", &COUNTRY_CODES)?
        .into_iter()
        .map(|option| {
            let flag = option.value().to_owned();
            option.with_flag(flag)
        })
        .collect();

    Ok(FieldKind::Combobox { options })
}

fn country_rule(labels: &Labels<'_>) -> FieldRule {
    choice_rule(labels, &COUNTRY_CODES)
}

fn choice_rule(labels: &Labels<'_>, values: &[&str]) -> FieldRule {
    labels.required().with_check(
        Check::OneOf(values.iter().map(|value| (*value).to_owned()).collect()),
        labels.text("errors.invalid_option"),
    )
}

fn content_rule(labels: &Labels<'_>, min_items: usize) -> FieldRule {
    let min = min_items.to_string();
    labels
        .required()
        .with_check(
            Check::OneOf(CONTENT_KIND.iter().map(|value| (*value).to_owned()).collect()),
            labels.text("errors.invalid_option"),
        )
        .with_check(
            Check::ItemCount {
                min: Some(min_items),
                max: None,
            },
            labels.text_with("errors.too_few_items", &[("min", min.as_str())]),
        )
        .with_check(Check::UniqueItems, labels.text("errors.duplicate_items"))
}
