use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use stepform_core::AppError;

/// Languages offered at the language gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Language {
    /// French.
    French,
    /// English.
    English,
    /// Spanish.
    Spanish,
}

impl Language {
    /// All supported languages in the order they are offered.
    pub const ALL: [Self; 3] = [Self::French, Self::English, Self::Spanish];

    /// Returns the stable language code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::French => "fr",
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    /// Returns the country code of the flag shown for this language.
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            Self::French => "FR",
            Self::English => "GB",
            Self::Spanish => "ES",
        }
    }

    /// Returns the language name written in that language.
    #[must_use]
    pub fn native_label(&self) -> &'static str {
        match self {
            Self::French => "Français",
            Self::English => "English",
            Self::Spanish => "Español",
        }
    }
}

impl Display for Language {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::French),
            "en" => Ok(Self::English),
            "es" => Ok(Self::Spanish),
            other => Err(AppError::Validation(format!(
                "unsupported language '{other}'"
            ))),
        }
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.code().to_owned()
    }
}

impl TryFrom<String> for Language {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
