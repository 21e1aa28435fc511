use std::collections::HashMap;

use serde_json::Value;
use stepform_application::Translator;
use stepform_core::{AppError, AppResult};
use stepform_domain::Language;

const FALLBACK_LANGUAGE: Language = Language::English;

const CATALOGS: [(Language, &str); 3] = [
    (Language::French, include_str!("../locales/fr.json")),
    (Language::English, include_str!("../locales/en.json")),
    (Language::Spanish, include_str!("../locales/es.json")),
];

/// Translator over the catalogs compiled into the binary.
///
/// Nested catalog objects are addressed with dotted keys. Missing keys fall
/// back to English, then to the key itself.
#[derive(Debug, Clone)]
pub struct StaticTranslator {
    catalogs: HashMap<Language, HashMap<String, String>>,
}

impl StaticTranslator {
    /// Parses the embedded catalogs.
    pub fn new() -> AppResult<Self> {
        let catalogs = CATALOGS
            .iter()
            .map(|(language, source)| Ok((*language, parse_catalog(*language, source)?)))
            .collect::<AppResult<HashMap<_, _>>>()?;

        Ok(Self { catalogs })
    }

    /// Returns whether a language's own catalog defines the key.
    #[must_use]
    pub fn has_key(&self, language: Language, key: &str) -> bool {
        self.catalogs
            .get(&language)
            .is_some_and(|catalog| catalog.contains_key(key))
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.catalogs
            .get(&language)
            .and_then(|catalog| catalog.get(key))
            .map(String::as_str)
    }
}

impl Translator for StaticTranslator {
    fn translate(&self, language: Language, key: &str) -> String {
        self.lookup(language, key)
            .or_else(|| self.lookup(FALLBACK_LANGUAGE, key))
            .unwrap_or(key)
            .to_owned()
    }
}

fn parse_catalog(language: Language, source: &str) -> AppResult<HashMap<String, String>> {
    let root: Value = serde_json::from_str(source).map_err(|error| {
        AppError::Internal(format!(
            "invalid '{}' translation catalog: {error}",
            language.code()
        ))
    })?;

    let mut entries = HashMap::new();
    flatten(String::new(), &root, &mut entries);
    Ok(entries)
}

fn flatten(prefix: String, value: &Value, entries: &mut HashMap<String, String>) {
    match value {
        Value::Object(object) => {
            for (key, nested) in object {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(path, nested, entries);
            }
        }
        Value::String(text) => {
            entries.insert(prefix, text.clone());
        }
        Value::Number(number) => {
            entries.insert(prefix, number.to_string());
        }
        Value::Null | Value::Bool(_) | Value::Array(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use stepform_application::{ApplicantForm, FormSchemaSource, Translator};
    use stepform_domain::Language;

    use super::StaticTranslator;

    fn translator() -> StaticTranslator {
        StaticTranslator::new().unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn keys_resolve_per_language() {
        let translator = translator();
        assert_eq!(translator.translate(Language::English, "ui.next"), "Next");
        assert_eq!(translator.translate(Language::French, "ui.next"), "Suivant");
        assert_eq!(translator.translate(Language::Spanish, "ui.next"), "Siguiente");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        let translator = translator();
        assert_eq!(
            translator.translate(Language::Spanish, "ui.does_not_exist"),
            "ui.does_not_exist"
        );
    }

    #[test]
    fn placeholders_are_interpolated() {
        let translator = translator();
        assert_eq!(
            translator.translate_with(
                Language::English,
                "errors.age_range",
                &[("min", "18"), ("max", "40")]
            ),
            "You must be between 18 and 40 years old"
        );
    }

    struct RecordingTranslator {
        inner: StaticTranslator,
        keys: Mutex<BTreeSet<String>>,
    }

    impl Translator for RecordingTranslator {
        fn translate(&self, language: Language, key: &str) -> String {
            self.keys
                .lock()
                .unwrap_or_else(|_| unreachable!())
                .insert(key.to_owned());
            self.inner.translate(language, key)
        }
    }

    #[test]
    fn every_schema_key_is_translated_in_every_language() {
        let recorder = RecordingTranslator {
            inner: translator(),
            keys: Mutex::new(BTreeSet::new()),
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap_or_else(|| unreachable!());
        ApplicantForm
            .build_schema(&recorder, Language::English, today)
            .unwrap_or_else(|_| unreachable!());

        let keys = recorder.keys.lock().unwrap_or_else(|_| unreachable!());
        assert!(keys.contains("fields.firstname.label"));
        for language in Language::ALL {
            let missing: Vec<&String> = keys
                .iter()
                .filter(|key| !recorder.inner.has_key(language, key))
                .collect();
            assert!(missing.is_empty(), "{language} is missing {missing:?}");
        }
    }
}
