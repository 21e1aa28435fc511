use stepform_domain::Language;

/// Lookup of localized strings by key.
pub trait Translator: Send + Sync {
    /// Returns the text for a key, or a fallback when the key is unknown.
    fn translate(&self, language: Language, key: &str) -> String;

    /// Returns the text for a key with `{{name}}` placeholders replaced.
    fn translate_with(&self, language: Language, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.translate(language, key), |text, (name, value)| {
                text.replace(format!("{{{{{name}}}}}").as_str(), value)
            })
    }
}
