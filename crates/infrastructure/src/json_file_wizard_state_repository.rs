use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use stepform_application::{StoredValues, WizardStateRepository};
use stepform_core::{AppError, AppResult};
use stepform_domain::Language;
use tokio::sync::Mutex;
use tracing::warn;

/// On-disk layout, one key per slot.
#[derive(Debug, Default, Clone, Serialize)]
struct StateDocument {
    step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    lng: Option<String>,
    #[serde(rename = "watchedValues")]
    watched_values: StoredValues,
    send: bool,
}

impl StateDocument {
    /// Reads each slot on its own; a slot of the wrong shape is dropped
    /// without touching the others.
    fn from_object(path: &Path, mut object: Map<String, Value>) -> Self {
        let defaults = Self::default();

        Self {
            step: take_slot(path, &mut object, "step", |value| {
                value.as_u64().and_then(|step| usize::try_from(step).ok())
            })
            .unwrap_or(defaults.step),
            lng: take_slot(path, &mut object, "lng", |value| match value {
                Value::String(code) => Some(Some(code)),
                Value::Null => Some(None),
                _ => None,
            })
            .flatten(),
            watched_values: take_slot(path, &mut object, "watchedValues", |value| match value {
                Value::Object(values) => Some(values),
                _ => None,
            })
            .unwrap_or(defaults.watched_values),
            send: take_slot(path, &mut object, "send", |value| value.as_bool())
                .unwrap_or(defaults.send),
        }
    }
}

/// Wizard progress stored as one JSON document on disk.
///
/// Writes go through a sibling temporary file and a rename, so a crash
/// leaves either the previous or the new document.
pub struct JsonFileWizardStateRepository {
    path: PathBuf,
    document: Mutex<StateDocument>,
}

impl JsonFileWizardStateRepository {
    /// Opens the document at `path`.
    ///
    /// A missing file is empty state. A malformed file is logged and also
    /// treated as empty; it is replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let document = read_document(&path).await?;

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    async fn update(&self, apply: impl FnOnce(&mut StateDocument) + Send) -> AppResult<()> {
        let mut document = self.document.lock().await;
        apply(&mut document);
        write_document(&self.path, &document).await
    }
}

#[async_trait]
impl WizardStateRepository for JsonFileWizardStateRepository {
    async fn load_language(&self) -> AppResult<Option<Language>> {
        let document = self.document.lock().await;
        let Some(code) = document.lng.as_deref() else {
            return Ok(None);
        };

        match code.parse::<Language>() {
            Ok(language) => Ok(Some(language)),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "ignoring unsupported stored language"
                );
                Ok(None)
            }
        }
    }

    async fn save_language(&self, language: Option<Language>) -> AppResult<()> {
        self.update(|document| {
            document.lng = language.map(|language| language.code().to_owned());
        })
        .await
    }

    async fn load_step(&self) -> AppResult<usize> {
        Ok(self.document.lock().await.step)
    }

    async fn save_step(&self, step: usize) -> AppResult<()> {
        self.update(|document| document.step = step).await
    }

    async fn load_values(&self) -> AppResult<StoredValues> {
        Ok(self.document.lock().await.watched_values.clone())
    }

    async fn save_values(&self, values: StoredValues) -> AppResult<()> {
        self.update(|document| document.watched_values = values)
            .await
    }

    async fn load_submitted(&self) -> AppResult<bool> {
        Ok(self.document.lock().await.send)
    }

    async fn save_submitted(&self, submitted: bool) -> AppResult<()> {
        self.update(|document| document.send = submitted).await
    }
}

async fn read_document(path: &Path) -> AppResult<StateDocument> {
    let contents = match tokio::fs::read(path).await {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(StateDocument::default()),
        Err(error) => {
            return Err(AppError::Internal(format!(
                "failed to read wizard state '{}': {error}",
                path.display()
            )));
        }
    };

    match serde_json::from_slice::<Value>(&contents) {
        Ok(Value::Object(object)) => Ok(StateDocument::from_object(path, object)),
        Ok(_) => {
            warn!(
                path = %path.display(),
                "wizard state is not a JSON object, starting from empty state"
            );
            Ok(StateDocument::default())
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "wizard state is malformed, starting from empty state"
            );
            Ok(StateDocument::default())
        }
    }
}

fn take_slot<T>(
    path: &Path,
    object: &mut Map<String, Value>,
    slot: &str,
    decode: impl FnOnce(Value) -> Option<T>,
) -> Option<T> {
    let value = object.remove(slot)?;
    let decoded = decode(value);
    if decoded.is_none() {
        warn!(path = %path.display(), slot, "ignoring malformed wizard state slot");
    }

    decoded
}

async fn write_document(path: &Path, document: &StateDocument) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create wizard state directory '{}': {error}",
                parent.display()
            ))
        })?;
    }

    let contents = serde_json::to_vec_pretty(document).map_err(|error| {
        AppError::Internal(format!("failed to encode wizard state: {error}"))
    })?;

    let mut temporary = path.as_os_str().to_owned();
    temporary.push(".tmp");
    let temporary = PathBuf::from(temporary);

    tokio::fs::write(&temporary, contents).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to write wizard state '{}': {error}",
            temporary.display()
        ))
    })?;
    tokio::fs::rename(&temporary, path).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to replace wizard state '{}': {error}",
            path.display()
        ))
    })
}
