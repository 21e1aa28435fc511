use std::path::Path;

use stepform_core::{AppError, AppResult};
use stepform_domain::FileUpload;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: [(&str, &str); 8] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
];

/// Guesses a MIME type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(|extension| {
            CONTENT_TYPES
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(extension))
        })
        .map_or(FALLBACK_CONTENT_TYPE, |(_, content_type)| content_type)
}

/// Splits a comma separated list of paths, dropping blanks.
pub fn split_paths(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .collect()
}

/// Reads a file from disk into an upload.
pub async fn read_upload(path: &Path) -> AppResult<FileUpload> {
    let bytes = tokio::fs::read(path).await.map_err(|error| {
        AppError::Validation(format!("failed to read '{}': {error}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AppError::Validation(format!("'{}' has no usable file name", path.display()))
        })?;

    FileUpload::new(file_name, content_type_for(path), bytes)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use stepform_core::AppError;

    use super::{content_type_for, read_upload, split_paths};

    #[test]
    fn content_type_follows_the_extension() {
        assert_eq!(content_type_for(Path::new("face.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a/b/profile.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("profile.jpg")), "image/jpeg");
        assert_eq!(
            content_type_for(Path::new("archive.tar.gz")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn paths_are_split_on_commas() {
        assert_eq!(
            split_paths(" one.png, ,two.jpg ,"),
            vec!["one.png", "two.jpg"]
        );
        assert!(split_paths("   ").is_empty());
    }

    #[tokio::test]
    async fn uploads_carry_name_type_and_bytes() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let path = directory.path().join("face.png");
        std::fs::write(&path, [137, 80, 78, 71]).unwrap_or_else(|_| unreachable!());

        let upload = read_upload(&path).await.unwrap_or_else(|_| unreachable!());
        assert_eq!(upload.file_name(), "face.png");
        assert_eq!(upload.content_type(), "image/png");
        assert_eq!(upload.bytes(), &[137, 80, 78, 71]);
    }

    #[tokio::test]
    async fn missing_files_are_reported() {
        let directory = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let result = read_upload(&directory.path().join("missing.png")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
