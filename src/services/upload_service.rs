use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::{
    errors::{AppError, AppResult},
    models::dto::response::UploadResponse,
};

static UPLOAD_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{64}\.(png|jpg|gif|webp|mp3|mp4)$")
        .expect("UPLOAD_NAME_REGEX is a valid regex pattern")
});

/// Content-addressed media storage on the local filesystem.
pub struct UploadService {
    upload_dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(upload_dir: impl Into<PathBuf>, public_base_url: &str, max_bytes: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store `bytes` as `<sha256>.<ext>`. Uploading the same file twice yields the same name.
    pub async fn store(&self, content_type: &str, bytes: &[u8]) -> AppResult<UploadResponse> {
        let extension = extension_for(content_type).ok_or_else(|| {
            AppError::ValidationError(format!("Unsupported content type '{}'", content_type))
        })?;
        if bytes.is_empty() {
            return Err(AppError::ValidationError("Upload body is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::ValidationError(format!(
                "Upload exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let file_name = format!("{:x}.{}", Sha256::digest(bytes), extension);
        let path = self.upload_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        if tokio::fs::metadata(&path).await.is_err() {
            tokio::fs::write(&path, bytes).await?;
            log::info!("stored upload {} ({} bytes)", file_name, bytes.len());
        }

        Ok(UploadResponse {
            url: format!("{}/uploads/{}", self.public_base_url, file_name),
            file_name,
            size: bytes.len(),
        })
    }

    /// Read a stored file back together with its content type.
    pub async fn read(&self, file_name: &str) -> AppResult<(Vec<u8>, &'static str)> {
        if !UPLOAD_NAME_REGEX.is_match(file_name) {
            return Err(AppError::ValidationError(format!(
                "Invalid upload name '{}'",
                file_name
            )));
        }

        let content_type = file_name
            .rsplit('.')
            .next()
            .and_then(content_type_for)
            .ok_or_else(|| AppError::ValidationError("Unknown file extension".to_string()))?;

        match tokio::fs::read(self.upload_dir.join(file_name)).await {
            Ok(bytes) => Ok((bytes, content_type)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                format!("Upload '{}' not found", file_name),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match mime.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "video/mp4" => Some("mp4"),
        _ => None,
    }
}

fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "mp3" => Some("audio/mpeg"),
        "mp4" => Some("video/mp4"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &tempfile::TempDir) -> UploadService {
        UploadService::new(dir.path(), "http://localhost:8080/", 16)
    }

    #[tokio::test]
    async fn store_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let first = service.store("image/png", b"png-bytes").await.unwrap();
        let second = service.store("image/png; charset=binary", b"png-bytes").await.unwrap();

        assert_eq!(first.file_name, second.file_name);
        assert!(first.file_name.ends_with(".png"));
        assert_eq!(first.file_name.len(), 64 + 4);
        assert_eq!(
            first.url,
            format!("http://localhost:8080/uploads/{}", first.file_name)
        );

        let (bytes, content_type) = service.read(&first.file_name).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn store_rejects_unknown_type_and_oversized_body() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        assert!(matches!(
            service.store("text/html", b"<p>").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.store("image/gif", &[0u8; 17]).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn read_guards_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        assert!(matches!(
            service.read("../etc/passwd").await,
            Err(AppError::ValidationError(_))
        ));

        let missing = format!("{}.mp3", "a".repeat(64));
        assert!(matches!(service.read(&missing).await, Err(AppError::NotFound(_))));
    }
}
