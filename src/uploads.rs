// ABOUTME: Image upload handling for gallery items and team portraits
// ABOUTME: Reads multipart forms, checks image types, writes files to disk and removes replaced ones

use axum::body::Bytes;
use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Gallery,
    Team,
}

impl UploadKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            UploadKind::Gallery => "gallery",
            UploadKind::Team => "team",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn check_image_type(&self) -> Result<()> {
        match self.content_type.as_deref() {
            Some(content_type) if ALLOWED_IMAGE_TYPES.contains(&content_type) => Ok(()),
            _ => Err(AppError::BadRequest(INVALID_FILE_TYPE.to_string())),
        }
    }

    /// Extension of the original file name including the dot, or empty.
    fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default()
    }
}

/// Files on disk under the upload root, served publicly as `/gallery/…` and `/team/…`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: UploadKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for kind in [UploadKind::Gallery, UploadKind::Team] {
            tokio::fs::create_dir_all(self.dir(kind)).await?;
        }
        Ok(())
    }

    /// Writes the file and returns its public path.
    pub async fn save(&self, kind: UploadKind, file: &UploadedFile) -> Result<String> {
        file.check_image_type()?;

        let file_name = format!("{}{}", Uuid::new_v4(), file.extension());
        let dir = self.dir(kind);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &file.bytes)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save upload {}: {}", file_name, e);
                AppError::Internal("Failed to save file".to_string())
            })?;

        tracing::info!("Saved {} upload {} ({} bytes)", kind.dir_name(), file_name, file.bytes.len());
        Ok(format!("/{}/{}", kind.dir_name(), file_name))
    }

    /// Maps a public image path back to a file under the upload root.
    pub fn local_path(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path.trim_start_matches('/');
        let relative = relative.strip_prefix("uploads/").unwrap_or(relative);
        let (dir, name) = relative.split_once('/')?;

        let kind = match dir {
            "gallery" => UploadKind::Gallery,
            "team" => UploadKind::Team,
            _ => return None,
        };
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.dir(kind).join(name))
    }

    /// Deletes an uploaded image; external URLs and missing files are left alone.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.local_path(public_path) else {
            tracing::debug!("Not removing {}: not an uploaded file", public_path);
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!("Deleted image file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Image file not found for deletion: {}", path.display())
            }
            Err(e) => tracing::error!("Error deleting image file {}: {}", path.display(), e),
        }
    }
}

/// Text fields and the optional `file` part of a multipart submission.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "file" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid file upload: {}", e)))?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty()) {
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid form field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn from_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    /// The raw value, including empty strings.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// The value, treating blank strings as absent.
    pub fn non_blank(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }

    pub fn required(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| AppError::invalid(name, "field required"))
    }

    pub fn integer(&self, name: &str) -> Result<Option<i64>> {
        match self.non_blank(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AppError::invalid(name, "value is not a valid integer")),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<Option<bool>> {
        match self.non_blank(name) {
            None => Ok(None),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(AppError::invalid(name, "value could not be parsed to a boolean")),
            },
        }
    }
}
