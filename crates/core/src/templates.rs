//! On-disk store for the proposal document template.
//!
//! The directory holds two files: an administrator-uploaded custom template
//! and a shipped default. Downloads prefer the custom file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// File name of the uploaded template.
pub const CUSTOM_TEMPLATE_FILE: &str = "proposal_template.docx";

/// File name of the shipped fallback template.
pub const DEFAULT_TEMPLATE_FILE: &str = "proposal_template_default.docx";

/// MIME type of Word documents.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// `.docx` files are ZIP containers.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Check that an uploaded file name ends in `.docx` (any case).
pub fn validate_template_file_name(file_name: &str) -> Result<(), CoreError> {
    let is_docx = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
    if !is_docx {
        return Err(CoreError::Validation(
            "File must be a .docx document".into(),
        ));
    }
    Ok(())
}

/// Check that uploaded bytes look like a `.docx` container.
pub fn validate_template_content(data: &[u8]) -> Result<(), CoreError> {
    if !data.starts_with(ZIP_MAGIC) {
        return Err(CoreError::Validation(
            "File content is not a valid .docx document".into(),
        ));
    }
    Ok(())
}

/// Template files rooted at a single directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn custom_path(&self) -> PathBuf {
        self.dir.join(CUSTOM_TEMPLATE_FILE)
    }

    pub fn default_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_TEMPLATE_FILE)
    }

    /// Path of the template to serve: the custom file if present, else the
    /// default. Fails when neither exists.
    pub async fn resolve(&self) -> Result<PathBuf, CoreError> {
        for path in [self.custom_path(), self.default_path()] {
            if tokio::fs::try_exists(&path).await.map_err(io_error)? {
                return Ok(path);
            }
        }
        Err(CoreError::Internal(format!(
            "No proposal template found in {}",
            self.dir.display()
        )))
    }

    /// Replace the custom template with `data`.
    ///
    /// Each call stages into its own temp file in the template directory and
    /// renames it into place, so downloads and concurrent uploads only ever
    /// see a complete document. A failed write removes its staging file.
    pub async fn store_custom(&self, data: &[u8]) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_error)?;

        let dir = self.dir.clone();
        let target = self.custom_path();
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = tempfile::Builder::new()
                .prefix(".proposal_template")
                .suffix(".upload")
                .tempfile_in(&dir)?;
            staging.write_all(&data)?;
            staging.as_file().sync_all()?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| CoreError::Internal(format!("Template upload task failed: {e}")))?
        .map_err(io_error)
    }

    /// Discard the custom template and restore a copy of the default.
    pub async fn reset(&self) -> Result<(), CoreError> {
        let default = self.default_path();
        if !tokio::fs::try_exists(&default).await.map_err(io_error)? {
            return Err(CoreError::Internal(format!(
                "Default template {} is missing",
                default.display()
            )));
        }

        match tokio::fs::remove_file(self.custom_path()).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(e)),
        }

        tokio::fs::copy(&default, self.custom_path())
            .await
            .map_err(io_error)?;
        Ok(())
    }
}

fn io_error(e: std::io::Error) -> CoreError {
    CoreError::Internal(format!("Template storage error: {e}"))
}
