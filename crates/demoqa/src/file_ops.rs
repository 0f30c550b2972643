//! Upload fixtures and download checks.

use crate::result::{SuiteError, SuiteResult};
use crate::wait::{wait_until, WaitOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text fixture uploaded on the Elements page
pub const TEXT_FIXTURE: &str = "test_txt.txt";

/// Image fixture uploaded on the practice form
pub const IMAGE_FIXTURE: &str = "test_img.png";

/// Poll interval while waiting for a download
const DOWNLOAD_POLL_MS: u64 = 500;

const TEXT_FIXTURE_CONTENT: &str = "demoqa upload fixture\n";

/// 1x1 transparent PNG
const IMAGE_FIXTURE_BYTES: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// The fixtures directory: upload sources and download target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    dir: PathBuf,
}

impl Fixtures {
    /// Use `dir` as the fixtures directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a named fixture
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// `test_txt.txt`
    #[must_use]
    pub fn text_file(&self) -> PathBuf {
        self.path(TEXT_FIXTURE)
    }

    /// `test_img.png`
    #[must_use]
    pub fn image_file(&self) -> PathBuf {
        self.path(IMAGE_FIXTURE)
    }

    /// Create the directory and any missing default fixture
    pub fn ensure_defaults(&self) -> SuiteResult<()> {
        ensure_dir(&self.dir)?;
        let text = self.text_file();
        if !text.exists() {
            std::fs::write(&text, TEXT_FIXTURE_CONTENT)?;
        }
        let image = self.image_file();
        if !image.exists() {
            std::fs::write(&image, IMAGE_FIXTURE_BYTES)?;
        }
        Ok(())
    }

    /// Upload input for a named fixture
    pub fn input(&self, name: &str) -> SuiteResult<FileInput> {
        FileInput::from_path(self.path(name))
    }
}

/// A file handed to an `<input type="file">`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInput {
    /// File name
    pub name: String,
    /// MIME type
    pub mime_type: String,
    /// Absolute path
    pub path: PathBuf,
}

impl FileInput {
    /// Resolve a file on disk; the browser needs an absolute path
    pub fn from_path(path: impl AsRef<Path>) -> SuiteResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SuiteError::fixture(format!(
                "upload file {} does not exist",
                path.display()
            )));
        }
        let path = std::fs::canonicalize(path)?;
        let name = path
            .file_name()
            .map_or_else(|| "unknown".to_string(), |n| n.to_string_lossy().to_string());
        let mime_type = guess_mime_type(&name);
        Ok(Self {
            name,
            mime_type,
            path,
        })
    }

    /// Path as a string for CDP
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Wait until `path` exists with non-zero size.
///
/// Times out with `Expected file <name> to be downloaded`.
pub async fn wait_for_download(path: impl AsRef<Path>, timeout_ms: u64) -> SuiteResult<PathBuf> {
    let path = path.as_ref().to_path_buf();
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
    let options = WaitOptions::new()
        .with_timeout(timeout_ms)
        .with_poll_interval(DOWNLOAD_POLL_MS)
        .with_message(format!("Expected file {name} to be downloaded"));

    let target = path.clone();
    wait_until(&options, move || {
        let target = target.clone();
        async move {
            Ok(tokio::fs::metadata(&target)
                .await
                .map(|m| m.is_file() && m.len() > 0)
                .unwrap_or(false))
        }
    })
    .await?;
    tracing::info!(file = %path.display(), "download complete");
    Ok(path)
}

/// Whether a file exists
#[must_use]
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Delete a file if present; returns whether something was deleted
pub fn delete_file_if_exists(path: impl AsRef<Path>) -> SuiteResult<bool> {
    let path = path.as_ref();
    if path.is_file() {
        std::fs::remove_file(path)?;
        tracing::debug!(file = %path.display(), "deleted");
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Create a directory and its parents
pub fn ensure_dir(path: impl AsRef<Path>) -> SuiteResult<()> {
    std::fs::create_dir_all(path.as_ref())?;
    Ok(())
}

/// Guess MIME type from filename
#[must_use]
pub fn guess_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
