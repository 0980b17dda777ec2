//! The uploaded media as written into a workspace.

use std::io;
use std::path::{Path, PathBuf};

use super::WorkspaceHandle;

/// Extension used when the original filename has no usable one.
pub const DEFAULT_EXTENSION: &str = ".mp4";

/// File stem of the input copy inside the workspace.
pub const INPUT_STEM: &str = "input";

/// Longest sanitized extension kept, leading dot included.
pub const MAX_EXTENSION_LEN: usize = 16;

/// Reduce a filename's extension to ASCII alphanumerics and dots.
///
/// Returns the extension including its leading dot, or
/// [`DEFAULT_EXTENSION`] when nothing usable remains or the result is
/// longer than [`MAX_EXTENSION_LEN`].
pub fn sanitize_extension(original_filename: &str) -> String {
    // Only the final path component counts; a dot in a directory name is not an extension
    let name = original_filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_filename);

    let raw = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    };

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();

    if cleaned.trim_matches('.').is_empty() || cleaned.len() > MAX_EXTENSION_LEN {
        DEFAULT_EXTENSION.to_string()
    } else {
        cleaned
    }
}

/// The original upload, written once to a fixed path in the workspace.
#[derive(Debug, Clone)]
pub struct MediaInput {
    path: PathBuf,
    extension: String,
    size: u64,
}

impl MediaInput {
    /// Write `bytes` to `input<ext>` inside the workspace.
    pub async fn write(
        workspace: &WorkspaceHandle,
        bytes: &[u8],
        original_filename: &str,
    ) -> io::Result<Self> {
        let extension = sanitize_extension(original_filename);
        let path = Self::path_in(workspace, original_filename);

        tokio::fs::write(&path, bytes).await?;

        Ok(Self {
            path,
            extension,
            size: bytes.len() as u64,
        })
    }

    /// Where the input for `original_filename` lives inside a workspace.
    pub fn path_in(workspace: &WorkspaceHandle, original_filename: &str) -> PathBuf {
        workspace.file(&format!("{}{}", INPUT_STEM, sanitize_extension(original_filename)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn keeps_clean_extension() {
        assert_eq!(sanitize_extension("clip.mov"), ".mov");
        assert_eq!(sanitize_extension("holiday.2024.MP4"), ".MP4");
    }

    #[test]
    fn strips_unsafe_characters() {
        assert_eq!(sanitize_extension("evil.m$p4"), ".mp4");
        assert_eq!(sanitize_extension("clip.w e/bm"), ".mp4");
        assert_eq!(sanitize_extension("x.we bm"), ".webm");
    }

    #[test]
    fn defaults_when_empty() {
        assert_eq!(sanitize_extension("noextension"), DEFAULT_EXTENSION);
        assert_eq!(sanitize_extension(""), DEFAULT_EXTENSION);
        assert_eq!(sanitize_extension("trailing."), DEFAULT_EXTENSION);
        assert_eq!(sanitize_extension(".hidden"), DEFAULT_EXTENSION);
        assert_eq!(sanitize_extension("clip.$%&"), DEFAULT_EXTENSION);
    }

    #[test]
    fn defaults_when_too_long() {
        let at_limit = format!("clip.{}", "a".repeat(MAX_EXTENSION_LEN - 1));
        assert_eq!(sanitize_extension(&at_limit).len(), MAX_EXTENSION_LEN);

        let over_limit = format!("clip.{}", "a".repeat(MAX_EXTENSION_LEN));
        assert_eq!(sanitize_extension(&over_limit), DEFAULT_EXTENSION);
        assert_eq!(sanitize_extension(&format!("clip.{}", "a".repeat(300))), DEFAULT_EXTENSION);
    }

    #[test]
    fn ignores_directory_dots() {
        assert_eq!(sanitize_extension("dir.v2/video"), DEFAULT_EXTENSION);
        assert_eq!(sanitize_extension("C:\\up.loads\\clip.mkv"), ".mkv");
    }

    #[tokio::test]
    async fn write_places_input_in_workspace() {
        let root = tempdir().unwrap();
        let ws = WorkspaceHandle::create(root.path()).unwrap();

        let input = MediaInput::write(&ws, b"fake video", "upload.webm").await.unwrap();

        assert_eq!(input.path(), ws.file("input.webm"));
        assert_eq!(input.extension(), ".webm");
        assert_eq!(input.size(), 10);
        assert_eq!(std::fs::read(input.path()).unwrap(), b"fake video");

        ws.destroy().await;
    }
}
