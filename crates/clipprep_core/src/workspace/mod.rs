//! Per-invocation workspace directories.
//!
//! Every pipeline invocation gets its own uniquely named directory under
//! the configured root. All artifacts for that invocation live inside it,
//! and nothing outside the owning invocation renames or deletes files
//! there.
//!
//! Creation is the one unrecoverable failure of the pipeline. Destruction
//! is best-effort: errors are logged and swallowed, and destroying an
//! already-removed workspace is a no-op.

mod input;

pub use input::{
    sanitize_extension, MediaInput, DEFAULT_EXTENSION, INPUT_STEM, MAX_EXTENSION_LEN,
};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Prefix for workspace directory names.
pub const WORKSPACE_PREFIX: &str = "clipprep-";

/// Errors that can occur while allocating a workspace.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// The root directory could not be created.
    #[error("Failed to create workspace root {path}: {source}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No unique directory could be allocated under the root.
    #[error("Failed to allocate workspace under {root}: {source}")]
    Allocate {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Exclusively owned workspace directory for one invocation.
///
/// Dropping the handle does not delete the directory; the owner must call
/// [`destroy`](WorkspaceHandle::destroy). A handle that is never destroyed
/// leaks its directory. Inside the pipeline the handle is wrapped in a
/// guard until it is returned to the caller.
#[derive(Debug)]
pub struct WorkspaceHandle {
    path: PathBuf,
}

impl WorkspaceHandle {
    /// Allocate a new unique workspace under `root`.
    ///
    /// The root is created if missing. Uniqueness comes from the
    /// filesystem itself (exclusive `mkdir` with a random suffix), so
    /// concurrent invocations sharing a root never collide.
    pub fn create(root: &Path) -> WorkspaceResult<Self> {
        std::fs::create_dir_all(root).map_err(|source| WorkspaceError::CreateRoot {
            path: root.to_path_buf(),
            source,
        })?;

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(root)
            .map_err(|source| WorkspaceError::Allocate {
                root: root.to_path_buf(),
                source,
            })?;

        // Detach from tempfile's drop-cleanup; destruction is explicit
        let path = dir.keep();

        tracing::debug!("Created workspace {}", path.display());

        Ok(Self { path })
    }

    /// Workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Whether the directory still exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Recursively remove the workspace and everything in it.
    ///
    /// Never fails: a missing directory is a silent no-op and any other
    /// error is logged and discarded.
    pub async fn destroy(&self) {
        log_removal(&self.path, tokio::fs::remove_dir_all(&self.path).await);
    }

    /// Blocking variant of [`destroy`](WorkspaceHandle::destroy), for drop paths.
    pub fn destroy_blocking(&self) {
        log_removal(&self.path, std::fs::remove_dir_all(&self.path));
    }
}

fn log_removal(path: &Path, result: io::Result<()>) {
    match result {
        Ok(()) => {
            tracing::debug!("Removed workspace {}", path.display());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Workspace {} already removed", path.display());
        }
        Err(e) => {
            tracing::warn!("Failed to remove workspace {}: {}", path.display(), e);
        }
    }
}

/// Removes a workspace on drop unless disarmed.
///
/// Held by the orchestrator while an invocation is in flight, so a caller
/// that abandons `process_video` (timeout, task abort) does not leak the
/// directory. Handing the workspace to the caller goes through
/// [`disarm`](WorkspaceGuard::disarm).
pub(crate) struct WorkspaceGuard {
    handle: WorkspaceHandle,
    armed: bool,
}

impl WorkspaceGuard {
    pub(crate) fn new(handle: WorkspaceHandle) -> Self {
        Self {
            handle,
            armed: true,
        }
    }

    pub(crate) fn handle(&self) -> &WorkspaceHandle {
        &self.handle
    }

    /// Release ownership without removing anything.
    pub(crate) fn disarm(mut self) -> WorkspaceHandle {
        self.armed = false;
        WorkspaceHandle {
            path: std::mem::take(&mut self.handle.path),
        }
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                "Invocation abandoned, removing workspace {}",
                self.handle.path().display()
            );
            self.handle.destroy_blocking();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_makes_prefixed_directory() {
        let root = tempdir().unwrap();
        let ws = WorkspaceHandle::create(root.path()).unwrap();

        assert!(ws.exists());
        assert!(ws.path().starts_with(root.path()));
        let name = ws.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(WORKSPACE_PREFIX));

        ws.destroy().await;
    }

    #[test]
    fn create_builds_missing_root() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let ws = WorkspaceHandle::create(&nested).unwrap();
        assert!(ws.path().starts_with(&nested));
    }

    #[test]
    fn drop_does_not_delete() {
        let root = tempdir().unwrap();
        let path = {
            let ws = WorkspaceHandle::create(root.path()).unwrap();
            ws.path().to_path_buf()
        };
        assert!(path.exists());
    }

    #[test]
    fn workspaces_are_unique() {
        let root = tempdir().unwrap();
        let a = WorkspaceHandle::create(root.path()).unwrap();
        let b = WorkspaceHandle::create(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn concurrent_creates_never_share_a_path() {
        let root = tempdir().unwrap();
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let root = root.path().to_path_buf();
            tasks.push(tokio::spawn(async move {
                WorkspaceHandle::create(&root).unwrap().path().to_path_buf()
            }));
        }

        let mut paths = Vec::new();
        for task in tasks {
            paths.push(task.await.unwrap());
        }
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 16);
    }

    #[cfg(unix)]
    #[test]
    fn create_fails_when_root_is_a_file() {
        let root = tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let err = WorkspaceHandle::create(&file).unwrap_err();
        assert!(matches!(err, WorkspaceError::CreateRoot { .. }));
    }

    #[test]
    fn guard_removes_workspace_on_drop() {
        let root = tempdir().unwrap();
        let guard = WorkspaceGuard::new(WorkspaceHandle::create(root.path()).unwrap());
        std::fs::write(guard.handle().file("input.mp4"), b"data").unwrap();
        let path = guard.handle().path().to_path_buf();

        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn disarmed_guard_leaves_workspace_alone() {
        let root = tempdir().unwrap();
        let guard = WorkspaceGuard::new(WorkspaceHandle::create(root.path()).unwrap());

        let ws = guard.disarm();
        assert!(ws.exists());
        ws.destroy_blocking();
        assert!(!ws.exists());
    }

    #[tokio::test]
    async fn destroy_removes_contents_and_is_idempotent() {
        let root = tempdir().unwrap();
        let ws = WorkspaceHandle::create(root.path()).unwrap();
        std::fs::write(ws.file("input.mp4"), b"data").unwrap();
        std::fs::create_dir(ws.file("nested")).unwrap();
        std::fs::write(ws.path().join("nested").join("frame_1.jpg"), b"jpg").unwrap();

        ws.destroy().await;
        assert!(!ws.exists());

        ws.destroy().await;
        assert!(!ws.exists());
    }
}
