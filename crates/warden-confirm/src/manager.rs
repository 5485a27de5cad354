//! The confirmation manager: create, poll, and resolve requests.

use std::fs;
use std::path::{Path, PathBuf};

use warden_core::ConfirmationId;

use crate::error::{ConfirmError, ConfirmResult};
use crate::request::{ConfirmationRequest, ConfirmationStatus};

/// Manages confirmation requests backed by one JSON file each.
///
/// All state lives in the backing directory: `check` and `list_pending`
/// re-read the files on every call, so decisions made by another process
/// (or by a human editing the file) are picked up on the next poll, and a
/// restarted manager recovers every pending request.
#[derive(Debug)]
pub struct ConfirmationManager {
    dir: PathBuf,
}

impl ConfirmationManager {
    /// Create a manager over `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmError::Storage`] when the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> ConfirmResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create and persist a new pending request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmError::Storage`] when the backing file cannot be
    /// written; no request exists in that case.
    pub fn create(
        &self,
        action: impl Into<String>,
        reason: impl Into<String>,
    ) -> ConfirmResult<ConfirmationRequest> {
        let mut request = ConfirmationRequest::new(action, reason);
        request.path = self.path_for(&request.id);
        self.write_atomic(&request)?;
        tracing::info!(id = %request.id, action = %request.action, "confirmation created");
        Ok(request)
    }

    /// Re-read the current state of a request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmError::UnknownRequest`] when no readable, well-formed
    /// backing file exists for this id.
    pub fn check(&self, id: &ConfirmationId) -> ConfirmResult<ConfirmationRequest> {
        self.load(id)
    }

    /// Transition a pending request to `Approved`.
    ///
    /// # Errors
    ///
    /// [`ConfirmError::UnknownRequest`] for an unknown id,
    /// [`ConfirmError::AlreadyResolved`] when the request is not pending,
    /// [`ConfirmError::Storage`] when the rewrite fails (previous state kept).
    pub fn approve(&self, id: &ConfirmationId) -> ConfirmResult<ConfirmationRequest> {
        self.resolve(id, ConfirmationStatus::Approved)
    }

    /// Transition a pending request to `Denied`.
    ///
    /// # Errors
    ///
    /// Same contract as [`approve`](Self::approve).
    pub fn deny(&self, id: &ConfirmationId) -> ConfirmResult<ConfirmationRequest> {
        self.resolve(id, ConfirmationStatus::Denied)
    }

    /// Every request currently in `Pending` state.
    ///
    /// Unreadable or malformed files are skipped (with a warning), never
    /// fatal — one corrupted side-file must not hide the rest.
    #[must_use]
    pub fn list_pending(&self) -> Vec<ConfirmationRequest> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut pending: Vec<ConfirmationRequest> = entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|e| match Self::read_file(&e.path()) {
                Ok(request) => Some(request),
                Err(err) => {
                    tracing::warn!(path = %e.path().display(), "skipping unreadable confirmation: {err}");
                    None
                },
            })
            .filter(ConfirmationRequest::is_pending)
            .collect();
        pending.sort_by_key(|r| r.created_at);
        pending
    }

    fn resolve(
        &self,
        id: &ConfirmationId,
        status: ConfirmationStatus,
    ) -> ConfirmResult<ConfirmationRequest> {
        let mut request = self.load(id)?;
        if request.status.is_terminal() {
            return Err(ConfirmError::AlreadyResolved {
                id: id.to_string(),
                status: request.status,
            });
        }
        request.status = status;
        request.resolved_at = Some(warden_core::Timestamp::now());
        self.write_atomic(&request)?;
        tracing::info!(id = %request.id, %status, "confirmation resolved");
        Ok(request)
    }

    fn load(&self, id: &ConfirmationId) -> ConfirmResult<ConfirmationRequest> {
        let path = self.path_for(id);
        Self::read_file(&path).map_err(|_| ConfirmError::UnknownRequest { id: id.to_string() })
    }

    fn read_file(path: &Path) -> std::io::Result<ConfirmationRequest> {
        let raw = fs::read_to_string(path)?;
        let mut request: ConfirmationRequest = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        request.path = path.to_path_buf();
        Ok(request)
    }

    /// Write the record to a sibling temp file, then rename into place, so a
    /// failed write never leaves a half-written record where a good one was.
    fn write_atomic(&self, request: &ConfirmationRequest) -> ConfirmResult<()> {
        let json = serde_json::to_string_pretty(request)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp = request.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &request.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn path_for(&self, id: &ConfirmationId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, ConfirmationManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfirmationManager::new(dir.path().join("confirmations")).unwrap();
        (dir, manager)
    }

    // -----------------------------------------------------------------------
    // Create / check
    // -----------------------------------------------------------------------

    #[test]
    fn test_create_persists_and_returns_path() {
        let (_dir, manager) = manager();
        let request = manager.create("file.delete", "removes build artifacts").unwrap();

        assert!(request.path.exists());
        assert!(request.is_pending());

        let checked = manager.check(&request.id).unwrap();
        assert_eq!(checked.action, "file.delete");
        assert_eq!(checked.status, ConfirmationStatus::Pending);
        assert!(checked.resolved_at.is_none());
    }

    #[test]
    fn test_check_unknown_id_fails() {
        let (_dir, manager) = manager();
        let err = manager.check(&warden_core::ConfirmationId::new()).unwrap_err();
        assert!(matches!(err, ConfirmError::UnknownRequest { .. }));
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    #[test]
    fn test_approve_stamps_resolution() {
        let (_dir, manager) = manager();
        let request = manager.create("shell.run", "runs rm on cache dir").unwrap();

        manager.approve(&request.id).unwrap();

        let checked = manager.check(&request.id).unwrap();
        assert_eq!(checked.status, ConfirmationStatus::Approved);
        assert!(checked.resolved_at.is_some());
    }

    #[test]
    fn test_deny_is_terminal() {
        let (_dir, manager) = manager();
        let request = manager.create("process.kill", "kills the editor").unwrap();

        manager.deny(&request.id).unwrap();

        let err = manager.approve(&request.id).unwrap_err();
        assert!(matches!(
            err,
            ConfirmError::AlreadyResolved {
                status: ConfirmationStatus::Denied,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_unknown_id_fails() {
        let (_dir, manager) = manager();
        let unknown = warden_core::ConfirmationId::new();
        assert!(matches!(
            manager.approve(&unknown).unwrap_err(),
            ConfirmError::UnknownRequest { .. }
        ));
        assert!(matches!(
            manager.deny(&unknown).unwrap_err(),
            ConfirmError::UnknownRequest { .. }
        ));
    }

    // -----------------------------------------------------------------------
    // Listing and recovery
    // -----------------------------------------------------------------------

    #[test]
    fn test_list_pending_excludes_resolved() {
        let (_dir, manager) = manager();
        let first = manager.create("a.b", "first").unwrap();
        let _second = manager.create("c.d", "second").unwrap();
        manager.approve(&first.id).unwrap();

        let pending = manager.list_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].action, "c.d");
    }

    #[test]
    fn test_pending_requests_survive_restart() {
        let (_dir, manager) = manager();
        let request = manager.create("file.delete", "out-of-band approval").unwrap();

        // A fresh manager over the same directory sees the same state.
        let reopened = ConfirmationManager::new(manager.dir()).unwrap();
        let pending = reopened.list_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, request.id);

        // And resolution by the second manager is visible to the first.
        reopened.approve(&request.id).unwrap();
        assert_eq!(
            manager.check(&request.id).unwrap().status,
            ConfirmationStatus::Approved
        );
    }

    #[test]
    fn test_corrupt_file_reads_as_unknown() {
        let (_dir, manager) = manager();
        let request = manager.create("a.b", "will be corrupted").unwrap();
        std::fs::write(&request.path, "{not json").unwrap();

        assert!(matches!(
            manager.check(&request.id).unwrap_err(),
            ConfirmError::UnknownRequest { .. }
        ));
        // And it cannot be resolved either.
        assert!(matches!(
            manager.approve(&request.id).unwrap_err(),
            ConfirmError::UnknownRequest { .. }
        ));
        // Corrupt files never poison the listing.
        assert!(manager.list_pending().is_empty());
    }

    #[test]
    fn test_externally_deleted_file_reads_as_unknown() {
        let (_dir, manager) = manager();
        let request = manager.create("a.b", "will be deleted").unwrap();
        std::fs::remove_file(&request.path).unwrap();

        assert!(matches!(
            manager.check(&request.id).unwrap_err(),
            ConfirmError::UnknownRequest { .. }
        ));
    }
}
