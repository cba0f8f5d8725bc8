//! Artifact staging
//!
//! Each submitted archive is extracted into its own uniquely named directory
//! under the staging root. The directory is served over HTTP (so runner
//! browser sessions can load the benchmark entry page) and owned by the
//! manager until the job reaches a terminal status or is purged, at which
//! point it is deleted.

use std::io;
use std::path::{Path, PathBuf};

use benchgrid_core::archive;
use benchgrid_core::domain::job::JobId;

/// Extracts `bytes` into a fresh per-job directory under `root`
///
/// The directory is named after the job id, which is also the path segment
/// the artifact routes serve it under.
pub fn stage(bytes: &[u8], root: &Path, id: JobId) -> io::Result<PathBuf> {
    let dir = root.join(id.to_string());
    if let Err(e) = archive::unpack(bytes, &dir) {
        // don't leave a half-extracted tree behind
        let _ = std::fs::remove_dir_all(&dir);
        return Err(e);
    }
    Ok(dir)
}

/// Best-effort removal of a staged directory
///
/// Returns the error instead of propagating so callers can log and move on;
/// a leaked directory is not worth failing a completion over.
pub fn remove(dir: &Path) -> io::Result<()> {
    std::fs::remove_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_archive() -> Vec<u8> {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("index.html"), b"<html></html>").unwrap();
        fs::create_dir(source.path().join("js")).unwrap();
        fs::write(source.path().join("js/bench.js"), b"run();").unwrap();
        archive::pack(source.path()).unwrap()
    }

    #[test]
    fn test_stage_names_directory_after_job() {
        let root = tempfile::tempdir().unwrap();
        let id = JobId::random();

        let dir = stage(&sample_archive(), root.path(), id).unwrap();

        assert_eq!(dir, root.path().join(id.to_string()));
        assert!(dir.join("index.html").is_file());
        assert!(dir.join("js/bench.js").is_file());
    }

    #[test]
    fn test_stage_rejects_corrupt_archive() {
        let root = tempfile::tempdir().unwrap();
        let result = stage(b"definitely not a zip", root.path(), JobId::random());
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_deletes_tree() {
        let root = tempfile::tempdir().unwrap();
        let dir = stage(&sample_archive(), root.path(), JobId::random()).unwrap();

        remove(&dir).unwrap();
        assert!(!dir.exists());
    }
}
