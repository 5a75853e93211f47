//! Output directory setup and atomic file writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem failure tied to the path it happened on.
#[derive(Debug, thiserror::Error)]
#[error("{op} {}: {source}", path.display())]
pub struct FilesystemError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FilesystemError {
    pub fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}

/// Creates `path` and any missing ancestors. Succeeds if it already exists as a directory.
pub fn ensure_dir(path: &Path) -> Result<(), FilesystemError> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(FilesystemError::new("create dir", path, e)),
    }
}

/// Path for the temp file: appends `.part` to the final path (e.g. `page.html` → `page.html.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

/// Writes `data` to `<path>.part` and renames it over `path`, so readers never
/// see a half-written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), FilesystemError> {
    let tmp = temp_path(path);
    fs::write(&tmp, data).map_err(|e| FilesystemError::new("write", &tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(FilesystemError::new("rename", path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("assets");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn ensure_dir_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("docs");
        fs::write(&file, b"not a dir").unwrap();
        let err = ensure_dir(&file.join("assets")).unwrap_err();
        assert_eq!(err.op, "create dir");
    }

    #[test]
    fn ensure_dir_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("docs");
        fs::write(&file, b"x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("page.html"));
        assert_eq!(p.to_string_lossy(), "page.html.part");
        let p2 = temp_path(Path::new("/tmp/assets/deck.pptx"));
        assert_eq!(p2.to_string_lossy(), "/tmp/assets/deck.pptx.part");
    }

    #[test]
    fn write_atomic_replaces_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn write_atomic_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bin");
        let err = write_atomic(&path, b"x").unwrap_err();
        assert!(err.is_not_found());
    }
}
