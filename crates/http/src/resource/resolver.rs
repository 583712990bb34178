//! Maps request targets onto files below the document root.

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tracing::{debug, error};

use crate::protocol::Outcome;
use crate::resource::FileView;

/// Permission bit for "readable by others".
const WORLD_READABLE: u32 = 0o004;

#[derive(Debug, Clone)]
pub struct ResourceResolver {
    doc_root: PathBuf,
    max_path_len: usize,
}

impl ResourceResolver {
    pub fn new(doc_root: impl Into<PathBuf>, max_path_len: usize) -> Self {
        Self { doc_root: doc_root.into(), max_path_len }
    }

    /// Resolves `target`, which must start with `/`.
    ///
    /// Checks, in order of precedence:
    ///
    /// 1. document root plus target longer than the path limit, or a `..` segment:
    ///    rejected before touching the filesystem
    /// 2. metadata query fails: [`Outcome::NotFound`]
    /// 3. not readable by others: [`Outcome::Forbidden`]
    /// 4. a directory: [`Outcome::Malformed`], directories are never listed
    /// 5. otherwise the file is mapped: [`Outcome::Resolved`]
    pub fn resolve(&self, target: &str) -> Outcome {
        let Some(path) = self.real_path(target) else {
            debug!(target, max_path_len = self.max_path_len, "resolved path too long");
            return Outcome::Malformed;
        };

        if target.split('/').any(|segment| segment == "..") {
            debug!(target, "target escapes the document root");
            return Outcome::Forbidden;
        }

        let Ok(metadata) = fs::metadata(&path) else {
            return Outcome::NotFound;
        };

        if metadata.permissions().mode() & WORLD_READABLE == 0 {
            return Outcome::Forbidden;
        }

        if metadata.is_dir() {
            return Outcome::Malformed;
        }

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return Outcome::Forbidden,
            Err(_) => return Outcome::NotFound,
        };

        // the descriptor is closed when `file` drops, the mapping stays valid
        match FileView::map(&file, metadata.len()) {
            Ok(view) => Outcome::Resolved(view),
            Err(e) => {
                error!(cause = %e, path = %path.display(), "can't map file");
                Outcome::InternalError
            }
        }
    }

    /// Appends the target verbatim to the document root, refusing to exceed the limit.
    fn real_path(&self, target: &str) -> Option<PathBuf> {
        let root = self.doc_root.as_os_str();
        if root.len() + target.len() > self.max_path_len {
            return None;
        }

        let mut path = OsString::with_capacity(self.max_path_len);
        path.push(root);
        path.push(target);
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::Permissions;
    use tempfile::TempDir;

    fn doc_root() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), b"<h1>index</h1>").unwrap();
        fs::write(dir.path().join("empty.html"), b"").unwrap();
        fs::write(dir.path().join("secret.html"), b"secret").unwrap();
        fs::set_permissions(dir.path().join("secret.html"), Permissions::from_mode(0o600)).unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        dir
    }

    #[test]
    fn resolves_readable_file() {
        let root = doc_root();
        let resolver = ResourceResolver::new(root.path(), 200);

        match resolver.resolve("/index.html") {
            Outcome::Resolved(view) => assert_eq!(view.as_bytes(), b"<h1>index</h1>"),
            other => panic!("unexpected outcome {other:?}"),
        }

        match resolver.resolve("/empty.html") {
            Outcome::Resolved(view) => assert!(view.is_empty()),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn classifies_failures() {
        let root = doc_root();
        let resolver = ResourceResolver::new(root.path(), 200);

        assert!(matches!(resolver.resolve("/missing.html"), Outcome::NotFound));
        assert!(matches!(resolver.resolve("/secret.html"), Outcome::Forbidden));
        assert!(matches!(resolver.resolve("/docs"), Outcome::Malformed));
        assert!(matches!(resolver.resolve("/docs/../index.html"), Outcome::Forbidden));
    }

    #[test]
    fn long_paths_are_rejected_before_filesystem_access() {
        let resolver = ResourceResolver::new("/nonexistent-root", 32);

        assert!(matches!(resolver.resolve("/short"), Outcome::NotFound));
        assert!(matches!(resolver.resolve(&format!("/{}", "a".repeat(14))), Outcome::NotFound));
        assert!(matches!(resolver.resolve(&format!("/{}", "a".repeat(15))), Outcome::Malformed));
    }
}
