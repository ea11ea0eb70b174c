//! Project root detection.
//!
//! The project root is the directory holding `Source/`; every target path
//! is relative to it. Any directory inside the project can be given: the
//! search walks up through the ancestors.

use std::path::{Path, PathBuf};

use crate::error::{ReflmigError, ReflmigResult};

/// Directory whose presence marks the project root.
pub const SOURCE_DIR: &str = "Source";

/// True if `dir` directly contains `Source/`.
pub fn is_project_root(dir: &Path) -> bool {
    dir.join(SOURCE_DIR).is_dir()
}

/// Find the project root at or above `path`.
pub fn find_project_root(path: &Path) -> ReflmigResult<PathBuf> {
    let canonical = path
        .canonicalize()
        .map_err(|e| ReflmigError::io(path, e))?;

    canonical
        .ancestors()
        .find(|dir| is_project_root(dir))
        .map(Path::to_path_buf)
        .ok_or_else(|| ReflmigError::Root {
            path: path.to_path_buf(),
        })
}
