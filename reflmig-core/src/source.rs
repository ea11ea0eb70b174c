//! Whole-file text I/O for headers.
//!
//! - Reads the file once, strips a leading UTF-8 BOM and remembers it
//! - Writes the file back with the BOM only if it had one
//! - Writes through a temp file + rename so a file is never half-written
//! - SHA-256 of the on-disk bytes for the report's audit trail

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{IoResultExt, ReflmigError, ReflmigResult};

/// UTF-8 byte order mark as it appears in a decoded `str`.
pub const UTF8_BOM: &str = "\u{feff}";

/// One header loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Text without the BOM.
    pub text: String,
    pub has_bom: bool,
}

impl SourceFile {
    /// Bytes as they would be written to disk for `text`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        encode_text(text, self.has_bom)
    }

    /// Bytes of the file as read.
    pub fn original_bytes(&self) -> Vec<u8> {
        self.encode(&self.text)
    }
}

fn encode_text(text: &str, has_bom: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if has_bom {
        bytes.extend_from_slice(UTF8_BOM.as_bytes());
    }
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Read a header.
///
/// Returns `Ok(None)` when the file does not exist and
/// [`ReflmigError::Encoding`] when it is not UTF-8.
pub fn read_source(path: &Path) -> ReflmigResult<Option<SourceFile>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ReflmigError::io(path, e)),
    };

    let mut text = String::from_utf8(bytes).map_err(|_| ReflmigError::encoding(path))?;
    let has_bom = text.starts_with(UTF8_BOM);
    if has_bom {
        text.drain(..UTF8_BOM.len());
    }

    Ok(Some(SourceFile {
        path: path.to_path_buf(),
        text,
        has_bom,
    }))
}

/// Replace the contents of `path` with `text`, restoring the BOM if asked.
///
/// Atomic on most filesystems: the new content goes to a sibling temp file
/// that is renamed over the original. The original's permissions are kept.
pub fn write_source(path: &Path, text: &str, has_bom: bool) -> ReflmigResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "source".to_string());

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = dir.join(format!(
        ".{}.{}.{}.reflmig.tmp",
        file_name,
        std::process::id(),
        nanos
    ));

    fs::write(&temp_path, encode_text(text, has_bom)).with_path(&temp_path)?;

    copy_permissions(path, &temp_path);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ReflmigError::io(path, e));
    }

    Ok(())
}

/// Give `to` the permissions of `from`. Returns false if they were not copied.
///
/// A missing `from` is a new file and needs nothing. Any other failure is
/// logged: the write still goes ahead with default permissions.
fn copy_permissions(from: &Path, to: &Path) -> bool {
    let meta = match fs::metadata(from) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return false,
        Err(e) => {
            warn!(file = %from.display(), error = %e, "could not read permissions");
            return false;
        }
    };
    match fs::set_permissions(to, meta.permissions()) {
        Ok(()) => true,
        Err(e) => {
            warn!(file = %to.display(), error = %e, "could not copy permissions");
            false
        }
    }
}

/// SHA-256 of raw bytes, lowercase hex.
#[inline]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut sha = Sha256::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}
