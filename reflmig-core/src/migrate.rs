//! File-level policy and the sequential migration loop.
//!
//! Per file, in this order, the first rule that applies wins:
//! 1. on the exclusion list → skipped, never opened
//! 2. missing → skipped
//! 3. not UTF-8, or any other read failure → skipped
//! 4. engine verdict (already converted, no declarations, no change)
//! 5. otherwise the new text is written back whole
//!
//! Nothing about one file's content or readability stops the run. A failed
//! write does: files already written stay converted while the rest stay
//! untouched.

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::{ReflmigError, ReflmigResult};
use crate::report::{EditOutcome, FileReport, MigrationReport, SkipReason};
use crate::rewrite::{RewriteOutcome, Rewriter};
use crate::source::{content_hash, read_source, write_source};
use crate::targets::same_relative_path;

/// Per-run switches for [`migrate_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrateOptions {
    /// Compute outcomes without writing.
    pub dry_run: bool,
    /// Attach a unified diff to converted files (dry runs only).
    pub with_diff: bool,
}

/// True if `relative` is on the exclusion list.
pub fn is_excluded(relative: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|e| same_relative_path(e, relative))
}

/// True if `relative` has a `..` component, with either separator.
fn escapes_root(relative: &str) -> bool {
    relative.replace('\\', "/").split('/').any(|part| part == "..")
}

/// Migrate one header, `relative` to `root`.
pub fn migrate_file(
    root: &Path,
    relative: &str,
    excludes: &[String],
    rewriter: &Rewriter,
    options: MigrateOptions,
) -> ReflmigResult<FileReport> {
    if is_excluded(relative, excludes) {
        info!(file = %relative, "excluded");
        return Ok(FileReport::skipped(relative, SkipReason::Excluded));
    }

    let full_path = root.join(relative);
    let source = match read_source(&full_path) {
        Ok(Some(source)) => source,
        Ok(None) => {
            info!(file = %relative, "file not found");
            return Ok(FileReport::skipped(relative, SkipReason::NotFound));
        }
        Err(e) => {
            let kind = if e.is_recoverable() { "not UTF-8" } else { "read failed" };
            warn!(file = %relative, error = %e, kind, "unreadable");
            return Ok(FileReport::skipped(relative, SkipReason::Unreadable));
        }
    };

    let rewritten = match rewriter.rewrite(&source.text)? {
        RewriteOutcome::AlreadyConverted => {
            info!(file = %relative, "already converted");
            return Ok(FileReport::skipped(relative, SkipReason::AlreadyConverted));
        }
        RewriteOutcome::NoDeclarations => {
            info!(file = %relative, "no legacy declaration");
            return Ok(FileReport::skipped(relative, SkipReason::NoDeclarations));
        }
        RewriteOutcome::Unchanged { declarations } => {
            info!(file = %relative, declarations = declarations.len(), "no change produced");
            return Ok(FileReport::skipped(relative, SkipReason::NoChange));
        }
        RewriteOutcome::Changed(rewritten) => rewritten,
    };

    for warning in &rewritten.warnings {
        warn!(file = %relative, %warning, "partial conversion");
    }

    let before = content_hash(&source.original_bytes());
    let after = content_hash(&source.encode(&rewritten.text));

    if !options.dry_run {
        if let Err(e) = write_source(&full_path, &rewritten.text, source.has_bom) {
            error!(file = %relative, error = %e, "write failed, aborting");
            return Err(e);
        }
    }

    info!(
        file = %relative,
        declarations = rewritten.declarations.len(),
        dry_run = options.dry_run,
        "converted"
    );

    Ok(FileReport {
        path: relative.to_string(),
        diff: preview(relative, &source.text, &rewritten.text, options),
        outcome: EditOutcome::Converted {
            declarations: rewritten.declarations,
            warnings: rewritten.warnings,
        },
        before_sha256: Some(before),
        after_sha256: Some(after),
    })
}

#[cfg(feature = "diff")]
fn preview(relative: &str, before: &str, after: &str, options: MigrateOptions) -> Option<String> {
    (options.dry_run && options.with_diff)
        .then(|| crate::diff::generate_unified_diff(relative, before, after))
}

#[cfg(not(feature = "diff"))]
fn preview(_relative: &str, _before: &str, _after: &str, _options: MigrateOptions) -> Option<String> {
    None
}

/// Migrate every target in order and collect the report.
///
/// Stops at the first write failure and returns that error.
pub fn migrate_all(
    root: &Path,
    targets: &[String],
    excludes: &[String],
    rewriter: &Rewriter,
    options: MigrateOptions,
) -> ReflmigResult<MigrationReport> {
    if targets.iter().any(|t| Path::new(t).is_absolute()) {
        return Err(ReflmigError::invalid_argument(
            "target paths must be relative to the project root",
        ));
    }
    if let Some(t) = targets.iter().find(|t| escapes_root(t)) {
        return Err(ReflmigError::security(format!(
            "target path leaves the project root: {}",
            t
        )));
    }

    let mut report = MigrationReport::new(root.display().to_string(), options.dry_run);
    info!(root = %root.display(), files = targets.len(), dry_run = options.dry_run, "migration started");

    for relative in targets {
        let file = migrate_file(root, relative, excludes, rewriter, options)?;
        report.push(file);
    }

    info!(
        converted = report.converted,
        skipped = report.skipped,
        "migration finished"
    );
    Ok(report)
}
