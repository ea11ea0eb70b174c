//! reflmig-core: one-shot migration of `DECLARE_CLASS` headers to
//! `GENERATED_REFLECTION_BODY`.
//!
//! For every legacy `DECLARE_CLASS(Class, Parent)` in a header the engine:
//!
//! - inserts `#include "Class.generated.h"` after the last include
//! - inserts `UCLASS()` above `class Class : public Parent`
//! - replaces the declaration with `GENERATED_REFLECTION_BODY()`
//! - removes `DECLARE_DUPLICATE(Class)`
//!
//! Headers are never parsed. Each edit is anchored by a whitespace-tolerant
//! pattern over the current text, and an edit whose anchor is missing is
//! skipped rather than guessed. A header that already contains
//! `GENERATED_REFLECTION_BODY` is left alone, which makes the migration
//! idempotent.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reflmig_core::prelude::*;
//!
//! let root = find_project_root(Path::new("."))?;
//! let report = Migrator::new(&root).dry_run(true).run()?;
//! println!("{} header(s) to convert", report.converted);
//! ```
//!
//! # Module Organization
//!
//! - [`extract`]: legacy declaration extraction
//! - [`anchor`]: class-definition header location
//! - [`rewrite`]: the rewrite engine
//! - [`migrate`]: file-level policy and the migration loop
//! - [`source`]: BOM-preserving, atomic whole-file I/O
//! - [`report`]: outcomes, plain and JSON output
//! - [`builder`]: fluent builder API for a run
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `diff` (default): unified diff preview for dry runs
//! - `discover` (default): scan `Source/` for headers still to migrate

// Core modules (always available)
pub mod anchor;
pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod migrate;
pub mod prelude;
pub mod report;
pub mod rewrite;
pub mod root;
pub mod rules;
pub mod source;
pub mod targets;

// Feature-gated modules
#[cfg(feature = "diff")]
pub mod diff;

#[cfg(feature = "discover")]
pub mod discover;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{IoResultExt, ReflmigError, ReflmigResult};

// Builder API
pub use builder::Migrator;

// Configuration
pub use config::{load_config, load_config_from, OutputConfig, ReflmigConfig, CONFIG_FILE_NAME};

// Engine
pub use anchor::{find_class_anchor, ClassAnchor};
pub use extract::{extract_declarations, DeclarationInfo};
pub use rewrite::{
    line_ending, rewrite_source, RewriteOutcome, RewriteWarning, RewrittenSource, Rewriter,
};
pub use rules::{is_identifier, RewriteRules};

// Migration
pub use migrate::{is_excluded, migrate_all, migrate_file, MigrateOptions};
pub use targets::{default_excludes, default_targets, DEFAULT_EXCLUDES, DEFAULT_TARGETS};

// File I/O
pub use source::{content_hash, read_source, write_source, SourceFile};

// Logging
pub use logging::{init_structured_logging, log_error, log_event, log_info, log_warn};

// Reporting
pub use report::{
    format_file_line, print_json, print_plain, EditOutcome, FileReport, MigrationReport,
    SkipReason,
};

// Root detection
pub use root::{find_project_root, is_project_root};

// Feature-gated re-exports
#[cfg(feature = "diff")]
pub use diff::generate_unified_diff;

#[cfg(feature = "discover")]
pub use discover::{discover_candidates, gather_headers};

#[cfg(test)]
mod tests;
