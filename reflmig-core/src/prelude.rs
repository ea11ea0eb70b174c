//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use reflmig_core::prelude::*;
//! ```

// Engine
pub use crate::extract::DeclarationInfo;
pub use crate::rewrite::{RewriteOutcome, RewriteWarning, Rewriter};
pub use crate::rules::RewriteRules;

// Errors
pub use crate::error::{ReflmigError, ReflmigResult};

// Running a migration
pub use crate::builder::Migrator;
pub use crate::root::find_project_root;

// Reporting
pub use crate::report::{EditOutcome, FileReport, MigrationReport, SkipReason};

// Configuration
pub use crate::config::{load_config, ReflmigConfig};
