//! Builder pattern API for a migration run.
//!
//! ```rust,ignore
//! use reflmig_core::prelude::*;
//!
//! let report = Migrator::new("/path/to/project")
//!     .exclude(["Source/Runtime/Core/Object/Object.h"])
//!     .dry_run(true)
//!     .with_diff(true)
//!     .run()?;
//!
//! println!("would convert {} file(s)", report.converted);
//! ```

use std::path::PathBuf;

use crate::config::ReflmigConfig;
use crate::error::ReflmigResult;
use crate::migrate::{migrate_all, MigrateOptions};
use crate::report::MigrationReport;
use crate::rewrite::Rewriter;
use crate::rules::RewriteRules;
use crate::targets::{default_excludes, default_targets};

/// Builder for configuring a migration run.
#[derive(Debug, Clone)]
pub struct Migrator {
    /// Project root (the directory holding `Source/`)
    root: PathBuf,

    /// Headers to migrate, in order
    targets: Vec<String>,

    /// Headers never to touch
    excludes: Vec<String>,

    /// Macro vocabulary
    rules: RewriteRules,

    /// Dry-run mode (don't modify files)
    dry_run: bool,

    /// Attach a unified diff per converted file (dry runs only)
    with_diff: bool,
}

impl Migrator {
    /// Create a migrator over the built-in target and exclusion tables.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            targets: default_targets(),
            excludes: default_excludes(),
            rules: RewriteRules::default(),
            dry_run: false,
            with_diff: false,
        }
    }

    /// Apply whatever a `reflmig.toml` sets; unset fields keep current values.
    pub fn with_config(mut self, config: &ReflmigConfig) -> Self {
        if let Some(targets) = &config.targets {
            self.targets = targets.clone();
        }
        if let Some(exclude) = &config.exclude {
            self.excludes = exclude.clone();
        }
        if let Some(rules) = &config.macros {
            self.rules = rules.clone();
        }
        self
    }

    /// Replace the target list.
    pub fn targets(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Add headers to the exclusion list.
    pub fn exclude(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excludes.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Replace the macro vocabulary.
    pub fn rules(mut self, rules: RewriteRules) -> Self {
        self.rules = rules;
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Attach unified diffs to converted files in dry-run mode.
    pub fn with_diff(mut self, enabled: bool) -> Self {
        self.with_diff = enabled;
        self
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn target_list(&self) -> &[String] {
        &self.targets
    }

    pub fn exclude_list(&self) -> &[String] {
        &self.excludes
    }

    /// Compile the rewrite engine for the configured rules.
    pub fn rewriter(&self) -> ReflmigResult<Rewriter> {
        Rewriter::new(self.rules.clone())
    }

    /// Run the migration and return the report.
    pub fn run(&self) -> ReflmigResult<MigrationReport> {
        let rewriter = self.rewriter()?;
        let options = MigrateOptions {
            dry_run: self.dry_run,
            with_diff: self.with_diff,
        };
        migrate_all(&self.root, &self.targets, &self.excludes, &rewriter, options)
    }
}
