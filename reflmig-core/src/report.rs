//! Migration outcomes and their output formatting - plaintext and JSON.

use serde::{Deserialize, Serialize};

use crate::extract::DeclarationInfo;
use crate::rewrite::RewriteWarning;

/// Why a file was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[serde(rename = "file-not-found")]
    NotFound,
    #[serde(rename = "excluded-by-policy")]
    Excluded,
    #[serde(rename = "already-converted")]
    AlreadyConverted,
    #[serde(rename = "no-declarations-found")]
    NoDeclarations,
    #[serde(rename = "no-textual-change-produced")]
    NoChange,
    #[serde(rename = "unreadable")]
    Unreadable,
}

impl SkipReason {
    /// Console wording, matching the migration log format.
    pub fn describe(self) -> &'static str {
        match self {
            Self::NotFound => "File not found",
            Self::Excluded => "Excluded",
            Self::AlreadyConverted => "Already converted",
            Self::NoDeclarations => "No legacy declaration found",
            Self::NoChange => "No change produced",
            Self::Unreadable => "Unreadable",
        }
    }
}

/// Per-file result of the migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    Skipped {
        reason: SkipReason,
    },
    Converted {
        declarations: Vec<DeclarationInfo>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<RewriteWarning>,
    },
}

impl EditOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped { reason } => Some(*reason),
            Self::Converted { .. } => None,
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the project root, as listed in the migration set.
    pub path: String,
    pub outcome: EditOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_sha256: Option<String>,
    /// Unified diff preview (dry runs only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileReport {
    pub fn skipped(path: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            outcome: EditOutcome::skipped(reason),
            before_sha256: None,
            after_sha256: None,
            diff: None,
        }
    }
}

/// Whole-run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    pub root: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub converted: usize,
    pub skipped: usize,
}

impl MigrationReport {
    pub fn new(root: impl Into<String>, dry_run: bool) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            root: root.into(),
            dry_run,
            files: Vec::new(),
            converted: 0,
            skipped: 0,
        }
    }

    /// Record a file result and keep the counters in step.
    pub fn push(&mut self, file: FileReport) {
        if file.outcome.is_converted() {
            self.converted += 1;
        } else {
            self.skipped += 1;
        }
        self.files.push(file);
    }

    pub fn warning_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                EditOutcome::Converted { warnings, .. } => warnings.len(),
                EditOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Console line(s) for one file, without trailing newline.
pub fn format_file_line(file: &FileReport, dry_run: bool) -> String {
    match &file.outcome {
        EditOutcome::Skipped {
            reason: SkipReason::Excluded,
        } => format!("[EXCLUDE] {}", file.path),
        EditOutcome::Skipped { reason } => {
            format!("[SKIP] {}: {}", reason.describe(), file.path)
        }
        EditOutcome::Converted {
            declarations,
            warnings,
        } => {
            let tag = if dry_run { "WOULD CONVERT" } else { "CONVERTED" };
            let mut out = format!("[{}] {}", tag, file.path);
            for decl in declarations {
                out.push_str(&format!("\n    - {}", decl));
            }
            for warning in warnings {
                out.push_str(&format!("\n    [WARN] {}", warning));
            }
            out
        }
    }
}

/// Prints the report in plain text format.
pub fn print_plain(report: &MigrationReport) {
    println!("Project root: {}", report.root);
    println!("Processing {} file(s)...", report.files.len());
    println!("{}", "=".repeat(60));

    for file in &report.files {
        println!("{}", format_file_line(file, report.dry_run));
        if let Some(diff) = &file.diff {
            print!("{}", diff);
        }
    }

    println!("{}", "=".repeat(60));
    if report.dry_run {
        println!("Dry run complete (no files written).");
    } else {
        println!("Conversion complete!");
    }
    println!("  Converted: {}", report.converted);
    println!("  Skipped: {}", report.skipped);
    let warnings = report.warning_count();
    if warnings > 0 {
        println!("  Warnings: {}", warnings);
    }

    if !report.dry_run && report.converted > 0 {
        println!();
        println!("Next steps:");
        println!("  1. Run the reflection generator to create the .generated.h files");
        println!("  2. Build the project to verify changes");
    }
}

/// Prints the report in JSON format.
///
/// Falls back to a minimal summary if serialization fails.
pub fn print_json(report: &MigrationReport) {
    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{{\"converted\": {}, \"skipped\": {}}}",
                report.converted, report.skipped
            );
        }
    }
}
