//! reflmig CLI - migrates legacy `DECLARE_CLASS` headers to
//! `GENERATED_REFLECTION_BODY`.
//!
//! Features:
//! - Automatic project root detection (nearest ancestor holding `Source/`)
//! - Built-in target table, or a `reflmig.toml`, or explicit `--file` lists
//! - Discovery of pending headers under `Source/`
//! - Dry runs with unified diff previews, and a CI-friendly `--check`
//! - JSON report output for audit trails

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use reflmig_core::{
    discover_candidates, find_project_root, init_structured_logging, load_config,
    load_config_from, log_error, log_event, log_info, log_warn, print_json, print_plain,
    EditOutcome, MigrationReport, Migrator, ReflmigConfig,
};

/// Exit code: everything ran (and `--check` found nothing pending).
const EXIT_OK: i32 = 0;
/// Exit code: `--check` found headers still to convert.
const EXIT_PENDING: i32 = 1;
/// Exit code: fatal error, nothing after the failure was attempted.
const EXIT_FATAL: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Rewrite DECLARE_CLASS(Class, Parent) into GENERATED_REFLECTION_BODY()"
)]
pub struct Cli {
    /// Any directory inside the project (the root is the nearest ancestor holding Source/)
    #[arg(default_value = ".")]
    path: String,

    /// Read configuration from this file instead of <root>/reflmig.toml
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Show what would be converted without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print a unified diff for each header that would be converted (implies --dry-run)
    #[arg(long)]
    diff: bool,

    /// Dry run that exits with code 1 if any header still needs converting
    #[arg(long)]
    check: bool,

    /// List headers under Source/ that still carry legacy declarations, then exit
    #[arg(long)]
    discover: bool,

    /// Migrate the discovered headers instead of the target table
    #[arg(long, conflicts_with = "files")]
    discovered: bool,

    /// Header to migrate, relative to the project root (repeatable, replaces the table)
    #[arg(long = "file", value_name = "REL")]
    files: Vec<String>,

    /// Header to leave untouched, relative to the project root (repeatable)
    #[arg(long, value_name = "REL")]
    exclude: Vec<String>,

    /// Write the JSON report to this relative path
    #[arg(long, value_name = "FILE")]
    report_file: Option<String>,
}

impl Cli {
    fn is_dry_run(&self) -> bool {
        self.dry_run || self.diff || self.check
    }
}

/// Security: Validates output file paths to prevent path traversal.
///
/// Rejects absolute paths, `..` components and null bytes.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    if p
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(anyhow!(
            "Path traversal (..) not allowed in output paths: {}",
            path
        ));
    }

    // Windows-style separators are not components on Unix
    let normalized = path.replace('\\', "/");
    if normalized.split('/').any(|part| part == "..") {
        return Err(anyhow!("Path traversal attempt detected: {}", path));
    }

    Ok(p)
}

/// Explicit `--config`, else `<root>/reflmig.toml`, else nothing.
fn resolve_config(root: &Path, explicit: Option<&str>) -> Result<Option<ReflmigConfig>> {
    match explicit {
        Some(path) => load_config_from(Path::new(path))
            .map(Some)
            .with_context(|| format!("Failed to load config: {}", path)),
        None => load_config(root).context("Failed to load reflmig.toml"),
    }
}

/// Layer the command line over the config over the built-in tables.
fn build_migrator(root: &Path, cli: &Cli, config: Option<&ReflmigConfig>) -> Migrator {
    let mut migrator = Migrator::new(root);
    if let Some(config) = config {
        migrator = migrator.with_config(config);
    }
    if !cli.files.is_empty() {
        migrator = migrator.targets(cli.files.iter().cloned());
    }
    migrator
        .exclude(cli.exclude.iter().cloned())
        .dry_run(cli.is_dry_run())
        .with_diff(cli.diff)
}

fn print_candidates(root: &Path, candidates: &[String], json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "root": root.display().to_string(),
            "count": candidates.len(),
            "files": candidates,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Project root: {}", root.display());
        if candidates.is_empty() {
            println!("No headers with legacy declarations found.");
        } else {
            println!("{} header(s) with legacy declarations:", candidates.len());
            for path in candidates {
                println!("  {}", path);
            }
        }
    }
    Ok(())
}

fn write_report_file(report: &MigrationReport, path: &str) -> Result<()> {
    let out = validate_output_path(path)?;
    let json = report.to_json().context("Failed to serialize report")?;
    fs::write(&out, json)
        .with_context(|| format!("Failed to write report: {}", out.display()))?;
    log_info(&format!("report written to {}", out.display()));
    Ok(())
}

fn run(cli: &Cli) -> Result<i32> {
    let root = find_project_root(Path::new(&cli.path))
        .with_context(|| format!("Failed to find project root from: {}", cli.path))?;

    let config = resolve_config(&root, cli.config.as_deref())?;
    let json = cli.json || config.as_ref().is_some_and(ReflmigConfig::wants_json);

    let mut migrator = build_migrator(&root, cli, config.as_ref());

    if cli.discover || cli.discovered {
        let rewriter = migrator.rewriter()?;
        let candidates = discover_candidates(&root, &rewriter, migrator.exclude_list())
            .context("Header discovery failed")?;

        if cli.discover {
            print_candidates(&root, &candidates, json)?;
            return Ok(EXIT_OK);
        }
        migrator = migrator.targets(candidates);
    }

    let report = migrator.run()?;

    if json {
        print_json(&report);
    } else {
        print_plain(&report);
    }

    if let Some(path) = &cli.report_file {
        write_report_file(&report, path)?;
    }

    let partial = report
        .files
        .iter()
        .filter(|f| {
            matches!(&f.outcome, EditOutcome::Converted { warnings, .. } if !warnings.is_empty())
        })
        .count();
    if partial > 0 {
        log_warn(&format!(
            "{} header(s) converted with warnings, review them by hand",
            partial
        ));
    }

    log_event(
        "SUMMARY",
        &format!(
            "converted={} skipped={} dry_run={}",
            report.converted, report.skipped, report.dry_run
        ),
    );

    Ok(if cli.check && report.converted > 0 {
        EXIT_PENDING
    } else {
        EXIT_OK
    })
}

fn main() {
    // Any panic is a fatal error with the documented exit code
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] reflmig internal error: {}", info);
        eprintln!("[PANIC] Files already converted stay converted; rerunning is safe.");
        std::process::exit(EXIT_FATAL);
    }));

    // Structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            log_error(&format!("{:#}", e));
            eprintln!("[ERROR] {:#}", e);
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}
