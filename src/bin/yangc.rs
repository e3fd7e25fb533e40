//! Command-line driver: load, resolve, and report diagnostics for a set
//! of YANG modules.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustc_hash::FxHashMap;
use tracing_subscriber::EnvFilter;

use yangc::base::{FileId, LineIndex};
use yangc::config::{CompileConfig, RevisionPolicy, Verbosity};
use yangc::hir::{CompileError, Diagnostic, Severity};
use yangc::resolver;

/// Compile one or more YANG modules and report diagnostics.
#[derive(Parser, Debug)]
#[command(name = "yangc", author, version, about, long_about = None)]
struct Cli {
    /// YANG module files to compile.
    #[arg(required = true)]
    modules: Vec<PathBuf>,

    /// Directory to search for imported/included modules (repeatable).
    #[arg(short = 'I', long = "search-dir", value_name = "DIR")]
    search_dirs: Vec<PathBuf>,

    /// How to pick a module's revision when an import omits `revision-date`.
    #[arg(long, value_enum, default_value = "latest")]
    revision: RevisionPolicyArg,

    /// Increase log verbosity (-v for verbose, -vv for debug).
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum RevisionPolicyArg {
    Strict,
    Latest,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = match cli.verbose {
        0 => Verbosity::Normal,
        1 => Verbosity::Verbose,
        _ => Verbosity::Debug,
    };
    init_tracing(verbosity);

    let config = CompileConfig {
        search_dirs: cli.search_dirs,
        revision_policy: match cli.revision {
            RevisionPolicyArg::Strict => RevisionPolicy::Strict,
            RevisionPolicyArg::Latest => RevisionPolicy::Latest,
        },
        verbosity,
    };

    match resolver::compile(&config, &cli.modules) {
        Ok(unit) => {
            tracing::info!(modules = unit.modules.len(), "compiled successfully");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            // A failure during loading drops the partially built `LoadedUnit`
            // along with the `FileId -> path` table it would have provided,
            // so diagnostics for those errors fall back to a bare file tag.
            for diagnostic in render_diagnostics(&errors, &[]) {
                eprintln!("{}: {diagnostic}", severity_label(diagnostic.severity));
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: Verbosity) {
    let default_level = match verbosity {
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info,yangc=debug",
        Verbosity::Debug => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Renders [`CompileError`]s into `file:line:col: message` diagnostics.
/// `file_paths` maps a [`FileId`]'s index to the path it was read from;
/// errors whose span names a file outside that list render without a
/// position.
fn render_diagnostics(errors: &[CompileError], file_paths: &[PathBuf]) -> Vec<Diagnostic> {
    let mut indices: FxHashMap<FileId, LineIndex> = FxHashMap::default();
    errors
        .iter()
        .map(|err| match err.span() {
            None => Diagnostic {
                file_path: "<unknown>".to_string(),
                line: 0,
                col: 0,
                severity: err.severity(),
                message: err.to_string(),
            },
            Some(span) => {
                let path = file_paths
                    .get(span.file.index())
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| format!("<file {}>", span.file.0));
                let index = indices.entry(span.file).or_insert_with(|| {
                    let text = file_paths
                        .get(span.file.index())
                        .and_then(|p| std::fs::read_to_string(p).ok())
                        .unwrap_or_default();
                    LineIndex::new(&text)
                });
                let pos = index.line_col(span.range.start());
                Diagnostic {
                    file_path: path,
                    line: pos.line,
                    col: pos.col,
                    severity: err.severity(),
                    message: err.to_string(),
                }
            }
        })
        .collect()
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}
