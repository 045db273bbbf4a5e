//! CLI entry point.
//!
//! Wires the lexer/parser onto [`idlc_core`]'s descriptor: reads an entry
//! file, recursively discovers and parses its imports, runs the resolver
//! once over the whole graph, and reports diagnostics.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use colored::Colorize;
use idlc_core::{resolver, Descriptor, FileId};

/// Compiles a Mojom-like interface description file and its imports.
#[derive(ClapParser, Debug)]
#[command(name = "idlc", about = "Frontend compiler for a Mojom-like interface description language")]
struct Args {
    /// The entry .mojom file to compile.
    entry: PathBuf,

    /// Additional directories searched, in order, for imported files.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{err:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .without_time()
        .init();
}

/// Walks the entry file and its import graph into one [`Descriptor`],
/// then runs the resolver once over the whole graph.
fn run(args: &Args) -> Result<()> {
    let mut descriptor = Descriptor::new();
    let entry_canonical = canonicalize(&args.entry)?;

    let mut queue: VecDeque<(PathBuf, Option<String>)> = VecDeque::new();
    queue.push_back((entry_canonical, None));

    while let Some((path, imported_from)) = queue.pop_front() {
        let canonical_name = path.to_string_lossy().into_owned();
        if descriptor.find_file(&canonical_name).is_some() {
            continue;
        }

        let source = fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
        tracing::info!(file = %canonical_name, "parsing");

        let file = match idlc_parser::parse_mojom_file(&mut descriptor, &canonical_name, imported_from.as_deref(), &source) {
            Ok(file) => file,
            Err(diag) => {
                report(&[diag]);
                return Err(anyhow!("failed to parse {canonical_name}"));
            }
        };

        for import in resolve_imports(&descriptor, file, &path, &args.include_dirs)? {
            queue.push_back((import, Some(canonical_name.clone())));
        }
    }

    match resolver::resolve(&mut descriptor) {
        Ok(()) => {
            println!("{}", "ok".green());
            Ok(())
        }
        Err(diag) => {
            report(&[diag]);
            Err(anyhow!("resolution failed"))
        }
    }
}

/// Finds each import's file on disk relative to the importing file's
/// directory or one of `include_dirs`, and records its canonical name
/// on the descriptor (§6 "Import resolution").
fn resolve_imports(descriptor: &mut Descriptor, file: FileId, importer: &Path, include_dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let specified_names: Vec<String> = descriptor.file(file).imports.iter().map(|i| i.specified_name.clone()).collect();
    let mut resolved = Vec::with_capacity(specified_names.len());

    let importer_dir = importer.parent().unwrap_or_else(|| Path::new("."));
    for specified in specified_names {
        let candidate = [importer_dir]
            .into_iter()
            .chain(include_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(&specified))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| anyhow!("cannot find imported file {specified} (imported from {})", importer.display()))?;

        let canonical = canonicalize(&candidate)?;
        let canonical_name = canonical.to_string_lossy().into_owned();
        descriptor.set_canonical_import_name(file, &specified, &canonical_name);
        resolved.push(canonical);
    }

    Ok(resolved)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("cannot read {}", path.display()))
}

fn report(diagnostics: &[idlc_common::Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{}", diag.rendered.red());
    }
}
