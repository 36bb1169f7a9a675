use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, LevelFilter};
use markdown_model::{
    render_outline, Document, DocumentContext, ExitCode, ModelError, Position, SectionLevel,
    Value,
};
use markdown_model_config::{Config, LoadOptions};
use walkdir::WalkDir;

const SUGGESTION_LIMIT: usize = 20;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;
    debug!("project root: {}", config.project.root.display());
    let context = DocumentContext::new(config);

    match cli.command {
        Command::Show(args) => handle_show(&context, args),
        Command::FrontMatter(args) => handle_front_matter(&context, args),
        Command::Search(args) => handle_search(&context, args),
        Command::AddSection(args) => handle_add_section(&context, args),
        Command::AddLine(args) => handle_add_line(&context, args),
        Command::Check(args) => handle_check(&context, args),
    }
}

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbosity {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    let _ = builder.try_init();
}

fn handle_show(context: &DocumentContext, args: ShowArgs) -> Result<i32> {
    let document = match context.load(&args.file) {
        Ok(document) => document,
        Err(err) => return Ok(report(&err)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print!("{}", render_outline(&document));
    }
    Ok(ExitCode::Success as i32)
}

fn handle_front_matter(context: &DocumentContext, args: FrontMatterArgs) -> Result<i32> {
    let document = match context.load(&args.file) {
        Ok(document) => document,
        Err(err) => return Ok(report(&err)),
    };

    let value = match (document.front_matter_value(&args.key), args.default) {
        (Some(value), _) => value.clone(),
        (None, Some(default)) => Value::String(default),
        (None, None) => {
            eprintln!("Front matter key '{}' not found.", args.key);
            return Ok(ExitCode::NotFound as i32);
        }
    };

    println!("{}", render_value(&value)?);
    Ok(ExitCode::Success as i32)
}

fn handle_search(context: &DocumentContext, args: SearchArgs) -> Result<i32> {
    let document = match context.load(&args.file) {
        Ok(document) => document,
        Err(err) => return Ok(report(&err)),
    };

    let level = args.level.map(level_from_depth);
    let matches = document.search_sections(&args.query, level);

    if matches.is_empty() {
        eprintln!("No sections match '{}'.", args.query);
        list_candidates(&document, &args.query);
        return Ok(ExitCode::NotFound as i32);
    }

    for matched in matches {
        println!(
            "{}\t{}\t{}",
            matched.index,
            matched.level(),
            matched.heading()
        );
    }
    Ok(ExitCode::Success as i32)
}

fn handle_add_section(context: &DocumentContext, args: AddSectionArgs) -> Result<i32> {
    let mut document = match context.load(&args.edit.file) {
        Ok(document) => document,
        Err(err) => return Ok(report(&err)),
    };

    let position = position_from(args.at);
    if let Err(err) = document.add_section(&args.header, position) {
        return Ok(report(&err));
    }

    finish_edit(context, &document, &args.edit)
}

fn handle_add_line(context: &DocumentContext, args: AddLineArgs) -> Result<i32> {
    let mut document = match context.load(&args.edit.file) {
        Ok(document) => document,
        Err(err) => return Ok(report(&err)),
    };

    let position = position_from(args.at);
    if let Err(err) = document.add_line(args.section, &args.text, position) {
        return Ok(report(&err));
    }

    finish_edit(context, &document, &args.edit)
}

fn finish_edit(context: &DocumentContext, document: &Document, edit: &EditArgs) -> Result<i32> {
    if edit.dry_run {
        match context.preview(document) {
            Ok(Some(diff)) => print!("{diff}"),
            Ok(None) => println!("No changes (dry run)"),
            Err(err) => return Ok(report(&err)),
        }
        return Ok(ExitCode::Success as i32);
    }

    let target = edit.output.as_deref().unwrap_or(&edit.file);
    if let Err(err) = context.save_as(document, target) {
        return Ok(report(&err));
    }

    if !edit.quiet {
        println!("Updated {}", target.display());
    }
    Ok(ExitCode::Success as i32)
}

fn handle_check(context: &DocumentContext, args: CheckArgs) -> Result<i32> {
    let mut checked = 0usize;
    let mut failures = 0usize;

    for root in &args.paths {
        for absolute in markdown_files(&context.resolve(root)) {
            checked += 1;
            let path = relative_to_root(context, &absolute);
            match context.check_round_trip(&path) {
                Ok(None) => {
                    if !args.quiet {
                        println!("ok {}", path.display());
                    }
                }
                Ok(Some(diff)) => {
                    failures += 1;
                    println!("mismatch {}", path.display());
                    print!("{diff}");
                }
                Err(err) => {
                    failures += 1;
                    eprintln!("{err}");
                }
            }
        }
    }

    println!("checked {checked} files, {failures} failed");
    if failures > 0 {
        Ok(ExitCode::Mismatch as i32)
    } else {
        Ok(ExitCode::Success as i32)
    }
}

fn markdown_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![root.to_path_buf()];
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                eprintln!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect()
}

/// Path as the project root sees it, so diff headers and messages match what
/// the user typed. Files outside the root keep their absolute path.
fn relative_to_root(context: &DocumentContext, path: &Path) -> PathBuf {
    path.strip_prefix(context.root())
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn list_candidates(document: &Document, query: &str) {
    let candidates = document.suggest_headings(query, SUGGESTION_LIMIT);
    if !candidates.is_empty() {
        eprintln!("Candidate headings:");
        for heading in candidates {
            eprintln!("  - {heading}");
        }
    }
}

fn report(err: &ModelError) -> i32 {
    match err {
        ModelError::Io { path, source } => {
            eprintln!("I/O error on {}: {}", path.display(), source);
        }
        other => eprintln!("{other}"),
    }
    err.exit_code() as i32
}

fn render_value(value: &Value) -> Result<String> {
    Ok(match value {
        Value::String(text) => text.clone(),
        other => serde_yaml::to_string(other)?.trim_end().to_string(),
    })
}

fn level_from_depth(depth: usize) -> SectionLevel {
    if depth == 0 {
        SectionLevel::Null
    } else {
        SectionLevel::Heading(depth)
    }
}

fn position_from(at: Option<usize>) -> Position {
    at.map_or(Position::End, Position::At)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inspect and edit markdown files without disturbing their formatting",
    propagate_version = true
)]
struct Cli {
    /// Explicit configuration file (overrides discovered .markdown-model.toml)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed structure of a file
    Show(ShowArgs),
    /// Print a front matter value
    FrontMatter(FrontMatterArgs),
    /// Fuzzy-search section headings
    Search(SearchArgs),
    /// Insert a section
    AddSection(AddSectionArgs),
    /// Insert a line into a section
    AddLine(AddLineArgs),
    /// Verify that files survive a parse/write round trip unchanged
    Check(CheckArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Markdown file (relative to the project root)
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Emit the document model as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FrontMatterArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Key to look up
    #[arg(value_name = "KEY")]
    key: String,
    /// Value printed when the key is absent
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    default: Option<String>,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Characters that must appear in order in the heading
    #[arg(value_name = "QUERY")]
    query: String,
    /// Only match sections at this depth (0 for the leading section)
    #[arg(long, value_name = "N")]
    level: Option<usize>,
}

#[derive(Args)]
struct EditArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Print a diff instead of writing
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Write the result to this path instead of FILE
    #[arg(long, value_name = "PATH", conflicts_with = "dry_run")]
    output: Option<PathBuf>,
    /// Suppress the success message
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Args)]
struct AddSectionArgs {
    #[command(flatten)]
    edit: EditArgs,
    /// Header line stored verbatim, e.g. "## Notes"
    #[arg(value_name = "HEADER", allow_hyphen_values = true)]
    header: String,
    /// Insert before the section at this index (default: append)
    #[arg(long, value_name = "INDEX")]
    at: Option<usize>,
}

#[derive(Args)]
struct AddLineArgs {
    #[command(flatten)]
    edit: EditArgs,
    /// Index of the target section
    #[arg(value_name = "SECTION")]
    section: usize,
    /// Line text
    #[arg(value_name = "TEXT", allow_hyphen_values = true)]
    text: String,
    /// Insert before the line at this index (default: append)
    #[arg(long, value_name = "INDEX")]
    at: Option<usize>,
}

#[derive(Args)]
struct CheckArgs {
    /// Files or directories to scan for *.md
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,
    /// Only report mismatches
    #[arg(short = 'q', long)]
    quiet: bool,
}
