//! apexdoc — extract the namespace / class / method tree from a plain-text
//! Apex reference manual.
//!
//! - **stdin mode**: `apexdoc < reference.txt > reference.json`
//! - **file mode**: `apexdoc -o out/ -f markdown manuals/*.txt`

use anyhow::{Context, Result};
use apexdoc::render::{self, Renderer};
use apexdoc::Patterns;
use clap::Parser;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "apexdoc",
    version,
    about = "Extract namespaces, classes, methods and DML statements from a plain-text Apex reference manual"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), markdown
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// TOML file overriding the heading and marker patterns
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let patterns = match &cli.patterns {
        Some(path) => Patterns::load(path)
            .with_context(|| format!("failed to load patterns from {}", path.display()))?,
        None => Patterns::apex().clone(),
    };
    let renderer = render::create_renderer(&cli.format)?;

    if cli.files.is_empty() {
        return stdin_mode(&patterns, renderer.as_ref());
    }

    file_mode(&cli, &patterns, renderer.as_ref())
}

/// Logs go to stderr so stdout stays clean for the rendered document.
/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// stdin mode: read from stdin, write the rendered document to stdout.
fn stdin_mode(patterns: &Patterns, renderer: &dyn Renderer) -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;

    let doc = apexdoc::parse_with(&decode(&input, "stdin"), patterns);
    print!("{}", renderer.render(&doc)?);
    Ok(())
}

/// file mode: one output file per input, named after the input's stem.
fn file_mode(cli: &Cli, patterns: &Patterns, renderer: &dyn Renderer) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;
    let ext = renderer.file_extension();

    for path in &input_files {
        let content = match fs::read(path) {
            Ok(bytes) => decode(&bytes, &path.display().to_string()),
            Err(e) => {
                warn!("cannot read {}: {}; writing an empty document", path.display(), e);
                String::new()
            }
        };
        let doc = apexdoc::parse_with(&content, patterns);

        let name = derive_output_name(&path.to_string_lossy());
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, renderer.render(&doc)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(input = %path.display(), output = %out_path.display(), "written");
    }

    Ok(())
}

/// Decode extracted text, replacing invalid UTF-8 sequences with U+FFFD.
fn decode(bytes: &[u8], source: &str) -> String {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!("{} is not valid UTF-8; invalid bytes were replaced", source);
    }
    text.into_owned()
}

/// File extensions recognized as extracted manual text.
const SUPPORTED_EXTENSIONS: &[&str] = &["txt"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            files.extend(entries.flatten().map(|e| e.path()).filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
            }));
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from an input path.
/// "manuals/apex_reference.txt" → "apex_reference"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit(['/', '\\']).next().unwrap_or(source);
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}
