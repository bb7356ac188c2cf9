use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use simplexml::{Document, Path, WriteConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "simplexml",
    version,
    about = "Pretty-print an XML document or select nodes from it"
)]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Path query such as `book/title`, `/library/*` or `a/b | c`
    #[arg(short, long, value_name = "EXPR")]
    query: Option<String>,
    /// Label for the document in log output (defaults to the file stem)
    #[arg(short, long)]
    name: Option<String>,
    /// Emit the XML declaration when writing the whole document
    #[arg(long)]
    declaration: bool,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let input = read_input(&args.input)?;
    let mut doc = Document::from_bytes(&input).context("failed to parse input")?;
    if let Some(name) = args.name.clone().or_else(|| file_stem(&args.input)) {
        doc.set_name(name);
    }
    info!(name = doc.name().unwrap_or("stdin"), "document loaded");

    let output = match &args.query {
        Some(expr) => render_matches(&doc, expr)?,
        None => {
            let config = if args.declaration {
                WriteConfig::with_declaration()
            } else {
                WriteConfig::default()
            };
            doc.to_xml_string_with_config(&config)?
        }
    };

    write_output(&args.output, &output)?;
    Ok(())
}

/// Each selected node is written as its own fragment
fn render_matches(doc: &Document, expr: &str) -> Result<String> {
    let path = Path::parse(expr);
    let nodes = path.select(doc.root());
    debug!(query = %path, matched = nodes.len(), "query evaluated");

    let mut fragments = Vec::with_capacity(nodes.len());
    for node in nodes {
        let fragment = node
            .to_xml_string()
            .with_context(|| format!("failed to serialize match of `{expr}`"))?;
        fragments.push(fragment);
    }
    Ok(fragments.join("\n"))
}

fn read_input(path: &Option<PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.iter().all(u8::is_ascii_whitespace) {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

/// An empty result still truncates the output file
fn write_output(path: &Option<PathBuf>, data: &str) -> Result<()> {
    let data = if data.is_empty() {
        String::new()
    } else {
        format!("{data}\n")
    };
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(data.as_bytes())
                .context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn file_stem(path: &Option<PathBuf>) -> Option<String> {
    let stem = path.as_ref()?.file_stem()?;
    Some(stem.to_string_lossy().into_owned())
}
