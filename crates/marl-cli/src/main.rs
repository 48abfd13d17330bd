use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use marl_parser::ParseOptions;
use serde::Serialize;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "marl")]
#[command(about = "Lenient HTML parser for build tooling")]
#[command(version)]
struct Cli {
    /// JSON file with parse options (voidTags, closingTags, childlessTags,
    /// closingTagAncestorBreakers, includePositions)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token list of an HTML file as JSON
    Lex {
        /// Input file, or `-` for stdin
        path: String,
    },

    /// Print the parsed tree of an HTML file as JSON
    Parse {
        /// Input file, or `-` for stdin
        path: String,

        /// Include source positions on every node
        #[arg(long)]
        positions: bool,
    },

    /// Parse an HTML file and serialize it back to HTML
    Render {
        /// Input file, or `-` for stdin
        path: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = load_options(cli.config.as_deref())?;

    let output = match cli.command {
        Command::Lex { path } => cmd_lex(&path, &options, cli.compact)?,
        Command::Parse { path, positions } => {
            let mut options = options;
            options.include_positions |= positions;
            cmd_parse(&path, &options, cli.compact)?
        }
        Command::Render { path } => cmd_render(&path, &options)?,
    };

    println!("{output}");
    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<ParseOptions, CliError> {
    let Some(path) = path else {
        return Ok(ParseOptions::default());
    };

    let display_path = path.display().to_string();
    let text = read_file(path, &display_path)?;
    let options = serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: display_path.clone(),
        source,
    })?;
    debug!(config = %display_path, "loaded parse options");
    Ok(options)
}

fn read_source(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|source| CliError::Io {
                path: "<stdin>".into(),
                source,
            })?;
        return Ok(source);
    }
    read_file(Path::new(path), path)
}

fn read_file(path: &Path, display: &str) -> Result<String, CliError> {
    if !path.exists() {
        return Err(CliError::NotFound(display.to_string()));
    }
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: display.to_string(),
        source,
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String, CliError> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn cmd_lex(path: &str, options: &ParseOptions, compact: bool) -> Result<String, CliError> {
    let source = read_source(path)?;
    let tokens = marl_lexer::lex(&source, &options.tags);
    debug!(path, tokens = tokens.len(), "lexed source");
    to_json(&tokens, compact)
}

fn cmd_parse(path: &str, options: &ParseOptions, compact: bool) -> Result<String, CliError> {
    let source = read_source(path)?;
    let nodes = marl_parser::parse(&source, options);
    debug!(path, nodes = nodes.len(), "parsed source");
    to_json(&nodes, compact)
}

fn cmd_render(path: &str, options: &ParseOptions) -> Result<String, CliError> {
    let source = read_source(path)?;
    let nodes = marl_parser::parse(&source, options);
    Ok(marl_stringify::to_html(&nodes, &options.tags))
}
