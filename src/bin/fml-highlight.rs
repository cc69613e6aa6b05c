//! Command-line interface for fml-highlight
//!
//! Usage:
//!   fml-highlight tokenize [PATH] [--language <name>] [--format <format>] [--config <file>]
//!   fml-highlight list-languages
//!   fml-highlight list-formats
//!   fml-highlight check <GRAMMAR_FILE>
//!
//! Settings come from the built-in defaults, then `fml-highlight.toml` in the working
//! directory (if present), then `--config`, then the command line flags.

use clap::{Arg, ArgMatches, Command};
use fml_highlight::config::{HighlightConfig, Loader};
use fml_highlight::formats::FormatRegistry;
use fml_highlight::languages::{Language, LanguageRegistry};
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOCAL_CONFIG: &str = "fml-highlight.toml";

fn main() {
    init_logging();

    let matches = Command::new("fml-highlight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Syntax highlighting lexer for the FHIR Mapping Language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokenize")
                .about("Tokenize a source file and print the token tree")
                .arg(
                    Arg::new("path")
                        .help("Source file to tokenize; reads stdin when absent or '-'")
                        .index(1),
                )
                .arg(
                    Arg::new("language")
                        .long("language")
                        .short('l')
                        .help("Language name or alias (e.g., 'fml', 'mapping')"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'tree', 'json', 'html')"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Additional configuration file"),
                ),
        )
        .subcommand(Command::new("list-languages").about("List available languages"))
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .subcommand(
            Command::new("check")
                .about("Validate a YAML grammar definition")
                .arg(
                    Arg::new("grammar")
                        .help("Path to the grammar definition")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("tokenize", tokenize_matches)) => handle_tokenize_command(tokenize_matches),
        Some(("list-languages", _)) => handle_list_languages_command(),
        Some(("list-formats", _)) => handle_list_formats_command(),
        Some(("check", check_matches)) => {
            let path = check_matches
                .get_one::<String>("grammar")
                .map(String::as_str)
                .unwrap_or_default();
            handle_check_command(path)
        }
        _ => unreachable!(),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

/// Log to stderr, `warn` unless `RUST_LOG` says otherwise
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<HighlightConfig, String> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for key in ["language", "format"] {
        if let Some(value) = matches.get_one::<String>(key) {
            loader = loader
                .set_override(&format!("highlight.{key}"), value.as_str())
                .map_err(|e| e.to_string())?;
        }
    }
    loader
        .build()
        .map_err(|e| format!("Invalid configuration: {}", e))
}

/// Handle the tokenize command
fn handle_tokenize_command(matches: &ArgMatches) -> Result<(), String> {
    let config = load_config(matches)?;
    let languages = LanguageRegistry::from_config(&config).map_err(|e| e.to_string())?;
    let formats = FormatRegistry::with_defaults();

    let language = languages
        .get(&config.highlight.language)
        .ok_or_else(|| format!("Unknown language '{}'", config.highlight.language))?;
    let formatter = formats
        .formatter(&config.highlight.format)
        .map_err(|e| e.to_string())?;

    let source = read_source(matches.get_one::<String>("path").map(String::as_str))?;
    debug!(language = language.name(), bytes = source.len(), "tokenizing");

    let tokens = language.tokenize(&source);
    let output = formatter.serialize(&tokens).map_err(|e| e.to_string())?;

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn read_source(path: Option<&str>) -> Result<String, String> {
    match path {
        None | Some("-") => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("Error reading stdin: {}", e))?;
            Ok(source)
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading file '{}': {}", path, e)),
    }
}

/// Handle the list-languages command
fn handle_list_languages_command() -> Result<(), String> {
    let config = Loader::new()
        .with_optional_file(LOCAL_CONFIG)
        .build()
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    let registry = LanguageRegistry::from_config(&config).map_err(|e| e.to_string())?;

    println!("Available languages:\n");
    for language in registry.list() {
        if language.aliases().is_empty() {
            println!("  {}", language.name());
        } else {
            println!("  {} ({})", language.name(), language.aliases().join(", "));
        }
    }
    Ok(())
}

/// Handle the list-formats command
fn handle_list_formats_command() -> Result<(), String> {
    let registry = FormatRegistry::with_defaults();

    println!("Available formats:\n");
    for formatter in registry.formatters() {
        println!("  {}", formatter.name());
        println!("    {}", formatter.description());
    }
    Ok(())
}

/// Handle the check command
fn handle_check_command(path: &str) -> Result<(), String> {
    let language = Language::from_path(path).map_err(|e| e.to_string())?;
    println!(
        "{}: {} token types, ok",
        language.name(),
        language.grammar().len()
    );
    Ok(())
}
