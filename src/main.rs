//! sprd - command-line front end for the spreadsheet engine

mod config;

use anyhow::{Context, anyhow};
use sprd_core::{FILE_EXTENSION, Spreadsheet};
use sprd_engine::engine::format_value;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: sprd [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.sprd)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <NAME=CONTENT>  Set a cell (can be repeated)");
    eprintln!("  -o, --output <FILE>       Save to this file instead of FILE");
    eprintln!("  --config <FILE>           Load settings from this TOML file");
    eprintln!("  -h, --help                Print help");
}

struct Options {
    file_path: Option<PathBuf>,
    assignments: Vec<String>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

enum Parsed {
    Run(Options),
    Help,
}

fn parse_args(args: &[String]) -> anyhow::Result<Parsed> {
    let mut options = Options {
        file_path: None,
        assignments: Vec::new(),
        output_file: None,
        config_file: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-s" | "--set" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| anyhow!("--set requires NAME=CONTENT"))?;
                options.assignments.push(value.clone());
            }
            "-o" | "--output" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| anyhow!("--output requires a file path"))?;
                options.output_file = Some(PathBuf::from(value));
            }
            "--config" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_file = Some(PathBuf::from(value));
            }
            arg if arg.starts_with('-') => return Err(anyhow!("Unknown option: {}", arg)),
            arg => {
                if options.file_path.is_some() {
                    return Err(anyhow!("Unexpected argument: {}", arg));
                }
                options.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(Parsed::Run(options))
}

/// Paths given without an extension get the `.sprd` one.
fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(FILE_EXTENSION)
    } else {
        path
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    let (config, warnings) = config::load_config(options.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    let rules = config.rules();

    let file_path = options.file_path.map(with_default_extension);
    let output_file = options.output_file.map(with_default_extension);

    let mut sheet = match &file_path {
        Some(path) if path.exists() => Spreadsheet::open(path, rules)
            .with_context(|| format!("failed to open {}", path.display()))?,
        _ => Spreadsheet::with_rules(rules),
    };

    for assignment in &options.assignments {
        let (name, content) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected NAME=CONTENT, got {:?}", assignment))?;
        sheet
            .set_contents_of_cell(name.trim(), content)
            .with_context(|| format!("failed to set {}", name.trim()))?;
    }

    let mut names: Vec<String> = sheet.nonempty_cell_names().collect();
    names.sort();
    for name in &names {
        let contents = sheet.cell_string_form(name)?;
        let value = sheet.cell_value(name)?;
        println!("{}\t{}\t{}", name, contents, format_value(&value));
    }

    let explicit_output = output_file.is_some();
    if let Some(target) = output_file.or(file_path)
        && (explicit_output || sheet.changed())
    {
        sheet
            .save(&target)
            .with_context(|| format!("failed to save {}", target.display()))?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(Parsed::Run(options)) => options,
        Ok(Parsed::Help) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
