//! strataconf CLI - thin command-line wrapper over strataconf-core
//!
//! Usage:
//!   strataconf get config.ini server host
//!   strataconf sections config.ini
//!   strataconf dump config.ini --format json
//!   strataconf check config.ini --strict

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use strataconf_core::{Config, ConfigOptions};

/// strataconf - layered INI configuration files with interpolation
#[derive(Parser)]
#[command(name = "strataconf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a single option value
    Get {
        /// Configuration file
        file: PathBuf,

        /// Section name (use DEFAULT for the default section)
        section: String,

        /// Option name
        option: String,

        /// Expand %(name)s placeholders in the value
        #[arg(short, long)]
        interpolate: bool,

        /// Value to print when the option is not found
        #[arg(short, long)]
        default: Option<String>,
    },

    /// List section names, default section excluded
    Sections {
        /// Configuration file
        file: PathBuf,
    },

    /// Re-emit the configuration in normalized form
    Dump {
        /// Configuration file
        file: PathBuf,

        /// Output format: ini, json
        #[arg(short, long, default_value = "ini")]
        format: String,

        /// Key/value delimiter for ini output
        #[arg(long, default_value = "=")]
        delimiter: char,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse-only syntax check
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Reject duplicate sections and option keys
        #[arg(short, long)]
        strict: bool,
    },
}

/// Run the CLI and return the process exit code
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            file,
            section,
            option,
            interpolate,
            default,
        } => cmd_get(&file, &section, &option, interpolate, default),
        Commands::Sections { file } => cmd_sections(&file),
        Commands::Dump {
            file,
            format,
            delimiter,
            output,
        } => cmd_dump(&file, &format, delimiter, output),
        Commands::Check { files, strict } => cmd_check(&files, strict),
    }
}

fn load(file: &PathBuf) -> Result<Config, ExitCode> {
    Config::from_file(file).map_err(|e| {
        eprintln!("{} {}", "error:".red().bold(), e);
        ExitCode::FAILURE
    })
}

fn cmd_get(
    file: &PathBuf,
    section: &str,
    option: &str,
    interpolate: bool,
    default: Option<String>,
) -> ExitCode {
    let config = match load(file) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = if interpolate {
        config.get_interpolated(section, option)
    } else {
        config.get(section, option)
    };

    match result {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(_) if default.is_some() => {
            println!("{}", default.unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_sections(file: &PathBuf) -> ExitCode {
    let config = match load(file) {
        Ok(c) => c,
        Err(code) => return code,
    };

    for name in config.sections() {
        println!("{}", name);
    }
    ExitCode::SUCCESS
}

fn cmd_dump(file: &PathBuf, format: &str, delimiter: char, output: Option<PathBuf>) -> ExitCode {
    let config = match load(file) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let rendered = match format {
        "ini" => config.dump(delimiter),
        "json" => match config.to_json() {
            Ok(json) => json,
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                return ExitCode::FAILURE;
            }
        },
        other => {
            eprintln!(
                "{} unknown format '{}' (expected ini or json)",
                "error:".red().bold(),
                other
            );
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, rendered) {
                eprintln!(
                    "{} failed to write '{}': {}",
                    "error:".red().bold(),
                    path.display(),
                    e
                );
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        None => {
            print!("{}", rendered);
            ExitCode::SUCCESS
        }
    }
}

fn cmd_check(files: &[PathBuf], strict: bool) -> ExitCode {
    let mut failed = false;

    for file in files {
        let options = ConfigOptions::default().with_strict(strict);
        match Config::from_file_with_options(file, options) {
            Ok(_) => println!("{} {}", "ok:".green().bold(), file.display()),
            Err(e) => {
                println!("{} {}: {}", "fail:".red().bold(), file.display(), e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
