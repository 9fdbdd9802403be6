//! enumr CLI
//!
//! Usage:
//!   enumr --type <NAMES> [OPTIONS] [PATHS]...
//!
//! Options:
//!   -t, --type <NAMES>          Comma-separated type names (required)
//!   -f, --format <FORMAT>       Casing of encodings (snake_case, camelCase, ...)
//!   -o, --output <PATH>         Output file or directory
//!   -m, --marshal-field <NAME>  Encode by this field instead of the member name
//!   -z, --zero                  Decode the empty string to the zero value
//!       --dry-run               Print the source instead of writing it
//!   -c, --config <FILE>         Config file (default: enumr.toml in the package)
//!   -h, --help                  Print help

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use enumr::config::Config;
use enumr::logging::init_tracing;
use enumr::{generate_dir, output_filename, Casing, GenerateRequest};

#[derive(Parser)]
#[command(name = "enumr")]
#[command(about = "Generate text conversions for Go enum-like struct types")]
struct Cli {
    /// Package directory, or files whose directory is the package
    paths: Vec<PathBuf>,

    /// Comma-separated list of type names
    #[arg(short, long = "type", value_delimiter = ',', required = true)]
    types: Vec<String>,

    /// Casing convention for encodings
    #[arg(short, long)]
    format: Option<Casing>,

    /// Output file, or a directory receiving the default file name
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field whose value is the text encoding
    #[arg(short, long)]
    marshal_field: Option<String>,

    /// Accept the empty string as the zero value when decoding
    #[arg(short, long)]
    zero: bool,

    /// Print the generated source to stdout instead of writing a file
    #[arg(long)]
    dry_run: bool,

    /// Config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// The package directory the arguments point at
fn package_dir(paths: &[PathBuf]) -> PathBuf {
    match paths {
        [] => PathBuf::from("."),
        [single] if single.is_dir() => single.clone(),
        [first, ..] => match first.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

fn load_config(cli: &Cli, dir: &Path) -> Result<Config, String> {
    match &cli.config {
        Some(path) => Config::from_file(path)
            .map_err(|e| format!("Error loading config '{}': {}", path.display(), e)),
        None => Config::discover(dir)
            .map(Option::unwrap_or_default)
            .map_err(|e| format!("Error loading config in '{}': {}", dir.display(), e)),
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let dir = package_dir(&cli.paths);
    let config = load_config(&cli, &dir)?;

    let mut request = GenerateRequest::new(cli.types.iter().map(|t| t.trim()))
        .with_casing(cli.format.or(config.format).unwrap_or_default())
        .with_accept_zero(cli.zero || config.zero.unwrap_or(false));
    if let Some(field) = cli.marshal_field.or(config.marshal_field) {
        request = request.with_marshal_field(field);
    }

    let generated = match generate_dir(&dir, &request) {
        Ok(Some(generated)) => generated,
        Ok(None) => {
            tracing::info!("nothing to generate");
            return Ok(());
        }
        Err(e) => return Err(format!("Error: {}", e.report())),
    };

    if cli.dry_run {
        print!("{}", generated.source);
        return Ok(());
    }

    let first_type = request.types.first().map(String::as_str).unwrap_or_default();
    let output = cli.output.or(config.output);
    let path = output_filename(&dir, first_type, output.as_deref());
    fs::write(&path, &generated.source)
        .map_err(|e| format!("Error writing file '{}': {}", path.display(), e))?;
    tracing::info!(file = %path.display(), "enum code generated");

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_dir() {
        assert_eq!(package_dir(&[]), PathBuf::from("."));
        assert_eq!(
            package_dir(&[PathBuf::from("pkg/a.go"), PathBuf::from("pkg/b.go")]),
            PathBuf::from("pkg")
        );
        assert_eq!(package_dir(&[PathBuf::from("a.go")]), PathBuf::from("."));

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(package_dir(&[dir.path().to_path_buf()]), dir.path());
    }

    #[test]
    fn test_cli_splits_types() {
        let cli = Cli::try_parse_from(["enumr", "--type", "A, B", "--format", "snake_case", "--zero"])
            .unwrap();
        assert_eq!(cli.types, vec!["A".to_string(), " B".to_string()]);
        assert_eq!(cli.format, Some(Casing::Snake));
        assert!(cli.zero);
        assert!(Cli::try_parse_from(["enumr", "--format", "kebab"]).is_err());
    }
}
