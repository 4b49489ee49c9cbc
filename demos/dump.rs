//! Command-line demo: parse a `.smali` file, optionally run the round-trip
//! validator, and print the reconstructed source or a requested query.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use smali::SmaliFile;

#[derive(Parser)]
#[command(name = "smali-dump", about = "Parse and reprint a Smali source file")]
struct Args {
    /// Path to a `.smali` file.
    path: PathBuf,

    /// Run the round-trip validator and log any warnings.
    #[arg(long)]
    validate: bool,

    /// Print only methods with this name instead of the whole file.
    #[arg(long)]
    find_method: Option<String>,

    /// Print only the field with this name instead of the whole file.
    #[arg(long)]
    find_field: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let file = match SmaliFile::from_path(&args.path) {
        Ok(file) => file,
        Err(err) => {
            tracing::error!(path = %args.path.display(), %err, "failed to parse");
            return ExitCode::FAILURE;
        }
    };

    if args.validate {
        match file.validate() {
            Ok(warnings) => {
                for warning in warnings {
                    tracing::warn!(%warning, "round-trip warning");
                }
            }
            Err(err) => {
                tracing::error!(%err, "round-trip validation failed");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(name) = &args.find_method {
        for item in file.find_methods(name) {
            print_item(item);
        }
        return ExitCode::SUCCESS;
    }

    if let Some(name) = &args.find_field {
        match file.find_field(name) {
            Some(item) => print_item(item),
            None => tracing::warn!(field = %name, "field not found"),
        }
        return ExitCode::SUCCESS;
    }

    match file.to_source_string() {
        Ok(text) => println!("{text}"),
        Err(err) => {
            tracing::error!(%err, "failed to reprint");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn print_item(item: &smali::Item) {
    match item {
        smali::Item::Statement(s) => println!("{}", s.serialize()),
        smali::Item::Block(b) => {
            for s in b.flatten() {
                println!("{}", s.serialize());
            }
        }
    }
}
