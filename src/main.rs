//! # chatsift CLI
//!
//! Command-line interface for the chatsift library.

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::process;

use clap::Parser as ClapParser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chatsift::cli::{Args, OutputFormat};
use chatsift::core::ProcessResult;
use chatsift::{ChatsiftError, Pipeline};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "chatsift=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), ChatsiftError> {
    let bytes = read_input(args)?;
    info!(source = %args.source, bytes = bytes.len(), "read export");

    let pipeline = Pipeline::new(args.options());
    let result = pipeline.process_bytes(&bytes, args.source.into())?;

    for warning in &result.warnings {
        warn!("{}", warning);
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_result(&mut writer, &result, args.format)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_result(&mut writer, &result, args.format)?;
        }
    }
    Ok(())
}

fn read_input(args: &Args) -> Result<Vec<u8>, ChatsiftError> {
    if args.reads_stdin() {
        let mut bytes = Vec::new();
        io::stdin().lock().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        Ok(fs::read(&args.input)?)
    }
}

fn write_result<W: Write>(
    writer: &mut W,
    result: &ProcessResult,
    format: OutputFormat,
) -> Result<(), ChatsiftError> {
    let written = match format {
        OutputFormat::Json => serde_json::to_writer(&mut *writer, result),
        OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *writer, result),
    };
    written.map_err(io::Error::from)?;
    writeln!(writer)?;
    Ok(())
}
