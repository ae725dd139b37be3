//! Binary entry point for the `zxc` command-line tool.
//!
//! Thin glue: parse arguments, open input/output, invoke the streaming
//! pipeline, report the result. All compression logic lives in the `zxc`
//! library; this binary exists to exercise it from a shell the way
//! `examples/original_source/src/cli/main.c`'s `main()` does.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use zxc::cli::Args;
use zxc::{stream_compress, stream_decompress, ZxcError};

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();
    // A second `main` invoked in-process (tests) may already have installed
    // a subscriber; that's not fatal, just means this call's level is moot.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn open_input(path: &Option<PathBuf>) -> io::Result<Box<dyn Read>> {
    match path {
        Some(p) => Ok(Box::new(File::open(p)?)),
        None => Ok(Box::new(io::stdin())),
    }
}

fn open_output(path: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(p) => Ok(Box::new(File::create(p)?)),
        None => Ok(Box::new(io::stdout())),
    }
}

fn run(args: Args) -> Result<u64, ZxcError> {
    let threads = args.threads().resolve();
    let checksum = args.checksum_enabled();

    let mut input = open_input(&args.input)?;
    let mut output = open_output(&args.output)?;

    if args.decompress {
        info!(threads, checksum, "decompressing stream");
        stream_decompress(&mut input, Some(&mut output), threads, checksum)
    } else {
        let level = args.level();
        info!(threads, checksum, level = level.get(), "compressing stream");
        stream_compress(&mut input, Some(&mut output), threads, level, checksum)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(bytes) => {
            info!(bytes, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
