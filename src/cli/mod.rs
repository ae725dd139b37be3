//! Demonstration command-line interface.
//!
//! A thin `clap`-derived argument surface over the library's streaming API:
//! compress/decompress mode, level, thread count, checksum toggle, and
//! verbosity, plus an input/output file pair that defaults to stdin/stdout.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Level, Threads};

/// `zxc` — compress or decompress a file (or stdin/stdout) using the ZXC
/// codec.
#[derive(Debug, Parser)]
#[command(name = "zxc", version, about = "Block-oriented multithreaded compressor")]
pub struct Args {
    /// Compress the input (default mode).
    #[arg(short = 'z', long = "compress", conflicts_with = "decompress")]
    pub compress: bool,

    /// Decompress the input.
    #[arg(short = 'd', long = "decompress")]
    pub decompress: bool,

    /// Compression level, 1 (fastest) through 5 (most effort).
    #[arg(short = '1', long = "level-1", hide = true, action = clap::ArgAction::SetTrue)]
    level_1: bool,
    #[arg(short = '2', long = "level-2", hide = true, action = clap::ArgAction::SetTrue)]
    level_2: bool,
    #[arg(short = '3', long = "level-3", hide = true, action = clap::ArgAction::SetTrue)]
    level_3: bool,
    #[arg(short = '4', long = "level-4", hide = true, action = clap::ArgAction::SetTrue)]
    level_4: bool,
    #[arg(short = '5', long = "level-5", hide = true, action = clap::ArgAction::SetTrue)]
    level_5: bool,

    /// Number of worker threads (0 = auto).
    #[arg(short = 'T', long = "threads", default_value_t = 0)]
    pub threads: i64,

    /// Enable the per-block checksum.
    #[arg(short = 'C', long = "checksum", conflicts_with = "no_checksum")]
    pub checksum: bool,

    /// Disable the per-block checksum.
    #[arg(short = 'N', long = "no-checksum")]
    pub no_checksum: bool,

    /// Verbose logging.
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all but fatal errors.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Input file. Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Output file. Writes stdout when omitted.
    pub output: Option<PathBuf>,
}

impl Args {
    /// Resolves the `-1`..`-5` flags to a `Level`, defaulting to
    /// `Level::DEFAULT` when none were given. The highest flag set wins if
    /// the caller somehow passes more than one (clap allows repetition of
    /// distinct short flags on the same invocation).
    pub fn level(&self) -> Level {
        if self.level_5 {
            Level::new(5)
        } else if self.level_4 {
            Level::new(4)
        } else if self.level_3 {
            Level::new(3)
        } else if self.level_2 {
            Level::new(2)
        } else if self.level_1 {
            Level::new(1)
        } else {
            Level::DEFAULT
        }
    }

    pub fn threads(&self) -> Threads {
        Threads::from_signed(self.threads)
    }

    /// `-N` always wins over `-C` when both are somehow set; otherwise `-C`
    /// turns the checksum on and its absence leaves it off, matching the
    /// original CLI's `checksum = 0` default (`main.c`).
    pub fn checksum_enabled(&self) -> bool {
        self.checksum && !self.no_checksum
    }
}
