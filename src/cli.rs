//! cli component of the huffpack project.
//!
//! Thin plumbing around the archiver core: parse arguments, open the
//! source and sink files, run one directional operation, and report the
//! three size counters (original size, packed payload size, header size)
//! the way the original tool prints them, one per line. `--json` swaps
//! the report for a single JSON object for scripting.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

pub mod decode;
pub mod encode;

/// CLI arguments for the huffpack application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands for huffpack
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode (compress) a file
    #[command(alias = "enc")]
    Encode(EncodeArgs),

    /// Decode (decompress) a file
    #[command(alias = "dec")]
    Decode(DecodeArgs),

    /// Round-trip a file in memory and report the compression ratio
    Test(TestArgs),
}

/// Arguments specific to the encode command
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Path to the input file
    pub input: PathBuf,

    /// Path for the compressed output file
    pub output: PathBuf,

    /// Print the size report as JSON instead of one counter per line
    #[arg(long)]
    pub json: bool,
}

/// Arguments specific to the decode command
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Path to the compressed input file
    pub input: PathBuf,

    /// Path for the restored output file
    pub output: PathBuf,

    /// Print the size report as JSON instead of one counter per line
    #[arg(long)]
    pub json: bool,
}

/// Arguments specific to the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Path to the file to round-trip
    pub input: PathBuf,
}

/// The three counters every archive operation exposes.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct SizeReport {
    pub original_size: u32,
    pub payload_size: u32,
    pub header_size: u32,
}

impl SizeReport {
    pub fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string(self)?);
        } else {
            println!("{}", self.original_size);
            println!("{}", self.payload_size);
            println!("{}", self.header_size);
        }
        Ok(())
    }
}
