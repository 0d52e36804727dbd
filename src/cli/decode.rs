use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::Result;

use crate::archiver::{ArchiveError, Archiver};
use crate::cli::{DecodeArgs, SizeReport};

pub fn decode(args: DecodeArgs) -> Result<()> {
    let source = File::open(&args.input).map_err(ArchiveError::OpenSource)?;
    let sink = File::create(&args.output).map_err(ArchiveError::OpenSink)?;

    let mut archiver = Archiver::new(BufReader::new(source), BufWriter::new(sink));
    archiver.decode()?;

    SizeReport {
        original_size: archiver.original_size(),
        payload_size: archiver.payload_size(),
        header_size: archiver.header_size(),
    }
    .print(args.json)
}
