//! Resolve creation dates and signers for a batch of PDFs.
//!
//! Usage:
//!   pdf-dates report.pdf scan.PDF notes.txt
//!   pdf-dates --json contracts/*.pdf
//!   RUST_LOG=debug pdf-dates --strict signed.pdf

use clap::Parser;
use pdf_dates::{ExtractorOptions, MetadataRecord, MetadataRecordBuilder};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pdf-dates", version, about = "Resolve PDF creation dates and signers")]
struct Args {
    /// Files to inspect, reported in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print a JSON array instead of a table
    #[arg(long)]
    json: bool,

    /// Never fall back to the filesystem creation time
    #[arg(long)]
    no_fs_fallback: bool,

    /// Only trust declared metadata: no filesystem fallback, no visible-signature heuristics
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn options(&self) -> ExtractorOptions {
        let options = if self.strict {
            ExtractorOptions::strict()
        } else {
            ExtractorOptions::default()
        };
        if self.no_fs_fallback {
            options.with_filesystem_probe(false)
        } else {
            options
        }
    }
}

/// Error rows get a leading `!` so they stand out in a terminal.
fn write_table(out: &mut impl Write, records: &[MetadataRecord]) -> io::Result<()> {
    writeln!(out, " \t{}", MetadataRecord::HEADERS.join("\t"))?;
    for record in records {
        let marker = if record.is_error() { "!" } else { " " };
        writeln!(out, "{}\t{}", marker, record.columns().join("\t"))?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let builder = MetadataRecordBuilder::with_options(args.options());
    let records = builder.build_batch(&args.files);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if args.json {
        serde_json::to_writer_pretty(&mut out, &records)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(out))
    } else {
        write_table(&mut out, &records)
    };

    if let Err(e) = written {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("Failed to write output: {}", e);
            std::process::exit(1);
        }
    }
}
