use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use ecword::{Error, Result, Word};

pub const DEFAULT_STORE_CAPACITY: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "ecword",
    version,
    about = "Encode and decode 64-bit electron configuration words"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, help = "Debug logging (RUST_LOG overrides)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack occupancies into a word
    Encode {
        #[arg(long, default_value_t = 0, help = "Layout index")]
        layout: u8,
        #[arg(
            long,
            value_delimiter = ',',
            allow_negative_numbers = true,
            conflicts_with = "assignments",
            help = "All values in layout order, comma separated"
        )]
        values: Option<Vec<i64>>,
        #[arg(help = "Occupancies as label=value (e.g. 3d=5); unnamed fields are 0")]
        assignments: Vec<String>,
    },
    /// Unpack a word (decimal, 0x-hex or 64-digit bitstring)
    Decode {
        word: String,
        #[arg(long, help = "Exit with status 2 when the checksum is implausible")]
        strict: bool,
    },
    /// Show registered layouts
    Layout { index: Option<u8> },
    /// Mmap-backed word files
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Append words to a store, creating it if needed
    Append {
        path: PathBuf,
        #[arg(required = true)]
        words: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_STORE_CAPACITY, help = "Capacity in words for a new store")]
        capacity: usize,
    },
    /// Decode every word in a store
    Dump { path: PathBuf },
}

/// Parse `label=value`. Value tetap i64 supaya angka negatif bisa
/// dilaporkan sebagai `ValueOutOfRange` oleh layout.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(&str, i64)> {
    let (label, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected label=value, got {raw:?}"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .with_context(|| format!("value for {label} is not an integer"))?;
    Ok((label.trim(), value))
}

/// Word dari teks: `0x` hex, bitstring biner panjang, atau desimal.
pub fn parse_word(raw: &str) -> Result<Word> {
    let raw = raw.trim();

    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16)
            .map(Word::from_u64)
            .map_err(|e| Error::MalformedWord(format!("{raw:?}: {e}")));
    }

    // u64 desimal paling panjang 20 digit; lebih dari itu pasti bitstring
    let binary = !raw.is_empty() && raw.bytes().all(|b| b == b'0' || b == b'1');
    if raw.len() > 20 || (binary && raw.len() == 64) {
        return Word::from_bits(raw);
    }

    raw.parse::<u64>()
        .map(Word::from_u64)
        .map_err(|e| Error::MalformedWord(format!("{raw:?}: {e}")))
}
