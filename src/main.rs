//! ecword CLI
//!
//! Usage:
//!   ecword encode 1s=2 2s=2 2p=6 3s=1
//!   ecword encode --layout 0 --values 0,0,...,2
//!   ecword decode 0xEA
//!   ecword store append words.dat 234 0xEA
//!   ecword store dump words.dat

mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{parse_assignment, parse_word, Cli, Commands, StoreCommands};
use ecword::{Codec, DecodeReport, LayoutDefinition, Word, WordStore};

/// Exit status for a decode that succeeded with warnings under `--strict`
const EXIT_IMPLAUSIBLE: u8 = 2;

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Ignore error: subscriber mungkin sudah terpasang
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Hanya layout kanonik; layout ekstensi didaftarkan di kode, bukan dari file
    let codec = Codec::canonical();
    let json = cli.json;

    match cli.command {
        Commands::Encode {
            layout,
            values,
            assignments,
        } => {
            let word = encode(&codec, layout, values, &assignments)?;
            print_word(word, json);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Decode { word, strict } => {
            let word = parse_word(&word)?;
            let report = codec.decode(word)?;
            print_report(word, &report, json);
            if strict && !report.is_plausible() {
                return Ok(ExitCode::from(EXIT_IMPLAUSIBLE));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Layout { index } => {
            let layouts: Vec<&LayoutDefinition> = match index {
                Some(index) => vec![&**codec.registry().lookup(index)?],
                None => codec.registry().iter().map(|l| &**l).collect(),
            };
            print_layouts(&layouts, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Store { command } => match command {
            StoreCommands::Append {
                path,
                words,
                capacity,
            } => {
                store_append(&path, &words, capacity, json)?;
                Ok(ExitCode::SUCCESS)
            }
            StoreCommands::Dump { path } => {
                store_dump(&codec, &path, json)?;
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}

fn encode(
    codec: &Codec,
    layout_index: u8,
    values: Option<Vec<i64>>,
    assignments: &[String],
) -> anyhow::Result<Word> {
    let layout = codec.registry().lookup(layout_index)?;

    if let Some(raw) = values {
        if raw.len() != layout.field_count() {
            return Err(ecword::Error::ArityMismatch {
                index: layout_index,
                expected: layout.field_count(),
                actual: raw.len(),
            }
            .into());
        }
        let checked = layout
            .fields()
            .iter()
            .zip(&raw)
            .map(|(field, &value)| field.check(value))
            .collect::<ecword::Result<Vec<u32>>>()?;
        return Ok(codec.encode(layout_index, &checked)?);
    }

    if assignments.is_empty() {
        bail!("nothing to encode: pass label=value pairs or --values");
    }

    let mut pairs = Vec::with_capacity(assignments.len());
    for raw in assignments {
        let (label, value) = parse_assignment(raw)?;
        let pos = layout
            .position_of(label)
            .ok_or_else(|| ecword::Error::UnknownField(label.to_string()))?;
        pairs.push((label, layout.fields()[pos].check(value)?));
    }
    Ok(codec.encode_labeled(layout_index, &pairs)?)
}

fn print_word(word: Word, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "word": word.as_u64(),
                "hex": format!("{:#018x}", word.as_u64()),
                "bits": word.to_bits(),
                "layout_index": word.header(),
            })
        );
        return;
    }
    println!("word    {}", word.as_u64());
    println!("hex     {:#018x}", word.as_u64());
    println!("bits    {}", word);
}

fn print_report(word: Word, report: &DecodeReport, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "word": word.as_u64(),
                "bits": word.to_bits(),
                "report": report,
            })
        );
        return;
    }

    let config = &report.configuration;
    println!("layout   {}", config.layout_index());
    println!("checksum {}", config.checksum());
    for (label, value) in config.iter().filter(|&(_, v)| v != 0) {
        println!("  {label:<6} {value}");
    }
    for warning in &report.warnings {
        println!("⚠️  {warning}");
    }
}

fn print_layouts(layouts: &[&LayoutDefinition], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(layouts)?);
        return Ok(());
    }
    for layout in layouts {
        println!("layout {} ({} fields)", layout.index(), layout.field_count());
        for (pos, field) in layout.fields().iter().enumerate() {
            let shift = layout.shift_of(pos).unwrap_or_default();
            println!(
                "  {:<8} width {}  bits {}..{}",
                field.name(),
                field.width(),
                shift + u32::from(field.width()) - 1,
                shift
            );
        }
    }
    Ok(())
}

fn store_append(
    path: &Path,
    raw_words: &[String],
    capacity: usize,
    json: bool,
) -> anyhow::Result<()> {
    let words = raw_words
        .iter()
        .map(|raw| parse_word(raw))
        .collect::<ecword::Result<Vec<Word>>>()?;

    let mut store = WordStore::open(path, capacity)
        .with_context(|| format!("opening store {}", path.display()))?;

    let mut positions = Vec::with_capacity(words.len());
    for word in words {
        match store.append(word) {
            Some(pos) => positions.push(pos),
            None => bail!(
                "store {} is full ({} words)",
                path.display(),
                store.capacity()
            ),
        }
    }
    store.flush()?;

    if json {
        println!("{}", json!({ "appended": positions, "len": store.len() }));
    } else {
        println!("✅ appended {} words ({} total)", positions.len(), store.len());
    }
    Ok(())
}

fn store_dump(codec: &Codec, path: &Path, json: bool) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("store {} does not exist", path.display());
    }
    // Kapasitas diabaikan untuk file yang sudah ada
    let store = WordStore::open(path, 1)
        .with_context(|| format!("opening store {}", path.display()))?;

    let mut reports = Vec::with_capacity(store.len());
    for (word, report) in store.iter().zip(codec.decoder(store.as_bytes())) {
        reports.push((word, report?));
    }

    if json {
        let entries: Vec<_> = reports
            .iter()
            .map(|(word, report)| json!({ "word": word.as_u64(), "report": report }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (pos, (word, report)) in reports.iter().enumerate() {
        let config = &report.configuration;
        let flag = if report.is_plausible() { "" } else { "  ⚠️" };
        println!(
            "{pos:>6}  {:#018x}  layout {}  checksum {}{flag}",
            word.as_u64(),
            config.layout_index(),
            config.checksum()
        );
    }
    Ok(())
}
