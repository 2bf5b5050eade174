//! huffpress CLI - compress and decompress files with a static Huffman code

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use huffpress_core::{CompressionStats, HuffProcessor, ProcessorConfig};
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "huffpress", version, about = "Huffman file compressor")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print statistics as JSON
    #[arg(long, global = true)]
    json: bool,

    /// I/O buffer size in bytes
    #[arg(long, global = true, default_value_t = huffpress_core::config::DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file
    Compress(PathArgs),
    /// Decompress a file
    Decompress(PathArgs),
    /// Show the header of a compressed file
    Inspect {
        /// Compressed file
        input: PathBuf,
    },
}

#[derive(Args)]
struct PathArgs {
    /// File to read
    input: PathBuf,
    /// File to write
    output: PathBuf,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stats(stats: &CompressionStats, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        println!(
            "{} -> {} bytes (ratio {:.2}, {:.1}% saved, {} leaves)",
            stats.input_bytes,
            stats.output_bytes,
            stats.compression_ratio(),
            stats.space_saving(),
            stats.leaf_count
        );
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ProcessorConfig {
        buffer_size: cli.buffer_size,
        log_code_table: cli.verbose >= 2,
    };
    let processor = HuffProcessor::new(config)?;

    match cli.command {
        Command::Compress(args) => {
            let stats = processor
                .compress_file(&args.input, &args.output)
                .with_context(|| format!("compressing {:?}", args.input))?;
            print_stats(&stats, cli.json)
        }
        Command::Decompress(args) => {
            let stats = processor
                .decompress_file(&args.input, &args.output)
                .with_context(|| format!("decompressing {:?}", args.input))?;
            print_stats(&stats, cli.json)
        }
        Command::Inspect { input } => {
            let info = processor
                .inspect_file(&input)
                .with_context(|| format!("reading header of {:?}", input))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
                return Ok(());
            }

            println!("magic:       {:#010x}", info.magic);
            println!("header bits: {}", info.header_bits);
            println!("leaves:      {}", info.leaf_count);
            println!("depth:       {}", info.depth);
            if let Some((min, max)) = info.code_length_range() {
                println!("code length: {}..={}", min, max);
            }
            for entry in &info.codes {
                println!("  {:>6}  {}", entry.symbol.to_string(), entry.code);
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}
