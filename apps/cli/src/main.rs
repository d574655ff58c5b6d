mod commands;
mod dto;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use helix_core::{ChainType, Scheme};

#[derive(Debug, Parser)]
#[command(name = "helix", version, about = "Number and annotate antibody variable domains")]
struct Cli {
    /// Config file (defaults to ./helix.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Region of a single numbered position
    Classify(ClassifyArgs),
    /// Parse a saved numbering output, FASTA or IgBlast file
    Parse(ParseArgs),
    /// Run the numbering tool under IMGT and Kabat
    Annotate(AnnotateArgs),
    /// Summarise IgBlast reports and pick the best chain
    Igblast(IgBlastArgs),
    /// Result cache maintenance
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    number: u32,
    /// Chain code: H, K or L
    #[arg(long, value_parser = parse_chain)]
    chain: ChainType,
    #[arg(long, value_parser = parse_scheme, default_value = "imgt")]
    scheme: Scheme,
}

#[derive(Debug, Args)]
struct ParseArgs {
    file: PathBuf,
    /// Scheme for region grouping; defaults to the one the output announces
    #[arg(long, value_parser = parse_scheme)]
    scheme: Option<Scheme>,
}

#[derive(Debug, Args)]
struct AnnotateArgs {
    /// Single sequence to annotate
    #[arg(long, conflicts_with = "fasta", required_unless_present = "fasta")]
    sequence: Option<String>,
    /// FASTA file of sequences to annotate as a batch
    #[arg(long)]
    fasta: Option<PathBuf>,
    /// Species label, e.g. "Homo Sapiens" or "mouse"
    #[arg(long)]
    species: Option<String>,
    /// Chain label, e.g. "VH", "LC-kappa" or "K"
    #[arg(long)]
    chain: Option<String>,
    /// Bypass the result cache
    #[arg(long)]
    no_cache: bool,
}

#[derive(Debug, Args)]
struct IgBlastArgs {
    /// One report per chain database
    #[arg(required = true)]
    reports: Vec<PathBuf>,
    /// Query sequence to cut into regions
    #[arg(long)]
    sequence: Option<String>,
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Remove every cached result
    Clear,
}

fn parse_scheme(s: &str) -> Result<Scheme, String> {
    Scheme::from_name(s).ok_or_else(|| format!("unknown scheme `{s}`, expected imgt or kabat"))
}

fn parse_chain(s: &str) -> Result<ChainType, String> {
    ChainType::from_code(&s.to_uppercase()).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Classify(args) => commands::classify::run(args.number, args.chain, args.scheme),
        Command::Parse(args) => commands::parse::run(&args.file, args.scheme),
        Command::Annotate(args) => commands::annotate::run(
            cli.config.as_deref(),
            commands::annotate::AnnotateInput {
                sequence: args.sequence,
                fasta: args.fasta,
                species: args.species,
                chain: args.chain,
                no_cache: args.no_cache,
            },
        ),
        Command::Igblast(args) => commands::igblast::run(&args.reports, args.sequence.as_deref()),
        Command::Cache(CacheCommand::Clear) => commands::cache::clear(cli.config.as_deref()),
    }
}
