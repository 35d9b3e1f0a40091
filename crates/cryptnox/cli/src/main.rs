use clap::{Parser, Subcommand};
use cryptnox::{Diagnostics, HandshakeConfig, NoDiagnostics, TracingDiagnostics};
use cryptnox_apdu_core::Bytes;
use cryptnox_apdu_transport_pcsc::{
    ConnectStrategy, PcscConfig, PcscDeviceManager, PcscError, PcscTransport,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod commands;
mod utils;

use commands::*;
use utils::reader;

#[derive(Parser)]
#[command(version, about = "Open a secure channel with a Cryptnox card")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(short, long, global = true)]
    reader: Option<String>,

    /// Debug level output, including APDU dumps
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings only, no APDU diagnostics
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Applet identifier in hex (defaults to the Cryptnox wallet applet)
    #[arg(long, global = true, value_parser = parse_aid)]
    aid: Option<Bytes>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Run the secure channel handshake and show the session
    Handshake,

    /// Handshake with an APDU card, or read the UID of a simpler tag
    Process,

    /// Read the UID of the tag in the field
    Uid,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Create a PC/SC device manager
    let manager = PcscDeviceManager::new()?;

    let mut config = HandshakeConfig::default();
    if let Some(aid) = cli.aid {
        config = config.with_aid(aid);
    }

    let mut tracing_sink = TracingDiagnostics;
    let mut silent = NoDiagnostics;
    let diagnostics: &mut dyn Diagnostics = if cli.quiet {
        &mut silent
    } else {
        &mut tracing_sink
    };

    match cli.command {
        Commands::List => reader::list_readers(&manager),
        Commands::Handshake => {
            let transport = connect(&manager, cli.reader, ConnectStrategy::AnyCard)?;
            handshake_command(transport, diagnostics, config)
        }
        Commands::Process => {
            let transport = connect(&manager, cli.reader, ConnectStrategy::FirstAvailable)?;
            process_command(transport, diagnostics, config)
        }
        Commands::Uid => {
            let transport = connect(&manager, cli.reader, ConnectStrategy::FirstAvailable)?;
            uid_command(transport)
        }
    }
}

/// Open the named reader, or pick one with `fallback`
fn connect(
    manager: &PcscDeviceManager,
    reader: Option<String>,
    fallback: ConnectStrategy,
) -> Result<PcscTransport, PcscError> {
    let strategy = reader.map_or(fallback, ConnectStrategy::Reader);
    let transport = manager.connect_strategy(strategy, PcscConfig::default())?;
    info!("Using reader: {}", transport.reader_name());
    Ok(transport)
}

fn parse_aid(value: &str) -> Result<Bytes, String> {
    let aid = hex::decode(value.trim()).map_err(|e| format!("invalid hex: {e}"))?;
    if aid.is_empty() || aid.len() > 16 {
        return Err(format!("an AID is 1 to 16 bytes, got {}", aid.len()));
    }
    Ok(aid.into())
}

fn setup_logging(verbose: bool, quiet: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level(verbose, quiet), &directives))
        .with_ansi(true)
        .init();
}

/// Level used when `RUST_LOG` names none
const fn log_level(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    }
}

/// `RUST_LOG` style directives on top of a default level
fn log_filter(level: LevelFilter, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}
