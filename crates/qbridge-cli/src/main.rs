//! qbridge Command-Line Interface
//!
//! Converts, compacts and inspects `OpenQASM` programs, generates random
//! circuits, and resolves platform device ids to vendor devices.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{contiguous, convert, depth, devices, qubits, random, version};

/// qbridge - OpenQASM conversion and device lookup
#[derive(Parser)]
#[command(name = "qbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an OpenQASM 2 program to OpenQASM 3
    Convert {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compact quantum registers to the indices in use
    Contiguous {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pad unused qubits with identity gates instead of removing them
        #[arg(long)]
        expand: bool,
    },

    /// Print the depth of a circuit
    Depth {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,
    },

    /// List quantum registers and the total qubit count
    Qubits {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Generate a random OpenQASM 3 circuit
    Random {
        /// Number of qubits (default: random in 1..=4)
        #[arg(short, long)]
        qubits: Option<usize>,

        /// Number of layers (default: random in 1..=4)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Largest gate arity, at most 3
        #[arg(long)]
        max_operands: Option<usize>,

        /// Random seed (default: random in 0..1000)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Measure every qubit at the end
        #[arg(long)]
        measure: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List devices of every enabled vendor
    Devices {
        /// Provider configuration file (default: $QBRIDGE_CONFIG, then ~/.qbridge/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Resolve a platform device id to its vendor device
    Device {
        /// Platform device id
        id: String,

        /// Provider configuration file (default: $QBRIDGE_CONFIG, then ~/.qbridge/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v when set
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert { input, output } => convert::execute(&input, output.as_deref()),
        Commands::Contiguous {
            input,
            output,
            expand,
        } => contiguous::execute(&input, output.as_deref(), expand),
        Commands::Depth { input } => depth::execute(&input),
        Commands::Qubits { input, format } => qubits::execute(&input, format),
        Commands::Random {
            qubits,
            depth,
            max_operands,
            seed,
            measure,
            output,
        } => random::execute(
            qubits,
            depth,
            max_operands,
            seed,
            measure,
            output.as_deref(),
        ),
        Commands::Devices { config } => devices::list(config.as_deref()),
        Commands::Device { id, config } => devices::resolve(&id, config.as_deref()),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
