//! txsign CLI application
//!
//! A command-line interface for building and signing multisig
//! transfer transactions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use txsign::cli;

#[derive(Parser)]
#[command(name = "txsign")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A multi-signature transaction signing tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full multisig signing batch
    Multisign {
        /// Batch configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Sign a raw transaction with a single wallet
    Sign {
        /// Wallet file
        #[arg(short, long)]
        wallet: PathBuf,

        /// Raw transaction as lowercase hex
        #[arg(short, long)]
        raw_tx: String,
    },

    /// Derive the multisig account for a batch configuration
    Address {
        /// Batch configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Feed one envelope request through the dispatch boundary
    Request {
        /// Wallet file acting as the signer
        #[arg(short, long)]
        wallet: PathBuf,

        /// Request JSON: {"qid": ..., "method": ..., "params": ...}
        #[arg(short, long)]
        json: String,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a new wallet file
    New {
        /// Output file path
        #[arg(short, long, default_value = "wallet.json")]
        output: PathBuf,

        /// Optional label
        #[arg(short, long)]
        label: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Multisign { config } => cli::cmd_multisign(config),
        Commands::Sign { wallet, raw_tx } => cli::cmd_sign(wallet, raw_tx),
        Commands::Address { config } => cli::cmd_address(config),
        Commands::Wallet {
            action: WalletCommands::New { output, label },
        } => cli::cmd_wallet_new(output, label.as_deref()),
        Commands::Request { wallet, json } => cli::cmd_request(wallet, json),
    };

    if let Err(err) = result {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
