//! CLI commands
//!
//! Implements the command handlers for the signing tool.

use log::info;
use std::path::Path;

use crate::contract::transfer::build_transfer;
use crate::crypto::Signer;
use crate::multisig::SigningCoordinator;
use crate::service::{dispatch, CliRpcRequest, SignRawTxReq};
use crate::wallet::{BatchConfig, Wallet};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Run a full multisig signing batch from a configuration file
///
/// Opens every configured wallet in order, derives the shared M-of-N
/// account, builds the transfer out of that account, and collects one
/// signature per wallet. Prints the fully signed transaction as hex.
pub fn cmd_multisign(config_path: &Path) -> CliResult<()> {
    let config = BatchConfig::load(config_path)?;
    let asset = config.asset.parse()?;
    let wallets = config.open_wallets()?;
    for wallet in &wallets {
        info!("Using account {}", wallet.address());
    }

    let signers: Vec<&dyn Signer> = wallets.iter().map(|w| w as &dyn Signer).collect();
    let coordinator = SigningCoordinator::new(signers)?;
    println!(
        "🔐 Multisig account: {} ({}-of-{})",
        coordinator.account(),
        coordinator.threshold(),
        coordinator.signer_count()
    );

    // Funds leave the multisig account toward the designated fee-payer
    let to = wallets[0].address();
    let tx = build_transfer(
        asset,
        coordinator.account(),
        to,
        config.amount,
        config.gas_price,
        config.gas_limit,
        rand::random(),
    );

    let signed = coordinator.run(&tx.to_hex())?;
    println!("✅ All {} signatures collected!", coordinator.signer_count());
    println!("{signed}");
    Ok(())
}

/// Sign a raw transaction with a single wallet
pub fn cmd_sign(wallet_path: &Path, raw_tx: &str) -> CliResult<()> {
    let wallet = Wallet::load(wallet_path)?;
    println!("🔑 Signing with {}", wallet.address());

    let rsp = crate::service::sign_raw_tx(
        &SignRawTxReq {
            raw_tx: raw_tx.to_string(),
        },
        &wallet,
    )?;
    println!("{}", rsp.signed_tx);
    Ok(())
}

/// Derive and print the multisig account for a batch configuration
pub fn cmd_address(config_path: &Path) -> CliResult<()> {
    let config = BatchConfig::load(config_path)?;
    let wallets = config.open_wallets()?;

    let signers: Vec<&dyn Signer> = wallets.iter().map(|w| w as &dyn Signer).collect();
    let coordinator = SigningCoordinator::new(signers)?;

    println!("🔐 Multisig account: {}", coordinator.account());
    println!(
        "   Threshold: {}-of-{}",
        coordinator.threshold(),
        coordinator.signer_count()
    );
    for wallet in &wallets {
        println!("   Signer: {}", wallet.address());
    }
    Ok(())
}

/// Create and save a new wallet file
pub fn cmd_wallet_new(output: &Path, label: Option<&str>) -> CliResult<()> {
    let wallet = match label {
        Some(l) => Wallet::with_label(l),
        None => Wallet::new(),
    };
    wallet.save(output)?;

    println!("✅ Wallet created!");
    println!("   📁 File: {}", output.display());
    println!("   Address: {}", wallet.address());
    println!("   Public key: {}", wallet.public_key_hex());
    Ok(())
}

/// Feed one envelope request through the dispatch boundary
///
/// Accepts the JSON request form used by external dispatch layers and
/// prints the JSON response.
pub fn cmd_request(wallet_path: &Path, request_json: &str) -> CliResult<()> {
    let wallet = Wallet::load(wallet_path)?;
    let request: CliRpcRequest = serde_json::from_str(request_json)?;

    let response = dispatch(&request, &wallet);
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.is_ok() {
        return Err(format!(
            "request failed: {} ({})",
            response.error_info, response.error_code
        )
        .into());
    }
    Ok(())
}
