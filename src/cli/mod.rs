//! Command-line interface handlers

pub mod commands;

pub use commands::{
    cmd_address, cmd_multisign, cmd_request, cmd_sign, cmd_wallet_new, CliResult,
};
