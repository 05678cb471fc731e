// crates/cfazk-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

//! CFAZK circuit input formatter CLI.
//!
//! `format` runs the full pipeline for one target application directory;
//! `plan` reports the minimum bit-widths/levels so a run (and the matching
//! circuit) can be sized before committing to a configuration.

use anyhow::Result;
use cfazk_crypto::Fr;
use cfazk_format::{pipeline, Nonces, RunConfig, WidthOverrides};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "cfazk-cli",
    about = "Circuit input formatter for zero-knowledge control-flow attestation",
    long_about = "Converts a CFG adjacency list, an address-to-label translator, and a \
                  recorded execution path into field-packed circuit input files plus \
                  Poseidon digests the attestation circuit re-derives.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Format one application's circuit inputs and digests.
    Format {
        /// Directory with the `adjlist`, `numified_adjlist`, `translator`,
        /// `recorded_path`, and `numified_path` files.
        #[arg(long, short = 'a')]
        app_dir: PathBuf,

        /// Where to write the `in_*` files (default: the app directory).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Poseidon round-constant/MDS tables (JSON).
        #[arg(long)]
        poseidon_params: PathBuf,

        /// Pad the adjacency list and translator to this many nodes.
        #[arg(long, value_name = "LEN")]
        pad_adjlist_to: Option<usize>,

        /// Pad the execution paths to this many transitions.
        #[arg(long, value_name = "LEN")]
        pad_path_to: Option<usize>,

        /// Bucket/bitmask levels per node (default: computed minimum).
        #[arg(long, value_name = "NUM")]
        adjlist_levels: Option<u64>,

        /// Bits per numified node label (default: computed minimum).
        #[arg(long, value_name = "NUM")]
        label_bitwidth: Option<u64>,

        /// Bits per adjacency bucket index (default: computed minimum).
        #[arg(long, value_name = "NUM")]
        bucket_bitwidth: Option<u64>,

        /// Bits per raw address (default: computed minimum).
        #[arg(long, value_name = "NUM")]
        address_bitwidth: Option<u64>,

        /// Verifier's nonce, hashed with the execution path (decimal, < p).
        #[arg(long, value_parser = parse_nonce, default_value = "0")]
        nonce_verifier: Fr,

        /// Execution-path blinding nonce (decimal, < p).
        #[arg(long, value_parser = parse_nonce, default_value = "0")]
        nonce_path: Fr,

        /// Translator blinding nonce (decimal, < p).
        #[arg(long, value_parser = parse_nonce, default_value = "0")]
        nonce_translator: Fr,

        /// Adjacency-list blinding nonce (decimal, < p).
        #[arg(long, value_parser = parse_nonce, default_value = "0")]
        nonce_adjlist: Fr,
    },

    /// Report the minimum levels and bit-widths for an application.
    Plan {
        /// Directory with the `adjlist` and `numified_adjlist` files.
        #[arg(long, short = 'a')]
        app_dir: PathBuf,

        /// Pad the adjacency list to this many nodes before sizing.
        #[arg(long, value_name = "LEN")]
        pad_adjlist_to: Option<usize>,
    },
}

/// Parse a decimal nonce, rejecting anything not below the field modulus.
fn parse_nonce(s: &str) -> Result<Fr, String> {
    Fr::from_dec_str(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Format {
            app_dir,
            output_dir,
            poseidon_params,
            pad_adjlist_to,
            pad_path_to,
            adjlist_levels,
            label_bitwidth,
            bucket_bitwidth,
            address_bitwidth,
            nonce_verifier,
            nonce_path,
            nonce_translator,
            nonce_adjlist,
        } => {
            let cfg = RunConfig {
                output_dir: output_dir.unwrap_or_else(|| app_dir.clone()),
                app_dir,
                poseidon_params,
                pad_adjlist_to,
                pad_path_to,
                overrides: WidthOverrides {
                    levels: adjlist_levels,
                    label_bits: label_bitwidth,
                    bucket_bits: bucket_bitwidth,
                    addr_bits: address_bitwidth,
                },
                nonces: Nonces {
                    verifier: nonce_verifier,
                    path: nonce_path,
                    translator: nonce_translator,
                    adjlist: nonce_adjlist,
                },
            };
            let summary = pipeline::run(&cfg)?;
            info!(
                levels = summary.plan.levels,
                label_bits = summary.plan.label_bits,
                bucket_bits = summary.plan.bucket_bits,
                addr_bits = summary.plan.addr_bits,
                "formatting complete"
            );
            println!("encoded_adjlist_digest = {}", summary.adjlist_digest);
            println!("translator_digest      = {}", summary.translator_digest);
            println!("recorded_path_digest   = {}", summary.path_digest);
            Ok(())
        }

        Cmd::Plan { app_dir, pad_adjlist_to } => {
            let plan = pipeline::plan_minima(&app_dir, pad_adjlist_to)?;
            println!("min_adjlist_levels  = {}", plan.levels);
            println!("min_label_bitwidth  = {}", plan.label_bits);
            println!("min_bucket_bitwidth = {}", plan.bucket_bits);
            println!("min_address_bitwidth = {}", plan.addr_bits);
            Ok(())
        }
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
