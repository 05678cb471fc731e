// crates/cfazk-format/src/pipeline.rs

//! The formatting pipeline.
//!
//! Reads the collaborator input files, resolves the run plan, and drives
//! encode → serialize → pack → pad → hash for each artifact, writing the
//! thirteen `in_*` circuit input files. Single-threaded and purely
//! functional between the one-shot reads and writes; the only sequential
//! dependency is inside the sponge itself.

use crate::config::{input_files, RunConfig};
use crate::emit::{write_lines, write_value};
use crate::encode::encode_adjacency;
use crate::pack::pack_for_digest;
use crate::plan::RunPlan;
use crate::serialize::{serialize_path, serialize_translator};
use anyhow::{Context, Result};
use cfazk_crypto::{sponge, Fr, PoseidonParams, PoseidonTable};
use cfazk_trace::{
    max_raw_address, read_numified_adjlist, read_numified_path, read_recorded_path,
    read_translator,
};
use std::path::Path;
use tracing::{debug, info};

/// Digests and resolved widths of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// The widths the run was formatted with.
    pub plan: RunPlan,
    /// Digest of the packed encoded adjacency list.
    pub adjlist_digest: Fr,
    /// Digest of the packed translator.
    pub translator_digest: Fr,
    /// Digest of the packed recorded path.
    pub path_digest: Fr,
}

/// Derive the minimum plan for an application directory without writing
/// anything. Backs the CLI's `plan` subcommand.
///
/// # Errors
/// Input parse failures.
pub fn plan_minima(app_dir: &Path, pad_adjlist_to: Option<usize>) -> Result<RunPlan> {
    let adj = read_numified_adjlist(app_dir.join(input_files::NUMIFIED_ADJLIST), pad_adjlist_to)?;
    let max_addr = max_raw_address(app_dir.join(input_files::ADJLIST))?;
    Ok(RunPlan::minima(&adj, max_addr))
}

/// Execute one formatting run.
///
/// # Errors
/// Any configuration, parse, overflow, or I/O failure; artifacts computed
/// before the failure may already be on disk, each one complete.
pub fn run(cfg: &RunConfig) -> Result<RunSummary> {
    let params = PoseidonParams::load_json(&cfg.poseidon_params)?;
    let table = params.table(sponge::STATE_WIDTH)?;

    let adj = read_numified_adjlist(
        cfg.app_dir.join(input_files::NUMIFIED_ADJLIST),
        cfg.pad_adjlist_to,
    )?;
    let max_addr = max_raw_address(cfg.app_dir.join(input_files::ADJLIST))?;
    let plan = RunPlan::derive(&adj, max_addr, &cfg.overrides)?;
    info!(
        nodes = adj.len(),
        unpadded = adj.unpadded_len(),
        levels = plan.levels,
        label_bits = plan.label_bits,
        bucket_bits = plan.bucket_bits,
        addr_bits = plan.addr_bits,
        "resolved run plan"
    );

    let adjlist_digest = emit_adjlist(cfg, &adj, &plan, table)?;
    let translator_digest = emit_translator(cfg, &plan, table)?;
    emit_numified_path(cfg, adj.empty_label())?;
    emit_nonces(cfg)?;
    let path_digest = emit_recorded_path(cfg, &plan, table)?;

    Ok(RunSummary { plan, adjlist_digest, translator_digest, path_digest })
}

fn emit_adjlist(
    cfg: &RunConfig,
    adj: &cfazk_trace::AdjacencyList,
    plan: &RunPlan,
    table: &PoseidonTable,
) -> Result<Fr> {
    let encoded = encode_adjacency(adj, plan).context("encode adjacency list")?;
    write_lines(&cfg.output_dir.join("in_encoded_adjlist"), &encoded)?;

    let block = pack_for_digest(
        &encoded,
        plan.node_bits(),
        std::slice::from_ref(&cfg.nonces.adjlist),
    )
    .context("pack encoded adjacency list")?;
    debug!(
        elem_bits = plan.node_bits(),
        field_elements = block.len(),
        permutations = block.len() / sponge::RATE,
        "hashing encoded adjacency list"
    );
    let digest = sponge::hash(table, &block)?;
    write_value(&cfg.output_dir.join("in_encoded_adjlist_digest"), &digest)?;
    info!(%digest, "committed encoded adjacency list");
    Ok(digest)
}

fn emit_translator(cfg: &RunConfig, plan: &RunPlan, table: &PoseidonTable) -> Result<Fr> {
    let tr = read_translator(cfg.app_dir.join(input_files::TRANSLATOR), cfg.pad_adjlist_to)?;
    write_lines(&cfg.output_dir.join("in_translator"), tr.entries())?;

    let values = serialize_translator(&tr, plan).context("serialize translator")?;
    let block = pack_for_digest(
        &values,
        plan.addr_bits,
        std::slice::from_ref(&cfg.nonces.translator),
    )
    .context("pack translator")?;
    debug!(
        entries = tr.entries().len(),
        elem_bits = plan.addr_bits,
        field_elements = block.len(),
        "hashing translator"
    );
    let digest = sponge::hash(table, &block)?;
    write_value(&cfg.output_dir.join("in_translator_digest"), &digest)?;
    info!(%digest, "committed translator");
    Ok(digest)
}

fn emit_numified_path(cfg: &RunConfig, empty_label: u64) -> Result<()> {
    let path = read_numified_path(
        cfg.app_dir.join(input_files::NUMIFIED_PATH),
        cfg.pad_path_to,
        empty_label,
    )?;
    info!(
        transitions = path.len(),
        unpadded = path.unpadded_len(),
        initial_node = path.initial_node,
        final_node = path.final_node,
        "writing numified execution path"
    );

    let lines: Vec<String> = path
        .transitions()
        .iter()
        .map(|t| format!("{} {}", t.dst, t.ret))
        .collect();
    write_lines(&cfg.output_dir.join("in_numified_path"), &lines)?;
    write_value(&cfg.output_dir.join("in_initial_node"), &path.initial_node)?;
    write_value(&cfg.output_dir.join("in_final_node"), &path.final_node)?;
    Ok(())
}

fn emit_nonces(cfg: &RunConfig) -> Result<()> {
    write_value(&cfg.output_dir.join("in_nonce_verifier"), &cfg.nonces.verifier)?;
    write_value(&cfg.output_dir.join("in_nonce_path"), &cfg.nonces.path)?;
    write_value(&cfg.output_dir.join("in_nonce_translator"), &cfg.nonces.translator)?;
    write_value(&cfg.output_dir.join("in_nonce_adjlist"), &cfg.nonces.adjlist)?;
    Ok(())
}

fn emit_recorded_path(cfg: &RunConfig, plan: &RunPlan, table: &PoseidonTable) -> Result<Fr> {
    let path = read_recorded_path(cfg.app_dir.join(input_files::RECORDED_PATH), cfg.pad_path_to)?;

    let lines: Vec<String> = path
        .transitions()
        .iter()
        .map(|t| format!("{} {} {}", t.kind.code(), t.dst, t.ret))
        .collect();
    write_lines(&cfg.output_dir.join("in_recorded_path"), &lines)?;

    let values = serialize_path(&path, plan).context("serialize recorded path")?;
    // Two reserved slots: verifier nonce first, then the path nonce.
    let nonces = [cfg.nonces.verifier.clone(), cfg.nonces.path.clone()];
    let block = pack_for_digest(&values, plan.transition_bits(), &nonces)
        .context("pack recorded path")?;
    debug!(
        transitions = path.len(),
        elem_bits = plan.transition_bits(),
        field_elements = block.len(),
        "hashing recorded path"
    );
    let digest = sponge::hash(table, &block)?;
    write_value(&cfg.output_dir.join("in_recorded_path_digest"), &digest)?;
    info!(%digest, "committed recorded execution path");
    Ok(digest)
}
