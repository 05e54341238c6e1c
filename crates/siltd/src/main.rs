//! `siltd` — content-addressed file splitting daemon.
//!
//! Binary entrypoint over the split/reassemble engine and the block store.
//!
//! # Usage
//!
//! ```text
//! siltd split ./video.mp4                    # split and print the manifest id
//! siltd split -s 256KB ./video.mp4           # with a custom chunk size
//! siltd reassemble <manifest_id> ./out.mp4   # restore the original bytes
//! siltd stat <manifest_id>                   # show the stored manifest
//! siltd verify <manifest_id>                 # re-hash every chunk on disk
//! ```

mod config;
mod telemetry;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use silt_engine::{Reassembler, Splitter};
use silt_store::{BlockStore, FileStore, MemoryStore, StoreError};
use silt_types::ManifestId;
use tracing::{info, warn};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "siltd",
    version,
    about = "Content-addressed file splitting daemon"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into content-addressed chunks and publish its manifest.
    Split {
        /// File to split.
        file: PathBuf,

        /// Override chunk size (e.g. "256KB", "1MB", or raw bytes).
        #[arg(short = 's', long)]
        chunk_size: Option<String>,

        /// Attach a metadata entry (`key=value`). Can be repeated.
        #[arg(short, long)]
        meta: Vec<String>,
    },

    /// Reassemble a file from its manifest id.
    Reassemble {
        /// Manifest id (64 hex characters) printed by `split`.
        manifest_id: String,

        /// Path to write the restored bytes to.
        output: PathBuf,
    },

    /// Show the stored manifest for a manifest id.
    Stat {
        /// Manifest id (64 hex characters).
        manifest_id: String,
    },

    /// Re-hash every chunk of a stored file and report corruption.
    Verify {
        /// Manifest id (64 hex characters).
        manifest_id: String,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    telemetry::init(&config.log.level);

    match cli.command {
        Commands::Split {
            file,
            chunk_size,
            meta,
        } => {
            // CLI args override config file values.
            if chunk_size.is_some() {
                config.engine.chunk_size = chunk_size;
            }
            cmd_split(&config, &file, &meta).await
        }
        Commands::Reassemble {
            manifest_id,
            output,
        } => cmd_reassemble(&config, &manifest_id, &output).await,
        Commands::Stat { manifest_id } => cmd_stat(&config, &manifest_id).await,
        Commands::Verify { manifest_id } => cmd_verify(&config, &manifest_id).await,
    }
}

/// Open the configured block store backend.
///
/// File blocks live under `<data_dir>/blocks`.
fn open_store(config: &CliConfig) -> Result<Arc<dyn BlockStore>> {
    match config.store.backend.as_str() {
        "memory" => {
            info!("using in-memory block store");
            Ok(Arc::new(MemoryStore::new(u64::MAX)))
        }
        "file" => {
            let path = config.store.data_dir.join("blocks");
            info!(path = %path.display(), "using file block store");
            Ok(Arc::new(
                FileStore::new(&path).context("failed to initialize file store")?,
            ))
        }
        other => anyhow::bail!("unknown store backend {other:?} (expected \"file\" or \"memory\")"),
    }
}

fn parse_manifest_id(s: &str) -> Result<ManifestId> {
    s.parse::<ManifestId>()
        .context("invalid manifest id (expected 64 hex characters)")
}

/// Parse repeated `key=value` CLI metadata entries.
fn parse_metadata(entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut metadata = BTreeMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("invalid metadata entry {entry:?} (expected key=value)"))?;
        metadata.insert(key.to_string(), value.to_string());
    }
    Ok(metadata)
}

// -----------------------------------------------------------------------
// siltd split
// -----------------------------------------------------------------------

async fn cmd_split(config: &CliConfig, file: &PathBuf, meta: &[String]) -> Result<()> {
    let engine_config = config.engine_config()?;
    let store = open_store(config)?;
    let splitter = Splitter::new(store, engine_config);

    let mut metadata = parse_metadata(meta)?;
    if let Some(name) = file.file_name().and_then(|n| n.to_str()) {
        metadata
            .entry("filename".to_string())
            .or_insert_with(|| name.to_string());
    }

    let reader = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("failed to open {}", file.display()))?;

    info!(
        file = %file.display(),
        chunk_size = engine_config.chunk_size,
        "splitting file"
    );

    let (manifest_id, manifest) = splitter.split_and_publish(reader, metadata).await?;

    info!(
        %manifest_id,
        chunks = manifest.chunks.len(),
        total_size = manifest.total_size,
        "file split and manifest published"
    );

    println!("{manifest_id}");
    Ok(())
}

// -----------------------------------------------------------------------
// siltd reassemble
// -----------------------------------------------------------------------

async fn cmd_reassemble(config: &CliConfig, manifest_id: &str, output: &PathBuf) -> Result<()> {
    let manifest_id = parse_manifest_id(manifest_id)?;
    let store = open_store(config)?;
    let reassembler = Reassembler::new(store, config.engine_config()?);

    let sink = tokio::fs::File::create(output)
        .await
        .with_context(|| format!("failed to create {}", output.display()))?;

    let written = reassembler.reassemble(manifest_id, sink).await?;

    info!(%manifest_id, written, output = %output.display(), "file reassembled");
    println!("{written} bytes written to {}", output.display());
    Ok(())
}

// -----------------------------------------------------------------------
// siltd stat
// -----------------------------------------------------------------------

async fn cmd_stat(config: &CliConfig, manifest_id: &str) -> Result<()> {
    let manifest_id = parse_manifest_id(manifest_id)?;
    let store = open_store(config)?;
    let reassembler = Reassembler::new(store, config.engine_config()?);

    let manifest = reassembler.fetch_manifest(manifest_id).await?;

    println!("Manifest {manifest_id}");
    println!("  version:    {}", manifest.version);
    println!("  total size: {} bytes", manifest.total_size);
    println!("  chunk size: {} bytes", manifest.chunk_size);
    println!("  chunks:     {}", manifest.chunks.len());
    println!("  created at: {} (unix)", manifest.created_at);
    if !manifest.metadata.is_empty() {
        println!("  metadata:");
        for (key, value) in &manifest.metadata {
            println!("    {key} = {value}");
        }
    }

    Ok(())
}

// -----------------------------------------------------------------------
// siltd verify
// -----------------------------------------------------------------------

async fn cmd_verify(config: &CliConfig, manifest_id: &str) -> Result<()> {
    let manifest_id = parse_manifest_id(manifest_id)?;
    let store = open_store(config)?;
    let reassembler = Reassembler::new(store.clone(), config.engine_config()?);

    let manifest = reassembler.fetch_manifest(manifest_id).await?;

    let mut healthy = 0usize;
    let mut bad = 0usize;

    for descriptor in &manifest.chunks {
        let ok = match store.verify(descriptor.chunk_id.into()).await {
            Ok(ok) => ok,
            Err(StoreError::NotFound(_)) => false,
            Err(e) => return Err(e.into()),
        };
        if ok {
            healthy += 1;
        } else {
            bad += 1;
            warn!(
                chunk_id = %descriptor.chunk_id,
                index = descriptor.index,
                "chunk missing or corrupt"
            );
            println!(
                "BAD  chunk {} (index {})",
                descriptor.chunk_id, descriptor.index
            );
        }
    }

    println!("{healthy}/{} chunks healthy", manifest.chunks.len());
    anyhow::ensure!(bad == 0, "{bad} chunks failed verification");
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
