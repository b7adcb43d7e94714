//! P2WDB CLI
//!
//! Command-line interface for reading the pay-to-write database and asking
//! the pinning service to pin entries.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use p2wdb_client::{P2wdbConfig, PinServiceClient, ReadClient};

/// P2WDB - Pay-to-Write Database client
#[derive(Parser)]
#[command(name = "p2wdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file
    #[arg(short, long, global = true, env = "P2WDB_CONFIG")]
    config: Option<PathBuf>,

    /// P2WDB server URL
    #[arg(long, global = true, env = "P2WDB_SERVER_URL")]
    server_url: Option<String>,

    /// Pinning service URL
    #[arg(long, global = true, env = "P2WDB_PIN_SERVER_URL")]
    pin_server_url: Option<String>,

    /// Print raw JSON only
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a page of entries, newest first
    Page {
        /// Page number
        #[arg(default_value = "0")]
        page: u32,
    },

    /// Get an entry by its hash (zcid)
    Hash {
        /// Entry hash
        hash: String,
    },

    /// Get an entry by the txid that paid for it
    Txid {
        /// Transaction id
        txid: String,
    },

    /// List entries written under an app id
    AppId {
        /// App id
        app_id: String,
    },

    /// Pin the JSON of an entry to IPFS through the pinning service
    PinJson {
        /// Hash (zcid) of the entry holding the JSON
        zcid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "p2wdb=debug,p2wdb_client=debug,info"
    } else {
        "p2wdb=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    debug!(server = %config.server_url, pin_server = %config.pin_server_url, "Using config");

    match cli.command {
        Commands::Page { page } => cmd_page(config, page, cli.json).await,
        Commands::Hash { ref hash } => {
            let reader = ReadClient::with_config(config)?;
            let entry = reader
                .get_by_hash(hash)
                .await
                .context("Failed to get entry by hash")?;
            print_entry(&entry, cli.json)
        }
        Commands::Txid { ref txid } => {
            let reader = ReadClient::with_config(config)?;
            let entry = reader
                .get_by_txid(txid)
                .await
                .context("Failed to get entry by txid")?;
            print_entry(&entry, cli.json)
        }
        Commands::AppId { ref app_id } => cmd_app_id(config, app_id, cli.json).await,
        Commands::PinJson { ref zcid } => cmd_pin_json(config, zcid, cli.json).await,
    }
}

/// Builds the config: file first, then flags and environment on top.
fn load_config(cli: &Cli) -> Result<P2wdbConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => P2wdbConfig::default(),
    };

    if let Some(url) = &cli.server_url {
        config = config.with_server_url(url);
    }
    if let Some(url) = &cli.pin_server_url {
        config = config.with_pin_server_url(url);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<P2wdbConfig> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open config file {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// List a page of entries
async fn cmd_page(config: P2wdbConfig, page: u32, json: bool) -> Result<()> {
    let reader = ReadClient::with_config(config)?;
    let entries = reader
        .get_page(page)
        .await
        .with_context(|| format!("Failed to get page {}", page))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "📄 Page".cyan().bold(),
        page,
        reader.server_url().dimmed()
    );
    print_entries(&entries);
    Ok(())
}

/// List entries for an app id
async fn cmd_app_id(config: P2wdbConfig, app_id: &str, json: bool) -> Result<()> {
    let reader = ReadClient::with_config(config)?;
    let entries = reader
        .get_by_app_id(app_id)
        .await
        .context("Failed to get entries by app id")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} {}", "🗂  App id:".cyan().bold(), app_id);
    print_entries(&entries);
    Ok(())
}

/// Pin entry JSON to IPFS
async fn cmd_pin_json(config: P2wdbConfig, zcid: &str, json: bool) -> Result<()> {
    let service = PinServiceClient::with_config(config)?;

    if !json {
        println!(
            "{} {} ({})",
            "📌 Pinning JSON of".cyan().bold(),
            zcid,
            service.pin_server_url().dimmed()
        );
    }

    let cid = service
        .json(zcid)
        .await
        .context("Pinning service request failed")?;

    if json {
        println!("{}", serde_json::json!({ "zcid": zcid, "cid": cid }));
    } else {
        println!("{} {}", "✅ Pinned as:".green().bold(), cid);
    }
    Ok(())
}

fn print_entries(entries: &[Value]) {
    if entries.is_empty() {
        println!("   {}", "No entries.".yellow());
        return;
    }

    for entry in entries {
        let hash = entry.get("hash").and_then(Value::as_str).unwrap_or("?");
        let app_id = entry.get("appId").and_then(Value::as_str).unwrap_or("-");
        println!("   {} {}", hash.yellow(), app_id.dimmed());
    }
    println!("\n   {} {}", "Total:".dimmed(), entries.len());
}

fn print_entry(entry: &Value, json: bool) -> Result<()> {
    if !json {
        println!("{}", "✅ Entry:".green().bold());
    }
    println!("{}", serde_json::to_string_pretty(entry)?);
    Ok(())
}
