//! ERC-5564 CLI
//!
//! Command-line interface for ERC-5564 stealth addresses on secp256k1.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use erc5564_core::constants::ERC20_TRANSFER_SELECTOR;
use erc5564_core::types::{
    build_native_transfer_metadata, build_token_transfer_metadata, Amount, Announcement,
    AnnouncementMetadata, EthAddress, MetaAddress, MetadataKind, PublicKey,
};
use erc5564_stealth::{compute_stealth_key, ScanStats, StealthPaymentBuilder, StealthWallet};

/// ERC-5564 - Stealth Addresses for Ethereum
#[derive(Parser)]
#[command(name = "erc5564")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate spending and viewing keys and the meta-address
    Keygen {
        /// Output file for keys (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a stealth address for a recipient
    Send {
        /// Recipient's meta-address (st:eth:0x...)
        meta_address: String,
        /// Transfer amount in base units, attaches metadata to the announcement
        #[arg(short, long)]
        amount: Option<Amount>,
        /// Token contract address (token transfer instead of native)
        #[arg(long, requires = "amount")]
        token: Option<EthAddress>,
        /// Function selector hex (defaults to ERC-20 transfer)
        #[arg(long, requires = "token")]
        selector: Option<String>,
    },

    /// Check whether a stealth address belongs to you
    Check {
        /// Path to keys file
        #[arg(short, long, env = "ERC5564_KEYS_FILE")]
        keys: PathBuf,
        /// Announced stealth address
        #[arg(long)]
        address: EthAddress,
        /// Announced ephemeral public key (hex)
        #[arg(long)]
        ephemeral_key: String,
        /// Announced view tag
        #[arg(long)]
        view_tag: u8,
    },

    /// Recover the private key of a stealth address
    Recover {
        /// Path to keys file
        #[arg(short, long, env = "ERC5564_KEYS_FILE")]
        keys: PathBuf,
        /// Stealth address to recover
        #[arg(long)]
        address: EthAddress,
        /// Announced ephemeral public key (hex)
        #[arg(long)]
        ephemeral_key: String,
    },

    /// Scan a JSON file of announcements for payments
    Scan {
        /// Path to keys file
        #[arg(short, long, env = "ERC5564_KEYS_FILE")]
        keys: PathBuf,
        /// JSON array of announcements
        #[arg(long)]
        announcements: PathBuf,
    },

    /// Build a 57-byte announcement metadata payload
    Metadata {
        /// View tag (first byte)
        #[arg(long)]
        view_tag: u8,
        /// Transfer amount in base units
        #[arg(short, long)]
        amount: Amount,
        /// Token contract address (token transfer instead of native)
        #[arg(long)]
        token: Option<EthAddress>,
        /// Function selector hex (defaults to ERC-20 transfer)
        #[arg(long, requires = "token")]
        selector: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "erc5564=debug,info"
    } else {
        "erc5564=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Commands::Keygen { output } => cmd_keygen(output.as_deref(), &mut std::io::stdout().lock()),
        Commands::Send {
            meta_address,
            amount,
            token,
            selector,
        } => cmd_send(
            &meta_address,
            amount,
            token,
            selector.as_deref(),
            &mut std::io::stdout().lock(),
        ),
        Commands::Check {
            keys,
            address,
            ephemeral_key,
            view_tag,
        } => cmd_check(&keys, address, &ephemeral_key, view_tag),
        Commands::Recover {
            keys,
            address,
            ephemeral_key,
        } => cmd_recover(&keys, address, &ephemeral_key),
        Commands::Scan {
            keys,
            announcements,
        } => cmd_scan(&keys, &announcements),
        Commands::Metadata {
            view_tag,
            amount,
            token,
            selector,
        } => cmd_metadata(view_tag, amount, token, selector.as_deref()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY FILE
// ═══════════════════════════════════════════════════════════════════════════════

/// On-disk key file written by `keygen`.
#[derive(Serialize, Deserialize)]
struct KeysFile {
    meta_address: String,
    spending_pk: String,
    spending_sk: String,
    viewing_pk: String,
    viewing_sk: String,
}

impl KeysFile {
    fn from_wallet(wallet: &StealthWallet) -> Self {
        let keys = wallet.keys();
        Self {
            meta_address: wallet.meta_address().encode(),
            spending_pk: keys.spending.public.to_hex(),
            spending_sk: keys.spending.secret.to_hex(),
            viewing_pk: keys.viewing.public.to_hex(),
            viewing_sk: keys.viewing.secret.to_hex(),
        }
    }

    fn to_wallet(&self) -> Result<StealthWallet> {
        let wallet = StealthWallet::from_secret_hex(&self.spending_sk, &self.viewing_sk)
            .context("Invalid secret key in keys file")?;

        if wallet.meta_address().encode() != self.meta_address.to_lowercase() {
            bail!("Keys file is inconsistent: secret keys do not match meta_address");
        }
        Ok(wallet)
    }

    fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write keys file {}", path.display()))
    }

    fn load(path: &Path) -> Result<StealthWallet> {
        debug!(path = %path.display(), "Loading keys file");
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open keys file {}", path.display()))?;
        let keys: KeysFile = serde_json::from_reader(file).context("Malformed keys file")?;
        keys.to_wallet()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate new recipient keys
///
/// Only the key file JSON goes to `out`; banners go to stderr.
fn cmd_keygen(output: Option<&Path>, out: &mut impl Write) -> Result<()> {
    eprintln!("{}", "🔑 Generating ERC-5564 keys...".cyan().bold());

    let wallet = StealthWallet::generate().context("Failed to generate keys")?;
    let keys_file = KeysFile::from_wallet(&wallet);

    if let Some(path) = output {
        keys_file.save(path)?;
        eprintln!("{} {}", "✅ Keys saved to:".green(), path.display());
        eprintln!("   {} {}", "Meta-address:".dimmed(), keys_file.meta_address);
    } else {
        writeln!(out, "{}", serde_json::to_string_pretty(&keys_file)?)?;
    }

    eprintln!("\n{}", "⚠️  IMPORTANT: Keep your secret keys safe!".red().bold());
    eprintln!("   spending_sk must never be shared. viewing_sk reveals which payments are yours.");

    Ok(())
}

/// Generate a stealth address for a meta-address
fn cmd_send(
    meta_address: &str,
    amount: Option<Amount>,
    token: Option<EthAddress>,
    selector: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let meta: MetaAddress = meta_address.parse().context("Invalid meta-address")?;

    let mut builder = StealthPaymentBuilder::new().recipient(meta);
    match (amount, token) {
        (Some(amount), Some(token)) => {
            let selector = parse_selector(selector)?;
            builder = builder.token_transfer(&selector, token.as_bytes(), amount);
        }
        (Some(amount), None) => builder = builder.native_transfer(amount),
        (None, _) => {}
    }

    let prepared = builder.build().context("Failed to generate stealth address")?;

    eprintln!("{}", "✅ Stealth address generated:".green().bold());
    eprintln!("   {} {}", "Address:".yellow(), prepared.payment.stealth_address);
    eprintln!("   {} {}", "View tag:".dimmed(), prepared.payment.view_tag);

    writeln!(out, "{}", serde_json::to_string_pretty(&prepared.announcement)?)?;

    eprintln!("\n{}", "ℹ️  Next steps:".cyan());
    eprintln!("   1. Send funds to the stealth address above");
    eprintln!("   2. Publish the announcement printed on stdout");

    Ok(())
}

/// Check an announced stealth address against your keys
fn cmd_check(keys_path: &Path, address: EthAddress, ephemeral_key: &str, view_tag: u8) -> Result<()> {
    let wallet = KeysFile::load(keys_path)?;
    let ephemeral_pk = PublicKey::from_hex(ephemeral_key).context("Invalid ephemeral key")?;

    let announcement = Announcement::new(address, ephemeral_pk, view_tag);
    if wallet.check(&announcement).context("Check failed")? {
        println!("{} {}", "✅ Yours:".green().bold(), address);
    } else {
        println!("{} {}", "Not yours:".yellow(), address);
    }

    Ok(())
}

/// Recover the stealth private key
fn cmd_recover(keys_path: &Path, address: EthAddress, ephemeral_key: &str) -> Result<()> {
    let wallet = KeysFile::load(keys_path)?;
    let ephemeral_pk = PublicKey::from_hex(ephemeral_key).context("Invalid ephemeral key")?;
    let keys = wallet.keys();

    let stealth_sk = compute_stealth_key(
        &address,
        &ephemeral_pk,
        &keys.viewing.secret,
        &keys.spending.secret,
    )
    .context("Failed to recover stealth key")?;

    println!("{} {}", "✅ Recovered key for:".green().bold(), address);
    println!("   {} 0x{}", "Private key:".yellow(), stealth_sk.to_hex());
    println!("\n{}", "⚠️  This key controls the funds at the address above.".red().bold());

    Ok(())
}

/// Scan announcements for payments
fn cmd_scan(keys_path: &Path, announcements_path: &Path) -> Result<()> {
    println!("{}", "🔎 Scanning for payments...".cyan().bold());

    let wallet = KeysFile::load(keys_path)?;
    let file = std::fs::File::open(announcements_path).with_context(|| {
        format!("Failed to open announcements file {}", announcements_path.display())
    })?;
    let announcements: Vec<Announcement> =
        serde_json::from_reader(file).context("Malformed announcements file")?;

    if announcements.is_empty() {
        println!("\n{}", "⚠️  No announcements to scan.".yellow());
        return Ok(());
    }

    let (discoveries, stats) = wallet.scan_with_stats(&announcements);

    if discoveries.is_empty() {
        println!("\n{}", "No payments found.".yellow());
    } else {
        println!("\n{} {} payment(s) found:", "✅".green(), discoveries.len());
        for (idx, payment) in &discoveries {
            println!("   {} {}", "Address:".green(), payment.stealth_address);
            println!("      Announcement #{}", idx);
            if let Some(transfer) = &payment.transfer {
                println!("      {}", describe_transfer(transfer));
            }
        }
    }

    println!("\n   {} {}", "Stats:".dimmed(), describe_stats(&stats));

    Ok(())
}

/// Build a metadata payload
fn cmd_metadata(
    view_tag: u8,
    amount: Amount,
    token: Option<EthAddress>,
    selector: Option<&str>,
) -> Result<()> {
    let metadata = build_metadata(view_tag, amount, token, selector)?;
    println!("0x{}", metadata.to_hex());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_selector(selector: Option<&str>) -> Result<Vec<u8>> {
    match selector {
        Some(s) => hex::decode(s.strip_prefix("0x").unwrap_or(s)).context("Invalid selector hex"),
        None => Ok(ERC20_TRANSFER_SELECTOR.to_vec()),
    }
}

fn build_metadata(
    view_tag: u8,
    amount: Amount,
    token: Option<EthAddress>,
    selector: Option<&str>,
) -> Result<AnnouncementMetadata> {
    match token {
        Some(token) => {
            let selector = parse_selector(selector)?;
            build_token_transfer_metadata(view_tag, &selector, token.as_bytes(), amount)
                .context("Invalid token transfer")
        }
        None => Ok(build_native_transfer_metadata(view_tag, amount)),
    }
}

fn describe_stats(stats: &ScanStats) -> String {
    format!(
        "{} scanned in {} ms ({:.0}/s), {} invalid, {:.1}% filtered by view tag",
        stats.total_scanned,
        stats.duration_ms,
        stats.rate(),
        stats.errors,
        stats.filter_efficiency()
    )
}

fn describe_transfer(transfer: &MetadataKind) -> String {
    match transfer {
        MetadataKind::NativeTransfer { amount } => format!("Native transfer of {} wei", amount),
        MetadataKind::TokenTransfer {
            selector,
            token,
            amount,
        } => format!(
            "Token transfer of {} via 0x{} on {}",
            amount,
            hex::encode(selector),
            token
        ),
    }
}
