// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ELA Key Tool
//!
//! Entry point for the `ela-keytool` binary. Parses CLI arguments,
//! initializes logging, and runs one wallet operation against `ela-wallet`.
//!
//! - `derive`  : key pair along a wallet path
//! - `xpub`    : export the account or identity-chain xpub
//! - `sub-key` : receive public key from an xpub
//! - `sign`    : sign a message
//! - `verify`  : check a signature
//! - `new-seed`: random seed
//! - `version` : print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use ela_wallet::crypto::{sign_hex, verify_hex, KeyPair, PayloadEncoding, Seed};
use ela_wallet::hd::{DerivationPath, ExtendedPublicKey, HdEngine};
use ela_wallet::wallet::{
    generate_sub_public_key, get_did_wallet, get_id_chain_master_extended_public_key,
    get_master_public_key, get_multi_wallet, get_single_wallet, walk_path,
};

use cli::{Commands, KeytoolCli, WalletKind, XpubChain};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = KeytoolCli::parse();

    logging::init_logging(
        logging::default_level(cli.verbose),
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Derive(args) => derive(args),
        Commands::Xpub(args) => export_xpub(args),
        Commands::SubKey(args) => sub_key(args),
        Commands::Sign(args) => sign_message(args),
        Commands::Verify(args) => verify_message(args),
        Commands::NewSeed => {
            println!("{}", hex::encode(Seed::generate().as_bytes()));
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// JSON shape printed by `derive --json`.
#[derive(Serialize)]
struct DerivedKey {
    path: String,
    public_key: String,
    public_key_uncompressed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
}

fn parse_seed(hex_seed: &str) -> Result<Seed> {
    Seed::from_hex(hex_seed).context("invalid --seed")
}

fn payload_encoding(hex: bool) -> PayloadEncoding {
    if hex {
        PayloadEncoding::Hex
    } else {
        PayloadEncoding::Raw
    }
}

fn derive(args: cli::DeriveArgs) -> Result<()> {
    let seed = parse_seed(&args.seed.seed)?;
    let (path, pair) = derive_pair(&seed, args.wallet, args.index)
        .with_context(|| format!("failed to derive {:?} wallet", args.wallet))?;

    tracing::info!(%path, wallet = ?args.wallet, "derived key pair");

    let public_key = pair.public_key();
    let output = DerivedKey {
        path: path.to_string(),
        public_key: public_key.to_hex(),
        public_key_uncompressed: public_key.to_uncompressed_hex()?,
        private_key: args
            .show_private
            .then(|| pair.private_key().to_hex().as_str().to_owned()),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to encode JSON")?
        );
    } else {
        println!("path:         {}", output.path);
        println!("public key:   {}", output.public_key);
        println!("uncompressed: {}", output.public_key_uncompressed);
        if let Some(private_key) = &output.private_key {
            println!("private key:  {private_key}");
        }
    }
    Ok(())
}

fn derive_pair(
    seed: &Seed,
    kind: WalletKind,
    index: u32,
) -> ela_wallet::WalletResult<(DerivationPath, KeyPair)> {
    match kind {
        WalletKind::Single => Ok((DerivationPath::multi_wallet(0)?, get_single_wallet(seed)?)),
        WalletKind::Multi => Ok((
            DerivationPath::multi_wallet(index)?,
            get_multi_wallet(seed, index)?,
        )),
        WalletKind::Did => Ok((
            DerivationPath::did_wallet(index)?,
            get_did_wallet(seed, index)?,
        )),
        WalletKind::IdChain => {
            let path = DerivationPath::id_chain_master()?;
            let master = HdEngine::new().master_from_seed(seed)?;
            let pair = walk_path(&master, &path)?;
            Ok((path, pair))
        }
    }
}

fn export_xpub(args: cli::XpubArgs) -> Result<()> {
    let seed = parse_seed(&args.seed.seed)?;
    let xpub = match args.chain {
        XpubChain::Account => get_master_public_key(&seed),
        XpubChain::IdChain => get_id_chain_master_extended_public_key(&seed),
    }
    .with_context(|| format!("failed to export {:?} xpub", args.chain))?;

    tracing::info!(
        chain = ?args.chain,
        depth = xpub.depth(),
        fingerprint = %hex::encode(xpub.fingerprint()),
        "exported extended public key"
    );
    println!("{xpub}");
    Ok(())
}

fn sub_key(args: cli::SubKeyArgs) -> Result<()> {
    let xpub: ExtendedPublicKey = args.xpub.parse().context("invalid --xpub")?;
    let public_key = generate_sub_public_key(&xpub, args.index)
        .with_context(|| format!("failed to derive sub key {}", args.index))?;
    println!("{public_key}");
    Ok(())
}

fn sign_message(args: cli::SignArgs) -> Result<()> {
    let signature = sign_hex(
        &args.private_key,
        args.message.as_bytes(),
        payload_encoding(args.hex),
    )
    .context("signing failed")?;
    println!("{signature}");
    Ok(())
}

fn verify_message(args: cli::VerifyArgs) -> Result<()> {
    let valid = verify_hex(
        &args.public_key,
        args.message.as_bytes(),
        payload_encoding(args.hex),
        &args.signature,
    )
    .context("verification failed")?;
    tracing::info!(valid, "signature checked");
    println!("{valid}");
    Ok(())
}

/// Prints version information.
fn print_version() {
    println!("ela-keytool {}", env!("CARGO_PKG_VERSION"));
    println!(
        "curve: {} ({})",
        ela_wallet::config::CURVE_NAME,
        ela_wallet::config::SIGNATURE_DIGEST
    );
    println!("rustc: {}", rustc_version());
}

/// Returns the compiler version from the build-time environment, or "unknown".
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
