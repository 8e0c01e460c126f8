//! # CLI Interface
//!
//! Command-line structure for `ela-keytool`, built with `clap` derive.
//! Secrets may come from the environment (`ELA_SEED`, `ELA_PRIVATE_KEY`) so
//! they stay out of shell history.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Elastos wallet key tool.
///
/// Derives secp256r1 wallet keys from a seed, exports extended public keys,
/// and signs or verifies messages.
#[derive(Parser, Debug)]
#[command(
    name = "ela-keytool",
    about = "Elastos wallet key derivation and signing",
    version,
    propagate_version = true
)]
pub struct KeytoolCli {
    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "ELA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive a key pair along one of the wallet paths.
    Derive(DeriveArgs),
    /// Export an extended public key for watch-only derivation.
    Xpub(XpubArgs),
    /// Derive a receive public key from an extended public key.
    SubKey(SubKeyArgs),
    /// Sign a message with a hex private key.
    Sign(SignArgs),
    /// Verify a signature. Prints `true` or `false`.
    Verify(VerifyArgs),
    /// Generate a random 64-byte seed.
    NewSeed,
    /// Print version information and exit.
    Version,
}

/// Which fixed path to derive along.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletKind {
    /// `m/44'/0'/0'/0/0`
    Single,
    /// `m/44'/0'/0'/0/<index>`
    Multi,
    /// `m/0'/0/<index>`
    Did,
    /// `m/0'`
    IdChain,
}

/// Which extended public key to export.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpubChain {
    /// `m/44'/0'/0'`, parent of the multi-account receive keys.
    Account,
    /// `m/0'`, parent of the DID keys.
    IdChain,
}

/// Seed input shared by the derivation commands.
#[derive(Args, Debug)]
pub struct SeedArg {
    /// Hex-encoded seed (16 to 64 bytes).
    #[arg(long, env = "ELA_SEED", hide_env_values = true)]
    pub seed: String,
}

/// Arguments for the `derive` subcommand.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub seed: SeedArg,

    /// Wallet path to derive along.
    #[arg(long, value_enum, default_value = "single")]
    pub wallet: WalletKind,

    /// Address index for `multi` and `did` wallets.
    #[arg(long, default_value_t = 0)]
    pub index: u32,

    /// Also print the private key.
    #[arg(long)]
    pub show_private: bool,

    /// Print a JSON object instead of plain lines.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `xpub` subcommand.
#[derive(Args, Debug)]
pub struct XpubArgs {
    #[command(flatten)]
    pub seed: SeedArg,

    /// Subtree to export.
    #[arg(long, value_enum, default_value = "account")]
    pub chain: XpubChain,
}

/// Arguments for the `sub-key` subcommand.
#[derive(Args, Debug)]
pub struct SubKeyArgs {
    /// Base58Check `xpub` string.
    #[arg(long)]
    pub xpub: String,

    /// Receive index below the exported key.
    #[arg(long)]
    pub index: u32,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Hex-encoded 32-byte private key.
    #[arg(long, env = "ELA_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Message to sign.
    #[arg(long)]
    pub message: String,

    /// Treat the message as hex and sign the decoded bytes.
    #[arg(long)]
    pub hex: bool,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Hex-encoded SEC1 public key, compressed or uncompressed.
    #[arg(long)]
    pub public_key: String,

    /// Message that was signed.
    #[arg(long)]
    pub message: String,

    /// 128-character hex signature.
    #[arg(long)]
    pub signature: String,

    /// Treat the message as hex and verify the decoded bytes.
    #[arg(long)]
    pub hex: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        KeytoolCli::command().debug_assert();
    }

    #[test]
    fn derive_parses_wallet_and_index() {
        let cli = KeytoolCli::try_parse_from([
            "ela-keytool",
            "derive",
            "--seed",
            "00ff",
            "--wallet",
            "did",
            "--index",
            "7",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Derive(args) => {
                assert_eq!(args.wallet, WalletKind::Did);
                assert_eq!(args.index, 7);
                assert!(args.json);
                assert!(!args.show_private);
                assert_eq!(args.seed.seed, "00ff");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn verbosity_is_global() {
        let cli = KeytoolCli::try_parse_from(["ela-keytool", "new-seed", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::NewSeed));
    }

    #[test]
    fn sub_key_requires_index() {
        assert!(KeytoolCli::try_parse_from(["ela-keytool", "sub-key", "--xpub", "xpub123"]).is_err());
    }
}
