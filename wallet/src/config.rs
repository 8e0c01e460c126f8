//! # Derivation & Curve Constants
//!
//! Every magic number that decides whether our keys match the ones an
//! existing Elastos wallet derived from the same seed lives here. Changing
//! any of them silently forks the key tree, so treat this file as frozen.

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

/// Shortest seed accepted by the master-key derivation (128 bits).
pub const MIN_SEED_LENGTH: usize = 16;

/// Longest seed accepted by the master-key derivation (512 bits).
pub const MAX_SEED_LENGTH: usize = 64;

/// Seed length produced by the BIP39 mnemonic pipeline.
pub const DEFAULT_SEED_LENGTH: usize = 64;

/// HMAC key for the master node. The wallet library keeps the Bitcoin
/// domain string even though the curve is P-256.
pub const BITCOIN_SEED_DOMAIN: &[u8] = b"Bitcoin seed";

/// SLIP-0010 HMAC key for nist256p1. Only used for interop and test vectors.
pub const NIST256P1_SEED_DOMAIN: &[u8] = b"Nist256p1 seed";

// ---------------------------------------------------------------------------
// Curve parameters
// ---------------------------------------------------------------------------

/// Named curve used for every key in the tree.
pub const CURVE_NAME: &str = "secp256r1";

/// Byte length of a scalar (private key, r, s) on P-256.
pub const SCALAR_LENGTH: usize = 32;

/// SEC1 compressed point length.
pub const COMPRESSED_POINT_LENGTH: usize = 33;

/// SEC1 uncompressed point length.
pub const UNCOMPRESSED_POINT_LENGTH: usize = 65;

/// Chain code length for extended keys.
pub const CHAIN_CODE_LENGTH: usize = 32;

/// Concatenated `r‖s` signature length.
pub const SIGNATURE_LENGTH: usize = 2 * SCALAR_LENGTH;

/// Digest algorithm applied to payloads before signing.
pub const SIGNATURE_DIGEST: &str = "SHA-256";

// ---------------------------------------------------------------------------
// BIP32
// ---------------------------------------------------------------------------

/// First hardened child number (2^31).
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Largest index a derivation step may carry (2^31 - 1).
pub const MAX_CHILD_INDEX: u32 = HARDENED_OFFSET - 1;

/// Serialized extended key length, excluding the 4-byte checksum.
pub const EXTENDED_KEY_LENGTH: usize = 78;

/// Base58Check checksum length.
pub const CHECKSUM_LENGTH: usize = 4;

/// `xprv` version bytes.
pub const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// `xpub` version bytes.
pub const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

// ---------------------------------------------------------------------------
// Wallet paths
// ---------------------------------------------------------------------------

/// BIP44 purpose for the multi-account wallet (hardened).
pub const BIP44_PURPOSE: u32 = 44;

/// Coin type used by the wallet (hardened). The library derives under 0.
pub const COIN_TYPE: u32 = 0;

/// Account index under the coin type (hardened).
pub const DEFAULT_ACCOUNT: u32 = 0;

/// External (receive) chain under the account.
pub const EXTERNAL_CHAIN: u32 = 0;

/// Root index of the identity-chain subtree (hardened).
pub const ID_CHAIN_ROOT: u32 = 0;

/// Chain under the identity-chain root that holds DID sub-keys.
pub const ID_CHAIN_SUB_CHAIN: u32 = 0;
