//! # Extended Keys
//!
//! A key plus the chain code and metadata needed to keep deriving below it,
//! with the standard BIP32 Base58Check serialization:
//!
//! ```text
//! version (4) ‖ depth (1) ‖ parent fingerprint (4) ‖ child number (4)
//!   ‖ chain code (32) ‖ key data (33)  ‖ checksum (4)
//! ```
//!
//! Key data is `0x00 ‖ k` for an xprv and the compressed point for an xpub.
//! Version bytes are the Bitcoin mainnet ones (`xprv`/`xpub` prefixes); the
//! curve is not encoded, so these strings only make sense to P-256 tooling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::config::{
    CHAIN_CODE_LENGTH, CHECKSUM_LENGTH, COMPRESSED_POINT_LENGTH, EXTENDED_KEY_LENGTH,
    XPRV_VERSION, XPUB_VERSION,
};
use crate::crypto::backend::{CurveBackend, Secp256r1};
use crate::crypto::hash;
use crate::crypto::keys::{KeyPair, PrivateKey, PublicKeyPoint};
use crate::error::{WalletError, WalletResult};
use crate::hd::path::DerivationStep;

/// 32-byte chain code.
pub type ChainCode = [u8; CHAIN_CODE_LENGTH];

/// BIP32 node metadata shared by both key kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeMeta {
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_number: u32,
}

impl NodeMeta {
    pub(crate) const MASTER: NodeMeta = NodeMeta {
        depth: 0,
        parent_fingerprint: [0; 4],
        child_number: 0,
    };
}

/// Private node of the derivation tree.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPrivateKey {
    private_key: PrivateKey,
    chain_code: ChainCode,
    meta: NodeMeta,
}

/// Public node of the derivation tree.
///
/// Serializes (serde, `Display`) as its xpub string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtendedPublicKey {
    public_key: PublicKeyPoint,
    chain_code: ChainCode,
    meta: NodeMeta,
}

// ---------------------------------------------------------------------------
// ExtendedPrivateKey
// ---------------------------------------------------------------------------

impl ExtendedPrivateKey {
    pub(crate) fn new(private_key: PrivateKey, chain_code: ChainCode, meta: NodeMeta) -> Self {
        Self {
            private_key,
            chain_code,
            meta,
        }
    }

    /// The node's private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The node's public key.
    pub fn public_key(&self) -> &PublicKeyPoint {
        self.private_key.public_key()
    }

    /// Private and public key of this node.
    pub fn key_pair(&self) -> KeyPair {
        KeyPair::from_private(self.private_key.clone())
    }

    /// Chain code used to derive children.
    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// Distance from the master node.
    pub fn depth(&self) -> u8 {
        self.meta.depth
    }

    /// Fingerprint of the parent's public key (zero for the master).
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.meta.parent_fingerprint
    }

    /// Wire child number this node was derived with.
    pub fn child_number(&self) -> u32 {
        self.meta.child_number
    }

    /// The step that produced this node, or `None` for the master.
    pub fn step(&self) -> Option<DerivationStep> {
        (self.meta.depth > 0).then(|| DerivationStep::from_child_number(self.meta.child_number))
    }

    /// Fingerprint children of this node will record as their parent.
    pub fn fingerprint(&self) -> [u8; 4] {
        hash::fingerprint(self.public_key().as_compressed())
    }

    /// The public projection of this node.
    pub fn to_extended_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey::new(*self.public_key(), self.chain_code, self.meta)
    }

    /// `xprv…` string. Wiped from memory when dropped.
    pub fn to_base58(&self) -> Zeroizing<String> {
        let mut key_data = Zeroizing::new([0u8; COMPRESSED_POINT_LENGTH]);
        key_data[1..].copy_from_slice(&self.private_key.to_bytes()[..]);
        encode(XPRV_VERSION, &self.meta, &self.chain_code, &key_data)
    }

    /// Parses an `xprv…` string.
    pub fn from_base58(s: &str) -> WalletResult<Self> {
        Self::from_base58_with(&Secp256r1, s)
    }

    /// [`ExtendedPrivateKey::from_base58`] with an explicit curve backend.
    pub fn from_base58_with<B: CurveBackend>(backend: &B, s: &str) -> WalletResult<Self> {
        let raw = decode(s, XPRV_VERSION)?;
        if raw.key_data[0] != 0x00 {
            return Err(WalletError::InvalidExtendedKey(
                "private key data must start with 0x00".into(),
            ));
        }
        let private_key = PrivateKey::from_bytes_with(backend, &raw.key_data[1..])
            .map_err(|e| WalletError::InvalidExtendedKey(e.to_string()))?;
        Ok(Self::new(private_key, raw.chain_code, raw.meta))
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        self.chain_code.zeroize();
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("public_key", self.public_key())
            .field("depth", &self.meta.depth)
            .field("child_number", &self.meta.child_number)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ExtendedPublicKey
// ---------------------------------------------------------------------------

impl ExtendedPublicKey {
    pub(crate) fn new(public_key: PublicKeyPoint, chain_code: ChainCode, meta: NodeMeta) -> Self {
        Self {
            public_key,
            chain_code,
            meta,
        }
    }

    /// The node's public key.
    pub fn public_key(&self) -> &PublicKeyPoint {
        &self.public_key
    }

    /// Chain code used to derive children.
    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// Distance from the master node.
    pub fn depth(&self) -> u8 {
        self.meta.depth
    }

    /// Fingerprint of the parent's public key (zero for the master).
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.meta.parent_fingerprint
    }

    /// Wire child number this node was derived with.
    pub fn child_number(&self) -> u32 {
        self.meta.child_number
    }

    /// Fingerprint children of this node will record as their parent.
    pub fn fingerprint(&self) -> [u8; 4] {
        hash::fingerprint(self.public_key.as_compressed())
    }

    /// `xpub…` string.
    pub fn to_base58(&self) -> String {
        encode(
            XPUB_VERSION,
            &self.meta,
            &self.chain_code,
            self.public_key.as_compressed(),
        )
        .as_str()
        .to_owned()
    }

    /// Parses an `xpub…` string.
    pub fn from_base58(s: &str) -> WalletResult<Self> {
        Self::from_base58_with(&Secp256r1, s)
    }

    /// [`ExtendedPublicKey::from_base58`] with an explicit curve backend.
    pub fn from_base58_with<B: CurveBackend>(backend: &B, s: &str) -> WalletResult<Self> {
        let raw = decode(s, XPUB_VERSION)?;
        if !matches!(raw.key_data[0], 0x02 | 0x03) {
            return Err(WalletError::InvalidExtendedKey(
                "public key data must be a compressed point".into(),
            ));
        }
        let public_key = PublicKeyPoint::from_sec1_with(backend, &raw.key_data[..])
            .map_err(|e| WalletError::InvalidExtendedKey(e.to_string()))?;
        Ok(Self::new(public_key, raw.chain_code, raw.meta))
    }
}

impl fmt::Display for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPublicKey")
            .field("public_key", &self.public_key)
            .field("depth", &self.meta.depth)
            .field("child_number", &self.meta.child_number)
            .finish_non_exhaustive()
    }
}

impl FromStr for ExtendedPublicKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl TryFrom<String> for ExtendedPublicKey {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base58(&value)
    }
}

impl From<ExtendedPublicKey> for String {
    fn from(value: ExtendedPublicKey) -> Self {
        value.to_base58()
    }
}

// ---------------------------------------------------------------------------
// Base58Check layout
// ---------------------------------------------------------------------------

struct RawExtendedKey {
    meta: NodeMeta,
    chain_code: ChainCode,
    key_data: Zeroizing<[u8; COMPRESSED_POINT_LENGTH]>,
}

fn encode(
    version: [u8; 4],
    meta: &NodeMeta,
    chain_code: &ChainCode,
    key_data: &[u8; COMPRESSED_POINT_LENGTH],
) -> Zeroizing<String> {
    let mut payload = Zeroizing::new(Vec::with_capacity(EXTENDED_KEY_LENGTH));
    payload.extend_from_slice(&version);
    payload.push(meta.depth);
    payload.extend_from_slice(&meta.parent_fingerprint);
    payload.extend_from_slice(&meta.child_number.to_be_bytes());
    payload.extend_from_slice(chain_code);
    payload.extend_from_slice(key_data);
    Zeroizing::new(bs58::encode(&payload[..]).with_check().into_string())
}

fn decode(s: &str, expected_version: [u8; 4]) -> WalletResult<RawExtendedKey> {
    // `with_check` verifies and strips the 4-byte checksum.
    let payload = bs58::decode(s.trim())
        .with_check(None)
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidChecksum { .. } => {
                WalletError::InvalidExtendedKey("checksum mismatch".into())
            }
            other => WalletError::InvalidExtendedKey(format!("bad base58: {other}")),
        })?;
    let payload = Zeroizing::new(payload);
    if payload.len() != EXTENDED_KEY_LENGTH {
        return Err(WalletError::InvalidExtendedKey(format!(
            "expected {} bytes, got {}",
            EXTENDED_KEY_LENGTH + CHECKSUM_LENGTH,
            payload.len() + CHECKSUM_LENGTH
        )));
    }
    if payload[..4] != expected_version {
        return Err(WalletError::InvalidExtendedKey(format!(
            "unexpected version {}",
            hex::encode(&payload[..4])
        )));
    }

    let depth = payload[4];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&payload[5..9]);
    let mut child_number = [0u8; 4];
    child_number.copy_from_slice(&payload[9..13]);
    let child_number = u32::from_be_bytes(child_number);
    if depth == 0 && (parent_fingerprint != [0; 4] || child_number != 0) {
        return Err(WalletError::InvalidExtendedKey(
            "master key with non-zero parent fingerprint or child number".into(),
        ));
    }

    let mut chain_code = [0u8; CHAIN_CODE_LENGTH];
    chain_code.copy_from_slice(&payload[13..45]);
    let mut key_data = Zeroizing::new([0u8; COMPRESSED_POINT_LENGTH]);
    key_data.copy_from_slice(&payload[45..EXTENDED_KEY_LENGTH]);

    Ok(RawExtendedKey {
        meta: NodeMeta {
            depth,
            parent_fingerprint,
            child_number,
        },
        chain_code,
        key_data,
    })
}
