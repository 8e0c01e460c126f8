//! # Key Types
//!
//! secp256r1 private keys, public points and the pairs the wallet paths
//! hand out.
//!
//! Every constructor validates: a [`PrivateKey`] always holds a scalar in
//! `1..n`, a [`PublicKeyPoint`] always holds a point on the curve. Code that
//! receives one of these types never has to re-check it.
//!
//! ## Serialization
//!
//! `PublicKeyPoint` serializes as compressed hex. `PrivateKey` and `KeyPair`
//! deliberately do not implement `Serialize`; exporting a secret goes through
//! [`PrivateKey::to_hex`], which hands back a zeroizing buffer.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::{SCALAR_LENGTH, UNCOMPRESSED_POINT_LENGTH};
use crate::crypto::backend::{CompressedPoint, CurveBackend, ScalarBytes, Secp256r1, UncompressedPoint};
use crate::crypto::secret::SecretScalar;
use crate::error::{WalletError, WalletResult};

/// A validated secp256r1 private key with its public point cached.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    scalar: SecretScalar,
    public: PublicKeyPoint,
}

/// A point on secp256r1, stored compressed.
///
/// Accepts either SEC1 form on input. The compressed form is canonical, so
/// two values compare equal exactly when they name the same point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKeyPoint {
    compressed: CompressedPoint,
}

/// A private key and the public key derived from it.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKeyPoint,
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

impl PrivateKey {
    /// Parses 32 big-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Self::from_bytes_with(&Secp256r1, bytes)
    }

    /// Same as [`PrivateKey::from_bytes`] with an explicit curve backend.
    pub fn from_bytes_with<B: CurveBackend>(backend: &B, bytes: &[u8]) -> WalletResult<Self> {
        let scalar = SecretScalar::from_slice(backend, bytes)?;
        Self::from_scalar(backend, scalar)
    }

    /// Parses a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim())
                .map_err(|_| WalletError::InvalidPrivateKey("not valid hex".into()))?,
        );
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_scalar<B: CurveBackend>(
        backend: &B,
        scalar: SecretScalar,
    ) -> WalletResult<Self> {
        let point = backend
            .public_key(scalar.expose())
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self {
            scalar,
            public: PublicKeyPoint::from_checked(point),
        })
    }

    /// The matching public point.
    pub fn public_key(&self) -> &PublicKeyPoint {
        &self.public
    }

    /// Copies the scalar out. The buffer is wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<ScalarBytes> {
        Zeroizing::new(*self.scalar.expose())
    }

    /// Lowercase hex of the scalar. The string is wiped when dropped.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.scalar.expose()))
    }

    pub(crate) fn scalar(&self) -> &SecretScalar {
        &self.scalar
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the public half is printable.
        write!(f, "PrivateKey(pub={})", self.public.to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKeyPoint
// ---------------------------------------------------------------------------

impl PublicKeyPoint {
    /// Parses a SEC1 point, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_sec1(bytes: &[u8]) -> WalletResult<Self> {
        Self::from_sec1_with(&Secp256r1, bytes)
    }

    /// Same as [`PublicKeyPoint::from_sec1`] with an explicit curve backend.
    pub fn from_sec1_with<B: CurveBackend>(backend: &B, bytes: &[u8]) -> WalletResult<Self> {
        let compressed = backend.compress(bytes).map_err(WalletError::public_key)?;
        Ok(Self { compressed })
    }

    /// Parses a hex-encoded SEC1 point in either form.
    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|_| WalletError::InvalidPublicKey("not valid hex".into()))?;
        Self::from_sec1(&bytes)
    }

    /// Wraps a point a backend has just produced or validated.
    pub(crate) fn from_checked(compressed: CompressedPoint) -> Self {
        Self { compressed }
    }

    /// The 33-byte compressed encoding.
    pub fn as_compressed(&self) -> &CompressedPoint {
        &self.compressed
    }

    /// Compressed hex, the form the wallet service stores and displays.
    pub fn to_hex(&self) -> String {
        hex::encode(self.compressed)
    }

    /// The 65-byte `04 ‖ x ‖ y` encoding.
    pub fn to_uncompressed(&self) -> WalletResult<UncompressedPoint> {
        Secp256r1
            .decompress(&self.compressed)
            .map_err(WalletError::public_key)
    }

    /// Uncompressed hex.
    pub fn to_uncompressed_hex(&self) -> WalletResult<String> {
        Ok(hex::encode(self.to_uncompressed()?))
    }

    /// Bare `x ‖ y` with no SEC1 prefix, for consumers that want the raw point.
    pub fn to_raw_xy(&self) -> WalletResult<[u8; 2 * SCALAR_LENGTH]> {
        let full = self.to_uncompressed()?;
        let mut raw = [0u8; 2 * SCALAR_LENGTH];
        raw.copy_from_slice(&full[1..UNCOMPRESSED_POINT_LENGTH]);
        Ok(raw)
    }
}

impl TryFrom<String> for PublicKeyPoint {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PublicKeyPoint> for String {
    fn from(value: PublicKeyPoint) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for PublicKeyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKeyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyPoint({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

impl KeyPair {
    /// Pairs a private key with its own public point.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = *private.public_key();
        Self { private, public }
    }

    /// The private half.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKeyPoint {
        &self.public
    }

    /// Splits the pair.
    pub fn into_parts(self) -> (PrivateKey, PublicKeyPoint) {
        (self.private, self.public)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public.to_hex())
    }
}
