//! # Secret Holders
//!
//! Seeds and private scalars are the only values in this crate that must not
//! outlive their use. Both holders here zero their memory on drop, on every
//! exit path, including when a derivation fails halfway.
//!
//! Neither type implements `Display`, and their `Debug` output only says how
//! many bytes are being held.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::{DEFAULT_SEED_LENGTH, MAX_SEED_LENGTH, MIN_SEED_LENGTH, SCALAR_LENGTH};
use crate::crypto::backend::{CurveBackend, ScalarBytes};
use crate::error::{WalletError, WalletResult};

/// Seed material produced by an external mnemonic-to-seed conversion.
///
/// Accepted lengths are 16 to 64 bytes. Anything else is rejected up front
/// with [`WalletError::InvalidSeedLength`] rather than being fed to HMAC.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: Vec<u8>,
}

impl Seed {
    /// Copies and validates seed bytes.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Self::check_length(bytes.len())?;
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Parses a hex-encoded seed.
    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim())
                .map_err(|_| WalletError::InvalidPayload("seed is not valid hex".into()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Fresh 64-byte seed from the OS CSPRNG.
    ///
    /// Stands in for the mnemonic pipeline in demos and tests; a real wallet
    /// feeds the BIP39 seed through [`Seed::from_bytes`].
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; DEFAULT_SEED_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Raw seed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Seed length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed seed; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn check_length(len: usize) -> WalletResult<()> {
        if !(MIN_SEED_LENGTH..=MAX_SEED_LENGTH).contains(&len) {
            return Err(WalletError::InvalidSeedLength {
                expected_min: MIN_SEED_LENGTH,
                expected_max: MAX_SEED_LENGTH,
                got: len,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({} bytes)", self.bytes.len())
    }
}

/// A private scalar known to lie in `1..n`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar {
    bytes: ScalarBytes,
}

impl SecretScalar {
    /// Validates a 32-byte big-endian scalar against the backend's curve order.
    pub fn from_slice<B: CurveBackend>(backend: &B, bytes: &[u8]) -> WalletResult<Self> {
        let bytes: ScalarBytes = bytes.try_into().map_err(|_| {
            WalletError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                SCALAR_LENGTH,
                bytes.len()
            ))
        })?;
        if !backend.is_valid_scalar(&bytes) {
            return Err(WalletError::InvalidPrivateKey(
                "scalar is zero or not below the curve order".into(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Wraps a scalar the backend has already range-checked.
    pub(crate) fn from_checked(bytes: Zeroizing<ScalarBytes>) -> Self {
        Self { bytes: *bytes }
    }

    /// Borrow the scalar bytes. Keep the borrow short.
    pub fn expose(&self) -> &ScalarBytes {
        &self.bytes
    }
}

impl PartialEq for SecretScalar {
    fn eq(&self, other: &Self) -> bool {
        use p256::elliptic_curve::subtle::ConstantTimeEq;
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }
}

impl Eq for SecretScalar {}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}
