//! Error types for key derivation and signing.
//!
//! Every public operation in this crate returns a [`WalletError`]. All of
//! them are structural and deterministic: the same bad input fails the same
//! way every time, so nothing here is worth retrying. Messages describe the
//! shape of the problem and never echo key material.

use thiserror::Error;

use crate::crypto::backend::CurveError;

/// Convenience alias used throughout the crate.
pub type WalletResult<T> = std::result::Result<T, WalletError>;

/// Failures of the derivation engine, the path resolver and the signer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The seed handed to the master-key derivation has an unusable length.
    #[error("invalid seed length: expected {expected_min}..={expected_max} bytes, got {got}")]
    InvalidSeedLength {
        /// Shortest accepted seed.
        expected_min: usize,
        /// Longest accepted seed.
        expected_max: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// A derivation index does not fit in 31 bits.
    #[error("invalid derivation index {0}: must be below 2^31")]
    InvalidIndex(u32),

    /// HD derivation produced a zero or out-of-range scalar, or the identity point.
    #[error("invalid derivation: {0}")]
    InvalidDerivation(String),

    /// A hardened step was requested from public material only.
    #[error("cannot derive hardened child {0}' from a public key")]
    HardenedFromPublic(u32),

    /// The private key could not be used for signing.
    #[error("signing failed: {0}")]
    SigningError(String),

    /// The public key is not a valid point on the curve.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The signature has the wrong length, bad DER, or an out-of-range r/s.
    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    /// Private key bytes are malformed (length, hex, or scalar range).
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The payload could not be interpreted under the requested encoding.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// An xprv/xpub string failed to decode or validate.
    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    /// A textual derivation path could not be parsed.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
}

impl WalletError {
    /// Maps a backend failure raised while building a child or master key.
    pub(crate) fn derivation(err: CurveError) -> Self {
        WalletError::InvalidDerivation(err.to_string())
    }

    /// Maps a backend failure raised while signing.
    pub(crate) fn signing(err: CurveError) -> Self {
        WalletError::SigningError(err.to_string())
    }

    /// Maps a backend failure raised while converting a signature to or from DER.
    pub(crate) fn signature_encoding(err: CurveError) -> Self {
        WalletError::InvalidSignatureEncoding(err.to_string())
    }

    /// Maps a backend failure raised while parsing or using a public key.
    pub(crate) fn public_key(err: CurveError) -> Self {
        WalletError::InvalidPublicKey(err.to_string())
    }
}
