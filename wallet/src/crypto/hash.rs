//! # Hashing Utilities
//!
//! The digests BIP32 bookkeeping needs: **SHA-256**, and **HASH160**
//! (`RIPEMD160(SHA256(x))`) for parent fingerprints.
//!
//! ECDSA hashes its own input inside the backend, and `bs58` computes the
//! Base58Check checksum, so nothing here is on the signing or serialization
//! path.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 digest as a fixed-size array.
///
/// # Example
///
/// ```
/// use ela_wallet::crypto::sha256;
///
/// let hash = sha256(b"elastos");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `RIPEMD160(SHA256(data))`, the identifier BIP32 fingerprints are cut from.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

/// First four bytes of [`hash160`] of a compressed public key.
pub fn fingerprint(compressed_point: &[u8]) -> [u8; 4] {
    let id = hash160(compressed_point);
    [id[0], id[1], id[2], id[3]]
}
