// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ela-wallet: HD Keys & P-256 Signatures
//!
//! The key-management core of an Elastos wallet: take one seed, grow a
//! deterministic tree of secp256r1 key pairs along a handful of fixed paths,
//! and sign/verify payloads in the fixed-width `r‖s` format the wallet
//! service speaks.
//!
//! ## Architecture
//!
//! - **crypto**: Curve backend trait and its P-256 implementation, secret
//!   holders that zeroize on drop, key types, hashing, and the signer.
//! - **hd**: BIP32-style extended keys and the derivation engine.
//! - **wallet**: The named wallet paths (multi-account, DID, identity
//!   chain) and the accessors built on top of them.
//! - **config**: Every constant that makes keys bit-compatible with
//!   existing wallets.
//! - **error**: The crate-wide error enum.
//!
//! ## Data flow
//!
//! ```text
//! seed ──► HdEngine::master_from_seed ──► walk fixed path ──► KeyPair
//!                                                              │
//!                           payload ──► sign / verify ◄────────┘
//! ```
//!
//! ## Quick start
//!
//! ```
//! use ela_wallet::crypto::{sign, verify, PayloadEncoding, Seed};
//! use ela_wallet::wallet::get_single_wallet;
//!
//! let seed = Seed::from_bytes(&[7u8; 64]).unwrap();
//! let pair = get_single_wallet(&seed).unwrap();
//!
//! let sig = sign(b"hello", PayloadEncoding::Raw, pair.private_key()).unwrap();
//! assert!(verify(b"hello", PayloadEncoding::Raw, &sig, pair.public_key()).unwrap());
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod hd;
pub mod wallet;

pub use error::{WalletError, WalletResult};
