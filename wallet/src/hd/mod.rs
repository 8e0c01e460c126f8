//! # Hierarchical Deterministic Keys
//!
//! BIP32-style derivation over secp256r1: paths, extended keys and the
//! engine that walks from one to the other.

pub mod engine;
pub mod extended;
pub mod path;

pub use engine::{HdEngine, SeedDomain};
pub use extended::{ChainCode, ExtendedPrivateKey, ExtendedPublicKey};
pub use path::{DerivationPath, DerivationStep};
