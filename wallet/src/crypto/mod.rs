//! # Cryptographic Primitives
//!
//! Everything below the derivation tree: the curve backend, secret holders,
//! key types, digests and the signer.
//!
//! Nothing here rolls its own math. Scalar and point arithmetic, HMAC and
//! ECDSA all come from the RustCrypto crates behind [`backend::Secp256r1`];
//! this module adds validation, zeroization and the wire formats the wallet
//! service expects.

pub mod backend;
pub mod hash;
pub mod keys;
pub mod secret;
pub mod signatures;

pub use backend::{CurveBackend, CurveError, Secp256r1, SignatureBytes};
pub use hash::{hash160, sha256};
pub use keys::{KeyPair, PrivateKey, PublicKeyPoint};
pub use secret::{SecretScalar, Seed};
pub use signatures::{sign, sign_hex, verify, verify_hex, PayloadEncoding, Signature};
