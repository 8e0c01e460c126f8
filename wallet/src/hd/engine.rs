//! # Derivation Engine
//!
//! BIP32 child-key derivation on whatever curve the backend implements.
//!
//! ## Master key
//!
//! `I = HMAC-SHA512(domain, seed)`; the left half is the master scalar, the
//! right half the chain code. The wallet has always used the Bitcoin domain
//! string `"Bitcoin seed"` even on P-256, so that is the default. The
//! SLIP-0010 domain is available for interop with other nist256p1 wallets.
//!
//! ## Children
//!
//! ```text
//! hardened:      I = HMAC-SHA512(c, 0x00 ‖ k ‖ ser32(i + 2^31))
//! non-hardened:  I = HMAC-SHA512(c, serP(K) ‖ ser32(i))
//! child key:     k_i = IL + k  (mod n)      K_i = IL·G + K
//! ```
//!
//! An `IL >= n` or a zero/identity result is an [`WalletError::InvalidDerivation`].
//! The engine does not skip to the next index the way some BIP32
//! implementations do; the probability is about 2^-127 and silently moving
//! a key would break the fixed wallet paths.
//!
//! The engine is stateless apart from its backend and domain, so a single
//! instance can be shared across threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::config::{BITCOIN_SEED_DOMAIN, CHAIN_CODE_LENGTH, NIST256P1_SEED_DOMAIN, SCALAR_LENGTH};
use crate::crypto::backend::{CurveBackend, CurveError, ScalarBytes, Secp256r1};
use crate::crypto::keys::{PrivateKey, PublicKeyPoint};
use crate::crypto::secret::{SecretScalar, Seed};
use crate::error::{WalletError, WalletResult};
use crate::hd::extended::{ChainCode, ExtendedPrivateKey, ExtendedPublicKey, NodeMeta};
use crate::hd::path::{DerivationPath, DerivationStep};

/// HMAC key used to turn a seed into the master node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedDomain {
    /// `"Bitcoin seed"`. Used for every wallet path.
    #[default]
    Bitcoin,
    /// `"Nist256p1 seed"` (SLIP-0010).
    Nist256p1,
}

impl SeedDomain {
    /// The HMAC key bytes.
    pub fn hmac_key(&self) -> &'static [u8] {
        match self {
            SeedDomain::Bitcoin => BITCOIN_SEED_DOMAIN,
            SeedDomain::Nist256p1 => NIST256P1_SEED_DOMAIN,
        }
    }
}

/// Derives extended keys over a curve backend.
///
/// # Example
///
/// ```
/// use ela_wallet::crypto::Seed;
/// use ela_wallet::hd::{DerivationPath, HdEngine};
///
/// let engine = HdEngine::new();
/// let master = engine.master_from_seed(&Seed::from_bytes(&[0u8; 64]).unwrap()).unwrap();
/// let leaf = engine.walk(&master, &DerivationPath::multi_wallet(0).unwrap()).unwrap();
///
/// assert_eq!(leaf.depth(), 5);
/// assert_eq!(
///     leaf.public_key().to_hex(),
///     "039c1d101601f5fbcc119a2a9cc81028169d001b1c1c730f12387e3b6901629b70",
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct HdEngine<B: CurveBackend = Secp256r1> {
    backend: B,
    domain: SeedDomain,
}

impl HdEngine<Secp256r1> {
    /// P-256 engine with the Bitcoin seed domain.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: CurveBackend> HdEngine<B> {
    /// Engine over a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            domain: SeedDomain::default(),
        }
    }

    /// Same engine, different master-key domain.
    pub fn with_domain(mut self, domain: SeedDomain) -> Self {
        self.domain = domain;
        self
    }

    /// The curve backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The master-key domain.
    pub fn domain(&self) -> SeedDomain {
        self.domain
    }

    /// Master node for a validated seed.
    ///
    /// This is the root every wallet path hangs off. The seed goes through
    /// HMAC-SHA512 keyed with this engine's [`SeedDomain`]; the left half
    /// becomes the master scalar, the right half the chain code. The master
    /// node has depth 0, a zero parent fingerprint and child number 0.
    ///
    /// # Arguments
    ///
    /// * `seed` - Wallet seed, already length-checked by [`Seed`]. For the
    ///   mnemonic-backed wallets this is the 64-byte BIP39 output.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidDerivation`] if the left half is zero or not
    /// below the curve order. No retry is attempted: a seed that hits this
    /// (odds around 2^-127) has no master key under this domain.
    pub fn master_from_seed(&self, seed: &Seed) -> WalletResult<ExtendedPrivateKey> {
        self.master_from_seed_bytes(seed.as_bytes())
    }

    /// Master node for raw seed bytes. Fails with
    /// [`WalletError::InvalidSeedLength`] outside 16..=64 bytes.
    pub fn master_from_seed_bytes(&self, seed: &[u8]) -> WalletResult<ExtendedPrivateKey> {
        Seed::check_length(seed.len())?;

        let i = self
            .backend
            .hmac_sha512(self.domain.hmac_key(), &[seed])
            .map_err(WalletError::derivation)?;
        let (il, chain_code) = split_hmac(&i);

        if !self.backend.is_valid_scalar(&il) {
            warn!(domain = ?self.domain, "seed produced an unusable master scalar");
            return Err(WalletError::InvalidDerivation(
                "master scalar is zero or not below the curve order".into(),
            ));
        }
        let private_key = PrivateKey::from_scalar(&self.backend, SecretScalar::from_checked(il))?;

        debug!(
            domain = ?self.domain,
            public_key = %private_key.public_key(),
            "derived master key"
        );
        Ok(ExtendedPrivateKey::new(private_key, chain_code, NodeMeta::MASTER))
    }

    /// CKDpriv: one private child.
    ///
    /// Hardened steps mix the parent's private scalar into the HMAC, so their
    /// children can only ever be reached from the private side. Non-hardened
    /// steps use the compressed public key instead, which is what lets
    /// [`HdEngine::derive_public_child`] arrive at the same public key from an
    /// xpub.
    ///
    /// # Arguments
    ///
    /// * `parent` - The node to derive from.
    /// * `step` - Index and hardening flag of the child.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidDerivation`] if the parent is already at depth
    /// 255, or if `IL` is not below the order or the child scalar comes out
    /// zero. The caller decides what to do with a dead index; the engine
    /// never substitutes the next one.
    pub fn derive_child(
        &self,
        parent: &ExtendedPrivateKey,
        step: DerivationStep,
    ) -> WalletResult<ExtendedPrivateKey> {
        let depth = child_depth(parent.depth())?;
        let child_number = step.child_number().to_be_bytes();
        let secret = parent.private_key().scalar().expose();

        let i = if step.is_hardened() {
            self.backend
                .hmac_sha512(parent.chain_code(), &[&[0x00u8][..], &secret[..], &child_number[..]])
        } else {
            self.backend.hmac_sha512(
                parent.chain_code(),
                &[&parent.public_key().as_compressed()[..], &child_number[..]],
            )
        }
        .map_err(WalletError::derivation)?;
        let (il, chain_code) = split_hmac(&i);

        let child_scalar = self
            .backend
            .add_scalars(secret, &il)
            .map_err(|e| degenerate(step, depth, e))?;
        let private_key =
            PrivateKey::from_scalar(&self.backend, SecretScalar::from_checked(child_scalar))?;

        trace!(
            %step,
            depth,
            public_key = %private_key.public_key(),
            "derived private child"
        );
        Ok(ExtendedPrivateKey::new(
            private_key,
            chain_code,
            NodeMeta {
                depth,
                parent_fingerprint: parent.fingerprint(),
                child_number: step.child_number(),
            },
        ))
    }

    /// CKDpub: one public child. Hardened steps fail with
    /// [`WalletError::HardenedFromPublic`].
    pub fn derive_public_child(
        &self,
        parent: &ExtendedPublicKey,
        step: DerivationStep,
    ) -> WalletResult<ExtendedPublicKey> {
        if step.is_hardened() {
            return Err(WalletError::HardenedFromPublic(step.index()));
        }
        let depth = child_depth(parent.depth())?;

        let i = self
            .backend
            .hmac_sha512(
                parent.chain_code(),
                &[
                    &parent.public_key().as_compressed()[..],
                    &step.child_number().to_be_bytes()[..],
                ],
            )
            .map_err(WalletError::derivation)?;
        let (il, chain_code) = split_hmac(&i);

        let point = self
            .backend
            .add_point_tweak(parent.public_key().as_compressed(), &il)
            .map_err(|e| degenerate(step, depth, e))?;
        let public_key = PublicKeyPoint::from_checked(point);

        trace!(%step, depth, public_key = %public_key, "derived public child");
        Ok(ExtendedPublicKey::new(
            public_key,
            chain_code,
            NodeMeta {
                depth,
                parent_fingerprint: parent.fingerprint(),
                child_number: step.child_number(),
            },
        ))
    }

    /// Public projection of a private node.
    pub fn neuter(&self, xprv: &ExtendedPrivateKey) -> ExtendedPublicKey {
        xprv.to_extended_public()
    }

    /// Applies every step of `path` below `root`.
    pub fn walk(
        &self,
        root: &ExtendedPrivateKey,
        path: &DerivationPath,
    ) -> WalletResult<ExtendedPrivateKey> {
        let mut node = root.clone();
        for step in path {
            node = self.derive_child(&node, *step)?;
        }
        debug!(%path, depth = node.depth(), public_key = %node.public_key(), "walked path");
        Ok(node)
    }

    /// Applies every step of `path` below a public `root`. Any hardened
    /// step fails with [`WalletError::HardenedFromPublic`].
    pub fn walk_public(
        &self,
        root: &ExtendedPublicKey,
        path: &DerivationPath,
    ) -> WalletResult<ExtendedPublicKey> {
        let mut node = *root;
        for step in path {
            node = self.derive_public_child(&node, *step)?;
        }
        debug!(%path, depth = node.depth(), public_key = %node.public_key(), "walked public path");
        Ok(node)
    }

    /// Parses an `xprv…` string with this engine's backend.
    pub fn parse_xprv(&self, s: &str) -> WalletResult<ExtendedPrivateKey> {
        ExtendedPrivateKey::from_base58_with(&self.backend, s)
    }

    /// Parses an `xpub…` string with this engine's backend.
    pub fn parse_xpub(&self, s: &str) -> WalletResult<ExtendedPublicKey> {
        ExtendedPublicKey::from_base58_with(&self.backend, s)
    }
}

fn split_hmac(i: &[u8; 64]) -> (Zeroizing<ScalarBytes>, ChainCode) {
    let mut il = Zeroizing::new([0u8; SCALAR_LENGTH]);
    let mut chain_code = [0u8; CHAIN_CODE_LENGTH];
    il.copy_from_slice(&i[..SCALAR_LENGTH]);
    chain_code.copy_from_slice(&i[SCALAR_LENGTH..]);
    (il, chain_code)
}

fn child_depth(parent_depth: u8) -> WalletResult<u8> {
    parent_depth
        .checked_add(1)
        .ok_or_else(|| WalletError::InvalidDerivation("depth exceeds 255".into()))
}

fn degenerate(step: DerivationStep, depth: u8, err: CurveError) -> WalletError {
    warn!(%step, depth, error = %err, "child derivation hit an invalid key");
    WalletError::derivation(err)
}
