//! # Wallet Paths
//!
//! The fixed derivation paths an Elastos wallet uses, and the accessors the
//! wallet service calls:
//!
//! | Wallet                | Path               |
//! |-----------------------|--------------------|
//! | multi-account (leaf)  | `m/44'/0'/0'/0/i`  |
//! | single (= multi, 0)   | `m/44'/0'/0'/0/0`  |
//! | DID sub-wallet        | `m/0'/0/i`         |
//! | identity-chain master | `m/0'`             |
//! | account (xpub export) | `m/44'/0'/0'`      |
//!
//! These paths are bit-exact with keys users already hold. Every call
//! re-derives from the seed; nothing is cached.
//!
//! Public-only derivation starts from an extended public key, never from a
//! seed: [`generate_sub_public_key`] takes the account xpub and
//! [`generate_id_chain_sub_public_key`] the identity-chain xpub, and both
//! produce the same points the seed-based accessors do.

use crate::crypto::backend::{CurveBackend, Secp256r1};
use crate::crypto::keys::{KeyPair, PrivateKey, PublicKeyPoint};
use crate::crypto::secret::Seed;
use crate::error::WalletResult;
use crate::hd::{DerivationPath, ExtendedPrivateKey, ExtendedPublicKey, HdEngine};

/// Resolves named wallet paths with a given engine.
#[derive(Debug, Clone, Default)]
pub struct PathResolver<B: CurveBackend = Secp256r1> {
    engine: HdEngine<B>,
}

impl PathResolver<Secp256r1> {
    /// Resolver over the default P-256 engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: CurveBackend> PathResolver<B> {
    /// Resolver over a custom engine.
    pub fn with_engine(engine: HdEngine<B>) -> Self {
        Self { engine }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &HdEngine<B> {
        &self.engine
    }

    /// Master node for `seed`.
    pub fn master(&self, seed: &Seed) -> WalletResult<ExtendedPrivateKey> {
        self.engine.master_from_seed(seed)
    }

    /// Leaf node at `path` below `master`.
    pub fn walk_extended(
        &self,
        master: &ExtendedPrivateKey,
        path: &DerivationPath,
    ) -> WalletResult<ExtendedPrivateKey> {
        self.engine.walk(master, path)
    }

    /// Leaf key pair at `path` below `master`.
    pub fn walk_path(
        &self,
        master: &ExtendedPrivateKey,
        path: &DerivationPath,
    ) -> WalletResult<KeyPair> {
        Ok(self.walk_extended(master, path)?.key_pair())
    }

    fn node_for(&self, seed: &Seed, path: &DerivationPath) -> WalletResult<ExtendedPrivateKey> {
        self.walk_extended(&self.master(seed)?, path)
    }

    /// Key pair at `m/44'/0'/0'/0/index`.
    pub fn multi_wallet(&self, seed: &Seed, index: u32) -> WalletResult<KeyPair> {
        Ok(self
            .node_for(seed, &DerivationPath::multi_wallet(index)?)?
            .key_pair())
    }

    /// Key pair at `m/44'/0'/0'/0/0`.
    pub fn single_wallet(&self, seed: &Seed) -> WalletResult<KeyPair> {
        self.multi_wallet(seed, 0)
    }

    /// Key pair at `m/0'/0/index`.
    pub fn did_wallet(&self, seed: &Seed, index: u32) -> WalletResult<KeyPair> {
        Ok(self
            .node_for(seed, &DerivationPath::did_wallet(index)?)?
            .key_pair())
    }

    /// Public key at `m/0'`.
    pub fn id_chain_master_public_key(&self, seed: &Seed) -> WalletResult<PublicKeyPoint> {
        Ok(*self
            .id_chain_master_extended_public_key(seed)?
            .public_key())
    }

    /// Extended public key at `m/0'`.
    pub fn id_chain_master_extended_public_key(
        &self,
        seed: &Seed,
    ) -> WalletResult<ExtendedPublicKey> {
        let node = self.node_for(seed, &DerivationPath::id_chain_master()?)?;
        Ok(self.engine.neuter(&node))
    }

    /// Account extended public key at `m/44'/0'/0'`.
    pub fn master_public_key(&self, seed: &Seed) -> WalletResult<ExtendedPublicKey> {
        let node = self.node_for(seed, &DerivationPath::account()?)?;
        Ok(self.engine.neuter(&node))
    }

    /// Public key at `0/index` below an account or identity-chain xpub.
    pub fn sub_public_key(
        &self,
        parent: &ExtendedPublicKey,
        index: u32,
    ) -> WalletResult<PublicKeyPoint> {
        let node = self
            .engine
            .walk_public(parent, &DerivationPath::sub_chain(index)?)?;
        Ok(*node.public_key())
    }
}

/// Leaf key pair at `path` below `master`.
pub fn walk_path(master: &ExtendedPrivateKey, path: &DerivationPath) -> WalletResult<KeyPair> {
    PathResolver::new().walk_path(master, path)
}

/// Key pair at `m/44'/0'/0'/0/index`.
///
/// This is the workhorse: every receive address a multi-account wallet hands
/// out is one of these. Index 0 is the single wallet, so
/// `get_multi_wallet(seed, 0)` and [`get_single_wallet`] always agree.
///
/// # Arguments
///
/// * `seed` - The wallet seed.
/// * `index` - Receive index, `0..2^31`. Hardened indices are not part of
///   this path.
///
/// # Errors
///
/// [`WalletError::InvalidIndex`](crate::WalletError::InvalidIndex) for
/// `index >= 2^31`, or
/// [`WalletError::InvalidDerivation`](crate::WalletError::InvalidDerivation)
/// if some node on the path is unusable.
///
/// # Example
///
/// ```
/// use ela_wallet::crypto::Seed;
/// use ela_wallet::wallet::{get_multi_wallet, get_single_wallet};
///
/// let seed = Seed::from_bytes(&[0u8; 64]).unwrap();
/// let first = get_multi_wallet(&seed, 0).unwrap();
/// assert_eq!(first.public_key(), get_single_wallet(&seed).unwrap().public_key());
/// ```
pub fn get_multi_wallet(seed: &Seed, index: u32) -> WalletResult<KeyPair> {
    PathResolver::new().multi_wallet(seed, index)
}

/// Key pair at `m/44'/0'/0'/0/0`.
pub fn get_single_wallet(seed: &Seed) -> WalletResult<KeyPair> {
    PathResolver::new().single_wallet(seed)
}

/// Key pair at `m/0'/0/index`.
pub fn get_did_wallet(seed: &Seed, index: u32) -> WalletResult<KeyPair> {
    PathResolver::new().did_wallet(seed, index)
}

/// Public key of the identity-chain master node `m/0'`.
pub fn get_id_chain_master_public_key(seed: &Seed) -> WalletResult<PublicKeyPoint> {
    PathResolver::new().id_chain_master_public_key(seed)
}

/// Extended public key of the identity-chain master node `m/0'`.
pub fn get_id_chain_master_extended_public_key(seed: &Seed) -> WalletResult<ExtendedPublicKey> {
    PathResolver::new().id_chain_master_extended_public_key(seed)
}

/// Account extended public key at `m/44'/0'/0'`.
///
/// Hand this to a watch-only party; [`generate_sub_public_key`] recovers
/// every multi-wallet public key from it.
pub fn get_master_public_key(seed: &Seed) -> WalletResult<ExtendedPublicKey> {
    PathResolver::new().master_public_key(seed)
}

/// Public key of multi-wallet `index`, from the account xpub alone.
///
/// No private material is involved. A watch-only service holding the output
/// of [`get_master_public_key`] can enumerate every receive key the seed
/// holder would derive, and gets exactly the same points.
///
/// # Arguments
///
/// * `master_public_key` - The account xpub at `m/44'/0'/0'`.
/// * `index` - Receive index below the external chain.
///
/// # Errors
///
/// [`WalletError::InvalidIndex`](crate::WalletError::InvalidIndex) for
/// `index >= 2^31`. Hardened steps are impossible from an xpub, and this
/// path has none.
pub fn generate_sub_public_key(
    master_public_key: &ExtendedPublicKey,
    index: u32,
) -> WalletResult<PublicKeyPoint> {
    PathResolver::new().sub_public_key(master_public_key, index)
}

/// Public key of DID sub-wallet `index`, from the identity-chain xpub alone.
pub fn generate_id_chain_sub_public_key(
    id_chain_public_key: &ExtendedPublicKey,
    index: u32,
) -> WalletResult<PublicKeyPoint> {
    PathResolver::new().sub_public_key(id_chain_public_key, index)
}

/// Private key of the single wallet.
pub fn get_single_private_key(seed: &Seed) -> WalletResult<PrivateKey> {
    Ok(get_single_wallet(seed)?.into_parts().0)
}

/// Public key of the single wallet.
pub fn get_single_public_key(seed: &Seed) -> WalletResult<PublicKeyPoint> {
    Ok(*get_single_wallet(seed)?.public_key())
}

/// Private key of multi-wallet `index`.
pub fn generate_sub_private_key(seed: &Seed, index: u32) -> WalletResult<PrivateKey> {
    Ok(get_multi_wallet(seed, index)?.into_parts().0)
}

/// Public key of multi-wallet `index`, derived through the private key.
pub fn generate_sub_public_key_from_seed(seed: &Seed, index: u32) -> WalletResult<PublicKeyPoint> {
    Ok(*get_multi_wallet(seed, index)?.public_key())
}

/// Private key of DID sub-wallet `index`.
pub fn generate_id_chain_sub_private_key(seed: &Seed, index: u32) -> WalletResult<PrivateKey> {
    Ok(get_did_wallet(seed, index)?.into_parts().0)
}

/// Public key for 32 raw private key bytes.
pub fn get_public_key_from_private_key(private_key: &[u8]) -> WalletResult<PublicKeyPoint> {
    Ok(*PrivateKey::from_bytes(private_key)?.public_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HARDENED_OFFSET;
    use crate::crypto::{sign, verify, PayloadEncoding};
    use crate::error::WalletError;
    use std::collections::HashSet;

    fn zero_seed() -> Seed {
        Seed::from_bytes(&[0u8; 64]).unwrap()
    }

    #[test]
    fn test_single_wallet_golden() {
        let pair = get_single_wallet(&zero_seed()).unwrap();
        assert_eq!(
            pair.private_key().to_hex().as_str(),
            "1e1718ef6cd628a6932aec8cbe86a29bf87366ea99561cb5b5e5c075ffaca7db"
        );
        assert_eq!(
            pair.public_key().to_hex(),
            "039c1d101601f5fbcc119a2a9cc81028169d001b1c1c730f12387e3b6901629b70"
        );
    }

    #[test]
    fn test_multi_wallet_golden() {
        let pair = get_multi_wallet(&zero_seed(), 1).unwrap();
        assert_eq!(
            pair.private_key().to_hex().as_str(),
            "702351fbc51634d5f1c78622382099688304040a6212df1db0bcf0ce290afa7b"
        );
        assert_eq!(
            pair.public_key().to_hex(),
            "02589241f2562577d6a13a96687583d0ddcaf879fdca333082aef83016898a7cc7"
        );
    }

    #[test]
    fn test_did_wallet_golden() {
        let pair = get_did_wallet(&zero_seed(), 0).unwrap();
        assert_eq!(
            pair.private_key().to_hex().as_str(),
            "4563de798e1b874fb9768e0150570972ea24d82a9c09a1483919ef480966b61d"
        );
        assert_eq!(
            pair.public_key().to_hex(),
            "0263894e0b54e5666c6f68f670527b3865152b73e5e3c177c0d140d99e84ffbacb"
        );
    }

    #[test]
    fn test_id_chain_master_golden() {
        assert_eq!(
            get_id_chain_master_public_key(&zero_seed()).unwrap().to_hex(),
            "029fa5de4705ebf9554331a812662525494649fe5545819a6ffea9e47f9ec0f8dc"
        );
        assert_eq!(
            get_id_chain_master_extended_public_key(&zero_seed())
                .unwrap()
                .to_base58(),
            "xpub68B33RsW6m6G1anyUvRGoTp32dyaE5r6622MqrF16MJm1LLch4GkVCA4t6o3tBYtcHFCYtkJmZ9mxZ6ve5r5qRfPVgiuKdBMafhSbs2wV4G"
        );
    }

    #[test]
    fn test_master_public_key_golden() {
        assert_eq!(
            get_master_public_key(&zero_seed()).unwrap().to_base58(),
            "xpub6Bj2FixhtGhykNDDsb66gGmYbrzSNB62cfiz7hArm4Dy2rXVdij45uSSvNmBCSZ4DdBTz9mVza5AEyfwT2Z7UFyaLTmDm8zgTvoZjS1BXXK"
        );
    }

    #[test]
    fn test_single_is_multi_zero() {
        let seed = Seed::generate();
        assert_eq!(
            get_single_wallet(&seed).unwrap(),
            get_multi_wallet(&seed, 0).unwrap()
        );
    }

    #[test]
    fn test_accessors_agree_with_wallets() {
        let seed = Seed::generate();
        let single = get_single_wallet(&seed).unwrap();
        assert_eq!(&get_single_private_key(&seed).unwrap(), single.private_key());
        assert_eq!(&get_single_public_key(&seed).unwrap(), single.public_key());

        let multi = get_multi_wallet(&seed, 4).unwrap();
        assert_eq!(&generate_sub_private_key(&seed, 4).unwrap(), multi.private_key());
        assert_eq!(
            &generate_sub_public_key_from_seed(&seed, 4).unwrap(),
            multi.public_key()
        );

        let did = get_did_wallet(&seed, 2).unwrap();
        assert_eq!(
            &generate_id_chain_sub_private_key(&seed, 2).unwrap(),
            did.private_key()
        );

        let bytes = did.private_key().to_bytes();
        assert_eq!(
            &get_public_key_from_private_key(&bytes[..]).unwrap(),
            did.public_key()
        );
    }

    #[test]
    fn test_watch_only_derivation_matches_seed() {
        let seed = Seed::generate();
        let account = get_master_public_key(&seed).unwrap();
        let id_chain = get_id_chain_master_extended_public_key(&seed).unwrap();
        for i in [0u32, 1, 2, 50] {
            assert_eq!(
                &generate_sub_public_key(&account, i).unwrap(),
                get_multi_wallet(&seed, i).unwrap().public_key()
            );
            assert_eq!(
                &generate_id_chain_sub_public_key(&id_chain, i).unwrap(),
                get_did_wallet(&seed, i).unwrap().public_key()
            );
        }
    }

    #[test]
    fn test_paths_are_isolated() {
        let seed = Seed::generate();
        let mut seen = HashSet::new();
        for i in 0..8u32 {
            assert!(seen.insert(*get_multi_wallet(&seed, i).unwrap().public_key()));
            assert!(seen.insert(*get_did_wallet(&seed, i).unwrap().public_key()));
        }
        assert!(seen.insert(get_id_chain_master_public_key(&seed).unwrap()));
    }

    #[test]
    fn test_different_seeds_different_keys() {
        let a = get_single_wallet(&Seed::from_bytes(&[1u8; 64]).unwrap()).unwrap();
        let b = get_single_wallet(&Seed::from_bytes(&[2u8; 64]).unwrap()).unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_index_out_of_range() {
        let seed = zero_seed();
        assert_eq!(
            get_multi_wallet(&seed, HARDENED_OFFSET).unwrap_err(),
            WalletError::InvalidIndex(HARDENED_OFFSET)
        );
        assert_eq!(
            get_did_wallet(&seed, u32::MAX).unwrap_err(),
            WalletError::InvalidIndex(u32::MAX)
        );
        let account = get_master_public_key(&seed).unwrap();
        assert_eq!(
            generate_sub_public_key(&account, HARDENED_OFFSET).unwrap_err(),
            WalletError::InvalidIndex(HARDENED_OFFSET)
        );
    }

    #[test]
    fn test_largest_index_derives() {
        let pair = get_multi_wallet(&zero_seed(), HARDENED_OFFSET - 1).unwrap();
        let sig = sign(b"edge", PayloadEncoding::Raw, pair.private_key()).unwrap();
        assert!(verify(b"edge", PayloadEncoding::Raw, &sig, pair.public_key()).unwrap());
    }

    #[test]
    fn test_bad_private_key_bytes() {
        assert!(matches!(
            get_public_key_from_private_key(&[0u8; 32]),
            Err(WalletError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            get_public_key_from_private_key(&[1u8; 33]),
            Err(WalletError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_walk_path_with_resolver() {
        let resolver = PathResolver::new();
        let master = resolver.master(&zero_seed()).unwrap();
        let path: DerivationPath = "m/44'/0'/0'/0/0".parse().unwrap();
        assert_eq!(
            walk_path(&master, &path).unwrap(),
            get_single_wallet(&zero_seed()).unwrap()
        );
    }

    #[test]
    fn test_concurrent_derivation() {
        let resolver = PathResolver::new();
        let seed = zero_seed();
        let expected: Vec<KeyPair> = (0..4).map(|i| resolver.multi_wallet(&seed, i).unwrap()).collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4u32)
                .map(|i| {
                    let resolver = &resolver;
                    let seed = &seed;
                    scope.spawn(move || resolver.multi_wallet(seed, i).unwrap())
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                assert_eq!(handle.join().unwrap(), expected[i]);
            }
        });
    }
}
