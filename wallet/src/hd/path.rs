//! Derivation steps and paths.
//!
//! A path is written `m/44'/0'/0'/0/3`: `m` is the master node, each
//! component is a child index, and a trailing `'` (or `h`) marks a hardened
//! step. The named wallet paths live here too, so the rest of the crate never
//! spells out raw index lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{
    BIP44_PURPOSE, COIN_TYPE, DEFAULT_ACCOUNT, EXTERNAL_CHAIN, HARDENED_OFFSET, ID_CHAIN_ROOT,
    ID_CHAIN_SUB_CHAIN, MAX_CHILD_INDEX,
};
use crate::error::{WalletError, WalletResult};

/// One level of a derivation path: a 31-bit index and a hardened flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DerivationStep {
    index: u32,
    hardened: bool,
}

impl DerivationStep {
    /// Builds a step. Fails with [`WalletError::InvalidIndex`] for `index >= 2^31`.
    pub fn new(index: u32, hardened: bool) -> WalletResult<Self> {
        if index > MAX_CHILD_INDEX {
            return Err(WalletError::InvalidIndex(index));
        }
        Ok(Self { index, hardened })
    }

    /// A non-hardened step.
    pub fn normal(index: u32) -> WalletResult<Self> {
        Self::new(index, false)
    }

    /// A hardened step.
    pub fn hardened(index: u32) -> WalletResult<Self> {
        Self::new(index, true)
    }

    /// Splits a BIP32 wire child number back into index and flag.
    pub fn from_child_number(child_number: u32) -> Self {
        Self {
            index: child_number & MAX_CHILD_INDEX,
            hardened: child_number >= HARDENED_OFFSET,
        }
    }

    /// Index without the hardened bit.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether this step is hardened.
    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// `index | 2^31` for hardened steps, `index` otherwise.
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl FromStr for DerivationStep {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(&['\'', 'h', 'H'][..]) {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WalletError::InvalidPath(format!("bad path component {s:?}")));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| WalletError::InvalidPath(format!("index {digits} does not fit in u32")))?;
        Self::new(index, hardened)
    }
}

/// An ordered list of steps from the master node to a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DerivationPath {
    steps: Vec<DerivationStep>,
}

impl DerivationPath {
    /// A path from explicit steps.
    pub fn new(steps: Vec<DerivationStep>) -> Self {
        Self { steps }
    }

    /// The empty path, `m`.
    pub fn master() -> Self {
        Self::default()
    }

    /// Multi-account wallet leaf: `m/44'/0'/0'/0/i`.
    pub fn multi_wallet(index: u32) -> WalletResult<Self> {
        Ok(Self::account()?.extend(&Self::sub_chain(index)?))
    }

    /// DID sub-wallet leaf under the identity-chain root: `m/0'/0/i`.
    pub fn did_wallet(index: u32) -> WalletResult<Self> {
        Ok(Self::id_chain_master()?.extend(&Self::sub_chain(index)?))
    }

    /// Identity-chain master node: `m/0'`.
    pub fn id_chain_master() -> WalletResult<Self> {
        Ok(Self::new(vec![DerivationStep::hardened(ID_CHAIN_ROOT)?]))
    }

    /// Account node whose xpub is shared for watch-only use: `m/44'/0'/0'`.
    pub fn account() -> WalletResult<Self> {
        Ok(Self::new(vec![
            DerivationStep::hardened(BIP44_PURPOSE)?,
            DerivationStep::hardened(COIN_TYPE)?,
            DerivationStep::hardened(DEFAULT_ACCOUNT)?,
        ]))
    }

    /// Relative path `0/i` below an account or identity-chain node.
    ///
    /// The account and identity-chain subtrees both keep their leaves on
    /// chain 0, so one helper covers both.
    pub fn sub_chain(index: u32) -> WalletResult<Self> {
        debug_assert_eq!(EXTERNAL_CHAIN, ID_CHAIN_SUB_CHAIN);
        Ok(Self::new(vec![
            DerivationStep::normal(EXTERNAL_CHAIN)?,
            DerivationStep::normal(index)?,
        ]))
    }

    /// Steps in order, master first.
    pub fn steps(&self) -> &[DerivationStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for `m`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Appends one step.
    pub fn child(&self, step: DerivationStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Appends every step of `tail`.
    pub fn extend(&self, tail: &DerivationPath) -> Self {
        let mut steps = self.steps.clone();
        steps.extend_from_slice(&tail.steps);
        Self { steps }
    }

    /// True when any step is hardened, i.e. the path cannot be walked from an xpub.
    pub fn has_hardened(&self) -> bool {
        self.steps.iter().any(DerivationStep::is_hardened)
    }

    /// Iterates the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, DerivationStep> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a DerivationStep;
    type IntoIter = std::slice::Iter<'a, DerivationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl FromIterator<DerivationStep> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = DerivationStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for step in &self.steps {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(WalletError::InvalidPath(format!(
                "path must start with \"m\": {s:?}"
            )));
        }
        parts.map(DerivationStep::from_str).collect()
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DerivationPath> for String {
    fn from(value: DerivationPath) -> Self {
        value.to_string()
    }
}
