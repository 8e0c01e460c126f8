//! # Digital Signatures
//!
//! ECDSA over secp256r1 with a SHA-256 digest. This is how a wallet proves it
//! holds a key: every transfer, DID document and login challenge the wallet
//! service accepts carries one of these signatures.
//!
//! ## Wire format
//!
//! Signatures travel as 64 bytes, `r ‖ s`, each half a zero-padded 32-byte
//! big-endian integer. Hex-encoded that is always 128 characters. Nobody on
//! the other end has to parse ASN.1 to read one, and the length alone tells
//! you whether you got the whole thing.
//!
//! The curve backend, on the other hand, speaks ASN.1 DER. Conversion in both
//! directions goes through [`CurveBackend::concat_to_der`] and
//! [`CurveBackend::der_to_concat`], which use the same strict codec `p256`
//! uses for its own signatures. DER never leaves this module unless you ask
//! for it with [`Signature::to_der`].
//!
//! ## Payloads
//!
//! A payload is either used as-is ([`PayloadEncoding::Raw`], what you want
//! for UTF-8 text) or is itself a hex string that gets decoded before
//! hashing ([`PayloadEncoding::Hex`]). Signer and verifier must agree on the
//! encoding. A signature made over the hex text will not verify over the
//! decoded bytes and vice versa.
//!
//! ## Failure vs. mismatch
//!
//! [`verify`] returns `Ok(false)` for a well-formed signature that simply
//! does not match. Errors are reserved for inputs that cannot be checked at
//! all: bad lengths, out-of-range `r`/`s`, points off the curve, bad hex.
//! A caller that only cares about "is this valid" can treat both the same;
//! a caller debugging an integration gets told which input was broken.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{SCALAR_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::backend::{CurveBackend, CurveError, ScalarBytes, Secp256r1, SignatureBytes};
use crate::crypto::keys::{PrivateKey, PublicKeyPoint};
use crate::error::{WalletError, WalletResult};

/// How a payload's bytes are turned into the message that gets hashed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// Sign the bytes as given (UTF-8 text, binary blobs).
    #[default]
    #[serde(alias = "utf8")]
    Raw,
    /// The payload is a hex string; sign the bytes it decodes to.
    Hex,
}

impl PayloadEncoding {
    /// Applies the encoding to `payload`.
    pub fn decode<'a>(&self, payload: &'a [u8]) -> WalletResult<Cow<'a, [u8]>> {
        match self {
            PayloadEncoding::Raw => Ok(Cow::Borrowed(payload)),
            PayloadEncoding::Hex => hex::decode(payload)
                .map(Cow::Owned)
                .map_err(|e| WalletError::InvalidPayload(format!("payload is not valid hex: {e}"))),
        }
    }
}

/// A 64-byte `r ‖ s` ECDSA signature with both halves in `1..n`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature {
    r: ScalarBytes,
    s: ScalarBytes,
}

impl Signature {
    /// Parses a 64-byte concatenated signature, range-checked against P-256.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        Self::from_bytes_with(&Secp256r1, bytes)
    }

    /// Parses a 64-byte concatenated signature, range-checking `r` and `s`
    /// against `backend`'s curve order.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidSignatureEncoding`] if `bytes` is not exactly 64
    /// bytes long, or if either half is zero or not below the order.
    pub fn from_bytes_with<B: CurveBackend>(backend: &B, bytes: &[u8]) -> WalletResult<Self> {
        let bytes: SignatureBytes = bytes.try_into().map_err(|_| {
            WalletError::InvalidSignatureEncoding(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            ))
        })?;
        let mut r = [0u8; SCALAR_LENGTH];
        let mut s = [0u8; SCALAR_LENGTH];
        r.copy_from_slice(&bytes[..SCALAR_LENGTH]);
        s.copy_from_slice(&bytes[SCALAR_LENGTH..]);
        for (name, half) in [("r", &r), ("s", &s)] {
            if !backend.is_valid_scalar(half) {
                return Err(WalletError::InvalidSignatureEncoding(format!(
                    "{name} is zero or not below the curve order"
                )));
            }
        }
        Ok(Self { r, s })
    }

    /// Parses a 128-character hex signature.
    pub fn from_hex(hex_str: &str) -> WalletResult<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|_| WalletError::InvalidSignatureEncoding("not valid hex".into()))?;
        Self::from_bytes(&bytes)
    }

    /// The concatenated `r ‖ s` bytes.
    pub fn to_bytes(&self) -> SignatureBytes {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..SCALAR_LENGTH].copy_from_slice(&self.r);
        out[SCALAR_LENGTH..].copy_from_slice(&self.s);
        out
    }

    pub fn r(&self) -> &ScalarBytes {
        &self.r
    }

    pub fn s(&self) -> &ScalarBytes {
        &self.s
    }

    /// Lowercase hex, 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// `SEQUENCE { INTEGER r, INTEGER s }` with minimal integer encoding.
    pub fn to_der(&self) -> WalletResult<Vec<u8>> {
        self.to_der_with(&Secp256r1)
    }

    /// [`Signature::to_der`] through an explicit curve backend.
    pub fn to_der_with<B: CurveBackend>(&self, backend: &B) -> WalletResult<Vec<u8>> {
        backend
            .concat_to_der(&self.to_bytes())
            .map_err(WalletError::signature_encoding)
    }

    /// Parses a strict DER signature into the fixed-width form.
    ///
    /// Anything other than the unique DER encoding of an in-range pair is
    /// rejected: long-form lengths, non-minimal or negative integers,
    /// integers wider than 32 bytes, trailing data.
    pub fn from_der(der: &[u8]) -> WalletResult<Self> {
        Self::from_der_with(&Secp256r1, der)
    }

    /// [`Signature::from_der`] through an explicit curve backend.
    pub fn from_der_with<B: CurveBackend>(backend: &B, der: &[u8]) -> WalletResult<Self> {
        let concat = backend
            .der_to_concat(der)
            .map_err(WalletError::signature_encoding)?;
        Self::from_bytes_with(backend, &concat)
    }
}

impl TryFrom<String> for Signature {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

// ---------------------------------------------------------------------------
// Sign / verify
// ---------------------------------------------------------------------------

/// Signs `payload` with `private_key`.
///
/// The nonce comes from RFC 6979, so signing the same payload with the same
/// key always gives the same signature. There is no RNG on this path and
/// therefore no way for a bad RNG to leak the key through nonce reuse.
///
/// # Arguments
///
/// * `payload` - The bytes to sign, interpreted according to `encoding`.
///   Any length; only its SHA-256 digest goes into the signature.
/// * `encoding` - [`PayloadEncoding::Raw`] to sign `payload` as given,
///   [`PayloadEncoding::Hex`] to sign the bytes it decodes to.
/// * `private_key` - The signer's key. It never leaves the backend call.
///
/// # Errors
///
/// [`WalletError::InvalidPayload`] when a hex payload does not decode, and
/// [`WalletError::SigningError`] when the backend refuses the key.
///
/// # Example
///
/// ```
/// use ela_wallet::crypto::{sign, verify, PayloadEncoding, PrivateKey};
///
/// let key = PrivateKey::from_hex(
///     "1e1718ef6cd628a6932aec8cbe86a29bf87366ea99561cb5b5e5c075ffaca7db",
/// ).unwrap();
/// let sig = sign(b"68656c6c6f", PayloadEncoding::Hex, &key).unwrap();
///
/// assert_eq!(sig.to_hex().len(), 128);
/// assert!(verify(b"hello", PayloadEncoding::Raw, &sig, key.public_key()).unwrap());
/// ```
pub fn sign(
    payload: &[u8],
    encoding: PayloadEncoding,
    private_key: &PrivateKey,
) -> WalletResult<Signature> {
    sign_with(&Secp256r1, payload, encoding, private_key)
}

/// [`sign`] with an explicit curve backend.
pub fn sign_with<B: CurveBackend>(
    backend: &B,
    payload: &[u8],
    encoding: PayloadEncoding,
    private_key: &PrivateKey,
) -> WalletResult<Signature> {
    let message = encoding.decode(payload)?;
    let der = backend
        .sign_der(private_key.scalar().expose(), &message)
        .map_err(WalletError::signing)?;
    Signature::from_der_with(backend, &der)
        .map_err(|e| WalletError::SigningError(format!("backend returned unusable DER: {e}")))
}

/// Checks `signature` over `payload` against `public_key`.
///
/// We don't say *why* a well-formed signature failed to match. Wrong key,
/// wrong message and tampered bytes all come back as `Ok(false)`.
///
/// # Arguments
///
/// * `payload` - The bytes that were signed, interpreted according to
///   `encoding`. Must match what the signer used.
/// * `encoding` - How `payload` was encoded at signing time.
/// * `signature` - The 64-byte `r ‖ s` signature.
/// * `public_key` - The signer's public key.
///
/// # Errors
///
/// [`WalletError::InvalidPayload`] for a hex payload that does not decode.
/// [`WalletError::InvalidSignatureEncoding`] if the backend cannot encode the
/// signature, [`WalletError::InvalidPublicKey`] if it cannot use the key.
pub fn verify(
    payload: &[u8],
    encoding: PayloadEncoding,
    signature: &Signature,
    public_key: &PublicKeyPoint,
) -> WalletResult<bool> {
    verify_with(&Secp256r1, payload, encoding, signature, public_key)
}

/// [`verify`] with an explicit curve backend.
pub fn verify_with<B: CurveBackend>(
    backend: &B,
    payload: &[u8],
    encoding: PayloadEncoding,
    signature: &Signature,
    public_key: &PublicKeyPoint,
) -> WalletResult<bool> {
    let message = encoding.decode(payload)?;
    let point = backend
        .decompress(public_key.as_compressed())
        .map_err(WalletError::public_key)?;
    let der = signature.to_der_with(backend)?;
    let valid = backend
        .verify_der(&point, &message, &der)
        .map_err(|e| match e {
            CurveError::MalformedSignature => WalletError::signature_encoding(e),
            other => WalletError::public_key(other),
        })?;
    trace!(public_key = %public_key, valid, "verified signature");
    Ok(valid)
}

/// String form of [`sign`]: hex private key in, hex signature out.
///
/// A private key that does not parse is reported as
/// [`WalletError::SigningError`].
pub fn sign_hex(
    private_key_hex: &str,
    payload: &[u8],
    encoding: PayloadEncoding,
) -> WalletResult<String> {
    let key = PrivateKey::from_hex(private_key_hex).map_err(|e| match e {
        WalletError::InvalidPrivateKey(reason) => WalletError::SigningError(reason),
        other => other,
    })?;
    Ok(sign(payload, encoding, &key)?.to_hex())
}

/// String form of [`verify`]: hex public key and hex signature in.
pub fn verify_hex(
    public_key_hex: &str,
    payload: &[u8],
    encoding: PayloadEncoding,
    signature_hex: &str,
) -> WalletResult<bool> {
    let public_key = PublicKeyPoint::from_hex(public_key_hex)?;
    let signature = Signature::from_hex(signature_hex)?;
    verify(payload, encoding, &signature, &public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::backend::{CompressedPoint, UncompressedPoint};
    use rand::RngCore;
    use zeroize::Zeroizing;

    const GOLDEN_PRIVATE: &str = "1e1718ef6cd628a6932aec8cbe86a29bf87366ea99561cb5b5e5c075ffaca7db";
    const GOLDEN_PUBLIC: &str = "039c1d101601f5fbcc119a2a9cc81028169d001b1c1c730f12387e3b6901629b70";
    /// n - 1 for P-256.
    const ORDER_MINUS_ONE: &str =
        "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632550";

    fn golden_key() -> PrivateKey {
        PrivateKey::from_hex(GOLDEN_PRIVATE).unwrap()
    }

    fn random_key() -> PrivateKey {
        loop {
            let mut bytes = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut bytes);
            if let Ok(key) = PrivateKey::from_bytes(&bytes) {
                return key;
            }
        }
    }

    fn sig_from_halves(r: &[u8; 32], s: &[u8; 32]) -> Signature {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(r);
        bytes[32..].copy_from_slice(s);
        Signature::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_sign_and_verify_golden_hello() {
        let key = golden_key();
        assert_eq!(key.public_key().to_hex(), GOLDEN_PUBLIC);

        let sig = sign(b"hello", PayloadEncoding::Raw, &key).unwrap();
        assert_eq!(sig.to_hex().len(), 128);
        assert!(verify(b"hello", PayloadEncoding::Raw, &sig, key.public_key()).unwrap());
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let key = golden_key();
        let a = sign(b"hello", PayloadEncoding::Raw, &key).unwrap();
        let b = sign(b"hello", PayloadEncoding::Raw, &key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_message_and_wrong_key_are_mismatches() {
        let key = random_key();
        let other = random_key();
        let sig = sign(b"correct", PayloadEncoding::Raw, &key).unwrap();
        assert!(!verify(b"wrong", PayloadEncoding::Raw, &sig, key.public_key()).unwrap());
        assert!(!verify(b"correct", PayloadEncoding::Raw, &sig, other.public_key()).unwrap());
    }

    #[test]
    fn test_single_bit_tamper_is_mismatch() {
        let key = random_key();
        let sig = sign(b"payload", PayloadEncoding::Raw, &key).unwrap();

        let mut r = *sig.r();
        r[31] ^= 0x01;
        let tampered_r = sig_from_halves(&r, sig.s());
        assert!(!verify(b"payload", PayloadEncoding::Raw, &tampered_r, key.public_key()).unwrap());

        let mut s = *sig.s();
        s[31] ^= 0x01;
        let tampered_s = sig_from_halves(sig.r(), &s);
        assert!(!verify(b"payload", PayloadEncoding::Raw, &tampered_s, key.public_key()).unwrap());
    }

    #[test]
    fn test_hex_payload_signs_decoded_bytes() {
        let key = golden_key();
        let sig = sign(b"68656c6c6f", PayloadEncoding::Hex, &key).unwrap();
        assert!(verify(b"hello", PayloadEncoding::Raw, &sig, key.public_key()).unwrap());
        assert!(!verify(b"68656c6c6f", PayloadEncoding::Raw, &sig, key.public_key()).unwrap());
    }

    #[test]
    fn test_bad_hex_payload_is_error() {
        let key = golden_key();
        assert!(matches!(
            sign(b"xyz", PayloadEncoding::Hex, &key),
            Err(WalletError::InvalidPayload(_))
        ));
        let sig = sign(b"", PayloadEncoding::Raw, &key).unwrap();
        assert!(matches!(
            verify(b"abc", PayloadEncoding::Hex, &sig, key.public_key()),
            Err(WalletError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_empty_and_large_payloads() {
        let key = random_key();
        let sig = sign(b"", PayloadEncoding::Raw, &key).unwrap();
        assert!(verify(b"", PayloadEncoding::Raw, &sig, key.public_key()).unwrap());

        let big = vec![0xAB; 1_000_000];
        let sig = sign(&big, PayloadEncoding::Raw, &key).unwrap();
        assert!(verify(&big, PayloadEncoding::Raw, &sig, key.public_key()).unwrap());
    }

    #[test]
    fn test_signature_length_and_range_checks() {
        assert!(matches!(
            Signature::from_bytes(&[1u8; 63]),
            Err(WalletError::InvalidSignatureEncoding(_))
        ));

        let one = {
            let mut b = [0u8; 32];
            b[31] = 1;
            b
        };
        let zero = [0u8; 32];
        let order_minus_one: [u8; 32] = hex::decode(ORDER_MINUS_ONE).unwrap().try_into().unwrap();
        let mut order = order_minus_one;
        order[31] += 1;

        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&zero);
        bytes[32..].copy_from_slice(&one);
        assert!(Signature::from_bytes(&bytes).is_err());

        bytes[..32].copy_from_slice(&one);
        bytes[32..].copy_from_slice(&order);
        assert!(Signature::from_bytes(&bytes).is_err());

        bytes[32..].copy_from_slice(&order_minus_one);
        assert!(Signature::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_der_roundtrip_preserves_concat() {
        let key = random_key();
        for i in 0..32u32 {
            let msg = i.to_be_bytes();
            let sig = sign(&msg, PayloadEncoding::Raw, &key).unwrap();
            assert_eq!(Signature::from_der(&sig.to_der().unwrap()).unwrap(), sig);
        }
    }

    /// P-256 in every respect except that it only accepts scalars below 2^255.
    struct LowHalfOnly;

    impl CurveBackend for LowHalfOnly {
        fn curve_name(&self) -> &'static str {
            "secp256r1-low"
        }
        fn is_valid_scalar(&self, bytes: &ScalarBytes) -> bool {
            bytes[0] < 0x80 && Secp256r1.is_valid_scalar(bytes)
        }
        fn public_key(&self, secret: &ScalarBytes) -> Result<CompressedPoint, CurveError> {
            Secp256r1.public_key(secret)
        }
        fn add_scalars(
            &self,
            secret: &ScalarBytes,
            tweak: &ScalarBytes,
        ) -> Result<Zeroizing<ScalarBytes>, CurveError> {
            Secp256r1.add_scalars(secret, tweak)
        }
        fn add_point_tweak(
            &self,
            point: &[u8],
            tweak: &ScalarBytes,
        ) -> Result<CompressedPoint, CurveError> {
            Secp256r1.add_point_tweak(point, tweak)
        }
        fn compress(&self, sec1: &[u8]) -> Result<CompressedPoint, CurveError> {
            Secp256r1.compress(sec1)
        }
        fn decompress(&self, sec1: &[u8]) -> Result<UncompressedPoint, CurveError> {
            Secp256r1.decompress(sec1)
        }
        fn hmac_sha512(
            &self,
            key: &[u8],
            parts: &[&[u8]],
        ) -> Result<Zeroizing<[u8; 64]>, CurveError> {
            Secp256r1.hmac_sha512(key, parts)
        }
        fn sign_der(&self, secret: &ScalarBytes, message: &[u8]) -> Result<Vec<u8>, CurveError> {
            Secp256r1.sign_der(secret, message)
        }
        fn verify_der(&self, point: &[u8], message: &[u8], der: &[u8]) -> Result<bool, CurveError> {
            Secp256r1.verify_der(point, message, der)
        }
        fn concat_to_der(&self, concat: &SignatureBytes) -> Result<Vec<u8>, CurveError> {
            Secp256r1.concat_to_der(concat)
        }
        fn der_to_concat(&self, der: &[u8]) -> Result<SignatureBytes, CurveError> {
            Secp256r1.der_to_concat(der)
        }
    }

    #[test]
    fn test_signature_range_follows_backend() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let high: [u8; 32] = hex::decode(ORDER_MINUS_ONE).unwrap().try_into().unwrap();
        let sig = sig_from_halves(&one, &high);

        // In range for P-256, out of range for the narrower backend.
        assert_eq!(Signature::from_bytes_with(&Secp256r1, &sig.to_bytes()).unwrap(), sig);
        assert!(matches!(
            Signature::from_bytes_with(&LowHalfOnly, &sig.to_bytes()),
            Err(WalletError::InvalidSignatureEncoding(_))
        ));
        let der = sig.to_der().unwrap();
        assert!(matches!(
            Signature::from_der_with(&LowHalfOnly, &der),
            Err(WalletError::InvalidSignatureEncoding(_))
        ));

        let low = sig_from_halves(&one, &one);
        assert_eq!(
            Signature::from_der_with(&LowHalfOnly, &low.to_der_with(&LowHalfOnly).unwrap())
                .unwrap(),
            low
        );
    }

    #[test]
    fn test_custom_backend_signs_and_verifies() {
        // r and s land in either half of the order, so some signatures are refused.
        let key = golden_key();
        let mut accepted = 0;
        for i in 0..64u32 {
            let msg = i.to_be_bytes();
            match sign_with(&LowHalfOnly, &msg, PayloadEncoding::Raw, &key) {
                Ok(sig) => {
                    accepted += 1;
                    assert!(sig.r()[0] < 0x80 && sig.s()[0] < 0x80);
                    assert!(
                        verify_with(&LowHalfOnly, &msg, PayloadEncoding::Raw, &sig, key.public_key())
                            .unwrap()
                    );
                }
                Err(e) => assert!(matches!(e, WalletError::SigningError(_)), "{e}"),
            }
        }
        assert!(accepted > 0);
    }

    #[test]
    fn test_der_small_integers_are_minimal() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let mut high = [0u8; 32];
        high[31] = 0x80;
        let sig = sig_from_halves(&one, &high);
        let der = sig.to_der().unwrap();
        assert_eq!(der, vec![0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn test_der_rejects_non_strict_encodings() {
        let bad: [&[u8]; 8] = [
            // Empty.
            &[],
            // Length does not cover the body.
            &[0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01],
            // Non-minimal r (leading zero before a low byte).
            &[0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01],
            // Negative s.
            &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x80],
            // Zero-length integer.
            &[0x30, 0x05, 0x02, 0x00, 0x02, 0x01, 0x01],
            // Trailing byte inside the sequence.
            &[0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01, 0x00],
            // Wrong outer tag.
            &[0x31, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01],
            // Long-form sequence length.
            &[0x30, 0x81, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01],
        ];
        for der in bad {
            assert!(
                matches!(
                    Signature::from_der(der),
                    Err(WalletError::InvalidSignatureEncoding(_))
                ),
                "accepted {}",
                hex::encode(der)
            );
        }
    }

    #[test]
    fn test_der_rejects_zero_r() {
        let der = [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x01];
        assert!(matches!(
            Signature::from_der(&der),
            Err(WalletError::InvalidSignatureEncoding(_))
        ));
    }

    #[test]
    fn test_hex_helpers() {
        let sig_hex = sign_hex(GOLDEN_PRIVATE, b"hello", PayloadEncoding::Raw).unwrap();
        assert!(verify_hex(GOLDEN_PUBLIC, b"hello", PayloadEncoding::Raw, &sig_hex).unwrap());
        assert!(!verify_hex(GOLDEN_PUBLIC, b"hellO", PayloadEncoding::Raw, &sig_hex).unwrap());

        assert!(matches!(
            sign_hex("00", b"hello", PayloadEncoding::Raw),
            Err(WalletError::SigningError(_))
        ));
        assert!(matches!(
            verify_hex("02ff", b"hello", PayloadEncoding::Raw, &sig_hex),
            Err(WalletError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            verify_hex(GOLDEN_PUBLIC, b"hello", PayloadEncoding::Raw, &sig_hex[..126]),
            Err(WalletError::InvalidSignatureEncoding(_))
        ));
    }

    #[test]
    fn test_verify_accepts_uncompressed_public_key() {
        let key = golden_key();
        let sig = sign(b"hello", PayloadEncoding::Raw, &key).unwrap();
        let uncompressed = key.public_key().to_uncompressed_hex().unwrap();
        assert!(verify_hex(&uncompressed, b"hello", PayloadEncoding::Raw, &sig.to_hex()).unwrap());
    }

    #[test]
    fn test_signature_serde_as_hex() {
        let sig = sign(b"hello", PayloadEncoding::Raw, &golden_key()).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 128 + 2);
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_payload_encoding_serde_names() {
        assert_eq!(serde_json::to_string(&PayloadEncoding::Hex).unwrap(), "\"hex\"");
        let utf8: PayloadEncoding = serde_json::from_str("\"utf8\"").unwrap();
        assert_eq!(utf8, PayloadEncoding::Raw);
    }
}
