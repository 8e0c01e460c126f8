//! # Curve Backend
//!
//! Everything the derivation engine and the signer need from elliptic-curve
//! math, behind one trait. The rest of the crate only ever sees byte arrays
//! (scalars, SEC1 points, DER blobs), so a different implementation of the
//! same named curve can be dropped in without touching path or signature
//! logic.
//!
//! [`Secp256r1`] is the production backend: a thin wrapper over RustCrypto's
//! `p256` (scalar/point arithmetic, ECDSA with SHA-256) plus `hmac`/`sha2`
//! for HMAC-SHA512.
//!
//! Key bytes are never logged here.

use hmac::{Hmac, Mac};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature as P256Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::PrimeField;
use p256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar};
use sha2::Sha512;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{
    COMPRESSED_POINT_LENGTH, CURVE_NAME, SCALAR_LENGTH, SIGNATURE_LENGTH, UNCOMPRESSED_POINT_LENGTH,
};

/// SEC1 compressed point bytes.
pub type CompressedPoint = [u8; COMPRESSED_POINT_LENGTH];

/// SEC1 uncompressed point bytes (`04 ‖ x ‖ y`).
pub type UncompressedPoint = [u8; UNCOMPRESSED_POINT_LENGTH];

/// Scalar-sized byte array (private keys, tweaks, r and s).
pub type ScalarBytes = [u8; SCALAR_LENGTH];

/// Fixed-width `r ‖ s` signature bytes.
pub type SignatureBytes = [u8; SIGNATURE_LENGTH];

/// Low-level failures reported by a backend.
///
/// The engine and the signer translate these into [`crate::WalletError`]
/// depending on what they were doing at the time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("scalar is zero or not below the curve order")]
    InvalidScalar,

    #[error("bytes do not encode a point on the curve")]
    InvalidPoint,

    #[error("operation produced a zero scalar or the point at infinity")]
    DegenerateKey,

    #[error("HMAC key rejected")]
    InvalidHmacKey,

    #[error("malformed DER signature")]
    MalformedSignature,

    #[error("ECDSA signing failed: {0}")]
    Signing(String),
}

/// Curve capabilities consumed by derivation and signing.
///
/// Implementations must be pure: same inputs, same outputs, no shared
/// mutable state. That is what lets engines and signers be used from any
/// number of threads without locking.
pub trait CurveBackend: Send + Sync {
    /// Name of the curve, e.g. `"secp256r1"`.
    fn curve_name(&self) -> &'static str;

    /// True when `bytes` is a big-endian integer in `1..n`.
    fn is_valid_scalar(&self, bytes: &ScalarBytes) -> bool;

    /// Compressed public point for a secret scalar.
    fn public_key(&self, secret: &ScalarBytes) -> Result<CompressedPoint, CurveError>;

    /// `(secret + tweak) mod n`. The tweak may be zero but must be below `n`.
    fn add_scalars(
        &self,
        secret: &ScalarBytes,
        tweak: &ScalarBytes,
    ) -> Result<Zeroizing<ScalarBytes>, CurveError>;

    /// `tweak·G + point`, returned compressed.
    fn add_point_tweak(
        &self,
        point: &[u8],
        tweak: &ScalarBytes,
    ) -> Result<CompressedPoint, CurveError>;

    /// Validates a SEC1 point (either form) and returns it compressed.
    fn compress(&self, sec1: &[u8]) -> Result<CompressedPoint, CurveError>;

    /// Validates a SEC1 point (either form) and returns it uncompressed.
    fn decompress(&self, sec1: &[u8]) -> Result<UncompressedPoint, CurveError>;

    /// HMAC-SHA512 over the concatenation of `parts`.
    fn hmac_sha512(&self, key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>, CurveError>;

    /// ECDSA over SHA-256(`message`), returned in the library's native DER form.
    fn sign_der(&self, secret: &ScalarBytes, message: &[u8]) -> Result<Vec<u8>, CurveError>;

    /// Verifies a DER signature over SHA-256(`message`).
    ///
    /// `Ok(false)` means a well-formed signature that does not match.
    fn verify_der(&self, point: &[u8], message: &[u8], der: &[u8]) -> Result<bool, CurveError>;

    /// Strict DER for a fixed-width `r ‖ s` pair. Both halves must be in `1..n`.
    fn concat_to_der(&self, concat: &SignatureBytes) -> Result<Vec<u8>, CurveError>;

    /// Parses a strict DER signature into fixed-width `r ‖ s`.
    ///
    /// Any input that is not the unique DER encoding of an in-range pair is
    /// [`CurveError::MalformedSignature`].
    fn der_to_concat(&self, der: &[u8]) -> Result<SignatureBytes, CurveError>;
}

/// NIST P-256 backend built on the `p256` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Secp256r1;

impl Secp256r1 {
    fn scalar(bytes: &ScalarBytes) -> Result<Scalar, CurveError> {
        Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
            .ok_or(CurveError::InvalidScalar)
    }

    fn non_zero_scalar(bytes: &ScalarBytes) -> Result<NonZeroScalar, CurveError> {
        NonZeroScalar::try_from(&bytes[..]).map_err(|_| CurveError::InvalidScalar)
    }

    /// Only the `02`/`03` compressed and `04` uncompressed SEC1 forms are keys.
    fn point(sec1: &[u8]) -> Result<PublicKey, CurveError> {
        match (sec1.len(), sec1.first()) {
            (COMPRESSED_POINT_LENGTH, Some(0x02 | 0x03)) | (UNCOMPRESSED_POINT_LENGTH, Some(0x04)) => {
                PublicKey::from_sec1_bytes(sec1).map_err(|_| CurveError::InvalidPoint)
            }
            _ => Err(CurveError::InvalidPoint),
        }
    }

    fn encode_compressed(point: &PublicKey) -> Result<CompressedPoint, CurveError> {
        point
            .to_encoded_point(true)
            .as_bytes()
            .try_into()
            .map_err(|_| CurveError::InvalidPoint)
    }
}

impl CurveBackend for Secp256r1 {
    fn curve_name(&self) -> &'static str {
        CURVE_NAME
    }

    fn is_valid_scalar(&self, bytes: &ScalarBytes) -> bool {
        Self::non_zero_scalar(bytes).is_ok()
    }

    fn public_key(&self, secret: &ScalarBytes) -> Result<CompressedPoint, CurveError> {
        let scalar = Self::non_zero_scalar(secret)?;
        Self::encode_compressed(&PublicKey::from_secret_scalar(&scalar))
    }

    fn add_scalars(
        &self,
        secret: &ScalarBytes,
        tweak: &ScalarBytes,
    ) -> Result<Zeroizing<ScalarBytes>, CurveError> {
        let parent = Self::non_zero_scalar(secret)?;
        let tweak = Self::scalar(tweak)?;
        let sum = *parent.as_ref() + tweak;
        let sum = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))
            .ok_or(CurveError::DegenerateKey)?;
        Ok(Zeroizing::new(sum.to_repr().into()))
    }

    fn add_point_tweak(
        &self,
        point: &[u8],
        tweak: &ScalarBytes,
    ) -> Result<CompressedPoint, CurveError> {
        let parent = Self::point(point)?;
        let tweak = Self::scalar(tweak)?;
        let sum = ProjectivePoint::GENERATOR * tweak + parent.to_projective();
        let child = PublicKey::from_affine(sum.to_affine()).map_err(|_| CurveError::DegenerateKey)?;
        Self::encode_compressed(&child)
    }

    fn compress(&self, sec1: &[u8]) -> Result<CompressedPoint, CurveError> {
        Self::encode_compressed(&Self::point(sec1)?)
    }

    fn decompress(&self, sec1: &[u8]) -> Result<UncompressedPoint, CurveError> {
        Self::point(sec1)?
            .to_encoded_point(false)
            .as_bytes()
            .try_into()
            .map_err(|_| CurveError::InvalidPoint)
    }

    fn hmac_sha512(&self, key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>, CurveError> {
        let mut mac =
            Hmac::<Sha512>::new_from_slice(key).map_err(|_| CurveError::InvalidHmacKey)?;
        for part in parts {
            mac.update(part);
        }
        let mut out = Zeroizing::new([0u8; 64]);
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }

    fn sign_der(&self, secret: &ScalarBytes, message: &[u8]) -> Result<Vec<u8>, CurveError> {
        let signing_key =
            SigningKey::from_bytes(&FieldBytes::from(*secret)).map_err(|_| CurveError::InvalidScalar)?;
        let signature: P256Signature = signing_key
            .try_sign(message)
            .map_err(|e| CurveError::Signing(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify_der(&self, point: &[u8], message: &[u8], der: &[u8]) -> Result<bool, CurveError> {
        let verifying_key = VerifyingKey::from(Self::point(point)?);
        let signature = P256Signature::from_der(der).map_err(|_| CurveError::MalformedSignature)?;
        Ok(verifying_key.verify(message, &signature).is_ok())
    }

    fn concat_to_der(&self, concat: &SignatureBytes) -> Result<Vec<u8>, CurveError> {
        let signature =
            P256Signature::from_slice(concat).map_err(|_| CurveError::MalformedSignature)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn der_to_concat(&self, der: &[u8]) -> Result<SignatureBytes, CurveError> {
        let signature = P256Signature::from_der(der).map_err(|_| CurveError::MalformedSignature)?;
        // DER is a unique encoding: re-encoding must give back the input.
        if signature.to_der().as_bytes() != der {
            return Err(CurveError::MalformedSignature);
        }
        signature
            .to_bytes()
            .as_slice()
            .try_into()
            .map_err(|_| CurveError::MalformedSignature)
    }
}
