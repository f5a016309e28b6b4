//! secp256r1 key material and signatures.
//!
//! Thin wrappers around the `p256` types that pin down the Neo conventions:
//! public keys travel in 33-byte compressed SEC1 form, signatures are 64-byte
//! compact `r ‖ s` pairs, and every signature this module produces is low-s
//! canonical. Verification rejects high-s signatures.

use core::fmt;
use std::{
	cmp::Ordering,
	hash::{Hash, Hasher},
};

use p256::{
	ecdsa::{Signature, SigningKey, VerifyingKey},
	elliptic_curve::{
		scalar::IsHigh,
		sec1::{FromEncodedPoint, ToEncodedPoint},
	},
	EncodedPoint, FieldBytes, PublicKey, SecretKey,
};
use rand_core::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use zeroize::Zeroize;

use crate::{
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable},
	neo_config::NeoConstants,
	neo_crypto::{CryptoError, HashableForVec},
};

/// A public key on the secp256r1 curve.
#[derive(Debug, Clone)]
pub struct Secp256r1PublicKey {
	inner: PublicKey,
}

/// A private key on the secp256r1 curve. The scalar is wiped from memory
/// when the value is dropped.
#[derive(Clone)]
pub struct Secp256r1PrivateKey {
	inner: SecretKey,
}

/// A compact ECDSA signature, always held in low-s form.
#[derive(Debug, Clone)]
pub struct Secp256r1Signature {
	inner: Signature,
}

impl Secp256r1PublicKey {
	/// Builds a public key from uncompressed x and y coordinates. Returns
	/// `None` if the coordinates are not a point on the curve.
	pub fn new(gx: [u8; 32], gy: [u8; 32]) -> Option<Self> {
		let mut uncompressed = Vec::with_capacity(NeoConstants::PUBLIC_KEY_SIZE_UNCOMPRESSED);
		uncompressed.push(0x04);
		uncompressed.extend_from_slice(&gx);
		uncompressed.extend_from_slice(&gy);

		let point = EncodedPoint::from_bytes(&uncompressed).ok()?;
		let public_key = Option::<PublicKey>::from(PublicKey::from_encoded_point(&point))?;
		Some(Self { inner: public_key })
	}

	pub fn from_public_key(public_key: PublicKey) -> Self {
		Self { inner: public_key }
	}

	/// Parses a SEC1-encoded point, accepting both the 33-byte compressed
	/// and the 65-byte uncompressed form.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		let point = EncodedPoint::from_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
		let public_key = Option::<PublicKey>::from(PublicKey::from_encoded_point(&point))
			.ok_or(CryptoError::InvalidPublicKey)?;
		Ok(Self { inner: public_key })
	}

	/// Parses a hex string (with or without `0x` prefix).
	pub fn from_encoded(encoded: &str) -> Option<Self> {
		let encoded = encoded.trim_start_matches("0x");
		let bytes = hex::decode(encoded).ok()?;
		Self::from_bytes(&bytes).ok()
	}

	/// Verifies a signature over a 32-byte message digest.
	///
	/// High-s signatures are rejected even when they would otherwise verify.
	pub fn verify_prehash(
		&self,
		digest: &[u8; 32],
		signature: &Secp256r1Signature,
	) -> Result<(), CryptoError> {
		if signature.is_high_s() {
			return Err(CryptoError::SignatureVerificationError)
		}
		VerifyingKey::from(&self.inner)
			.verify_prehash(digest, &signature.inner)
			.map_err(|_| CryptoError::SignatureVerificationError)
	}

	/// Verifies a signature over an arbitrary message, hashing it with
	/// SHA-256 first.
	pub fn verify(
		&self,
		message: &[u8],
		signature: &Secp256r1Signature,
	) -> Result<(), CryptoError> {
		let digest: [u8; 32] = message
			.sha256()
			.try_into()
			.expect("SHA-256 digests are 32 bytes");
		self.verify_prehash(&digest, signature)
	}

	/// SEC1 point encoding, compressed (33 bytes) or uncompressed (65 bytes).
	pub fn get_encoded(&self, compressed: bool) -> Vec<u8> {
		self.inner.to_encoded_point(compressed).as_bytes().to_vec()
	}

	/// Compressed encoding as lowercase hex without a prefix.
	pub fn get_encoded_compressed_hex(&self) -> String {
		hex::encode(self.get_encoded(true))
	}
}

impl Secp256r1PrivateKey {
	/// Generates a fresh private key from a cryptographically secure RNG.
	pub fn random(rng: &mut OsRng) -> Self {
		Self { inner: SecretKey::random(rng) }
	}

	/// Builds a private key from a 32-byte scalar. Scalars of 0 or at least
	/// the curve order are rejected.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		if bytes.len() != NeoConstants::PRIVATE_KEY_SIZE {
			return Err(CryptoError::InvalidPrivateKey)
		}
		SecretKey::from_slice(bytes)
			.map(|inner| Self { inner })
			.map_err(|_| CryptoError::InvalidPrivateKey)
	}

	/// Raw 32-byte scalar. Callers holding this copy are responsible for
	/// zeroizing it.
	pub fn to_raw_bytes(&self) -> [u8; 32] {
		let bytes: FieldBytes = self.inner.to_bytes();
		bytes.as_slice().try_into().expect("field elements are 32 bytes")
	}

	pub fn to_public_key(&self) -> Secp256r1PublicKey {
		Secp256r1PublicKey::from_public_key(self.inner.public_key())
	}

	/// Signs a 32-byte message digest, producing a low-s signature.
	pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<Secp256r1Signature, CryptoError> {
		let signing_key = SigningKey::from(&self.inner);
		let signature: Signature =
			signing_key.sign_prehash(digest).map_err(|_| CryptoError::SigningError)?;
		Ok(Secp256r1Signature::normalized(signature))
	}

	/// Signs an arbitrary message, hashing it with SHA-256 first.
	pub fn sign_tx(&self, message: &[u8]) -> Result<Secp256r1Signature, CryptoError> {
		let digest: [u8; 32] = message
			.sha256()
			.try_into()
			.expect("SHA-256 digests are 32 bytes");
		self.sign_prehash(&digest)
	}
}

impl Secp256r1Signature {
	fn normalized(signature: Signature) -> Self {
		let inner = signature.normalize_s().unwrap_or(signature);
		Self { inner }
	}

	/// Builds a signature from its `r` and `s` scalars (big-endian).
	pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Option<Self> {
		let r: FieldBytes = r.into();
		let s: FieldBytes = s.into();
		Signature::from_scalars(r, s).ok().map(|inner| Self { inner })
	}

	/// Parses a 64-byte compact `r ‖ s` signature.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		if bytes.len() != NeoConstants::SIGNATURE_SIZE {
			return Err(CryptoError::InvalidFormat(format!(
				"expected a {} byte signature, got {}",
				NeoConstants::SIGNATURE_SIZE,
				bytes.len()
			)))
		}
		Signature::from_slice(bytes)
			.map(|inner| Self { inner })
			.map_err(|_| CryptoError::InvalidFormat("malformed signature scalars".to_string()))
	}

	/// Compact 64-byte `r ‖ s` form.
	pub fn to_bytes(&self) -> [u8; 64] {
		let r: FieldBytes = self.inner.r().into();
		let s: FieldBytes = self.inner.s().into();

		let mut bytes = [0u8; 64];
		bytes[..32].copy_from_slice(r.as_ref());
		bytes[32..].copy_from_slice(s.as_ref());
		bytes
	}

	/// True when `s > n/2`, i.e. the signature is not canonical.
	pub fn is_high_s(&self) -> bool {
		bool::from(self.inner.s().is_high())
	}
}

impl Drop for Secp256r1PrivateKey {
	fn drop(&mut self) {
		// SecretKey wipes its own scalar; clear any stack copy explicitly
		let mut bytes = self.inner.to_bytes();
		bytes.zeroize();
	}
}

impl fmt::Debug for Secp256r1PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Secp256r1PrivateKey").finish_non_exhaustive()
	}
}

impl fmt::Display for Secp256r1PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.get_encoded_compressed_hex())
	}
}

impl fmt::Display for Secp256r1Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", hex::encode(self.to_bytes()))
	}
}

impl Serialize for Secp256r1PublicKey {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.get_encoded_compressed_hex())
	}
}

impl<'de> Deserialize<'de> for Secp256r1PublicKey {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let encoded = String::deserialize(deserializer)?;
		Secp256r1PublicKey::from_encoded(&encoded)
			.ok_or_else(|| serde::de::Error::custom("invalid public key"))
	}
}

impl PartialEq for Secp256r1PublicKey {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for Secp256r1PublicKey {}

impl PartialOrd for Secp256r1PublicKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Secp256r1PublicKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.get_encoded(true).cmp(&other.get_encoded(true))
	}
}

impl Hash for Secp256r1PublicKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.get_encoded(true).hash(state);
	}
}

impl PartialEq for Secp256r1PrivateKey {
	fn eq(&self, other: &Self) -> bool {
		let mut ours = self.to_raw_bytes();
		let mut theirs = other.to_raw_bytes();
		let equal = ours == theirs;
		ours.zeroize();
		theirs.zeroize();
		equal
	}
}

impl Eq for Secp256r1PrivateKey {}

impl PartialEq for Secp256r1Signature {
	fn eq(&self, other: &Self) -> bool {
		self.to_bytes() == other.to_bytes()
	}
}

impl Eq for Secp256r1Signature {}

impl Hash for Secp256r1Signature {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.to_bytes().hash(state);
	}
}

impl NeoSerializable for Secp256r1PublicKey {
	type Error = CodecError;

	fn size(&self) -> usize {
		NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_bytes(&self.get_encoded(true));
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let bytes = reader.read_bytes(NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED)?;
		Secp256r1PublicKey::from_bytes(&bytes)
			.map_err(|_| CodecError::InvalidFormat("invalid EC point".to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const ENCODED_POINT: &str =
		"03b4af8d061b6b320cce6c63bc4ec7894dce107bfc5f5ef5c68a93b4ad1e136816";

	#[test]
	fn test_public_key_from_compressed_point() {
		let public_key = Secp256r1PublicKey::from_encoded(ENCODED_POINT).unwrap();
		assert_eq!(public_key.get_encoded(true), hex::decode(ENCODED_POINT).unwrap());
		assert_eq!(public_key.get_encoded_compressed_hex(), ENCODED_POINT);
	}

	#[test]
	fn test_public_key_from_uncompressed_point() {
		let uncompressed = "04b4af8d061b6b320cce6c63bc4ec7894dce107bfc5f5ef5c68a93b4ad1e1368165f4f7fb1c5862465543c06dd5a2aa414f6583f92a5cc3e1d4259df79bf6839c9";
		assert_eq!(
			Secp256r1PublicKey::from_encoded(uncompressed)
				.unwrap()
				.get_encoded_compressed_hex(),
			ENCODED_POINT
		);
	}

	#[test]
	fn test_public_key_with_invalid_size() {
		let too_small = &ENCODED_POINT[..ENCODED_POINT.len() - 2];
		assert!(Secp256r1PublicKey::from_encoded(too_small).is_none());
	}

	#[test]
	fn test_public_key_with_hex_prefix() {
		let prefixed = format!("0x{}", ENCODED_POINT);
		assert!(Secp256r1PublicKey::from_encoded(&prefixed).is_some());
	}

	#[test]
	fn test_public_key_wire_roundtrip() {
		let public_key = Secp256r1PublicKey::from_encoded(ENCODED_POINT).unwrap();
		let wire = public_key.to_array();
		assert_eq!(wire.len(), 33);
		let decoded = Secp256r1PublicKey::decode(&mut Decoder::new(&wire)).unwrap();
		assert_eq!(decoded, public_key);
	}

	#[test]
	fn test_public_key_ordering() {
		let key1 = Secp256r1PublicKey::from_encoded(ENCODED_POINT).unwrap();
		let key2 = Secp256r1PublicKey::from_encoded(
			"036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
		)
		.unwrap();
		assert!(key1 > key2);
	}

	#[test]
	fn test_private_key_rejects_out_of_range_scalars() {
		assert!(Secp256r1PrivateKey::from_bytes(&[0u8; 32]).is_err());
		// the curve order itself is out of range
		let order =
			hex::decode("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551")
				.unwrap();
		assert!(Secp256r1PrivateKey::from_bytes(&order).is_err());
		assert!(Secp256r1PrivateKey::from_bytes(&[1u8; 16]).is_err());
	}

	#[test]
	fn test_sign_and_verify() {
		let private_key_hex = "9117f4bf9be717c9a90994326897f4243503accd06712162267e77f18b49c3a3";
		let public_key_hex = "0265bf906bf385fbf3f777832e55a87991bcfbe19b097fb7c5ca2e4025a4d5e5d6";

		let private_key =
			Secp256r1PrivateKey::from_bytes(&hex::decode(private_key_hex).unwrap()).unwrap();
		let public_key =
			Secp256r1PublicKey::from_bytes(&hex::decode(public_key_hex).unwrap()).unwrap();

		assert_eq!(public_key, private_key.to_public_key());

		let message = b"A test message";
		let signature = private_key.sign_tx(message).unwrap();

		assert!(public_key.verify(message, &signature).is_ok());
		assert!(public_key.verify(b"another message", &signature).is_err());

		let other = Secp256r1PrivateKey::random(&mut OsRng).to_public_key();
		assert!(other.verify(message, &signature).is_err());
	}

	#[test]
	fn test_signatures_are_low_s() {
		let private_key = Secp256r1PrivateKey::random(&mut OsRng);
		for i in 0u32..8 {
			let signature = private_key.sign_tx(&i.to_le_bytes()).unwrap();
			assert!(!signature.is_high_s());
		}
	}

	#[test]
	fn test_verify_rejects_malformed_input() {
		let private_key = Secp256r1PrivateKey::random(&mut OsRng);
		let public_key = private_key.to_public_key();
		let signature = private_key.sign_tx(b"payload").unwrap();

		let mut tampered = signature.to_bytes();
		tampered[10] ^= 0xFF;
		match Secp256r1Signature::from_bytes(&tampered) {
			Ok(parsed) => assert!(public_key.verify(b"payload", &parsed).is_err()),
			Err(_) => {},
		}

		assert!(Secp256r1Signature::from_bytes(&[0u8; 12]).is_err());
	}

	#[test]
	fn test_signature_bytes_roundtrip() {
		let private_key = Secp256r1PrivateKey::random(&mut OsRng);
		let signature = private_key.sign_tx(b"roundtrip").unwrap();
		let restored = Secp256r1Signature::from_bytes(&signature.to_bytes()).unwrap();
		assert_eq!(restored, signature);
	}
}
