//! BIP-32 hierarchical key derivation over secp256r1 (SLIP-10 variant).
//!
//! Neo wallets derive accounts along `m/44'/888'/account'/0/index`. The
//! derivation follows SLIP-10 for the Nist256p1 curve: the master key comes
//! from `HMAC-SHA512("Nist256p1 seed", seed)` and out-of-range candidate
//! scalars are re-hashed rather than rejected.

use p256::{
	elliptic_curve::{Field, PrimeField},
	FieldBytes, Scalar,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::neo_crypto::{CryptoError, HashableForVec, KeyPair, Secp256r1PrivateKey};

const MASTER_HMAC_KEY: &[u8] = b"Nist256p1 seed";

/// Marks a derivation index as hardened.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// An extended private key: a secp256r1 scalar plus the chain code that
/// seeds child derivation. Both are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Bip32ExtendedKey {
	key: [u8; 32],
	chain_code: [u8; 32],
	depth: u8,
	child_number: u32,
}

impl Bip32ExtendedKey {
	/// Derives the master extended key from a seed, which must be between
	/// 16 and 64 bytes long.
	pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
		if seed.len() < 16 || seed.len() > 64 {
			return Err(CryptoError::KeyDerivationError(
				"seed must be between 16 and 64 bytes".to_string(),
			))
		}

		let mut digest = seed.hmac_sha512(MASTER_HMAC_KEY);
		loop {
			let (candidate, chain_code) = digest.split_at(32);
			if let Some(scalar) = parse_scalar(candidate) {
				if scalar != Scalar::ZERO {
					let key = Self {
						key: candidate.try_into().expect("split yields 32 bytes"),
						chain_code: chain_code.try_into().expect("split yields 32 bytes"),
						depth: 0,
						child_number: 0,
					};
					digest.zeroize();
					return Ok(key)
				}
			}
			// SLIP-10: out-of-range candidates re-enter the HMAC
			digest = digest.hmac_sha512(MASTER_HMAC_KEY);
		}
	}

	/// Derives one child key. Indices with [`HARDENED_BIT`] set use the
	/// hardened scheme, others use the parent public key.
	pub fn derive_child(&self, index: u32) -> Result<Self, CryptoError> {
		let parent_scalar = parse_scalar(&self.key)
			.ok_or_else(|| CryptoError::KeyDerivationError("parent key out of range".to_string()))?;

		let mut data = Vec::with_capacity(37);
		if index & HARDENED_BIT != 0 {
			data.push(0x00);
			data.extend_from_slice(&self.key);
		} else {
			let public = self.private_key()?.to_public_key();
			data.extend_from_slice(&public.get_encoded(true));
		}
		data.extend_from_slice(&index.to_be_bytes());

		loop {
			let mut digest = data.hmac_sha512(&self.chain_code);
			let (candidate, chain_code) = digest.split_at(32);

			if let Some(tweak) = parse_scalar(candidate) {
				let child_scalar = tweak + parent_scalar;
				if child_scalar != Scalar::ZERO {
					let child_bytes: FieldBytes = child_scalar.to_repr();
					let child = Self {
						key: child_bytes.as_slice().try_into().expect("scalars are 32 bytes"),
						chain_code: chain_code.try_into().expect("split yields 32 bytes"),
						depth: self.depth + 1,
						child_number: index,
					};
					data.zeroize();
					digest.zeroize();
					return Ok(child)
				}
			}

			// SLIP-10 retry: 0x01 || IR || index
			let retry_seed: Vec<u8> = digest[32..].to_vec();
			data.zeroize();
			data = Vec::with_capacity(37);
			data.push(0x01);
			data.extend_from_slice(&retry_seed);
			data.extend_from_slice(&index.to_be_bytes());
			digest.zeroize();
		}
	}

	/// Walks a `m/44'/888'/0'/0/0` style path.
	pub fn derive_path(&self, path: &str) -> Result<Self, CryptoError> {
		let mut key = self.clone();
		for index in parse_derivation_path(path)? {
			key = key.derive_child(index)?;
		}
		Ok(key)
	}

	pub fn depth(&self) -> u8 {
		self.depth
	}

	pub fn child_number(&self) -> u32 {
		self.child_number
	}

	pub fn chain_code(&self) -> &[u8; 32] {
		&self.chain_code
	}

	pub fn private_key(&self) -> Result<Secp256r1PrivateKey, CryptoError> {
		Secp256r1PrivateKey::from_bytes(&self.key)
	}

	/// Materializes the extended key as an SDK key pair.
	pub fn to_key_pair(&self) -> Result<KeyPair, CryptoError> {
		Ok(KeyPair::from_secret_key(&self.private_key()?))
	}
}

impl std::fmt::Debug for Bip32ExtendedKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Bip32ExtendedKey")
			.field("depth", &self.depth)
			.field("child_number", &self.child_number)
			.finish_non_exhaustive()
	}
}

fn parse_scalar(bytes: &[u8]) -> Option<Scalar> {
	let field_bytes = FieldBytes::from_slice(bytes);
	Option::<Scalar>::from(Scalar::from_repr(*field_bytes))
}

/// Parses a derivation path such as `m/44'/888'/0'/0/0`. Both `'` and `h`
/// mark hardened components.
pub fn parse_derivation_path(path: &str) -> Result<Vec<u32>, CryptoError> {
	let trimmed = path.strip_prefix('m').unwrap_or(path);
	let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
	if trimmed.is_empty() {
		return Ok(Vec::new())
	}

	trimmed
		.split('/')
		.map(|component| {
			let (digits, hardened) =
				match component.strip_suffix('\'').or_else(|| component.strip_suffix('h')) {
					Some(digits) => (digits, true),
					None => (component, false),
				};
			let index: u32 = digits.parse().map_err(|_| {
				CryptoError::KeyDerivationError(format!("invalid path component '{}'", component))
			})?;
			if index & HARDENED_BIT != 0 {
				return Err(CryptoError::KeyDerivationError(format!(
					"index {} out of range",
					index
				)))
			}
			Ok(if hardened { index | HARDENED_BIT } else { index })
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_derivation_path() {
		assert_eq!(
			parse_derivation_path("m/44'/888'/0'/0/2").unwrap(),
			vec![
				44 | HARDENED_BIT,
				888 | HARDENED_BIT,
				HARDENED_BIT,
				0,
				2
			]
		);
		assert_eq!(parse_derivation_path("m").unwrap(), Vec::<u32>::new());
		assert!(parse_derivation_path("m/abc").is_err());
		assert!(parse_derivation_path("m/2147483648").is_err());
	}

	#[test]
	fn test_seed_length_bounds() {
		assert!(Bip32ExtendedKey::from_seed(&[0u8; 15]).is_err());
		assert!(Bip32ExtendedKey::from_seed(&[0u8; 65]).is_err());
		assert!(Bip32ExtendedKey::from_seed(&[0u8; 16]).is_ok());
	}

	// SLIP-10 test vector 1 for NIST P-256
	#[test]
	fn test_slip10_vector_master() {
		let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
		let master = Bip32ExtendedKey::from_seed(&seed).unwrap();

		assert_eq!(
			hex::encode(master.chain_code()),
			"beeb672fe4621673f722f38529c07392fecaa61015c80c34f29ce8b41b3cb6ea"
		);
		assert_eq!(
			hex::encode(master.private_key().unwrap().to_raw_bytes()),
			"612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2"
		);
	}

	#[test]
	fn test_slip10_vector_hardened_child() {
		let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
		let master = Bip32ExtendedKey::from_seed(&seed).unwrap();
		let child = master.derive_child(HARDENED_BIT).unwrap();

		assert_eq!(
			hex::encode(child.chain_code()),
			"3460cea53e6a6bb5fb391eeef3237ffd8724bf0a40e94943c98b83825342ee11"
		);
		assert_eq!(
			hex::encode(child.private_key().unwrap().to_raw_bytes()),
			"6939694369114c67917a182c59ddb8cafc3004e63ca5d3b84403ba8613debc0c"
		);
	}

	#[test]
	fn test_slip10_vector_path() {
		let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
		let master = Bip32ExtendedKey::from_seed(&seed).unwrap();
		let key = master.derive_path("m/0'/1/2'/2/1000000000").unwrap();

		assert_eq!(
			hex::encode(key.private_key().unwrap().to_raw_bytes()),
			"21c4f269ef0a5fd1badf47eeacebeeaa3de22eb8e5b0adcd0f27dd99d34d0119"
		);
		assert_eq!(key.depth(), 5);
		assert_eq!(key.child_number(), 1_000_000_000);
	}

	#[test]
	fn test_hardened_and_normal_children_differ() {
		let master = Bip32ExtendedKey::from_seed(&[7u8; 32]).unwrap();
		let hardened = master.derive_child(HARDENED_BIT).unwrap();
		let normal = master.derive_child(0).unwrap();
		assert_ne!(
			hardened.private_key().unwrap().to_raw_bytes(),
			normal.private_key().unwrap().to_raw_bytes()
		);
	}
}
