use rand_core::OsRng;

use crate::neo_crypto::{
	private_key_from_wif, wif_from_private_key, Bip32ExtendedKey, CryptoError,
	Secp256r1PrivateKey, Secp256r1PublicKey, Secp256r1Signature,
};

/// An elliptic-curve key pair: the exclusively owned private key plus the
/// public key derived from it.
///
/// Creation channels: a secure RNG, a known 32-byte scalar, a WIF string, or
/// a BIP-32 derivation path over a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
	private_key: Secp256r1PrivateKey,
	public_key: Secp256r1PublicKey,
}

impl KeyPair {
	/// Pairs an existing private key with its public counterpart.
	pub fn from_secret_key(private_key: &Secp256r1PrivateKey) -> Self {
		let public_key = private_key.to_public_key();
		Self { private_key: private_key.clone(), public_key }
	}

	/// Generates a fresh key pair from the operating system RNG.
	pub fn new_random() -> Self {
		let secret = Secp256r1PrivateKey::random(&mut OsRng);
		Self::from_secret_key(&secret)
	}

	/// Builds a key pair from a raw 32-byte scalar. Zero and out-of-order
	/// scalars are rejected.
	pub fn from_private_key(private_key: &[u8; 32]) -> Result<Self, CryptoError> {
		let secret = Secp256r1PrivateKey::from_bytes(private_key)?;
		Ok(Self::from_secret_key(&secret))
	}

	/// Imports a key pair from a WIF string.
	pub fn from_wif(wif: &str) -> Result<Self, CryptoError> {
		let secret = private_key_from_wif(wif)?;
		Ok(Self::from_secret_key(&secret))
	}

	/// Derives a key pair from a BIP-32 seed and derivation path.
	pub fn from_bip32_seed(seed: &[u8], path: &str) -> Result<Self, CryptoError> {
		Bip32ExtendedKey::from_seed(seed)?.derive_path(path)?.to_key_pair()
	}

	pub fn private_key(&self) -> &Secp256r1PrivateKey {
		&self.private_key
	}

	pub fn public_key(&self) -> &Secp256r1PublicKey {
		&self.public_key
	}

	/// Raw scalar bytes. The caller owns the copy and should zeroize it.
	pub fn private_key_bytes(&self) -> [u8; 32] {
		self.private_key.to_raw_bytes()
	}

	/// Compressed 33-byte public key encoding.
	pub fn public_key_bytes(&self) -> Vec<u8> {
		self.public_key.get_encoded(true)
	}

	/// Signs a message with this pair's private key (SHA-256 then ECDSA).
	pub fn sign(&self, message: &[u8]) -> Result<Secp256r1Signature, CryptoError> {
		self.private_key.sign_tx(message)
	}

	/// Exports the pair as a WIF string.
	pub fn export_as_wif(&self) -> String {
		wif_from_private_key(&self.private_key)
	}

	/// Discards the private scalar in place; the old scalar is zeroized as
	/// it drops and the pair moves onto a throwaway key.
	pub fn wipe(&mut self) {
		self.private_key = Secp256r1PrivateKey::random(&mut OsRng);
	}
}
