//! NEP-2 password-protected private keys.
//!
//! The 39-byte payload under base58check is
//! `[0x01, 0x42, 0xE0, address_hash(4), ciphertext(32)]`: the private key is
//! XORed against the left half of a 64-byte scrypt derivation and encrypted
//! with AES-256-ECB under the right half. The embedded address hash makes
//! the format self-checking, so a wrong passphrase is detected without any
//! chain access.

use aes::Aes256;
use cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyInit};
use scrypt::{scrypt, Params};
use zeroize::Zeroize;

use crate::{
	neo_config::NeoConstants,
	neo_crypto::{base58check_decode, base58check_encode, HashableForVec, KeyPair},
	neo_protocol::ProtocolError,
	neo_types::{public_key_to_address, Address},
};

type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

/// Scrypt cost parameters of a NEP-6 wallet, `(N, r, p)` with `N` a power
/// of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScryptParamsDef {
	pub n: u32,
	pub r: u32,
	pub p: u32,
}

impl Default for ScryptParamsDef {
	fn default() -> Self {
		Self { n: NeoConstants::SCRYPT_N, r: NeoConstants::SCRYPT_R, p: NeoConstants::SCRYPT_P }
	}
}

impl ScryptParamsDef {
	/// The light profile (N = 256, r = 1, p = 1) used by developer tooling
	/// where key stretching latency matters more than brute-force cost.
	pub fn light() -> Self {
		Self { n: 256, r: 1, p: 1 }
	}

	/// Converts to the `scrypt` crate's parameter object, rejecting an `n`
	/// that is not a power of two greater than one.
	pub fn to_params(&self, dk_len: usize) -> Result<Params, ProtocolError> {
		if self.n < 2 || !self.n.is_power_of_two() {
			return Err(ProtocolError::InvalidFormat(format!(
				"scrypt N must be a power of two > 1, got {}",
				self.n
			)))
		}
		let log_n = self.n.ilog2() as u8;
		Params::new(log_n, self.r, self.p, dk_len)
			.map_err(|e| ProtocolError::InvalidFormat(format!("invalid scrypt parameters: {}", e)))
	}
}

/// Encrypts a key pair's private key under a passphrase, producing the
/// 58-character `6P…` string.
pub fn nep2_encrypt(
	password: &str,
	key_pair: &KeyPair,
	params: ScryptParamsDef,
) -> Result<String, ProtocolError> {
	let address = public_key_to_address(key_pair.public_key());
	let addr_hash = address_hash(&address);

	let mut derived = derive_key(password, &addr_hash, params)?;
	let (d1, d2) = derived.split_at(32);

	let mut private_key = key_pair.private_key_bytes();
	let mut xored = [0u8; 32];
	for i in 0..32 {
		xored[i] = private_key[i] ^ d1[i];
	}

	let ciphertext = Aes256EcbEnc::new_from_slice(d2)
		.expect("the derived half is a 32 byte AES key")
		.encrypt_padded_vec_mut::<NoPadding>(&xored);

	let mut payload = Vec::with_capacity(NeoConstants::NEP2_SIZE);
	payload.push(NeoConstants::NEP2_PREFIX_1);
	payload.push(NeoConstants::NEP2_PREFIX_2);
	payload.push(NeoConstants::NEP2_FLAG);
	payload.extend_from_slice(&addr_hash);
	payload.extend_from_slice(&ciphertext);

	private_key.zeroize();
	xored.zeroize();
	derived.zeroize();

	Ok(base58check_encode(&payload))
}

/// Decrypts a NEP-2 string back into a key pair. A passphrase that does not
/// reproduce the embedded address hash fails with
/// [`ProtocolError::InvalidPassword`].
pub fn nep2_decrypt(
	password: &str,
	nep2: &str,
	params: ScryptParamsDef,
) -> Result<KeyPair, ProtocolError> {
	let payload = base58check_decode(nep2)
		.ok_or_else(|| ProtocolError::InvalidFormat("invalid NEP-2 checksum".to_string()))?;
	if payload.len() != NeoConstants::NEP2_SIZE
		|| payload[0] != NeoConstants::NEP2_PREFIX_1
		|| payload[1] != NeoConstants::NEP2_PREFIX_2
		|| payload[2] != NeoConstants::NEP2_FLAG
	{
		return Err(ProtocolError::InvalidFormat("malformed NEP-2 payload".to_string()))
	}

	let addr_hash: [u8; 4] = payload[3..7].try_into().expect("slice of 4");
	let ciphertext = &payload[7..39];

	let mut derived = derive_key(password, &addr_hash, params)?;
	let (d1, d2) = derived.split_at(32);

	let mut decrypted = Aes256EcbDec::new_from_slice(d2)
		.expect("the derived half is a 32 byte AES key")
		.decrypt_padded_vec_mut::<NoPadding>(ciphertext)
		.map_err(|_| ProtocolError::InvalidFormat("NEP-2 ciphertext unpadding failed".to_string()))?;

	let mut private_key = [0u8; 32];
	for i in 0..32 {
		private_key[i] = decrypted[i] ^ d1[i];
	}

	let key_pair = KeyPair::from_private_key(&private_key);
	private_key.zeroize();
	decrypted.zeroize();
	derived.zeroize();
	let key_pair = key_pair.map_err(|_| ProtocolError::InvalidPassword)?;

	// recomputing the address hash proves the passphrase; compare without
	// short-circuiting so timing does not leak the first differing byte
	let address = public_key_to_address(key_pair.public_key());
	let recomputed = address_hash(&address);
	let diff = addr_hash
		.iter()
		.zip(recomputed.iter())
		.fold(0u8, |acc, (a, b)| acc | (a ^ b));
	if diff != 0 {
		return Err(ProtocolError::InvalidPassword)
	}

	Ok(key_pair)
}

// First four bytes of the double SHA-256 of the textual address.
fn address_hash(address: &Address) -> [u8; 4] {
	let digest = address.as_bytes().hash256();
	digest[..4].try_into().expect("hash256 yields 32 bytes")
}

fn derive_key(
	password: &str,
	salt: &[u8; 4],
	params: ScryptParamsDef,
) -> Result<Vec<u8>, ProtocolError> {
	let mut derived = vec![0u8; NeoConstants::SCRYPT_DK_LEN];
	scrypt(
		password.as_bytes(),
		salt,
		&params.to_params(NeoConstants::SCRYPT_DK_LEN)?,
		&mut derived,
	)
	.map_err(|e| ProtocolError::InvalidFormat(format!("scrypt failed: {}", e)))?;
	Ok(derived)
}
