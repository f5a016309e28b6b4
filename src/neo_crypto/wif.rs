use zeroize::Zeroize;

use crate::neo_crypto::{
	base58_helper::{base58check_decode, base58check_encode},
	CryptoError, Secp256r1PrivateKey,
};

const WIF_VERSION: u8 = 0x80;
const WIF_COMPRESSED_SUFFIX: u8 = 0x01;

/// Decodes a WIF (Wallet Import Format) string into a private key.
///
/// Neo only uses the compressed form, so the payload must be exactly
/// `[0x80 | 32-byte key | 0x01]` under base58check. Anything else fails
/// with an invalid-format error, a bad checksum included.
pub fn private_key_from_wif(wif: &str) -> Result<Secp256r1PrivateKey, CryptoError> {
	let mut data = base58check_decode(wif)
		.ok_or_else(|| CryptoError::InvalidFormat("incorrect WIF checksum".to_string()))?;

	if data.len() != 34 || data[0] != WIF_VERSION || data[33] != WIF_COMPRESSED_SUFFIX {
		data.zeroize();
		return Err(CryptoError::InvalidFormat("incorrect WIF format".to_string()))
	}

	let key = Secp256r1PrivateKey::from_bytes(&data[1..33]);
	data.zeroize();
	key
}

/// Encodes a private key as a WIF string with the compressed-key suffix.
pub fn wif_from_private_key(private_key: &Secp256r1PrivateKey) -> String {
	let mut extended = Vec::with_capacity(34);
	extended.push(WIF_VERSION);
	extended.extend_from_slice(&private_key.to_raw_bytes());
	extended.push(WIF_COMPRESSED_SUFFIX);

	let wif = base58check_encode(&extended);
	extended.zeroize();
	wif
}
