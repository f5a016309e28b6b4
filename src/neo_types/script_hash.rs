use primitive_types::H160;

use crate::{
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable},
	neo_config::{address_version, NeoConstants},
	neo_crypto::{HashableForVec, Secp256r1PublicKey},
	neo_types::{Address, TypeError},
};

/// The identity of an account or contract on-chain: the RIPEMD-160 of the
/// SHA-256 of its verification script.
pub type ScriptHash = H160;

/// Neo-specific behavior for 20-byte script hashes.
///
/// The canonical in-memory and string form is big-endian; the wire form and
/// the address payload reverse the bytes to little-endian.
pub trait ScriptHashExtension
where
	Self: Sized,
{
	/// Parses a big-endian hex string, with or without `0x` prefix. The
	/// decoded form must be exactly 20 bytes.
	fn from_hex(hex: &str) -> Result<Self, TypeError>;

	/// Builds an instance from a 20-byte big-endian slice.
	fn from_be_slice(slice: &[u8]) -> Result<Self, TypeError>;

	/// Recovers the script hash embedded in a Neo address, verifying the
	/// base58check checksum and the address version byte.
	fn from_address(address: &str) -> Result<Self, TypeError>;

	/// Hashes a verification script into its script hash.
	fn from_script(script: &[u8]) -> Self;

	/// Script hash of the single-signature verification script for a key.
	fn from_public_key(public_key: &Secp256r1PublicKey) -> Self;

	/// Encodes as a Neo address under the configured address version.
	fn to_address(&self) -> Address;

	/// Big-endian hex without prefix.
	fn to_hex(&self) -> String;

	/// Big-endian byte vector.
	fn to_vec(&self) -> Vec<u8>;

	/// Little-endian (wire order) byte vector.
	fn to_le_vec(&self) -> Vec<u8>;
}

impl ScriptHashExtension for H160 {
	fn from_hex(hex: &str) -> Result<Self, TypeError> {
		let hex = hex.strip_prefix("0x").unwrap_or(hex);
		let bytes = hex::decode(hex)
			.map_err(|e| TypeError::InvalidFormat(format!("invalid hex: {}", e)))?;
		ScriptHashExtension::from_be_slice(&bytes)
	}

	fn from_be_slice(slice: &[u8]) -> Result<Self, TypeError> {
		if slice.len() != NeoConstants::HASH160_SIZE {
			return Err(TypeError::InvalidFormat(format!(
				"expected {} bytes, got {}",
				NeoConstants::HASH160_SIZE,
				slice.len()
			)))
		}
		let mut arr = [0u8; 20];
		arr.copy_from_slice(slice);
		Ok(Self(arr))
	}

	fn from_address(address: &str) -> Result<Self, TypeError> {
		let bytes = crate::neo_crypto::base58check_decode(address)
			.ok_or(TypeError::InvalidAddress)?;
		if bytes.len() != 21 || bytes[0] != address_version() {
			return Err(TypeError::InvalidAddress)
		}

		let mut hash = [0u8; 20];
		hash.copy_from_slice(&bytes[1..21]);
		hash.reverse();
		Ok(Self(hash))
	}

	fn from_script(script: &[u8]) -> Self {
		let mut hash = script.sha256_ripemd160();
		hash.reverse();
		let mut arr = [0u8; 20];
		arr.copy_from_slice(&hash);
		Self(arr)
	}

	fn from_public_key(public_key: &Secp256r1PublicKey) -> Self {
		let script = single_sig_verification_script(public_key);
		Self::from_script(&script)
	}

	fn to_address(&self) -> Address {
		let mut payload = Vec::with_capacity(21);
		payload.push(address_version());
		payload.extend(self.to_le_vec());
		crate::neo_crypto::base58check_encode(&payload)
	}

	fn to_hex(&self) -> String {
		hex::encode(self.0)
	}

	fn to_vec(&self) -> Vec<u8> {
		self.0.to_vec()
	}

	fn to_le_vec(&self) -> Vec<u8> {
		let mut bytes = self.0.to_vec();
		bytes.reverse();
		bytes
	}
}

/// The raw single-signature verification script for a public key:
/// `PUSHDATA1 33 <key> SYSCALL System.Crypto.CheckSig`.
pub(crate) fn single_sig_verification_script(public_key: &Secp256r1PublicKey) -> Vec<u8> {
	let checksig = "System.Crypto.CheckSig".as_bytes().sha256();
	let mut script = Vec::with_capacity(NeoConstants::VERIFICATION_SCRIPT_SIZE);
	script.push(0x0C); // PUSHDATA1
	script.push(33);
	script.extend(public_key.get_encoded(true));
	script.push(0x41); // SYSCALL
	script.extend_from_slice(&checksig[..4]);
	script
}

/// Shorthand for [`ScriptHashExtension::from_public_key`].
pub fn public_key_to_script_hash(public_key: &Secp256r1PublicKey) -> ScriptHash {
	H160::from_public_key(public_key)
}

/// Address of the single-signature account for a public key.
pub fn public_key_to_address(public_key: &Secp256r1PublicKey) -> Address {
	public_key_to_script_hash(public_key).to_address()
}

impl NeoSerializable for H160 {
	type Error = CodecError;

	fn size(&self) -> usize {
		NeoConstants::HASH160_SIZE
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_bytes(&self.to_le_vec());
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let mut bytes = reader.read_array::<20>()?;
		bytes.reverse();
		Ok(H160(bytes))
	}
}

#[cfg(test)]
mod tests {
	use hex_literal::hex;

	use super::*;

	#[test]
	fn test_from_valid_hash() {
		assert_eq!(
			H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap().to_hex(),
			"23ba2703c53263e8d6e522dc32203339dcd8eee9"
		);
		assert_eq!(
			H160::from_hex("0x23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap().to_hex(),
			"23ba2703c53263e8d6e522dc32203339dcd8eee9"
		);
	}

	#[test]
	fn test_creation_failures() {
		// wrong length and bad characters both fail
		assert!(H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee").is_err());
		assert!(H160::from_hex("g3ba2703c53263e8d6e522dc32203339dcd8eee9").is_err());
		assert!(H160::from_hex(
			"c56f33fc6ecfcd0c225c4ab356fee59390af8560be0e930faebe74a6daff7c9b"
		)
		.is_err());
	}

	#[test]
	fn test_wire_form_is_reversed() {
		let hex_str = "23ba2703c53263e8d6e522dc32203339dcd8eee9";
		let hash = H160::from_hex(hex_str).unwrap();

		let mut expected = hex::decode(hex_str).unwrap();
		expected.reverse();
		assert_eq!(hash.to_array(), expected);

		let decoded = H160::decode(&mut Decoder::new(&hash.to_array())).unwrap();
		assert_eq!(decoded, hash);
	}

	#[test]
	fn test_from_address() {
		let hash = H160::from_address("NLnyLtep7jwyq1qhNPkwXbJpurC4jUT8ke").unwrap();
		let expected = hex!("09a55874c2da4b86e5d49ff530a1b153eb12c7d6");
		assert_eq!(hash.to_le_vec(), expected);
	}

	#[test]
	fn test_from_invalid_address() {
		assert_eq!(
			H160::from_address("NLnyLtep7jwyq1qhNPkwXbJpurC4jUT8keas"),
			Err(TypeError::InvalidAddress)
		);
	}

	#[test]
	fn test_address_roundtrip() {
		let hash = H160::from_hex("09a55874c2da4b86e5d49ff530a1b153eb12c7d6").unwrap();
		assert_eq!(H160::from_address(&hash.to_address()).unwrap(), hash);
	}

	#[test]
	fn test_from_contract_script() {
		let script = hex::decode(
			"110c21026aa8fe6b4360a67a530e23c08c6a72525afde34719c5436f9d3ced759f939a3d110b41138defaf",
		)
		.unwrap();
		let hash = H160::from_script(&script);
		assert_eq!(hash.to_hex(), "afaed076854454449770763a628f379721ea9808");
	}

	#[test]
	fn test_from_public_key() {
		let public_key = Secp256r1PublicKey::from_encoded(
			"035fdb1d1f06759547020891ae97c729327853aeb1256b6fe0473bc2e9fa42ff50",
		)
		.unwrap();
		let hash = H160::from_public_key(&public_key);

		let script = single_sig_verification_script(&public_key);
		assert_eq!(hash, H160::from_script(&script));
		// hashing an address derived from the key leads back to the same hash
		assert_eq!(H160::from_address(&hash.to_address()).unwrap(), hash);
	}
}
