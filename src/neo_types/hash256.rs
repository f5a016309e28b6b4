use primitive_types::H256;

use crate::{
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable},
	neo_config::NeoConstants,
	neo_types::TypeError,
};

/// Neo-specific behavior for 32-byte identifiers (transaction and block
/// hashes). Same conventions as `ScriptHash`: big-endian strings,
/// little-endian wire form.
pub trait Hash256Extension
where
	Self: Sized,
{
	fn from_hex(hex: &str) -> Result<Self, TypeError>;
	fn from_be_slice(slice: &[u8]) -> Result<Self, TypeError>;
	fn to_hex(&self) -> String;
	fn to_vec(&self) -> Vec<u8>;
	fn to_le_vec(&self) -> Vec<u8>;
}

impl Hash256Extension for H256 {
	fn from_hex(hex: &str) -> Result<Self, TypeError> {
		let hex = hex.strip_prefix("0x").unwrap_or(hex);
		let bytes = hex::decode(hex)
			.map_err(|e| TypeError::InvalidFormat(format!("invalid hex: {}", e)))?;
		Hash256Extension::from_be_slice(&bytes)
	}

	fn from_be_slice(slice: &[u8]) -> Result<Self, TypeError> {
		if slice.len() != NeoConstants::HASH256_SIZE {
			return Err(TypeError::InvalidFormat(format!(
				"expected {} bytes, got {}",
				NeoConstants::HASH256_SIZE,
				slice.len()
			)))
		}
		let mut arr = [0u8; 32];
		arr.copy_from_slice(slice);
		Ok(H256(arr))
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

impl NeoSerializable for H256 {
	type Error = CodecError;

	fn size(&self) -> usize {
		NeoConstants::HASH256_SIZE
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_bytes(&self.to_le_vec());
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let mut bytes = reader.read_array::<32>()?;
		bytes.reverse();
		Ok(H256(bytes))
	}
}
