use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::{
	neo_builder::{Signer, TransactionAttribute, TransactionError, Witness},
	neo_codec::{Decoder, Encoder, NeoSerializable, VarSizeTrait},
	neo_config::NeoConstants,
	neo_crypto::HashableForVec,
	neo_types::Bytes,
};

/// A Neo N3 transaction.
///
/// The identity of a transaction is the double SHA-256 of its witness-less
/// serialization; witnesses only extend the envelope and never shift the
/// hash. Signers, attributes and witnesses keep their insertion order in
/// every serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
	#[serde(rename = "version")]
	pub version: u8,
	#[serde(rename = "nonce")]
	pub nonce: u32,
	#[serde(rename = "sysfee")]
	pub system_fee: i64,
	#[serde(rename = "netfee")]
	pub network_fee: i64,
	#[serde(rename = "validuntilblock")]
	pub valid_until_block: u32,
	#[serde(rename = "signers")]
	pub signers: Vec<Signer>,
	#[serde(rename = "attributes")]
	pub attributes: Vec<TransactionAttribute>,
	#[serde(rename = "script", with = "script_base64")]
	pub script: Bytes,
	#[serde(rename = "witnesses")]
	pub witnesses: Vec<Witness>,
}

// version(1) + nonce(4) + sysfee(8) + netfee(8) + validuntilblock(4)
const HEADER_SIZE: usize = 25;

impl Transaction {
	/// Serializes everything the hash covers: header, signers, attributes
	/// and script, but no witnesses.
	pub fn serialize_without_witnesses(&self, writer: &mut Encoder) {
		writer.write_u8(self.version);
		writer.write_u32(self.nonce);
		writer.write_i64(self.system_fee);
		writer.write_i64(self.network_fee);
		writer.write_u32(self.valid_until_block);
		writer.write_serializable_variable_list(&self.signers);
		writer.write_serializable_variable_list(&self.attributes);
		writer.write_var_bytes(&self.script);
	}

	/// The witness-less serialization, i.e. the bytes a witness signs.
	pub fn get_hash_data(&self) -> Bytes {
		let mut writer = Encoder::new();
		self.serialize_without_witnesses(&mut writer);
		writer.into_bytes()
	}

	/// The transaction id: `SHA-256(SHA-256(serialize_without_witnesses))`.
	pub fn hash(&self) -> H256 {
		let digest = self.get_hash_data().hash256();
		H256::from_slice(&digest)
	}

	pub fn add_witness(&mut self, witness: Witness) {
		self.witnesses.push(witness);
	}

	/// Checks the invariants a node would reject the transaction over:
	/// signer and attribute limits, script bounds, witness pairing.
	pub fn validate(&self) -> Result<(), TransactionError> {
		if self.signers.is_empty() {
			return Err(TransactionError::NoSigners)
		}
		if self.signers.len() > NeoConstants::MAX_SIGNERS {
			return Err(TransactionError::TooManySigners)
		}
		let mut seen = Vec::with_capacity(self.signers.len());
		for signer in &self.signers {
			if seen.contains(signer.account()) {
				return Err(TransactionError::DuplicateSigner)
			}
			seen.push(*signer.account());
		}

		if self.attributes.len() > NeoConstants::MAX_TRANSACTION_ATTRIBUTES {
			return Err(TransactionError::InvalidAttribute(format!(
				"a transaction carries at most {} attributes",
				NeoConstants::MAX_TRANSACTION_ATTRIBUTES
			)))
		}
		let high_priority = self
			.attributes
			.iter()
			.filter(|a| matches!(a, TransactionAttribute::HighPriority))
			.count();
		if high_priority > 1 {
			return Err(TransactionError::InvalidAttribute(
				"at most one high-priority attribute is allowed".to_string(),
			))
		}

		if self.script.is_empty() {
			return Err(TransactionError::EmptyScript)
		}
		if self.script.len() > NeoConstants::MAX_SCRIPT_SIZE {
			return Err(TransactionError::TransactionConfiguration(format!(
				"the script exceeds {} bytes",
				NeoConstants::MAX_SCRIPT_SIZE
			)))
		}

		if self.system_fee < 0 || self.network_fee < 0 {
			return Err(TransactionError::TransactionConfiguration(
				"fees cannot be negative".to_string(),
			))
		}

		if !self.witnesses.is_empty() && self.witnesses.len() != self.signers.len() {
			return Err(TransactionError::TransactionConfiguration(
				"a signed transaction carries one witness per signer".to_string(),
			))
		}

		Ok(())
	}

	/// The sender is the first signer; it pays the fees.
	pub fn sender(&self) -> Option<&Signer> {
		self.signers.first()
	}
}

impl NeoSerializable for Transaction {
	type Error = TransactionError;

	fn size(&self) -> usize {
		HEADER_SIZE
			+ self.signers.var_size()
			+ self.attributes.var_size()
			+ self.script.var_size()
			+ self.witnesses.var_size()
	}

	fn encode(&self, writer: &mut Encoder) {
		self.serialize_without_witnesses(writer);
		writer.write_serializable_variable_list(&self.witnesses);
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let version = reader.read_u8()?;
		let nonce = reader.read_u32()?;
		let system_fee = reader.read_i64()?;
		let network_fee = reader.read_i64()?;
		let valid_until_block = reader.read_u32()?;
		let signers = reader.read_serializable_list::<Signer>()?;
		let attributes = reader.read_serializable_list::<TransactionAttribute>()?;
		let script = reader.read_var_bytes()?;

		let mut witnesses = Vec::new();
		if reader.available() > 0 {
			witnesses = reader.read_serializable_list::<Witness>()?;
		}

		Ok(Self {
			version,
			nonce,
			system_fee,
			network_fee,
			valid_until_block,
			signers,
			attributes,
			script,
			witnesses,
		})
	}
}

// The RPC surface carries scripts as base64.
mod script_base64 {
	use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&BASE64.encode(bytes))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let text = String::deserialize(deserializer)?;
		BASE64.decode(&text).map_err(serde::de::Error::custom)
	}
}
