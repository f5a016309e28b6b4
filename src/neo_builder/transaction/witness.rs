use primitive_types::H160;
use serde::{Deserialize, Serialize};

use crate::{
	neo_builder::{BuilderError, InvocationScript, VerificationScript},
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable},
	neo_crypto::{KeyPair, Secp256r1PublicKey, Secp256r1Signature},
	neo_types::Bytes,
};

/// A pair of scripts proving a signer's authorization: the invocation script
/// pushes the signatures, the verification script checks them. The hash of
/// the verification script must equal the signer's account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Witness {
	pub invocation: InvocationScript,
	pub verification: VerificationScript,
}

impl Witness {
	pub fn new() -> Self {
		Self { invocation: InvocationScript::new(), verification: VerificationScript::new() }
	}

	pub fn from_scripts(invocation: Bytes, verification: Bytes) -> Self {
		Self {
			invocation: InvocationScript::from_bytes(invocation),
			verification: VerificationScript::from_bytes(verification),
		}
	}

	/// Signs `message` with the key pair and assembles the single-signature
	/// witness for it.
	pub fn create(message: &[u8], key_pair: &KeyPair) -> Result<Self, BuilderError> {
		let invocation = InvocationScript::from_message_and_key_pair(message, key_pair)?;
		let verification = VerificationScript::from_public_key(key_pair.public_key());
		Ok(Self { invocation, verification })
	}

	/// Assembles an m-of-n witness from collected signatures.
	pub fn create_multi_sig(
		threshold: u8,
		signatures: &[Secp256r1Signature],
		public_keys: &[Secp256r1PublicKey],
	) -> Result<Self, BuilderError> {
		let verification = VerificationScript::from_multi_sig(public_keys, threshold)?;
		if signatures.len() < threshold as usize {
			return Err(BuilderError::SignerConfiguration(format!(
				"{} signature(s) do not meet the signing threshold of {}",
				signatures.len(),
				threshold
			)))
		}
		let invocation = InvocationScript::from_signatures(&signatures[..threshold as usize]);
		Ok(Self { invocation, verification })
	}

	/// The account this witness authorizes for.
	pub fn script_hash(&self) -> H160 {
		self.verification.hash()
	}
}

impl NeoSerializable for Witness {
	type Error = CodecError;

	fn size(&self) -> usize {
		self.invocation.size() + self.verification.size()
	}

	fn encode(&self, writer: &mut Encoder) {
		self.invocation.encode(writer);
		self.verification.encode(writer);
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let invocation = InvocationScript::decode(reader)?;
		let verification = VerificationScript::decode(reader)?;
		Ok(Self { invocation, verification })
	}
}
