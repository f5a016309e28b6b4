use serde::{Deserialize, Serialize};

use crate::{
	neo_builder::{BuilderError, ScriptBuilder},
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait},
	neo_crypto::{HashableForVec, KeyPair, Secp256r1Signature},
	neo_types::{Bytes, OpCode},
};

/// The argument side of a witness: a script that pushes the signature(s)
/// consumed by the paired verification script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationScript {
	script: Bytes,
}

impl InvocationScript {
	pub fn new() -> Self {
		Self { script: Bytes::new() }
	}

	pub fn from_bytes(script: Bytes) -> Self {
		Self { script }
	}

	/// Builds the invocation script for one signature.
	pub fn from_signature(signature: &Secp256r1Signature) -> Self {
		let mut builder = ScriptBuilder::new();
		builder.push_data(signature.to_bytes().to_vec());
		Self { script: builder.to_bytes() }
	}

	/// Signs `message` (double SHA-256 digest of it, to be precise) with the
	/// key pair and wraps the signature into an invocation script.
	pub fn from_message_and_key_pair(
		message: &[u8],
		key_pair: &KeyPair,
	) -> Result<Self, BuilderError> {
		let digest: [u8; 32] =
			message.hash256().try_into().expect("hash256 yields 32 bytes");
		let signature = key_pair.private_key().sign_prehash(&digest)?;
		Ok(Self::from_signature(&signature))
	}

	/// Builds the invocation script for a multi-sig witness, pushing the
	/// signatures in the given order.
	pub fn from_signatures(signatures: &[Secp256r1Signature]) -> Self {
		let mut builder = ScriptBuilder::new();
		for signature in signatures {
			builder.push_data(signature.to_bytes().to_vec());
		}
		Self { script: builder.to_bytes() }
	}

	pub fn script(&self) -> &Bytes {
		&self.script
	}

	pub fn is_empty(&self) -> bool {
		self.script.is_empty()
	}

	/// Extracts the signatures this script pushes.
	pub fn get_signatures(&self) -> Vec<Secp256r1Signature> {
		let mut reader = Decoder::new(&self.script);
		let mut signatures = Vec::new();

		loop {
			match reader.read_u8() {
				Ok(op) if op == OpCode::PushData1.opcode() => {},
				_ => break,
			}
			let Ok(len) = reader.read_u8() else { break };
			let Ok(bytes) = reader.read_bytes(len as usize) else { break };
			if let Ok(signature) = Secp256r1Signature::from_bytes(&bytes) {
				signatures.push(signature);
			}
		}

		signatures
	}
}

impl NeoSerializable for InvocationScript {
	type Error = CodecError;

	fn size(&self) -> usize {
		self.script.var_size()
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_var_bytes(&self.script);
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		Ok(Self { script: reader.read_var_bytes()? })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_signature_shape() {
		let key_pair = KeyPair::new_random();
		let signature = key_pair.sign(b"payload").unwrap();
		let script = InvocationScript::from_signature(&signature);

		// PUSHDATA1 64 <signature>
		assert_eq!(script.script().len(), 66);
		assert_eq!(script.script()[0], OpCode::PushData1.opcode());
		assert_eq!(script.script()[1], 64);
		assert_eq!(&script.script()[2..], &signature.to_bytes());
	}

	#[test]
	fn test_from_message_and_key_pair_verifies() {
		let key_pair = KeyPair::new_random();
		let message = b"transaction bytes";
		let script = InvocationScript::from_message_and_key_pair(message, &key_pair).unwrap();

		let signatures = script.get_signatures();
		assert_eq!(signatures.len(), 1);

		let digest: [u8; 32] = message.hash256().try_into().unwrap();
		assert!(key_pair.public_key().verify_prehash(&digest, &signatures[0]).is_ok());
	}

	#[test]
	fn test_from_signatures_pushes_all() {
		let key_pair = KeyPair::new_random();
		let signatures: Vec<_> =
			(0u8..3).map(|i| key_pair.sign(&[i]).unwrap()).collect();
		let script = InvocationScript::from_signatures(&signatures);

		assert_eq!(script.get_signatures(), signatures);
	}

	#[test]
	fn test_wire_roundtrip() {
		let key_pair = KeyPair::new_random();
		let script =
			InvocationScript::from_signature(&key_pair.sign(b"payload").unwrap());
		let bytes = script.to_array();
		assert_eq!(bytes.len(), script.size());
		assert_eq!(InvocationScript::decode(&mut Decoder::new(&bytes)).unwrap(), script);
	}
}
