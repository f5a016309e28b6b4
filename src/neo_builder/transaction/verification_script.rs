use num_bigint::BigInt;
use num_traits::ToPrimitive;
use primitive_types::H160;
use serde::{Deserialize, Serialize};

use crate::{
	neo_builder::{BuilderError, InteropService, ScriptBuilder},
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait},
	neo_crypto::Secp256r1PublicKey,
	neo_types::{Bytes, OpCode, ScriptHashExtension},
};

/// The script side of a witness: executable bytes whose hash identifies the
/// signing account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationScript {
	script: Bytes,
}

impl VerificationScript {
	pub fn new() -> Self {
		Self { script: Bytes::new() }
	}

	pub fn from_bytes(script: Bytes) -> Self {
		Self { script }
	}

	/// The single-signature template for a public key.
	pub fn from_public_key(public_key: &Secp256r1PublicKey) -> Self {
		Self { script: ScriptBuilder::build_verification_script(&public_key.get_encoded(true)) }
	}

	/// The m-of-n template over a set of public keys; keys are sorted by
	/// their compressed encoding before emission.
	pub fn from_multi_sig(
		public_keys: &[Secp256r1PublicKey],
		threshold: u8,
	) -> Result<Self, BuilderError> {
		let mut encoded: Vec<Vec<u8>> =
			public_keys.iter().map(|key| key.get_encoded(true)).collect();
		let script = ScriptBuilder::build_multi_sig_script(&mut encoded, threshold)?;
		Ok(Self { script })
	}

	pub fn script(&self) -> &Bytes {
		&self.script
	}

	pub fn is_empty(&self) -> bool {
		self.script.is_empty()
	}

	/// The script hash, i.e. the on-chain identity of this script.
	pub fn hash(&self) -> H160 {
		H160::from_script(&self.script)
	}

	/// Whether the script matches the single-signature template.
	pub fn is_single_sig(&self) -> bool {
		self.script.len() == 40
			&& self.script[0] == OpCode::PushData1.opcode()
			&& self.script[1] == 33
			&& self.script[35] == OpCode::Syscall.opcode()
			&& self.script[36..40] == InteropService::SystemCryptoCheckSig.hash_bytes()
	}

	/// Whether the script matches the multi-signature template.
	pub fn is_multi_sig(&self) -> bool {
		self.parse_multi_sig().is_some()
	}

	// Parses the multi-sig template and returns (threshold, keys).
	fn parse_multi_sig(&self) -> Option<(usize, Vec<Secp256r1PublicKey>)> {
		if self.script.len() < 42 {
			return None
		}

		let mut reader = Decoder::new(&self.script);
		let threshold = read_push_int(&mut reader)?.to_usize()?;
		if !(1..=16).contains(&threshold) {
			return None
		}

		let mut keys = Vec::new();
		loop {
			reader.mark();
			let op = reader.read_u8().ok()?;
			if op != OpCode::PushData1.opcode() {
				reader.reset();
				break
			}
			if reader.read_u8().ok()? != 33 {
				return None
			}
			let point = reader.read_bytes(33).ok()?;
			keys.push(Secp256r1PublicKey::from_bytes(&point).ok()?);
		}

		if keys.len() < threshold || keys.len() > 16 {
			return None
		}

		let n = read_push_int(&mut reader)?.to_usize()?;
		if n != keys.len() {
			return None
		}
		if reader.read_u8().ok()? != OpCode::Syscall.opcode() {
			return None
		}
		let service: [u8; 4] = reader.read_bytes(4).ok()?.try_into().ok()?;
		if service != InteropService::SystemCryptoCheckMultisig.hash_bytes() {
			return None
		}

		Some((threshold, keys))
	}

	/// Public keys checked by this script, in script order.
	pub fn get_public_keys(&self) -> Result<Vec<Secp256r1PublicKey>, BuilderError> {
		if self.is_single_sig() {
			let key = Secp256r1PublicKey::from_bytes(&self.script[2..35])
				.map_err(|_| BuilderError::InvalidScript("invalid EC point".to_string()))?;
			return Ok(vec![key])
		}
		self.parse_multi_sig()
			.map(|(_, keys)| keys)
			.ok_or_else(|| BuilderError::InvalidScript("not a signature script".to_string()))
	}

	/// Number of signatures this script requires.
	pub fn get_signing_threshold(&self) -> Result<usize, BuilderError> {
		if self.is_single_sig() {
			return Ok(1)
		}
		self.parse_multi_sig()
			.map(|(threshold, _)| threshold)
			.ok_or_else(|| BuilderError::InvalidScript("not a signature script".to_string()))
	}

	/// Number of accounts participating in this script.
	pub fn get_nr_of_accounts(&self) -> Result<usize, BuilderError> {
		Ok(self.get_public_keys()?.len())
	}
}

// Reads one PUSHM1..PUSH16 or PUSHINT8..PUSHINT256 literal.
fn read_push_int(reader: &mut Decoder) -> Option<BigInt> {
	let op = reader.read_u8().ok()?;
	if (OpCode::PushM1.opcode()..=OpCode::Push16.opcode()).contains(&op) {
		return Some(BigInt::from(op as i16 - OpCode::Push0.opcode() as i16))
	}
	let count = match OpCode::try_from(op).ok()? {
		OpCode::PushInt8 => 1,
		OpCode::PushInt16 => 2,
		OpCode::PushInt32 => 4,
		OpCode::PushInt64 => 8,
		OpCode::PushInt128 => 16,
		OpCode::PushInt256 => 32,
		_ => return None,
	};
	let bytes = reader.read_bytes(count).ok()?;
	Some(BigInt::from_signed_bytes_le(&bytes))
}

impl NeoSerializable for VerificationScript {
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

	fn key(hex_str: &str) -> Secp256r1PublicKey {
		Secp256r1PublicKey::from_encoded(hex_str).unwrap()
	}

	const KEY1: &str = "035fdb1d1f06759547020891ae97c729327853aeb1256b6fe0473bc2e9fa42ff50";
	const KEY2: &str = "03eda286d19f7ee0b472afd1163d803d620a961e1581a8f2704b52c0285f6e022d";
	const KEY3: &str = "03ac81ec17f2f15fd6d193182f927c5971559c2a32b9408a06fec9e711fb7ca02e";

	#[test]
	fn test_single_sig_template() {
		let script = VerificationScript::from_public_key(&key(KEY1));
		let expected = format!(
			"0c21{}41{}",
			KEY1,
			InteropService::SystemCryptoCheckSig.hash()
		);
		assert_eq!(hex::encode(script.script()), expected);
		assert!(script.is_single_sig());
		assert!(!script.is_multi_sig());
		assert_eq!(script.get_signing_threshold().unwrap(), 1);
		assert_eq!(script.get_public_keys().unwrap(), vec![key(KEY1)]);
	}

	#[test]
	fn test_multi_sig_template() {
		let script =
			VerificationScript::from_multi_sig(&[key(KEY1), key(KEY2), key(KEY3)], 2).unwrap();

		assert!(script.is_multi_sig());
		assert!(!script.is_single_sig());
		assert_eq!(script.get_signing_threshold().unwrap(), 2);
		assert_eq!(script.get_nr_of_accounts().unwrap(), 3);

		// keys come back sorted by compressed encoding
		let keys = script.get_public_keys().unwrap();
		assert_eq!(keys, vec![key(KEY1), key(KEY3), key(KEY2)]);
	}

	#[test]
	fn test_script_hash_matches_from_script() {
		let script = VerificationScript::from_public_key(&key(KEY1));
		assert_eq!(script.hash(), H160::from_script(script.script()));
	}

	#[test]
	fn test_invalid_script_is_neither() {
		let script = VerificationScript::from_bytes(hex::decode("0123456789abcdef").unwrap());
		assert!(!script.is_single_sig());
		assert!(!script.is_multi_sig());
		assert!(script.get_signing_threshold().is_err());
		assert!(script.get_public_keys().is_err());
	}

	#[test]
	fn test_fail_multi_sig_too_short() {
		let script = VerificationScript::from_bytes(hex::decode("a89429c3be9f").unwrap());
		assert!(!script.is_multi_sig());
	}

	#[test]
	fn test_fail_multi_sig_threshold_zero() {
		// PUSH0 <key> PUSH1 SYSCALL ...
		let raw = format!(
			"100c21{}1141{}",
			KEY1,
			InteropService::SystemCryptoCheckMultisig.hash()
		);
		let script = VerificationScript::from_bytes(hex::decode(raw).unwrap());
		assert!(!script.is_multi_sig());
	}

	#[test]
	fn test_fail_multi_sig_n_less_than_threshold() {
		// threshold 3 with only 2 keys
		let raw = format!(
			"130c21{}0c21{}1241{}",
			KEY1,
			KEY2,
			InteropService::SystemCryptoCheckMultisig.hash()
		);
		let script = VerificationScript::from_bytes(hex::decode(raw).unwrap());
		assert!(!script.is_multi_sig());
	}

	#[test]
	fn test_fail_multi_sig_count_mismatch() {
		// declares PUSH3 after two keys
		let raw = format!(
			"120c21{}0c21{}1341{}",
			KEY1,
			KEY2,
			InteropService::SystemCryptoCheckMultisig.hash()
		);
		let script = VerificationScript::from_bytes(hex::decode(raw).unwrap());
		assert!(!script.is_multi_sig());
	}

	#[test]
	fn test_fail_multi_sig_wrong_interop() {
		let raw = format!("120c21{}0c21{}12410102aabb", KEY1, KEY2);
		let script = VerificationScript::from_bytes(hex::decode(raw).unwrap());
		assert!(!script.is_multi_sig());
	}

	#[test]
	fn test_fail_multi_sig_abrupt_end() {
		let raw = format!("120c21{}", KEY1);
		let script = VerificationScript::from_bytes(hex::decode(raw).unwrap());
		assert!(!script.is_multi_sig());
	}

	#[test]
	fn test_wire_roundtrip() {
		let script = VerificationScript::from_public_key(&key(KEY1));
		let bytes = script.to_array();
		assert_eq!(bytes.len(), script.size());
		let decoded = VerificationScript::decode(&mut Decoder::new(&bytes)).unwrap();
		assert_eq!(decoded, script);
	}
}
