use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use primitive_types::H160;

use crate::{
	neo_builder::{BuilderError, InteropService},
	neo_codec::Encoder,
	neo_config::NeoConstants,
	neo_types::{ContractParameter, OpCode, ScriptHashExtension},
};

/// Assembles Neo VM scripts opcode by opcode.
///
/// # Examples
///
/// ```
/// use neo3_core::prelude::{OpCode, ScriptBuilder};
///
/// let mut builder = ScriptBuilder::new();
/// builder.push_data(vec![0x01, 0x02]).op_code(&[OpCode::Nop]);
/// assert_eq!(builder.to_bytes(), vec![0x0C, 0x02, 0x01, 0x02, 0x21]);
/// ```
#[derive(Debug, Default)]
pub struct ScriptBuilder {
	script: Encoder,
}

impl ScriptBuilder {
	pub fn new() -> Self {
		Self { script: Encoder::new() }
	}

	pub fn op_code(&mut self, op_codes: &[OpCode]) -> &mut Self {
		for op in op_codes {
			self.script.write_u8(op.opcode());
		}
		self
	}

	/// Emits one opcode followed by its raw operand bytes.
	pub fn op_code_with_arg(&mut self, op_code: OpCode, argument: &[u8]) -> &mut Self {
		self.script.write_u8(op_code.opcode());
		self.script.write_bytes(argument);
		self
	}

	/// Emits `SYSCALL` with the four-byte identifier of the service.
	pub fn sys_call(&mut self, service: InteropService) -> &mut Self {
		self.op_code_with_arg(OpCode::Syscall, &service.hash_bytes())
	}

	/// Pushes an integer using the shortest encoding: `PUSHM1`..`PUSH16`
	/// for small values, `PUSHINT8`..`PUSHINT256` otherwise.
	pub fn push_integer(&mut self, value: &BigInt) -> Result<&mut Self, BuilderError> {
		if *value >= BigInt::from(-1) && *value <= BigInt::from(16) {
			let offset = value.to_i32().expect("value fits into an i32") as u8;
			let op = OpCode::try_from(OpCode::Push0.opcode().wrapping_add(offset))
				.expect("PUSHM1..PUSH16 are contiguous");
			return Ok(self.op_code(&[op]))
		}

		let bytes = value.to_signed_bytes_le();
		let negative = value.is_negative();
		match bytes.len() {
			1 => self.op_code_with_arg(OpCode::PushInt8, &bytes),
			2 => self.op_code_with_arg(OpCode::PushInt16, &bytes),
			len if len <= 4 =>
				self.op_code_with_arg(OpCode::PushInt32, &sign_extend(&bytes, 4, negative)),
			len if len <= 8 =>
				self.op_code_with_arg(OpCode::PushInt64, &sign_extend(&bytes, 8, negative)),
			len if len <= 16 =>
				self.op_code_with_arg(OpCode::PushInt128, &sign_extend(&bytes, 16, negative)),
			len if len <= 32 =>
				self.op_code_with_arg(OpCode::PushInt256, &sign_extend(&bytes, 32, negative)),
			len =>
				return Err(BuilderError::IllegalArgument(format!(
					"integers of {} bytes exceed the VM range",
					len
				))),
		};
		Ok(self)
	}

	/// Pushes a data payload behind the fitting `PUSHDATA` prefix.
	pub fn push_data(&mut self, data: Vec<u8>) -> &mut Self {
		match data.len() {
			0..=0xFF => {
				self.op_code(&[OpCode::PushData1]);
				self.script.write_u8(data.len() as u8);
			},
			0x100..=0xFFFF => {
				self.op_code(&[OpCode::PushData2]);
				self.script.write_u16(data.len() as u16);
			},
			_ => {
				self.op_code(&[OpCode::PushData4]);
				self.script.write_u32(data.len() as u32);
			},
		}
		self.script.write_bytes(&data);
		self
	}

	pub fn push_bool(&mut self, value: bool) -> &mut Self {
		self.op_code(&[if value { OpCode::PushTrue } else { OpCode::PushFalse }])
	}

	/// Pushes a contract parameter in the encoding the VM expects for
	/// invocation arguments.
	pub fn push_param(&mut self, param: &ContractParameter) -> Result<&mut Self, BuilderError> {
		match param {
			ContractParameter::Any | ContractParameter::Void => {
				self.op_code(&[OpCode::PushNull]);
			},
			ContractParameter::Boolean(value) => {
				self.push_bool(*value);
			},
			ContractParameter::Integer(value) => {
				self.push_integer(value)?;
			},
			ContractParameter::ByteArray(bytes)
			| ContractParameter::Signature(bytes)
			| ContractParameter::PublicKey(bytes) => {
				self.push_data(bytes.clone());
			},
			ContractParameter::String(value) => {
				self.push_data(value.as_bytes().to_vec());
			},
			ContractParameter::Hash160(hash) => {
				self.push_data(hash.to_le_vec());
			},
			ContractParameter::Hash256(hash) => {
				let mut le = hash.0.to_vec();
				le.reverse();
				self.push_data(le);
			},
			ContractParameter::Array(items) => {
				self.push_array(items)?;
			},
			ContractParameter::Map(entries) => {
				self.push_map(entries)?;
			},
			ContractParameter::InteropInterface(_) =>
				return Err(BuilderError::IllegalArgument(
					"interop interfaces cannot be pushed as arguments".to_string(),
				)),
		}
		Ok(self)
	}

	/// Pushes a parameter list and packs it into one VM array.
	pub fn push_array(&mut self, params: &[ContractParameter]) -> Result<&mut Self, BuilderError> {
		if params.is_empty() {
			return Ok(self.op_code(&[OpCode::NewArray0]))
		}
		// packed arrays pop in reverse order
		for param in params.iter().rev() {
			self.push_param(param)?;
		}
		self.push_integer(&BigInt::from(params.len()))?;
		Ok(self.op_code(&[OpCode::Pack]))
	}

	/// Pushes a key-value list and packs it into one VM map.
	pub fn push_map(
		&mut self,
		entries: &[(ContractParameter, ContractParameter)],
	) -> Result<&mut Self, BuilderError> {
		for (key, value) in entries.iter().rev() {
			self.push_param(value)?;
			self.push_param(key)?;
		}
		self.push_integer(&BigInt::from(entries.len()))?;
		Ok(self.op_code(&[OpCode::PackMap]))
	}

	/// Emits a `System.Contract.Call` of `method` on the given contract,
	/// with all-permissions call flags.
	pub fn contract_call(
		&mut self,
		contract: &H160,
		method: &str,
		params: &[ContractParameter],
	) -> Result<&mut Self, BuilderError> {
		if method.is_empty() {
			return Err(BuilderError::IllegalArgument("the method must not be empty".to_string()))
		}
		self.push_array(params)?;
		self.push_integer(&BigInt::from(CALL_FLAGS_ALL))?;
		self.push_data(method.as_bytes().to_vec());
		self.push_data(contract.to_le_vec());
		Ok(self.sys_call(InteropService::SystemContractCall))
	}

	/// Builds the single-signature verification script for a public key:
	/// `PUSHDATA1 33 <key> SYSCALL System.Crypto.CheckSig`.
	pub fn build_verification_script(public_key_encoded: &[u8]) -> Vec<u8> {
		let mut builder = ScriptBuilder::new();
		builder
			.push_data(public_key_encoded.to_vec())
			.sys_call(InteropService::SystemCryptoCheckSig);
		builder.to_bytes()
	}

	/// Builds the m-of-n multi-signature verification script:
	/// `PUSH(m) <keys sorted ascending> PUSH(n) SYSCALL CheckMultisig`.
	pub fn build_multi_sig_script(
		public_keys_encoded: &mut [Vec<u8>],
		threshold: u8,
	) -> Result<Vec<u8>, BuilderError> {
		let n = public_keys_encoded.len();
		if n == 0 || n > NeoConstants::MAX_PUBLIC_KEYS_PER_MULTI_SIG as usize {
			return Err(BuilderError::IllegalArgument(format!(
				"a multi-sig script takes 1 to {} keys, got {}",
				NeoConstants::MAX_PUBLIC_KEYS_PER_MULTI_SIG,
				n
			)))
		}
		if threshold as usize > n || threshold == 0 {
			return Err(BuilderError::IllegalArgument(format!(
				"threshold {} out of range for {} keys",
				threshold, n
			)))
		}

		public_keys_encoded.sort();

		let mut builder = ScriptBuilder::new();
		builder.push_integer(&BigInt::from(threshold))?;
		for key in public_keys_encoded.iter() {
			builder.push_data(key.clone());
		}
		builder.push_integer(&BigInt::from(n))?;
		builder.sys_call(InteropService::SystemCryptoCheckMultisig);
		Ok(builder.to_bytes())
	}

	pub fn len(&self) -> usize {
		self.script.size()
	}

	pub fn is_empty(&self) -> bool {
		self.script.size() == 0
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		self.script.to_bytes()
	}
}

// System.Contract.Call flags: 0x0F grants all permissions
const CALL_FLAGS_ALL: u8 = 0x0F;

fn sign_extend(bytes: &[u8], size: usize, negative: bool) -> Vec<u8> {
	let mut padded = vec![if negative { 0xFF } else { 0x00 }; size];
	padded[..bytes.len()].copy_from_slice(bytes);
	padded
}

#[cfg(test)]
mod tests {
	use super::*;

	fn script_of(f: impl FnOnce(&mut ScriptBuilder)) -> String {
		let mut builder = ScriptBuilder::new();
		f(&mut builder);
		hex::encode(builder.to_bytes())
	}

	#[test]
	fn test_push_small_integers() {
		assert_eq!(script_of(|b| { b.push_integer(&BigInt::from(-1)).unwrap(); }), "0f");
		assert_eq!(script_of(|b| { b.push_integer(&BigInt::from(0)).unwrap(); }), "10");
		assert_eq!(script_of(|b| { b.push_integer(&BigInt::from(16)).unwrap(); }), "20");
	}

	#[test]
	fn test_push_wide_integers() {
		assert_eq!(script_of(|b| { b.push_integer(&BigInt::from(17)).unwrap(); }), "0011");
		assert_eq!(script_of(|b| { b.push_integer(&BigInt::from(256)).unwrap(); }), "010001");
		// 0x1_0000 needs 3 LE bytes, padded to 4 for PUSHINT32
		assert_eq!(
			script_of(|b| { b.push_integer(&BigInt::from(0x1_0000)).unwrap(); }),
			"0200000100"
		);
		// negative values sign-extend with 0xff
		assert_eq!(
			script_of(|b| { b.push_integer(&BigInt::from(-0x1_0000i64)).unwrap(); }),
			"020000ffff"
		);
	}

	#[test]
	fn test_push_integer_rejects_oversized_values() {
		let too_big = BigInt::from(1) << 263;
		assert!(ScriptBuilder::new().push_integer(&too_big).is_err());
	}

	#[test]
	fn test_push_data_prefixes() {
		assert_eq!(script_of(|b| { b.push_data(vec![0xAA]); }), "0c01aa");

		let mid = vec![0x01u8; 256];
		let encoded = script_of(|b| {
			b.push_data(mid.clone());
		});
		assert!(encoded.starts_with("0d0001"));

		let large = vec![0x01u8; 65_536];
		let encoded = script_of(|b| {
			b.push_data(large.clone());
		});
		assert!(encoded.starts_with("0e00000100"));
	}

	#[test]
	fn test_verification_script_template() {
		let key =
			hex::decode("035fdb1d1f06759547020891ae97c729327853aeb1256b6fe0473bc2e9fa42ff50")
				.unwrap();
		let script = ScriptBuilder::build_verification_script(&key);

		let expected = format!(
			"0c21{}41{}",
			hex::encode(&key),
			InteropService::SystemCryptoCheckSig.hash()
		);
		assert_eq!(hex::encode(script), expected);
	}

	#[test]
	fn test_multi_sig_script_sorts_keys() {
		let key1 =
			hex::decode("035fdb1d1f06759547020891ae97c729327853aeb1256b6fe0473bc2e9fa42ff50")
				.unwrap();
		let key2 =
			hex::decode("03eda286d19f7ee0b472afd1163d803d620a961e1581a8f2704b52c0285f6e022d")
				.unwrap();
		let key3 =
			hex::decode("03ac81ec17f2f15fd6d193182f927c5971559c2a32b9408a06fec9e711fb7ca02e")
				.unwrap();

		let mut keys = vec![key1.clone(), key2.clone(), key3.clone()];
		let script = ScriptBuilder::build_multi_sig_script(&mut keys, 2).unwrap();

		// keys appear in ascending order: key1, key3, key2
		let expected = format!(
			"120c21{}0c21{}0c21{}1341{}",
			hex::encode(&key1),
			hex::encode(&key3),
			hex::encode(&key2),
			InteropService::SystemCryptoCheckMultisig.hash()
		);
		assert_eq!(hex::encode(script), expected);
	}

	#[test]
	fn test_multi_sig_script_threshold_bounds() {
		let mut keys = vec![vec![0x02; 33]];
		assert!(ScriptBuilder::build_multi_sig_script(&mut keys, 0).is_err());
		assert!(ScriptBuilder::build_multi_sig_script(&mut keys, 2).is_err());

		let mut no_keys: Vec<Vec<u8>> = Vec::new();
		assert!(ScriptBuilder::build_multi_sig_script(&mut no_keys, 1).is_err());
	}

	#[test]
	fn test_contract_call() {
		let contract = H160::from_hex("d2a4cff31913016155e38e474a2c06d08be276cf").unwrap();
		let mut builder = ScriptBuilder::new();
		builder
			.contract_call(&contract, "balanceOf", &[ContractParameter::from("probe")])
			.unwrap();

		let script = hex::encode(builder.to_bytes());
		assert!(script.contains(&InteropService::SystemContractCall.hash()));
		assert!(script.contains(&hex::encode("balanceOf")));
	}

	#[test]
	fn test_push_empty_array() {
		assert_eq!(script_of(|b| { b.push_array(&[]).unwrap(); }), "c2");
	}

	#[test]
	fn test_push_map() {
		let entries =
			vec![(ContractParameter::from(1i64), ContractParameter::Boolean(true))];
		let script = script_of(|b| {
			b.push_map(&entries).unwrap();
		});
		// value, key, count, PACKMAP
		assert_eq!(script, "081111be");
	}
}
