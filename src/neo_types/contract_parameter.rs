use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use num_bigint::BigInt;
use primitive_types::{H160, H256};
use serde::{
	de::Error as DeError, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use crate::{
	neo_config::NeoConstants,
	neo_types::{Hash256Extension, ScriptHashExtension, TypeError},
};

/// The declared type of a contract parameter, as it appears in manifests,
/// NEP-6 contracts and invocation requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractParameterType {
	Any,
	Boolean,
	Integer,
	ByteArray,
	String,
	Hash160,
	Hash256,
	PublicKey,
	Signature,
	Array,
	Map,
	InteropInterface,
	Void,
}

/// An argument for a contract invocation.
///
/// JSON wire shape is `{"type": "<tag>", "value": ...}`: integers as decimal
/// strings, byte arrays and signatures as base64, hashes as 0x-prefixed
/// big-endian hex, public keys as hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContractParameter {
	Any,
	Boolean(bool),
	Integer(BigInt),
	ByteArray(Vec<u8>),
	String(String),
	Hash160(H160),
	Hash256(H256),
	PublicKey(Vec<u8>),
	Signature(Vec<u8>),
	Array(Vec<ContractParameter>),
	Map(Vec<(ContractParameter, ContractParameter)>),
	InteropInterface(String),
	Void,
}

impl ContractParameter {
	/// Builds a `PublicKey` parameter, insisting on the 33-byte compressed
	/// encoding.
	pub fn public_key(bytes: &[u8]) -> Result<Self, TypeError> {
		if bytes.len() != NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED {
			return Err(TypeError::InvalidArgument(format!(
				"a public key parameter must hold {} bytes, got {}",
				NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED,
				bytes.len()
			)))
		}
		Ok(Self::PublicKey(bytes.to_vec()))
	}

	/// Builds a `Signature` parameter, insisting on the 64-byte compact
	/// encoding.
	pub fn signature(bytes: &[u8]) -> Result<Self, TypeError> {
		if bytes.len() != NeoConstants::SIGNATURE_SIZE {
			return Err(TypeError::InvalidArgument(format!(
				"a signature parameter must hold {} bytes, got {}",
				NeoConstants::SIGNATURE_SIZE,
				bytes.len()
			)))
		}
		Ok(Self::Signature(bytes.to_vec()))
	}

	pub fn param_type(&self) -> ContractParameterType {
		match self {
			ContractParameter::Any => ContractParameterType::Any,
			ContractParameter::Boolean(_) => ContractParameterType::Boolean,
			ContractParameter::Integer(_) => ContractParameterType::Integer,
			ContractParameter::ByteArray(_) => ContractParameterType::ByteArray,
			ContractParameter::String(_) => ContractParameterType::String,
			ContractParameter::Hash160(_) => ContractParameterType::Hash160,
			ContractParameter::Hash256(_) => ContractParameterType::Hash256,
			ContractParameter::PublicKey(_) => ContractParameterType::PublicKey,
			ContractParameter::Signature(_) => ContractParameterType::Signature,
			ContractParameter::Array(_) => ContractParameterType::Array,
			ContractParameter::Map(_) => ContractParameterType::Map,
			ContractParameter::InteropInterface(_) => ContractParameterType::InteropInterface,
			ContractParameter::Void => ContractParameterType::Void,
		}
	}

	fn json_tag(&self) -> &'static str {
		match self.param_type() {
			ContractParameterType::Any => "Any",
			ContractParameterType::Boolean => "Boolean",
			ContractParameterType::Integer => "Integer",
			ContractParameterType::ByteArray => "ByteArray",
			ContractParameterType::String => "String",
			ContractParameterType::Hash160 => "Hash160",
			ContractParameterType::Hash256 => "Hash256",
			ContractParameterType::PublicKey => "PublicKey",
			ContractParameterType::Signature => "Signature",
			ContractParameterType::Array => "Array",
			ContractParameterType::Map => "Map",
			ContractParameterType::InteropInterface => "InteropInterface",
			ContractParameterType::Void => "Void",
		}
	}
}

impl Serialize for ContractParameter {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("ContractParameter", 2)?;
		state.serialize_field("type", self.json_tag())?;
		match self {
			ContractParameter::Any | ContractParameter::Void =>
				state.serialize_field("value", &Value::Null)?,
			ContractParameter::Boolean(value) => state.serialize_field("value", value)?,
			ContractParameter::Integer(value) =>
				state.serialize_field("value", &value.to_string())?,
			ContractParameter::ByteArray(bytes) | ContractParameter::Signature(bytes) =>
				state.serialize_field("value", &BASE64.encode(bytes))?,
			ContractParameter::String(value) => state.serialize_field("value", value)?,
			ContractParameter::Hash160(hash) =>
				state.serialize_field("value", &format!("0x{}", hash.to_hex()))?,
			ContractParameter::Hash256(hash) =>
				state.serialize_field("value", &format!("0x{}", hash.to_hex()))?,
			ContractParameter::PublicKey(bytes) =>
				state.serialize_field("value", &hex::encode(bytes))?,
			ContractParameter::Array(items) => state.serialize_field("value", items)?,
			ContractParameter::Map(entries) => {
				let entries: Vec<Value> = entries
					.iter()
					.map(|(key, value)| {
						serde_json::json!({
							"key": serde_json::to_value(key).unwrap_or(Value::Null),
							"value": serde_json::to_value(value).unwrap_or(Value::Null),
						})
					})
					.collect();
				state.serialize_field("value", &entries)?
			},
			ContractParameter::InteropInterface(value) =>
				state.serialize_field("value", value)?,
		}
		state.end()
	}
}

impl<'de> Deserialize<'de> for ContractParameter {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let json = Value::deserialize(deserializer)?;
		parameter_from_json(&json).map_err(DeError::custom)
	}
}

fn parameter_from_json(json: &Value) -> Result<ContractParameter, String> {
	let tag = json
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| "contract parameter without a type tag".to_string())?;
	let value = json.get("value");

	match tag {
		"Any" => Ok(ContractParameter::Any),
		"Void" => Ok(ContractParameter::Void),
		"Boolean" => match value {
			Some(Value::Bool(b)) => Ok(ContractParameter::Boolean(*b)),
			Some(Value::String(s)) => Ok(ContractParameter::Boolean(s == "true")),
			_ => Err("boolean parameter without a value".to_string()),
		},
		"Integer" => {
			let integer = match value {
				Some(Value::Number(n)) => BigInt::from(
					n.as_i64().ok_or_else(|| "integer out of the i64 range".to_string())?,
				),
				Some(Value::String(s)) =>
					s.parse().map_err(|_| format!("invalid integer '{}'", s))?,
				_ => return Err("integer parameter without a value".to_string()),
			};
			Ok(ContractParameter::Integer(integer))
		},
		"ByteArray" | "Signature" => {
			let encoded = value
				.and_then(Value::as_str)
				.ok_or_else(|| format!("{} parameter without a value", tag))?;
			let bytes =
				BASE64.decode(encoded).map_err(|_| format!("invalid base64 '{}'", encoded))?;
			if tag == "Signature" {
				ContractParameter::signature(&bytes).map_err(|e| e.to_string())
			} else {
				Ok(ContractParameter::ByteArray(bytes))
			}
		},
		"String" => {
			let text = value
				.and_then(Value::as_str)
				.ok_or_else(|| "string parameter without a value".to_string())?;
			Ok(ContractParameter::String(text.to_string()))
		},
		"Hash160" => {
			let text = value
				.and_then(Value::as_str)
				.ok_or_else(|| "hash160 parameter without a value".to_string())?;
			H160::from_hex(text).map(ContractParameter::Hash160).map_err(|e| e.to_string())
		},
		"Hash256" => {
			let text = value
				.and_then(Value::as_str)
				.ok_or_else(|| "hash256 parameter without a value".to_string())?;
			H256::from_hex(text).map(ContractParameter::Hash256).map_err(|e| e.to_string())
		},
		"PublicKey" => {
			let text = value
				.and_then(Value::as_str)
				.ok_or_else(|| "public key parameter without a value".to_string())?;
			let bytes = hex::decode(text).map_err(|_| format!("invalid hex '{}'", text))?;
			ContractParameter::public_key(&bytes).map_err(|e| e.to_string())
		},
		"Array" => {
			let raw = value
				.and_then(Value::as_array)
				.ok_or_else(|| "array parameter without a value list".to_string())?;
			let items: Result<Vec<_>, _> = raw.iter().map(parameter_from_json).collect();
			Ok(ContractParameter::Array(items?))
		},
		"Map" => {
			let raw = value
				.and_then(Value::as_array)
				.ok_or_else(|| "map parameter without a value list".to_string())?;
			let entries: Result<Vec<_>, String> = raw
				.iter()
				.map(|entry| {
					let key = entry
						.get("key")
						.ok_or_else(|| "map entry without a key".to_string())?;
					let value = entry
						.get("value")
						.ok_or_else(|| "map entry without a value".to_string())?;
					Ok((parameter_from_json(key)?, parameter_from_json(value)?))
				})
				.collect();
			Ok(ContractParameter::Map(entries?))
		},
		"InteropInterface" => {
			let text = value.and_then(Value::as_str).unwrap_or_default();
			Ok(ContractParameter::InteropInterface(text.to_string()))
		},
		other => Err(format!("unknown contract parameter type '{}'", other)),
	}
}

impl From<bool> for ContractParameter {
	fn from(value: bool) -> Self {
		ContractParameter::Boolean(value)
	}
}

impl From<i64> for ContractParameter {
	fn from(value: i64) -> Self {
		ContractParameter::Integer(BigInt::from(value))
	}
}

impl From<BigInt> for ContractParameter {
	fn from(value: BigInt) -> Self {
		ContractParameter::Integer(value)
	}
}

impl From<&str> for ContractParameter {
	fn from(value: &str) -> Self {
		ContractParameter::String(value.to_string())
	}
}

impl From<H160> for ContractParameter {
	fn from(value: H160) -> Self {
		ContractParameter::Hash160(value)
	}
}

impl From<&H160> for ContractParameter {
	fn from(value: &H160) -> Self {
		ContractParameter::Hash160(*value)
	}
}

impl From<H256> for ContractParameter {
	fn from(value: H256) -> Self {
		ContractParameter::Hash256(value)
	}
}

impl From<Vec<u8>> for ContractParameter {
	fn from(value: Vec<u8>) -> Self {
		ContractParameter::ByteArray(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_signature_length_is_enforced() {
		assert!(ContractParameter::signature(&[0u8; 64]).is_ok());
		assert!(ContractParameter::signature(&[0u8; 63]).is_err());
		assert!(ContractParameter::signature(&[0u8; 65]).is_err());
	}

	#[test]
	fn test_public_key_length_is_enforced() {
		assert!(ContractParameter::public_key(&[2u8; 33]).is_ok());
		assert!(ContractParameter::public_key(&[2u8; 32]).is_err());
		assert!(ContractParameter::public_key(&[4u8; 65]).is_err());
	}

	#[test]
	fn test_integer_json_shape() {
		let param = ContractParameter::Integer(BigInt::from(123));
		let json = serde_json::to_value(&param).unwrap();
		assert_eq!(json, serde_json::json!({"type": "Integer", "value": "123"}));

		let back: ContractParameter = serde_json::from_value(json).unwrap();
		assert_eq!(back, param);
	}

	#[test]
	fn test_byte_array_json_is_base64() {
		let param = ContractParameter::ByteArray(vec![1, 2, 3]);
		let json = serde_json::to_value(&param).unwrap();
		assert_eq!(json["value"], "AQID");
		assert_eq!(serde_json::from_value::<ContractParameter>(json).unwrap(), param);
	}

	#[test]
	fn test_hash160_json_is_prefixed_hex() {
		let hash = H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap();
		let param = ContractParameter::Hash160(hash);
		let json = serde_json::to_value(&param).unwrap();
		assert_eq!(json["value"], "0x23ba2703c53263e8d6e522dc32203339dcd8eee9");
		assert_eq!(serde_json::from_value::<ContractParameter>(json).unwrap(), param);
	}

	#[test]
	fn test_nested_array_and_map_roundtrip() {
		let param = ContractParameter::Array(vec![
			ContractParameter::from("first"),
			ContractParameter::Map(vec![(
				ContractParameter::from(1i64),
				ContractParameter::Boolean(true),
			)]),
			ContractParameter::Any,
		]);

		let json = serde_json::to_value(&param).unwrap();
		let back: ContractParameter = serde_json::from_value(json).unwrap();
		assert_eq!(back, param);
	}

	#[test]
	fn test_unknown_type_is_rejected() {
		let json = serde_json::json!({"type": "Tuple", "value": []});
		assert!(serde_json::from_value::<ContractParameter>(json).is_err());
	}

	#[test]
	fn test_parameter_type_names() {
		assert_eq!(
			serde_json::to_value(ContractParameterType::Signature).unwrap(),
			serde_json::json!("Signature")
		);
		assert_eq!(
			serde_json::from_value::<ContractParameterType>(serde_json::json!("Hash160"))
				.unwrap(),
			ContractParameterType::Hash160
		);
	}
}
