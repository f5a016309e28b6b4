use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use primitive_types::{H160, H256};
use serde::{
	de::Error as DeError, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use crate::{
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable},
	neo_crypto::Secp256r1PublicKey,
	neo_types::{Address, ScriptHashExtension, TypeError},
};

/// A value on the Neo VM evaluation stack, as surfaced by invocation
/// results.
///
/// The JSON wire form is `{"type": "<tag>", "value": ...}` with integers as
/// decimal strings (values may exceed 64 bits) and byte payloads as base64.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum StackItem {
	Any,
	Pointer(i64),
	Boolean(bool),
	Integer(BigInt),
	ByteString(Vec<u8>),
	Buffer(Vec<u8>),
	Array(Vec<StackItem>),
	Struct(Vec<StackItem>),
	Map(Vec<MapEntry>),
	InteropInterface { id: String, interface: String },
}

/// One key-value pair of a [`StackItem::Map`]. Insertion order is
/// preserved.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct MapEntry {
	pub key: StackItem,
	pub value: StackItem,
}

impl StackItem {
	pub const ANY_BYTE: u8 = 0x00;
	pub const POINTER_BYTE: u8 = 0x10;
	pub const BOOLEAN_BYTE: u8 = 0x20;
	pub const INTEGER_BYTE: u8 = 0x21;
	pub const BYTE_STRING_BYTE: u8 = 0x28;
	pub const BUFFER_BYTE: u8 = 0x30;
	pub const ARRAY_BYTE: u8 = 0x40;
	pub const STRUCT_BYTE: u8 = 0x41;
	pub const MAP_BYTE: u8 = 0x48;
	pub const INTEROP_INTERFACE_BYTE: u8 = 0x60;

	/// The stable JSON tag of this variant.
	pub fn json_value(&self) -> &'static str {
		match self {
			StackItem::Any => "Any",
			StackItem::Pointer(_) => "Pointer",
			StackItem::Boolean(_) => "Boolean",
			StackItem::Integer(_) => "Integer",
			StackItem::ByteString(_) => "ByteString",
			StackItem::Buffer(_) => "Buffer",
			StackItem::Array(_) => "Array",
			StackItem::Struct(_) => "Struct",
			StackItem::Map(_) => "Map",
			StackItem::InteropInterface { .. } => "InteropInterface",
		}
	}

	/// The VM type byte of this variant.
	pub fn type_byte(&self) -> u8 {
		match self {
			StackItem::Any => Self::ANY_BYTE,
			StackItem::Pointer(_) => Self::POINTER_BYTE,
			StackItem::Boolean(_) => Self::BOOLEAN_BYTE,
			StackItem::Integer(_) => Self::INTEGER_BYTE,
			StackItem::ByteString(_) => Self::BYTE_STRING_BYTE,
			StackItem::Buffer(_) => Self::BUFFER_BYTE,
			StackItem::Array(_) => Self::ARRAY_BYTE,
			StackItem::Struct(_) => Self::STRUCT_BYTE,
			StackItem::Map(_) => Self::MAP_BYTE,
			StackItem::InteropInterface { .. } => Self::INTEROP_INTERFACE_BYTE,
		}
	}

	/// Truthifies the item: booleans directly, integers against zero, byte
	/// payloads and collections against emptiness. Pointers and interop
	/// interfaces do not convert.
	pub fn as_bool(&self) -> Result<bool, TypeError> {
		match self {
			StackItem::Boolean(value) => Ok(*value),
			StackItem::Integer(value) => Ok(*value != BigInt::from(0)),
			StackItem::ByteString(bytes) | StackItem::Buffer(bytes) => Ok(!bytes.is_empty()),
			StackItem::Array(items) | StackItem::Struct(items) => Ok(!items.is_empty()),
			StackItem::Map(entries) => Ok(!entries.is_empty()),
			StackItem::Any => Ok(false),
			other => Err(TypeError::NotConvertible(format!(
				"{} cannot convert to a boolean",
				other.json_value()
			))),
		}
	}

	/// Converts to an arbitrary-precision integer. Byte payloads are read as
	/// little-endian signed magnitudes of at most 32 bytes.
	pub fn as_int(&self) -> Result<BigInt, TypeError> {
		match self {
			StackItem::Integer(value) => Ok(value.clone()),
			StackItem::Boolean(value) => Ok(BigInt::from(i8::from(*value))),
			StackItem::ByteString(bytes) | StackItem::Buffer(bytes) => {
				if bytes.len() > 32 {
					return Err(TypeError::NotConvertible(format!(
						"{} byte payload exceeds the 32 byte integer range",
						bytes.len()
					)))
				}
				Ok(BigInt::from_signed_bytes_le(bytes))
			},
			other => Err(TypeError::NotConvertible(format!(
				"{} cannot convert to an integer",
				other.json_value()
			))),
		}
	}

	/// Like [`StackItem::as_int`], narrowed to `i64`.
	pub fn as_i64(&self) -> Result<i64, TypeError> {
		self.as_int()?.to_i64().ok_or_else(|| {
			TypeError::NotConvertible("integer does not fit into 64 bits".to_string())
		})
	}

	pub fn as_bytes(&self) -> Result<Vec<u8>, TypeError> {
		match self {
			StackItem::ByteString(bytes) | StackItem::Buffer(bytes) => Ok(bytes.clone()),
			StackItem::Integer(value) => Ok(value.to_signed_bytes_le()),
			other => Err(TypeError::NotConvertible(format!(
				"{} cannot convert to bytes",
				other.json_value()
			))),
		}
	}

	pub fn as_string(&self) -> Result<String, TypeError> {
		match self {
			StackItem::ByteString(bytes) | StackItem::Buffer(bytes) =>
				String::from_utf8(bytes.clone()).map_err(|_| {
					TypeError::NotConvertible("byte payload is not valid UTF-8".to_string())
				}),
			StackItem::Integer(value) => Ok(value.to_string()),
			StackItem::Boolean(value) => Ok(value.to_string()),
			other => Err(TypeError::NotConvertible(format!(
				"{} cannot convert to a string",
				other.json_value()
			))),
		}
	}

	/// Reads a 20-byte payload as a little-endian script hash and renders it
	/// as an address under the configured version byte.
	pub fn as_address(&self) -> Result<Address, TypeError> {
		Ok(self.as_hash160()?.to_address())
	}

	pub fn as_hash160(&self) -> Result<H160, TypeError> {
		let mut bytes = self.as_bytes()?;
		if bytes.len() != 20 {
			return Err(TypeError::NotConvertible(format!(
				"expected 20 bytes, got {}",
				bytes.len()
			)))
		}
		bytes.reverse();
		Ok(H160::from_slice(&bytes))
	}

	pub fn as_hash256(&self) -> Result<H256, TypeError> {
		let mut bytes = self.as_bytes()?;
		if bytes.len() != 32 {
			return Err(TypeError::NotConvertible(format!(
				"expected 32 bytes, got {}",
				bytes.len()
			)))
		}
		bytes.reverse();
		Ok(H256::from_slice(&bytes))
	}

	pub fn as_public_key(&self) -> Result<Secp256r1PublicKey, TypeError> {
		let bytes = self.as_bytes()?;
		Secp256r1PublicKey::from_bytes(&bytes)
			.map_err(|_| TypeError::NotConvertible("payload is not an EC point".to_string()))
	}

	pub fn as_array(&self) -> Result<&[StackItem], TypeError> {
		match self {
			StackItem::Array(items) | StackItem::Struct(items) => Ok(items),
			other => Err(TypeError::NotConvertible(format!(
				"{} cannot convert to an array",
				other.json_value()
			))),
		}
	}

	pub fn as_map(&self) -> Result<&[MapEntry], TypeError> {
		match self {
			StackItem::Map(entries) => Ok(entries),
			other => Err(TypeError::NotConvertible(format!(
				"{} cannot convert to a map",
				other.json_value()
			))),
		}
	}

	pub fn len(&self) -> Option<usize> {
		match self {
			StackItem::Array(items) | StackItem::Struct(items) => Some(items.len()),
			StackItem::Map(entries) => Some(entries.len()),
			_ => None,
		}
	}

	pub fn is_empty(&self) -> Option<bool> {
		self.len().map(|len| len == 0)
	}

	pub fn get(&self, index: usize) -> Option<&StackItem> {
		self.as_array().ok()?.get(index)
	}
}

impl Serialize for StackItem {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			StackItem::InteropInterface { id, interface } => {
				let mut state = serializer.serialize_struct("StackItem", 3)?;
				state.serialize_field("type", self.json_value())?;
				state.serialize_field("interface", interface)?;
				state.serialize_field("id", id)?;
				state.end()
			},
			other => {
				let mut state = serializer.serialize_struct("StackItem", 2)?;
				state.serialize_field("type", other.json_value())?;
				match other {
					StackItem::Any => state.serialize_field("value", &Value::Null)?,
					StackItem::Pointer(value) => state.serialize_field("value", value)?,
					StackItem::Boolean(value) => state.serialize_field("value", value)?,
					StackItem::Integer(value) =>
						state.serialize_field("value", &value.to_string())?,
					StackItem::ByteString(bytes) | StackItem::Buffer(bytes) =>
						state.serialize_field("value", &BASE64.encode(bytes))?,
					StackItem::Array(items) | StackItem::Struct(items) =>
						state.serialize_field("value", items)?,
					StackItem::Map(entries) => state.serialize_field("value", entries)?,
					StackItem::InteropInterface { .. } => unreachable!(),
				}
				state.end()
			},
		}
	}
}

impl Serialize for MapEntry {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("MapEntry", 2)?;
		state.serialize_field("key", &self.key)?;
		state.serialize_field("value", &self.value)?;
		state.end()
	}
}

impl<'de> Deserialize<'de> for StackItem {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let json = Value::deserialize(deserializer)?;
		stack_item_from_json(&json).map_err(DeError::custom)
	}
}

impl<'de> Deserialize<'de> for MapEntry {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let json = Value::deserialize(deserializer)?;
		map_entry_from_json(&json).map_err(DeError::custom)
	}
}

fn stack_item_from_json(json: &Value) -> Result<StackItem, String> {
	let tag = json
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| "stack item without a type tag".to_string())?;
	let value = json.get("value");

	match tag {
		"Any" => Ok(StackItem::Any),
		"Pointer" => {
			let pointer = match value {
				Some(Value::Number(n)) => n
					.as_i64()
					.ok_or_else(|| "pointer out of the i64 range".to_string())?,
				Some(Value::String(s)) =>
					s.parse().map_err(|_| format!("invalid pointer '{}'", s))?,
				_ => return Err("pointer without a value".to_string()),
			};
			Ok(StackItem::Pointer(pointer))
		},
		"Boolean" => match value {
			Some(Value::Bool(b)) => Ok(StackItem::Boolean(*b)),
			Some(Value::String(s)) => Ok(StackItem::Boolean(s == "true")),
			_ => Err("boolean without a value".to_string()),
		},
		"Integer" => {
			let integer = match value {
				Some(Value::Number(n)) => BigInt::from(
					n.as_i64().ok_or_else(|| "integer out of the i64 range".to_string())?,
				),
				Some(Value::String(s)) =>
					s.parse().map_err(|_| format!("invalid integer '{}'", s))?,
				_ => return Err("integer without a value".to_string()),
			};
			Ok(StackItem::Integer(integer))
		},
		"ByteString" | "Buffer" => {
			let encoded = value
				.and_then(Value::as_str)
				.ok_or_else(|| format!("{} without a value", tag))?;
			let bytes =
				BASE64.decode(encoded).map_err(|_| format!("invalid base64 '{}'", encoded))?;
			Ok(if tag == "ByteString" {
				StackItem::ByteString(bytes)
			} else {
				StackItem::Buffer(bytes)
			})
		},
		"Array" | "Struct" => {
			let raw = value
				.and_then(Value::as_array)
				.ok_or_else(|| format!("{} without a value list", tag))?;
			let items: Result<Vec<_>, _> = raw.iter().map(stack_item_from_json).collect();
			let items = items?;
			Ok(if tag == "Array" { StackItem::Array(items) } else { StackItem::Struct(items) })
		},
		"Map" => {
			let raw = value
				.and_then(Value::as_array)
				.ok_or_else(|| "map without a value list".to_string())?;
			let entries: Result<Vec<_>, _> = raw.iter().map(map_entry_from_json).collect();
			Ok(StackItem::Map(entries?))
		},
		"InteropInterface" => {
			let id = json
				.get("id")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string();
			let interface = json
				.get("interface")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string();
			Ok(StackItem::InteropInterface { id, interface })
		},
		other => Err(format!("unknown stack item type '{}'", other)),
	}
}

fn map_entry_from_json(json: &Value) -> Result<MapEntry, String> {
	let key = json.get("key").ok_or_else(|| "map entry without a key".to_string())?;
	let value = json.get("value").ok_or_else(|| "map entry without a value".to_string())?;
	Ok(MapEntry { key: stack_item_from_json(key)?, value: stack_item_from_json(value)? })
}

impl NeoSerializable for StackItem {
	type Error = CodecError;

	fn size(&self) -> usize {
		self.to_array().len()
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.type_byte());
		match self {
			StackItem::Any => {},
			StackItem::Pointer(value) => writer.write_i64(*value),
			StackItem::Boolean(value) => writer.write_bool(*value),
			StackItem::Integer(value) => writer.write_var_bytes(&value.to_signed_bytes_le()),
			StackItem::ByteString(bytes) | StackItem::Buffer(bytes) =>
				writer.write_var_bytes(bytes),
			StackItem::Array(items) | StackItem::Struct(items) => {
				writer.write_var_int(items.len() as u64);
				for item in items {
					item.encode(writer);
				}
			},
			StackItem::Map(entries) => {
				writer.write_var_int(entries.len() as u64);
				for entry in entries {
					entry.key.encode(writer);
					entry.value.encode(writer);
				}
			},
			StackItem::InteropInterface { id, interface } => {
				writer.write_var_string(id);
				writer.write_var_string(interface);
			},
		}
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let tag = reader.read_u8()?;
		match tag {
			Self::ANY_BYTE => Ok(StackItem::Any),
			Self::POINTER_BYTE => Ok(StackItem::Pointer(reader.read_i64()?)),
			Self::BOOLEAN_BYTE => Ok(StackItem::Boolean(reader.read_bool()?)),
			Self::INTEGER_BYTE => {
				let bytes = reader.read_var_bytes()?;
				Ok(StackItem::Integer(BigInt::from_signed_bytes_le(&bytes)))
			},
			Self::BYTE_STRING_BYTE => Ok(StackItem::ByteString(reader.read_var_bytes()?)),
			Self::BUFFER_BYTE => Ok(StackItem::Buffer(reader.read_var_bytes()?)),
			Self::ARRAY_BYTE | Self::STRUCT_BYTE => {
				let len = reader.read_var_int()?;
				let mut items = Vec::with_capacity(len as usize);
				for _ in 0..len {
					items.push(StackItem::decode(reader)?);
				}
				Ok(if tag == Self::ARRAY_BYTE {
					StackItem::Array(items)
				} else {
					StackItem::Struct(items)
				})
			},
			Self::MAP_BYTE => {
				let len = reader.read_var_int()?;
				let mut entries = Vec::with_capacity(len as usize);
				for _ in 0..len {
					let key = StackItem::decode(reader)?;
					let value = StackItem::decode(reader)?;
					entries.push(MapEntry { key, value });
				}
				Ok(StackItem::Map(entries))
			},
			Self::INTEROP_INTERFACE_BYTE => {
				let id = reader.read_var_string()?;
				let interface = reader.read_var_string()?;
				Ok(StackItem::InteropInterface { id, interface })
			},
			other =>
				Err(CodecError::InvalidFormat(format!("unknown stack item tag 0x{:02x}", other))),
		}
	}
}

impl From<bool> for StackItem {
	fn from(value: bool) -> Self {
		StackItem::Boolean(value)
	}
}

impl From<i64> for StackItem {
	fn from(value: i64) -> Self {
		StackItem::Integer(BigInt::from(value))
	}
}

impl From<BigInt> for StackItem {
	fn from(value: BigInt) -> Self {
		StackItem::Integer(value)
	}
}

impl From<&str> for StackItem {
	fn from(value: &str) -> Self {
		StackItem::ByteString(value.as_bytes().to_vec())
	}
}

impl From<Vec<u8>> for StackItem {
	fn from(value: Vec<u8>) -> Self {
		StackItem::ByteString(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_tags_and_type_bytes() {
		let cases: Vec<(StackItem, &str, u8)> = vec![
			(StackItem::Any, "Any", 0x00),
			(StackItem::Pointer(1), "Pointer", 0x10),
			(StackItem::Boolean(true), "Boolean", 0x20),
			(StackItem::Integer(BigInt::from(1)), "Integer", 0x21),
			(StackItem::ByteString(vec![]), "ByteString", 0x28),
			(StackItem::Buffer(vec![]), "Buffer", 0x30),
			(StackItem::Array(vec![]), "Array", 0x40),
			(StackItem::Struct(vec![]), "Struct", 0x41),
			(StackItem::Map(vec![]), "Map", 0x48),
			(
				StackItem::InteropInterface { id: "1".into(), interface: "IIterator".into() },
				"InteropInterface",
				0x60,
			),
		];
		for (item, tag, byte) in cases {
			assert_eq!(item.json_value(), tag);
			assert_eq!(item.type_byte(), byte);
		}
	}

	#[test]
	fn test_integer_rides_json_as_decimal_string() {
		// 2^129, way past the i64 range
		let big: BigInt = BigInt::from(1) << 129;
		let item = StackItem::Integer(big.clone());
		let json = serde_json::to_value(&item).unwrap();
		assert_eq!(json["type"], "Integer");
		assert_eq!(json["value"], big.to_string());

		let back: StackItem = serde_json::from_value(json).unwrap();
		assert_eq!(back, item);
	}

	#[test]
	fn test_byte_string_rides_json_as_base64() {
		let item = StackItem::ByteString(b"Hello, World!".to_vec());
		let json = serde_json::to_value(&item).unwrap();
		assert_eq!(json["value"], "SGVsbG8sIFdvcmxkIQ==");

		let back: StackItem = serde_json::from_value(json).unwrap();
		assert_eq!(back, item);
	}

	#[test]
	fn test_deserialize_nested_structures() {
		let json = r#"{
			"type": "Map",
			"value": [
				{
					"key": {"type": "ByteString", "value": "bmFtZQ=="},
					"value": {"type": "Integer", "value": "42"}
				}
			]
		}"#;
		let item: StackItem = serde_json::from_str(json).unwrap();
		let entries = item.as_map().unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].key.as_string().unwrap(), "name");
		assert_eq!(entries[0].value.as_int().unwrap(), BigInt::from(42));
	}

	#[test]
	fn test_as_bool_conversions() {
		assert!(StackItem::Boolean(true).as_bool().unwrap());
		assert!(StackItem::Integer(BigInt::from(-5)).as_bool().unwrap());
		assert!(!StackItem::Integer(BigInt::from(0)).as_bool().unwrap());
		assert!(!StackItem::ByteString(vec![]).as_bool().unwrap());
		assert!(StackItem::Buffer(vec![1]).as_bool().unwrap());
		assert!(!StackItem::Array(vec![]).as_bool().unwrap());
		assert!(StackItem::Pointer(0).as_bool().is_err());
		assert!(StackItem::InteropInterface { id: String::new(), interface: String::new() }
			.as_bool()
			.is_err());
	}

	#[test]
	fn test_as_int_conversions() {
		assert_eq!(StackItem::Boolean(true).as_int().unwrap(), BigInt::from(1));
		assert_eq!(StackItem::Boolean(false).as_int().unwrap(), BigInt::from(0));
		// 0xFF, 0x00 little-endian signed = 255
		assert_eq!(
			StackItem::ByteString(vec![0xFF, 0x00]).as_int().unwrap(),
			BigInt::from(255)
		);
		assert!(StackItem::ByteString(vec![0u8; 33]).as_int().is_err());
		assert!(StackItem::Array(vec![]).as_int().is_err());
	}

	#[test]
	fn test_as_address_reverses_the_payload() {
		let le_bytes = hex::decode("09a55874c2da4b86e5d49ff530a1b153eb12c7d6").unwrap();
		let item = StackItem::ByteString(le_bytes);
		assert_eq!(item.as_address().unwrap(), "NLnyLtep7jwyq1qhNPkwXbJpurC4jUT8ke");
	}

	#[test]
	fn test_binary_roundtrip() {
		let item = StackItem::Array(vec![
			StackItem::Integer(BigInt::from(123456789)),
			StackItem::Boolean(true),
			StackItem::Map(vec![MapEntry {
				key: StackItem::from("k"),
				value: StackItem::Buffer(vec![1, 2, 3]),
			}]),
			StackItem::Any,
		]);

		let bytes = item.to_array();
		let decoded = StackItem::decode(&mut Decoder::new(&bytes)).unwrap();
		assert_eq!(decoded, item);
	}

	#[test]
	fn test_decode_rejects_unknown_tag() {
		assert!(StackItem::decode(&mut Decoder::new(&[0x77])).is_err());
	}
}
