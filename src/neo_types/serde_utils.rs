//! Field-level (de)serializers for the JSON-RPC response records.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use primitive_types::{H160, H256};
use serde::{Deserialize, Deserializer, Serializer};

use crate::neo_types::{Hash256Extension, ScriptHashExtension};

pub fn serialize_h160<S>(hash: &H160, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&format!("0x{}", hash.to_hex()))
}

pub fn deserialize_h160<'de, D>(deserializer: D) -> Result<H160, D::Error>
where
	D: Deserializer<'de>,
{
	let text = String::deserialize(deserializer)?;
	H160::from_hex(&text).map_err(serde::de::Error::custom)
}

pub fn serialize_h256<S>(hash: &H256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&format!("0x{}", hash.to_hex()))
}

pub fn deserialize_h256<'de, D>(deserializer: D) -> Result<H256, D::Error>
where
	D: Deserializer<'de>,
{
	let text = String::deserialize(deserializer)?;
	H256::from_hex(&text).map_err(serde::de::Error::custom)
}

pub fn serialize_h256_option<S>(hash: &Option<H256>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match hash {
		Some(hash) => serialize_h256(hash, serializer),
		None => serializer.serialize_none(),
	}
}

pub fn deserialize_h256_option<'de, D>(deserializer: D) -> Result<Option<H256>, D::Error>
where
	D: Deserializer<'de>,
{
	let text = Option::<String>::deserialize(deserializer)?;
	match text {
		Some(text) => H256::from_hex(&text).map(Some).map_err(serde::de::Error::custom),
		None => Ok(None),
	}
}

pub fn serialize_base64<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&BASE64.encode(bytes))
}

pub fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
	D: Deserializer<'de>,
{
	let text = String::deserialize(deserializer)?;
	BASE64.decode(&text).map_err(serde::de::Error::custom)
}
