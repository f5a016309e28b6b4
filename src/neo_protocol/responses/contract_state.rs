use primitive_types::H160;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_types::{deserialize_h160, serialize_h160};

/// Result of `getcontractstate`. NEF and manifest stay untyped; the
/// contract object model is the concern of a higher layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractState {
	pub id: i32,
	#[serde(rename = "updatecounter", default)]
	pub update_counter: u32,
	#[serde(serialize_with = "serialize_h160", deserialize_with = "deserialize_h160")]
	pub hash: H160,
	pub nef: Value,
	pub manifest: Value,
}

/// One NEP-17 token contract, as listed by `expressgetnep17contracts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nep17Contract {
	#[serde(
		rename = "scriptHash",
		serialize_with = "serialize_h160",
		deserialize_with = "deserialize_h160"
	)]
	pub script_hash: H160,
	pub symbol: String,
	pub decimals: u8,
}

/// One storage pair of `expressgetcontractstorage` (both sides base64).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStorageEntry {
	pub key: String,
	pub value: String,
}
