use primitive_types::H256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_types::{deserialize_h256, deserialize_h256_option, serialize_h256, serialize_h256_option};

/// Execution state of a transaction or script run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VMState {
	#[serde(rename = "NONE")]
	None,
	#[serde(rename = "HALT")]
	Halt,
	#[serde(rename = "FAULT")]
	Fault,
	#[serde(rename = "BREAK")]
	Break,
}

/// A witness as the RPC surface renders it: both scripts in base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoWitness {
	pub invocation: String,
	pub verification: String,
}

/// Result of `getrawtransaction` in verbose mode.
///
/// `block_hash`, `confirmations`, `block_time` and `vm_state` only appear
/// once the transaction is on chain; the node omits them for mempool
/// entries and no default is synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
	#[serde(serialize_with = "serialize_h256", deserialize_with = "deserialize_h256")]
	pub hash: H256,
	pub size: u32,
	pub version: u8,
	pub nonce: u32,
	pub sender: Option<String>,
	#[serde(rename = "sysfee")]
	pub sys_fee: String,
	#[serde(rename = "netfee")]
	pub net_fee: String,
	#[serde(rename = "validuntilblock")]
	pub valid_until_block: u32,
	#[serde(default)]
	pub signers: Vec<Value>,
	#[serde(default)]
	pub attributes: Vec<Value>,
	pub script: String,
	#[serde(default)]
	pub witnesses: Vec<NeoWitness>,
	#[serde(
		rename = "blockhash",
		default,
		skip_serializing_if = "Option::is_none",
		serialize_with = "serialize_h256_option",
		deserialize_with = "deserialize_h256_option"
	)]
	pub block_hash: Option<H256>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub confirmations: Option<u32>,
	#[serde(rename = "blocktime", default, skip_serializing_if = "Option::is_none")]
	pub block_time: Option<u64>,
	#[serde(rename = "vmstate", default, skip_serializing_if = "Option::is_none")]
	pub vm_state: Option<VMState>,
}

/// Result of `sendrawtransaction`: the accepted transaction's hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
	#[serde(serialize_with = "serialize_h256", deserialize_with = "deserialize_h256")]
	pub hash: H256,
}
