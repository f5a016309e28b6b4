use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::{
	neo_protocol::responses::{NeoWitness, TransactionResult},
	neo_types::{deserialize_h256, deserialize_h256_option, serialize_h256, serialize_h256_option},
};

/// Result of `getblock`/`getblockheader` in verbose mode. `transactions`
/// stays `None` for header-only queries; `next_block_hash` is absent on the
/// chain tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoBlock {
	#[serde(serialize_with = "serialize_h256", deserialize_with = "deserialize_h256")]
	pub hash: H256,
	pub size: u32,
	pub version: u32,
	#[serde(
		rename = "previousblockhash",
		serialize_with = "serialize_h256",
		deserialize_with = "deserialize_h256"
	)]
	pub prev_block_hash: H256,
	#[serde(
		rename = "merkleroot",
		serialize_with = "serialize_h256",
		deserialize_with = "deserialize_h256"
	)]
	pub merkle_root_hash: H256,
	pub time: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nonce: Option<String>,
	pub index: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub primary: Option<u32>,
	#[serde(rename = "nextconsensus")]
	pub next_consensus: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub witnesses: Option<Vec<NeoWitness>>,
	#[serde(rename = "tx", default, skip_serializing_if = "Option::is_none")]
	pub transactions: Option<Vec<TransactionResult>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub confirmations: Option<u32>,
	#[serde(
		rename = "nextblockhash",
		default,
		skip_serializing_if = "Option::is_none",
		serialize_with = "serialize_h256_option",
		deserialize_with = "deserialize_h256_option"
	)]
	pub next_block_hash: Option<H256>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_header_only_block() {
		let json = r#"{
			"hash": "0x1de7e5e98e0d08fcd92fe919d2a2fbeb37b6cca4de492a234d1271a75e127c9f",
			"size": 697,
			"version": 0,
			"previousblockhash": "0x045bb9a3a9e9402bd4b10b2c1c9d8b9ba1bfc532524857ba84da0a26898fb1b4",
			"merkleroot": "0x6afa63329a4f6b9d2f5db525f82866fa373fdcb4b4b02ca42f4c4458b6d0684e",
			"time": 1612687482881,
			"index": 10985,
			"nextconsensus": "NUQ6Q4BWvHU71HNxPQ4LMSHPMK1jSz1nw4"
		}"#;
		let block: NeoBlock = serde_json::from_str(json).unwrap();
		assert_eq!(block.index, 10985);
		assert!(block.transactions.is_none());
		assert!(block.next_block_hash.is_none());
		assert!(block.witnesses.is_none());
	}
}
