use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_types::{deserialize_h160, deserialize_h256, serialize_h160, serialize_h256};

/// Result of `expressgetpopulatedblocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulatedBlocks {
	#[serde(rename = "cacheId")]
	pub cache_id: String,
	pub blocks: Vec<u32>,
}

/// A contract as listed by `expresslistcontracts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressContractState {
	#[serde(serialize_with = "serialize_h160", deserialize_with = "deserialize_h160")]
	pub hash: H160,
	pub manifest: Value,
}

/// A pending oracle request, as listed by `expresslistoraclerequests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
	#[serde(rename = "requestid")]
	pub request_id: u64,
	#[serde(
		rename = "originaltxid",
		serialize_with = "serialize_h256",
		deserialize_with = "deserialize_h256"
	)]
	pub original_transaction_hash: H256,
	#[serde(rename = "gasforresponse")]
	pub gas_for_response: u64,
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filter: Option<String>,
	#[serde(
		rename = "callbackcontract",
		serialize_with = "serialize_h160",
		deserialize_with = "deserialize_h160"
	)]
	pub callback_contract: H160,
	#[serde(rename = "callbackmethod")]
	pub callback_method: String,
	#[serde(rename = "userdata")]
	pub user_data: String,
}

/// Result of `expressshutdown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressShutdown {
	#[serde(rename = "process-id")]
	pub process_id: u32,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_populated_blocks() {
		let json = r#"{"cacheId": "637613615288087170", "blocks": [1129, 1127, 0]}"#;
		let blocks: PopulatedBlocks = serde_json::from_str(json).unwrap();
		assert_eq!(blocks.blocks, vec![1129, 1127, 0]);
	}

	#[test]
	fn test_parse_oracle_request() {
		let json = r#"{
			"requestid": 0,
			"originaltxid": "0x8b8b222ba4ae17eaf37d444210920690d0981b02c368f4f1973c8fd662438d89",
			"gasforresponse": 10000000,
			"url": "https://example.com/data",
			"filter": "$.value",
			"callbackcontract": "0xd2a4cff31913016155e38e474a2c06d08be276cf",
			"callbackmethod": "callback",
			"userdata": "KA=="
		}"#;
		let request: OracleRequest = serde_json::from_str(json).unwrap();
		assert_eq!(request.request_id, 0);
		assert_eq!(request.filter.as_deref(), Some("$.value"));
	}

	#[test]
	fn test_parse_shutdown() {
		let json = r#"{"process-id": 73625}"#;
		let shutdown: ExpressShutdown = serde_json::from_str(json).unwrap();
		assert_eq!(shutdown.process_id, 73625);
	}
}
