use serde::{Deserialize, Serialize};

/// Result of `getversion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoVersion {
	#[serde(rename = "tcpport", skip_serializing_if = "Option::is_none")]
	pub tcp_port: Option<u16>,
	#[serde(rename = "wsport", skip_serializing_if = "Option::is_none")]
	pub ws_port: Option<u16>,
	pub nonce: u64,
	#[serde(rename = "useragent")]
	pub user_agent: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub protocol: Option<NeoProtocol>,
}

/// The protocol settings block of `getversion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoProtocol {
	pub network: u32,
	#[serde(rename = "addressversion", skip_serializing_if = "Option::is_none")]
	pub address_version: Option<u8>,
	#[serde(rename = "validatorscount", skip_serializing_if = "Option::is_none")]
	pub validators_count: Option<u32>,
	#[serde(rename = "msperblock", skip_serializing_if = "Option::is_none")]
	pub ms_per_block: Option<u32>,
	#[serde(rename = "maxvaliduntilblockincrement", skip_serializing_if = "Option::is_none")]
	pub max_valid_until_block_increment: Option<u32>,
	#[serde(rename = "maxtraceableblocks", skip_serializing_if = "Option::is_none")]
	pub max_traceable_blocks: Option<u32>,
	#[serde(rename = "maxtransactionsperblock", skip_serializing_if = "Option::is_none")]
	pub max_transactions_per_block: Option<u32>,
	#[serde(rename = "memorypoolmaxtransactions", skip_serializing_if = "Option::is_none")]
	pub memory_pool_max_transactions: Option<u32>,
	#[serde(rename = "initialgasdistribution", skip_serializing_if = "Option::is_none")]
	pub initial_gas_distribution: Option<u64>,
}
