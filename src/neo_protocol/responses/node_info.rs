use serde::{Deserialize, Serialize};

/// Result of `validateaddress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoValidateAddress {
	pub address: String,
	#[serde(rename = "isvalid")]
	pub is_valid: bool,
}

/// One peer entry of `getpeers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
	pub address: String,
	pub port: u16,
}

/// Result of `getpeers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peers {
	#[serde(default)]
	pub connected: Vec<AddressEntry>,
	#[serde(default)]
	pub bad: Vec<AddressEntry>,
	#[serde(default)]
	pub unconnected: Vec<AddressEntry>,
}
