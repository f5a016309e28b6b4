//! The JSON-RPC 2.0 envelopes and the process-wide request id counter.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_rpc::RpcError;

// The only process-wide mutable state of the SDK. Incremented once per
// built request; concurrent builders observe distinct ids.
static REQUEST_ID: AtomicU32 = AtomicU32::new(1);

/// Draws the next request id.
pub fn next_request_id() -> u32 {
	REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// A JSON-RPC 2.0 request. Parameters are always positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
	pub jsonrpc: String,
	pub method: String,
	pub params: Vec<Value>,
	pub id: u32,
}

impl Request {
	pub fn new(method: &str, params: Vec<Value>) -> Self {
		Self {
			jsonrpc: "2.0".to_string(),
			method: method.to_string(),
			params,
			id: next_request_id(),
		}
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, RpcError> {
		serde_json::to_vec(self).map_err(|e| RpcError::Serialization(e.to_string()))
	}
}

/// The error object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
	pub code: i32,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}

/// A parsed JSON-RPC 2.0 response: exactly one of `result` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
	#[serde(default)]
	pub jsonrpc: Option<String>,
	#[serde(default)]
	pub id: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<JsonRpcError>,
}

impl Response {
	/// Parses raw response bytes and checks the envelope against the id of
	/// the request it answers. Returns the bare `result` value.
	pub fn into_result(bytes: &[u8], expected_id: u32) -> Result<Value, RpcError> {
		let response: Response = serde_json::from_slice(bytes).map_err(|e| {
			RpcError::Protocol(format!("response is not valid JSON-RPC: {}", e))
		})?;

		if let Some(id) = response.id {
			if id != expected_id {
				return Err(RpcError::Protocol(format!(
					"response id {} does not answer request {}",
					id, expected_id
				)))
			}
		}

		match (response.result, response.error) {
			(_, Some(error)) => Err(RpcError::from_response_error(error.code, error.message)),
			(Some(result), None) => Ok(result),
			(None, None) =>
				Err(RpcError::Protocol("response carries neither result nor error".to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn test_request_envelope_shape() {
		let request = Request::new("getblockcount", vec![]);
		let json: Value = serde_json::from_slice(&request.to_bytes().unwrap()).unwrap();
		assert_eq!(json["jsonrpc"], "2.0");
		assert_eq!(json["method"], "getblockcount");
		assert_eq!(json["params"], serde_json::json!([]));
		assert!(json["id"].is_u64());
	}

	#[test]
	fn test_request_ids_are_monotonic() {
		let first = Request::new("getblockcount", vec![]).id;
		let second = Request::new("getblockcount", vec![]).id;
		assert!(second > first);
	}

	#[test]
	fn test_concurrent_ids_are_distinct_and_contiguous() {
		let before = next_request_id();
		let handles: Vec<_> = (0..8)
			.map(|_| {
				std::thread::spawn(|| {
					(0..25).map(|_| next_request_id()).collect::<Vec<u32>>()
				})
			})
			.collect();
		let mut ids = HashSet::new();
		for handle in handles {
			for id in handle.join().unwrap() {
				assert!(ids.insert(id), "id {} was handed out twice", id);
			}
		}
		let after = next_request_id();

		// 200 distinct ids, all drawn from the window between the two probes;
		// other tests may draw ids concurrently, so the window may be wider
		// than 201 but never narrower
		assert_eq!(ids.len(), 200);
		assert!(ids.iter().all(|id| *id > before && *id < after));
		assert!(after - before >= 201);
	}

	#[test]
	fn test_result_response() {
		let raw = br#"{"jsonrpc":"2.0","id":7,"result":1234}"#;
		assert_eq!(Response::into_result(raw, 7).unwrap(), serde_json::json!(1234));
	}

	#[test]
	fn test_error_response() {
		let raw = br#"{"jsonrpc":"2.0","id":7,"error":{"code":-32601,"message":"Method not found"}}"#;
		assert_eq!(
			Response::into_result(raw, 7).unwrap_err(),
			RpcError::JsonRpc { code: -32601, message: "Method not found".to_string() }
		);
	}

	#[test]
	fn test_unknown_entity_code_maps_to_not_found() {
		let raw = br#"{"jsonrpc":"2.0","id":7,"error":{"code":-101,"message":"Unknown transaction"}}"#;
		assert_eq!(
			Response::into_result(raw, 7).unwrap_err(),
			RpcError::NotFound("Unknown transaction".to_string())
		);
	}

	#[test]
	fn test_mismatched_id_is_a_protocol_error() {
		let raw = br#"{"jsonrpc":"2.0","id":8,"result":1}"#;
		assert!(matches!(Response::into_result(raw, 7), Err(RpcError::Protocol(_))));
	}

	#[test]
	fn test_empty_envelope_is_a_protocol_error() {
		let raw = br#"{"jsonrpc":"2.0","id":7}"#;
		assert!(matches!(Response::into_result(raw, 7), Err(RpcError::Protocol(_))));
	}

	#[test]
	fn test_garbage_is_a_protocol_error() {
		assert!(matches!(
			Response::into_result(b"<html>teapot</html>", 7),
			Err(RpcError::Protocol(_))
		));
	}
}
