use thiserror::Error;

/// Errors surfaced by the RPC client.
///
/// Transport failures arrive as `Network` with the service's message kept
/// verbatim; a syntactically valid but semantically wrong JSON-RPC response
/// (missing both `result` and `error`, mismatched id) is `Protocol`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Protocol error: {0}")]
	Protocol(String),
	#[error("JSON-RPC error {code}: {message}")]
	JsonRpc { code: i32, message: String },
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Not implemented: {0}")]
	NotImplemented(String),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}

// Error codes the Neo RPC server answers entity lookups with.
const ERR_UNKNOWN_ENTITY_RANGE: std::ops::RangeInclusive<i32> = -108..=-100;

impl RpcError {
	/// Maps a server error object onto the taxonomy: unknown-entity codes
	/// become `NotFound`, everything else stays a coded JSON-RPC error.
	pub fn from_response_error(code: i32, message: String) -> Self {
		if ERR_UNKNOWN_ENTITY_RANGE.contains(&code) {
			RpcError::NotFound(message)
		} else {
			RpcError::JsonRpc { code, message }
		}
	}
}
