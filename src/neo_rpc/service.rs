use crate::neo_rpc::RpcError;

/// The one seam between the RPC client and the outside world: a collaborator
/// that carries opaque request bytes to a node and brings the response bytes
/// back. Both sides are UTF-8 JSON.
///
/// Everything transport-shaped lives behind this trait: timeouts, retries,
/// TLS, cancellation. A failed or cancelled round trip surfaces as
/// [`RpcError::Network`] with the transport's message kept verbatim; the
/// client never mutates state on a failed call.
pub trait JsonRpcService {
	/// Performs one request/response round trip. This is the only operation
	/// in the SDK that may block on I/O.
	fn perform_io(&self, request: &[u8]) -> Result<Vec<u8>, RpcError>;

	/// Whether the client should keep the raw response bytes around after a
	/// successful parse (for diagnostics or proof archival). Defaults to
	/// discarding them.
	fn preserves_raw_responses(&self) -> bool {
		false
	}
}

impl<S: JsonRpcService + ?Sized> JsonRpcService for &S {
	fn perform_io(&self, request: &[u8]) -> Result<Vec<u8>, RpcError> {
		(**self).perform_io(request)
	}

	fn preserves_raw_responses(&self) -> bool {
		(**self).preserves_raw_responses()
	}
}

impl<S: JsonRpcService + ?Sized> JsonRpcService for std::sync::Arc<S> {
	fn perform_io(&self, request: &[u8]) -> Result<Vec<u8>, RpcError> {
		(**self).perform_io(request)
	}

	fn preserves_raw_responses(&self) -> bool {
		(**self).preserves_raw_responses()
	}
}
