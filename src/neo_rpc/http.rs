use std::time::Duration;

use url::Url;

use crate::neo_rpc::{JsonRpcService, RpcClient, RpcError};

/// The bundled HTTP adapter: one blocking POST per round trip.
///
/// Anything beyond that stays with the host: custom headers, retries and
/// proxies all go through [`HttpService::with_client`].
#[derive(Debug)]
pub struct HttpService {
	client: reqwest::blocking::Client,
	url: Url,
	preserve_raw: bool,
}

impl HttpService {
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	pub fn new(url: Url) -> Self {
		let client = reqwest::blocking::Client::builder()
			.timeout(Self::DEFAULT_TIMEOUT)
			.build()
			.expect("the default TLS backend is available");
		Self { client, url, preserve_raw: false }
	}

	/// Uses a caller-configured `reqwest` client.
	pub fn with_client(url: Url, client: reqwest::blocking::Client) -> Self {
		Self { client, url, preserve_raw: false }
	}

	/// Asks the RPC client to keep raw response bytes after parsing.
	pub fn preserve_raw_responses(mut self, preserve: bool) -> Self {
		self.preserve_raw = preserve;
		self
	}

	pub fn url(&self) -> &Url {
		&self.url
	}
}

impl JsonRpcService for HttpService {
	fn perform_io(&self, request: &[u8]) -> Result<Vec<u8>, RpcError> {
		let response = self
			.client
			.post(self.url.clone())
			.header(reqwest::header::CONTENT_TYPE, "application/json")
			.body(request.to_vec())
			.send()
			.map_err(|e| RpcError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(RpcError::Network(format!("HTTP status {}", status)))
		}

		let body = response.bytes().map_err(|e| RpcError::Network(e.to_string()))?;
		Ok(body.to_vec())
	}

	fn preserves_raw_responses(&self) -> bool {
		self.preserve_raw
	}
}

impl RpcClient<HttpService> {
	/// Connects a client over the bundled HTTP adapter.
	pub fn connect_http(url: Url) -> Self {
		RpcClient::new(url.clone(), HttpService::new(url))
	}
}
