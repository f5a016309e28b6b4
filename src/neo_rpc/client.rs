use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use once_cell::sync::OnceCell;
use primitive_types::{H160, H256};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, trace};
use url::Url;

use crate::{
	neo_builder::{Signer, WitnessScope},
	neo_codec::NeoSerializable,
	neo_protocol::responses::{
		ContractState, ContractStorageEntry, ExpressContractState, ExpressShutdown,
		InvocationResult, Nep17Contract, NeoBlock, NeoValidateAddress, NeoVersion, OracleRequest,
		Peers, PopulatedBlocks, RawTransaction, TransactionResult,
	},
	neo_rpc::{JsonRpcService, Request, Response, RpcError},
	neo_types::{ContractParameter, Hash256Extension, ScriptHashExtension},
};

/// A typed JSON-RPC client for Neo N3 nodes, including the Neo-Express
/// extension surface.
///
/// The client is re-entrant: typed methods take `&self` and any number of
/// threads may call them concurrently, provided the backing
/// [`JsonRpcService`] is itself thread-safe. Correlation is positional (one
/// response per request); the id counter is the only ordering guarantee.
#[derive(Debug)]
pub struct RpcClient<S> {
	url: Url,
	service: S,
	network_magic: OnceCell<u32>,
	last_raw_response: Mutex<Option<Vec<u8>>>,
}

impl<S: JsonRpcService> RpcClient<S> {
	pub fn new(url: Url, service: S) -> Self {
		Self {
			url,
			service,
			network_magic: OnceCell::new(),
			last_raw_response: Mutex::new(None),
		}
	}

	/// The node URL this client was built for.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// The raw bytes of the most recent successful response, when the
	/// service asked for them to be preserved.
	pub fn take_raw_response(&self) -> Option<Vec<u8>> {
		self.last_raw_response.lock().expect("raw-response slot poisoned").take()
	}

	/// Builds, sends and decodes one request. The workhorse behind every
	/// typed method.
	pub fn request<R: DeserializeOwned>(
		&self,
		method: &str,
		params: Vec<Value>,
	) -> Result<R, RpcError> {
		let request = Request::new(method, params);
		trace!(method, id = request.id, "rpc request");
		let payload = request.to_bytes()?;

		let response_bytes = self.service.perform_io(&payload).map_err(|e| {
			crate::neo_error::set_last_error(format!("{} failed: {}", method, e));
			e
		})?;
		let result = Response::into_result(&response_bytes, request.id)?;

		if self.service.preserves_raw_responses() {
			*self.last_raw_response.lock().expect("raw-response slot poisoned") =
				Some(response_bytes);
		}

		debug!(method, id = request.id, "rpc round trip complete");
		serde_json::from_value(result).map_err(|e| {
			RpcError::Protocol(format!("{} result has an unexpected shape: {}", method, e))
		})
	}

	/// The callback flavor of [`RpcClient::request`]: hands the outcome to
	/// `callback` exactly once, on the calling thread.
	pub fn request_with<R, F>(&self, method: &str, params: Vec<Value>, callback: F)
	where
		R: DeserializeOwned,
		F: FnOnce(Result<R, RpcError>),
	{
		callback(self.request(method, params))
	}

	// ---- blockchain methods ----

	pub fn get_best_block_hash(&self) -> Result<H256, RpcError> {
		self.request_h256("getbestblockhash", vec![])
	}

	pub fn get_block_count(&self) -> Result<u32, RpcError> {
		self.request("getblockcount", vec![])
	}

	pub fn get_block_hash(&self, index: u32) -> Result<H256, RpcError> {
		self.request_h256("getblockhash", vec![json!(index)])
	}

	/// Fetches a block with its full transaction objects.
	pub fn get_block(&self, hash: &H256) -> Result<NeoBlock, RpcError> {
		self.request("getblock", vec![json!(hash_param(hash)), json!(1)])
	}

	pub fn get_block_by_index(&self, index: u32) -> Result<NeoBlock, RpcError> {
		self.request("getblock", vec![json!(index), json!(1)])
	}

	/// Fetches the base64 of a block's raw bytes.
	pub fn get_raw_block(&self, hash: &H256) -> Result<String, RpcError> {
		self.request("getblock", vec![json!(hash_param(hash)), json!(0)])
	}

	pub fn get_block_header(&self, hash: &H256) -> Result<NeoBlock, RpcError> {
		self.request("getblockheader", vec![json!(hash_param(hash)), json!(1)])
	}

	pub fn get_version(&self) -> Result<NeoVersion, RpcError> {
		self.request("getversion", vec![])
	}

	/// The network magic, fetched once via `getversion` and cached for the
	/// client's lifetime.
	pub fn network(&self) -> Result<u32, RpcError> {
		self.network_magic
			.get_or_try_init(|| {
				let version = self.get_version()?;
				version
					.protocol
					.map(|p| p.network)
					.ok_or_else(|| {
						RpcError::Protocol(
							"the node's version response carries no protocol block".to_string(),
						)
					})
			})
			.copied()
	}

	pub fn get_contract_state(&self, hash: &H160) -> Result<ContractState, RpcError> {
		self.request("getcontractstate", vec![json!(format!("0x{}", hash.to_hex()))])
	}

	pub fn get_raw_transaction(&self, hash: &H256) -> Result<TransactionResult, RpcError> {
		self.request("getrawtransaction", vec![json!(hash_param(hash)), json!(1)])
	}

	pub fn get_raw_transaction_hex(&self, hash: &H256) -> Result<String, RpcError> {
		self.request("getrawtransaction", vec![json!(hash_param(hash)), json!(0)])
	}

	/// Submits a signed transaction, given as the hex of its serialization.
	pub fn send_raw_transaction(&self, tx_hex: &str) -> Result<RawTransaction, RpcError> {
		let bytes = hex::decode(tx_hex)
			.map_err(|e| RpcError::InvalidArgument(format!("invalid transaction hex: {}", e)))?;
		self.request("sendrawtransaction", vec![json!(BASE64.encode(bytes))])
	}

	pub fn invoke_function(
		&self,
		contract: &H160,
		method: &str,
		params: Vec<ContractParameter>,
		signers: Option<Vec<Signer>>,
	) -> Result<InvocationResult, RpcError> {
		let params_json = serde_json::to_value(&params)
			.map_err(|e| RpcError::Serialization(e.to_string()))?;
		let mut positional = vec![
			json!(format!("0x{}", contract.to_hex())),
			json!(method),
			params_json,
		];
		if let Some(signers) = signers {
			positional.push(Value::Array(signers.iter().map(signer_param).collect()));
		}
		self.request("invokefunction", positional)
	}

	pub fn invoke_script(
		&self,
		script: &[u8],
		signers: Option<Vec<Signer>>,
	) -> Result<InvocationResult, RpcError> {
		let mut positional = vec![json!(BASE64.encode(script))];
		if let Some(signers) = signers {
			positional.push(Value::Array(signers.iter().map(signer_param).collect()));
		}
		self.request("invokescript", positional)
	}

	/// Prices the network fee of a built transaction and writes it back
	/// into the builder, ready for the final sign.
	pub fn fill_network_fee(
		&self,
		builder: &mut crate::neo_builder::TransactionBuilder,
	) -> Result<i64, RpcError> {
		let unsigned = builder
			.transaction()
			.map_err(|e| RpcError::InvalidArgument(e.to_string()))?;
		let fee = self.calculate_network_fee(&hex::encode(unsigned.to_array()))?;
		builder
			.network_fee(fee)
			.map_err(|e| RpcError::InvalidArgument(e.to_string()))?;
		Ok(fee)
	}

	/// Asks the node to price the network fee of a transaction, given as
	/// the hex of its (typically unsigned) serialization.
	pub fn calculate_network_fee(&self, tx_hex: &str) -> Result<i64, RpcError> {
		let bytes = hex::decode(tx_hex)
			.map_err(|e| RpcError::InvalidArgument(format!("invalid transaction hex: {}", e)))?;
		let result: Value =
			self.request("calculatenetworkfee", vec![json!(BASE64.encode(bytes))])?;
		let fee = &result["networkfee"];
		let parsed = match fee {
			Value::String(s) => s.parse::<i64>().ok(),
			Value::Number(n) => n.as_i64(),
			_ => None,
		};
		parsed.ok_or_else(|| {
			RpcError::Protocol("calculatenetworkfee returned no usable fee".to_string())
		})
	}

	pub fn validate_address(&self, address: &str) -> Result<NeoValidateAddress, RpcError> {
		self.request("validateaddress", vec![json!(address)])
	}

	pub fn get_peers(&self) -> Result<Peers, RpcError> {
		self.request("getpeers", vec![])
	}

	pub fn get_connection_count(&self) -> Result<u32, RpcError> {
		self.request("getconnectioncount", vec![])
	}

	/// The committee's public keys as compressed hex strings.
	pub fn get_committee(&self) -> Result<Vec<String>, RpcError> {
		self.request("getcommittee", vec![])
	}

	// ---- Neo-Express extensions ----

	pub fn express_get_populated_blocks(&self) -> Result<PopulatedBlocks, RpcError> {
		self.request("expressgetpopulatedblocks", vec![])
	}

	pub fn express_get_nep17_contracts(&self) -> Result<Vec<Nep17Contract>, RpcError> {
		self.request("expressgetnep17contracts", vec![])
	}

	pub fn express_get_contract_storage(
		&self,
		contract: &H160,
	) -> Result<Vec<ContractStorageEntry>, RpcError> {
		self.request(
			"expressgetcontractstorage",
			vec![json!(format!("0x{}", contract.to_hex()))],
		)
	}

	pub fn express_list_contracts(&self) -> Result<Vec<ExpressContractState>, RpcError> {
		self.request("expresslistcontracts", vec![])
	}

	/// Writes a chain checkpoint file on the express node.
	pub fn express_create_checkpoint(&self, filename: &str) -> Result<String, RpcError> {
		self.request("expresscreatecheckpoint", vec![json!(filename)])
	}

	pub fn express_list_oracle_requests(&self) -> Result<Vec<OracleRequest>, RpcError> {
		self.request("expresslistoraclerequests", vec![])
	}

	/// Builds an oracle response transaction on the express node, returning
	/// its base64 serialization.
	pub fn express_create_oracle_response_tx(
		&self,
		request_id: u64,
		result_base64: &str,
	) -> Result<String, RpcError> {
		self.request(
			"expresscreateoracleresponsetx",
			vec![json!({
				"id": request_id,
				"code": "Success",
				"result": result_base64,
			})],
		)
	}

	pub fn express_shutdown(&self) -> Result<ExpressShutdown, RpcError> {
		self.request("expressshutdown", vec![])
	}

	fn request_h256(&self, method: &str, params: Vec<Value>) -> Result<H256, RpcError> {
		let text: String = self.request(method, params)?;
		H256::from_hex(&text)
			.map_err(|e| RpcError::Protocol(format!("{} returned a bad hash: {}", method, e)))
	}
}

fn hash_param(hash: &H256) -> String {
	format!("0x{}", hash.to_hex())
}

// The RPC server binds witness scopes from a comma-joined string, not a
// JSON list, so signers are reshaped here rather than with their canonical
// Serialize impl.
fn signer_param(signer: &Signer) -> Value {
	let scopes = signer
		.scopes()
		.iter()
		.map(WitnessScope::to_string)
		.collect::<Vec<_>>()
		.join(",");

	let mut obj = serde_json::Map::new();
	obj.insert("account".into(), json!(format!("0x{}", signer.account().to_hex())));
	obj.insert("scopes".into(), json!(scopes));
	if !signer.allowed_contracts().is_empty() {
		obj.insert(
			"allowedcontracts".into(),
			json!(signer
				.allowed_contracts()
				.iter()
				.map(|c| format!("0x{}", c.to_hex()))
				.collect::<Vec<_>>()),
		);
	}
	if !signer.allowed_groups().is_empty() {
		obj.insert(
			"allowedgroups".into(),
			json!(signer
				.allowed_groups()
				.iter()
				.map(|g| g.get_encoded_compressed_hex())
				.collect::<Vec<_>>()),
		);
	}
	if !signer.rules().is_empty() {
		obj.insert(
			"rules".into(),
			serde_json::to_value(signer.rules()).unwrap_or(Value::Null),
		);
	}
	Value::Object(obj)
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;

	use super::*;

	/// Answers every request from a canned list and records what it saw.
	struct StubService {
		requests: Mutex<Vec<Value>>,
		responses: Mutex<Vec<String>>,
		preserve_raw: bool,
	}

	impl StubService {
		fn answering(results: &[&str]) -> Self {
			// canned results are popped back-to-front
			let mut responses: Vec<String> = results.iter().map(|s| s.to_string()).collect();
			responses.reverse();
			Self {
				requests: Mutex::new(Vec::new()),
				responses: Mutex::new(responses),
				preserve_raw: false,
			}
		}

		fn seen(&self) -> Vec<Value> {
			self.requests.lock().unwrap().clone()
		}
	}

	impl JsonRpcService for StubService {
		fn perform_io(&self, request: &[u8]) -> Result<Vec<u8>, RpcError> {
			let parsed: Value = serde_json::from_slice(request).unwrap();
			let id = parsed["id"].clone();
			self.requests.lock().unwrap().push(parsed);

			let result = self
				.responses
				.lock()
				.unwrap()
				.pop()
				.ok_or_else(|| RpcError::Network("stub ran out of answers".to_string()))?;
			let envelope = format!(r#"{{"jsonrpc":"2.0","id":{},"result":{}}}"#, id, result);
			Ok(envelope.into_bytes())
		}

		fn preserves_raw_responses(&self) -> bool {
			self.preserve_raw
		}
	}

	fn client(results: &[&str]) -> RpcClient<StubService> {
		RpcClient::new(
			Url::parse("http://localhost:50012").unwrap(),
			StubService::answering(results),
		)
	}

	#[test]
	fn test_get_block_count() {
		let client = client(&["1234"]);
		assert_eq!(client.get_block_count().unwrap(), 1234);

		let seen = client.service.seen();
		assert_eq!(seen[0]["method"], "getblockcount");
		assert_eq!(seen[0]["params"], json!([]));
	}

	#[test]
	fn test_get_block_hash_parses_hex() {
		let client = client(
			&[r#""0x8529cf7301d13cc13d85913b8367700080a6e96db045687b8db720e91e803299""#],
		);
		let hash = client.get_block_hash(12).unwrap();
		assert_eq!(
			hash.to_hex(),
			"8529cf7301d13cc13d85913b8367700080a6e96db045687b8db720e91e803299"
		);
		assert_eq!(client.service.seen()[0]["params"], json!([12]));
	}

	#[test]
	fn test_invoke_function_positional_params() {
		let client = client(&[r#"{"script":"AQID","state":"HALT","gasconsumed":"1","stack":[]}"#]);
		let contract = H160::from_hex("d2a4cff31913016155e38e474a2c06d08be276cf").unwrap();
		let mut signer = Signer::called_by_entry(
			H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap(),
		);
		signer.set_allowed_contracts(vec![contract]).unwrap();

		client
			.invoke_function(
				&contract,
				"balanceOf",
				vec![ContractParameter::from(&contract)],
				Some(vec![signer]),
			)
			.unwrap();

		let request = &client.service.seen()[0];
		assert_eq!(request["method"], "invokefunction");
		let params = request["params"].as_array().unwrap();
		assert_eq!(params[0], "0xd2a4cff31913016155e38e474a2c06d08be276cf");
		assert_eq!(params[1], "balanceOf");
		assert_eq!(params[2][0]["type"], "Hash160");
		assert_eq!(params[3][0]["scopes"], "CalledByEntry,CustomContracts");
	}

	#[test]
	fn test_send_raw_transaction_encodes_base64() {
		let client = client(
			&[r#"{"hash":"0x8b8b222ba4ae17eaf37d444210920690d0981b02c368f4f1973c8fd662438d89"}"#],
		);
		client.send_raw_transaction("010203").unwrap();
		assert_eq!(client.service.seen()[0]["params"][0], BASE64.encode([1u8, 2, 3]));

		assert!(matches!(
			client.send_raw_transaction("zz"),
			Err(RpcError::InvalidArgument(_))
		));
	}

	#[test]
	fn test_calculate_network_fee() {
		let client = client(&[r#"{"networkfee":"1230610"}"#]);
		assert_eq!(client.calculate_network_fee("010203").unwrap(), 1_230_610);
	}

	#[test]
	fn test_fill_network_fee_writes_back() {
		use crate::neo_builder::TransactionBuilder;

		let client = client(&[r#"{"networkfee":"999"}"#]);
		let mut builder = TransactionBuilder::new();
		builder.set_script(vec![0x01]).unwrap();
		builder
			.add_signer(Signer::called_by_entry(
				H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap(),
			))
			.unwrap();
		builder.valid_until_block(100).unwrap();
		builder.build().unwrap();

		assert_eq!(client.fill_network_fee(&mut builder).unwrap(), 999);
		assert_eq!(builder.transaction().unwrap().network_fee, 999);
	}

	#[test]
	fn test_network_magic_is_cached() {
		let client = client(&[
			r#"{"nonce":1,"useragent":"/Neo:3.6.0/","protocol":{"network":860833102}}"#,
		]);
		assert_eq!(client.network().unwrap(), 860_833_102);
		// second call answers from the cache; the stub has no response left
		assert_eq!(client.network().unwrap(), 860_833_102);
		assert_eq!(client.service.seen().len(), 1);
	}

	#[test]
	fn test_express_get_populated_blocks() {
		// S6: express extension request shape
		let client = client(&[r#"{"cacheId":"637613615288087170","blocks":[1129,0]}"#]);
		let blocks = client.express_get_populated_blocks().unwrap();
		assert_eq!(blocks.blocks, vec![1129, 0]);

		let request = &client.service.seen()[0];
		assert_eq!(request["method"], "expressgetpopulatedblocks");
		assert_eq!(request["params"], json!([]));
		assert!(request["id"].is_u64());
	}

	#[test]
	fn test_express_ids_are_monotonic() {
		let client = client(&[r#"{"cacheId":"a","blocks":[]}"#, r#"{"cacheId":"b","blocks":[]}"#]);
		client.express_get_populated_blocks().unwrap();
		client.express_get_populated_blocks().unwrap();

		let seen = client.service.seen();
		let first = seen[0]["id"].as_u64().unwrap();
		let second = seen[1]["id"].as_u64().unwrap();
		assert!(second > first);
	}

	#[test]
	fn test_network_error_passes_through() {
		let client = client(&[]);
		assert_eq!(
			client.get_block_count().unwrap_err(),
			RpcError::Network("stub ran out of answers".to_string())
		);
		// the failure landed in the diagnostic slot too
		assert!(crate::neo_error::last_error().unwrap().contains("getblockcount"));
	}

	#[test]
	fn test_raw_response_preservation() {
		let mut service = StubService::answering(&["7"]);
		service.preserve_raw = true;
		let client = RpcClient::new(Url::parse("http://localhost:50012").unwrap(), service);

		assert_eq!(client.get_block_count().unwrap(), 7);
		let raw = client.take_raw_response().unwrap();
		assert!(String::from_utf8(raw).unwrap().contains("\"result\":7"));
		// taken once, gone afterwards
		assert!(client.take_raw_response().is_none());
	}

	#[test]
	fn test_validate_address() {
		let client =
			client(&[r#"{"address":"NLnyLtep7jwyq1qhNPkwXbJpurC4jUT8ke","isvalid":true}"#]);
		let result = client.validate_address("NLnyLtep7jwyq1qhNPkwXbJpurC4jUT8ke").unwrap();
		assert!(result.is_valid);
	}
}
