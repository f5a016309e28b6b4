//! The NEP-6 wallet document model, one-to-one with the JSON file format.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::{
	neo_builder::VerificationScript,
	neo_protocol::Account,
	neo_types::{Address, ContractParameterType},
	neo_wallets::WalletError,
};

/// The `contract` object of a NEP-6 account: the verification script in
/// base64 plus its parameter declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NEP6Contract {
	#[serde(rename = "script", skip_serializing_if = "Option::is_none")]
	pub script: Option<String>,
	#[serde(rename = "parameters", default)]
	pub parameters: Vec<NEP6Parameter>,
	#[serde(rename = "deployed", default)]
	pub is_deployed: bool,
}

/// One declared parameter of a NEP-6 contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NEP6Parameter {
	#[serde(rename = "name")]
	pub name: String,
	#[serde(rename = "type")]
	pub param_type: ContractParameterType,
}

/// One account entry of a NEP-6 wallet document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NEP6Account {
	#[serde(rename = "address")]
	pub address: Address,
	#[serde(rename = "label", skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(rename = "isDefault", default)]
	pub is_default: bool,
	#[serde(rename = "lock", default)]
	pub lock: bool,
	#[serde(rename = "key", skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
	#[serde(rename = "contract", skip_serializing_if = "Option::is_none")]
	pub contract: Option<NEP6Contract>,
	#[serde(rename = "extra", skip_serializing_if = "Option::is_none")]
	pub extra: Option<HashMap<String, serde_json::Value>>,
}

impl NEP6Account {
	/// Renders an in-memory account into its document entry. Accounts with
	/// key material must have been NEP-2 encrypted beforehand; the plaintext
	/// key never reaches the file.
	pub fn from_account(account: &Account) -> Result<NEP6Account, WalletError> {
		if account.key_pair().is_some() && account.encrypted_private_key().is_none() {
			return Err(WalletError::AccountState(
				"the account key must be NEP-2 encrypted before it can be written out"
					.to_string(),
			))
		}

		let contract = account.verification_script().map(|script| {
			let parameters = if script.is_multi_sig() {
				let threshold = script.get_signing_threshold().unwrap_or_default();
				(1..=threshold)
					.map(|i| NEP6Parameter {
						name: format!("signature{}", i - 1),
						param_type: ContractParameterType::Signature,
					})
					.collect()
			} else {
				vec![NEP6Parameter {
					name: "signature".to_string(),
					param_type: ContractParameterType::Signature,
				}]
			};
			NEP6Contract {
				script: Some(BASE64.encode(script.script())),
				parameters,
				is_deployed: false,
			}
		});

		Ok(NEP6Account {
			address: account.get_address(),
			label: account.label().map(str::to_string),
			is_default: account.is_default(),
			lock: account.is_locked(),
			key: account.encrypted_private_key().map(str::to_string),
			contract,
			extra: None,
		})
	}

	/// Rehydrates an in-memory account; the key pair stays encrypted until
	/// explicitly decrypted.
	pub fn to_account(&self) -> Result<Account, WalletError> {
		let mut account = Account::from_address(&self.address)?;
		account.set_label(self.label.clone());
		account.set_encrypted_private_key(self.key.clone());
		if self.lock {
			account.lock();
		}
		account.set_default(self.is_default);

		if let Some(contract) = &self.contract {
			if let Some(script) = &contract.script {
				let bytes = BASE64.decode(script).map_err(|e| {
					WalletError::InvalidWallet(format!("invalid contract script: {}", e))
				})?;
				let script = VerificationScript::from_bytes(bytes);
				if script.hash() != account.get_script_hash() {
					return Err(WalletError::InvalidWallet(format!(
						"the contract script does not match address {}",
						self.address
					)))
				}
				if script.is_multi_sig() {
					account.set_multi_sig_shape(
						Some(script.get_signing_threshold().unwrap_or_default() as u32),
						Some(script.get_nr_of_accounts().unwrap_or_default() as u32),
					);
				}
				account.set_verification_script(Some(script));
			}
		}

		Ok(account)
	}
}
