use std::{collections::HashMap, fs, path::Path};

use primitive_types::H160;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
	neo_protocol::{Account, ScryptParamsDef},
	neo_types::ScriptHashExtension,
	neo_wallets::{NEP6Account, WalletError},
};

/// A NEP-6 wallet document, one-to-one with the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NEP6Wallet {
	#[serde(rename = "name")]
	pub name: String,
	#[serde(rename = "version")]
	pub version: String,
	#[serde(rename = "scrypt")]
	pub scrypt: ScryptParamsDef,
	#[serde(rename = "accounts")]
	pub accounts: Vec<NEP6Account>,
	#[serde(rename = "extra", skip_serializing_if = "Option::is_none")]
	pub extra: Option<HashMap<String, serde_json::Value>>,
}

/// An in-memory wallet: an ordered list of accounts, one of them the
/// default, plus the scrypt profile its keys are encrypted under.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
	name: String,
	version: String,
	scrypt_params: ScryptParamsDef,
	accounts: Vec<Account>,
	default_index: Option<usize>,
}

impl Wallet {
	pub const CURRENT_VERSION: &'static str = "1.0";

	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			version: Self::CURRENT_VERSION.to_string(),
			scrypt_params: ScryptParamsDef::default(),
			accounts: Vec::new(),
			default_index: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn scrypt_params(&self) -> ScryptParamsDef {
		self.scrypt_params
	}

	pub fn set_scrypt_params(&mut self, params: ScryptParamsDef) {
		self.scrypt_params = params;
	}

	/// Accounts in insertion order.
	pub fn accounts(&self) -> &[Account] {
		&self.accounts
	}

	/// The default account, if the wallet holds any account at all.
	pub fn default_account(&self) -> Option<&Account> {
		self.default_index.and_then(|i| self.accounts.get(i))
	}

	pub fn get_account(&self, script_hash: &H160) -> Option<&Account> {
		self.accounts.iter().find(|a| a.get_script_hash() == *script_hash)
	}

	pub fn get_account_by_address(&self, address: &str) -> Option<&Account> {
		self.accounts.iter().find(|a| a.get_address() == address)
	}

	/// Appends an account. The first account of an empty wallet becomes the
	/// default; duplicate addresses are rejected.
	pub fn add_account(&mut self, mut account: Account) -> Result<&mut Self, WalletError> {
		if self.get_account(&account.get_script_hash()).is_some() {
			return Err(WalletError::InvalidWallet(format!(
				"the wallet already holds {}",
				account.get_address()
			)))
		}
		account.set_default(false);
		self.accounts.push(account);
		if self.default_index.is_none() {
			self.set_default_index(self.accounts.len() - 1);
		}
		Ok(self)
	}

	/// Detaches an account by address. Removing the default promotes the
	/// first remaining account.
	pub fn remove_account(&mut self, address: &str) -> Result<Account, WalletError> {
		let index = self
			.accounts
			.iter()
			.position(|a| a.get_address() == address)
			.ok_or_else(|| WalletError::AccountNotFound(address.to_string()))?;

		let removed = self.accounts.remove(index);
		match self.default_index {
			Some(default) if default == index =>
				if self.accounts.is_empty() {
					self.default_index = None;
				} else {
					self.set_default_index(0);
				},
			Some(default) if default > index => self.default_index = Some(default - 1),
			_ => {},
		}
		Ok(removed)
	}

	/// Marks the account with the given script hash as the default.
	pub fn set_default_account(&mut self, script_hash: &H160) -> Result<(), WalletError> {
		let index = self
			.accounts
			.iter()
			.position(|a| a.get_script_hash() == *script_hash)
			.ok_or_else(|| WalletError::AccountNotFound(script_hash.to_address()))?;
		self.set_default_index(index);
		Ok(())
	}

	fn set_default_index(&mut self, index: usize) {
		for (i, account) in self.accounts.iter_mut().enumerate() {
			account.set_default(i == index);
		}
		self.default_index = Some(index);
	}

	/// NEP-2 encrypts every account that still holds a plaintext key, under
	/// this wallet's scrypt profile.
	pub fn encrypt_accounts(&mut self, password: &str) -> Result<(), WalletError> {
		let params = self.scrypt_params;
		for account in &mut self.accounts {
			if account.key_pair().is_some() && account.encrypted_private_key().is_none() {
				account.encrypt_private_key(password, params)?;
			}
		}
		Ok(())
	}

	/// Decrypts the key of one account into memory.
	pub fn decrypt_account(
		&mut self,
		script_hash: &H160,
		password: &str,
	) -> Result<(), WalletError> {
		let params = self.scrypt_params;
		let account = self
			.accounts
			.iter_mut()
			.find(|a| a.get_script_hash() == *script_hash)
			.ok_or_else(|| WalletError::AccountNotFound(script_hash.to_address()))?;
		account.decrypt_private_key(password, params)?;
		Ok(())
	}

	/// Renders the wallet into its NEP-6 document. Fails if any account
	/// still holds an unencrypted key; callers run
	/// [`Wallet::encrypt_accounts`] first.
	pub fn to_nep6(&self) -> Result<NEP6Wallet, WalletError> {
		let accounts: Result<Vec<_>, _> =
			self.accounts.iter().map(NEP6Account::from_account).collect();
		Ok(NEP6Wallet {
			name: self.name.clone(),
			version: self.version.clone(),
			scrypt: self.scrypt_params,
			accounts: accounts?,
			extra: None,
		})
	}

	/// Builds a wallet from a parsed NEP-6 document. Exactly one account
	/// may be flagged default; with none flagged, the first account is
	/// promoted.
	pub fn from_nep6(document: NEP6Wallet) -> Result<Self, WalletError> {
		let defaults = document.accounts.iter().filter(|a| a.is_default).count();
		if defaults > 1 {
			return Err(WalletError::InvalidWallet(
				"more than one account is flagged as default".to_string(),
			))
		}

		let accounts: Result<Vec<Account>, _> =
			document.accounts.iter().map(NEP6Account::to_account).collect();
		let accounts = accounts?;

		let default_index = if defaults == 1 {
			accounts.iter().position(|a| a.is_default())
		} else if accounts.is_empty() {
			None
		} else {
			Some(0)
		};

		let mut wallet = Self {
			name: document.name,
			version: document.version,
			scrypt_params: document.scrypt,
			accounts,
			default_index,
		};
		if let Some(index) = wallet.default_index {
			wallet.set_default_index(index);
		}
		Ok(wallet)
	}

	/// Reads a wallet from a NEP-6 JSON file.
	pub fn from_file(path: &Path) -> Result<Self, WalletError> {
		let raw = fs::read_to_string(path)?;
		let document: NEP6Wallet = serde_json::from_str(&raw)?;
		debug!(wallet = %document.name, accounts = document.accounts.len(), "loaded wallet file");
		Self::from_nep6(document)
	}

	/// Writes the wallet as a NEP-6 JSON file. Accounts added since the
	/// last save must be encrypted under `password` first.
	pub fn save_to_file(&mut self, path: &Path, password: &str) -> Result<(), WalletError> {
		self.encrypt_accounts(password)?;
		let document = self.to_nep6()?;
		fs::write(path, serde_json::to_string_pretty(&document)?)?;
		debug!(wallet = %self.name, path = %path.display(), "saved wallet file");
		Ok(())
	}

	/// Creates a wallet holding one fresh, NEP-2 encrypted account.
	pub fn create(name: &str, password: &str) -> Result<Self, WalletError> {
		let mut wallet = Self::new(name);
		let account = Account::create()?;
		wallet.add_account(account)?;
		wallet.encrypt_accounts(password)?;
		Ok(wallet)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_crypto::KeyPair;

	fn account() -> Account {
		Account::from_key_pair(KeyPair::new_random(), None, None).unwrap()
	}

	fn light_wallet(name: &str) -> Wallet {
		let mut wallet = Wallet::new(name);
		wallet.set_scrypt_params(ScryptParamsDef::light());
		wallet
	}

	#[test]
	fn test_first_account_becomes_default() {
		let mut wallet = light_wallet("w");
		let first = account();
		let second = account();
		wallet.add_account(first.clone()).unwrap();
		wallet.add_account(second.clone()).unwrap();

		assert_eq!(
			wallet.default_account().unwrap().get_script_hash(),
			first.get_script_hash()
		);
		assert!(wallet.accounts()[0].is_default());
		assert!(!wallet.accounts()[1].is_default());
	}

	#[test]
	fn test_duplicate_account_rejected() {
		let mut wallet = light_wallet("w");
		let acc = account();
		wallet.add_account(acc.clone()).unwrap();
		assert!(wallet.add_account(acc).is_err());
	}

	#[test]
	fn test_remove_missing_account_fails() {
		let mut wallet = light_wallet("w");
		assert!(matches!(
			wallet.remove_account("NLnyLtep7jwyq1qhNPkwXbJpurC4jUT8ke"),
			Err(WalletError::AccountNotFound(_))
		));
	}

	#[test]
	fn test_removing_default_promotes_first_remaining() {
		let mut wallet = light_wallet("w");
		let first = account();
		let second = account();
		wallet.add_account(first.clone()).unwrap();
		wallet.add_account(second.clone()).unwrap();

		wallet.remove_account(&first.get_address()).unwrap();
		assert_eq!(
			wallet.default_account().unwrap().get_script_hash(),
			second.get_script_hash()
		);
	}

	#[test]
	fn test_removing_non_default_keeps_default() {
		let mut wallet = light_wallet("w");
		let first = account();
		let second = account();
		let third = account();
		wallet.add_account(first.clone()).unwrap();
		wallet.add_account(second.clone()).unwrap();
		wallet.add_account(third.clone()).unwrap();
		wallet.set_default_account(&third.get_script_hash()).unwrap();

		wallet.remove_account(&second.get_address()).unwrap();
		assert_eq!(
			wallet.default_account().unwrap().get_script_hash(),
			third.get_script_hash()
		);
	}

	#[test]
	fn test_document_roundtrip() {
		let mut wallet = light_wallet("roundtrip");
		wallet.add_account(account()).unwrap();
		wallet.add_account(account()).unwrap();
		wallet.encrypt_accounts("pw").unwrap();

		let document = wallet.to_nep6().unwrap();
		let json = serde_json::to_string(&document).unwrap();
		let parsed: NEP6Wallet = serde_json::from_str(&json).unwrap();
		let restored = Wallet::from_nep6(parsed).unwrap();

		assert_eq!(restored.name(), "roundtrip");
		assert_eq!(restored.accounts().len(), 2);
		assert_eq!(restored.scrypt_params(), ScryptParamsDef::light());
		assert_eq!(
			restored.default_account().unwrap().get_script_hash(),
			wallet.default_account().unwrap().get_script_hash()
		);
	}

	#[test]
	fn test_multiple_defaults_rejected() {
		let mut wallet = light_wallet("w");
		wallet.add_account(account()).unwrap();
		wallet.add_account(account()).unwrap();
		wallet.encrypt_accounts("pw").unwrap();

		let mut document = wallet.to_nep6().unwrap();
		for entry in &mut document.accounts {
			entry.is_default = true;
		}
		assert!(matches!(Wallet::from_nep6(document), Err(WalletError::InvalidWallet(_))));
	}

	#[test]
	fn test_unflagged_default_promotes_first() {
		let mut wallet = light_wallet("w");
		wallet.add_account(account()).unwrap();
		wallet.add_account(account()).unwrap();
		wallet.encrypt_accounts("pw").unwrap();

		let mut document = wallet.to_nep6().unwrap();
		for entry in &mut document.accounts {
			entry.is_default = false;
		}
		let restored = Wallet::from_nep6(document).unwrap();
		assert_eq!(
			restored.default_account().unwrap().get_address(),
			restored.accounts()[0].get_address()
		);
	}

	#[test]
	fn test_save_and_load_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("wallet.json");

		let mut wallet = light_wallet("disk");
		let acc = account();
		let original_key = acc.key_pair().unwrap().private_key_bytes();
		let script_hash = acc.get_script_hash();
		wallet.add_account(acc).unwrap();
		wallet.save_to_file(&path, "pw").unwrap();

		let mut restored = Wallet::from_file(&path).unwrap();
		assert_eq!(restored.name(), "disk");
		assert!(restored.get_account(&script_hash).unwrap().key_pair().is_none());

		restored.decrypt_account(&script_hash, "pw").unwrap();
		assert_eq!(
			restored.get_account(&script_hash).unwrap().key_pair().unwrap().private_key_bytes(),
			original_key
		);
	}

	#[test]
	fn test_create_encrypts_the_fresh_account() {
		// default scrypt profile here would make the test take seconds
		let mut wallet = light_wallet("fresh");
		let acc = account();
		wallet.add_account(acc).unwrap();
		wallet.encrypt_accounts("pw").unwrap();
		assert!(wallet.accounts()[0].encrypted_private_key().unwrap().starts_with("6P"));
	}
}
