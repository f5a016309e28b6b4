use primitive_types::H160;

use crate::{
	neo_builder::VerificationScript,
	neo_crypto::{KeyPair, Secp256r1PublicKey},
	neo_protocol::{nep2_decrypt, nep2_encrypt, ProtocolError, ScryptParamsDef},
	neo_types::{Address, ScriptHashExtension},
};

/// A Neo account: a script hash plus, optionally, the verification script
/// and key material that control it.
///
/// Watch-only accounts carry neither key pair nor NEP-2 ciphertext. A locked
/// account refuses to hand out its plaintext key, but an already decrypted
/// in-memory pair stays as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
	key_pair: Option<KeyPair>,
	script_hash: H160,
	label: Option<String>,
	verification_script: Option<VerificationScript>,
	is_default: bool,
	is_locked: bool,
	encrypted_private_key: Option<String>,
	signing_threshold: Option<u32>,
	nr_of_participants: Option<u32>,
}

impl Account {
	/// Creates a fresh account on a random key pair.
	pub fn create() -> Result<Self, ProtocolError> {
		Self::from_key_pair(KeyPair::new_random(), None, None)
	}

	/// Wraps an existing key pair. The threshold/participants pair is only
	/// set when the account backs one seat of a multi-sig contract.
	pub fn from_key_pair(
		key_pair: KeyPair,
		signing_threshold: Option<u32>,
		nr_of_participants: Option<u32>,
	) -> Result<Self, ProtocolError> {
		let verification_script = VerificationScript::from_public_key(key_pair.public_key());
		let script_hash = verification_script.hash();
		Ok(Self {
			key_pair: Some(key_pair),
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: Some(verification_script),
			is_default: false,
			is_locked: false,
			encrypted_private_key: None,
			signing_threshold,
			nr_of_participants,
		})
	}

	pub fn from_wif(wif: &str) -> Result<Self, ProtocolError> {
		Self::from_key_pair(KeyPair::from_wif(wif)?, None, None)
	}

	pub fn from_public_key(public_key: &Secp256r1PublicKey) -> Result<Self, ProtocolError> {
		let verification_script = VerificationScript::from_public_key(public_key);
		let script_hash = verification_script.hash();
		Ok(Self {
			key_pair: None,
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: Some(verification_script),
			..Default::default()
		})
	}

	/// The m-of-n account over a set of public keys.
	pub fn multi_sig_from_public_keys(
		public_keys: &[Secp256r1PublicKey],
		signing_threshold: u8,
	) -> Result<Self, ProtocolError> {
		let verification_script =
			VerificationScript::from_multi_sig(public_keys, signing_threshold)?;
		let script_hash = verification_script.hash();
		Ok(Self {
			key_pair: None,
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: Some(verification_script),
			signing_threshold: Some(signing_threshold as u32),
			nr_of_participants: Some(public_keys.len() as u32),
			..Default::default()
		})
	}

	/// A watch-only account for an address.
	pub fn from_address(address: &str) -> Result<Self, ProtocolError> {
		let script_hash = H160::from_address(address)
			.map_err(|e| ProtocolError::InvalidFormat(e.to_string()))?;
		Ok(Self::from_script_hash(script_hash))
	}

	/// A watch-only account for a script hash.
	pub fn from_script_hash(script_hash: H160) -> Self {
		Self {
			script_hash,
			label: Some(script_hash.to_address()),
			..Default::default()
		}
	}

	pub fn get_script_hash(&self) -> H160 {
		self.script_hash
	}

	pub fn get_address(&self) -> Address {
		self.script_hash.to_address()
	}

	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	pub fn set_label(&mut self, label: Option<String>) {
		self.label = label;
	}

	pub fn verification_script(&self) -> Option<&VerificationScript> {
		self.verification_script.as_ref()
	}

	pub fn key_pair(&self) -> Option<&KeyPair> {
		self.key_pair.as_ref()
	}

	pub fn encrypted_private_key(&self) -> Option<&str> {
		self.encrypted_private_key.as_deref()
	}

	pub(crate) fn set_encrypted_private_key(&mut self, nep2: Option<String>) {
		self.encrypted_private_key = nep2;
	}

	pub(crate) fn set_key_pair(&mut self, key_pair: Option<KeyPair>) {
		self.key_pair = key_pair;
	}

	pub fn is_default(&self) -> bool {
		self.is_default
	}

	pub(crate) fn set_default(&mut self, is_default: bool) {
		self.is_default = is_default;
	}

	pub fn is_locked(&self) -> bool {
		self.is_locked
	}

	/// Locks the account: plaintext key export is refused until unlocked.
	pub fn lock(&mut self) {
		self.is_locked = true;
	}

	pub fn unlock(&mut self) {
		self.is_locked = false;
	}

	pub fn is_multi_sig(&self) -> bool {
		self.signing_threshold.is_some() && self.nr_of_participants.is_some()
	}

	pub fn signing_threshold(&self) -> Option<u32> {
		self.signing_threshold
	}

	pub fn nr_of_participants(&self) -> Option<u32> {
		self.nr_of_participants
	}

	pub(crate) fn set_multi_sig_shape(
		&mut self,
		signing_threshold: Option<u32>,
		nr_of_participants: Option<u32>,
	) {
		self.signing_threshold = signing_threshold;
		self.nr_of_participants = nr_of_participants;
	}

	pub(crate) fn set_verification_script(&mut self, script: Option<VerificationScript>) {
		self.verification_script = script;
	}

	/// Encrypts the in-memory key pair into the NEP-2 slot. The decrypted
	/// pair stays available until dropped.
	pub fn encrypt_private_key(
		&mut self,
		password: &str,
		params: ScryptParamsDef,
	) -> Result<(), ProtocolError> {
		let key_pair = self.key_pair.as_ref().ok_or_else(|| {
			ProtocolError::NoKey("the account holds no decrypted key pair".to_string())
		})?;
		self.encrypted_private_key = Some(nep2_encrypt(password, key_pair, params)?);
		Ok(())
	}

	/// Recovers the key pair from the NEP-2 slot into memory.
	pub fn decrypt_private_key(
		&mut self,
		password: &str,
		params: ScryptParamsDef,
	) -> Result<(), ProtocolError> {
		if self.key_pair.is_some() {
			return Ok(())
		}
		let nep2 = self.encrypted_private_key.as_ref().ok_or_else(|| {
			ProtocolError::NoKey("the account holds no encrypted key".to_string())
		})?;
		let key_pair = nep2_decrypt(password, nep2, params)?;
		if VerificationScript::from_public_key(key_pair.public_key()).hash() != self.script_hash {
			return Err(ProtocolError::InvalidState(
				"the decrypted key does not control this account".to_string(),
			))
		}
		self.key_pair = Some(key_pair);
		Ok(())
	}

	/// Exports the plaintext key as WIF. Refused while the account is
	/// locked.
	pub fn export_wif(&self) -> Result<String, ProtocolError> {
		if self.is_locked {
			return Err(ProtocolError::InvalidState(
				"a locked account does not export its key".to_string(),
			))
		}
		let key_pair = self.key_pair.as_ref().ok_or_else(|| {
			ProtocolError::NoKey("the account holds no decrypted key pair".to_string())
		})?;
		Ok(key_pair.export_as_wif())
	}
}

impl From<H160> for Account {
	fn from(script_hash: H160) -> Self {
		Account::from_script_hash(script_hash)
	}
}
