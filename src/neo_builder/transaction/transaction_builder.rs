use getset::Getters;
use rand::Rng;

use crate::{
	neo_builder::{
		Signer, Transaction, TransactionAttribute, TransactionError, Witness,
	},
	neo_config::NeoConstants,
	neo_types::Bytes,
	neo_wallets::Wallet,
};

/// The lifecycle of a [`TransactionBuilder`].
///
/// A builder starts `Empty`, becomes `Configured` once it has a script and
/// at least one signer, `Built` after a successful [`TransactionBuilder::build`]
/// and `Signed` after [`TransactionBuilder::sign`]. Operations outside these
/// transitions fail with an invalid-state error and leave the builder
/// untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuilderState {
	Empty,
	Configured,
	Built,
	Signed,
}

/// Fluent assembly of Neo transactions.
///
/// # Examples
///
/// ```no_run
/// use neo3_core::prelude::{ScriptHash, Signer, TransactionBuilder, Wallet};
/// # fn example(account: ScriptHash, wallet: &Wallet) -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = TransactionBuilder::new();
/// builder
/// 	.set_script(vec![0x01, 0x02, 0x03])?
/// 	.add_signer(Signer::called_by_entry(account))?
/// 	.valid_until_block(1000)?
/// 	.system_fee(10)?
/// 	.network_fee(1)?;
/// builder.build()?;
/// let tx = builder.sign(wallet)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Getters)]
pub struct TransactionBuilder {
	state: Option<BuilderState>,
	version: u8,
	nonce: Option<u32>,
	valid_until_block: Option<u32>,
	reference_height: Option<u32>,
	system_fee: i64,
	network_fee: i64,
	#[getset(get = "pub")]
	signers: Vec<Signer>,
	#[getset(get = "pub")]
	attributes: Vec<TransactionAttribute>,
	script: Option<Bytes>,
	built: Option<Transaction>,
}

impl TransactionBuilder {
	pub fn new() -> Self {
		Self {
			state: Some(BuilderState::Empty),
			version: NeoConstants::CURRENT_TX_VERSION,
			nonce: None,
			valid_until_block: None,
			reference_height: None,
			system_fee: 0,
			network_fee: 0,
			signers: Vec::new(),
			attributes: Vec::new(),
			script: None,
			built: None,
		}
	}

	pub fn state(&self) -> BuilderState {
		self.state.unwrap_or(BuilderState::Empty)
	}

	fn ensure_configurable(&self) -> Result<(), TransactionError> {
		match self.state() {
			BuilderState::Empty | BuilderState::Configured => Ok(()),
			other => Err(TransactionError::InvalidState(format!(
				"a {:?} builder does not accept further configuration",
				other
			))),
		}
	}

	// Empty turns Configured once both script and a signer are present.
	fn refresh_state(&mut self) {
		if self.state() == BuilderState::Empty
			&& self.script.is_some()
			&& !self.signers.is_empty()
		{
			self.state = Some(BuilderState::Configured);
		}
	}

	pub fn version(&mut self, version: u8) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		self.version = version;
		Ok(self)
	}

	/// Sets the nonce. Left unset, `build` draws a uniformly random one.
	pub fn nonce(&mut self, nonce: u32) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		self.nonce = Some(nonce);
		Ok(self)
	}

	/// Sets the last block the transaction stays valid in. Mandatory before
	/// `build`; the chain-range check runs at build time against the
	/// reference height, when one is known.
	pub fn valid_until_block(&mut self, block: u32) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		if block == 0 {
			return Err(TransactionError::InvalidBlock(
				"the transaction must stay valid past block zero".to_string(),
			))
		}
		self.valid_until_block = Some(block);
		Ok(self)
	}

	/// Records the current chain height so `build` can range-check
	/// `valid_until_block` against it.
	pub fn reference_height(&mut self, height: u32) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		self.reference_height = Some(height);
		Ok(self)
	}

	pub fn system_fee(&mut self, fee: i64) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		if fee < 0 {
			return Err(TransactionError::TransactionConfiguration(
				"the system fee cannot be negative".to_string(),
			))
		}
		self.system_fee = fee;
		Ok(self)
	}

	pub fn network_fee(&mut self, fee: i64) -> Result<&mut Self, TransactionError> {
		// the network fee may still be written back onto a built transaction,
		// right before signing
		if fee < 0 {
			return Err(TransactionError::TransactionConfiguration(
				"the network fee cannot be negative".to_string(),
			))
		}
		match self.state() {
			BuilderState::Empty | BuilderState::Configured => {
				self.network_fee = fee;
			},
			BuilderState::Built => {
				self.network_fee = fee;
				if let Some(tx) = self.built.as_mut() {
					tx.network_fee = fee;
				}
			},
			BuilderState::Signed =>
				return Err(TransactionError::InvalidState(
					"a signed transaction's fees are frozen".to_string(),
				)),
		}
		Ok(self)
	}

	pub fn set_script(&mut self, script: Bytes) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		if script.is_empty() {
			return Err(TransactionError::EmptyScript)
		}
		if script.len() > NeoConstants::MAX_SCRIPT_SIZE {
			return Err(TransactionError::TransactionConfiguration(format!(
				"the script exceeds {} bytes",
				NeoConstants::MAX_SCRIPT_SIZE
			)))
		}
		self.script = Some(script);
		self.refresh_state();
		Ok(self)
	}

	/// Appends a signer. The first signer is the sender; duplicate accounts
	/// are rejected.
	pub fn add_signer(&mut self, signer: Signer) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		if self.signers.iter().any(|s| s.account() == signer.account()) {
			return Err(TransactionError::DuplicateSigner)
		}
		if self.signers.len() >= NeoConstants::MAX_SIGNERS {
			return Err(TransactionError::TooManySigners)
		}
		self.signers.push(signer);
		self.refresh_state();
		Ok(self)
	}

	pub fn add_attribute(
		&mut self,
		attribute: TransactionAttribute,
	) -> Result<&mut Self, TransactionError> {
		self.ensure_configurable()?;
		if self.attributes.len() >= NeoConstants::MAX_TRANSACTION_ATTRIBUTES {
			return Err(TransactionError::InvalidAttribute(format!(
				"a transaction carries at most {} attributes",
				NeoConstants::MAX_TRANSACTION_ATTRIBUTES
			)))
		}
		if matches!(attribute, TransactionAttribute::HighPriority)
			&& self.attributes.iter().any(|a| matches!(a, TransactionAttribute::HighPriority))
		{
			return Err(TransactionError::InvalidAttribute(
				"at most one high-priority attribute is allowed".to_string(),
			))
		}
		self.attributes.push(attribute);
		Ok(self)
	}

	pub fn is_high_priority(&self) -> bool {
		self.attributes.iter().any(|a| matches!(a, TransactionAttribute::HighPriority))
	}

	/// Assembles the unsigned transaction. Requires a configured builder
	/// with `valid_until_block` set and non-negative fees.
	pub fn build(&mut self) -> Result<&Transaction, TransactionError> {
		if self.state() != BuilderState::Configured {
			return Err(TransactionError::InvalidState(format!(
				"only a configured builder builds, this one is {:?}",
				self.state()
			)))
		}

		let valid_until_block = self.valid_until_block.ok_or_else(|| {
			TransactionError::InvalidBlock("valid_until_block was never set".to_string())
		})?;
		if let Some(height) = self.reference_height {
			if valid_until_block <= height
				|| valid_until_block > height + NeoConstants::MAX_VALID_UNTIL_BLOCK_INCREMENT
			{
				return Err(TransactionError::InvalidBlock(format!(
					"valid_until_block {} out of range for height {}",
					valid_until_block, height
				)))
			}
		}

		let tx = Transaction {
			version: self.version,
			nonce: self.nonce.unwrap_or_else(|| rand::thread_rng().gen()),
			system_fee: self.system_fee,
			network_fee: self.network_fee,
			valid_until_block,
			signers: self.signers.clone(),
			attributes: self.attributes.clone(),
			script: self.script.clone().expect("a configured builder holds a script"),
			witnesses: Vec::new(),
		};
		tx.validate()?;

		self.nonce = Some(tx.nonce);
		self.built = Some(tx);
		self.state = Some(BuilderState::Built);
		Ok(self.built.as_ref().expect("just built"))
	}

	/// The unsigned transaction of a `Built` (or `Signed`) builder.
	pub fn transaction(&self) -> Result<&Transaction, TransactionError> {
		self.built.as_ref().ok_or_else(|| {
			TransactionError::InvalidState("the transaction has not been built yet".to_string())
		})
	}

	/// Signs the built transaction: walks the signers in order, picks the
	/// matching unlocked account from the wallet and appends its witness.
	pub fn sign(&mut self, wallet: &Wallet) -> Result<Transaction, TransactionError> {
		if self.state() != BuilderState::Built {
			return Err(TransactionError::InvalidState(format!(
				"only a built transaction signs, this builder is {:?}",
				self.state()
			)))
		}

		let mut tx = self.built.clone().expect("a built builder holds a transaction");
		let hash_data = tx.get_hash_data();

		let mut witnesses = Vec::with_capacity(tx.signers.len());
		for signer in &tx.signers {
			let account = wallet.get_account(signer.account()).ok_or_else(|| {
				TransactionError::TransactionConfiguration(format!(
					"no account for signer 0x{:x} in the wallet",
					signer.account()
				))
			})?;
			if account.is_locked() {
				return Err(TransactionError::InvalidState(format!(
					"the account for signer 0x{:x} is locked",
					signer.account()
				)))
			}
			if account.is_multi_sig() {
				return Err(TransactionError::TransactionConfiguration(
					"multi-sig signers collect their witnesses out of band".to_string(),
				))
			}
			let key_pair = account.key_pair().ok_or_else(|| {
				TransactionError::TransactionConfiguration(format!(
					"the account for signer 0x{:x} holds no decrypted key",
					signer.account()
				))
			})?;
			witnesses.push(Witness::create(&hash_data, key_pair)?);
		}

		// all witnesses resolved; only now may the builder mutate
		for witness in witnesses {
			tx.add_witness(witness);
		}
		self.built = Some(tx.clone());
		self.state = Some(BuilderState::Signed);
		Ok(tx)
	}
}
