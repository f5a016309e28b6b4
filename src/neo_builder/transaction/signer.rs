use getset::Getters;
use primitive_types::H160;
use serde::{Deserialize, Serialize};

use crate::{
	neo_builder::{BuilderError, WitnessRule, WitnessScope},
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait},
	neo_config::NeoConstants,
	neo_crypto::Secp256r1PublicKey,
	neo_types::{deserialize_h160, serialize_h160},
};

/// One authorizing party of a transaction: an account plus the scope its
/// witness is valid in.
///
/// The `Global` scope excludes every other flag. The `CustomContracts`,
/// `CustomGroups` and `WitnessRules` scopes carry allow-lists of at most
/// sixteen entries each.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct Signer {
	#[serde(rename = "account", serialize_with = "serialize_h160", deserialize_with = "deserialize_h160")]
	account: H160,
	#[serde(rename = "scopes")]
	scopes: Vec<WitnessScope>,
	#[serde(rename = "allowedcontracts", default, skip_serializing_if = "Vec::is_empty")]
	allowed_contracts: Vec<H160>,
	#[serde(rename = "allowedgroups", default, skip_serializing_if = "Vec::is_empty")]
	allowed_groups: Vec<Secp256r1PublicKey>,
	#[serde(rename = "rules", default, skip_serializing_if = "Vec::is_empty")]
	rules: Vec<WitnessRule>,
}

impl Signer {
	fn with_scope(account: H160, scope: WitnessScope) -> Self {
		Self {
			account,
			scopes: vec![scope],
			allowed_contracts: Vec::new(),
			allowed_groups: Vec::new(),
			rules: Vec::new(),
		}
	}

	/// A signer whose witness only covers fee payment.
	pub fn none(account: H160) -> Self {
		Self::with_scope(account, WitnessScope::None)
	}

	/// A signer valid when the invocation entry point carries its script.
	pub fn called_by_entry(account: H160) -> Self {
		Self::with_scope(account, WitnessScope::CalledByEntry)
	}

	/// An unconstrained signer.
	pub fn global(account: H160) -> Self {
		Self::with_scope(account, WitnessScope::Global)
	}

	fn has_scope(&self, scope: WitnessScope) -> bool {
		self.scopes.contains(&scope)
	}

	fn reject_global(&self, what: &str) -> Result<(), BuilderError> {
		if self.has_scope(WitnessScope::Global) {
			return Err(BuilderError::SignerConfiguration(format!(
				"a signer with global scope cannot carry {}",
				what
			)))
		}
		Ok(())
	}

	fn add_scope(&mut self, scope: WitnessScope) {
		if !self.has_scope(scope) {
			self.scopes.retain(|s| *s != WitnessScope::None);
			self.scopes.push(scope);
		}
	}

	/// Restricts the witness to the given contracts, adding the
	/// `CustomContracts` scope.
	pub fn set_allowed_contracts(&mut self, contracts: Vec<H160>) -> Result<&mut Self, BuilderError> {
		self.reject_global("contract allow-lists")?;
		if self.allowed_contracts.len() + contracts.len() > NeoConstants::MAX_SUBITEMS {
			return Err(BuilderError::SignerConfiguration(format!(
				"a signer carries at most {} allowed contracts",
				NeoConstants::MAX_SUBITEMS
			)))
		}
		self.add_scope(WitnessScope::CustomContracts);
		self.allowed_contracts.extend(contracts);
		Ok(self)
	}

	/// Restricts the witness to contracts of the given groups, adding the
	/// `CustomGroups` scope.
	pub fn set_allowed_groups(
		&mut self,
		groups: Vec<Secp256r1PublicKey>,
	) -> Result<&mut Self, BuilderError> {
		self.reject_global("group allow-lists")?;
		if self.allowed_groups.len() + groups.len() > NeoConstants::MAX_SUBITEMS {
			return Err(BuilderError::SignerConfiguration(format!(
				"a signer carries at most {} allowed groups",
				NeoConstants::MAX_SUBITEMS
			)))
		}
		self.add_scope(WitnessScope::CustomGroups);
		self.allowed_groups.extend(groups);
		Ok(self)
	}

	/// Attaches witness rules, adding the `WitnessRules` scope.
	pub fn set_rules(&mut self, rules: Vec<WitnessRule>) -> Result<&mut Self, BuilderError> {
		self.reject_global("witness rules")?;
		if self.rules.len() + rules.len() > NeoConstants::MAX_SUBITEMS {
			return Err(BuilderError::SignerConfiguration(format!(
				"a signer carries at most {} witness rules",
				NeoConstants::MAX_SUBITEMS
			)))
		}
		for rule in &rules {
			rule.condition.validate()?;
		}
		self.add_scope(WitnessScope::WitnessRules);
		self.rules.extend(rules);
		Ok(self)
	}
}

impl NeoSerializable for Signer {
	type Error = CodecError;

	fn size(&self) -> usize {
		let mut size = NeoConstants::HASH160_SIZE + 1;
		if self.has_scope(WitnessScope::CustomContracts) {
			size += self.allowed_contracts.var_size();
		}
		if self.has_scope(WitnessScope::CustomGroups) {
			size += self.allowed_groups.var_size();
		}
		if self.has_scope(WitnessScope::WitnessRules) {
			size += self.rules.var_size();
		}
		size
	}

	fn encode(&self, writer: &mut Encoder) {
		self.account.encode(writer);
		writer.write_u8(WitnessScope::combine(&self.scopes));
		if self.has_scope(WitnessScope::CustomContracts) {
			writer.write_serializable_variable_list(&self.allowed_contracts);
		}
		if self.has_scope(WitnessScope::CustomGroups) {
			writer.write_serializable_variable_list(&self.allowed_groups);
		}
		if self.has_scope(WitnessScope::WitnessRules) {
			writer.write_serializable_variable_list(&self.rules);
		}
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let account = H160::decode(reader)?;
		let flags = reader.read_u8()?;
		let scopes = WitnessScope::split(flags);

		if flags & WitnessScope::Global.byte_repr() != 0 && flags != WitnessScope::Global.byte_repr()
		{
			return Err(CodecError::InvalidFormat(
				"the global scope excludes all other scopes".to_string(),
			))
		}

		let mut signer = Signer {
			account,
			scopes,
			allowed_contracts: Vec::new(),
			allowed_groups: Vec::new(),
			rules: Vec::new(),
		};

		if signer.has_scope(WitnessScope::CustomContracts) {
			signer.allowed_contracts = reader.read_serializable_list::<H160>()?;
			if signer.allowed_contracts.len() > NeoConstants::MAX_SUBITEMS {
				return Err(CodecError::InvalidFormat(
					"too many allowed contracts".to_string(),
				))
			}
		}
		if signer.has_scope(WitnessScope::CustomGroups) {
			signer.allowed_groups = reader.read_serializable_list::<Secp256r1PublicKey>()?;
			if signer.allowed_groups.len() > NeoConstants::MAX_SUBITEMS {
				return Err(CodecError::InvalidFormat("too many allowed groups".to_string()))
			}
		}
		if signer.has_scope(WitnessScope::WitnessRules) {
			signer.rules = reader.read_serializable_list::<WitnessRule>()?;
			if signer.rules.len() > NeoConstants::MAX_SUBITEMS {
				return Err(CodecError::InvalidFormat("too many witness rules".to_string()))
			}
		}

		Ok(signer)
	}
}
