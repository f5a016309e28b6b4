use num_enum::TryFromPrimitive;
use primitive_types::H160;
use serde::{
	de::Error as DeError, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use crate::{
	neo_codec::{CodecError, Decoder, Encoder, NeoSerializable},
	neo_config::NeoConstants,
	neo_crypto::Secp256r1PublicKey,
	neo_types::ScriptHashExtension,
};

/// Whether a matching witness rule admits or refuses the witness.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[repr(u8)]
pub enum WitnessAction {
	Deny = 0,
	Allow = 1,
}

/// The predicate of a witness rule. Conditions form a tree; composites may
/// nest at most [`WitnessCondition::MAX_NESTING_DEPTH`] levels deep and
/// carry at most [`NeoConstants::MAX_SUBITEMS`] children.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum WitnessCondition {
	Boolean(bool),
	Not(Box<WitnessCondition>),
	And(Vec<WitnessCondition>),
	Or(Vec<WitnessCondition>),
	ScriptHash(H160),
	Group(Secp256r1PublicKey),
	CalledByEntry,
	CalledByContract(H160),
	CalledByGroup(Secp256r1PublicKey),
}

/// One signer-scoped rule: an action applied when the condition holds.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct WitnessRule {
	pub action: WitnessAction,
	pub condition: WitnessCondition,
}

impl WitnessCondition {
	pub const MAX_NESTING_DEPTH: u8 = NeoConstants::MAX_NESTING_DEPTH;

	const BOOLEAN_BYTE: u8 = 0x00;
	const NOT_BYTE: u8 = 0x01;
	const AND_BYTE: u8 = 0x02;
	const OR_BYTE: u8 = 0x03;
	const SCRIPT_HASH_BYTE: u8 = 0x18;
	const GROUP_BYTE: u8 = 0x19;
	const CALLED_BY_ENTRY_BYTE: u8 = 0x20;
	const CALLED_BY_CONTRACT_BYTE: u8 = 0x28;
	const CALLED_BY_GROUP_BYTE: u8 = 0x29;

	/// The JSON tag of this condition.
	pub fn json_value(&self) -> &'static str {
		match self {
			WitnessCondition::Boolean(_) => "Boolean",
			WitnessCondition::Not(_) => "Not",
			WitnessCondition::And(_) => "And",
			WitnessCondition::Or(_) => "Or",
			WitnessCondition::ScriptHash(_) => "ScriptHash",
			WitnessCondition::Group(_) => "Group",
			WitnessCondition::CalledByEntry => "CalledByEntry",
			WitnessCondition::CalledByContract(_) => "CalledByContract",
			WitnessCondition::CalledByGroup(_) => "CalledByGroup",
		}
	}

	/// The wire type tag of this condition.
	pub fn byte(&self) -> u8 {
		match self {
			WitnessCondition::Boolean(_) => Self::BOOLEAN_BYTE,
			WitnessCondition::Not(_) => Self::NOT_BYTE,
			WitnessCondition::And(_) => Self::AND_BYTE,
			WitnessCondition::Or(_) => Self::OR_BYTE,
			WitnessCondition::ScriptHash(_) => Self::SCRIPT_HASH_BYTE,
			WitnessCondition::Group(_) => Self::GROUP_BYTE,
			WitnessCondition::CalledByEntry => Self::CALLED_BY_ENTRY_BYTE,
			WitnessCondition::CalledByContract(_) => Self::CALLED_BY_CONTRACT_BYTE,
			WitnessCondition::CalledByGroup(_) => Self::CALLED_BY_GROUP_BYTE,
		}
	}

	fn depth(&self) -> u8 {
		match self {
			WitnessCondition::Not(inner) => 1 + inner.depth(),
			WitnessCondition::And(children) | WitnessCondition::Or(children) =>
				1 + children.iter().map(WitnessCondition::depth).max().unwrap_or(0),
			_ => 0,
		}
	}

	/// Validates the structural limits: nesting depth and composite sizes.
	pub fn validate(&self) -> Result<(), CodecError> {
		if self.depth() > Self::MAX_NESTING_DEPTH {
			return Err(CodecError::InvalidFormat(format!(
				"witness conditions nest at most {} levels",
				Self::MAX_NESTING_DEPTH
			)))
		}
		self.validate_sizes()
	}

	fn validate_sizes(&self) -> Result<(), CodecError> {
		match self {
			WitnessCondition::Not(inner) => inner.validate_sizes(),
			WitnessCondition::And(children) | WitnessCondition::Or(children) => {
				if children.is_empty() || children.len() > NeoConstants::MAX_SUBITEMS {
					return Err(CodecError::InvalidFormat(format!(
						"composite conditions take 1 to {} sub-expressions",
						NeoConstants::MAX_SUBITEMS
					)))
				}
				children.iter().try_for_each(WitnessCondition::validate_sizes)
			},
			_ => Ok(()),
		}
	}
}

impl WitnessRule {
	pub fn new(action: WitnessAction, condition: WitnessCondition) -> Result<Self, CodecError> {
		condition.validate()?;
		Ok(Self { action, condition })
	}
}

impl NeoSerializable for WitnessCondition {
	type Error = CodecError;

	fn size(&self) -> usize {
		match self {
			WitnessCondition::Boolean(_) => 2,
			WitnessCondition::Not(inner) => 1 + inner.size(),
			WitnessCondition::And(children) | WitnessCondition::Or(children) =>
				2 + children.iter().map(|c| c.size()).sum::<usize>(),
			WitnessCondition::ScriptHash(_) | WitnessCondition::CalledByContract(_) => 1 + 20,
			WitnessCondition::Group(_) | WitnessCondition::CalledByGroup(_) => 1 + 33,
			WitnessCondition::CalledByEntry => 1,
		}
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.byte());
		match self {
			WitnessCondition::Boolean(value) => writer.write_bool(*value),
			WitnessCondition::Not(inner) => inner.encode(writer),
			WitnessCondition::And(children) | WitnessCondition::Or(children) =>
				writer.write_serializable_variable_list(children),
			WitnessCondition::ScriptHash(hash) | WitnessCondition::CalledByContract(hash) =>
				hash.encode(writer),
			WitnessCondition::Group(key) | WitnessCondition::CalledByGroup(key) =>
				key.encode(writer),
			WitnessCondition::CalledByEntry => {},
		}
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let condition = Self::decode_at_depth(reader, 0)?;
		condition.validate()?;
		Ok(condition)
	}
}

impl WitnessCondition {
	fn decode_at_depth(reader: &mut Decoder, depth: u8) -> Result<Self, CodecError> {
		if depth > Self::MAX_NESTING_DEPTH {
			return Err(CodecError::InvalidFormat(format!(
				"witness conditions nest at most {} levels",
				Self::MAX_NESTING_DEPTH
			)))
		}

		let tag = reader.read_u8()?;
		match tag {
			Self::BOOLEAN_BYTE => Ok(WitnessCondition::Boolean(reader.read_bool()?)),
			Self::NOT_BYTE => {
				let inner = Self::decode_at_depth(reader, depth + 1)?;
				Ok(WitnessCondition::Not(Box::new(inner)))
			},
			Self::AND_BYTE | Self::OR_BYTE => {
				let len = reader.read_var_int()? as usize;
				if len == 0 || len > NeoConstants::MAX_SUBITEMS {
					return Err(CodecError::InvalidFormat(format!(
						"composite conditions take 1 to {} sub-expressions",
						NeoConstants::MAX_SUBITEMS
					)))
				}
				let mut children = Vec::with_capacity(len);
				for _ in 0..len {
					children.push(Self::decode_at_depth(reader, depth + 1)?);
				}
				Ok(if tag == Self::AND_BYTE {
					WitnessCondition::And(children)
				} else {
					WitnessCondition::Or(children)
				})
			},
			Self::SCRIPT_HASH_BYTE | Self::CALLED_BY_CONTRACT_BYTE => {
				let hash = H160::decode(reader)?;
				Ok(if tag == Self::SCRIPT_HASH_BYTE {
					WitnessCondition::ScriptHash(hash)
				} else {
					WitnessCondition::CalledByContract(hash)
				})
			},
			Self::GROUP_BYTE | Self::CALLED_BY_GROUP_BYTE => {
				let key = Secp256r1PublicKey::decode(reader)?;
				Ok(if tag == Self::GROUP_BYTE {
					WitnessCondition::Group(key)
				} else {
					WitnessCondition::CalledByGroup(key)
				})
			},
			Self::CALLED_BY_ENTRY_BYTE => Ok(WitnessCondition::CalledByEntry),
			other =>
				Err(CodecError::InvalidFormat(format!("unknown condition tag 0x{:02x}", other))),
		}
	}
}

impl NeoSerializable for WitnessRule {
	type Error = CodecError;

	fn size(&self) -> usize {
		1 + self.condition.size()
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.action as u8);
		self.condition.encode(writer);
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		let action = WitnessAction::try_from(reader.read_u8()?)
			.map_err(|_| CodecError::InvalidFormat("unknown witness action".to_string()))?;
		let condition = WitnessCondition::decode(reader)?;
		Ok(Self { action, condition })
	}
}

impl Serialize for WitnessCondition {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("WitnessCondition", 2)?;
		state.serialize_field("type", self.json_value())?;
		match self {
			WitnessCondition::Boolean(value) => state.serialize_field("expression", value)?,
			WitnessCondition::Not(inner) => state.serialize_field("expression", inner)?,
			WitnessCondition::And(children) | WitnessCondition::Or(children) =>
				state.serialize_field("expressions", children)?,
			WitnessCondition::ScriptHash(hash) | WitnessCondition::CalledByContract(hash) =>
				state.serialize_field("hash", &format!("0x{}", hash.to_hex()))?,
			WitnessCondition::Group(key) | WitnessCondition::CalledByGroup(key) =>
				state.serialize_field("group", &key.get_encoded_compressed_hex())?,
			WitnessCondition::CalledByEntry => {},
		}
		state.end()
	}
}

impl<'de> Deserialize<'de> for WitnessCondition {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let json = Value::deserialize(deserializer)?;
		condition_from_json(&json).map_err(DeError::custom)
	}
}

fn condition_from_json(json: &Value) -> Result<WitnessCondition, String> {
	let tag = json
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| "witness condition without a type tag".to_string())?;

	match tag {
		"Boolean" => {
			let value = match json.get("expression") {
				Some(Value::Bool(b)) => *b,
				Some(Value::String(s)) => s == "true",
				_ => return Err("boolean condition without an expression".to_string()),
			};
			Ok(WitnessCondition::Boolean(value))
		},
		"Not" => {
			let inner = json
				.get("expression")
				.ok_or_else(|| "not condition without an expression".to_string())?;
			Ok(WitnessCondition::Not(Box::new(condition_from_json(inner)?)))
		},
		"And" | "Or" => {
			let raw = json
				.get("expressions")
				.and_then(Value::as_array)
				.ok_or_else(|| format!("{} condition without expressions", tag))?;
			let children: Result<Vec<_>, _> = raw.iter().map(condition_from_json).collect();
			let children = children?;
			Ok(if tag == "And" {
				WitnessCondition::And(children)
			} else {
				WitnessCondition::Or(children)
			})
		},
		"ScriptHash" | "CalledByContract" => {
			let text = json
				.get("hash")
				.and_then(Value::as_str)
				.ok_or_else(|| format!("{} condition without a hash", tag))?;
			let hash = H160::from_hex(text).map_err(|e| e.to_string())?;
			Ok(if tag == "ScriptHash" {
				WitnessCondition::ScriptHash(hash)
			} else {
				WitnessCondition::CalledByContract(hash)
			})
		},
		"Group" | "CalledByGroup" => {
			let text = json
				.get("group")
				.and_then(Value::as_str)
				.ok_or_else(|| format!("{} condition without a group", tag))?;
			let key = Secp256r1PublicKey::from_encoded(text)
				.ok_or_else(|| format!("invalid group key '{}'", text))?;
			Ok(if tag == "Group" {
				WitnessCondition::Group(key)
			} else {
				WitnessCondition::CalledByGroup(key)
			})
		},
		"CalledByEntry" => Ok(WitnessCondition::CalledByEntry),
		other => Err(format!("unknown witness condition type '{}'", other)),
	}
}

impl Serialize for WitnessRule {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut state = serializer.serialize_struct("WitnessRule", 2)?;
		state.serialize_field(
			"action",
			match self.action {
				WitnessAction::Deny => "Deny",
				WitnessAction::Allow => "Allow",
			},
		)?;
		state.serialize_field("condition", &self.condition)?;
		state.end()
	}
}

impl<'de> Deserialize<'de> for WitnessRule {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let json = Value::deserialize(deserializer)?;
		let action = match json.get("action").and_then(Value::as_str) {
			Some("Allow") => WitnessAction::Allow,
			Some("Deny") => WitnessAction::Deny,
			_ => return Err(DeError::custom("witness rule without a valid action")),
		};
		let condition = json
			.get("condition")
			.ok_or_else(|| DeError::custom("witness rule without a condition"))?;
		let condition = condition_from_json(condition).map_err(DeError::custom)?;
		Ok(WitnessRule { action, condition })
	}
}
