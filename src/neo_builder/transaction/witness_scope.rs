use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// One flag of a signer's witness scope bitmask.
///
/// `Global` is mutually exclusive with every other flag; the check lives in
/// `Signer`, which owns the combination.
#[derive(
	Display,
	EnumString,
	TryFromPrimitive,
	Debug,
	Copy,
	Clone,
	Hash,
	PartialEq,
	Eq,
	Serialize,
	Deserialize,
)]
#[repr(u8)]
pub enum WitnessScope {
	#[strum(serialize = "None")]
	#[serde(rename = "None")]
	None = 0x00,
	#[strum(serialize = "CalledByEntry")]
	#[serde(rename = "CalledByEntry")]
	CalledByEntry = 0x01,
	#[strum(serialize = "CustomContracts")]
	#[serde(rename = "CustomContracts")]
	CustomContracts = 0x10,
	#[strum(serialize = "CustomGroups")]
	#[serde(rename = "CustomGroups")]
	CustomGroups = 0x20,
	#[strum(serialize = "WitnessRules")]
	#[serde(rename = "WitnessRules")]
	WitnessRules = 0x40,
	#[strum(serialize = "Global")]
	#[serde(rename = "Global")]
	Global = 0x80,
}

impl WitnessScope {
	pub fn byte_repr(&self) -> u8 {
		*self as u8
	}

	/// Packs a set of flags into the wire bitmask.
	pub fn combine(scopes: &[Self]) -> u8 {
		scopes.iter().fold(0, |flags, scope| flags | scope.byte_repr())
	}

	/// Unpacks a wire bitmask into its flags. A zero mask is the `None`
	/// scope.
	pub fn split(flags: u8) -> Vec<Self> {
		if flags == 0 {
			return vec![Self::None]
		}

		[
			Self::CalledByEntry,
			Self::CustomContracts,
			Self::CustomGroups,
			Self::WitnessRules,
			Self::Global,
		]
		.into_iter()
		.filter(|scope| flags & scope.byte_repr() != 0)
		.collect()
	}
}
