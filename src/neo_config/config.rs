use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Known Neo N3 networks and their magic numbers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeoNetwork {
	MainNet,
	TestNet,
	PrivateNet(u32),
}

impl NeoNetwork {
	pub fn to_magic(&self) -> u32 {
		match self {
			NeoNetwork::MainNet => 860_833_102,
			NeoNetwork::TestNet => 894_710_606,
			NeoNetwork::PrivateNet(magic) => *magic,
		}
	}

	pub fn from_magic(magic: u32) -> NeoNetwork {
		match magic {
			860_833_102 => NeoNetwork::MainNet,
			894_710_606 => NeoNetwork::TestNet,
			other => NeoNetwork::PrivateNet(other),
		}
	}
}

/// Target block time of Neo N3 in milliseconds.
pub const DEFAULT_BLOCK_TIME: u64 = 15_000;

/// Address version byte of Neo N3 mainnet.
pub const DEFAULT_ADDRESS_VERSION: u8 = 0x35;

static ADDRESS_VERSION: AtomicU8 = AtomicU8::new(DEFAULT_ADDRESS_VERSION);

/// Returns the address version byte used for address encoding and decoding.
pub fn address_version() -> u8 {
	ADDRESS_VERSION.load(Ordering::Relaxed)
}

/// Overrides the global address version byte. Affects every address that is
/// encoded or decoded afterwards, so hosts targeting a non-default network
/// should set this once at startup.
pub fn set_address_version(version: u8) {
	ADDRESS_VERSION.store(version, Ordering::Relaxed);
}
