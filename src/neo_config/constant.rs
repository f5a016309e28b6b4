/// Protocol-level constants shared across the SDK.
pub struct NeoConstants {}

impl NeoConstants {
	// Accounts, addresses, keys
	pub const MAX_PUBLIC_KEYS_PER_MULTI_SIG: u32 = 1024;
	pub const HASH160_SIZE: usize = 20;
	pub const HASH256_SIZE: usize = 32;
	pub const PRIVATE_KEY_SIZE: usize = 32;
	pub const PUBLIC_KEY_SIZE_COMPRESSED: usize = 33;
	pub const PUBLIC_KEY_SIZE_UNCOMPRESSED: usize = 65;
	pub const SIGNATURE_SIZE: usize = 64;
	pub const VERIFICATION_SCRIPT_SIZE: usize = 40;

	// Composite limits shared by signers and witness rules
	pub const MAX_SUBITEMS: usize = 16;
	pub const MAX_NESTING_DEPTH: u8 = 2;

	// Transactions
	pub const CURRENT_TX_VERSION: u8 = 0;
	pub const MAX_TRANSACTION_SIZE: usize = 102_400;
	pub const MAX_SCRIPT_SIZE: usize = 65_535;
	pub const MAX_TRANSACTION_ATTRIBUTES: usize = 16;
	pub const MAX_SIGNERS: usize = 16;
	pub const MAX_VALID_UNTIL_BLOCK_INCREMENT: u32 = 5760;

	// NEP-2 payload framing
	pub const NEP2_PREFIX_1: u8 = 0x01;
	pub const NEP2_PREFIX_2: u8 = 0x42;
	pub const NEP2_FLAG: u8 = 0xE0;
	pub const NEP2_SIZE: usize = 39;

	// Scrypt defaults for NEP-2 (N = 16384, r = 8, p = 8)
	pub const SCRYPT_N: u32 = 16_384;
	pub const SCRYPT_LOG_N: u8 = 14;
	pub const SCRYPT_R: u32 = 8;
	pub const SCRYPT_P: u32 = 8;
	pub const SCRYPT_DK_LEN: usize = 64;

	pub const SEED_1: &'static str = "https://mainnet1.neo.coz.io:443";
	pub const SEED_2: &'static str = "https://mainnet2.neo.coz.io:443";
	pub const SEED_3: &'static str = "https://mainnet3.neo.coz.io:443";
}
