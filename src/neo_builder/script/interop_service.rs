use strum_macros::{Display, EnumIter, EnumString};

use crate::neo_crypto::HashableForVec;

/// System calls the SDK emits into scripts. The wire identifier of a call
/// is the first four bytes of the SHA-256 of its name.
#[derive(Display, EnumString, EnumIter, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteropService {
	#[strum(serialize = "System.Crypto.CheckSig")]
	SystemCryptoCheckSig,
	#[strum(serialize = "System.Crypto.CheckMultisig")]
	SystemCryptoCheckMultisig,
	#[strum(serialize = "System.Contract.Call")]
	SystemContractCall,
	#[strum(serialize = "System.Contract.CreateStandardAccount")]
	SystemContractCreateStandardAccount,
	#[strum(serialize = "System.Contract.CreateMultisigAccount")]
	SystemContractCreateMultisigAccount,
	#[strum(serialize = "System.Runtime.CheckWitness")]
	SystemRuntimeCheckWitness,
}

impl InteropService {
	/// The four-byte call identifier.
	pub fn hash_bytes(&self) -> [u8; 4] {
		let digest = self.to_string().as_bytes().sha256();
		digest[..4].try_into().expect("SHA-256 digests are 32 bytes")
	}

	/// The call identifier as lowercase hex.
	pub fn hash(&self) -> String {
		hex::encode(self.hash_bytes())
	}

	/// Looks a service up by its four-byte identifier.
	pub fn from_hash(hash: &[u8; 4]) -> Option<InteropService> {
		use strum::IntoEnumIterator;
		InteropService::iter().find(|service| &service.hash_bytes() == hash)
	}
}
