mod base58_helper;
mod bip32;
mod error;
mod hash;
mod key_pair;
mod keys;
mod wif;

pub use base58_helper::*;
pub use bip32::*;
pub use error::*;
pub use hash::*;
pub use key_pair::*;
pub use keys::*;
pub use wif::*;
