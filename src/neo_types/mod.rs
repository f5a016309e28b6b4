mod contract_parameter;
mod error;
mod hash256;
mod op_code;
mod script_hash;
mod serde_utils;
mod stack_item;

pub use primitive_types::{H160, H256};

pub use contract_parameter::*;
pub use error::*;
pub use hash256::*;
pub use op_code::*;
pub use script_hash::*;
pub use serde_utils::*;
pub use stack_item::*;

/// Raw script or payload bytes.
pub type Bytes = Vec<u8>;

/// A Neo address in its textual base58check form.
pub type Address = String;
