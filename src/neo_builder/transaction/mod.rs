mod invocation_script;
mod signer;
mod transaction;
mod transaction_attribute;
mod transaction_builder;
mod verification_script;
mod witness;
mod witness_rule;
mod witness_scope;

pub use invocation_script::*;
pub use signer::*;
pub use transaction::*;
pub use transaction_attribute::*;
pub use transaction_builder::*;
pub use verification_script::*;
pub use witness::*;
pub use witness_rule::*;
pub use witness_scope::*;
