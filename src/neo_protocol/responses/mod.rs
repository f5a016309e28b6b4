mod contract_state;
mod express;
mod invocation_result;
mod neo_block;
mod neo_version;
mod node_info;
mod transaction_result;

pub use contract_state::*;
pub use express::*;
pub use invocation_result::*;
pub use neo_block::*;
pub use neo_version::*;
pub use node_info::*;
pub use transaction_result::*;
