mod error;
mod script;
mod transaction;

pub use error::*;
pub use script::*;
pub use transaction::*;
