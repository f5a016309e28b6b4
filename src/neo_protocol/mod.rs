mod account;
mod error;
mod nep2;
pub mod responses;

pub use account::*;
pub use error::*;
pub use nep2::*;
pub use responses::*;
