mod error;
mod nep6;
mod wallet;

pub use error::*;
pub use nep6::*;
pub use wallet::*;
