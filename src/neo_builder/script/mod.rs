mod interop_service;
mod script_builder;

pub use interop_service::*;
pub use script_builder::*;
