mod client;
mod error;
mod http;
mod jsonrpc;
mod service;

pub use client::*;
pub use error::*;
pub use http::*;
pub use jsonrpc::*;
pub use service::*;
