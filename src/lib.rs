//! # neo3-core
//!
//! The core of a client-side SDK for the Neo N3 blockchain: build, sign and
//! submit transactions, manage accounts and NEP-6 wallets, and evaluate
//! contract invocations through a node's JSON-RPC interface.
//!
//! ## Quickstart: `prelude`
//!
//! A prelude re-exports the important types and traits:
//!
//! ```rust
//! use neo3_core::prelude::*;
//! ```
//!
//! ## Modules
//!
//! In ascending order of abstraction:
//!
//! - [`neo_config`] — protocol constants, network magic, the global address
//!   version byte.
//! - [`neo_codec`] — the [`Encoder`](neo_codec::Encoder) and
//!   [`Decoder`](neo_codec::Decoder) implementing Neo's little-endian wire
//!   framing, and the [`NeoSerializable`](neo_codec::NeoSerializable) trait.
//! - [`neo_crypto`] — secp256r1 key pairs with low-s ECDSA, digests, WIF,
//!   BIP-32 derivation.
//! - [`neo_types`] — hash identifiers, the VM value model
//!   ([`StackItem`](neo_types::StackItem)) and invocation arguments
//!   ([`ContractParameter`](neo_types::ContractParameter)).
//! - [`neo_builder`] — script assembly, signers, witness scopes and rules,
//!   the [`TransactionBuilder`](neo_builder::TransactionBuilder).
//! - [`neo_protocol`] — accounts, the NEP-2 key codec, typed RPC response
//!   records.
//! - [`neo_wallets`] — the NEP-6 wallet document and its in-memory
//!   counterpart.
//! - [`neo_rpc`] — the JSON-RPC client, its
//!   [`JsonRpcService`](neo_rpc::JsonRpcService) transport seam and the
//!   bundled blocking HTTP adapter.
//!
//! The core is synchronous; the only operation that may block on I/O is
//! [`JsonRpcService::perform_io`](neo_rpc::JsonRpcService::perform_io).

pub mod neo_builder;
pub mod neo_codec;
pub mod neo_config;
pub mod neo_crypto;
pub mod neo_error;
pub mod neo_protocol;
pub mod neo_rpc;
pub mod neo_types;
pub mod neo_wallets;

/// Easy imports of the frequently used type definitions and traits.
pub mod prelude {
	pub use super::{
		neo_builder::*, neo_codec::*, neo_config::*, neo_crypto::*,
		neo_error::{last_error, set_last_error, take_last_error, NeoError},
		neo_protocol::*, neo_rpc::*, neo_types::*, neo_wallets::*,
	};
}
