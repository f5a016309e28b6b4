use std::cell::RefCell;

use thiserror::Error;

use crate::{
	neo_builder::{BuilderError, TransactionError},
	neo_codec::CodecError,
	neo_crypto::CryptoError,
	neo_protocol::ProtocolError,
	neo_rpc::RpcError,
	neo_types::TypeError,
};

/// The crate-wide error type: every module's error converts into it, so
/// hosts that do not care about the layer a failure came from can funnel
/// everything through one type.
#[derive(Error, Debug)]
pub enum NeoError {
	#[error(transparent)]
	Codec(#[from] CodecError),
	#[error(transparent)]
	Crypto(#[from] CryptoError),
	#[error(transparent)]
	Type(#[from] TypeError),
	#[error(transparent)]
	Builder(#[from] BuilderError),
	#[error(transparent)]
	Transaction(#[from] TransactionError),
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	#[error(transparent)]
	Wallet(#[from] crate::neo_wallets::WalletError),
	#[error(transparent)]
	Rpc(#[from] RpcError),
}

thread_local! {
	// Advisory free-form context for the most recent failure on this
	// thread. Behaviour never depends on it; errors are the channel.
	static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Records a diagnostic message for this thread, replacing the previous
/// one.
pub fn set_last_error(message: impl Into<String>) {
	LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message.into()));
}

/// The most recent diagnostic message recorded on this thread, if any.
pub fn last_error() -> Option<String> {
	LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Takes the diagnostic message, leaving the slot empty.
pub fn take_last_error() -> Option<String> {
	LAST_ERROR.with(|slot| slot.borrow_mut().take())
}
