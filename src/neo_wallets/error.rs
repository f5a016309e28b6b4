use thiserror::Error;

use crate::{neo_builder::BuilderError, neo_protocol::ProtocolError};

/// Errors raised while loading, saving and mutating wallets.
#[derive(Error, Debug)]
pub enum WalletError {
	#[error("Account not found: {0}")]
	AccountNotFound(String),
	#[error("Invalid wallet: {0}")]
	InvalidWallet(String),
	#[error("Account state: {0}")]
	AccountState(String),
	#[error("No password provided")]
	NoPassword,
	#[error(transparent)]
	ProtocolError(#[from] ProtocolError),
	#[error(transparent)]
	BuilderError(#[from] BuilderError),
	#[error("File error: {0}")]
	FileError(#[from] std::io::Error),
	#[error("Malformed wallet JSON: {0}")]
	JsonError(#[from] serde_json::Error),
}
