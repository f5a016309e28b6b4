use thiserror::Error;

use crate::{neo_builder::BuilderError, neo_codec::CodecError, neo_crypto::CryptoError};

/// Errors raised by accounts and the NEP-2 codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
	#[error("Invalid format: {0}")]
	InvalidFormat(String),
	#[error("Invalid password")]
	InvalidPassword,
	#[error("Invalid state: {0}")]
	InvalidState(String),
	#[error("No key available: {0}")]
	NoKey(String),
	#[error(transparent)]
	CryptoError(#[from] CryptoError),
	#[error(transparent)]
	CodecError(#[from] CodecError),
	#[error(transparent)]
	BuilderError(#[from] BuilderError),
}
