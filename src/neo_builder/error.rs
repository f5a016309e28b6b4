use thiserror::Error;

use crate::{neo_codec::CodecError, neo_crypto::CryptoError};

/// Errors raised while assembling scripts and witnesses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
	#[error("Illegal argument: {0}")]
	IllegalArgument(String),
	#[error("Invalid script: {0}")]
	InvalidScript(String),
	#[error("Signer configuration: {0}")]
	SignerConfiguration(String),
	#[error(transparent)]
	CodecError(#[from] CodecError),
	#[error(transparent)]
	CryptoError(#[from] CryptoError),
}

/// Errors raised by the transaction model and the transaction builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
	#[error("Invalid state: {0}")]
	InvalidState(String),
	#[error("Transaction configuration: {0}")]
	TransactionConfiguration(String),
	#[error("Invalid nonce")]
	InvalidNonce,
	#[error("Invalid block range: {0}")]
	InvalidBlock(String),
	#[error("No signers set")]
	NoSigners,
	#[error("Duplicate signer")]
	DuplicateSigner,
	#[error("Too many signers")]
	TooManySigners,
	#[error("No script set")]
	NoScript,
	#[error("Empty script")]
	EmptyScript,
	#[error("Invalid witness condition: {0}")]
	InvalidWitnessCondition(String),
	#[error("Invalid attribute: {0}")]
	InvalidAttribute(String),
	#[error(transparent)]
	CodecError(#[from] CodecError),
	#[error(transparent)]
	CryptoError(#[from] CryptoError),
	#[error(transparent)]
	BuilderError(#[from] BuilderError),
}
