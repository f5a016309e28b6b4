use thiserror::Error;

/// Errors raised by the value model and hash identifier types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
	#[error("Invalid address")]
	InvalidAddress,
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Invalid format: {0}")]
	InvalidFormat(String),
	#[error("Not convertible: {0}")]
	NotConvertible(String),
}
