use thiserror::Error;

/// Errors produced by the binary reader and writer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
	#[error("End of stream: {0}")]
	EndOfStream(String),
	#[error("Invalid encoding: {0}")]
	InvalidEncoding(String),
	#[error("Invalid format: {0}")]
	InvalidFormat(String),
	#[error("Invalid op code")]
	InvalidOpCode,
	#[error("Value out of range: {0}")]
	OutOfRange(String),
}
