use thiserror::Error;

/// Errors raised by key handling, signing and key derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
	#[error("Invalid private key")]
	InvalidPrivateKey,
	#[error("Invalid public key")]
	InvalidPublicKey,
	#[error("Invalid format: {0}")]
	InvalidFormat(String),
	#[error("Signing failed")]
	SigningError,
	#[error("Signature verification failed")]
	SignatureVerificationError,
	#[error("Key derivation failed: {0}")]
	KeyDerivationError(String),
	#[error("Random source failure: {0}")]
	RngError(String),
}
