use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable};

/// Response codes an oracle node attaches to an `OracleResponse` attribute.
#[derive(
	Debug, Copy, Clone, Hash, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum OracleResponseCode {
	#[serde(rename = "Success")]
	Success = 0x00,
	#[serde(rename = "ProtocolNotSupported")]
	ProtocolNotSupported = 0x10,
	#[serde(rename = "ConsensusUnreachable")]
	ConsensusUnreachable = 0x12,
	#[serde(rename = "NotFound")]
	NotFound = 0x14,
	#[serde(rename = "Timeout")]
	Timeout = 0x16,
	#[serde(rename = "Forbidden")]
	Forbidden = 0x18,
	#[serde(rename = "ResponseTooLarge")]
	ResponseTooLarge = 0x1A,
	#[serde(rename = "InsufficientFunds")]
	InsufficientFunds = 0x1C,
	#[serde(rename = "ContentTypeNotSupported")]
	ContentTypeNotSupported = 0x1F,
	#[serde(rename = "Error")]
	Error = 0xFF,
}

/// A transaction attribute. `HighPriority` may appear at most once per
/// transaction and only the committee may use it; `OracleResponse` is
/// attached by oracle nodes to response transactions.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionAttribute {
	#[serde(rename = "HighPriority")]
	HighPriority,
	#[serde(rename = "OracleResponse")]
	OracleResponse {
		id: u64,
		#[serde(rename = "code")]
		response_code: OracleResponseCode,
		#[serde(rename = "result")]
		result: String, // base64
	},
}

impl TransactionAttribute {
	const HIGH_PRIORITY_BYTE: u8 = 0x01;
	const ORACLE_RESPONSE_BYTE: u8 = 0x11;

	/// The maximum byte length of an oracle response result.
	pub const MAX_RESULT_SIZE: usize = 0xFFFF;

	pub fn type_byte(&self) -> u8 {
		match self {
			TransactionAttribute::HighPriority => Self::HIGH_PRIORITY_BYTE,
			TransactionAttribute::OracleResponse { .. } => Self::ORACLE_RESPONSE_BYTE,
		}
	}
}

impl NeoSerializable for TransactionAttribute {
	type Error = CodecError;

	fn size(&self) -> usize {
		self.to_array().len()
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.type_byte());
		if let TransactionAttribute::OracleResponse { id, response_code, result } = self {
			use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
			writer.write_u64(*id);
			writer.write_u8(*response_code as u8);
			let bytes = BASE64.decode(result).unwrap_or_default();
			writer.write_var_bytes(&bytes);
		}
	}

	fn decode(reader: &mut Decoder) -> Result<Self, Self::Error> {
		match reader.read_u8()? {
			Self::HIGH_PRIORITY_BYTE => Ok(TransactionAttribute::HighPriority),
			Self::ORACLE_RESPONSE_BYTE => {
				use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
				let id = reader.read_u64()?;
				let response_code = OracleResponseCode::try_from(reader.read_u8()?)
					.map_err(|_| {
						CodecError::InvalidFormat("unknown oracle response code".to_string())
					})?;
				let bytes = reader.read_var_bytes()?;
				if bytes.len() > Self::MAX_RESULT_SIZE {
					return Err(CodecError::InvalidFormat(
						"oracle response result too large".to_string(),
					))
				}
				Ok(TransactionAttribute::OracleResponse {
					id,
					response_code,
					result: BASE64.encode(bytes),
				})
			},
			other => Err(CodecError::InvalidFormat(format!(
				"unknown transaction attribute type 0x{:02x}",
				other
			))),
		}
	}
}
