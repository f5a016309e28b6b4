use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumString};

/// The Neo VM opcodes the SDK emits and recognizes when assembling
/// verification and invocation scripts.
#[derive(Display, EnumString, TryFromPrimitive, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
	PushInt8 = 0x00,
	PushInt16 = 0x01,
	PushInt32 = 0x02,
	PushInt64 = 0x03,
	PushInt128 = 0x04,
	PushInt256 = 0x05,
	PushTrue = 0x08,
	PushFalse = 0x09,
	PushA = 0x0A,
	PushNull = 0x0B,
	PushData1 = 0x0C,
	PushData2 = 0x0D,
	PushData4 = 0x0E,
	PushM1 = 0x0F,
	Push0 = 0x10,
	Push1 = 0x11,
	Push2 = 0x12,
	Push3 = 0x13,
	Push4 = 0x14,
	Push5 = 0x15,
	Push6 = 0x16,
	Push7 = 0x17,
	Push8 = 0x18,
	Push9 = 0x19,
	Push10 = 0x1A,
	Push11 = 0x1B,
	Push12 = 0x1C,
	Push13 = 0x1D,
	Push14 = 0x1E,
	Push15 = 0x1F,
	Push16 = 0x20,
	Nop = 0x21,
	Syscall = 0x41,
	NewArray0 = 0xC2,
	NewArray = 0xC3,
	NewStruct0 = 0xC5,
	Pack = 0xC0,
	PackMap = 0xBE,
	PackStruct = 0xBF,
}

impl OpCode {
	pub fn opcode(&self) -> u8 {
		*self as u8
	}

	/// Hex form of the opcode byte, handy for assembling test fixtures.
	pub fn to_hex(&self) -> String {
		format!("{:02x}", self.opcode())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_opcode_bytes() {
		assert_eq!(OpCode::PushData1.opcode(), 0x0C);
		assert_eq!(OpCode::Syscall.opcode(), 0x41);
		assert_eq!(OpCode::Push16.opcode(), 0x20);
		assert_eq!(OpCode::PushM1.opcode(), 0x0F);
	}

	#[test]
	fn test_opcode_from_byte() {
		assert_eq!(OpCode::try_from(0x0Cu8).unwrap(), OpCode::PushData1);
		assert!(OpCode::try_from(0x07u8).is_err());
	}

	#[test]
	fn test_opcode_hex() {
		assert_eq!(OpCode::PushData1.to_hex(), "0c");
		assert_eq!(OpCode::Syscall.to_hex(), "41");
	}
}
