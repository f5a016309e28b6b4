use crate::neo_codec::{CodecError, NeoSerializable};

/// A binary writer producing Neo's little-endian wire framing.
///
/// # Examples
///
/// ```
/// use neo3_core::prelude::Encoder;
///
/// let mut writer = Encoder::new();
/// writer.write_u8(0x12);
/// writer.write_u32(0xDEAD_BEEF);
/// assert_eq!(writer.to_bytes(), vec![0x12, 0xEF, 0xBE, 0xAD, 0xDE]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoder {
	data: Vec<u8>,
}

impl Encoder {
	pub fn new() -> Self {
		Self { data: Vec::new() }
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self { data: Vec::with_capacity(capacity) }
	}

	/// Number of bytes written so far.
	pub fn size(&self) -> usize {
		self.data.len()
	}

	pub fn write_bool(&mut self, value: bool) {
		self.write_u8(u8::from(value));
	}

	pub fn write_u8(&mut self, value: u8) {
		self.data.push(value);
	}

	pub fn write_u16(&mut self, value: u16) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub fn write_u32(&mut self, value: u32) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub fn write_u64(&mut self, value: u64) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub fn write_i16(&mut self, value: i16) {
		self.write_u16(value as u16);
	}

	pub fn write_i32(&mut self, value: i32) {
		self.write_u32(value as u32);
	}

	pub fn write_i64(&mut self, value: i64) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.data.extend_from_slice(bytes);
	}

	/// Writes a Bitcoin-style variable-length integer.
	///
	/// One byte below 0xFD inlines the value; 0xFD/0xFE/0xFF prefix a u16,
	/// u32 or u64 respectively.
	pub fn write_var_int(&mut self, value: u64) {
		if value < 0xFD {
			self.write_u8(value as u8);
		} else if value <= u16::MAX as u64 {
			self.write_u8(0xFD);
			self.write_u16(value as u16);
		} else if value <= u32::MAX as u64 {
			self.write_u8(0xFE);
			self.write_u32(value as u32);
		} else {
			self.write_u8(0xFF);
			self.write_u64(value);
		}
	}

	pub fn write_var_bytes(&mut self, bytes: &[u8]) {
		self.write_var_int(bytes.len() as u64);
		self.write_bytes(bytes);
	}

	pub fn write_var_string(&mut self, value: &str) {
		self.write_var_bytes(value.as_bytes());
	}

	/// Writes a string into a zero-padded field of exactly `length` bytes.
	pub fn write_fixed_string(&mut self, value: &str, length: usize) -> Result<(), CodecError> {
		let bytes = value.as_bytes();
		if bytes.len() > length {
			return Err(CodecError::OutOfRange(format!(
				"string of {} bytes does not fit into {} byte field",
				bytes.len(),
				length
			)))
		}
		let mut padded = vec![0u8; length];
		padded[..bytes.len()].copy_from_slice(bytes);
		self.write_bytes(&padded);
		Ok(())
	}

	pub fn write_serializable<S: NeoSerializable>(&mut self, value: &S) {
		value.encode(self);
	}

	pub fn write_serializable_list<S: NeoSerializable>(&mut self, values: &[S]) {
		values.iter().for_each(|v| v.encode(self));
	}

	/// Writes a VarInt element count followed by each element.
	pub fn write_serializable_variable_list<S: NeoSerializable>(&mut self, values: &[S]) {
		self.write_var_int(values.len() as u64);
		self.write_serializable_list(values);
	}

	pub fn reset(&mut self) {
		self.data.clear();
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		self.data.clone()
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}
}
