use crate::neo_codec::{CodecError, NeoSerializable};

/// A cursored binary reader over a byte slice, following Neo's little-endian
/// wire framing.
///
/// Every read checks the remaining length first and fails with
/// [`CodecError::EndOfStream`] instead of panicking. `mark`/`reset` snapshot
/// the cursor so callers can roll back after a failed speculative decode.
///
/// # Examples
///
/// ```
/// use neo3_core::prelude::Decoder;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reader = Decoder::new(&data);
/// assert_eq!(reader.read_u8().unwrap(), 0x01);
/// assert_eq!(reader.read_u32().unwrap(), 0x0504_0302);
/// assert!(reader.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
	data: &'a [u8],
	position: usize,
	marker: usize,
}

impl<'a> Decoder<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, position: 0, marker: 0 }
	}

	/// Current cursor offset into the underlying slice.
	pub fn position(&self) -> usize {
		self.position
	}

	/// Moves the cursor to an absolute offset.
	pub fn seek(&mut self, position: usize) -> Result<(), CodecError> {
		if position > self.data.len() {
			return Err(CodecError::EndOfStream(format!(
				"cannot seek to {} in a buffer of {} bytes",
				position,
				self.data.len()
			)))
		}
		self.position = position;
		Ok(())
	}

	/// Number of bytes left to read.
	pub fn available(&self) -> usize {
		self.data.len() - self.position
	}

	/// Remembers the current cursor for a later [`Decoder::reset`].
	pub fn mark(&mut self) {
		self.marker = self.position;
	}

	/// Rewinds the cursor to the last [`Decoder::mark`].
	pub fn reset(&mut self) {
		self.position = self.marker;
	}

	fn ensure(&self, count: usize) -> Result<(), CodecError> {
		if self.position + count > self.data.len() {
			return Err(CodecError::EndOfStream(format!(
				"tried to read {} byte(s) with {} available",
				count,
				self.available()
			)))
		}
		Ok(())
	}

	pub fn read_bool(&mut self) -> Result<bool, CodecError> {
		Ok(self.read_u8()? != 0)
	}

	pub fn read_u8(&mut self) -> Result<u8, CodecError> {
		self.ensure(1)?;
		let value = self.data[self.position];
		self.position += 1;
		Ok(value)
	}

	pub fn read_u16(&mut self) -> Result<u16, CodecError> {
		let bytes = self.read_array::<2>()?;
		Ok(u16::from_le_bytes(bytes))
	}

	pub fn read_i16(&mut self) -> Result<i16, CodecError> {
		let bytes = self.read_array::<2>()?;
		Ok(i16::from_le_bytes(bytes))
	}

	pub fn read_u32(&mut self) -> Result<u32, CodecError> {
		let bytes = self.read_array::<4>()?;
		Ok(u32::from_le_bytes(bytes))
	}

	pub fn read_i32(&mut self) -> Result<i32, CodecError> {
		let bytes = self.read_array::<4>()?;
		Ok(i32::from_le_bytes(bytes))
	}

	pub fn read_u64(&mut self) -> Result<u64, CodecError> {
		let bytes = self.read_array::<8>()?;
		Ok(u64::from_le_bytes(bytes))
	}

	pub fn read_i64(&mut self) -> Result<i64, CodecError> {
		let bytes = self.read_array::<8>()?;
		Ok(i64::from_le_bytes(bytes))
	}

	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
		self.ensure(N)?;
		let mut out = [0u8; N];
		out.copy_from_slice(&self.data[self.position..self.position + N]);
		self.position += N;
		Ok(out)
	}

	pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, CodecError> {
		self.ensure(count)?;
		let out = self.data[self.position..self.position + count].to_vec();
		self.position += count;
		Ok(out)
	}

	/// Reads a Bitcoin-style variable-length integer.
	pub fn read_var_int(&mut self) -> Result<u64, CodecError> {
		let first = self.read_u8()?;
		match first {
			0xFD => Ok(self.read_u16()? as u64),
			0xFE => Ok(self.read_u32()? as u64),
			0xFF => self.read_u64(),
			value => Ok(value as u64),
		}
	}

	/// Reads a VarInt length prefix followed by that many bytes.
	pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
		let len = self.read_var_int()?;
		if len > self.available() as u64 {
			return Err(CodecError::EndOfStream(format!(
				"VarBytes announces {} byte(s) with {} available",
				len,
				self.available()
			)))
		}
		self.read_bytes(len as usize)
	}

	pub fn read_var_string(&mut self) -> Result<String, CodecError> {
		let bytes = self.read_var_bytes()?;
		let text = String::from_utf8(bytes)
			.map_err(|e| CodecError::InvalidEncoding(e.to_string()))?;
		// Fixed-width fields arrive zero padded
		Ok(text.trim_end_matches(char::from(0)).to_string())
	}

	/// Reads a compressed EC point (0x02/0x03 prefix plus 32 bytes) and
	/// returns the full 33-byte encoding.
	pub fn read_encoded_ec_point(&mut self) -> Result<Vec<u8>, CodecError> {
		let prefix = self.read_u8()?;
		match prefix {
			0x02 | 0x03 => {
				let mut point = vec![prefix];
				point.extend(self.read_bytes(32)?);
				Ok(point)
			},
			other =>
				Err(CodecError::InvalidFormat(format!("invalid EC point prefix 0x{:02x}", other))),
		}
	}

	pub fn read_serializable<T: NeoSerializable>(&mut self) -> Result<T, CodecError> {
		T::decode(self).map_err(|e| CodecError::InvalidFormat(e.to_string()))
	}

	/// Reads a VarInt element count followed by that many values.
	pub fn read_serializable_list<T: NeoSerializable>(&mut self) -> Result<Vec<T>, CodecError> {
		let len = self.read_var_int()?;
		if len > self.available() as u64 {
			return Err(CodecError::EndOfStream(format!(
				"list announces {} element(s) with {} byte(s) available",
				len,
				self.available()
			)))
		}
		let mut list = Vec::with_capacity(len as usize);
		for _ in 0..len {
			list.push(self.read_serializable()?);
		}
		Ok(list)
	}
}
