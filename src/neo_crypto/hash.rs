use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Digest helpers over byte slices.
///
/// The names follow Neo conventions: `hash256` is a double SHA-256 and
/// `sha256_ripemd160` is the script-hash digest.
pub trait HashableForVec {
	fn sha256(&self) -> Vec<u8>;
	fn hash256(&self) -> Vec<u8>;
	fn ripemd160(&self) -> Vec<u8>;
	fn sha256_ripemd160(&self) -> Vec<u8>;
	fn hmac_sha512(&self, key: &[u8]) -> Vec<u8>;
}

impl HashableForVec for [u8] {
	fn sha256(&self) -> Vec<u8> {
		Sha256::digest(self).to_vec()
	}

	fn hash256(&self) -> Vec<u8> {
		Sha256::digest(Sha256::digest(self)).to_vec()
	}

	fn ripemd160(&self) -> Vec<u8> {
		Ripemd160::digest(self).to_vec()
	}

	fn sha256_ripemd160(&self) -> Vec<u8> {
		Ripemd160::digest(Sha256::digest(self)).to_vec()
	}

	fn hmac_sha512(&self, key: &[u8]) -> Vec<u8> {
		let mut mac = Hmac::<Sha512>::new_from_slice(key)
			.expect("HMAC accepts keys of any length");
		mac.update(self);
		mac.finalize().into_bytes().to_vec()
	}
}

impl HashableForVec for Vec<u8> {
	fn sha256(&self) -> Vec<u8> {
		self.as_slice().sha256()
	}

	fn hash256(&self) -> Vec<u8> {
		self.as_slice().hash256()
	}

	fn ripemd160(&self) -> Vec<u8> {
		self.as_slice().ripemd160()
	}

	fn sha256_ripemd160(&self) -> Vec<u8> {
		self.as_slice().sha256_ripemd160()
	}

	fn hmac_sha512(&self, key: &[u8]) -> Vec<u8> {
		self.as_slice().hmac_sha512(key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sha256() {
		let data = b"hello world";
		assert_eq!(
			hex::encode(data.sha256()),
			"b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
		);
	}

	#[test]
	fn test_hash256_is_double_sha256() {
		let data = b"hello world";
		assert_eq!(data.hash256(), data.sha256().sha256());
	}

	#[test]
	fn test_ripemd160() {
		let data = b"hello world";
		assert_eq!(hex::encode(data.ripemd160()), "98c615784ccb5fe5936fbc0cbe9dfdb408d92f0f");
	}

	#[test]
	fn test_ripemd160_test_vectors() {
		let vectors: &[(&str, &str)] = &[
			("", "9c1185a5c5e9fc54612808977ee8f548b2258d31"),
			("a", "0bdc9d2d256b3ee9daae347be6f4dc835a467ffe"),
			("abc", "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"),
			("message digest", "5d0689ef49d2fae572b881b123a85ffa21595f36"),
			("abcdefghijklmnopqrstuvwxyz", "f71c27109c692c1b56bbdceb5b9d2865b3708dbc"),
			(
				"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq",
				"12a053384a9c0c88e405a06c27dcf49ada62eb2b",
			),
			(
				"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
				"b0e20b6e3116640286ed3a87a5713079b21f5189",
			),
		];

		for (input, expected) in vectors {
			assert_eq!(hex::encode(input.as_bytes().ripemd160()), *expected);
		}
	}

	#[test]
	fn test_sha256_ripemd160() {
		let data = b"hello world";
		assert_eq!(data.sha256_ripemd160(), data.sha256().ripemd160());
	}

	#[test]
	fn test_hmac_sha512_rfc4231_case_2() {
		// RFC 4231 test case 2
		let key = b"Jefe";
		let data = b"what do ya want for nothing?";
		assert_eq!(
			hex::encode(data.hmac_sha512(key)),
			"164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
			 9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
		);
	}
}
