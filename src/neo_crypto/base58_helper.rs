use crate::neo_crypto::HashableForVec;

/// Encodes a byte slice as base58check: the payload followed by the first
/// four bytes of its double SHA-256.
pub fn base58check_encode(bytes: &[u8]) -> String {
	if bytes.is_empty() {
		return String::new()
	}

	let checksum = calculate_checksum(bytes);
	let mut payload = bytes.to_vec();
	payload.extend_from_slice(&checksum);
	bs58::encode(payload).into_string()
}

/// Decodes a base58check string, verifying the 4-byte checksum. Returns
/// `None` on invalid characters, short input or a checksum mismatch.
pub fn base58check_decode(input: &str) -> Option<Vec<u8>> {
	let decoded = bs58::decode(input).into_vec().ok()?;
	if decoded.len() < 4 {
		return None
	}

	let (payload, checksum) = decoded.split_at(decoded.len() - 4);
	if checksum != calculate_checksum(payload) {
		return None
	}

	Some(payload.to_vec())
}

/// First four bytes of the double SHA-256 of the input.
pub fn calculate_checksum(input: &[u8]) -> [u8; 4] {
	let hash = input.hash256();
	hash[..4].try_into().expect("hash256 yields 32 bytes")
}

#[cfg(test)]
mod tests {
	use super::*;

	static VALID_STRING_DECODED_TO_ENCODED: &[(&str, &str)] = &[
		(" ", "Z"),
		("-", "n"),
		("0", "q"),
		("1", "r"),
		("-1", "4SU"),
		("11", "4k8"),
		("abc", "ZiCa"),
		("1234598760", "3mJr7AoUXx2Wqd"),
		("abcdefghijklmnopqrstuvwxyz", "3yxU3u1igY8WkgtjK92fbJQCd4BZiiT1v25f"),
	];

	static INVALID_STRINGS: &[&str] =
		&["0", "O", "I", "l", "3mJr0", "O3yxU", "3sNI", "4kl8", "0OIl", "!@#$%^&*()-_=+~`"];

	#[test]
	fn test_base58_encoding() {
		for (decoded, encoded) in VALID_STRING_DECODED_TO_ENCODED {
			assert_eq!(&bs58::encode(decoded.as_bytes()).into_string(), encoded);
		}
	}

	#[test]
	fn test_base58_decoding() {
		for (decoded, encoded) in VALID_STRING_DECODED_TO_ENCODED {
			assert_eq!(bs58::decode(encoded).into_vec().unwrap(), decoded.as_bytes());
		}
	}

	#[test]
	fn test_base58check_rejects_invalid_strings() {
		for invalid in INVALID_STRINGS {
			assert!(base58check_decode(invalid).is_none());
		}
	}

	#[test]
	fn test_base58check_roundtrip() {
		let payload: Vec<u8> = vec![
			6, 161, 159, 136, 34, 110, 33, 238, 14, 79, 14, 218, 133, 13, 109, 40, 194, 236, 153,
			44, 61, 157, 254,
		];
		let encoded = base58check_encode(&payload);
		assert_eq!(encoded, "tz1Y3qqTg9HdrzZGbEjiCPmwuZ7fWVxpPtRw");
		assert_eq!(base58check_decode(&encoded), Some(payload));
	}

	#[test]
	fn test_base58check_rejects_corrupted_checksum() {
		assert!(base58check_decode("tz1Y3qqTg9HdrzZGbEjiCPmwuZ7fWVxpPtrW").is_none());
	}

	#[test]
	fn test_zero_payload_checksum_vector() {
		// 21 zero bytes carry the checksum 3507b27b
		let payload = [0u8; 21];
		assert_eq!(calculate_checksum(&payload), [0x35, 0x07, 0xb2, 0x7b]);

		let encoded = base58check_encode(&payload);
		assert_eq!(base58check_decode(&encoded), Some(payload.to_vec()));

		// corrupting the last character breaks the decode
		let mut chars: Vec<char> = encoded.chars().collect();
		let last = chars.len() - 1;
		chars[last] = if chars[last] == '1' { '2' } else { '1' };
		let corrupted: String = chars.into_iter().collect();
		assert!(base58check_decode(&corrupted).is_none());
	}

	#[test]
	fn test_base58check_bit_flips_fail() {
		let payload = b"base58check bit flip probe".to_vec();
		let encoded = base58check_encode(&payload);

		// corrupting any character must break either the alphabet or checksum
		let alphabet = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
		for i in 0..encoded.len() {
			let mut corrupted: Vec<char> = encoded.chars().collect();
			let replacement = alphabet.chars().find(|c| *c != corrupted[i]).unwrap();
			corrupted[i] = replacement;
			let corrupted: String = corrupted.into_iter().collect();
			assert_ne!(base58check_decode(&corrupted), Some(payload.clone()));
		}
	}
}
