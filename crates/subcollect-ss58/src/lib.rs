//! SS58 address codec.
//!
//! An SS58 address is `base58(prefix_bytes || payload || checksum)` where the
//! checksum is the leading bytes of `BLAKE2b-512("SS58PRE" || prefix_bytes ||
//! payload)`. Network prefixes are 14-bit: values ≤ 63 encode as a single
//! byte, larger values split across two bytes with a marker bit.
//!
//! Pure and stateless; both directions report failure as `None` rather than
//! panicking, so callers can leave an address field unset on garbage input.

use blake2::{Blake2b512, Digest};

/// The Subspace network prefix; addresses render with a leading `st`.
pub const SUBSPACE_ADDRESS_PREFIX: u16 = 2254;

/// Domain prefix mixed into every SS58 checksum.
const CHECKSUM_PREFIX: &[u8] = b"SS58PRE";

/// Checksum length as a function of the total decoded length.
/// Any length outside this table is structurally invalid.
fn checksum_length(decoded_len: usize) -> Option<usize> {
    match decoded_len {
        3 | 4 | 6 | 10 => Some(1),
        5 | 7 | 11 | 35 | 36 => Some(2),
        8 | 12 => Some(3),
        9 | 13 => Some(4),
        14 => Some(5),
        15 => Some(6),
        16 => Some(7),
        17 => Some(8),
        _ => None,
    }
}

fn ss58_hash(body: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREFIX);
    hasher.update(body);
    hasher.finalize().into()
}

/// Decode an SS58 address to the lowercase hex of its embedded 32-byte key.
///
/// Returns `None` on any structural or checksum mismatch. The expected
/// prefix is accepted for contract symmetry with [`encode`] but not
/// enforced; historic runtime upgrades have re-issued addresses under
/// changed prefixes and the stored key is prefix-independent.
pub fn decode(address: &str, _expected_prefix: u16) -> Option<String> {
    let raw = bs58::decode(address).into_vec().ok()?;
    if raw.is_empty() {
        return None;
    }
    let checksum_len = checksum_length(raw.len())?;
    let body = &raw[..raw.len() - checksum_len];
    let hash = ss58_hash(body);
    if hash[..checksum_len] != raw[raw.len() - checksum_len..] {
        return None;
    }
    // The key is the last 32 bytes before the checksum.
    let key_start = raw.len().checked_sub(32 + checksum_len)?;
    Some(hex::encode(&raw[key_start..raw.len() - checksum_len]))
}

/// Encode a public key (raw bytes as `0x`-hex, or a byte string) under the
/// given network prefix.
///
/// Returns `None` when the payload length is not one of the encodable sizes
/// (32-byte keys get a 2-byte checksum; 1/2/4/8-byte payloads get 1).
pub fn encode(key_or_hex: &str, prefix: u16) -> Option<String> {
    let payload = if let Some(stripped) = key_or_hex.strip_prefix("0x") {
        hex::decode(stripped).ok()?
    } else {
        key_or_hex.as_bytes().to_vec()
    };

    let checksum_len = match payload.len() {
        32 => 2,
        1 | 2 | 4 | 8 => 1,
        _ => return None,
    };

    let simple_prefix = prefix & 0x3F;
    let mut body = Vec::with_capacity(2 + payload.len() + checksum_len);
    if prefix == simple_prefix {
        body.push(simple_prefix as u8);
    } else {
        let full = 0x4000 | ((prefix >> 8) & 0x3F) | ((prefix & 0xFF) << 6);
        body.push((full >> 8) as u8);
        body.push((full & 0xFF) as u8);
    }
    body.extend_from_slice(&payload);

    let hash = ss58_hash(&body);
    body.extend_from_slice(&hash[..checksum_len]);
    Some(bs58::encode(body).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Block author observed live on gemini-3g.
    const LIVE_ADDRESS: &str = "st8eJ9cuh4XsHyoqWNWr13o8e9SiqYvX2Yg7cSKVKQy6KeUCN";
    const LIVE_KEY: &str = "6954c95b52a96b6c4130bb70d0b7bd803d914fd341e3fbe38d962e969472cfcb";

    const KEY: &str = "7483f122c69ed7ef3f8aad34a06de88381dc498b7a22f40732ff83cc0c25e40e";

    #[test]
    fn decodes_live_subspace_address() {
        assert_eq!(
            decode(LIVE_ADDRESS, SUBSPACE_ADDRESS_PREFIX).as_deref(),
            Some(LIVE_KEY)
        );
    }

    #[test]
    fn encodes_known_key_under_subspace_prefix() {
        let addr = encode(&format!("0x{KEY}"), SUBSPACE_ADDRESS_PREFIX).unwrap();
        assert_eq!(addr, "st8txge16PUCZFswE2MBLVA5cWkkfgUF3XZedvELYKYgYRXv8");
        assert!(addr.starts_with("st"));
    }

    #[test]
    fn round_trips_two_byte_prefix() {
        let addr = encode(&format!("0x{KEY}"), SUBSPACE_ADDRESS_PREFIX).unwrap();
        assert_eq!(decode(&addr, SUBSPACE_ADDRESS_PREFIX).as_deref(), Some(KEY));
    }

    #[test]
    fn round_trips_simple_prefix() {
        // Generic Substrate prefix 42 fits in a single byte.
        let addr = encode(&format!("0x{KEY}"), 42).unwrap();
        assert_eq!(addr, "5EhUc9HdgokLWFxeABXrGybYn9NCjmknWJAudgNFXdMSbMWP");
        assert_eq!(decode(&addr, 42).as_deref(), Some(KEY));
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let addr = encode(&format!("0x{KEY}"), SUBSPACE_ADDRESS_PREFIX).unwrap();
        // Swap the final character for a different alphabet member.
        let last = addr.chars().last().unwrap();
        let swapped = if last == '2' { '3' } else { '2' };
        let mut bad = addr[..addr.len() - 1].to_string();
        bad.push(swapped);
        assert_eq!(decode(&bad, SUBSPACE_ADDRESS_PREFIX), None);
    }

    #[test]
    fn rejects_any_corrupted_character() {
        let addr = encode(&format!("0x{KEY}"), SUBSPACE_ADDRESS_PREFIX).unwrap();
        for i in 0..addr.len() {
            let orig = addr.as_bytes()[i] as char;
            let swapped = if orig == '2' { '3' } else { '2' };
            let mut bad = addr.clone();
            bad.replace_range(i..i + 1, &swapped.to_string());
            // Either the length table rejects it or the checksum does.
            assert_eq!(decode(&bad, SUBSPACE_ADDRESS_PREFIX), None, "position {i}");
        }
    }

    #[test]
    fn rejects_structural_garbage() {
        assert_eq!(decode("", SUBSPACE_ADDRESS_PREFIX), None);
        assert_eq!(decode("0OIl", SUBSPACE_ADDRESS_PREFIX), None); // invalid alphabet
        assert_eq!(decode("11", SUBSPACE_ADDRESS_PREFIX), None); // length outside table
    }

    #[test]
    fn encode_rejects_odd_payload_lengths() {
        assert_eq!(encode("0xaabbcc", SUBSPACE_ADDRESS_PREFIX), None); // 3 bytes
        assert_eq!(encode("0x", SUBSPACE_ADDRESS_PREFIX), None); // empty
    }
}
