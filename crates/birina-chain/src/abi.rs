//! Call-data encoding for the claim contract.
//!
//! Only what the two contract functions need: Keccak-256 function selectors,
//! ABI encoding of dynamic string arguments, and bool return decoding.

use sha3::{Digest, Keccak256};

use crate::ChainError;

const WORD: usize = 32;

fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn word_from_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// ABI-encode a call whose arguments are all dynamic strings.
///
/// Layout: one offset word per argument (the head), then per argument a
/// length word followed by the UTF-8 bytes padded to a word boundary.
pub fn encode_string_call(signature: &str, args: &[&str]) -> Vec<u8> {
    let head_len = args.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for arg in args {
        head.extend_from_slice(&word_from_usize(head_len + tail.len()));
        tail.extend_from_slice(&word_from_usize(arg.len()));
        tail.extend_from_slice(arg.as_bytes());
        tail.resize(tail.len() + padded_len(arg.len()) - arg.len(), 0);
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

/// Decode a single ABI-encoded bool return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, ChainError> {
    if data.len() != WORD {
        return Err(ChainError::MalformedHex(format!(
            "expected a single word, got {} bytes",
            data.len()
        )));
    }
    Ok(data[WORD - 1] != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_four_bytes_and_stable() {
        let a = selector("isGamusaClaimed(string)");
        let b = selector("isGamusaClaimed(string)");
        assert_eq!(a, b);
        assert_ne!(a, selector("claimGamusa(string,string,string)"));
    }

    #[test]
    fn encodes_single_string_argument() {
        let data = encode_string_call("isGamusaClaimed(string)", &["G-001"]);
        // selector + offset word + length word + one padded data word
        assert_eq!(data.len(), 4 + WORD + WORD + WORD);
        // offset points past the one-word head
        assert_eq!(data[4..4 + WORD], word_from_usize(WORD));
        // length of "G-001"
        assert_eq!(data[4 + WORD..4 + 2 * WORD], word_from_usize(5));
        // payload, zero-padded
        assert_eq!(&data[4 + 2 * WORD..4 + 2 * WORD + 5], b"G-001");
        assert!(data[4 + 2 * WORD + 5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn encodes_three_string_arguments() {
        let data =
            encode_string_call("claimGamusa(string,string,string)", &["id", "loc", "uri"]);
        // head: three offset words; each arg tail: length word + one data word
        assert_eq!(data.len(), 4 + 3 * WORD + 3 * 2 * WORD);
        let head = &data[4..];
        assert_eq!(head[..WORD], word_from_usize(3 * WORD));
        assert_eq!(head[WORD..2 * WORD], word_from_usize(5 * WORD));
        assert_eq!(head[2 * WORD..3 * WORD], word_from_usize(7 * WORD));
    }

    #[test]
    fn word_padding_for_exact_multiple() {
        let arg = "a".repeat(32);
        let data = encode_string_call("isGamusaClaimed(string)", &[arg.as_str()]);
        // no extra padding word for an exact multiple
        assert_eq!(data.len(), 4 + WORD + WORD + WORD);
    }

    #[test]
    fn decodes_bool_words() {
        let mut word = [0u8; 32];
        assert!(!decode_bool(&word).unwrap());
        word[31] = 1;
        assert!(decode_bool(&word).unwrap());
        assert!(decode_bool(&[0u8; 5]).is_err());
    }
}
