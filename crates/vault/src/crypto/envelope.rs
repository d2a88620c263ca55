//! The `iv:tag:ciphertext` envelope string and its parser.

use std::fmt;

use super::cipher::CipherError;

/// Byte length of the IV stored in every envelope.
pub const IV_LEN: usize = 16;

/// Byte length of the AES-GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Separator between the three hex segments.
pub const SEPARATOR: char = ':';

/// A parsed envelope.
///
/// The string representation is `hex(iv):hex(tag):hex(ciphertext)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes, tag excluded.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Returns `true` if `s` has the envelope shape: exactly three non-empty
    /// segments of ASCII hex digits.
    ///
    /// Anything else is legacy plaintext. A string with the right shape may
    /// still fail [`Envelope::parse`] (odd length, wrong IV size).
    pub fn looks_like(s: &str) -> bool {
        let mut count = 0;
        for part in s.split(SEPARATOR) {
            count += 1;
            if count > 3 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return false;
            }
        }
        count == 3
    }

    /// Parse an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Format`] if the string does not split into
    /// exactly three non-empty hex segments, or if the IV or tag segment
    /// decodes to the wrong length.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [iv_hex, tag_hex, ct_hex] = parts.as_slice() else {
            return Err(CipherError::Format);
        };
        if iv_hex.is_empty() || tag_hex.is_empty() || ct_hex.is_empty() {
            return Err(CipherError::Format);
        }

        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| CipherError::Format)?;

        let mut tag = [0u8; TAG_LEN];
        hex::decode_to_slice(tag_hex, &mut tag).map_err(|_| CipherError::Format)?;

        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::Format)?;

        Ok(Self { iv, tag, ciphertext })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            iv: [0x11; IV_LEN],
            tag: [0x22; TAG_LEN],
            ciphertext: vec![0xde, 0xad, 0xbe, 0xef],
        }
    }

    #[test]
    fn display_is_lowercase_hex_triplet() {
        let s = sample().to_string();
        assert_eq!(
            s,
            format!("{}:{}:deadbeef", "11".repeat(IV_LEN), "22".repeat(TAG_LEN))
        );
        assert_eq!(Envelope::parse(&s).unwrap(), sample());
    }

    #[test]
    fn parse_accepts_uppercase_hex() {
        let s = sample().to_string().to_uppercase();
        assert_eq!(Envelope::parse(&s).unwrap(), sample());
    }

    #[test]
    fn parse_rejects_wrong_segment_counts() {
        let good = sample().to_string();
        for bad in [
            String::new(),
            "abcdef".to_string(),
            "abcd:ef01".to_string(),
            format!("{good}:00"),
        ] {
            assert!(
                matches!(Envelope::parse(&bad), Err(CipherError::Format)),
                "expected format error for {bad:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_empty_segment() {
        let s = format!("{}::deadbeef", "11".repeat(IV_LEN));
        assert!(matches!(Envelope::parse(&s), Err(CipherError::Format)));
    }

    #[test]
    fn parse_rejects_bad_hex() {
        let s = format!("{}:{}:xyz", "11".repeat(IV_LEN), "22".repeat(TAG_LEN));
        assert!(matches!(Envelope::parse(&s), Err(CipherError::Format)));
    }

    #[test]
    fn parse_rejects_short_iv() {
        let s = format!("{}:{}:deadbeef", "11".repeat(12), "22".repeat(TAG_LEN));
        assert!(matches!(Envelope::parse(&s), Err(CipherError::Format)));
    }

    #[test]
    fn looks_like_matches_shape_only() {
        assert!(Envelope::looks_like(&sample().to_string()));
        assert!(Envelope::looks_like("abc:DEF:012"));
        assert!(!Envelope::looks_like("plain text, no colons"));
        assert!(!Envelope::looks_like("Note: meeting at 10:30"));
        assert!(!Envelope::looks_like("ab:cd"));
        assert!(!Envelope::looks_like("ab:cd:ef:01"));
        assert!(!Envelope::looks_like("ab::ef"));
        assert!(!Envelope::looks_like(""));
    }
}
