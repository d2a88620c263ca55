//! Sensitive fields of a listening-history record.

use crate::crypto::EnvelopeCipher;

use super::FieldProtector;

/// Fields of a history row that hold user speech, translations, or audio.
pub const HISTORY_FIELDS: [&str; 7] = [
    "transcription",
    "transcreation",
    "transliteration",
    "segments",
    "transcribe_segments",
    "tts_alignment",
    "tts_audio_base64",
];

impl FieldProtector {
    /// A protector for history rows, covering [`HISTORY_FIELDS`].
    pub fn history(cipher: EnvelopeCipher) -> Self {
        Self::new(cipher, HISTORY_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{EncryptionKey, KEY_LEN};
    use serde_json::{json, Value};

    #[test]
    fn history_protector_covers_all_fields_in_order() {
        let key = EncryptionKey::from_bytes(&[1u8; KEY_LEN]).unwrap();
        let p = FieldProtector::history(EnvelopeCipher::new(&key));
        assert_eq!(p.fields(), HISTORY_FIELDS);
    }

    #[test]
    fn history_row_keeps_metadata_in_clear() {
        let key = EncryptionKey::from_bytes(&[1u8; KEY_LEN]).unwrap();
        let p = FieldProtector::history(EnvelopeCipher::new(&key));
        let Value::Object(row) = json!({
            "id": "b1c2",
            "user_id": "user-1",
            "source_language": "tr",
            "target_language": "en",
            "transcription": "merhaba",
            "transcreation": "hello",
            "tts_alignment": {"chars": ["h", "i"], "starts_ms": [0, 120]},
            "tts_audio_base64": null
        }) else {
            unreachable!()
        };

        let enc = p.encrypt_fields(&row).unwrap();
        for clear in ["id", "user_id", "source_language", "target_language"] {
            assert_eq!(enc[clear], row[clear]);
        }
        assert_eq!(enc["tts_audio_base64"], Value::Null);
        assert!(FieldProtector::is_encrypted(&enc["tts_alignment"]));

        assert_eq!(p.decrypt_fields(&enc), row);
    }
}
