use serde_json::{json, Value};
use vault::{
    EncryptionKey, EnvelopeCipher, FieldProtector, MemoryRepository, Record, SecretRepository,
    SecretStore, StoredSecret,
};

const KEY_HEX: &str = "5f3c1a9e7b2d4c6f8a0e1b3d5c7f9a2e4b6d8f0a1c3e5b7d9f2a4c6e8b0d1f3a";

fn cipher() -> EnvelopeCipher {
    EnvelopeCipher::new(&EncryptionKey::from_hex(KEY_HEX).unwrap())
}

fn record(v: Value) -> Record {
    match v {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn envelopes_survive_a_restart_with_the_same_key() {
    let written = FieldProtector::history(cipher())
        .encrypt_fields(&record(json!({
            "id": 1,
            "transcription": "merhaba dünya",
            "segments": [{"start": 0, "end": 1200, "text": "merhaba"}]
        })))
        .unwrap();

    // A second process builds its own cipher from the same configured key.
    let read = FieldProtector::history(cipher()).decrypt_fields(&written);
    assert_eq!(read["transcription"], json!("merhaba dünya"));
    assert_eq!(read["segments"][0]["text"], json!("merhaba"));
}

#[test]
fn a_different_key_reads_every_field_as_null() {
    let written = FieldProtector::history(cipher())
        .encrypt_fields(&record(json!({"id": 1, "transcription": "hello"})))
        .unwrap();

    let other = EnvelopeCipher::new(&EncryptionKey::from_bytes(&[9u8; 32]).unwrap());
    let read = FieldProtector::history(other).decrypt_fields(&written);
    assert_eq!(read["id"], json!(1));
    assert_eq!(read["transcription"], Value::Null);
}

#[test]
fn batch_read_keeps_positions_when_the_middle_row_is_bad() {
    let p = FieldProtector::history(cipher());
    let rows: Vec<Record> = ["one", "two", "three"]
        .iter()
        .map(|t| record(json!({"transcription": t, "transcreation": t})))
        .collect();
    let mut stored: Vec<Record> = p
        .encrypt_array(&rows)
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    // Truncate the middle row's ciphertext so it fails verification.
    let env = stored[1]["transcription"].as_str().unwrap().to_owned();
    stored[1].insert(
        "transcription".into(),
        json!(&env[..env.len() - 2]),
    );

    let out = p.decrypt_array(&stored);
    assert_eq!(out[0]["transcription"], json!("one"));
    assert_eq!(out[1]["transcription"], Value::Null);
    assert_eq!(out[1]["transcreation"], json!("two"));
    assert_eq!(out[2]["transcription"], json!("three"));
}

#[test]
fn cipher_is_shareable_across_threads() {
    let c = cipher();
    let envelopes: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let c = c.clone();
                scope.spawn(move || c.encrypt(&json!({"n": i})).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, env) in envelopes.iter().enumerate() {
        let back: Value = c.decrypt(env).unwrap();
        assert_eq!(back, json!({"n": i}));
    }
}

#[tokio::test]
async fn concurrent_owners_never_see_each_other() {
    let store = SecretStore::new(cipher(), MemoryRepository::new());

    let mut tasks = Vec::new();
    for owner in ["alice", "bob", "carol"] {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let value = format!("{owner}-token-0123456789abcdef");
            store.save(owner, "generic_key", &value).await.unwrap();
            store
                .save(owner, "elevenlabs_voice_id", "21m00Tcm4TlvDq8ikWAM")
                .await
                .unwrap();
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    for owner in ["alice", "bob", "carol"] {
        let all = store.get_all(owner).await;
        assert_eq!(all.len(), 2);
        assert_eq!(
            all.get("generic_key").map(String::as_str),
            Some(format!("{owner}-token-0123456789abcdef").as_str())
        );
    }
}

#[tokio::test]
async fn row_confusion_degrades_to_missing() {
    let repo = MemoryRepository::new();
    let store = SecretStore::new(cipher(), repo.clone());
    store
        .save("A", "openai_key", "sk-live-0123456789abcdefghij")
        .await
        .unwrap();

    // A faulty storage layer hands A's ciphertext back for B.
    let leaked = repo.fetch("A", "openai_key").await.unwrap().unwrap();
    repo.upsert(StoredSecret {
        owner_id: "B".into(),
        ..leaked
    })
    .await
    .unwrap();

    assert_eq!(store.get("B", "openai_key").await, None);
    assert_eq!(store.get("B", "never_saved").await, None);
    assert_eq!(
        store.get("A", "openai_key").await.as_deref(),
        Some("sk-live-0123456789abcdefghij")
    );
}
