use radiks_types::{RecordId, SigningKeyId};
use std::collections::HashSet;
use std::str::FromStr;

// ── RecordId ─────────────────────────────────────────────────────

#[test]
fn record_id_new_is_unique() {
    let a = RecordId::new();
    let b = RecordId::new();
    assert_ne!(a, b);
}

#[test]
fn record_id_from_uuid_uses_hyphenated_form() {
    let uuid = uuid::Uuid::now_v7();
    let id = RecordId::from_uuid(uuid);
    assert_eq!(id.as_str(), uuid.to_string());
}

#[test]
fn record_id_display_and_parse() {
    let id = RecordId::new();
    let parsed = RecordId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn record_id_accepts_foreign_strings() {
    let id = RecordId::from_str("notfound").unwrap();
    assert_eq!(id.as_str(), "notfound");
}

#[test]
fn record_id_rejects_empty() {
    assert!(RecordId::parse("").is_err());
}

#[test]
fn record_id_rejects_path_separator() {
    assert!(RecordId::parse("TestModel/abc").is_err());
    assert!(RecordId::parse("line\nbreak").is_err());
}

#[test]
fn record_id_hash_and_eq() {
    let id = RecordId::new();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn record_id_serializes_as_plain_string() {
    let id = RecordId::parse("abc-123").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    let back: RecordId = serde_json::from_str("\"abc-123\"").unwrap();
    assert_eq!(back, id);
}

#[test]
fn record_id_deserialize_rejects_empty() {
    let result: Result<RecordId, _> = serde_json::from_str("\"\"");
    assert!(result.is_err());
}

#[test]
fn generated_record_ids_are_time_ordered() {
    let first = RecordId::new();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = RecordId::new();
    assert!(first < second);
}

// ── SigningKeyId ─────────────────────────────────────────────────

#[test]
fn signing_key_id_roundtrip() {
    let id = SigningKeyId::new();
    let parsed: SigningKeyId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn signing_key_id_rejects_empty() {
    assert!(SigningKeyId::parse("").is_err());
}

#[test]
fn signing_key_id_serde_transparent() {
    let id = SigningKeyId::parse("key-1").unwrap();
    let json = serde_json::to_value(&id).unwrap();
    assert_eq!(json, serde_json::json!("key-1"));
}
