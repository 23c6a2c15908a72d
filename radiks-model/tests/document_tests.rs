use pretty_assertions::assert_eq;
use radiks_model::{Document, ModelError, keys};
use radiks_types::{RecordId, SigningKeyId, Timestamp};
use serde_json::{Map, json};

fn sample() -> Document {
    let mut fields = Map::new();
    fields.insert("name".into(), json!("tester"));
    fields.insert("description".into(), json!("c2VhbGVk"));
    Document {
        id: RecordId::parse("rec-1").unwrap(),
        model_type: "TestModel".into(),
        created_at: Some(Timestamp::from_millis(1_546_300_800_000)),
        updated_at: Timestamp::from_millis(1_546_300_800_000),
        signing_key_id: SigningKeyId::parse("personal").unwrap(),
        signature: "ab".repeat(64),
        user_group_id: None,
        fields,
    }
}

#[test]
fn serializes_as_flat_object() {
    let value = sample().to_value().unwrap();
    assert_eq!(value["_id"], json!("rec-1"));
    assert_eq!(value["radiksType"], json!("TestModel"));
    assert_eq!(value["updatedAt"], json!(1_546_300_800_000_i64));
    assert_eq!(value["signingKeyId"], json!("personal"));
    assert_eq!(value["name"], json!("tester"));
    assert!(value.get("fields").is_none());
    assert!(value.get("userGroupId").is_none());
}

#[test]
fn parses_back_from_value() {
    let doc = sample();
    let parsed = Document::from_value(doc.to_value().unwrap()).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn parses_from_bytes() {
    let bytes = sample().to_vec().unwrap();
    let parsed = Document::from_slice(&bytes).unwrap();
    assert_eq!(parsed.blob_path(), "TestModel/rec-1");
}

#[test]
fn missing_signature_is_invalid() {
    let value = json!({
        "_id": "rec-1",
        "radiksType": "TestModel",
        "updatedAt": 1,
        "signingKeyId": "personal"
    });
    let err = Document::from_value(value).unwrap_err();
    assert!(matches!(err, ModelError::InvalidDocument(_)));
}

#[test]
fn non_object_is_invalid() {
    assert!(matches!(
        Document::from_value(json!([1, 2])),
        Err(ModelError::InvalidDocument(_))
    ));
    assert!(Document::from_slice(b"not json").is_err());
}

#[test]
fn created_at_optional() {
    let value = json!({
        "_id": "rec-1",
        "radiksType": "TestModel",
        "updatedAt": 5,
        "signingKeyId": "personal",
        "radiksSignature": "00"
    });
    let doc = Document::from_value(value).unwrap();
    assert!(doc.created_at.is_none());
    assert!(doc.fields.is_empty());
}

#[test]
fn shadowing_reserved_key_rejected_on_write() {
    let mut doc = sample();
    doc.fields.insert(keys::SIGNATURE.into(), json!("forged"));
    assert!(matches!(doc.to_value(), Err(ModelError::InvalidDocument(_))));
    assert!(doc.to_vec().is_err());
}

#[test]
fn expect_type_checks_tag() {
    let doc = sample();
    doc.expect_type("TestModel").unwrap();
    let err = doc.expect_type("Other").unwrap_err();
    assert!(matches!(err, ModelError::TypeMismatch { .. }));
}

#[test]
fn field_lookup_covers_reserved_keys() {
    let doc = sample();
    assert_eq!(doc.field("_id"), Some(json!("rec-1")));
    assert_eq!(doc.field("radiksType"), Some(json!("TestModel")));
    assert_eq!(doc.field("signingKeyId"), Some(json!("personal")));
    assert_eq!(doc.field("name"), Some(json!("tester")));
    assert_eq!(doc.field("userGroupId"), None);
    assert_eq!(doc.field("missing"), None);
}

#[test]
fn reserved_key_helpers() {
    assert!(keys::is_reserved("_id"));
    assert!(keys::is_reserved("$or"));
    assert!(keys::is_reserved("limit"));
    assert!(!keys::is_reserved("name"));
}
