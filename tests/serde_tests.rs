#![cfg(feature = "serde")]

use rdiffcore::{generate_signature_with_block_size, Signature, SignatureRecord};

#[test]
fn signature_roundtrips_through_json() {
    let data = b"Hello, world! This is a test for serde serialization.";
    let sig = generate_signature_with_block_size(&data[..], 8).unwrap();

    let json = serde_json::to_string(&sig).unwrap();
    let deserialized: Signature = serde_json::from_str(&json).unwrap();

    assert_eq!(sig.block_len, deserialized.block_len);
    assert_eq!(sig.records.len(), deserialized.records.len());
    for (original, round_tripped) in sig.records.iter().zip(deserialized.records.iter()) {
        assert_eq!(original.weak, round_tripped.weak);
        assert_eq!(original.strong, round_tripped.strong);
    }
}

#[test]
fn signature_record_roundtrips_through_json() {
    let record = SignatureRecord {
        weak: 0xDEAD_BEEF,
        strong: rdiffcore::strong::strong_sum(b"one block of content"),
    };

    let json = serde_json::to_string(&record).unwrap();
    let deserialized: SignatureRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(record, deserialized);
}

#[test]
fn empty_signature_roundtrips() {
    let sig = generate_signature_with_block_size(&b""[..], 8).unwrap();
    let json = serde_json::to_string(&sig).unwrap();
    let deserialized: Signature = serde_json::from_str(&json).unwrap();
    assert_eq!(sig, deserialized);
}
