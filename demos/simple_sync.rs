use rdiffcore::{generate_signature, Encoder, SignatureIndex};
use std::io::Cursor;

fn main() {
    let original = b"Hello, world! This is the original content of the file.";
    let modified = b"Hello, Rust! This is the modified content of the file.";

    println!("Original: {:?}", String::from_utf8_lossy(original));
    println!("Modified: {:?}", String::from_utf8_lossy(modified));

    let sig = generate_signature(&original[..]).unwrap();
    println!("\nGenerated {} signature records", sig.records.len());

    let index = SignatureIndex::from_signature(&sig);
    let mut delta = Vec::new();
    let stats = Encoder::new().encode(&index, &modified[..], &mut delta).unwrap();
    println!(
        "Encoded delta: {} literal bytes, {} copy bytes, {} bytes on the wire",
        stats.lit_bytes,
        stats.copy_bytes,
        delta.len()
    );

    let mut reconstructed = Vec::new();
    rdiffcore::apply(Cursor::new(&original[..]), &delta[..], &mut reconstructed).unwrap();

    assert_eq!(reconstructed, modified);
    println!("\nReconstructed: {:?}", String::from_utf8_lossy(&reconstructed));
    println!("Success! Original + delta = modified");
}
