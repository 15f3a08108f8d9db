use rdiffcore::{generate_signature, Encoder, SignatureIndex};
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};

fn main() -> io::Result<()> {
    let old_path = "old_file.txt";
    let new_path = "new_file.txt";
    let patched_path = "reconstructed_file.txt";

    let _ = fs::remove_file(old_path);
    let _ = fs::remove_file(new_path);
    let _ = fs::remove_file(patched_path);

    println!("Creating test files...");
    fs::write(
        old_path,
        b"This is a large-ish file.\nIt has multiple lines.\nSome stay the same.\n",
    )?;
    fs::write(
        new_path,
        b"This is a large-ish file.\nIt has CHANGED lines.\nSome stay the same.\nAnd new lines added.\n",
    )?;

    println!("Old file size: {} bytes", fs::metadata(old_path)?.len());
    println!("New file size: {} bytes", fs::metadata(new_path)?.len());

    println!("Generating signature of {old_path}");
    let mut old_file = File::open(old_path)?;
    let sig = generate_signature(&mut old_file).map_err(io::Error::other)?;
    let index = SignatureIndex::from_signature(&sig);

    println!("Encoding delta for {new_path}");
    let mut new_file = File::open(new_path)?;
    let mut delta = Vec::new();
    let stats = Encoder::new()
        .encode(&index, &mut new_file, &mut delta)
        .map_err(io::Error::other)?;
    println!(
        "Delta has {} literal bytes and {} copy bytes ({} bytes on the wire)",
        stats.lit_bytes,
        stats.copy_bytes,
        delta.len()
    );

    println!("Applying delta to reconstruct content at {patched_path}");
    old_file.seek(SeekFrom::Start(0))?;
    let mut patched_file = File::create(patched_path)?;
    rdiffcore::apply(old_file, &delta[..], &mut patched_file).map_err(io::Error::other)?;

    let new_content = fs::read(new_path)?;
    let patched_content = fs::read(patched_path)?;

    if new_content == patched_content {
        println!("Success! {patched_path} matches {new_path}");
    } else {
        eprintln!("Error! Files do not match.");
        std::process::exit(1);
    }

    fs::remove_file(old_path)?;
    fs::remove_file(new_path)?;
    fs::remove_file(patched_path)?;

    Ok(())
}
