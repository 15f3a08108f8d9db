//! Fixed-width big-endian integer framing.
//!
//! Plain byte-order helpers with no opinion on what a short read means — callers
//! decide whether a truncated signature stream and a truncated delta stream should
//! surface as different errors, and map `io::ErrorKind::UnexpectedEof` accordingly.

use std::io::{self, Read, Write};

/// Reads exactly `buf.len()` bytes or until EOF, returning the number of bytes read.
///
/// Short of a full buffer only at end of stream; used for readahead fills and
/// signature-record scanning, where a short read is meaningful (EOF) rather than an
/// error.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Reads a big-endian `u8`.
pub fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Writes a `u8`.
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

/// Reads a big-endian `u32`.
pub fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Writes a big-endian `u32`.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

/// Reads a big-endian `u64`.
pub fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Writes a big-endian `u64`.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip_u32() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 0xDEAD_BEEF).unwrap();
        assert_eq!(read_u32(&mut Cursor::new(buf)).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn roundtrip_u64() {
        let mut buf = Vec::new();
        write_u64(&mut buf, u64::MAX - 1).unwrap();
        assert_eq!(read_u64(&mut Cursor::new(buf)).unwrap(), u64::MAX - 1);
    }

    #[test]
    fn short_read_is_unexpected_eof() {
        let buf = [0u8; 2];
        let err = read_u32(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_exact_or_eof_reports_partial_reads() {
        let data = b"abc";
        let mut buf = [0u8; 8];
        let n = read_exact_or_eof(&mut Cursor::new(&data[..]), &mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..3], b"abc");
    }
}
