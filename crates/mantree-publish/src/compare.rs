//! Byte-for-byte file comparison.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 8 * 1024;

/// Return true if `target` exists and holds exactly the bytes of `source`.
///
/// Sizes are compared first; contents are read only when they match.
/// Timestamps and permissions are ignored.
pub fn same_contents(source: &Path, target: &Path) -> io::Result<bool> {
    let target_meta = match fs::metadata(target) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if !target_meta.is_file() {
        return Ok(false);
    }
    if fs::metadata(source)?.len() != target_meta.len() {
        return Ok(false);
    }

    let mut a = BufReader::new(File::open(source)?);
    let mut b = BufReader::new(File::open(target)?);
    let mut buf_a = [0u8; CHUNK_SIZE];
    let mut buf_b = [0u8; CHUNK_SIZE];

    loop {
        let n = read_full(&mut a, &mut buf_a)?;
        let m = read_full(&mut b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; returns bytes read (0 at EOF).
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_files() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, "same bytes").unwrap();
        fs::write(&b, "same bytes").unwrap();

        assert!(same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_same_size_different_bytes() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, "abc").unwrap();
        fs::write(&b, "abd").unwrap();

        assert!(!same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_different_sizes() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, "abc").unwrap();
        fs::write(&b, "abcd").unwrap();

        assert!(!same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_large_files_differ_in_last_chunk() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        let mut content = vec![b'x'; CHUNK_SIZE * 3 + 17];
        fs::write(&a, &content).unwrap();
        if let Some(last) = content.last_mut() {
            *last = b'y';
        }
        fs::write(&b, &content).unwrap();

        assert!(!same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_missing_target() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        fs::write(&a, "x").unwrap();

        assert!(!same_contents(&a, &temp.path().join("missing")).unwrap());
    }

    #[test]
    fn test_target_is_directory() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        fs::write(&a, "x").unwrap();

        assert!(!same_contents(&a, temp.path()).unwrap());
    }

    #[test]
    fn test_empty_files() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        assert!(same_contents(&a, &b).unwrap());
    }
}
