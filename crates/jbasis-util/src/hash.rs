use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

/// SHA-256 digest of an in-memory buffer as lowercase hex.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex(&Sha256::digest(data))
}

/// SHA-256 digest of a file as lowercase hex.
///
/// Streams the file through the hasher, so large artifacts are never
/// held in memory whole.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex(&hasher.finalize()))
}

fn hex(digest: &[u8]) -> String {
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}
