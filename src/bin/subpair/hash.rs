use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

/// Number of bytes read from both ends of the file.
const HASH_CHUNK_SIZE: u64 = 64 * 1024;

/// Compute the `OpenSubtitles` movie hash.
///
/// The hash is the file size plus the sum of the first and last 64 KiB
/// read as little-endian 64-bit words, with wrapping addition.
pub fn movie_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .len();

    if size < HASH_CHUNK_SIZE {
        anyhow::bail!("File is too small for movie hash ({size} bytes): {}", path.display());
    }

    let mut buffer = vec![0_u8; HASH_CHUNK_SIZE as usize];

    file.read_exact(&mut buffer)?;
    let mut hash = add_words(size, &buffer);

    file.seek(SeekFrom::Start(size - HASH_CHUNK_SIZE))?;
    file.read_exact(&mut buffer)?;
    hash = add_words(hash, &buffer);

    Ok(format!("{hash:016x}"))
}

fn add_words(hash: u64, chunk: &[u8]) -> u64 {
    chunk.chunks_exact(8).fold(hash, |sum, word| {
        let mut bytes = [0_u8; 8];
        bytes.copy_from_slice(word);
        sum.wrapping_add(u64::from_le_bytes(bytes))
    })
}
