//! Binary save-file format for a whole game.
//!
//! Format:
//! - Header (32 bytes):
//!   - Magic: "JNGL" (4 bytes)
//!   - Version: u32 LE (4 bytes)
//!   - Payload length: u64 LE (8 bytes)
//!   - Checksum: u64 LE xxhash of payload (8 bytes)
//!   - Reserved: 8 bytes (zeros)
//! - Payload: JSON-encoded [`Snapshot`]

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use jungle_core::{Game, Snapshot};
use log::debug;
use xxhash_rust::xxh64::xxh64;

const MAGIC: &[u8; 4] = b"JNGL";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 32;

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

/// Write `game` to `path`. Returns the number of bytes written.
pub fn save(path: &Path, game: &Game) -> io::Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write(&mut writer, game)?;
    writer.flush()?;
    debug!("saved {} bytes to {}", written, path.display());
    Ok(written)
}

pub fn write<W: Write>(mut out: W, game: &Game) -> io::Result<usize> {
    let payload = serde_json::to_vec(&game.snapshot()).map_err(io::Error::other)?;
    let checksum = xxh64(&payload, 0);

    // Header
    out.write_all(MAGIC)?;
    out.write_all(&VERSION.to_le_bytes())?;
    out.write_all(&(payload.len() as u64).to_le_bytes())?;
    out.write_all(&checksum.to_le_bytes())?;
    out.write_all(&[0u8; 8])?; // Reserved

    // Payload
    out.write_all(&payload)?;

    Ok(HEADER_SIZE + payload.len())
}

/// Read a game back from `path`.
pub fn load(path: &Path) -> io::Result<Game> {
    let game = read(BufReader::new(File::open(path)?))?;
    debug!("loaded {}", path.display());
    Ok(game)
}

pub fn read<R: Read>(mut input: R) -> io::Result<Game> {
    let mut header = [0u8; HEADER_SIZE];
    input.read_exact(&mut header)?;

    if &header[0..4] != MAGIC {
        return Err(invalid("not a jungle save file"));
    }

    let version = le_u32(&header[4..8]);
    if version != VERSION {
        return Err(invalid(format!("unsupported save version: {}", version)));
    }

    let len = usize::try_from(le_u64(&header[8..16]))
        .map_err(|_| invalid("payload length does not fit in memory"))?;
    let stored_checksum = le_u64(&header[16..24]);

    let mut payload = Vec::new();
    input.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        return Err(invalid(format!(
            "truncated payload: expected {} bytes, found {}",
            len,
            payload.len()
        )));
    }

    if xxh64(&payload, 0) != stored_checksum {
        return Err(invalid("save file checksum mismatch"));
    }

    let snapshot: Snapshot = serde_json::from_slice(&payload).map_err(invalid_json)?;
    Game::restore(snapshot).map_err(|e| invalid(e.to_string()))
}

fn invalid_json(err: serde_json::Error) -> io::Error {
    invalid(format!("malformed save payload: {}", err))
}
