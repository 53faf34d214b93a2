use crate::errors::CoreError;

/// Magic bytes identifying a BullsBears dashboard snapshot.
pub const MAGIC: &[u8; 4] = b"BBDS";

/// Current snapshot format version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + payload_len(8)
pub const HEADER_SIZE: usize = 14;

/// Upper bound on a snapshot payload; a watchlist never gets near this.
pub const MAX_PAYLOAD_LEN: u64 = 64 * 1024 * 1024;

/// Header read from a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u16,
    pub payload_len: u64,
}

/// Frame a bincode payload.
///
/// Layout:
/// ```text
/// [BBDS: 4B] [version: 2B LE] [payload_len: 8B LE] [payload: variable]
/// ```
pub fn write_file(version: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Parse the header and return it with the payload slice.
pub fn read_file(data: &[u8]) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a BBDS snapshot".into(),
        ));
    }
    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes, not a BBDS snapshot".into(),
        ));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let payload_len = u64::from_le_bytes(data[6..HEADER_SIZE].try_into().map_err(|_| {
        CoreError::InvalidFileFormat("Failed to read payload length".into())
    })?);
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(CoreError::InvalidFileFormat(format!(
            "Payload length {payload_len} exceeds limit of {MAX_PAYLOAD_LEN} bytes"
        )));
    }

    let available = (data.len() - HEADER_SIZE) as u64;
    if available < payload_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {payload_len} payload bytes, got {available}"
        )));
    }

    let end = HEADER_SIZE + payload_len as usize;
    Ok((FileHeader { version, payload_len }, &data[HEADER_SIZE..end]))
}
