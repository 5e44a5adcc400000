//! In-memory ZIP reader for `.cbz` and `.nhlcomic` archives.
//!
//! ## Parsing Strategy
//!
//! 1. Find the End of Central Directory (EOCD) record by scanning backwards
//!    from the end of the file (it may be followed by a comment)
//! 2. Parse every Central Directory File Header (CDFH)
//! 3. For each file, skip its Local File Header (LFH) and inflate the data
//!
//! Only STORED and DEFLATE members are extracted. Members that cannot be
//! extracted (other methods, encryption, bad CRC, broken deflate stream)
//! are logged and skipped; a broken container structure fails the archive.
//! ZIP64 archives are rejected.

use std::io::{self, Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use flate2::Crc;

use super::{ArchiveError, ArchiveReader, Entry};

const EOCD_SIGNATURE: &[u8] = b"PK\x05\x06";
const EOCD_SIZE: usize = 22;
const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
const LFH_SIZE: usize = 30;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
const MAX_COMMENT_SIZE: usize = 65535;

const FLAG_ENCRYPTED: u16 = 0x0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl From<u16> for CompressionMethod {
    fn from(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            other => CompressionMethod::Unknown(other),
        }
    }
}

/// Fields of the End of Central Directory record we need.
struct EndOfCentralDirectory {
    total_entries: u16,
    cd_size: u32,
    cd_offset: u32,
}

/// Central directory metadata for one member.
#[derive(Debug)]
struct MemberHeader {
    name: String,
    flags: u16,
    method: CompressionMethod,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    lfh_offset: u32,
}

/// Reads `.cbz`/`.nhlcomic` archives from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipReader;

impl ArchiveReader for ZipReader {
    fn open_entries(&self, path: &Path) -> Result<Vec<Entry>, ArchiveError> {
        let data = std::fs::read(path)?;
        ZipReader::read_entries(&data)
    }
}

impl ZipReader {
    /// Extract every file member from an in-memory ZIP archive.
    ///
    /// Directory members are omitted. The returned order follows the
    /// central directory.
    pub fn read_entries(data: &[u8]) -> Result<Vec<Entry>, ArchiveError> {
        let eocd = find_eocd(data)?;

        if eocd.total_entries == 0xFFFF || eocd.cd_size == 0xFFFF_FFFF || eocd.cd_offset == 0xFFFF_FFFF
        {
            return Err(ArchiveError::InvalidArchive(
                "ZIP64 archives are not supported".to_string(),
            ));
        }

        let cd_start = eocd.cd_offset as usize;
        let cd_end = cd_start
            .checked_add(eocd.cd_size as usize)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| invalid("central directory lies outside the file"))?;

        let mut cursor = Cursor::new(&data[cd_start..cd_end]);
        let mut entries = Vec::with_capacity(eocd.total_entries as usize);

        for _ in 0..eocd.total_entries {
            let header = parse_cdfh(&mut cursor)
                .map_err(|e| invalid(&format!("truncated central directory: {}", e)))?;

            if header.name.ends_with('/') {
                continue;
            }

            if let Some(content) = extract_member(data, &header)? {
                entries.push(Entry::new(header.name, content));
            }
        }

        tracing::debug!(entries = entries.len(), "read zip archive");
        Ok(entries)
    }
}

fn invalid(reason: &str) -> ArchiveError {
    ArchiveError::InvalidArchive(reason.to_string())
}

/// Locate and parse the EOCD record, allowing for a trailing comment.
fn find_eocd(data: &[u8]) -> Result<EndOfCentralDirectory, ArchiveError> {
    if data.len() < EOCD_SIZE {
        return Err(invalid("file too small to be a ZIP archive"));
    }

    let search_start = data.len().saturating_sub(MAX_COMMENT_SIZE + EOCD_SIZE);

    for i in (search_start..=data.len() - EOCD_SIZE).rev() {
        if &data[i..i + 4] != EOCD_SIGNATURE {
            continue;
        }

        // The comment length must account for every remaining byte
        let comment_len = u16::from_le_bytes([data[i + 20], data[i + 21]]) as usize;
        if comment_len != data.len() - i - EOCD_SIZE {
            continue;
        }

        let mut cursor = Cursor::new(&data[i + 4..i + EOCD_SIZE]);
        let read = |cursor: &mut Cursor<&[u8]>| -> io::Result<EndOfCentralDirectory> {
            let _disk_number = cursor.read_u16::<LittleEndian>()?;
            let _disk_with_cd = cursor.read_u16::<LittleEndian>()?;
            let _disk_entries = cursor.read_u16::<LittleEndian>()?;
            let total_entries = cursor.read_u16::<LittleEndian>()?;
            let cd_size = cursor.read_u32::<LittleEndian>()?;
            let cd_offset = cursor.read_u32::<LittleEndian>()?;
            Ok(EndOfCentralDirectory {
                total_entries,
                cd_size,
                cd_offset,
            })
        };
        return read(&mut cursor).map_err(ArchiveError::from);
    }

    Err(invalid("end of central directory not found"))
}

fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> io::Result<MemberHeader> {
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "bad central directory signature",
        ));
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let flags = cursor.read_u16::<LittleEndian>()?;
    let method = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()?;
    let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
    let name_len = cursor.read_u16::<LittleEndian>()?;
    let extra_len = cursor.read_u16::<LittleEndian>()?;
    let comment_len = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let lfh_offset = cursor.read_u32::<LittleEndian>()?;

    let mut name_bytes = vec![0u8; name_len as usize];
    cursor.read_exact(&mut name_bytes)?;
    let name = String::from_utf8_lossy(&name_bytes).into_owned();

    // Extra field and comment are not needed
    cursor.set_position(cursor.position() + extra_len as u64 + comment_len as u64);

    Ok(MemberHeader {
        name,
        flags,
        method: CompressionMethod::from(method),
        crc32,
        compressed_size,
        uncompressed_size,
        lfh_offset,
    })
}

/// Extract one member's bytes.
///
/// `Ok(None)` means the member was skipped; an `Err` means the container
/// itself is broken.
fn extract_member(data: &[u8], header: &MemberHeader) -> Result<Option<Vec<u8>>, ArchiveError> {
    let lfh_start = header.lfh_offset as usize;
    let lfh = data
        .get(lfh_start..)
        .and_then(|rest| rest.get(..LFH_SIZE))
        .filter(|lfh| &lfh[0..4] == LFH_SIGNATURE)
        .ok_or_else(|| invalid(&format!("bad local header for {}", header.name)))?;

    let name_len = u16::from_le_bytes([lfh[26], lfh[27]]) as usize;
    let extra_len = u16::from_le_bytes([lfh[28], lfh[29]]) as usize;
    let data_start = lfh_start + LFH_SIZE + name_len + extra_len;
    let compressed = data
        .get(data_start..)
        .and_then(|rest| rest.get(..header.compressed_size as usize))
        .ok_or_else(|| invalid(&format!("data for {} lies outside the file", header.name)))?;

    if header.flags & FLAG_ENCRYPTED != 0 {
        tracing::warn!(entry = %header.name, "skipping encrypted zip member");
        return Ok(None);
    }

    let content = match header.method {
        CompressionMethod::Stored => compressed.to_vec(),
        CompressionMethod::Deflate => {
            // Output is capped at the declared size and never pre-sized from it
            let mut out = Vec::new();
            let mut inflater =
                DeflateDecoder::new(compressed).take(u64::from(header.uncompressed_size));
            if let Err(e) = inflater.read_to_end(&mut out) {
                tracing::warn!(entry = %header.name, error = %e, "skipping corrupt deflate stream");
                return Ok(None);
            }
            out
        }
        CompressionMethod::Unknown(method) => {
            tracing::warn!(entry = %header.name, method, "skipping zip member with unsupported compression");
            return Ok(None);
        }
    };

    let mut crc = Crc::new();
    crc.update(&content);
    if crc.sum() != header.crc32 {
        tracing::warn!(entry = %header.name, "skipping zip member with CRC mismatch");
        return Ok(None);
    }

    Ok(Some(content))
}
