//! Decoding single `linux_dirent64` records out of a filled batch.
//!
//! Every access is bounds-checked against the filled region of the batch:
//! a record must start with a full header, carry an even record length of at
//! least [`RECORD_HEADER_SIZE`], and end at or before the end of the batch.
//! Anything else is reported as [`ReadError::Corrupt`].

use getdents_abi::{Dirent64Header, NAME_OFFSET, RECLEN_OFFSET, RECORD_HEADER_SIZE};
use zerocopy::FromBytes;
use zerocopy::byteorder::native_endian::U16;

use crate::entry::DirEntry;
use crate::error::ReadError;

/// A record decoded in place. Borrows the batch it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    /// Inode number
    pub inode: u64,
    /// Raw `d_type` tag
    pub type_tag: u8,
    /// Bytes from this record's start to the next one's
    pub record_len: usize,
    /// Name bytes up to (not including) the NUL terminator
    pub name: &'a [u8],
}

impl RecordView<'_> {
    /// Copy the name out into an owned entry.
    pub fn to_entry(&self) -> DirEntry {
        DirEntry {
            inode: self.inode,
            type_tag: self.type_tag,
            name: self.name.to_vec(),
        }
    }
}

/// Read only the `d_reclen` field of the record starting at `offset`, and
/// check that the record fits inside `batch`.
pub fn record_len_at(batch: &[u8], offset: usize) -> Result<usize, ReadError> {
    let corrupt = |record_len| ReadError::Corrupt {
        offset,
        record_len,
        filled_len: batch.len(),
    };

    let field = offset
        .checked_add(RECLEN_OFFSET)
        .and_then(|start| batch.get(start..start.checked_add(2)?))
        .ok_or_else(|| corrupt(0))?;
    let record_len = U16::read_from_bytes(field)
        .map_err(|_| corrupt(0))?
        .get() as usize;

    if record_len < RECORD_HEADER_SIZE || record_len % 2 != 0 {
        return Err(corrupt(record_len));
    }
    if offset + record_len > batch.len() {
        return Err(corrupt(record_len));
    }

    Ok(record_len)
}

/// Decode the record starting at `offset`.
///
/// The name is the NUL-terminated run right after the header, bounded by the
/// record length. Padding after the terminator is never looked at. A record
/// without a terminator inside its own span is corrupt.
pub fn parse_record(batch: &[u8], offset: usize) -> Result<RecordView<'_>, ReadError> {
    let record_len = record_len_at(batch, offset)?;
    let record = &batch[offset..offset + record_len];

    let corrupt = || ReadError::Corrupt {
        offset,
        record_len,
        filled_len: batch.len(),
    };

    let (header, _) = Dirent64Header::read_from_prefix(record).map_err(|_| corrupt())?;
    let name_area = &record[NAME_OFFSET..];
    let name_len = name_area
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(corrupt)?;

    Ok(RecordView {
        inode: header.inode(),
        type_tag: header.type_tag(),
        record_len,
        name: &name_area[..name_len],
    })
}
