//! Record layout and constants shared by the directory-read primitive and
//! its parsers.
//!
//! A batch returned by `getdents64(2)` is a contiguous run of variable-length
//! `struct linux_dirent64` records:
//!
//! ```text
//! +--------+--------+--------+----------+------------------------+
//! | d_ino  | d_off  | reclen | d_type   | d_name ... NUL padding |
//! | u64    | i64    | u16    | u8       |                        |
//! +--------+--------+--------+----------+------------------------+
//! 0        8        16       18         19                  reclen
//! ```
//!
//! `reclen` is the distance to the next record. The kernel pads it to an
//! 8-byte boundary, so it is always even and never smaller than
//! [`RECORD_HEADER_SIZE`]. Bytes after the name's NUL terminator are padding.

#![cfg_attr(not(test), no_std)]

use zerocopy::byteorder::native_endian::{I64, U16, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

// =============================================================================
// Record layout
// =============================================================================

/// Offset of `d_name` within a record.
pub const NAME_OFFSET: usize = 19;

/// Offset of `d_reclen` within a record.
pub const RECLEN_OFFSET: usize = 16;

/// Size of `struct linux_dirent64` as a C compiler lays it out: the 19 header
/// bytes padded to the 8-byte alignment of `d_ino`. This is also the smallest
/// record the kernel emits (a one-byte name plus NUL rounds up to it).
pub const RECORD_HEADER_SIZE: usize = 24;

/// Record lengths are rounded up to this boundary.
pub const RECORD_ALIGN: usize = 8;

/// Longest file name a directory entry can carry (`MAXNAMLEN`).
pub const MAX_NAME_LEN: usize = 255;

/// Smallest buffer guaranteed to hold one record of any name length: a
/// [`MAX_NAME_LEN`] name with its header, NUL and padding.
pub const MIN_GETDENTS_BUFF_SIZE: usize = record_len_for(MAX_NAME_LEN);

/// Default buffer size: 64 KiB, enough for a few thousand short names per
/// syscall.
pub const DEFAULT_BUFF_SIZE: usize = 4096 * 16;

/// Fixed header of a `linux_dirent64` record.
///
/// Fields use native-endian wrappers so the header can be read from any byte
/// offset without alignment requirements.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Dirent64Header {
    /// 64-bit inode number
    pub d_ino: U64,
    /// Filesystem cookie for the next record (opaque)
    pub d_off: I64,
    /// Size of this record, header and padding included
    pub d_reclen: U16,
    /// File type tag (`DT_*`)
    pub d_type: u8,
    // Name follows (NUL-terminated, padded to `d_reclen`)
}

const _: () = assert!(core::mem::size_of::<Dirent64Header>() == NAME_OFFSET);

impl Dirent64Header {
    pub fn new(inode: u64, next_off: i64, record_len: u16, type_tag: u8) -> Self {
        Self {
            d_ino: U64::new(inode),
            d_off: I64::new(next_off),
            d_reclen: U16::new(record_len),
            d_type: type_tag,
        }
    }

    pub fn inode(&self) -> u64 {
        self.d_ino.get()
    }

    pub fn record_len(&self) -> u16 {
        self.d_reclen.get()
    }

    pub fn type_tag(&self) -> u8 {
        self.d_type
    }
}

/// Align a value up to the record boundary.
const fn align_record(val: usize) -> usize {
    (val + RECORD_ALIGN - 1) & !(RECORD_ALIGN - 1)
}

/// Record length the kernel would use for a name of `name_len` bytes
/// (header + name + NUL, rounded up to 8 bytes).
pub const fn record_len_for(name_len: usize) -> usize {
    align_record(NAME_OFFSET + name_len + 1)
}

/// Write one record into `buf` at `pos`, returning its record length.
///
/// The name is NUL-terminated and the padding up to the record length is
/// zero-filled. Returns `None` if the name is empty, longer than
/// [`MAX_NAME_LEN`], contains a NUL byte, or the record would not fit.
pub fn write_record(
    buf: &mut [u8],
    pos: usize,
    inode: u64,
    next_off: i64,
    type_tag: u8,
    name: &[u8],
) -> Option<usize> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || name.contains(&0) {
        return None;
    }

    let rec_len = record_len_for(name.len());
    let end = pos.checked_add(rec_len)?;
    let record = buf.get_mut(pos..end)?;

    let header = Dirent64Header::new(inode, next_off, rec_len as u16, type_tag);
    record[..NAME_OFFSET].copy_from_slice(header.as_bytes());
    record[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name);
    // NUL terminator and padding
    for b in &mut record[NAME_OFFSET + name.len()..] {
        *b = 0;
    }

    Some(rec_len)
}

// =============================================================================
// File type tags
// =============================================================================

/// Unknown type; the filesystem does not fill in `d_type`
pub const DT_UNKNOWN: u8 = 0;
/// Named pipe
pub const DT_FIFO: u8 = 1;
/// Character device
pub const DT_CHR: u8 = 2;
/// Directory
pub const DT_DIR: u8 = 4;
/// Block device
pub const DT_BLK: u8 = 6;
/// Regular file
pub const DT_REG: u8 = 8;
/// Symbolic link
pub const DT_LNK: u8 = 10;
/// Unix domain socket
pub const DT_SOCK: u8 = 12;

// =============================================================================
// Open flags
// =============================================================================

/// Flags a directory descriptor should be opened with before it is handed to
/// the reader: directory-only, read-only, non-blocking, close-on-exec.
#[cfg(unix)]
pub const O_GETDENTS: libc::c_int =
    libc::O_DIRECTORY | libc::O_RDONLY | libc::O_NONBLOCK | libc::O_CLOEXEC;
