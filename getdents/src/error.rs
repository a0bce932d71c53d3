//! Error types for directory enumeration.
//!
//! Construction-time failures (`NotADirectory`, `InvalidArgument`,
//! `OutOfMemory`) mean no handle was created. `OsRead` is raised by the
//! iteration call that hit it; the iterator is finished afterwards.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Error type for getdents operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The descriptor was not opened with `O_DIRECTORY`.
    #[error("fd must be opened with O_DIRECTORY flag")]
    NotADirectory,
    /// A construction argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A buffer or scratch allocation failed.
    #[error("out of memory allocating {requested} bytes")]
    OutOfMemory { requested: usize },
    /// The directory-read primitive failed or returned a malformed batch.
    #[error("getdents64: {0}")]
    OsRead(#[from] ReadError),
    /// Opening or inspecting the directory descriptor failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failure while reading or decoding a batch.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The syscall itself returned an error.
    #[error(transparent)]
    Syscall(io::Error),
    /// A record length is too small, odd, or runs past the filled region.
    #[error("corrupt record at offset {offset}: reclen {record_len}, {filled_len} bytes filled")]
    Corrupt {
        offset: usize,
        record_len: usize,
        filled_len: usize,
    },
}

impl Error {
    /// Whether this error came from reading a batch.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Error::OsRead(_))
    }

    /// Map an allocator failure to `OutOfMemory` for a request of
    /// `requested` bytes.
    pub(crate) fn out_of_memory(requested: usize) -> impl FnOnce(TryReserveError) -> Error {
        move |_| Error::OutOfMemory { requested }
    }
}

/// Result type alias using the getdents Error type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::NotADirectory.to_string(),
            "fd must be opened with O_DIRECTORY flag"
        );
        assert_eq!(
            Error::InvalidArgument("buff_size is too small").to_string(),
            "invalid argument: buff_size is too small"
        );

        let corrupt = Error::from(ReadError::Corrupt {
            offset: 48,
            record_len: 7,
            filled_len: 96,
        });
        assert_eq!(
            corrupt.to_string(),
            "getdents64: corrupt record at offset 48: reclen 7, 96 bytes filled"
        );
        assert!(corrupt.is_read_error());
    }

    #[test]
    fn test_syscall_error_keeps_os_code() {
        let err = Error::from(ReadError::Syscall(io::Error::from_raw_os_error(libc::EBADF)));
        match err {
            Error::OsRead(ReadError::Syscall(e)) => assert_eq!(e.raw_os_error(), Some(libc::EBADF)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_memory_mapping() {
        let mut v: Vec<u8> = Vec::new();
        let err = v
            .try_reserve_exact(usize::MAX)
            .map_err(Error::out_of_memory(usize::MAX))
            .unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { requested } if requested == usize::MAX));
        assert!(!err.is_read_error());
    }
}
