//! Path-level helpers: open a directory and walk its entries.
//!
//! These own the descriptor they open and close it when the iterator is
//! dropped. They list a single directory; nothing here recurses.

use std::fs::OpenOptions;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use getdents_abi::O_GETDENTS;

use crate::dirents::Dirents;
use crate::entry::DirEntry;
use crate::error::Result;
use crate::options::Options;
use crate::sys::Getdents64;

/// Open `path` for reading with `O_GETDENTS`
/// (`O_DIRECTORY | O_RDONLY | O_NONBLOCK | O_CLOEXEC`).
pub fn open_dir<P: AsRef<Path>>(path: P) -> io::Result<OwnedFd> {
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(O_GETDENTS)
        .open(path)?;
    Ok(OwnedFd::from(file))
}

/// Entries of one directory, with `..` left out.
#[derive(Debug)]
pub struct Entries {
    inner: Dirents<Getdents64<OwnedFd>>,
}

impl Entries {
    /// Get back the underlying reader.
    pub fn into_inner(self) -> Dirents<Getdents64<OwnedFd>> {
        self.inner
    }
}

impl AsRef<Dirents<Getdents64<OwnedFd>>> for Entries {
    fn as_ref(&self) -> &Dirents<Getdents64<OwnedFd>> {
        &self.inner
    }
}

impl Iterator for Entries {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.name == b".." => continue,
                other => return Some(other),
            }
        }
    }
}

/// Names of one directory, with both `.` and `..` left out.
#[derive(Debug)]
pub struct Names {
    inner: Entries,
}

impl Iterator for Names {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.name == b"." => continue,
                Ok(entry) => return Some(Ok(entry.name)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Open `path` and iterate over its entries, skipping `..`.
///
/// `.` is kept so callers can learn the directory's own inode.
pub fn getdents<P: AsRef<Path>>(path: P, options: Options) -> Result<Entries> {
    let fd = open_dir(path)?;
    let inner = Dirents::new(fd, options)?;
    Ok(Entries { inner })
}

/// Open `path` and iterate over the entry names, skipping `.` and `..`.
pub fn names<P: AsRef<Path>>(path: P, options: Options) -> Result<Names> {
    Ok(Names {
        inner: getdents(path, options)?,
    })
}
