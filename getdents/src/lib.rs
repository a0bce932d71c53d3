//! Directory enumeration over raw `getdents64(2)` batches.
//!
//! [`Dirents`] reads a directory descriptor straight into an owned buffer and
//! decodes each `linux_dirent64` record in turn, yielding the inode, the
//! `d_type` tag, and the raw name bytes of every entry without a per-entry
//! `stat`. Names are returned byte for byte; no encoding is assumed.
//!
//! With [`Options::randomize`] set, the records of each batch are shuffled
//! before any of them is returned. The shuffle is local to one batch: a
//! directory that needs several reads to list comes back as a sequence of
//! individually shuffled batches in kernel order. The seed is taken from the
//! wall clock and is not suitable where the order must be unpredictable.
//!
//! ```no_run
//! use getdents::{Dirents, Options, open_dir};
//! use std::os::fd::AsFd;
//!
//! let fd = open_dir("/tmp")?;
//! for entry in Dirents::new(fd.as_fd(), Options::default())? {
//!     let entry = entry?;
//!     println!("{} {:?} {:?}", entry.inode, entry.file_type(), entry.name_os());
//! }
//! # Ok::<(), getdents::Error>(())
//! ```
//!
//! A reader owns its buffer and has no internal locking; use one per thread.

pub mod batch;
mod dirents;
mod entry;
pub mod error;
mod options;
pub mod record;
pub mod sys;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod open;

pub use dirents::{Dirents, State};
pub use entry::{DirEntry, FileType};
pub use error::{Error, ReadError, Result};
pub use options::Options;
pub use sys::DirentSource;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use open::{Entries, Names, getdents, names, open_dir};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use sys::Getdents64;

pub use getdents_abi::{
    DEFAULT_BUFF_SIZE, DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, DT_UNKNOWN,
    MAX_NAME_LEN, MIN_GETDENTS_BUFF_SIZE,
};
#[cfg(unix)]
pub use getdents_abi::O_GETDENTS;
