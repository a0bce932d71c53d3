//! The raw directory-read primitive.
//!
//! Reading directory entries straight into a caller buffer is not a portable
//! operation. It is modelled as the [`DirentSource`] capability, with one
//! implementation per supported platform. Currently only Linux (and Android)
//! provide one, via `getdents64(2)`.

use std::io;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod linux;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use linux::{Getdents64, check_directory};

/// Something that can fill a buffer with raw `linux_dirent64` records.
pub trait DirentSource {
    /// Read the next batch of records into `buf`, returning the number of
    /// bytes written. `Ok(0)` means the directory is exhausted.
    ///
    /// Implementations write whole records only and never more than
    /// `buf.len()` bytes.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<S: DirentSource + ?Sized> DirentSource for &mut S {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).fill(buf)
    }
}

impl<S: DirentSource + ?Sized> DirentSource for Box<S> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).fill(buf)
    }
}
