//! `getdents64(2)` on Linux.

use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};

use log::warn;

use super::DirentSource;
use crate::error::{Error, Result};

/// Check that `fd` was opened with `O_DIRECTORY`.
pub fn check_directory(fd: BorrowedFd<'_>) -> Result<()> {
    // SAFETY: F_GETFL takes no argument and only reads descriptor state.
    let flags = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_GETFL) };
    if flags < 0 {
        return Err(Error::Io(io::Error::last_os_error()));
    }
    if flags & libc::O_DIRECTORY == 0 {
        return Err(Error::NotADirectory);
    }
    Ok(())
}

/// A directory descriptor read with `getdents64`.
///
/// `F` decides ownership: a `BorrowedFd` leaves the descriptor with the
/// caller, an `OwnedFd` closes it when the reader is dropped.
#[derive(Debug)]
pub struct Getdents64<F> {
    fd: F,
}

impl<F: AsFd> Getdents64<F> {
    /// Wrap a descriptor, which must have been opened with `O_DIRECTORY`.
    pub fn new(fd: F) -> Result<Self> {
        check_directory(fd.as_fd())?;
        Ok(Self { fd })
    }

    /// Get back the descriptor.
    pub fn into_inner(self) -> F {
        self.fd
    }
}

impl<F: AsFd> AsFd for Getdents64<F> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl<F: AsFd> DirentSource for Getdents64<F> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // The count argument is an unsigned int and the kernel caps reads at
        // INT_MAX anyway.
        let count = buf.len().min(libc::c_int::MAX as usize) as libc::c_uint;

        // SAFETY: the kernel writes at most `count` bytes into `buf`, which is
        // valid for writes of `buf.len() >= count` bytes.
        let nread = unsafe {
            libc::syscall(
                libc::SYS_getdents64,
                self.fd.as_fd().as_raw_fd(),
                buf.as_mut_ptr(),
                count,
            )
        };

        if nread < 0 {
            let err = io::Error::last_os_error();
            warn!("getdents64 on fd {} failed: {}", self.fd.as_fd().as_raw_fd(), err);
            return Err(err);
        }
        Ok(nread as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::os::fd::OwnedFd;

    #[test]
    fn test_regular_file_rejected() {
        let file = tempfile::tempfile().unwrap();
        assert!(matches!(check_directory(file.as_fd()), Err(Error::NotADirectory)));
        assert!(matches!(Getdents64::new(file.as_fd()), Err(Error::NotADirectory)));
    }

    #[test]
    fn test_directory_without_flag_rejected() {
        // std opens without O_DIRECTORY
        let dir = tempfile::tempdir().unwrap();
        let file = File::open(dir.path()).unwrap();
        assert!(matches!(check_directory(file.as_fd()), Err(Error::NotADirectory)));
    }

    #[test]
    fn test_fill_reads_dot_entries() {
        let dir = tempfile::tempdir().unwrap();
        let fd: OwnedFd = crate::open::open_dir(dir.path()).unwrap();
        let mut source = Getdents64::new(fd).unwrap();

        let mut buf = vec![0u8; 4096];
        let n = source.fill(&mut buf).unwrap();
        // "." and ".." are 24 bytes each
        assert_eq!(n, 48);
        assert_eq!(source.fill(&mut buf).unwrap(), 0);
    }
}
