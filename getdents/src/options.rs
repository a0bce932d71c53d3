//! Construction options for a directory reader.

use getdents_abi::{DEFAULT_BUFF_SIZE, MIN_GETDENTS_BUFF_SIZE};

use crate::error::{Error, Result};

/// How a [`Dirents`](crate::Dirents) reader is set up.
///
/// A larger buffer means fewer syscalls for large directories. For best
/// throughput pick a multiple of the filesystem block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Bytes requested from the kernel per batch.
    pub buffer_size: usize,
    /// Shuffle the records of each batch before they are emitted.
    pub randomize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFF_SIZE,
            randomize: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Set the randomize flag from its integer form, where only `0` and `1`
    /// are accepted.
    pub fn with_raw_randomize(self, raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(self.randomize(false)),
            1 => Ok(self.randomize(true)),
            _ => Err(Error::InvalidArgument("random must be 0 or 1")),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.buffer_size < MIN_GETDENTS_BUFF_SIZE {
            return Err(Error::InvalidArgument("buff_size is too small"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.buffer_size, 64 * 1024);
        assert!(!opts.randomize);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let opts = Options::new().buffer_size(4096).randomize(true);
        assert_eq!(opts.buffer_size, 4096);
        assert!(opts.randomize);
    }

    #[test]
    fn test_min_buffer_boundary() {
        assert!(Options::new().buffer_size(MIN_GETDENTS_BUFF_SIZE).validate().is_ok());
        let err = Options::new()
            .buffer_size(MIN_GETDENTS_BUFF_SIZE - 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_raw_randomize() {
        assert!(!Options::new().randomize(true).with_raw_randomize(0).unwrap().randomize);
        assert!(Options::new().with_raw_randomize(1).unwrap().randomize);
        for bad in [-1, 2, 255] {
            assert!(matches!(
                Options::new().with_raw_randomize(bad),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}
