//! The entry iterator: refill, optionally shuffle, then parse and advance.
//!
//! ```text
//!             cursor >= filled                 fill() == 0
//!   HasData ------------------> NeedsRefill -----------------> Exhausted
//!      ^                            |
//!      |        fill() == n > 0     |         fill() < 0, corrupt record,
//!      +----------------------------+         allocation failure
//!        (shuffle if randomizing)   +--------------------------> Failed
//! ```
//!
//! `Exhausted` and `Failed` are terminal: once either is reached the
//! iterator yields `None` forever and never calls the source again.

use core::iter::FusedIterator;

use log::{debug, warn};

use crate::batch::{clock_seed, shuffle_batch};
use crate::entry::DirEntry;
use crate::error::{Error, ReadError, Result};
use crate::options::Options;
use crate::record::parse_record;
use crate::sys::DirentSource;

#[cfg(any(target_os = "linux", target_os = "android"))]
use crate::sys::Getdents64;
#[cfg(any(target_os = "linux", target_os = "android"))]
use std::os::fd::AsFd;

/// Where the iterator is in the refill cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The buffer is consumed; the next call reads a new batch.
    NeedsRefill,
    /// At least one unparsed record is left in the buffer.
    HasData,
    /// The source reported end of directory.
    Exhausted,
    /// A read, decode, or allocation error was returned.
    Failed,
}

/// Lazy, single-pass iterator over the entries of one directory.
///
/// The buffer is allocated once at construction and reused for every batch.
/// Entries come out in kernel order, or shuffled within each batch when
/// [`Options::randomize`] is set. A new reader is needed to enumerate again;
/// results can differ if the directory changed in between.
#[derive(Debug)]
pub struct Dirents<S> {
    source: S,
    /// Fixed-capacity batch buffer
    buf: Vec<u8>,
    /// Bytes populated by the last refill
    filled: usize,
    /// Start of the next record to parse, `0 <= cursor <= filled`
    cursor: usize,
    randomize: bool,
    state: State,
    /// Successful, non-empty refills so far
    batches: u64,
    last_seed: Option<u64>,
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl<F: AsFd> Dirents<Getdents64<F>> {
    /// Read the directory behind `fd`.
    ///
    /// The descriptor should be opened with
    /// [`O_GETDENTS`](getdents_abi::O_GETDENTS); at minimum it must carry
    /// `O_DIRECTORY`. Pass a `BorrowedFd` to keep ownership of it.
    ///
    /// # Errors
    ///
    /// - `NotADirectory` if `fd` was not opened with `O_DIRECTORY`.
    /// - `InvalidArgument` if the buffer size is below
    ///   [`MIN_GETDENTS_BUFF_SIZE`](getdents_abi::MIN_GETDENTS_BUFF_SIZE).
    /// - `OutOfMemory` if the buffer cannot be allocated.
    pub fn new(fd: F, options: Options) -> Result<Self> {
        let source = Getdents64::new(fd)?;
        Self::with_source(source, options)
    }
}

impl<S: DirentSource> Dirents<S> {
    /// Read batches from an arbitrary source.
    pub fn with_source(source: S, options: Options) -> Result<Self> {
        options.validate()?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(options.buffer_size)
            .map_err(Error::out_of_memory(options.buffer_size))?;
        buf.resize(options.buffer_size, 0);

        Ok(Self {
            source,
            buf,
            filled: 0,
            cursor: 0,
            randomize: options.randomize,
            state: State::NeedsRefill,
            batches: 0,
            last_seed: None,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn is_randomized(&self) -> bool {
        self.randomize
    }

    /// Number of non-empty batches read so far.
    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get back the source, dropping the buffer.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Read the next batch. Returns `false` at end of directory.
    fn refill(&mut self) -> Result<bool> {
        let n = self
            .source
            .fill(&mut self.buf)
            .map_err(|e| Error::OsRead(ReadError::Syscall(e)))?;

        if n == 0 {
            debug!("getdents: end of directory after {} batches", self.batches);
            return Ok(false);
        }
        if n > self.buf.len() {
            return Err(ReadError::Corrupt {
                offset: 0,
                record_len: n,
                filled_len: self.buf.len(),
            }
            .into());
        }

        self.filled = n;
        self.cursor = 0;
        self.batches += 1;
        debug!("getdents: batch {} read {} bytes", self.batches, n);

        if self.randomize {
            let seed = self.next_seed();
            shuffle_batch(&mut self.buf, n, seed)?;
        }

        Ok(true)
    }

    /// A fresh seed for this batch, never equal to the previous one.
    fn next_seed(&mut self) -> u64 {
        let mut seed = clock_seed();
        if let Some(last) = self.last_seed {
            if seed <= last {
                seed = last.wrapping_add(1);
            }
        }
        self.last_seed = Some(seed);
        seed
    }

    fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        if self.state == State::NeedsRefill {
            if !self.refill()? {
                self.state = State::Exhausted;
                return Ok(None);
            }
            self.state = State::HasData;
        }

        let batch = &self.buf[..self.filled];
        let record = parse_record(batch, self.cursor)?;
        let entry = record.to_entry();

        self.cursor += record.record_len;
        if self.cursor >= self.filled {
            self.state = State::NeedsRefill;
        }

        Ok(Some(entry))
    }
}

impl<S: DirentSource> Iterator for Dirents<S> {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Exhausted | State::Failed => return None,
            State::NeedsRefill | State::HasData => {}
        }

        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => None,
            Err(e) => {
                warn!("getdents: stopping after error: {}", e);
                self.state = State::Failed;
                Some(Err(e))
            }
        }
    }
}

impl<S: DirentSource> FusedIterator for Dirents<S> {}
