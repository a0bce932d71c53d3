//! Indexing and shuffling one filled batch.
//!
//! Records in a batch have variable length, so reordering them needs an index
//! of where each one starts. [`index_batch`] walks the batch once reading
//! only `d_reclen`. [`shuffle_batch`] permutes that index and copies every
//! record, byte for byte, into a scratch buffer in the new order before
//! installing it back over the batch.
//!
//! Shuffling is per batch. A directory that takes several refills to list is
//! only randomized within each refill; batches still arrive in kernel order.

use std::time::{SystemTime, UNIX_EPOCH};

use batch_shuffle::ShuffleContext;
use getdents_abi::RECORD_HEADER_SIZE;
use log::trace;

use crate::error::{Error, Result};
use crate::record::record_len_at;

/// Location of one record inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpan {
    pub offset: usize,
    pub len: usize,
}

impl RecordSpan {
    fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Find the start and length of every record in `batch`.
///
/// The walk must land exactly on `batch.len()`; a record running past the
/// end is corrupt.
pub fn index_batch(batch: &[u8]) -> Result<Vec<RecordSpan>> {
    // Every record is at least RECORD_HEADER_SIZE bytes, which bounds the
    // count up front.
    let max_records = batch.len() / RECORD_HEADER_SIZE;
    let mut spans = Vec::new();
    spans
        .try_reserve_exact(max_records)
        .map_err(Error::out_of_memory(
            max_records * core::mem::size_of::<RecordSpan>(),
        ))?;

    let mut pos = 0usize;
    while pos < batch.len() {
        let len = record_len_at(batch, pos)?;
        spans.push(RecordSpan { offset: pos, len });
        pos += len;
    }

    Ok(spans)
}

/// Shuffle the records in `buf[..filled_len]` in place.
///
/// `buf` is the whole reader buffer; the scratch copy is allocated at the
/// same capacity and dropped before returning, on success and on error.
/// Returns the number of records in the batch.
pub fn shuffle_batch(buf: &mut [u8], filled_len: usize, seed: u64) -> Result<usize> {
    let spans = index_batch(&buf[..filled_len])?;

    let ctx = ShuffleContext::new(spans.len(), seed).map_err(Error::out_of_memory(
        spans.len() * core::mem::size_of::<usize>(),
    ))?;
    let shuffled = ctx.permute(&spans).map_err(Error::out_of_memory(
        spans.len() * core::mem::size_of::<RecordSpan>(),
    ))?;

    let mut scratch: Vec<u8> = Vec::new();
    scratch
        .try_reserve_exact(buf.len())
        .map_err(Error::out_of_memory(buf.len()))?;

    // Write position advances by each record's own length
    for span in &shuffled {
        scratch.extend_from_slice(&buf[span.offset..span.end()]);
    }
    debug_assert_eq!(scratch.len(), filled_len);

    buf[..filled_len].copy_from_slice(&scratch);

    trace!(
        "getdents: shuffled {} records ({} bytes) with seed {}",
        spans.len(),
        filled_len,
        seed
    );

    Ok(spans.len())
}

/// A shuffle seed from the wall clock, in microseconds since the epoch.
///
/// Low-entropy and observable: fine for spreading out enumeration order, not
/// for anything that must be unpredictable to an adversary.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
