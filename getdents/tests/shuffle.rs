//! Per-batch shuffling over synthetic batches of mixed record lengths.

use std::collections::VecDeque;
use std::io;

use getdents::{DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, DirEntry, DirentSource, Dirents, Options};
use getdents_abi::write_record;

struct Batches {
    queue: VecDeque<Vec<u8>>,
}

impl DirentSource for Batches {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.queue.pop_front() {
            Some(batch) => {
                buf[..batch.len()].copy_from_slice(&batch);
                Ok(batch.len())
            }
            None => Ok(0),
        }
    }
}

/// (inode, type tag, name) triples with record lengths from 24 to 280 bytes.
fn sample_entries(prefix: &str, count: usize) -> Vec<DirEntry> {
    let tags = [DT_REG, DT_DIR, DT_LNK, DT_FIFO, DT_SOCK];
    (0..count)
        .map(|i| {
            let mut name = format!("{prefix}{i}").into_bytes();
            name.extend(std::iter::repeat_n(b'_', (i * 37) % 240));
            if i % 4 == 0 {
                name.push(0xff);
            }
            DirEntry {
                inode: 1000 + i as u64,
                type_tag: tags[i % tags.len()],
                name,
            }
        })
        .collect()
}

fn encode(entries: &[DirEntry]) -> Vec<u8> {
    let mut buf = vec![0u8; 64 * 1024];
    let mut pos = 0;
    for e in entries {
        pos += write_record(&mut buf, pos, e.inode, pos as i64, e.type_tag, &e.name).unwrap();
    }
    buf.truncate(pos);
    buf
}

fn run(batches: &[&[DirEntry]], randomize: bool) -> Vec<DirEntry> {
    let source = Batches {
        queue: batches.iter().map(|b| encode(b)).collect(),
    };
    Dirents::with_source(source, Options::default().randomize(randomize))
        .unwrap()
        .map(|e| e.unwrap())
        .collect()
}

fn sorted(mut entries: Vec<DirEntry>) -> Vec<DirEntry> {
    entries.sort_by_key(|e| e.inode);
    entries
}

#[test]
fn test_unshuffled_is_kernel_order() {
    let entries = sample_entries("n", 30);
    assert_eq!(run(&[&entries], false), entries);
}

#[test]
fn test_shuffled_batch_reproduces_every_record() {
    let entries = sample_entries("n", 30);
    for _ in 0..20 {
        let got = run(&[&entries], true);
        assert_eq!(got.len(), entries.len());
        assert_eq!(sorted(got), entries);
    }
}

#[test]
fn test_shuffled_order_differs_from_kernel_order() {
    let entries = sample_entries("n", 12);
    let differs = (0..10).any(|_| run(&[&entries], true) != entries);
    assert!(differs);
}

#[test]
fn test_shuffle_stays_within_batch() {
    let first = sample_entries("first", 10);
    let mut second = sample_entries("second", 10);
    for e in &mut second {
        e.inode += 500;
    }

    let got = run(&[&first, &second], true);
    assert_eq!(got.len(), 20);
    assert_eq!(sorted(got[..10].to_vec()), first);
    assert_eq!(sorted(got[10..].to_vec()), second);
}

#[test]
fn test_single_record_batch() {
    let entries = sample_entries("solo", 1);
    assert_eq!(run(&[&entries], true), entries);
}

#[test]
fn test_full_length_names() {
    let entries: Vec<DirEntry> = (0..8u8)
        .map(|i| DirEntry {
            inode: i as u64,
            type_tag: DT_REG,
            name: vec![b'a' + i; getdents::MAX_NAME_LEN],
        })
        .collect();
    assert_eq!(sorted(run(&[&entries], true)), entries);
}
