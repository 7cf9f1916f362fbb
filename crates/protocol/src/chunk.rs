//! Chunk - zero-copy record container
//!
//! A `Chunk` is the immutable payload of one delivery task: the records an
//! input accumulated between flushes, serialized back to back in a single
//! buffer. It uses `bytes::Bytes` for reference-counted sharing, so handing
//! the same chunk to several delivery attempts never copies the data.

use bytes::Bytes;

use crate::{DEFAULT_CHUNK_CAPACITY, DEFAULT_CHUNK_RECORDS};

/// Immutable snapshot of serialized records
///
/// # Design
///
/// - `buffer` is `bytes::Bytes`: cloning a `Chunk` is O(1) on the payload
/// - `offsets` and `lengths` give zero-copy access to individual records
/// - Built once by an input's flush, never mutated afterwards
///
/// # Memory layout
///
/// ```text
/// buffer:  [rec0 bytes][rec1 bytes][rec2 bytes]...
/// offsets: [0, len0, len0+len1, ...]
/// lengths: [len0, len1, len2, ...]
/// ```
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Raw serialized records - zero-copy via Bytes
    buffer: Bytes,

    /// Offsets into buffer for each record
    offsets: Vec<u32>,

    /// Lengths of each record
    lengths: Vec<u32>,
}

impl Chunk {
    /// Get the raw buffer
    #[inline]
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Get a record slice by index - zero allocation
    ///
    /// Returns `None` if index is out of bounds.
    #[inline]
    pub fn record(&self, index: usize) -> Option<&[u8]> {
        if index >= self.offsets.len() {
            return None;
        }
        let start = self.offsets[index] as usize;
        let len = self.lengths[index] as usize;
        Some(&self.buffer[start..start + len])
    }

    /// Get the number of records
    #[inline]
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    /// Check if the chunk holds no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Get total payload size in bytes
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Iterate over all records in the chunk
    #[inline]
    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        self.offsets
            .iter()
            .zip(self.lengths.iter())
            .map(move |(&offset, &len)| {
                let start = offset as usize;
                let end = start + len as usize;
                &self.buffer[start..end]
            })
    }
}

/// Builder for accumulating records into a chunk
///
/// Used by inputs to collect records between flushes. `finish()` freezes the
/// accumulated data into an immutable `Chunk`; `reset()` keeps the builder's
/// allocations for the next cycle.
#[derive(Debug)]
pub struct ChunkBuilder {
    /// Growing buffer for record data
    buffer: Vec<u8>,

    /// Offsets into buffer for each record
    offsets: Vec<u32>,

    /// Lengths of each record
    lengths: Vec<u32>,
}

impl ChunkBuilder {
    /// Create a new builder with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHUNK_CAPACITY)
    }

    /// Create a new builder with the given buffer capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(DEFAULT_CHUNK_RECORDS),
            lengths: Vec::with_capacity(DEFAULT_CHUNK_RECORDS),
        }
    }

    /// Append one serialized record
    pub fn push(&mut self, record: &[u8]) {
        let offset = self.buffer.len() as u32;
        self.buffer.extend_from_slice(record);
        self.offsets.push(offset);
        self.lengths.push(record.len() as u32);
    }

    /// Get current record count
    #[inline]
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    /// Check if no records have been added
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Get current buffer size in bytes
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Consume the builder and produce a finished chunk
    pub fn finish(self) -> Chunk {
        Chunk {
            buffer: Bytes::from(self.buffer),
            offsets: self.offsets,
            lengths: self.lengths,
        }
    }

    /// Take the accumulated records as a chunk, leaving the builder empty
    ///
    /// Unlike `finish()`, the builder remains usable for the next cycle.
    /// Returns `None` if nothing was accumulated.
    pub fn take(&mut self) -> Option<Chunk> {
        if self.is_empty() {
            return None;
        }
        Some(Chunk {
            buffer: Bytes::from(std::mem::take(&mut self.buffer)),
            offsets: std::mem::take(&mut self.offsets),
            lengths: std::mem::take(&mut self.lengths),
        })
    }

    /// Reset the builder for reuse (keeps allocations)
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.offsets.clear();
        self.lengths.clear();
    }
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
