//! Benchmark payload synthesis
//!
//! Storage benchmarks need upload bodies that are large, cheap to produce,
//! and incompressible. A payload that lives fully in memory caps the object
//! size at available RAM, and a payload of zeros lets transparent compression
//! anywhere in the storage path inflate the measured throughput. The types in
//! this module solve both problems: a payload is a *virtual* byte sequence
//! whose content is computed on demand from a fixed pseudo-random mask, so a
//! multi-gigabyte body costs one megabyte of memory and compresses to roughly
//! its own size.
//!
//! The [`ByteSource`] trait is the narrow capability a streaming upload call
//! needs (`length`/`position`/`seek`/`read`); [`RandomStream`] is the
//! concrete generator. Any future payload strategy only has to satisfy the
//! trait.

pub mod random_stream;

pub use random_stream::RandomStream;

/// Origin for [`ByteSource::seek`] offsets.
///
/// `Start` and `Current` behave like their `std::io::SeekFrom` counterparts.
/// `FromEnd` does **not**: it positions the cursor `offset` bytes *before*
/// the end (`cursor = length - offset`), so `seek(0, FromEnd)` lands on the
/// end of the stream and `seek(10, FromEnd)` lands 10 bytes short of it.
/// This matches the upload APIs burstbench payloads are handed to, which
/// probe the size of a body with a rewind of zero from the end; it is kept
/// deliberately and is pinned by tests. Implement `std::io::Seek` on top of
/// a `ByteSource` only with care around this difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// Offset is an absolute position from the start of the stream
    Start,
    /// Offset is relative to the current cursor position
    Current,
    /// Cursor moves to `length - offset`: a distance backward from the end
    FromEnd,
}

/// A seekable stream of synthesized bytes with a known total length.
///
/// The contract mirrors what object-storage SDKs require of a streaming
/// request body:
///
/// - [`length`](ByteSource::length) reports the total size so the caller can
///   set a `Content-Length` up front.
/// - [`read`](ByteSource::read) fills the front of the buffer and returns the
///   byte count, returning fewer bytes near the end of the stream and `0` at
///   exhaustion. Running past the end is never an error.
/// - [`seek`](ByteSource::seek) performs no bounds checking: the cursor may
///   move before the start or past the end, and it is the caller's job not
///   to read there. A cursor at or past the end simply reads as empty.
pub trait ByteSource {
    /// Total number of bytes this source represents
    fn length(&self) -> u64;

    /// Current cursor position in bytes (may be outside `[0, length)` after
    /// an unchecked seek)
    fn position(&self) -> i64;

    /// Move the cursor; see [`SeekWhence`] for the offset origin semantics
    fn seek(&mut self, offset: i64, whence: SeekWhence);

    /// Read up to `buf.len()` bytes at the cursor into the front of `buf`,
    /// advancing the cursor by the count returned
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Read up to `n` bytes at the cursor into a fresh vector
    fn read_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        let got = self.read(&mut buf);
        buf.truncate(got);
        buf
    }

    /// Bytes remaining between the cursor and the end of the stream, zero if
    /// the cursor sits at or past the end
    fn remaining(&self) -> u64 {
        let rem = self.length() as i64 - self.position();
        if rem > 0 {
            rem as u64
        } else {
            0
        }
    }
}
