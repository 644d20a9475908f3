//! Deterministic pseudo-random byte stream
//!
//! [`RandomStream`] synthesizes a virtual byte sequence of arbitrary length
//! from a single 1 MiB mask of pseudo-random bytes. The stream is partitioned
//! into 1 MiB blocks; block `i` is the mask with `i` added byte-wise (mod
//! 256), so every block is distinct, every block is reproducible, and the
//! whole stream is a pure function of the mask. Memory cost is two blocks
//! (mask plus a single-entry cache of the last materialized block) no matter
//! how long the stream is.

use super::{ByteSource, SeekWhence};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Size of one content block: the unit of materialization and caching
pub const BLOCK_SIZE: usize = 1024 * 1024;

/// A seekable, deterministic stream of incompressible bytes
///
/// Construction fixes the total length and the pseudo-random base mask;
/// after that the content is immutable and reproducible. Reads at the same
/// offsets always return identical bytes, including after seeking backward.
///
/// The single-entry block cache makes strictly sequential reads (the common
/// case when an upload client drains the stream) recompute nothing; each
/// cache miss recomputes exactly one block.
///
/// A `RandomStream` belongs to one producer: the cursor and the block cache
/// are mutable, so sharing an instance across concurrent readers requires
/// external synchronization.
pub struct RandomStream {
    total_len: u64,
    cursor: i64,
    base_mask: Box<[u8]>,
    cached_block_id: Option<i64>,
    cached_block: Box<[u8]>,
}

impl RandomStream {
    /// Create a stream of `total_len` bytes with a mask drawn from the
    /// thread-local RNG
    ///
    /// Two streams created this way will almost surely differ. Use
    /// [`with_seed`](RandomStream::with_seed) when reproducibility across
    /// instances matters.
    pub fn new(total_len: u64) -> Self {
        Self::from_rng(total_len, &mut rand::thread_rng())
    }

    /// Create a stream of `total_len` bytes with a mask derived from `seed`
    ///
    /// Equal seeds yield byte-identical streams, across instances and across
    /// processes.
    pub fn with_seed(total_len: u64, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        Self::from_rng(total_len, &mut rng)
    }

    /// Create a stream of `total_len` bytes, filling the base mask from the
    /// supplied RNG
    pub fn from_rng<R: RngCore>(total_len: u64, rng: &mut R) -> Self {
        let mut mask = vec![0u8; BLOCK_SIZE].into_boxed_slice();
        rng.fill_bytes(&mut mask);

        Self {
            total_len,
            cursor: 0,
            base_mask: mask,
            cached_block_id: None,
            cached_block: vec![0u8; BLOCK_SIZE].into_boxed_slice(),
        }
    }

    /// Split an absolute byte position into `(block_id, offset_within_block)`
    ///
    /// Euclidean division keeps the mapping total for cursors that have been
    /// seeked outside `[0, total_len)`.
    #[inline]
    fn block_coords(abs_pos: i64) -> (i64, usize) {
        let block_id = abs_pos.div_euclid(BLOCK_SIZE as i64);
        let within = abs_pos.rem_euclid(BLOCK_SIZE as i64) as usize;
        (block_id, within)
    }

    /// Materialize block `block_id` into the cache and return it
    ///
    /// Block content is `base_mask[j].wrapping_add(block_id)` elementwise.
    /// A hit on the cached block id returns without recomputation.
    fn block(&mut self, block_id: i64) -> &[u8] {
        if self.cached_block_id != Some(block_id) {
            let tag = block_id as u8;
            for (dst, &m) in self.cached_block.iter_mut().zip(self.base_mask.iter()) {
                *dst = m.wrapping_add(tag);
            }
            self.cached_block_id = Some(block_id);
        }
        &self.cached_block
    }
}

impl ByteSource for RandomStream {
    fn length(&self) -> u64 {
        self.total_len
    }

    fn position(&self) -> i64 {
        self.cursor
    }

    fn seek(&mut self, offset: i64, whence: SeekWhence) {
        self.cursor = match whence {
            SeekWhence::Start => offset,
            SeekWhence::Current => self.cursor + offset,
            // Distance backward from the end, see SeekWhence docs
            SeekWhence::FromEnd => self.total_len as i64 - offset,
        };
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let remaining = self.total_len as i64 - self.cursor;
        if remaining <= 0 || buf.is_empty() {
            return 0;
        }

        let n = (remaining as u64).min(buf.len() as u64) as usize;
        let start = self.cursor;
        let mut copied = 0usize;

        while copied < n {
            let (block_id, within) = Self::block_coords(start + copied as i64);
            let take = (BLOCK_SIZE - within).min(n - copied);
            let block = self.block(block_id);
            buf[copied..copied + take].copy_from_slice(&block[within..within + take]);
            copied += take;
        }

        self.cursor += n as i64;
        n
    }
}

impl std::io::Read for RandomStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(ByteSource::read(self, buf))
    }
}

impl std::fmt::Debug for RandomStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomStream")
            .field("total_len", &self.total_len)
            .field("cursor", &self.cursor)
            .field("cached_block_id", &self.cached_block_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn stream(len: u64) -> RandomStream {
        RandomStream::with_seed(len, 42)
    }

    #[test]
    fn test_length_and_initial_position() {
        let s = stream(1000);
        assert_eq!(s.length(), 1000);
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_read_advances_cursor() {
        let mut s = stream(1000);
        let got = s.read_bytes(100);
        assert_eq!(got.len(), 100);
        assert_eq!(s.position(), 100);
    }

    #[test]
    fn test_read_past_end_returns_short() {
        let mut s = stream(100);
        let got = s.read_bytes(1000);
        assert_eq!(got.len(), 100);
        assert_eq!(s.position(), 100);

        // Exhausted stream reads empty, never errors
        assert!(s.read_bytes(10).is_empty());
        assert_eq!(s.position(), 100);
    }

    #[test]
    fn test_empty_stream() {
        let mut s = stream(0);
        assert_eq!(s.length(), 0);
        assert!(s.read_bytes(64).is_empty());
    }

    #[test]
    fn test_length_conservation() {
        // Total bytes drained in odd-sized chunks equals the stream length
        let len = 2 * BLOCK_SIZE as u64 + 12345;
        let mut s = stream(len);
        let mut total = 0u64;
        loop {
            let got = s.read_bytes(65_537);
            if got.is_empty() {
                break;
            }
            total += got.len() as u64;
        }
        assert_eq!(total, len);
    }

    #[test]
    fn test_determinism_seek_back_and_reread() {
        let mut s = stream(3 * BLOCK_SIZE as u64);
        let first = s.read_bytes(BLOCK_SIZE);

        s.seek(0, SeekWhence::Start);
        let again = s.read_bytes(BLOCK_SIZE);
        assert_eq!(first, again);
    }

    #[test]
    fn test_blocks_are_distinct_and_reproducible() {
        let mut s = stream(3 * BLOCK_SIZE as u64);
        let b0 = s.read_bytes(BLOCK_SIZE);
        let b1 = s.read_bytes(BLOCK_SIZE);
        let b2 = s.read_bytes(BLOCK_SIZE);

        assert_ne!(b0, b1);
        assert_ne!(b1, b2);

        // Block i is the base mask shifted by i, so the relationship between
        // consecutive blocks is an elementwise +1
        for (x, y) in b0.iter().zip(b1.iter()) {
            assert_eq!(x.wrapping_add(1), *y);
        }

        let mut s2 = stream(3 * BLOCK_SIZE as u64);
        assert_eq!(s2.read_bytes(BLOCK_SIZE), b0);
    }

    #[test]
    fn test_block_boundary_read() {
        // A read spanning the block 0 / block 1 boundary must agree with
        // standalone reads at the same absolute offsets
        let mut s = stream(3 * BLOCK_SIZE as u64);
        s.seek(BLOCK_SIZE as i64 - 1, SeekWhence::Start);
        let spanning = s.read_bytes(BLOCK_SIZE + 1);
        assert_eq!(spanning.len(), BLOCK_SIZE + 1);

        let mut s2 = stream(3 * BLOCK_SIZE as u64);
        let b0 = s2.read_bytes(BLOCK_SIZE);
        let b1 = s2.read_bytes(BLOCK_SIZE);

        assert_eq!(spanning[0], b0[BLOCK_SIZE - 1]);
        assert_eq!(&spanning[1..], &b1[..]);
    }

    #[test]
    fn test_seek_modes() {
        let mut s = stream(1000);

        s.seek(300, SeekWhence::Start);
        assert_eq!(s.position(), 300);

        s.seek(-100, SeekWhence::Current);
        assert_eq!(s.position(), 200);

        s.seek(50, SeekWhence::Current);
        assert_eq!(s.position(), 250);
    }

    #[test]
    fn test_seek_from_end_is_backward_distance() {
        // FromEnd means length - offset, NOT length + offset
        let mut s = stream(1000);

        s.seek(0, SeekWhence::FromEnd);
        assert_eq!(s.position(), 1000);
        assert!(s.read_bytes(10).is_empty());

        s.seek(10, SeekWhence::FromEnd);
        assert_eq!(s.position(), 990);
        assert_eq!(s.read_bytes(100).len(), 10);
    }

    #[test]
    fn test_seek_is_unchecked() {
        // Out-of-range seeks are accepted; the cursor just sits there
        let mut s = stream(100);
        s.seek(-50, SeekWhence::Start);
        assert_eq!(s.position(), -50);

        s.seek(10_000, SeekWhence::Start);
        assert_eq!(s.position(), 10_000);
        assert!(s.read_bytes(10).is_empty());
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_same_seed_same_content_different_seed_differs() {
        let mut a = RandomStream::with_seed(4096, 7);
        let mut b = RandomStream::with_seed(4096, 7);
        let mut c = RandomStream::with_seed(4096, 8);

        let da = a.read_bytes(4096);
        assert_eq!(da, b.read_bytes(4096));
        assert_ne!(da, c.read_bytes(4096));
    }

    #[test]
    fn test_io_read_matches_byte_source() {
        let mut a = stream(500);
        let mut b = stream(500);

        let via_source = a.read_bytes(500);
        let mut via_io = Vec::new();
        b.read_to_end(&mut via_io).unwrap();

        assert_eq!(via_source, via_io);
    }
}
