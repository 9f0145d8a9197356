// File:    sha1.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Incremental SHA-1 (FIPS 180-4 / RFC 3174) over arbitrary byte streams.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Streaming SHA-1.
//!
//! A [`Sha1`] context is created with [`Sha1::new`], fed with any number of
//! [`Sha1::update`] calls and consumed by [`Sha1::finish`]. For whole
//! buffers use [`sha1`]; for readers use [`sha1_reader`].

use std::fmt;
use std::io::{self, Read, Write};

use log::trace;

use crate::error::Result;

/// Size of a SHA-1 digest in bytes.
pub const DIGEST_SIZE: usize = 20;

/// Size of a SHA-1 compression block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// Read size used by [`sha1_reader`]. Must stay a multiple of [`BLOCK_SIZE`].
const STREAM_CHUNK_SIZE: usize = 32768;

const INITIAL_STATE: [u32; 5] = [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476, 0xC3D2_E1F0];

/// A SHA-1 digest, in standard big-endian byte order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Borrows the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// Lowercase hexadecimal rendering of the digest.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Round functions. `parity` serves both stage 2 and stage 4.

const fn choose(b: u32, c: u32, d: u32) -> u32 {
    d ^ (b & (c ^ d))
}

const fn parity(b: u32, c: u32, d: u32) -> u32 {
    b ^ c ^ d
}

const fn majority(b: u32, c: u32, d: u32) -> u32 {
    (b & c) | (d & (b | c))
}

/// One stage covers 20 consecutive rounds.
struct Stage {
    constant: u32,
    function: fn(u32, u32, u32) -> u32,
}

const ROUNDS_PER_STAGE: usize = 20;

const STAGES: [Stage; 4] = [
    Stage { constant: 0x5A82_7999, function: choose },
    Stage { constant: 0x6ED9_EBA1, function: parity },
    Stage { constant: 0x8F1B_BCDC, function: majority },
    Stage { constant: 0xCA62_C1D6, function: parity },
];

/// Expands schedule word `i` (16..80) in place in the 16-word ring buffer.
const fn expand(ring: &mut [u32; 16], i: usize) -> u32 {
    let mixed = ring[i & 0x0f] ^ ring[(i - 14) & 0x0f] ^ ring[(i - 8) & 0x0f] ^ ring[(i - 3) & 0x0f];
    ring[i & 0x0f] = mixed.rotate_left(1);
    ring[i & 0x0f]
}

/// Runs the 80-round compression function over one block.
#[allow(clippy::many_single_char_names)]
fn compress(state: &mut [u32; 5], block: &[u8; BLOCK_SIZE]) {
    let mut ring = [0u32; 16];
    for (word, bytes) in ring.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for i in 0..80 {
        let Stage { constant, function } = &STAGES[i / ROUNDS_PER_STAGE];
        let w = if i < 16 { ring[i] } else { expand(&mut ring, i) };

        let t = a
            .rotate_left(5)
            .wrapping_add(function(b, c, d))
            .wrapping_add(e)
            .wrapping_add(*constant)
            .wrapping_add(w);

        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = t;
    }

    for (acc, v) in state.iter_mut().zip([a, b, c, d, e]) {
        *acc = acc.wrapping_add(v);
    }
}

/// SHA-1 computation state.
///
/// Holds the five accumulators, the total byte count as two 32-bit halves
/// and fewer than [`BLOCK_SIZE`] bytes of pending input. The context is
/// consumed by [`Sha1::finish`]; start a new one for the next message.
#[derive(Clone)]
pub struct Sha1 {
    state: [u32; 5],
    total: [u32; 2],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha1 {
    /// Creates a context primed with the SHA-1 initial constants.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            total: [0, 0],
            buffer: [0; BLOCK_SIZE],
            buffer_len: 0,
        }
    }

    /// Number of message bytes absorbed so far, including pending ones.
    #[must_use]
    pub fn len(&self) -> u64 {
        ((u64::from(self.total[1]) << 32) | u64::from(self.total[0])) + self.buffer_len as u64
    }

    /// True when nothing has been absorbed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Callers never pass more than one block.
    #[allow(clippy::cast_possible_truncation)]
    const fn count_bytes(&mut self, n: usize) {
        let (low, carried) = self.total[0].overflowing_add(n as u32);
        self.total[0] = low;
        if carried {
            self.total[1] = self.total[1].wrapping_add(1);
        }
    }

    /// Compresses whole blocks directly, bypassing the pending buffer.
    ///
    /// Must not be interleaved with [`Sha1::update`] while bytes are
    /// pending, otherwise the message order is broken.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not a multiple of [`BLOCK_SIZE`].
    pub fn process_block(&mut self, data: &[u8]) {
        assert_eq!(
            data.len() % BLOCK_SIZE,
            0,
            "process_block requires a multiple of {BLOCK_SIZE} bytes"
        );
        for block in data.chunks_exact(BLOCK_SIZE) {
            let mut copy = [0u8; BLOCK_SIZE];
            copy.copy_from_slice(block);
            compress(&mut self.state, &copy);
            self.count_bytes(BLOCK_SIZE);
        }
    }

    /// Absorbs `data` of any length.
    pub fn update(&mut self, mut data: &[u8]) {
        if self.buffer_len != 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];

            if self.buffer_len < BLOCK_SIZE {
                return;
            }
            let block = self.buffer;
            self.buffer_len = 0;
            self.process_block(&block);
        }

        let whole = data.len() - data.len() % BLOCK_SIZE;
        let (blocks, tail) = data.split_at(whole);
        if !blocks.is_empty() {
            self.process_block(blocks);
        }

        self.buffer[..tail.len()].copy_from_slice(tail);
        self.buffer_len = tail.len();
    }

    /// Pads the message, compresses the final block(s) and returns the digest.
    #[must_use]
    pub fn finish(mut self) -> Digest {
        let pending = self.buffer_len;
        self.count_bytes(pending);

        let bits_high = (self.total[1] << 3) | (self.total[0] >> 29);
        let bits_low = self.total[0] << 3;

        // The 8-byte length must fit after the 0x80 marker.
        let padded_len = if pending < BLOCK_SIZE - 8 { BLOCK_SIZE } else { 2 * BLOCK_SIZE };
        let mut tail = [0u8; 2 * BLOCK_SIZE];
        tail[..pending].copy_from_slice(&self.buffer[..pending]);
        tail[pending] = 0x80;
        tail[padded_len - 8..padded_len - 4].copy_from_slice(&bits_high.to_be_bytes());
        tail[padded_len - 4..padded_len].copy_from_slice(&bits_low.to_be_bytes());

        for block in tail[..padded_len].chunks_exact(BLOCK_SIZE) {
            let mut copy = [0u8; BLOCK_SIZE];
            copy.copy_from_slice(block);
            compress(&mut self.state, &copy);
        }

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest(out)
    }
}

impl Write for Sha1 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Computes the SHA-1 digest of an in-memory buffer.
#[must_use]
pub fn sha1(data: &[u8]) -> Digest {
    let mut ctx = Sha1::new();
    ctx.update(data);
    ctx.finish()
}

/// Computes the SHA-1 digest of everything `reader` yields.
///
/// The context is owned by the calling thread for the whole read loop.
///
/// # Errors
///
/// Returns [`crate::OathError::HashFailure`] if the reader fails with
/// anything other than [`io::ErrorKind::Interrupted`].
pub fn sha1_reader<R: Read>(mut reader: R) -> Result<Digest> {
    let mut ctx = Sha1::new();
    let mut chunk = vec![0u8; STREAM_CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        ctx.update(&chunk[..read]);
    }

    trace!("hashed {} bytes from reader", ctx.len());
    Ok(ctx.finish())
}
