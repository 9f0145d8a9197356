// File:    hmac.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: HMAC-SHA1 built from two passes of the SHA-1 engine.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! This module contains the HMAC-SHA1 construction (RFC 2104).

use crate::sha1::{BLOCK_SIZE, DIGEST_SIZE, Digest, Sha1, sha1};

/// Inner padding byte.
pub const IPAD: u8 = 0x36;
/// Outer padding byte.
pub const OPAD: u8 = 0x5C;

/// XORs `src` into the front of `dest` in place.
///
/// # Panics
///
/// Panics if `src` is longer than `dest`.
pub fn xor_into(dest: &mut [u8], src: &[u8]) {
    assert!(
        src.len() <= dest.len(),
        "XOR source must not be longer than the destination."
    );
    for (d, s) in dest.iter_mut().zip(src) {
        *d ^= s;
    }
}

fn pad_block(pad: u8, key: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut block = [pad; BLOCK_SIZE];
    xor_into(&mut block, key);
    block
}

/// Computes HMAC-SHA1 of `message` under `key`.
///
/// Keys longer than one block are first reduced to their SHA-1 digest;
/// shorter keys are implicitly zero-padded.
#[must_use]
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> Digest {
    let reduced: [u8; DIGEST_SIZE];
    let key = if key.len() > BLOCK_SIZE {
        reduced = sha1(key).into_bytes();
        &reduced[..]
    } else {
        key
    };

    let mut inner = Sha1::new();
    inner.process_block(&pad_block(IPAD, key));
    inner.update(message);
    let inner_digest = inner.finish();

    let mut outer = Sha1::new();
    outer.process_block(&pad_block(OPAD, key));
    outer.update(inner_digest.as_bytes());
    outer.finish()
}
