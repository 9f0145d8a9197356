// File:    hotp.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Counter-based one-time passwords (RFC 4226) with dynamic truncation.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! HOTP generation.
//!
//! The moving factor is encoded as 8 big-endian bytes, authenticated with
//! HMAC-SHA1 under the shared secret, and reduced to a decimal code through
//! dynamic truncation.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{OathError, Result};
use crate::hmac::hmac_sha1;
use crate::sha1::{DIGEST_SIZE, Digest};

/// Supported OTP lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Digits {
    /// Six decimal digits.
    #[default]
    Six,
    /// Seven decimal digits.
    Seven,
    /// Eight decimal digits.
    Eight,
}

impl Digits {
    /// Number of characters in the rendered code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }

    /// `10^digits`, the bound the truncated value is reduced modulo.
    #[must_use]
    pub const fn modulus(self) -> u32 {
        match self {
            Self::Six => 1_000_000,
            Self::Seven => 10_000_000,
            Self::Eight => 100_000_000,
        }
    }
}

impl TryFrom<u8> for Digits {
    type Error = OathError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(OathError::InvalidDigits(other)),
        }
    }
}

impl From<Digits> for u8 {
    fn from(digits: Digits) -> Self {
        digits.as_u8()
    }
}

/// Where the 4-byte window is taken from the HMAC digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    /// Offset chosen by the low nibble of the last digest byte.
    #[default]
    Dynamic,
    /// A caller-chosen fixed offset. Accepted but not applied.
    Offset(usize),
}

/// Compatibility knobs of the HOTP interface.
///
/// Both fields are accepted and ignored: no checksum digit is ever appended
/// and truncation is always dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HotpOptions {
    /// Request a trailing Luhn checksum digit.
    pub add_checksum: bool,
    /// Requested truncation mode.
    pub truncation: Truncation,
}

/// Buffer length a code would need, counting a checksum digit if requested.
#[must_use]
pub fn otp_length(digits: Digits, add_checksum: bool) -> usize {
    usize::from(digits.as_u8()) + usize::from(add_checksum)
}

/// Extracts the 31-bit value selected by the last nibble of `hs`.
#[must_use]
pub fn dynamic_truncation(hs: &Digest) -> u32 {
    let hs = hs.as_bytes();
    let offset = usize::from(hs[DIGEST_SIZE - 1] & 0x0f);
    trace!("dynamic truncation offset {offset}");

    u32::from_be_bytes([hs[offset] & 0x7f, hs[offset + 1], hs[offset + 2], hs[offset + 3]])
}

/// Derives the code for `counter` with an already validated length.
#[must_use]
pub fn derive(secret: &[u8], counter: u64, digits: Digits) -> String {
    let hs = hmac_sha1(secret, &counter.to_be_bytes());
    let value = dynamic_truncation(&hs) % digits.modulus();
    format!("{value:0width$}", width = usize::from(digits.as_u8()))
}

/// Generates an RFC 4226 one-time password.
///
/// # Errors
///
/// Returns [`OathError::InvalidDigits`] unless `digits` is 6, 7 or 8.
pub fn generate(secret: &[u8], counter: u64, digits: u8) -> Result<String> {
    generate_with_options(secret, counter, digits, &HotpOptions::default())
}

/// Same as [`generate`], accepting the checksum and truncation options.
///
/// # Errors
///
/// Returns [`OathError::InvalidDigits`] unless `digits` is 6, 7 or 8.
pub fn generate_with_options(
    secret: &[u8],
    counter: u64,
    digits: u8,
    _options: &HotpOptions,
) -> Result<String> {
    let digits = Digits::try_from(digits)?;
    Ok(derive(secret, counter, digits))
}
