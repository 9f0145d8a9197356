// File:    totp.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Time-based one-time passwords (RFC 6238) layered on HOTP.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! TOTP generation.
//!
//! A timestamp is turned into a step counter, `(now - start_offset) / step`,
//! and handed to HOTP with dynamic truncation and no checksum. Every `now`
//! inside one step interval therefore yields the same code.

use std::ops::Range;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{OathError, Result};
use crate::hotp::{self, Digits};

/// Step size used when a step of zero is requested.
pub const DEFAULT_TIME_STEP: u32 = 30;

const fn effective_step(step: u32) -> u32 {
    if step == 0 { DEFAULT_TIME_STEP } else { step }
}

/// Computes the HOTP moving factor for `now`.
///
/// A `step` of zero is replaced by [`DEFAULT_TIME_STEP`].
///
/// # Errors
///
/// Returns [`OathError::InvalidTimestamp`] when `now` is earlier than
/// `start_offset`.
pub fn time_step_counter(now: i64, step: u32, start_offset: i64) -> Result<u64> {
    if now < start_offset {
        return Err(OathError::InvalidTimestamp { now, start_offset });
    }
    let counter = now.abs_diff(start_offset) / u64::from(effective_step(step));
    trace!("time step counter {counter}");
    Ok(counter)
}

/// The half-open interval of timestamps sharing the code valid at `now`.
///
/// The upper bound saturates at `i64::MAX`.
///
/// # Errors
///
/// Returns [`OathError::InvalidTimestamp`] when `now` is earlier than
/// `start_offset`.
pub fn window(now: i64, step: u32, start_offset: i64) -> Result<Range<i64>> {
    let step = effective_step(step);
    let counter = time_step_counter(now, step, start_offset)?;

    let start = i128::from(start_offset) + i128::from(counter) * i128::from(step);
    let end = start + i128::from(step);
    // start lies in [start_offset, now], so it always fits
    let start = i64::try_from(start).unwrap_or(now);
    let end = i64::try_from(end).unwrap_or(i64::MAX);
    Ok(start..end)
}

/// Generates an RFC 6238 one-time password.
///
/// # Errors
///
/// Returns [`OathError::InvalidDigits`] unless `digits` is 6, 7 or 8, and
/// [`OathError::InvalidTimestamp`] when `now` is earlier than `start_offset`.
pub fn generate(secret: &[u8], now: i64, step: u32, start_offset: i64, digits: u8) -> Result<String> {
    let digits = Digits::try_from(digits)?;
    let counter = time_step_counter(now, step, start_offset)?;
    Ok(hotp::derive(secret, counter, digits))
}

/// TOTP system parameters, as stored in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotpParams {
    /// Step size in seconds. Zero means [`DEFAULT_TIME_STEP`].
    pub step: u32,
    /// Unix time at which step counting begins.
    pub start_offset: i64,
    /// Length of the generated code.
    pub digits: Digits,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            step: DEFAULT_TIME_STEP,
            start_offset: 0,
            digits: Digits::Six,
        }
    }
}

impl TotpParams {
    /// Generates the code valid at `now` under these parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OathError::InvalidTimestamp`] when `now` is earlier than
    /// `start_offset`.
    pub fn generate(&self, secret: &[u8], now: i64) -> Result<String> {
        let counter = time_step_counter(now, self.step, self.start_offset)?;
        Ok(hotp::derive(secret, counter, self.digits))
    }

    /// See [`window`].
    ///
    /// # Errors
    ///
    /// Returns [`OathError::InvalidTimestamp`] when `now` is earlier than
    /// `start_offset`.
    pub fn window(&self, now: i64) -> Result<Range<i64>> {
        window(now, self.step, self.start_offset)
    }
}
