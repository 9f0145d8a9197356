// File:    error.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: Error type returned by the hashing and one-time password operations.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use thiserror::Error;

/// Errors produced while deriving a one-time password.
///
/// The in-memory hashing path is infallible; only the stream adapter can
/// produce [`OathError::HashFailure`].
#[derive(Debug, Error)]
pub enum OathError {
    /// The requested OTP length is not 6, 7 or 8.
    #[error("invalid number of digits: {0} (expected 6, 7 or 8)")]
    InvalidDigits(u8),

    /// The timestamp lies before the start of the first time step.
    #[error("timestamp {now} is earlier than the start offset {start_offset}")]
    InvalidTimestamp {
        /// The timestamp the OTP was requested for.
        now: i64,
        /// The Unix time at which step counting begins.
        start_offset: i64,
    },

    /// The hash input could not be read to completion.
    #[error("hash computation failed: {0}")]
    HashFailure(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OathError>;
