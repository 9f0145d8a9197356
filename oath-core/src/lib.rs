// File:    lib.rs
// Author:  apezoo
// Date:    2025-08-02
//
// Description: The main library crate for oath-core, layering TOTP on HOTP on HMAC-SHA1 on SHA-1.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # OATH Core Library
//!
//! This library computes counter-based (HOTP, RFC 4226) and time-based
//! (TOTP, RFC 6238) one-time passwords on top of a self-contained SHA-1
//! engine and HMAC-SHA1 construction.
//!
//! Every layer is a pure function of its inputs. The only mutable state is a
//! [`sha1::Sha1`] context, which is owned by the caller for the duration of a
//! single streaming computation.
//!
//! ```
//! let otp = oath_core::totp::generate(b"12345678901234567890", 59, 30, 0, 8)?;
//! assert_eq!(otp, "94287082");
//! # Ok::<(), oath_core::OathError>(())
//! ```

/// Error type shared by every layer.
pub mod error;
/// Keyed message authentication (HMAC-SHA1, RFC 2104).
pub mod hmac;
/// Counter-based one-time passwords.
pub mod hotp;
/// Incremental SHA-1 hash engine.
pub mod sha1;
/// Time-based one-time passwords.
pub mod totp;

pub use error::{OathError, Result};
pub use sha1::Digest;
