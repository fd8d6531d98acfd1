//! Error types for custinsn-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Register width other than 32 or 64 bits.
    #[error("unsupported register width: {0} bits")]
    UnsupportedXlen(u32),
}
