//! # custinsn-core
//!
//! Core abstractions shared by the custinsn crates. This crate defines the
//! target register width and the RISC-V register tables used when rendering
//! decoded register fields.

pub mod arch;
pub mod error;
pub mod register;

pub use arch::Xlen;
pub use error::Error;
pub use register::{Register, RegisterFile};
