//! Catalog and disassembly error types.

use thiserror::Error;

/// Error type for catalog acquisition and per-entry construction.
///
/// None of these are fatal to a disassembly session: a failed document
/// becomes an empty catalog and a failed entry is skipped.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog document could not be obtained.
    #[error("catalog unavailable: {reason}")]
    Unavailable { reason: String },

    /// The catalog document is not well-formed XML.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] roxmltree::Error),

    /// Reading a local catalog file failed.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// A remote annex fetch failed.
    #[error("failed to fetch remote annex {annex:?}: {reason}")]
    Remote { annex: String, reason: String },

    /// An entry names an encoding class outside the known set.
    #[error("unknown instruction type: {name}")]
    UnknownEncodingClass { name: String },

    /// A required attribute is absent.
    #[error("missing attribute {attribute:?}")]
    MissingAttribute { attribute: &'static str },

    /// An attribute is present but cannot be parsed.
    #[error("malformed attribute {attribute:?}: {value:?}")]
    MalformedAttribute {
        attribute: &'static str,
        value: String,
    },
}

impl CatalogError {
    /// Creates a new Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new Remote error.
    pub fn remote(annex: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Remote {
            annex: annex.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new UnknownEncodingClass error.
    pub fn unknown_class(name: impl Into<String>) -> Self {
        Self::UnknownEncodingClass { name: name.into() }
    }

    /// Creates a new MalformedAttribute error.
    pub fn malformed(attribute: &'static str, value: impl Into<String>) -> Self {
        Self::MalformedAttribute {
            attribute,
            value: value.into(),
        }
    }
}

/// Error type for a single disassembly request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No catalog entry describes this word; the caller should fall back.
    #[error("no custom instruction matches {word:#x} at {address:#x}")]
    NoMatch { address: u64, word: u32 },

    /// Instruction was truncated (not enough bytes).
    #[error("truncated instruction at {address:#x}: need {needed} bytes, have {available}")]
    Truncated {
        address: u64,
        needed: usize,
        available: usize,
    },

    /// Target memory could not be read.
    #[error("cannot read memory at {address:#x}: {reason}")]
    ReadFailed { address: u64, reason: String },
}

impl DecodeError {
    /// Creates a new NoMatch error.
    pub fn no_match(address: u64, word: u32) -> Self {
        Self::NoMatch { address, word }
    }

    /// Creates a new Truncated error.
    pub fn truncated(address: u64, needed: usize, available: usize) -> Self {
        Self::Truncated {
            address,
            needed,
            available,
        }
    }

    /// Creates a new ReadFailed error.
    pub fn read_failed(address: u64, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            address,
            reason: reason.into(),
        }
    }

    /// Returns true when the caller should use its default decoder.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}
