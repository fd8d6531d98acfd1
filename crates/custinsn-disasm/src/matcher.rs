//! Matching raw instruction words against a catalog.

use crate::catalog::Catalog;
use crate::entry::CatalogEntry;

/// Returns the length in bytes of the instruction whose first byte is
/// `first_byte`: 4 when the low two bits are `11`, otherwise 2.
#[inline]
pub fn instruction_len(first_byte: u8) -> usize {
    if first_byte & 0x3 == 0x3 {
        4
    } else {
        2
    }
}

/// One raw instruction and its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedWord {
    /// Little-endian assembled instruction bits.
    pub value: u32,
    /// Length in bytes, 2 or 4.
    pub len: usize,
}

impl DecodedWord {
    pub fn new(value: u32, len: usize) -> Self {
        Self { value, len }
    }

    /// Assembles a word from exactly 2 or 4 little-endian bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let value = match *bytes {
            [b0, b1] => u16::from_le_bytes([b0, b1]) as u32,
            [b0, b1, b2, b3] => u32::from_le_bytes([b0, b1, b2, b3]),
            _ => return None,
        };
        Some(Self::new(value, bytes.len()))
    }

    /// Takes the leading instruction from `bytes`, using the first byte to
    /// pick its length. Returns `None` if too few bytes are available.
    pub fn from_stream(bytes: &[u8]) -> Option<Self> {
        let len = instruction_len(*bytes.first()?);
        bytes.get(..len).and_then(Self::from_le_bytes)
    }

    /// The instruction bytes in memory order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.value.to_le_bytes()[..self.len].to_vec()
    }
}

impl Catalog {
    /// Returns the first entry, in catalog order, matching `word`.
    pub fn find_match(&self, word: DecodedWord) -> Option<&CatalogEntry> {
        let entry = self
            .iter()
            .find(|entry| entry.matches(word.value, word.len));
        if let Some(entry) = entry {
            log::trace!(
                "{:#x} matches {} entry {:?}",
                word.value,
                entry.class(),
                entry.template()
            );
        }
        entry
    }
}
