//! Catalog-driven disassembler.

use custinsn_core::Xlen;

use crate::catalog::Catalog;
use crate::fields::decode_fields;
use crate::matcher::{instruction_len, DecodedWord};
use crate::render::Renderer;
use crate::traits::{DecodedInstruction, Disassembler, MemoryReader, SliceMemory};
use crate::DecodeError;

/// Disassembles the instructions described by a catalog.
///
/// Words no entry matches are reported as "no match" so the caller can
/// hand them to its default decoder.
#[derive(Debug, Clone, Copy)]
pub struct CustomDisassembler<'c> {
    catalog: &'c Catalog,
    renderer: Renderer,
}

impl<'c> CustomDisassembler<'c> {
    pub fn new(catalog: &'c Catalog, xlen: Xlen) -> Self {
        Self {
            catalog,
            renderer: Renderer::new(xlen),
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn xlen(&self) -> Xlen {
        self.renderer.xlen()
    }

    /// Renders `word`, located at `address`, or returns `None` if no entry
    /// matches.
    pub fn disassemble_word(&self, word: DecodedWord, address: u64) -> Option<String> {
        let entry = self.catalog.find_match(word)?;
        let fields = decode_fields(entry.class(), word.value, address, self.renderer.xlen());
        Some(self.renderer.render(entry.template(), fields))
    }

    /// Reads the instruction at `address`: one byte to learn the length,
    /// then the whole instruction.
    pub fn read_word(&self, memory: &dyn MemoryReader, address: u64) -> Result<DecodedWord, DecodeError> {
        let first = memory
            .read_memory(address, 1)?
            .first()
            .copied()
            .ok_or_else(|| DecodeError::truncated(address, 1, 0))?;
        let len = instruction_len(first);
        let bytes = memory.read_memory(address, len)?;
        DecodedWord::from_le_bytes(&bytes)
            .filter(|word| word.len == len)
            .ok_or_else(|| DecodeError::truncated(address, len, bytes.len()))
    }

    /// Reads and renders the instruction at `address`.
    ///
    /// `Ok(None)` means the instruction is not in the catalog.
    pub fn disassemble_at(
        &self,
        memory: &dyn MemoryReader,
        address: u64,
    ) -> Result<Option<DecodedInstruction>, DecodeError> {
        let word = self.read_word(memory, address)?;
        Ok(self
            .disassemble_word(word, address)
            .map(|text| DecodedInstruction {
                address,
                bytes: word.to_le_bytes(),
                text,
                size: word.len,
            }))
    }
}

impl Disassembler for CustomDisassembler<'_> {
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError> {
        let memory = SliceMemory::new(address, bytes);
        let word = self.read_word(&memory, address)?;
        let text = self
            .disassemble_word(word, address)
            .ok_or_else(|| DecodeError::no_match(address, word.value))?;
        Ok(DecodedInstruction {
            address,
            bytes: word.to_le_bytes(),
            text,
            size: word.len,
        })
    }

    fn min_instruction_size(&self) -> usize {
        2
    }

    fn max_instruction_size(&self) -> usize {
        4
    }

    fn is_fixed_width(&self) -> bool {
        false
    }
}
