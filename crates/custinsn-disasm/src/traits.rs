//! Disassembler and target-memory traits.

use crate::matcher::instruction_len;
use crate::DecodeError;

/// Result of decoding an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Address of the first byte.
    pub address: u64,
    /// The instruction bytes in memory order.
    pub bytes: Vec<u8>,
    /// Rendered assembly text.
    pub text: String,
    /// Number of bytes consumed.
    pub size: usize,
}

/// Read access to target memory at the decode request boundary.
pub trait MemoryReader {
    /// Reads exactly `len` bytes starting at `address`.
    fn read_memory(&self, address: u64, len: usize) -> Result<Vec<u8>, DecodeError>;
}

/// A byte buffer mapped at a base address.
#[derive(Debug, Clone, Copy)]
pub struct SliceMemory<'a> {
    base: u64,
    bytes: &'a [u8],
}

impl<'a> SliceMemory<'a> {
    pub fn new(base: u64, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// One past the last mapped address, wrapping past the top of the
    /// address space.
    pub fn end(&self) -> u64 {
        self.base.wrapping_add(self.bytes.len() as u64)
    }
}

impl MemoryReader for SliceMemory<'_> {
    fn read_memory(&self, address: u64, len: usize) -> Result<Vec<u8>, DecodeError> {
        // Offsets wrap so a buffer may straddle the top of the address space.
        let start = Some(address.wrapping_sub(self.base))
            .filter(|&off| off <= self.bytes.len() as u64)
            .ok_or_else(|| DecodeError::read_failed(address, "address outside buffer"))?
            as usize;
        let available = self.bytes.len() - start;
        if available < len {
            return Err(DecodeError::truncated(address, len, available));
        }
        Ok(self.bytes[start..start + len].to_vec())
    }
}

/// Trait for instruction decoders.
pub trait Disassembler {
    /// Decode a single instruction starting at the given address.
    ///
    /// # Arguments
    /// * `bytes` - The raw bytes to decode
    /// * `address` - The virtual address of the first byte
    ///
    /// # Returns
    /// The decoded instruction and the number of bytes consumed.
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<DecodedInstruction, DecodeError>;

    /// Returns the minimum instruction size.
    fn min_instruction_size(&self) -> usize;

    /// Returns the maximum instruction size.
    fn max_instruction_size(&self) -> usize;

    /// Returns whether instructions are fixed-width.
    fn is_fixed_width(&self) -> bool;

    /// Disassemble a block of code into instructions.
    ///
    /// On error the length encoded in the first byte is skipped, so an
    /// unmatched instruction never desynchronizes the stream.
    fn disassemble_block(
        &self,
        bytes: &[u8],
        start_address: u64,
    ) -> Vec<Result<DecodedInstruction, DecodeError>> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let remaining = &bytes[offset..];
            let address = start_address.wrapping_add(offset as u64);

            match self.decode_instruction(remaining, address) {
                Ok(decoded) => {
                    offset += decoded.size;
                    instructions.push(Ok(decoded));
                }
                Err(e) => {
                    offset += instruction_len(remaining[0]).min(remaining.len());
                    instructions.push(Err(e));
                }
            }
        }

        instructions
    }
}
