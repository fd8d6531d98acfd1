//! Target register width.

use crate::Error;

/// RISC-V base register width (XLEN).
///
/// Determines the size of the address space that relative and negative
/// addresses wrap around in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Xlen {
    /// 32-bit RISC-V (RV32)
    Rv32,
    /// 64-bit RISC-V (RV64)
    #[default]
    Rv64,
}

impl Xlen {
    /// Creates an `Xlen` from a register width in bits.
    pub fn from_bits(bits: u32) -> Result<Self, Error> {
        match bits {
            32 => Ok(Self::Rv32),
            64 => Ok(Self::Rv64),
            other => Err(Error::UnsupportedXlen(other)),
        }
    }

    /// Returns the register width in bits.
    pub fn bits(&self) -> u32 {
        match self {
            Self::Rv32 => 32,
            Self::Rv64 => 64,
        }
    }

    /// Returns the pointer size in bytes.
    pub fn pointer_size(&self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Returns the mask covering every valid address bit.
    pub fn address_mask(&self) -> u64 {
        match self {
            Self::Rv32 => 0xFFFF_FFFF,
            Self::Rv64 => u64::MAX,
        }
    }

    /// Interprets a signed value as an address, wrapping negative values
    /// around the top of the address space.
    pub fn wrap_address(&self, value: i64) -> u64 {
        (value as u64) & self.address_mask()
    }

    /// Adds a signed offset to an address, wrapping within the address space.
    pub fn offset_address(&self, base: u64, offset: i64) -> u64 {
        base.wrapping_add(offset as u64) & self.address_mask()
    }

    /// Returns the architecture name as reported by debuggers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rv32 => "riscv:rv32",
            Self::Rv64 => "riscv:rv64",
        }
    }
}

impl std::fmt::Display for Xlen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        assert_eq!(Xlen::from_bits(32).unwrap(), Xlen::Rv32);
        assert_eq!(Xlen::from_bits(64).unwrap(), Xlen::Rv64);
        assert_eq!(Xlen::from_bits(128), Err(Error::UnsupportedXlen(128)));
    }

    #[test]
    fn test_wrap_negative() {
        assert_eq!(Xlen::Rv32.wrap_address(-4), 0xFFFF_FFFC);
        assert_eq!(Xlen::Rv64.wrap_address(-4), 0xFFFF_FFFF_FFFF_FFFC);
        assert_eq!(Xlen::Rv64.wrap_address(16), 16);
    }

    #[test]
    fn test_offset_address() {
        assert_eq!(Xlen::Rv64.offset_address(0x1000, -8), 0xFF8);
        assert_eq!(Xlen::Rv32.offset_address(0x4, -8), 0xFFFF_FFFC);
        assert_eq!(Xlen::Rv32.offset_address(0xFFFF_FFFC, 8), 0x4);
    }

    #[test]
    fn test_pointer_size() {
        assert_eq!(Xlen::Rv32.pointer_size(), 4);
        assert_eq!(Xlen::Rv64.pointer_size(), 8);
    }
}
