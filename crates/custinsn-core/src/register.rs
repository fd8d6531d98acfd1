//! RISC-V integer register naming.
//!
//! Standard instructions address all 32 integer registers with 5-bit fields.
//! The 3-bit register fields of the compressed CIW/CL/CS/CB formats address
//! only x8-x15.

/// ABI names of the 32 integer registers, indexed by register number.
pub const X_REGISTER_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "fp", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// ABI names of the registers reachable from a 3-bit compressed field (x8-x15).
pub const COMPRESSED_REGISTER_NAMES: [&str; 8] = ["fp", "s1", "a0", "a1", "a2", "a3", "a4", "a5"];

/// Which register table a field indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterFile {
    /// Full integer register file, 5-bit index.
    X,
    /// Compressed subset x8-x15, 3-bit index.
    Compressed,
}

/// A decoded register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Register {
    /// The table the index refers to.
    pub file: RegisterFile,
    /// Index within that table.
    pub index: u8,
}

impl Register {
    /// Creates an integer register from a 5-bit field; higher bits are ignored.
    pub fn x(field: u32) -> Self {
        Self {
            file: RegisterFile::X,
            index: (field & 0x1F) as u8,
        }
    }

    /// Creates a compressed register from a 3-bit field; higher bits are ignored.
    pub fn compressed(field: u32) -> Self {
        Self {
            file: RegisterFile::Compressed,
            index: (field & 0x7) as u8,
        }
    }

    /// Architectural register number (x0-x31).
    pub fn number(&self) -> u8 {
        match self.file {
            RegisterFile::X => self.index,
            RegisterFile::Compressed => self.index + 8,
        }
    }

    /// Returns the ABI name for this register.
    pub fn name(&self) -> &'static str {
        match self.file {
            RegisterFile::X => X_REGISTER_NAMES[self.index as usize],
            RegisterFile::Compressed => COMPRESSED_REGISTER_NAMES[self.index as usize],
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
