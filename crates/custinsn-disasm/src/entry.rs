//! Catalog entries.

use crate::encoding::{EncodingClass, FunctionCodes, PatternError};
use crate::CatalogError;

/// One instruction-format rule from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    class: EncodingClass,
    opcode: u32,
    codes: FunctionCodes,
    template: String,
    fixed_bits: u32,
    select_mask: u32,
}

impl CatalogEntry {
    /// Creates an entry, computing its match pattern.
    ///
    /// Fails when the class requires a function code the entry lacks, or
    /// when the opcode or a used function code is wider than its field.
    /// Function codes the class does not use are kept but ignored.
    pub fn new(
        class: EncodingClass,
        opcode: u32,
        codes: FunctionCodes,
        template: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let fixed_bits = class
            .fixed_bits(opcode, &codes)
            .map_err(|err| match err {
                PatternError::Missing(attribute) => CatalogError::MissingAttribute { attribute },
                PatternError::OutOfRange { field, value } => {
                    CatalogError::malformed(field, format!("{:#x}", value))
                }
            })?;

        Ok(Self {
            class,
            opcode,
            codes,
            template: template.into(),
            fixed_bits,
            select_mask: class.select_mask(),
        })
    }

    pub fn class(&self) -> EncodingClass {
        self.class
    }

    pub fn opcode(&self) -> u32 {
        self.opcode
    }

    pub fn funct3(&self) -> Option<u32> {
        self.codes.funct3
    }

    pub fn funct4(&self) -> Option<u32> {
        self.codes.funct4
    }

    pub fn funct7(&self) -> Option<u32> {
        self.codes.funct7
    }

    /// The mnemonic template with `$name` placeholders.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Opcode and function-code bits in their encoded positions.
    pub fn fixed_bits(&self) -> u32 {
        self.fixed_bits
    }

    /// Bits compared against [`fixed_bits`](Self::fixed_bits).
    pub fn select_mask(&self) -> u32 {
        self.select_mask
    }

    /// Instruction length in bytes.
    pub fn byte_len(&self) -> usize {
        self.class.byte_len()
    }

    /// Returns true if a word of the given length is an instance of this entry.
    pub fn matches(&self, word: u32, len: usize) -> bool {
        len == self.byte_len() && word & self.select_mask == self.fixed_bits
    }
}
