//! Instruction encoding classes.
//!
//! Every catalog entry names one of the fourteen RISC-V base formats. The
//! class fixes the instruction length, which function-code fields take part
//! in matching, and where the operand fields live.
//!
//! ```text
//! R   |31 funct7 25|24 rs2 20|19 rs1 15|14 funct3 12|11 rd 7|6 opcode 0|
//! I   |31 imm[11:0]        20|19 rs1 15|14 funct3 12|11 rd 7|6 opcode 0|
//! U   |31 imm[31:12]                              12|11 rd 7|6 opcode 0|
//! CR  |15 funct4 12|11 rd/rs1 7|6 rs2 2|1 op 0|
//! CI  |15 funct3 13|12 imm|11 rd/rs1 7|6 imm 2|1 op 0|
//! ```

/// Low opcode bits of a standard 32-bit instruction.
const OPCODE_MASK: u32 = 0x7F;
/// Quadrant bits of a compressed 16-bit instruction.
const C_OPCODE_MASK: u32 = 0x3;

const FUNCT3_MASK: u32 = 0x7;
const FUNCT4_MASK: u32 = 0xF;
const FUNCT7_MASK: u32 = 0x7F;

const FUNCT3_SHIFT: u32 = 12;
const FUNCT7_SHIFT: u32 = 25;
const C_FUNCT3_SHIFT: u32 = 13;
const C_FUNCT4_SHIFT: u32 = 12;

/// Why an opcode and function codes cannot form a match pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// A function code the class requires is absent.
    Missing(&'static str),
    /// A value has bits outside its field.
    OutOfRange { field: &'static str, value: u32 },
}

fn fit(field: &'static str, value: Option<u32>, mask: u32) -> Result<u32, PatternError> {
    let value = value.ok_or(PatternError::Missing(field))?;
    if value & !mask != 0 {
        return Err(PatternError::OutOfRange { field, value });
    }
    Ok(value)
}

/// A RISC-V instruction format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingClass {
    R,
    I,
    S,
    B,
    U,
    J,
    Cr,
    Ci,
    Css,
    Ciw,
    Cl,
    Cs,
    Cb,
    Cj,
}

/// The function-code fields a class requires in its catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionFields {
    /// Opcode only (U, J).
    None,
    /// funct3 at bits 14:12 (I, S, B).
    Funct3,
    /// funct3 at bits 14:12 and funct7 at bits 31:25 (R).
    Funct3Funct7,
    /// funct4 at bits 15:12 (CR).
    CFunct4,
    /// funct3 at bits 15:13 (remaining compressed classes).
    CFunct3,
}

/// Function-code values supplied by a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionCodes {
    pub funct3: Option<u32>,
    pub funct4: Option<u32>,
    pub funct7: Option<u32>,
}

impl EncodingClass {
    /// All encoding classes.
    pub const ALL: [Self; 14] = [
        Self::R,
        Self::I,
        Self::S,
        Self::B,
        Self::U,
        Self::J,
        Self::Cr,
        Self::Ci,
        Self::Css,
        Self::Ciw,
        Self::Cl,
        Self::Cs,
        Self::Cb,
        Self::Cj,
    ];

    /// Looks up a class by its catalog name, including the `SB` and `UJ` aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "R" => Self::R,
            "I" => Self::I,
            "S" => Self::S,
            "B" | "SB" => Self::B,
            "U" => Self::U,
            "J" | "UJ" => Self::J,
            "CR" => Self::Cr,
            "CI" => Self::Ci,
            "CSS" => Self::Css,
            "CIW" => Self::Ciw,
            "CL" => Self::Cl,
            "CS" => Self::Cs,
            "CB" => Self::Cb,
            "CJ" => Self::Cj,
            _ => return None,
        };
        Some(class)
    }

    /// Canonical catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::R => "R",
            Self::I => "I",
            Self::S => "S",
            Self::B => "B",
            Self::U => "U",
            Self::J => "J",
            Self::Cr => "CR",
            Self::Ci => "CI",
            Self::Css => "CSS",
            Self::Ciw => "CIW",
            Self::Cl => "CL",
            Self::Cs => "CS",
            Self::Cb => "CB",
            Self::Cj => "CJ",
        }
    }

    /// Returns true for the 16-bit compressed formats.
    pub fn is_compressed(&self) -> bool {
        !matches!(
            self,
            Self::R | Self::I | Self::S | Self::B | Self::U | Self::J
        )
    }

    /// Instruction length in bytes.
    pub fn byte_len(&self) -> usize {
        if self.is_compressed() {
            2
        } else {
            4
        }
    }

    /// Function-code fields taking part in matching.
    pub fn function_fields(&self) -> FunctionFields {
        match self {
            Self::R => FunctionFields::Funct3Funct7,
            Self::I | Self::S | Self::B => FunctionFields::Funct3,
            Self::U | Self::J => FunctionFields::None,
            Self::Cr => FunctionFields::CFunct4,
            Self::Ci | Self::Css | Self::Ciw | Self::Cl | Self::Cs | Self::Cb | Self::Cj => {
                FunctionFields::CFunct3
            }
        }
    }

    /// Bits that must equal the entry's fixed bits for a word to match.
    pub fn select_mask(&self) -> u32 {
        match self.function_fields() {
            FunctionFields::None => OPCODE_MASK,
            FunctionFields::Funct3 => OPCODE_MASK | (FUNCT3_MASK << FUNCT3_SHIFT),
            FunctionFields::Funct3Funct7 => {
                OPCODE_MASK | (FUNCT3_MASK << FUNCT3_SHIFT) | (FUNCT7_MASK << FUNCT7_SHIFT)
            }
            FunctionFields::CFunct4 => C_OPCODE_MASK | (FUNCT4_MASK << C_FUNCT4_SHIFT),
            FunctionFields::CFunct3 => C_OPCODE_MASK | (FUNCT3_MASK << C_FUNCT3_SHIFT),
        }
    }

    /// Combines the opcode and function codes into the bit pattern to match.
    ///
    /// Every value must fit its field, so the result never has bits outside
    /// [`select_mask`](Self::select_mask). Function codes the class does not
    /// use are not checked.
    pub fn fixed_bits(&self, opcode: u32, codes: &FunctionCodes) -> Result<u32, PatternError> {
        let opcode_mask = if self.is_compressed() {
            C_OPCODE_MASK
        } else {
            OPCODE_MASK
        };
        let opcode = fit("opcode", Some(opcode), opcode_mask)?;

        let bits = match self.function_fields() {
            FunctionFields::None => opcode,
            FunctionFields::Funct3 => {
                opcode | (fit("funct3", codes.funct3, FUNCT3_MASK)? << FUNCT3_SHIFT)
            }
            FunctionFields::Funct3Funct7 => {
                opcode
                    | (fit("funct3", codes.funct3, FUNCT3_MASK)? << FUNCT3_SHIFT)
                    | (fit("funct7", codes.funct7, FUNCT7_MASK)? << FUNCT7_SHIFT)
            }
            FunctionFields::CFunct4 => {
                opcode | (fit("funct4", codes.funct4, FUNCT4_MASK)? << C_FUNCT4_SHIFT)
            }
            FunctionFields::CFunct3 => {
                opcode | (fit("funct3", codes.funct3, FUNCT3_MASK)? << C_FUNCT3_SHIFT)
            }
        };
        Ok(bits)
    }

    /// Width of the immediate field, counting its sign bit.
    ///
    /// `None` for classes without an immediate and for U, whose 20-bit
    /// immediate is displayed unsigned.
    pub fn signed_immediate_width(&self) -> Option<u32> {
        match self {
            Self::R | Self::Cr | Self::U => None,
            Self::I | Self::S => Some(12),
            Self::B => Some(13),
            Self::J => Some(21),
            Self::Ci => Some(6),
            Self::Css => Some(8),
            Self::Ciw => Some(10),
            Self::Cl => Some(7),
            Self::Cs => Some(5),
            Self::Cb => Some(9),
            Self::Cj => Some(11),
        }
    }

    /// Returns true if the immediate is a PC-relative branch or jump offset.
    pub fn is_pc_relative(&self) -> bool {
        matches!(self, Self::B | Self::J)
    }
}

impl std::fmt::Display for EncodingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EncodingClass {
    type Err = crate::CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| crate::CatalogError::unknown_class(s))
    }
}
