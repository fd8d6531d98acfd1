//! Bitfield extraction for each encoding class.
//!
//! Field layouts (bit 0 is least significant):
//!
//! | Class | Registers                          | Immediate bits                                  | Sign width |
//! |-------|------------------------------------|-------------------------------------------------|------------|
//! | R     | rd 11:7, rs1 19:15, rs2 24:20      | -                                               | -          |
//! | I     | rd 11:7, rs1 19:15                 | 31:20                                           | 12         |
//! | S     | rs1 19:15, rs2 24:20               | 11:7, 31:25<<5                                  | 12         |
//! | B     | rs1 19:15, rs2 24:20               | 11:8<<1, 30:25<<5, 7<<11, 31<<12                | 13         |
//! | U     | rd 11:7                            | 31:12                                           | unsigned   |
//! | J     | rd 11:7                            | 19:12<<12, 20<<11, 30:21<<1, 31<<20             | 21         |
//! | CR    | rd=rs1 11:7, rs2 6:2               | -                                               | -          |
//! | CI    | rd=rs1 11:7                        | 6:2, 12<<5                                      | 6          |
//! | CSS   | rd=rs1=rs2 11:7                    | 12:9<<2, 8:7<<6                                 | 8          |
//! | CIW   | rd' 4:2                            | 5<<3, 6<<2, 12:11<<4, 10:7<<6                   | 10         |
//! | CL    | rd' 4:2, rs1' 9:7                  | 5<<2, 6<<6, 12:10<<3                            | 7          |
//! | CS    | rd'=rs1' 4:2, rs2' 9:7             | 6:5, 12:10<<2                                   | 5          |
//! | CB    | rs1' 9:7                           | 2<<5, 6:3<<1, 12:10<<6                          | 9          |
//! | CJ    | -                                  | 2<<5, 6:3<<1, 12:7<<6                           | 11         |
//!
//! Primed registers index the compressed table (x8-x15).

use std::collections::HashMap;

use custinsn_core::{Register, Xlen};

use crate::encoding::EncodingClass;

/// A decoded placeholder value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Register, rendered by ABI name.
    Register(Register),
    /// Sign-extended immediate, rendered in decimal.
    Signed(i64),
    /// Raw immediate bits, rendered in decimal.
    Unsigned(u64),
    /// Absolute address, rendered as lowercase hex with a `0x` prefix.
    Address(u64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{}", reg.name()),
            Self::Signed(v) => write!(f, "{}", v),
            Self::Unsigned(v) => write!(f, "{}", v),
            Self::Address(addr) => write!(f, "{:#x}", addr),
        }
    }
}

/// Decoded fields keyed by placeholder name (without the `$`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: HashMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the register stored under `name`, if any.
    pub fn register(&self, name: &str) -> Option<Register> {
        match self.fields.get(name) {
            Some(FieldValue::Register(reg)) => Some(*reg),
            _ => None,
        }
    }

    /// Returns the signed immediate, if any.
    pub fn imm(&self) -> Option<i64> {
        match self.fields.get("imm") {
            Some(FieldValue::Signed(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the raw immediate bits, if any.
    pub fn uimm(&self) -> Option<u64> {
        match self.fields.get("uimm") {
            Some(FieldValue::Unsigned(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Extracts bits `hi..=lo` of `word`, right-aligned.
#[inline]
pub fn bits(word: u32, hi: u32, lo: u32) -> u32 {
    debug_assert!(hi >= lo && hi < 32);
    (word >> lo) & (u32::MAX >> (31 - (hi - lo)))
}

/// Sign-extends the low `width` bits of `value`, treating bit `width - 1`
/// as the sign bit. Bits at or above `width` are discarded.
#[inline]
pub fn sign_extend(value: u32, width: u32) -> i64 {
    debug_assert!((1..=32).contains(&width));
    let sign = 1u64 << (width - 1);
    let value = value as u64;
    (value & (sign - 1)) as i64 - (value & sign) as i64
}

/// Raw (unsigned) immediate bits of `word` for `class`, or `None` when the
/// class has no immediate.
pub fn raw_immediate(class: EncodingClass, word: u32) -> Option<u32> {
    let imm = match class {
        EncodingClass::R | EncodingClass::Cr => return None,
        EncodingClass::I => bits(word, 31, 20),
        EncodingClass::S => bits(word, 11, 7) | (bits(word, 31, 25) << 5),
        EncodingClass::B => {
            (bits(word, 11, 8) << 1)
                | (bits(word, 30, 25) << 5)
                | (bits(word, 7, 7) << 11)
                | (bits(word, 31, 31) << 12)
        }
        EncodingClass::U => bits(word, 31, 12),
        EncodingClass::J => {
            (bits(word, 19, 12) << 12)
                | (bits(word, 20, 20) << 11)
                | (bits(word, 30, 21) << 1)
                | (bits(word, 31, 31) << 20)
        }
        EncodingClass::Ci => bits(word, 6, 2) | (bits(word, 12, 12) << 5),
        EncodingClass::Css => (bits(word, 12, 9) << 2) | (bits(word, 8, 7) << 6),
        EncodingClass::Ciw => {
            (bits(word, 5, 5) << 3)
                | (bits(word, 6, 6) << 2)
                | (bits(word, 12, 11) << 4)
                | (bits(word, 10, 7) << 6)
        }
        EncodingClass::Cl => {
            (bits(word, 5, 5) << 2) | (bits(word, 6, 6) << 6) | (bits(word, 12, 10) << 3)
        }
        EncodingClass::Cs => bits(word, 6, 5) | (bits(word, 12, 10) << 2),
        EncodingClass::Cb => {
            (bits(word, 2, 2) << 5) | (bits(word, 6, 3) << 1) | (bits(word, 12, 10) << 6)
        }
        EncodingClass::Cj => {
            (bits(word, 2, 2) << 5) | (bits(word, 6, 3) << 1) | (bits(word, 12, 7) << 6)
        }
    };
    Some(imm)
}

/// Slices `word` into the named fields of `class`.
///
/// `address` is the address of the instruction; B and J classes resolve
/// their offset against it into a `dest` field, wrapping within `xlen`.
pub fn decode_fields(class: EncodingClass, word: u32, address: u64, xlen: Xlen) -> FieldMap {
    let mut fields = FieldMap::new();
    let mut reg = |name: &str, r: Register| fields.insert(name, FieldValue::Register(r));

    let rd = Register::x(bits(word, 11, 7));
    let rs1 = Register::x(bits(word, 19, 15));
    let rs2 = Register::x(bits(word, 24, 20));

    match class {
        EncodingClass::R => {
            reg("rd", rd);
            reg("rs1", rs1);
            reg("rs2", rs2);
        }
        EncodingClass::I => {
            reg("rd", rd);
            reg("rs1", rs1);
        }
        EncodingClass::S | EncodingClass::B => {
            reg("rs1", rs1);
            reg("rs2", rs2);
        }
        EncodingClass::U | EncodingClass::J => {
            reg("rd", rd);
        }
        EncodingClass::Cr => {
            reg("rd", rd);
            reg("rs1", rd);
            reg("rs2", Register::x(bits(word, 6, 2)));
        }
        EncodingClass::Ci => {
            reg("rd", rd);
            reg("rs1", rd);
        }
        EncodingClass::Css => {
            reg("rd", rd);
            reg("rs1", rd);
            reg("rs2", rd);
        }
        EncodingClass::Ciw => {
            reg("rd", Register::compressed(bits(word, 4, 2)));
        }
        EncodingClass::Cl => {
            reg("rd", Register::compressed(bits(word, 4, 2)));
            reg("rs1", Register::compressed(bits(word, 9, 7)));
        }
        EncodingClass::Cs => {
            let rd = Register::compressed(bits(word, 4, 2));
            reg("rd", rd);
            reg("rs1", rd);
            reg("rs2", Register::compressed(bits(word, 9, 7)));
        }
        EncodingClass::Cb => {
            reg("rs1", Register::compressed(bits(word, 9, 7)));
        }
        EncodingClass::Cj => {}
    }

    if let Some(uimm) = raw_immediate(class, word) {
        let imm = match class.signed_immediate_width() {
            Some(width) => sign_extend(uimm, width),
            None => uimm as i64,
        };
        fields.insert("uimm", FieldValue::Unsigned(uimm as u64));
        fields.insert("imm", FieldValue::Signed(imm));

        if class.is_pc_relative() {
            let target = xlen.offset_address(address, imm);
            fields.insert("dest", FieldValue::Address(target));
        }
    }

    fields
}
