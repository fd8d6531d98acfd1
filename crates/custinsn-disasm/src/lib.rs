//! # custinsn-disasm
//!
//! Catalog-driven disassembly of custom RISC-V instructions.
//!
//! A catalog (an XML document of `instruction` rules) describes each custom
//! instruction by its encoding class, fixed opcode and function-code bits,
//! and a mnemonic template. Given a raw instruction this crate finds the
//! first matching rule, slices the word into the fields of that class and
//! expands the template:
//!
//! ```
//! use custinsn_core::Xlen;
//! use custinsn_disasm::{Catalog, CustomDisassembler, DecodedWord};
//!
//! let catalog = Catalog::from_xml(
//!     r#"<instructions>
//!          <instruction type="R" opcode="0x0b" funct3="0" funct7="0" str="fake $rd,$rs1,$rs2"/>
//!        </instructions>"#,
//! ).unwrap();
//! let disasm = CustomDisassembler::new(&catalog, Xlen::Rv64);
//! let word = DecodedWord::new((5 << 20) | (4 << 15) | (3 << 7) | 0x0b, 4);
//! assert_eq!(disasm.disassemble_word(word, 0x1000).as_deref(), Some("fake gp,tp,t0"));
//! ```
//!
//! Instructions not in the catalog yield no result, leaving the caller's
//! default decoder in charge.

pub mod catalog;
pub mod disassembler;
pub mod encoding;
pub mod entry;
pub mod error;
pub mod fields;
pub mod matcher;
pub mod render;
pub mod session;
pub mod source;
pub mod traits;

pub use catalog::Catalog;
pub use disassembler::CustomDisassembler;
pub use encoding::{EncodingClass, FunctionCodes, PatternError};
pub use entry::CatalogEntry;
pub use error::{CatalogError, DecodeError};
pub use fields::{FieldMap, FieldValue};
pub use matcher::DecodedWord;
pub use render::Renderer;
pub use session::{DecodeSession, DisplaySettings, SessionCache};
pub use source::{AnnexReader, CatalogLocator};
pub use traits::{DecodedInstruction, Disassembler, MemoryReader, SliceMemory};

pub use custinsn_core::Xlen;
