#![no_main]

use libfuzzer_sys::fuzz_target;
use custinsn_disasm::{Catalog, CustomDisassembler, DecodedWord, Xlen};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Malformed documents and entries must degrade to an empty or shorter catalog
    let catalog = Catalog::from_xml_or_empty(text);

    // Every surviving entry must match its own fixed bits
    for entry in &catalog {
        assert!(entry.matches(entry.fixed_bits(), entry.byte_len()));
    }

    // Render each entry's pattern so template expansion sees fuzzed text
    let disasm = CustomDisassembler::new(&catalog, Xlen::Rv64);
    for entry in &catalog {
        let word = DecodedWord::new(entry.fixed_bits(), entry.byte_len());
        assert!(disasm.disassemble_word(word, 0x1000).is_some());
    }
});
