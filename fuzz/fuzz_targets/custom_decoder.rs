#![no_main]

use libfuzzer_sys::fuzz_target;
use custinsn_disasm::{Catalog, CustomDisassembler, Disassembler, Xlen};

/// One entry per encoding class, with templates using every placeholder.
const CATALOG: &str = r#"<instructions>
  <instruction type="R" opcode="0x0b" funct3="0" funct7="0" str="r $rd,$rs1,$rs2"/>
  <instruction type="I" opcode="0x0b" funct3="1" str="i $rd,$rs1,$imm,$uimm"/>
  <instruction type="S" opcode="0x0b" funct3="2" str="s $rs2,$imm($rs1) $dest"/>
  <instruction type="B" opcode="0x0b" funct3="3" str="b $rs1,$rs2,$dest"/>
  <instruction type="U" opcode="0x2b" str="u $rd,$imm"/>
  <instruction type="J" opcode="0x5b" str="j $rd,$dest"/>
  <instruction type="CR" opcode="0x2" funct4="0xf" str="cr $rd,$rs2"/>
  <instruction type="CI" opcode="0x1" funct3="0x7" str="ci $rd,$imm"/>
  <instruction type="CSS" opcode="0x2" funct3="0x7" str="css $rs2,$imm"/>
  <instruction type="CIW" opcode="0x0" funct3="0x1" str="ciw $rd,$uimm"/>
  <instruction type="CL" opcode="0x0" funct3="0x3" str="cl $rd,$imm($rs1)"/>
  <instruction type="CS" opcode="0x0" funct3="0x7" str="cs $rs2,$imm($rs1)"/>
  <instruction type="CB" opcode="0x1" funct3="0x6" str="cb $rs1,$imm"/>
  <instruction type="CJ" opcode="0x1" funct3="0x5" str="cj $imm $missing $"/>
</instructions>"#;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let catalog = Catalog::from_xml_or_empty(CATALOG);

    // Test both RV64 and RV32 variants
    for xlen in [Xlen::Rv64, Xlen::Rv32] {
        let disasm = CustomDisassembler::new(&catalog, xlen);
        let _ = disasm.decode_instruction(data, 0x1000);

        let results = disasm.disassemble_block(&data[..data.len().min(400)], 0xFFFF_FF00);
        for insn in results.into_iter().flatten() {
            assert!(insn.size == 2 || insn.size == 4);
            assert_eq!(insn.bytes.len(), insn.size);
        }
    }
});
