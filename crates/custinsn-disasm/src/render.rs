//! Mnemonic template expansion.
//!
//! Templates are plain text with `$name` placeholders, e.g.
//! `"lw_x $rd, $imm($rs1)"`. A placeholder is `$` followed by an identifier
//! (`[A-Za-z_][A-Za-z0-9_]*`, longest match). Placeholders with no decoded
//! field are copied through unchanged, so a template that names a field the
//! class does not provide still renders everything else.

use custinsn_core::Xlen;

use crate::fields::{FieldMap, FieldValue};

/// Expands templates against decoded fields for one target width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Renderer {
    xlen: Xlen,
}

impl Renderer {
    pub fn new(xlen: Xlen) -> Self {
        Self { xlen }
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }

    /// Adds the `$dest` address for classes whose decoder did not supply one.
    ///
    /// The signed immediate is read as an absolute address; negative values
    /// wrap around the top of the target's address space.
    pub fn resolve_destination(&self, fields: &mut FieldMap) {
        if fields.contains("dest") {
            return;
        }
        if let Some(imm) = fields.imm() {
            fields.insert("dest", FieldValue::Address(self.xlen.wrap_address(imm)));
        }
    }

    /// Resolves `$dest` and expands `template`.
    pub fn render(&self, template: &str, mut fields: FieldMap) -> String {
        self.resolve_destination(&mut fields);
        expand_template(template, &fields)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `$name` in `template` with its value from `fields`.
///
/// Unknown placeholders and a `$` not followed by an identifier are
/// emitted verbatim.
pub fn expand_template(template: &str, fields: &FieldMap) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let ident_len = match after.chars().next() {
            Some(c) if is_ident_start(c) => after
                .find(|c: char| !is_ident_continue(c))
                .unwrap_or(after.len()),
            _ => 0,
        };

        if ident_len == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let name = &after[..ident_len];
        match fields.get(name) {
            Some(value) => out.push_str(&value.to_string()),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[ident_len..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use custinsn_core::Register;

    fn sample_fields() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("rd", FieldValue::Register(Register::x(3)));
        fields.insert("rs1", FieldValue::Register(Register::x(4)));
        fields.insert("rs2", FieldValue::Register(Register::x(5)));
        fields
    }

    #[test]
    fn test_registers_render_as_names() {
        let out = expand_template("fake $rd,$rs1,$rs2", &sample_fields());
        assert_eq!(out, "fake gp,tp,t0");
    }

    #[test]
    fn test_unknown_placeholder_passes_through() {
        let out = expand_template("$opcode fake $rd,$rs1,$rs2", &sample_fields());
        assert_eq!(out, "$opcode fake gp,tp,t0");
    }

    #[test]
    fn test_longest_identifier_wins() {
        let out = expand_template("$rd2 $rd_ $rd", &sample_fields());
        assert_eq!(out, "$rd2 $rd_ gp");
    }

    #[test]
    fn test_lone_dollar() {
        let out = expand_template("a $ b $1 $$rd $", &sample_fields());
        assert_eq!(out, "a $ b $1 $gp $");
    }

    #[test]
    fn test_adjacent_punctuation() {
        let mut fields = sample_fields();
        fields.insert("imm", FieldValue::Signed(-8));
        let out = expand_template("lw_x $rd, $imm($rs1)", &fields);
        assert_eq!(out, "lw_x gp, -8(tp)");
    }

    #[test]
    fn test_every_value_kind_is_written() {
        let mut fields = sample_fields();
        fields.insert("imm", FieldValue::Signed(i64::MIN));
        fields.insert("shamt", FieldValue::Unsigned(u64::MAX));
        fields.insert("dest", FieldValue::Address(0xabc));
        let out = expand_template("$rd $imm $shamt $dest $rd", &fields);
        assert_eq!(
            out,
            "gp -9223372036854775808 18446744073709551615 0xabc gp"
        );
    }

    #[test]
    fn test_non_ascii_text_is_preserved() {
        let out = expand_template("op→$rd ✓", &sample_fields());
        assert_eq!(out, "op→gp ✓");
    }

    #[test]
    fn test_dest_wraps_negative_rv64() {
        let mut fields = FieldMap::new();
        fields.insert("imm", FieldValue::Signed(-1));
        let out = Renderer::new(Xlen::Rv64).render("$dest", fields);
        assert_eq!(out, "0xffffffffffffffff");
    }

    #[test]
    fn test_dest_wraps_negative_rv32() {
        let mut fields = FieldMap::new();
        fields.insert("imm", FieldValue::Signed(-16));
        let out = Renderer::new(Xlen::Rv32).render("j $dest", fields);
        assert_eq!(out, "j 0xfffffff0");
    }

    #[test]
    fn test_existing_dest_is_kept() {
        let mut fields = FieldMap::new();
        fields.insert("imm", FieldValue::Signed(8));
        fields.insert("dest", FieldValue::Address(0x1008));
        let out = Renderer::new(Xlen::Rv64).render("$dest", fields);
        assert_eq!(out, "0x1008");
    }

    #[test]
    fn test_no_imm_no_dest() {
        let out = Renderer::new(Xlen::Rv64).render("x $dest", sample_fields());
        assert_eq!(out, "x $dest");
    }
}
