//! Instruction catalogs and the XML catalog loader.
//!
//! A catalog document looks like:
//!
//! ```xml
//! <instructions>
//!   <instruction type="R" opcode="0x0b" funct3="0x0" funct7="0x00" str="fake $rd,$rs1,$rs2"/>
//!   <instruction type="CI" opcode="0x1" funct3="0x0" str="c.addi_x $rd, $imm"/>
//! </instructions>
//! ```
//!
//! Every `instruction` element directly under the root becomes one entry,
//! in document order. Elements that cannot be turned into an entry are
//! logged and skipped; a document that cannot be obtained or parsed gives
//! an empty catalog.

use roxmltree::{Document, Node};

use crate::encoding::{EncodingClass, FunctionCodes};
use crate::entry::CatalogEntry;
use crate::source::{fetch_catalog_text, AnnexReader, CatalogLocator};
use crate::CatalogError;

/// Element name of a catalog entry.
pub const INSTRUCTION_TAG: &str = "instruction";

/// An ordered, immutable set of catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Creates a catalog from already-built entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// A catalog that never matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Parses a catalog document, returning one result per `instruction`
    /// element.
    ///
    /// Fails only if the document itself is not well-formed.
    pub fn parse_entries(text: &str) -> Result<Vec<Result<CatalogEntry, CatalogError>>, CatalogError> {
        let doc = Document::parse(text)?;
        let entries = doc
            .root_element()
            .children()
            .filter(|node| node.is_element() && node.has_tag_name(INSTRUCTION_TAG))
            .map(|node| {
                entry_from_node(node).map_err(|err| {
                    let pos = doc.text_pos_at(node.range().start);
                    log::warn!("skipping catalog entry at line {}: {}", pos.row, err);
                    err
                })
            })
            .collect();
        Ok(entries)
    }

    /// Parses a catalog document, skipping entries that cannot be built.
    pub fn from_xml(text: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = Self::parse_entries(text)?
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        log::debug!("loaded {} catalog entries", entries.len());
        Ok(Self::new(entries))
    }

    /// Like [`from_xml`](Self::from_xml), but a malformed document yields an
    /// empty catalog.
    pub fn from_xml_or_empty(text: &str) -> Self {
        Self::from_xml(text).unwrap_or_else(|err| {
            log::warn!("custom instruction catalog unavailable: {}", err);
            Self::empty()
        })
    }

    /// Obtains and parses the catalog named by `locator`.
    ///
    /// Never fails: a disabled locator, an unreachable source or a malformed
    /// document all give an empty catalog.
    pub fn load(locator: &CatalogLocator, annex: Option<&mut dyn AnnexReader>) -> Self {
        match fetch_catalog_text(locator, annex) {
            Ok(Some(text)) => Self::from_xml_or_empty(&text),
            Ok(None) => {
                log::debug!("no custom instruction catalog for {:?}", locator);
                Self::empty()
            }
            Err(err) => {
                log::warn!("custom instruction catalog unavailable: {}", err);
                Self::empty()
            }
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parses a hexadecimal attribute value, with or without a `0x` prefix.
pub fn parse_hex(attribute: &'static str, value: &str) -> Result<u32, CatalogError> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).map_err(|_| CatalogError::malformed(attribute, value))
}

fn required<'a>(node: &Node<'a, '_>, attribute: &'static str) -> Result<&'a str, CatalogError> {
    node.attribute(attribute)
        .ok_or(CatalogError::MissingAttribute { attribute })
}

fn optional_hex(node: &Node<'_, '_>, attribute: &'static str) -> Result<Option<u32>, CatalogError> {
    node.attribute(attribute)
        .map(|value| parse_hex(attribute, value))
        .transpose()
}

/// Builds one entry from an `instruction` element.
pub fn entry_from_node(node: Node<'_, '_>) -> Result<CatalogEntry, CatalogError> {
    let type_name = required(&node, "type")?;
    let class = EncodingClass::from_name(type_name.trim())
        .ok_or_else(|| CatalogError::unknown_class(type_name))?;
    let opcode = parse_hex("opcode", required(&node, "opcode")?)?;
    let template = required(&node, "str")?;

    let codes = FunctionCodes {
        funct3: optional_hex(&node, "funct3")?,
        funct4: optional_hex(&node, "funct4")?,
        funct7: optional_hex(&node, "funct7")?,
    };

    CatalogEntry::new(class, opcode, codes, template)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<instructions>
  <instruction type="R" opcode="0x0b" funct3="0x0" funct7="0x00" str="fake $rd,$rs1,$rs2"/>
  <instruction type="SB" opcode="0f" funct3="5" str="beq_x $rs1, $rs2, $dest"/>
  <instruction type="UJ" opcode="0x73" str="jal_x $rd, $dest"/>
  <instruction type="CR" opcode="0x2" funct4="0x9" str="c.add_x $rd, $rs2"/>
</instructions>"#;

    #[test]
    fn test_load_in_document_order() {
        let catalog = Catalog::from_xml(SAMPLE).unwrap();
        let classes: Vec<_> = catalog.iter().map(|e| e.class()).collect();
        assert_eq!(
            classes,
            vec![
                EncodingClass::R,
                EncodingClass::B,
                EncodingClass::J,
                EncodingClass::Cr
            ]
        );
        assert_eq!(catalog.entries()[1].funct3(), Some(5));
        assert_eq!(catalog.entries()[3].fixed_bits(), 0x9002);
    }

    #[test]
    fn test_unknown_class_is_skipped() {
        let xml = r#"<i>
            <instruction type="Q" opcode="0x0b" str="nope"/>
            <instruction type="U" opcode="0x37" str="lui_x $rd, $imm"/>
        </i>"#;
        let results = Catalog::parse_entries(xml).unwrap();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(CatalogError::UnknownEncodingClass { ref name }) if name == "Q"
        ));
        let catalog = Catalog::from_xml(xml).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].class(), EncodingClass::U);
    }

    #[test]
    fn test_malformed_attributes_are_skipped() {
        let xml = r#"<i>
            <instruction type="I" opcode="zz" funct3="0" str="a"/>
            <instruction type="I" opcode="0x13" str="b"/>
            <instruction type="I" funct3="1" str="c"/>
            <instruction type="I" opcode="0x13" funct3="1"/>
            <instruction opcode="0x13" funct3="1" str="e"/>
            <instruction type="I" opcode="0x13" funct3="1" str="ok"/>
        </i>"#;
        let results = Catalog::parse_entries(xml).unwrap();
        assert!(matches!(
            results[0],
            Err(CatalogError::MalformedAttribute {
                attribute: "opcode",
                ..
            })
        ));
        assert!(matches!(
            results[1],
            Err(CatalogError::MissingAttribute {
                attribute: "funct3"
            })
        ));
        assert!(matches!(
            results[2],
            Err(CatalogError::MissingAttribute {
                attribute: "opcode"
            })
        ));
        assert!(matches!(
            results[3],
            Err(CatalogError::MissingAttribute { attribute: "str" })
        ));
        assert!(matches!(
            results[4],
            Err(CatalogError::MissingAttribute { attribute: "type" })
        ));
        let catalog = Catalog::from_xml(xml).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].template(), "ok");
    }

    #[test]
    fn test_oversized_function_code_never_matches() {
        let xml = r#"<i><instruction type="I" opcode="0x7b" funct3="0x9" str="bogus $rd"/></i>"#;
        let catalog = Catalog::from_xml(xml).unwrap();
        assert!(catalog.is_empty());

        let word = crate::DecodedWord::new((1 << 12) | (3 << 7) | 0x7b, 4);
        assert!(catalog.find_match(word).is_none());
    }

    #[test]
    fn test_other_elements_ignored() {
        let xml = r#"<i><comment/><instruction type="U" opcode="37" str="x"/><group><instruction type="U" opcode="37" str="nested"/></group></i>"#;
        let catalog = Catalog::from_xml(xml).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            Catalog::from_xml("<instructions>"),
            Err(CatalogError::Parse(_))
        ));
        assert!(Catalog::from_xml_or_empty("not xml at all").is_empty());
    }

    #[test]
    fn test_empty_root() {
        assert!(Catalog::from_xml("<instructions/>").unwrap().is_empty());
    }

    #[test]
    fn test_disabled_locator_gives_empty() {
        assert!(Catalog::load(&CatalogLocator::Disabled, None).is_empty());
    }

    #[test]
    fn test_missing_file_gives_empty() {
        let locator = CatalogLocator::Local("/nonexistent/custinsn/insn.xml".into());
        assert!(Catalog::load(&locator, None).is_empty());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("opcode", "0x7b").unwrap(), 0x7b);
        assert_eq!(parse_hex("opcode", "0X7B").unwrap(), 0x7b);
        assert_eq!(parse_hex("opcode", " 7b ").unwrap(), 0x7b);
        assert!(parse_hex("opcode", "").is_err());
        assert!(parse_hex("opcode", "0x").is_err());
        assert!(parse_hex("opcode", "-1").is_err());
    }
}
