//! custinsn - Disassemble custom RISC-V instructions from an XML catalog
//!
//! Usage:
//!   custinsn --catalog insn.xml 0x0052818b      Disassemble hex instruction words
//!   custinsn --catalog insn.xml --file code.bin Disassemble a raw binary
//!   custinsn --no-custom 0x0052818b             Skip the catalog entirely

use anyhow::{bail, Context, Result};
use clap::Parser;
use custinsn_core::Xlen;
use custinsn_disasm::matcher::instruction_len;
use custinsn_disasm::{
    CatalogLocator, DecodedInstruction, DecodedWord, DisplaySettings, SessionCache,
    SliceMemory,
};
use std::fs;
use std::path::PathBuf;

/// Key of the single decode session this tool ever opens.
const LOCAL_SESSION: u32 = 0;

#[derive(Parser)]
#[command(name = "custinsn")]
#[command(version)]
#[command(about = "Disassemble custom RISC-V instructions described by an XML catalog", long_about = None)]
struct Cli {
    /// Instruction words in hex; 2-byte words unless the low bits are 0b11
    #[arg(conflicts_with = "file")]
    words: Vec<String>,

    /// Raw little-endian code to disassemble
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Catalog location: a file path, or empty to disable
    #[arg(short, long, default_value = "")]
    catalog: String,

    /// Do not decode custom instructions
    #[arg(long)]
    no_custom: bool,

    /// Target register width
    #[arg(long, default_value = "64", value_parser = parse_xlen)]
    xlen: Xlen,

    /// Address of the first instruction
    #[arg(short, long, default_value = "0", value_parser = parse_hex)]
    address: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_hex(s: &str) -> Result<u64, String> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| e.to_string())
}

fn parse_xlen(s: &str) -> Result<Xlen, String> {
    let bits: u32 = s.parse().map_err(|_| format!("invalid width: {}", s))?;
    Xlen::from_bits(bits).map_err(|e| e.to_string())
}

/// Parses one hex instruction word; its length follows from its low bits.
fn parse_word(s: &str) -> Result<DecodedWord> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let value = u32::from_str_radix(digits, 16)
        .with_context(|| format!("Invalid instruction word: {}", s))?;
    let len = instruction_len(value as u8);
    if len == 2 && value > 0xFFFF {
        bail!("{} is a compressed instruction but does not fit in 16 bits", s);
    }
    Ok(DecodedWord::new(value, len))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let locator = CatalogLocator::parse(&cli.catalog);
    if locator.is_remote() {
        bail!(
            "Remote catalog {} needs a debug target connection; pass a local file instead",
            locator
        );
    }

    let code = match &cli.file {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read code: {}", path.display()))?
        }
        None => {
            if cli.words.is_empty() {
                bail!("Nothing to disassemble. Give hex instruction words or --file <path>");
            }
            let mut code = Vec::new();
            for word in &cli.words {
                code.extend(parse_word(word)?.to_le_bytes());
            }
            code
        }
    };

    let mut cache = SessionCache::new(DisplaySettings {
        enabled: !cli.no_custom,
        locator,
    });
    disassemble(&mut cache, &code, cli.address, cli.xlen)
}

fn disassemble(cache: &mut SessionCache<u32>, code: &[u8], base: u64, xlen: Xlen) -> Result<()> {
    let memory = SliceMemory::new(base, code);
    let mut offset = 0;

    while offset < code.len() {
        let address = base.wrapping_add(offset as u64);
        let len = instruction_len(code[offset]);
        let bytes = &code[offset..(offset + len).min(code.len())];
        if bytes.len() < len {
            println!(
                "{:0width$x}: {:<11}  (truncated)",
                address & xlen.address_mask(),
                hex_bytes(bytes),
                width = xlen.pointer_size() * 2
            );
            break;
        }

        let insn = match cache.disassemble(LOCAL_SESSION, None, &memory, address, xlen) {
            Ok(Some(insn)) => insn,
            Ok(None) => {
                let word = DecodedWord::from_le_bytes(bytes)
                    .context("Instruction length does not match its bytes")?;
                fallback(address, word)
            }
            Err(e) => return Err(e).with_context(|| format!("Cannot decode at {:#x}", address)),
        };
        print_instruction(&insn, xlen);
        offset += insn.size;
    }

    Ok(())
}

/// Raw directive for words the catalog does not describe.
fn fallback(address: u64, word: DecodedWord) -> DecodedInstruction {
    DecodedInstruction {
        address,
        bytes: word.to_le_bytes(),
        text: format!(".insn {:#0width$x}", word.value, width = word.len * 2 + 2),
        size: word.len,
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_instruction(insn: &DecodedInstruction, xlen: Xlen) {
    println!(
        "{:0width$x}: {:<11}  {}",
        insn.address & xlen.address_mask(),
        hex_bytes(&insn.bytes),
        insn.text,
        width = xlen.pointer_size() * 2
    );
}
