//! CLI integration tests for custinsn.
//!
//! These tests run the built binary against the catalog in
//! `tests/fixtures/insn.xml`.

use std::process::{Command, Output};

/// Get the path to the custinsn binary.
fn custinsn_bin() -> String {
    env!("CARGO_BIN_EXE_custinsn").to_string()
}

const CATALOG: &str = "tests/fixtures/insn.xml";

/// Run custinsn with the given arguments.
fn run_custinsn(args: &[&str]) -> Output {
    Command::new(custinsn_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute custinsn")
}

/// Run custinsn with the fixture catalog and return stdout.
fn disassemble(args: &[&str]) -> String {
    let mut full = vec!["--catalog", CATALOG];
    full.extend_from_slice(args);
    let output = run_custinsn(&full);
    assert!(
        output.status.success(),
        "custinsn {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help() {
    let output = run_custinsn(&["--help"]);
    assert!(output.status.success(), "custinsn --help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("custom RISC-V"), "Help should describe the tool");
    assert!(stdout.contains("--catalog"), "Help should show --catalog option");
    assert!(stdout.contains("--no-custom"), "Help should show --no-custom option");
}

#[test]
fn test_nothing_to_disassemble() {
    let output = run_custinsn(&["--catalog", CATALOG]);
    assert!(!output.status.success(), "no input should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Nothing to disassemble"));
}

// =============================================================================
// Catalog Decoding Tests
// =============================================================================

#[test]
fn test_r_type_registers() {
    let stdout = disassemble(&["--address", "0x1000", "0x0052018b"]);
    assert_eq!(
        stdout.trim_end(),
        "0000000000001000: 8b 01 52 00  fake gp,tp,t0"
    );
}

#[test]
fn test_negative_immediate() {
    let stdout = disassemble(&["0xfff211fb"]);
    assert!(stdout.contains("addi_x gp, tp, -1"), "got: {}", stdout);
}

#[test]
fn test_branch_destination() {
    let stdout = disassemble(&["--address", "0x3000", "0x80e6d00f"]);
    assert!(stdout.contains("beq_x a3, a4, 0x2000"), "got: {}", stdout);
}

#[test]
fn test_branch_destination_wraps_rv32() {
    let stdout = disassemble(&["--xlen", "32", "0x80e6d00f"]);
    assert_eq!(
        stdout.trim_end(),
        "00000000: 0f d0 e6 80  beq_x a3, a4, 0xfffff000"
    );
}

#[test]
fn test_mixed_lengths() {
    let stdout = disassemble(&["--address", "0x1000", "0x0052018b", "0x1b9", "0x13"]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "got: {}", stdout);
    assert!(lines[0].starts_with("0000000000001000:"));
    assert!(lines[1].starts_with("0000000000001004: b9 01 "));
    assert!(lines[1].ends_with("c.addi_x gp, 14"));
    assert!(lines[2].starts_with("0000000000001006:"));
    assert!(lines[2].ends_with(".insn 0x00000013"));
}

#[test]
fn test_address_wraps_at_top_of_address_space() {
    let stdout = disassemble(&["--address", "ffffffffffffffff", "0x0001", "0x0001"]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "got: {}", stdout);
    assert_eq!(lines[0], "ffffffffffffffff: 01 00        c.addi_x zero, 0");
    assert_eq!(lines[1], "0000000000000001: 01 00        c.addi_x zero, 0");
}

#[test]
fn test_address_wraps_rv32() {
    let stdout = disassemble(&["--xlen", "32", "--address", "fffffffe", "0x0001", "0x0001"]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "got: {}", stdout);
    assert!(lines[0].starts_with("fffffffe: 01 00 "), "got: {}", stdout);
    assert!(lines[1].starts_with("00000000: 01 00 "), "got: {}", stdout);
}

#[test]
fn test_unmatched_compressed_fallback() {
    let stdout = disassemble(&["0x4001"]);
    assert!(stdout.trim_end().ends_with(".insn 0x4001"), "got: {}", stdout);
}

#[test]
fn test_raw_file_input() {
    let path = std::env::temp_dir().join(format!("custinsn-cli-{}.bin", std::process::id()));
    let mut code = 0x0052_018bu32.to_le_bytes().to_vec();
    code.extend_from_slice(&0x01b9u16.to_le_bytes());
    code.push(0x13);
    std::fs::write(&path, &code).expect("write temp file");

    let stdout = disassemble(&["--file", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "got: {}", stdout);
    assert!(lines[0].ends_with("fake gp,tp,t0"));
    assert!(lines[1].ends_with("c.addi_x gp, 14"));
    assert!(lines[2].ends_with("(truncated)"));
}

// =============================================================================
// Settings Tests
// =============================================================================

#[test]
fn test_no_custom_disables_catalog() {
    let stdout = disassemble(&["--no-custom", "0x0052018b"]);
    assert!(stdout.contains(".insn 0x0052018b"), "got: {}", stdout);
    assert!(!stdout.contains("fake"));
}

#[test]
fn test_without_catalog_everything_falls_back() {
    let output = run_custinsn(&["0x0052018b"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(".insn 0x0052018b"), "got: {}", stdout);
}

#[test]
fn test_missing_catalog_file_is_not_fatal() {
    let output = run_custinsn(&["--catalog", "tests/fixtures/does-not-exist.xml", "0x0052018b"]);
    assert!(output.status.success(), "an unavailable catalog is only a warning");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(".insn 0x0052018b"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unavailable"), "stderr: {}", stderr);
}

#[test]
fn test_remote_catalog_rejected() {
    let output = run_custinsn(&["--catalog", "remote:", "0x13"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("remote:insn.xml"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_xlen_rejected() {
    let output = run_custinsn(&["--xlen", "48", "0x13"]);
    assert!(!output.status.success());
}

#[test]
fn test_oversized_compressed_word_rejected() {
    let output = run_custinsn(&["0x10001"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("16 bits"), "stderr: {}", stderr);
}
