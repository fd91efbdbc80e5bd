use crate::error::VmError;
use crate::interpreter::ExecutionResult;
use crate::test_utils::{run_code, CODE};
use test_log::test;

/// Run a conditional opcode followed by a three-byte instruction it may
/// skip. Returns whether the branch was taken.
fn branch_taken(prelude: &[u8], condition: &[u8]) -> bool {
    let mut code = prelude.to_vec();
    code.extend_from_slice(condition);
    // relative offset measured from the offset byte, past the next load
    code.push(0x04);
    code.extend_from_slice(&[0x48, 0x01, 0x09]); // V9 = 1
    code.extend_from_slice(&[0x06, 0x01]); // quit
    let (mut interp, _) = run_code(&code);
    interp.execute(Some(100)).unwrap();
    interp.vm.read_variable(9) == 0
}

fn load(a: u8, b: u8) -> Vec<u8> {
    vec![0x48, a, 0x01, 0x48, b, 0x02]
}

#[test]
fn variable_comparisons() {
    // equal, not equal, less than, greater than with relative addresses
    assert!(branch_taken(&load(5, 5), &[0x30, 0x01, 0x02]));
    assert!(!branch_taken(&load(5, 6), &[0x30, 0x01, 0x02]));
    assert!(branch_taken(&load(5, 6), &[0x31, 0x01, 0x02]));
    assert!(!branch_taken(&load(6, 6), &[0x31, 0x01, 0x02]));
    assert!(branch_taken(&load(5, 6), &[0x32, 0x01, 0x02]));
    assert!(!branch_taken(&load(6, 5), &[0x32, 0x01, 0x02]));
    assert!(branch_taken(&load(6, 5), &[0x33, 0x01, 0x02]));
    assert!(!branch_taken(&load(6, 6), &[0x33, 0x01, 0x02]));
}

#[test]
fn constant_comparisons_with_short_constants() {
    assert!(branch_taken(&load(9, 0), &[0x78, 0x01, 0x09]));
    assert!(!branch_taken(&load(9, 0), &[0x78, 0x01, 0x08]));
    assert!(branch_taken(&load(9, 0), &[0x79, 0x01, 0x08]));
    assert!(branch_taken(&load(3, 0), &[0x7A, 0x01, 0x04]));
    assert!(!branch_taken(&load(4, 0), &[0x7A, 0x01, 0x04]));
    assert!(branch_taken(&load(5, 0), &[0x7B, 0x01, 0x04]));
    assert!(!branch_taken(&load(4, 0), &[0x7B, 0x01, 0x04]));
}

#[test]
fn constant_comparisons_with_word_constants() {
    // V1 = 0x1234 via the two-byte load
    let prelude = [0x08, 0x34, 0x12, 0x01];
    assert!(branch_taken(&prelude, &[0x38, 0x01, 0x34, 0x12]));
    assert!(!branch_taken(&prelude, &[0x38, 0x01, 0x34, 0x00]));
    assert!(branch_taken(&prelude, &[0x3B, 0x01, 0xFF, 0x00]));
    assert!(branch_taken(&prelude, &[0x3A, 0x01, 0x00, 0x20]));
}

#[test]
fn untaken_absolute_branch_skips_both_address_bytes() {
    let code = [
        0x48, 0x01, 0x01, // V1 = 1
        0x18, 0x01, 0x02, 0x00, 0x00, 0x00, // if V1 == 2 goto 0 (two-byte constant, absolute)
        0x48, 0x07, 0x03, // V3 = 7
        0x06, 0x01,
    ];
    let (mut interp, _) = run_code(&code);
    interp.execute(Some(100)).unwrap();
    assert_eq!(interp.vm.read_variable(3), 7);
}

#[test]
fn absolute_goto_is_relative_to_code_base() {
    let code = [
        0x00, 0x06, 0x00, // goto code + 6
        0x48, 0x01, 0x01, // skipped
        0x48, 0x02, 0x02, // V2 = 2
        0x06, 0x01,
    ];
    let (mut interp, _) = run_code(&code);
    assert_eq!(interp.step(), Ok(ExecutionResult::Branched));
    assert_eq!(interp.vm.pc, CODE + 6);
    interp.execute(None).unwrap();
    assert_eq!(interp.vm.read_variable(1), 0);
    assert_eq!(interp.vm.read_variable(2), 2);
}

#[test]
fn relative_goto_can_jump_backwards() {
    let code = [
        0x20, 0x04, // goto +4 from the offset byte
        0x06, 0x01, // quit
        0x00, // padding
        0x48, 0x03, 0x04, // V4 = 3
        0x20, 0xF9, // goto -7 from the offset byte: the quit
    ];
    let (mut interp, _) = run_code(&code);
    interp.execute(Some(10)).unwrap();
    assert_eq!(interp.vm.read_variable(4), 3);
    assert!(interp.vm.game_over);
}

#[test]
fn arithmetic_names_source_then_destination() {
    let code = [
        0x48, 0x05, 0x01, // V1 = 5
        0x48, 0x07, 0x02, // V2 = 7
        0x0A, 0x01, 0x02, // V2 += V1
        0x48, 0x03, 0x03, // V3 = 3
        0x0B, 0x03, 0x02, // V2 -= V3
        0x09, 0x02, 0x04, // V4 = V2
        0x0B, 0x02, 0x05, // V5 -= V2
        0x08, 0x34, 0x12, 0x06, // V6 = 0x1234
        0x06, 0x01,
    ];
    let (mut interp, _) = run_code(&code);
    interp.execute(None).unwrap();
    assert_eq!(interp.vm.read_variable(2), 9);
    assert_eq!(interp.vm.read_variable(4), 9);
    assert_eq!(interp.vm.read_variable(5), 0u16.wrapping_sub(9));
    assert_eq!(interp.vm.read_variable(6), 0x1234);
}

#[test]
fn addition_wraps_at_sixteen_bits() {
    let code = [
        0x08, 0xFF, 0xFF, 0x01, // V1 = 0xFFFF
        0x48, 0x02, 0x02, // V2 = 2
        0x0A, 0x01, 0x02, // V2 += V1
        0x06, 0x01,
    ];
    let (mut interp, _) = run_code(&code);
    interp.execute(None).unwrap();
    assert_eq!(interp.vm.read_variable(2), 1);
}

#[test]
fn instruction_limit_stops_endless_loop() {
    let (mut interp, _) = run_code(&[0x20, 0xFF]);
    assert_eq!(interp.execute(Some(50)), Err(VmError::InstructionLimit(50)));
    assert_eq!(interp.instruction_count(), 50);
}
