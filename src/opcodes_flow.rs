/// Control flow operations for the game-logic interpreter
///
/// This module handles every opcode that moves the program counter:
/// - Jumps, calls and returns
/// - The two-level jump table
/// - Conditional branches comparing two variables, or a variable with a
///   constant
///
/// A branch that is not taken still has to step over its address operand.
use crate::error::VmError;
use crate::interpreter::{ExecutionResult, Interpreter};
use log::debug;

impl Interpreter {
    /// Handle control flow opcodes
    pub fn execute_flow_op(&mut self, opcode: u8) -> Result<ExecutionResult, VmError> {
        match opcode & 0x1F {
            // 0x00 - goto
            0x00 => {
                self.vm.pc = self.vm.address(opcode)?;
                Ok(ExecutionResult::Branched)
            }

            // 0x01 - gosub
            0x01 => {
                let target = self.vm.address(opcode)?;
                self.vm.push_return()?;
                debug!("gosub {:04x}, depth {}", target, self.vm.call_stack.len());
                self.vm.pc = target;
                Ok(ExecutionResult::Called)
            }

            // 0x02 - return
            0x02 => {
                self.vm.pop_return()?;
                debug!("return to {:04x}", self.vm.pc);
                Ok(ExecutionResult::Returned)
            }

            // 0x0E - jump table: base + 2 * variable holds the target
            0x0E => {
                let base = self.vm.code_base + self.vm.next_word()? as usize;
                let index = self.vm.operand_variable()? as usize;
                let entry = base + 2 * index;
                let target = self.vm.memory.game_word(entry).map_err(|_| {
                    VmError::Corrupt(format!("jump table entry {entry:04x} outside image"))
                })?;
                self.vm.pc = self.vm.code_base + target as usize;
                debug!("jump table {:04x}[{}] -> {:04x}", base, index, self.vm.pc);
                Ok(ExecutionResult::Branched)
            }

            // 0x10..0x13 - compare two variables
            0x10..=0x13 => {
                let a = self.vm.operand_variable()?;
                let b = self.vm.operand_variable()?;
                let taken = match opcode & 0x1F {
                    0x10 => a == b,
                    0x11 => a != b,
                    0x12 => a < b,
                    _ => a > b,
                };
                self.branch(opcode, taken)
            }

            // 0x18..0x1B - compare a variable with a constant
            0x18..=0x1B => {
                let a = self.vm.operand_variable()?;
                let b = self.vm.constant(opcode)?;
                let taken = match opcode & 0x1F {
                    0x18 => a == b,
                    0x19 => a != b,
                    0x1A => a < b,
                    _ => a > b,
                };
                self.branch(opcode, taken)
            }

            _ => Err(VmError::UnknownOpcode {
                opcode,
                pc: self.vm.pc - 1,
            }),
        }
    }

    fn branch(&mut self, opcode: u8, taken: bool) -> Result<ExecutionResult, VmError> {
        if taken {
            self.vm.pc = self.vm.address(opcode)?;
            Ok(ExecutionResult::Branched)
        } else {
            self.vm.skip_address(opcode);
            Ok(ExecutionResult::Continue)
        }
    }
}
