/// Variable arithmetic for the game-logic interpreter
///
/// Loading constants, copying, adding and subtracting. The two-variable
/// forms name the source first and the destination second. Arithmetic
/// wraps at 16 bits.
use crate::error::VmError;
use crate::interpreter::{ExecutionResult, Interpreter};
use log::debug;

impl Interpreter {
    /// Handle variable arithmetic opcodes
    pub fn execute_math_op(&mut self, opcode: u8) -> Result<ExecutionResult, VmError> {
        match opcode & 0x1F {
            // 0x08 - load constant
            0x08 => {
                let value = self.vm.constant(opcode)?;
                let dest = self.vm.next_byte()?;
                debug!("V{} = {}", dest, value);
                self.vm.write_variable(dest, value);
            }

            // 0x09..0x0B - copy / add / subtract
            0x09..=0x0B => {
                let src = self.vm.next_byte()?;
                let dest = self.vm.next_byte()?;
                let a = self.vm.read_variable(src);
                let b = self.vm.read_variable(dest);
                let result = match opcode & 0x1F {
                    0x09 => a,
                    0x0A => b.wrapping_add(a),
                    _ => b.wrapping_sub(a),
                };
                debug!("V{} = {} (op {:02x} with V{})", dest, result, opcode, src);
                self.vm.write_variable(dest, result);
            }

            _ => {
                return Err(VmError::UnknownOpcode {
                    opcode,
                    pc: self.vm.pc - 1,
                })
            }
        }
        Ok(ExecutionResult::Continue)
    }
}
