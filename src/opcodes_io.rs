/// Text input and output operations
///
/// Printing numbers and messages, reading a command line, and the two
/// screen opcodes whose operand is read but otherwise ignored.
use crate::dictionary;
use crate::error::VmError;
use crate::interpreter::{ExecutionResult, Interpreter};
use log::debug;

impl Interpreter {
    /// Handle I/O opcodes
    pub fn execute_io_op(&mut self, opcode: u8) -> Result<ExecutionResult, VmError> {
        match opcode & 0x1F {
            // 0x03 - print number held in a variable
            0x03 => {
                let n = self.vm.operand_variable()?;
                self.display.print_number(n)?;
            }

            // 0x04 - print message named by a variable
            0x04 => {
                let m = self.vm.operand_variable()?;
                self.print_message(m)?;
            }

            // 0x05 - print message named by a constant
            0x05 => {
                let m = self.vm.constant(opcode)?;
                self.print_message(m)?;
            }

            // 0x07 - read a command
            0x07 => self.read_input()?,

            // 0x15 - clear screen; operand selects the screen
            0x15 => {
                let screen = self.vm.next_byte()?;
                debug!("clear screen {} ignored", screen);
            }

            // 0x16 - show picture
            0x16 => {
                let picture = self.vm.next_byte()?;
                debug!("picture {} ignored", picture);
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

    /// Read a line, match its words and store three codes plus the word
    /// count into the four variables named by the operands
    fn read_input(&mut self) -> Result<(), VmError> {
        self.display.flush()?;
        let line = self.input.read_line()?;
        let parsed = dictionary::tokenize(&self.vm.memory, self.vm.dictionary(), &line);
        for (slot, code) in self.word_codes.iter_mut().zip(parsed.codes.iter()) {
            *slot = *code;
        }
        debug!("input '{}' -> {:?} ({} words)", line, parsed.codes, parsed.count);

        let codes = self.word_codes;
        for code in codes {
            self.vm.store_operand(code as u16)?;
        }
        self.vm.store_operand(parsed.count.min(u16::MAX as usize) as u16)?;
        Ok(())
    }
}
