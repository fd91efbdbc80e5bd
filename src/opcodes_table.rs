/// World table operations: list reads/writes and exit lookup
///
/// List opcodes have the high bit set. The low five bits pick the table
/// slot (plus one), bit 5 takes the index from a variable instead of a
/// literal byte, and bit 6 turns the read into a write. An index that lands
/// outside the table's region is reported and the access skipped.
use crate::error::VmError;
use crate::exits;
use crate::interpreter::{ExecutionResult, Interpreter};
use log::{debug, warn};

impl Interpreter {
    /// Handle a list opcode
    pub fn execute_list_op(&mut self, opcode: u8) -> Result<ExecutionResult, VmError> {
        let slot = (opcode & 0x1F) + 1;
        let base = self
            .vm
            .tables
            .get(slot as usize)
            .copied()
            .flatten()
            .ok_or(VmError::BadList(slot))?;

        let index = if opcode & 0x20 != 0 {
            self.vm.operand_variable()? as usize
        } else {
            self.vm.next_byte()? as usize
        };
        let addr = base.add(index);
        let var = self.vm.next_byte()?;

        if !self.vm.memory.contains(addr) {
            self.vm.list_faults += 1;
            warn!("LISTFAULT list {} index {} -> {}", slot, index, addr);
            return Ok(ExecutionResult::Continue);
        }

        if opcode & 0x40 == 0 {
            let value = self.vm.memory.read(addr).unwrap_or(0);
            debug!("L{} [{}] read {}", slot, index, value);
            self.vm.write_variable(var, value as u16);
        } else {
            let value = self.vm.read_variable(var);
            debug!("L{} [{}] assign {}", slot, index, value);
            self.vm.memory.write(addr, value as u8);
        }
        Ok(ExecutionResult::Continue)
    }

    /// Handle the exit lookup opcode: two input variables (location,
    /// direction) then two output variables (flags, target)
    pub fn execute_exit_op(&mut self) -> Result<ExecutionResult, VmError> {
        let location = self.vm.operand_variable()? as u8;
        let direction = self.vm.operand_variable()? as u8;
        let exit = exits::lookup_exit(&self.vm.memory, self.vm.exit_map(), location, direction);
        self.vm.store_operand(exit.flags as u16)?;
        self.vm.store_operand(exit.target as u16)?;
        Ok(ExecutionResult::Continue)
    }
}
