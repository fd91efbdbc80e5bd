/// Driver calls: engine services selected by the byte after the opcode
use crate::error::VmError;
use crate::interpreter::{ExecutionResult, Interpreter};
use log::{debug, warn};

const DRIVER_QUIT: u8 = 1;
const DRIVER_RANDOM: u8 = 2;
const DRIVER_SAVE: u8 = 3;
const DRIVER_LOAD: u8 = 4;
const DRIVER_CLEAR_VARIABLES: u8 = 5;
const DRIVER_CLEAR_STACK: u8 = 6;

impl Interpreter {
    /// Handle the driver opcode
    pub fn execute_driver_op(&mut self) -> Result<ExecutionResult, VmError> {
        let call = self.vm.next_byte()?;
        match call {
            DRIVER_QUIT => {
                debug!("driver: quit");
                self.vm.game_over = true;
                return Ok(ExecutionResult::Quit);
            }
            DRIVER_RANDOM => {
                let r = self.rand.next();
                debug!("driver: random -> {}", r);
                self.vm.store_operand(r as u16)?;
            }
            DRIVER_SAVE => warn!("driver: save is not supported"),
            DRIVER_LOAD => warn!("driver: load is not supported"),
            DRIVER_CLEAR_VARIABLES => self.vm.clear_variables(),
            DRIVER_CLEAR_STACK => self.vm.clear_call_stack(),
            n => return Err(VmError::UnknownDriverCall(n)),
        }
        Ok(ExecutionResult::Continue)
    }
}
