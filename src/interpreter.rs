use crate::display_trait::GameDisplay;
use crate::error::VmError;
use crate::input::LineSource;
use crate::random::GameRand;
use crate::text::{self, TextFormat, TextTables};
use crate::vm::VM;
use log::{debug, info};

/// Result of executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Continue execution normally
    Continue,
    /// Branch or jump taken, PC already updated
    Branched,
    /// Subroutine called, PC updated
    Called,
    /// Subroutine returned
    Returned,
    /// Game should quit
    Quit,
}

/// The game-logic interpreter: VM state plus its I/O collaborators
pub struct Interpreter {
    /// The VM state
    pub vm: VM,
    /// Text output
    pub(crate) display: Box<dyn GameDisplay>,
    /// Command input
    pub(crate) input: Box<dyn LineSource>,
    /// Driver random number generator
    pub rand: GameRand,
    /// Record format of the message tables
    pub text_format: TextFormat,
    /// Codes of the first words of the last command
    pub(crate) word_codes: [u8; 3],
    /// Instruction count for debugging
    instruction_count: u64,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new(vm: VM, display: Box<dyn GameDisplay>, input: Box<dyn LineSource>) -> Self {
        Interpreter {
            vm,
            display,
            input,
            rand: GameRand::from_clock(),
            text_format: TextFormat::default(),
            word_codes: [0; 3],
            instruction_count: 0,
        }
    }

    pub fn with_rand(mut self, rand: GameRand) -> Self {
        self.rand = rand;
        self
    }

    pub fn with_text_format(mut self, format: TextFormat) -> Self {
        self.text_format = format;
        self
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Run the game: print the opening message, then execute until quit
    pub fn run(&mut self) -> Result<(), VmError> {
        self.run_with_limit(None)
    }

    /// Run the interpreter with an optional instruction limit
    pub fn run_with_limit(&mut self, limit: Option<u64>) -> Result<(), VmError> {
        info!("Beginning execution PC = {:04x}", self.vm.pc);
        self.print_message(1)?;
        self.execute(limit)?;
        self.display.flush()?;
        Ok(())
    }

    /// Execute until the quit driver call
    pub fn execute(&mut self, limit: Option<u64>) -> Result<(), VmError> {
        while !self.vm.game_over {
            if let Some(max) = limit {
                if self.instruction_count >= max {
                    return Err(VmError::InstructionLimit(max));
                }
            }
            self.step()?;
        }
        debug!("game over after {} instructions", self.instruction_count);
        Ok(())
    }

    /// Fetch, decode and execute one instruction
    pub fn step(&mut self) -> Result<ExecutionResult, VmError> {
        let pc = self.vm.pc;
        let opcode = self.vm.next_byte()?;
        self.instruction_count += 1;
        debug!("{:04x}: op {:02x}", pc, opcode);

        if opcode & 0x80 != 0 {
            return self.execute_list_op(opcode);
        }

        match opcode & 0x1F {
            0x00 | 0x01 | 0x02 | 0x0E | 0x10..=0x13 | 0x18..=0x1B => self.execute_flow_op(opcode),
            0x03 | 0x04 | 0x05 | 0x07 | 0x15 | 0x16 => self.execute_io_op(opcode),
            0x06 => self.execute_driver_op(),
            0x08..=0x0B => self.execute_math_op(opcode),
            0x0F => self.execute_exit_op(),
            0x14 => Err(VmError::Unsupported("graphics mode")),
            0x17 => Err(VmError::Unsupported("get next object")),
            0x1C => Err(VmError::Unsupported("print input")),
            _ => Err(VmError::UnknownOpcode { opcode, pc }),
        }
    }

    /// Expand a message through the display
    pub fn print_message(&mut self, index: u16) -> Result<(), VmError> {
        let tables = TextTables {
            messages: self.vm.messages,
            word_dictionary: self.vm.word_dictionary,
        };
        let display = &mut self.display;
        text::decode_message(&self.vm.memory, tables, self.text_format, index, |c| {
            display.print_code(c).map_err(VmError::from)
        })
    }
}
