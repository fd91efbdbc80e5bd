use crate::error::VmError;
use crate::header::{Header, HEADER_SIZE, HEADER_TABLES};
use crate::memory::{Address, Memory};
use log::{debug, info};

/// Maximum size of a game image; anything beyond is ignored
pub const MAX_GAME_SIZE: usize = 27000;

/// Smallest file accepted as a game image
pub const MIN_GAME_SIZE: usize = 1024;

/// Maximum depth of the call stack
const STACK_SIZE: usize = 256;

/// Number of addressable table slots
pub const TABLE_SLOTS: usize = 16;

/// Number of variables
pub const NUM_VARIABLES: usize = 256;

/// Represents a loaded game with owned memory
pub struct Game {
    /// The raw game memory
    pub memory: Vec<u8>,
    /// The parsed header
    pub header: Header,
}

impl Game {
    /// Create a new game from memory bytes
    pub fn from_memory(mut memory: Vec<u8>) -> Result<Self, VmError> {
        if memory.len() < MIN_GAME_SIZE {
            return Err(VmError::Load(format!(
                "not a valid game ({} bytes, need at least {})",
                memory.len(),
                MIN_GAME_SIZE
            )));
        }
        if memory.len() > MAX_GAME_SIZE {
            log::warn!(
                "game image is {} bytes, only the first {} are loaded",
                memory.len(),
                MAX_GAME_SIZE
            );
            memory.truncate(MAX_GAME_SIZE);
        }
        debug_assert!(memory.len() >= HEADER_SIZE);
        let header = Header::new(&memory);

        let code = header.initial_pc();
        if code >= memory.len() {
            return Err(VmError::Load(format!(
                "initial program counter 0x{code:04x} lies outside the image"
            )));
        }

        Ok(Game { memory, header })
    }
}

/// The game-logic machine state
pub struct VM {
    /// Game image plus scratch lists
    pub memory: Memory,
    /// Program counter, an offset into the game image
    pub pc: usize,
    /// Offset of the code area; absolute addresses are relative to it
    pub code_base: usize,
    /// Saved return offsets, relative to `code_base`
    pub call_stack: Vec<u16>,
    pub variables: [u16; NUM_VARIABLES],
    /// Table bases, each tagged with its owning region
    pub tables: [Option<Address>; TABLE_SLOTS],
    /// Start of the message records
    pub messages: usize,
    /// Start of the word dictionary used by decompression
    pub word_dictionary: usize,
    /// Set by the quit driver call
    pub game_over: bool,
    /// Count of list accesses that fell outside their region
    pub list_faults: u32,
}

impl VM {
    /// Create a new VM instance with the given game
    pub fn new(game: Game) -> Self {
        let header = game.header;
        let mut tables = [None; TABLE_SLOTS];
        for (i, slot) in tables.iter_mut().take(HEADER_TABLES).enumerate() {
            *slot = Some(header.table_address(i));
        }
        let code_base = header.initial_pc();

        info!("Messages at {:04x}", header.messages);
        info!("Word dictionary at {:04x}", header.word_dictionary);
        for (i, t) in tables.iter().take(HEADER_TABLES).enumerate() {
            if let Some(addr) = t {
                debug!("Table {} at {}", i, addr);
            }
        }

        VM {
            memory: Memory::new(game.memory),
            pc: code_base,
            code_base,
            call_stack: Vec::with_capacity(STACK_SIZE),
            variables: [0; NUM_VARIABLES],
            tables,
            messages: header.messages as usize,
            word_dictionary: header.word_dictionary as usize,
            game_over: false,
            list_faults: 0,
        }
    }

    /// Exit map lives in table 0
    pub fn exit_map(&self) -> Address {
        self.tables[0].unwrap_or(Address::game(0))
    }

    /// Input dictionary lives in table 1
    pub fn dictionary(&self) -> Address {
        self.tables[1].unwrap_or(Address::game(0))
    }

    /// Fetch the byte at PC and advance
    pub fn next_byte(&mut self) -> Result<u8, VmError> {
        let b = self.memory.game_byte(self.pc)?;
        self.pc += 1;
        Ok(b)
    }

    /// Fetch a little-endian word at PC and advance
    pub fn next_word(&mut self) -> Result<u16, VmError> {
        let w = self.memory.game_word(self.pc)?;
        self.pc += 2;
        Ok(w)
    }

    /// Constant operand: one byte when opcode bit 6 is set, else two
    pub fn constant(&mut self, opcode: u8) -> Result<u16, VmError> {
        if opcode & 0x40 != 0 {
            Ok(self.next_byte()? as u16)
        } else {
            self.next_word()
        }
    }

    /// Address operand: signed byte relative to itself when opcode bit 5 is
    /// set, else a 16-bit offset from the code base
    pub fn address(&mut self, opcode: u8) -> Result<usize, VmError> {
        if opcode & 0x20 != 0 {
            let at = self.pc;
            let offset = self.next_byte()? as i8;
            let target = at as isize + offset as isize;
            if target < 0 {
                return Err(VmError::PcOutOfRange(at));
            }
            Ok(target as usize)
        } else {
            let w = self.next_word()?;
            Ok(self.code_base + w as usize)
        }
    }

    /// Step over an address operand without using it
    pub fn skip_address(&mut self, opcode: u8) {
        if opcode & 0x20 == 0 {
            self.pc += 1;
        }
        self.pc += 1;
    }

    pub fn read_variable(&self, index: u8) -> u16 {
        self.variables[index as usize]
    }

    pub fn write_variable(&mut self, index: u8, value: u16) {
        self.variables[index as usize] = value;
    }

    /// Read a variable named by the next operand byte
    pub fn operand_variable(&mut self) -> Result<u16, VmError> {
        let v = self.next_byte()?;
        Ok(self.read_variable(v))
    }

    /// Store into the variable named by the next operand byte
    pub fn store_operand(&mut self, value: u16) -> Result<(), VmError> {
        let v = self.next_byte()?;
        self.write_variable(v, value);
        Ok(())
    }

    /// Push the current PC as a return offset
    pub fn push_return(&mut self) -> Result<(), VmError> {
        if self.call_stack.len() >= STACK_SIZE {
            return Err(VmError::StackOverflow);
        }
        let offset = self.pc.wrapping_sub(self.code_base) as u16;
        self.call_stack.push(offset);
        Ok(())
    }

    /// Pop a return offset back into PC
    pub fn pop_return(&mut self) -> Result<(), VmError> {
        let offset = self.call_stack.pop().ok_or(VmError::StackUnderflow)?;
        self.pc = self.code_base + offset as usize;
        Ok(())
    }

    pub fn clear_variables(&mut self) {
        self.variables = [0; NUM_VARIABLES];
    }

    pub fn clear_call_stack(&mut self) {
        self.call_stack.clear();
    }
}
