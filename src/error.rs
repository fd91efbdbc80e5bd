//! Fatal error taxonomy shared by both engines
//!
//! Anything that reaches a `VmError` stops the run. List addressing faults
//! and off-canvas plots are deliberately absent: those are reported (or
//! clipped) by the engine and execution carries on.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Game or picture file missing, unreadable or too small
    Load(String),
    /// Program counter (or an operand fetch) left the game image
    PcOutOfRange(usize),
    /// Call stack already holds its maximum number of return offsets
    StackOverflow,
    /// Return executed with nothing on the call stack
    StackUnderflow,
    /// Primary opcode with no defined behaviour
    UnknownOpcode { opcode: u8, pc: usize },
    /// Driver call with an unknown sub-function byte
    UnknownDriverCall(u8),
    /// Opcode reserved for features this engine does not provide
    Unsupported(&'static str),
    /// List operation naming a table slot that was never set up
    BadList(u8),
    /// Data structure in the image is malformed
    Corrupt(String),
    /// Input stream ended while the game waited for a command
    InputExhausted,
    /// The output collaborator failed
    Output(String),
    /// Extended graphics opcode outside the defined driver group
    IllegalGraphicsOpcode(u8),
    /// Subpicture calls nested deeper than the graphics stacks allow
    GraphicsStackOverflow,
    /// Configured cap on executed opcodes was reached
    InstructionLimit(u64),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::Load(msg) => write!(f, "load error: {msg}"),
            VmError::PcOutOfRange(pc) => write!(f, "program counter out of range: 0x{pc:04x}"),
            VmError::StackOverflow => write!(f, "stack overflow"),
            VmError::StackUnderflow => write!(f, "stack underflow"),
            VmError::UnknownOpcode { opcode, pc } => {
                write!(f, "bad op 0x{opcode:02x} at 0x{pc:04x}")
            }
            VmError::UnknownDriverCall(n) => write!(f, "unknown driver function {n}"),
            VmError::Unsupported(what) => write!(f, "unsupported opcode: {what}"),
            VmError::BadList(slot) => write!(f, "bad list {slot}"),
            VmError::Corrupt(msg) => write!(f, "corrupt game data: {msg}"),
            VmError::InputExhausted => write!(f, "end of input"),
            VmError::Output(msg) => write!(f, "output error: {msg}"),
            VmError::IllegalGraphicsOpcode(op) => {
                write!(f, "illegal graphics opcode 0x{op:02x}")
            }
            VmError::GraphicsStackOverflow => write!(f, "graphics stack overflow"),
            VmError::InstructionLimit(n) => write!(f, "instruction limit of {n} reached"),
        }
    }
}

impl std::error::Error for VmError {}
