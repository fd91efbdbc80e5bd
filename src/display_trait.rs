//! Text output seam between the interpreter and whatever shows the text
//!
//! The interpreter hands over raw character codes from decompression. Turning
//! the two control codes into layout is the display's job.

use crate::error::VmError;
use std::fmt;

/// Character code that starts a new line
pub const CODE_NEWLINE: u8 = 0x25;
/// Character code that prints as a space
pub const CODE_SPACE: u8 = 0x5F;

/// Map a character code to the character it stands for
pub fn translate_code(code: u8) -> char {
    match code {
        CODE_NEWLINE => '\n',
        CODE_SPACE => ' ',
        c => c as char,
    }
}

/// Core trait for game text output
pub trait GameDisplay {
    /// Print one character code from a message
    fn print_code(&mut self, code: u8) -> Result<(), DisplayError>;

    /// Print a number in decimal
    fn print_number(&mut self, n: u16) -> Result<(), DisplayError> {
        for b in n.to_string().bytes() {
            self.print_code(b)?;
        }
        Ok(())
    }

    /// Push pending output out before the game waits for input
    fn flush(&mut self) -> Result<(), DisplayError>;
}

/// Display error type
#[derive(Debug, Clone)]
pub struct DisplayError {
    pub message: String,
}

impl DisplayError {
    pub fn new(message: impl Into<String>) -> Self {
        DisplayError {
            message: message.into(),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Display error: {}", self.message)
    }
}

impl std::error::Error for DisplayError {}

impl From<DisplayError> for VmError {
    fn from(e: DisplayError) -> Self {
        VmError::Output(e.message)
    }
}
