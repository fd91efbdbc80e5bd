//! Plain stdout display with word wrapping

use crate::display_trait::{translate_code, DisplayError, GameDisplay};
use std::io::{self, Write};

pub struct TerminalDisplay {
    /// Wrap column; 0 turns wrapping off
    width: usize,
    column: usize,
    /// Word being assembled, printed once its end is known
    word: String,
}

impl TerminalDisplay {
    pub fn new(width: usize) -> Self {
        TerminalDisplay {
            width,
            column: 0,
            word: String::new(),
        }
    }

    fn emit_word(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.word.is_empty() {
            return Ok(());
        }
        let len = self.word.chars().count();
        if self.width > 0 && self.column > 0 && self.column + len > self.width {
            writeln!(out)?;
            self.column = 0;
        }
        write!(out, "{}", self.word)?;
        self.column += len;
        self.word.clear();
        Ok(())
    }

    fn put(&mut self, ch: char) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match ch {
            '\n' => {
                self.emit_word(&mut out)?;
                writeln!(out)?;
                self.column = 0;
            }
            ' ' => {
                self.emit_word(&mut out)?;
                if self.width == 0 || self.column < self.width {
                    write!(out, " ")?;
                    self.column += 1;
                }
            }
            c => self.word.push(c),
        }
        Ok(())
    }
}

impl GameDisplay for TerminalDisplay {
    fn print_code(&mut self, code: u8) -> Result<(), DisplayError> {
        self.put(translate_code(code))
            .map_err(|e| DisplayError::new(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.emit_word(&mut out)
            .and_then(|_| out.flush())
            .map_err(|e| DisplayError::new(e.to_string()))
    }
}
