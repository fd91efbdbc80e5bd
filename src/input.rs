//! Line input - the only point where the game waits on the outside world

use crate::error::VmError;
use log::debug;
use std::collections::VecDeque;
use std::io::{self, BufRead};

pub trait LineSource {
    /// Read one line without its terminator. End of input is an error.
    fn read_line(&mut self) -> Result<String, VmError>;
}

/// Reads one command line from `reader`. Bytes that are not valid UTF-8
/// are replaced rather than rejected; only end of input is an error.
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<String, VmError> {
    let mut bytes = Vec::new();
    let bytes_read = reader.read_until(b'\n', &mut bytes).map_err(|e| {
        log::error!("Failed to read line: {e}");
        VmError::InputExhausted
    })?;

    // Without this a closed pipe would feed empty commands forever
    if bytes_read == 0 {
        debug!("input: EOF detected");
        return Err(VmError::InputExhausted);
    }

    if bytes.ends_with(b"\n") {
        bytes.pop();
        if bytes.ends_with(b"\r") {
            bytes.pop();
        }
    }

    let line = String::from_utf8_lossy(&bytes).into_owned();
    debug!("input received: '{}'", line);
    Ok(line)
}

/// Reads commands from stdin
#[derive(Debug, Default)]
pub struct StdinInput;

impl StdinInput {
    pub fn new() -> Self {
        StdinInput
    }
}

impl LineSource for StdinInput {
    fn read_line(&mut self) -> Result<String, VmError> {
        read_command(&mut io::stdin().lock())
    }
}

/// Feeds a fixed list of commands, then reports end of input
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self) -> Result<String, VmError> {
        self.lines.pop_front().ok_or(VmError::InputExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_log::test;

    #[test]
    fn invalid_utf8_line_is_kept_lossily() {
        let mut reader = Cursor::new(b"nor\xffth\nquit\n".to_vec());
        assert_eq!(read_command(&mut reader).unwrap(), "nor\u{FFFD}th");
        assert_eq!(read_command(&mut reader).unwrap(), "quit");
        assert_eq!(read_command(&mut reader), Err(VmError::InputExhausted));
    }

    #[test]
    fn line_endings_are_stripped() {
        let mut reader = Cursor::new(b"take lamp\r\n\nlast".to_vec());
        assert_eq!(read_command(&mut reader).unwrap(), "take lamp");
        assert_eq!(read_command(&mut reader).unwrap(), "");
        assert_eq!(read_command(&mut reader).unwrap(), "last");
        assert_eq!(read_command(&mut reader), Err(VmError::InputExhausted));
    }

    #[test]
    fn scripted_input_runs_out() {
        let mut input = ScriptedInput::new(["look"]);
        assert_eq!(input.read_line().unwrap(), "look");
        assert_eq!(input.read_line(), Err(VmError::InputExhausted));
    }
}
