//! Message decompression
//!
//! Messages are records of bytes where small values are characters and
//! large values name a record of the word dictionary, which is encoded the
//! same way and may refer to further dictionary records. Expansion uses an
//! explicit stack of open records so malformed data cannot exhaust the
//! native stack, while keeping the left-to-right expansion order.

use crate::error::VmError;
use crate::memory::Memory;
use log::trace;
use serde::Deserialize;

/// Values below this end a record early
const END_OF_TEXT: u8 = 3;
/// First value that refers to the word dictionary
const FIRST_WORD: u8 = 0x5E;
/// Added to a character value to give the output character code
const CHAR_BIAS: u8 = 0x1D;
/// Separator byte of the older record format
const SEPARATOR: u8 = 0x01;

/// Live expansion frames allowed before the data is declared corrupt
pub const MAX_EXPANSION_DEPTH: usize = 1024;

/// How message records are delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextFormat {
    /// Each record starts with its length; messages count from 1
    #[default]
    LengthPrefixed,
    /// Records are separated by 0x01 bytes; messages count from 0
    Separated,
}

/// Where the two record tables start in the game image
#[derive(Debug, Clone, Copy)]
pub struct TextTables {
    pub messages: usize,
    pub word_dictionary: usize,
}

/// One record being expanded
struct Frame {
    pos: usize,
    /// Payload bytes left; unused by the separated format
    remaining: usize,
}

/// Read a length prefix: zero bytes add 255 each, the first nonzero byte
/// adds itself. Returns the length and the offset after the prefix.
pub fn record_length(memory: &Memory, mut pos: usize) -> Result<(usize, usize), VmError> {
    let mut len = 0usize;
    loop {
        let b = memory
            .game_byte(pos)
            .map_err(|_| VmError::Corrupt(format!("message length runs off image at {pos:04x}")))?;
        pos += 1;
        if b != 0 {
            return Ok((len + b as usize, pos));
        }
        len += 255;
    }
}

/// Position and payload size of record `index` (1-based) of a
/// length-prefixed table
fn find_record(memory: &Memory, base: usize, index: usize) -> Result<Frame, VmError> {
    let mut pos = base;
    for _ in 1..index {
        let (len, after) = record_length(memory, pos)?;
        pos = after + len.saturating_sub(1);
    }
    let (len, after) = record_length(memory, pos)?;
    Ok(Frame {
        pos: after,
        remaining: len.saturating_sub(1),
    })
}

/// Position of record `index` (0-based) of a separated table
fn find_separated(memory: &Memory, base: usize, index: usize) -> Result<Frame, VmError> {
    let mut pos = base;
    for _ in 0..index {
        loop {
            let b = memory
                .game_byte(pos)
                .map_err(|_| VmError::Corrupt(format!("message {index} runs off image")))?;
            pos += 1;
            if b == SEPARATOR {
                break;
            }
        }
    }
    Ok(Frame { pos, remaining: 0 })
}

/// Expand message `index`, handing each output character code to `emit`
pub fn decode_message<F>(
    memory: &Memory,
    tables: TextTables,
    format: TextFormat,
    index: u16,
    mut emit: F,
) -> Result<(), VmError>
where
    F: FnMut(u8) -> Result<(), VmError>,
{
    match format {
        TextFormat::LengthPrefixed => {
            if index == 0 {
                return Ok(());
            }
            let word_base = tables
                .word_dictionary
                .checked_sub(1)
                .ok_or_else(|| VmError::Corrupt("word dictionary at offset 0".to_string()))?;
            let first = find_record(memory, tables.messages, index as usize)?;
            expand_prefixed(memory, word_base, first, &mut emit)
        }
        TextFormat::Separated => {
            let first = find_separated(memory, tables.messages, index as usize)?;
            expand_separated(memory, tables.word_dictionary, first, &mut emit)
        }
    }
}

fn push_frame(stack: &mut Vec<Frame>, frame: Frame) -> Result<(), VmError> {
    if stack.len() >= MAX_EXPANSION_DEPTH {
        return Err(VmError::Corrupt(
            "word dictionary nesting too deep".to_string(),
        ));
    }
    stack.push(frame);
    Ok(())
}

fn expand_prefixed<F>(
    memory: &Memory,
    word_base: usize,
    first: Frame,
    emit: &mut F,
) -> Result<(), VmError>
where
    F: FnMut(u8) -> Result<(), VmError>,
{
    let mut stack = vec![first];
    while let Some(frame) = stack.last_mut() {
        if frame.remaining == 0 {
            stack.pop();
            continue;
        }
        let d = memory.game_byte(frame.pos)?;
        frame.pos += 1;
        frame.remaining -= 1;
        if d < END_OF_TEXT {
            stack.pop();
        } else if d < FIRST_WORD {
            emit(d + CHAR_BIAS)?;
        } else {
            let n = (d - FIRST_WORD + 1) as usize;
            trace!("expand word {}", n);
            let word = find_record(memory, word_base, n)?;
            push_frame(&mut stack, word)?;
        }
    }
    Ok(())
}

fn expand_separated<F>(
    memory: &Memory,
    word_base: usize,
    first: Frame,
    emit: &mut F,
) -> Result<(), VmError>
where
    F: FnMut(u8) -> Result<(), VmError>,
{
    let mut stack = vec![first];
    while let Some(frame) = stack.last_mut() {
        let d = memory.game_byte(frame.pos)?;
        frame.pos += 1;
        if d < END_OF_TEXT {
            stack.pop();
        } else if d < FIRST_WORD {
            emit(d + CHAR_BIAS)?;
        } else {
            let n = (d - FIRST_WORD) as usize;
            trace!("expand word {}", n);
            let word = find_separated(memory, word_base, n)?;
            push_frame(&mut stack, word)?;
        }
    }
    Ok(())
}

/// Expand a message into a byte string of output character codes
pub fn message_codes(
    memory: &Memory,
    tables: TextTables,
    format: TextFormat,
    index: u16,
) -> Result<Vec<u8>, VmError> {
    let mut out = Vec::new();
    decode_message(memory, tables, format, index, |c| {
        out.push(c);
        Ok(())
    })?;
    Ok(out)
}
