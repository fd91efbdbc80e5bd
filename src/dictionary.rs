//! Input tokenizer and dictionary matcher
//!
//! Dictionary entries are runs of 7-bit characters with the high bit set
//! on the last one, followed by a code byte. The first entry is always
//! compared; after it, the table ends at an entry whose first byte has the
//! high bit set.

use crate::memory::{Address, Memory};
use log::debug;

/// Code given to words the dictionary does not know
pub const NO_MATCH: u8 = 0xFF;

/// Words whose codes are kept; further words are only counted
pub const MAX_WORDS: usize = 3;

/// Result of tokenizing one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub codes: Vec<u8>,
    pub count: usize,
}

/// Compare one token (already uppercase) against the entry at `entry`.
/// Returns the entry's code on a full match, and the offset of the next
/// entry either way.
fn compare_entry(memory: &Memory, entry: Address, token: &[u8]) -> (Option<u8>, Option<Address>) {
    let mut pos = entry;
    let mut matched = true;
    let mut i = 0;
    loop {
        let c = match memory.read(pos) {
            Some(c) => c,
            None => return (None, None),
        };
        pos = pos.add(1);
        if token.get(i) != Some(&(c & 0x7F).to_ascii_uppercase()) {
            matched = false;
        }
        i += 1;
        if c & 0x80 != 0 {
            break;
        }
    }
    if i != token.len() {
        matched = false;
    }
    let code = memory.read(pos);
    let next = code.map(|_| pos.add(1));
    (if matched { code } else { None }, next)
}

/// Look a single word up in the dictionary
pub fn match_word(memory: &Memory, dictionary: Address, word: &str) -> u8 {
    let token: Vec<u8> = word.bytes().map(|b| b.to_ascii_uppercase()).collect();
    let mut entry = dictionary;
    loop {
        match compare_entry(memory, entry, &token) {
            (Some(code), _) => return code,
            (None, Some(next)) => entry = next,
            (None, None) => return NO_MATCH,
        }
        match memory.read(entry) {
            Some(first) if first & 0x80 == 0 => {}
            _ => return NO_MATCH,
        }
    }
}

/// Split a line on whitespace and look up the first `MAX_WORDS` words
pub fn tokenize(memory: &Memory, dictionary: Address, line: &str) -> ParsedInput {
    let mut codes = Vec::with_capacity(MAX_WORDS);
    let mut count = 0;
    for word in line.split_whitespace() {
        count += 1;
        if codes.len() < MAX_WORDS {
            let code = match_word(memory, dictionary, word);
            debug!("word '{}' -> {:02x}", word, code);
            codes.push(code);
        }
    }
    ParsedInput { codes, count }
}
