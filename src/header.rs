use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::memory::Address;

/// Number of table pointers stored in the header
pub const HEADER_TABLES: usize = 12;

/// Table pointers below this index may point into the scratch lists
const CODE_TABLE: usize = 11;

/// Size of the header in bytes
pub const HEADER_SIZE: usize = 4 + HEADER_TABLES * 2;

pub struct Header {
    pub messages: u16,
    pub word_dictionary: u16,
    pub tables: [u16; HEADER_TABLES],
}

pub fn get_word(bytes: &[u8], offset: usize) -> u16 {
    (bytes[offset] as u16) | ((bytes[offset + 1] as u16) << 8)
}

impl Header {
    /// Parse the header. The caller guarantees at least `HEADER_SIZE` bytes.
    pub fn new(bytes: &[u8]) -> Header {
        let mut tables = [0u16; HEADER_TABLES];
        for (i, t) in tables.iter_mut().enumerate() {
            *t = get_word(bytes, 4 + i * 2);
        }
        Header {
            messages: get_word(bytes, 0),
            word_dictionary: get_word(bytes, 2),
            tables,
        }
    }

    /// Resolve a table pointer to a tagged address
    pub fn table_address(&self, index: usize) -> Address {
        let v = self.tables[index];
        if index != CODE_TABLE && v & 0x8000 != 0 {
            Address::lists((v & 0x7FFF) as usize)
        } else {
            Address::game(v as usize)
        }
    }

    pub fn initial_pc(&self) -> usize {
        self.tables[CODE_TABLE] as usize
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        writeln!(f, "Messages at:          {:#06x}", self.messages)?;
        writeln!(f, "Word dictionary at:   {:#06x}", self.word_dictionary)?;
        for i in 0..HEADER_TABLES {
            writeln!(f, "Table {:2} at:          {}", i, self.table_address(i))?;
        }
        Ok(())
    }
}
