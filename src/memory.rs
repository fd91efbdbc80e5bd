//! Region-tagged memory
//!
//! The interpreter works on two buffers: the loaded game image and a small
//! private scratch area ("lists"). Tables may live in either, so every
//! offset travels with the tag of the buffer it belongs to and all access
//! goes through the bounds-checked accessors here.

use crate::error::VmError;
use std::fmt;

/// Size of the scratch list area
pub const LIST_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Game,
    Lists,
}

/// An offset tagged with the buffer it indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub region: Region,
    pub offset: usize,
}

impl Address {
    pub fn game(offset: usize) -> Self {
        Address {
            region: Region::Game,
            offset,
        }
    }

    pub fn lists(offset: usize) -> Self {
        Address {
            region: Region::Lists,
            offset,
        }
    }

    /// Same region, offset moved forward
    pub fn add(self, delta: usize) -> Self {
        Address {
            region: self.region,
            offset: self.offset + delta,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Region::Game => write!(f, "game:{:04x}", self.offset),
            Region::Lists => write!(f, "lists:{:04x}", self.offset),
        }
    }
}

pub struct Memory {
    game: Vec<u8>,
    lists: Vec<u8>,
}

impl Memory {
    pub fn new(game: Vec<u8>) -> Self {
        Memory {
            game,
            lists: vec![0; LIST_SIZE],
        }
    }

    fn region(&self, region: Region) -> &[u8] {
        match region {
            Region::Game => &self.game,
            Region::Lists => &self.lists,
        }
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.offset < self.region(addr.region).len()
    }

    pub fn read(&self, addr: Address) -> Option<u8> {
        self.region(addr.region).get(addr.offset).copied()
    }

    /// Write one byte; returns false (and changes nothing) when out of range
    pub fn write(&mut self, addr: Address, value: u8) -> bool {
        let buf = match addr.region {
            Region::Game => &mut self.game,
            Region::Lists => &mut self.lists,
        };
        match buf.get_mut(addr.offset) {
            Some(b) => {
                *b = value;
                true
            }
            None => false,
        }
    }

    /// Read a byte of the game image, failing hard when outside it
    pub fn game_byte(&self, offset: usize) -> Result<u8, VmError> {
        self.game
            .get(offset)
            .copied()
            .ok_or(VmError::PcOutOfRange(offset))
    }

    /// Little-endian 16-bit value from the game image
    pub fn game_word(&self, offset: usize) -> Result<u16, VmError> {
        let lo = self.game_byte(offset)? as u16;
        let hi = self.game_byte(offset + 1)? as u16;
        Ok(lo | (hi << 8))
    }

    pub fn list_bytes(&self) -> &[u8] {
        &self.lists
    }
}
