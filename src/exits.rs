//! Exit resolution
//!
//! The exit map holds, for each location from 1 upwards, a list of two-byte
//! entries `[last:1][bidirectional:1][flags:2][direction:4] [target]`.
//! Exits marked bidirectional are also usable backwards from their target,
//! which is found by a second scan over the whole map.

use crate::memory::{Address, Memory};
use log::debug;

/// Directions above this have no reverse
const MAX_REVERSIBLE: u8 = 12;

/// Reverse direction for each direction, with the bidirectional bit set
const REVERSE: [u8; 13] = [
    0x10, 0x14, 0x16, 0x17, 0x11, 0x18, 0x12, 0x13, 0x15, 0x1a, 0x19, 0x1c, 0x1b,
];

const LAST_ENTRY: u8 = 0x80;

/// Flags and destination of an exit; (0, 0) when there is none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exit {
    pub flags: u8,
    pub target: u8,
}

fn entry(memory: &Memory, at: Address) -> Option<(u8, u8)> {
    Some((memory.read(at)?, memory.read(at.add(1))?))
}

/// Find the exit leading `direction` from `location`
pub fn lookup_exit(memory: &Memory, map: Address, location: u8, direction: u8) -> Exit {
    if let Some(exit) = forward_exit(memory, map, location, direction) {
        debug!("exit {} from {} -> {:?}", direction, location, exit);
        return exit;
    }
    if direction <= MAX_REVERSIBLE {
        if let Some(exit) = reverse_exit(memory, map, location, REVERSE[direction as usize]) {
            debug!("back exit {} from {} -> {:?}", direction, location, exit);
            return exit;
        }
    }
    Exit::default()
}

/// Scan the location's own list
fn forward_exit(memory: &Memory, map: Address, location: u8, direction: u8) -> Option<Exit> {
    if location == 0 {
        return None;
    }
    let mut p = map;
    for _ in 1..location {
        loop {
            let (v, _) = entry(memory, p)?;
            p = p.add(2);
            if v & LAST_ENTRY != 0 {
                break;
            }
        }
    }
    loop {
        let (v, target) = entry(memory, p)?;
        if v & 0x0F == direction {
            return Some(Exit {
                flags: (v >> 4) & 7,
                target,
            });
        }
        p = p.add(2);
        if v & LAST_ENTRY != 0 {
            return None;
        }
    }
}

/// Look for any location with a bidirectional exit into `location` in the
/// reverse direction. Returns that location as the target.
fn reverse_exit(memory: &Memory, map: Address, location: u8, reversed: u8) -> Option<Exit> {
    let mut p = map;
    let mut from: u8 = 1;
    loop {
        let (v, target) = entry(memory, p)?;
        p = p.add(2);
        if target == location && v & 0x1F == reversed {
            return Some(Exit {
                flags: (v >> 4) & 7,
                target: from,
            });
        }
        if v & LAST_ENTRY != 0 {
            from = from.wrapping_add(1);
        }
        if memory.read(p).unwrap_or(0) == 0 {
            return None;
        }
    }
}
