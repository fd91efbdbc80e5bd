pub mod config;
pub mod dictionary;
pub mod display_headless;
pub mod display_terminal;
pub mod display_trait;
pub mod error;
pub mod exits;
pub mod gfx;
pub mod header;
pub mod input;
pub mod interpreter;
pub mod memory;
pub mod opcodes_driver;
pub mod opcodes_flow;
pub mod opcodes_io;
pub mod opcodes_math;
pub mod opcodes_table;
pub mod picture;
pub mod random;
pub mod raster;
pub mod text;
pub mod vm;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod branch_tests;
#[cfg(test)]
mod exit_tests;

/*
Layout of a small game image, as produced by the test builder
        0000    header: messages, word dictionary, 12 table pointers
        0040    message records
        0300    word dictionary records (pointer is one past their start)
        0400    exit map (table 0)
        0480    input dictionary (table 1)
        0500    data tables
        0600    code (table 11)
*/
