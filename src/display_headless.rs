//! Headless display implementation for testing and CI environments
//!
//! Output is collected in a shared buffer so a test can keep a handle to it
//! after the display has been boxed and moved into the interpreter.

use crate::display_trait::{translate_code, DisplayError, GameDisplay};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct HeadlessDisplay {
    output: Rc<RefCell<String>>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        HeadlessDisplay::default()
    }

    /// Get all output as a single string
    pub fn get_output(&self) -> String {
        self.output.borrow().clone()
    }
}

impl GameDisplay for HeadlessDisplay {
    fn print_code(&mut self, code: u8) -> Result<(), DisplayError> {
        self.output.borrow_mut().push(translate_code(code));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
