//! Vector graphics interpreter
//!
//! Each picture record is a small program of one- and two-byte opcodes. The
//! top two bits pick the group:
//!
//! - `00` / `01`: draw / move by a short relative vector
//! - `10`: call the subpicture with the 6-bit code in the low bits
//! - `11`: extended group, selected by bits 5..3
//!
//! Positions are fixed point: one pixel is 64 units across and 128 up.
//! Relative vectors are reflected, then multiplied by the scale and rounded
//! down to a multiple of 8.
//!
//! All state lives in `GraphicsState` and is reset per render, so a render
//! never depends on anything but the picture data and the framebuffer.

use crate::error::VmError;
use crate::picture::PictureData;
use crate::raster::{Framebuffer, HEIGHT};
use bitreader::BitReader;
use log::{debug, trace, warn};
use std::io::{self, Write};

/// Depth of the subpicture call and scale stacks
pub const STACK_DEPTH: usize = 64;

pub const DEFAULT_SCALE: u16 = 0x80;

/// Scale multipliers in eighths
const SCALE_MAP: [u16; 8] = [0x00, 0x02, 0x04, 0x06, 0x07, 0x09, 0x0c, 0x10];

/// Draw position at the start of a render
const CENTRE: i16 = 0x1400;

/// Default ink (white)
const DEFAULT_INK: u8 = 3;

#[derive(Debug, Clone)]
pub struct GraphicsState {
    pub draw_x: i16,
    pub draw_y: i16,
    pub ink: u8,
    /// Zero, or the colour lines and fills may paint over with bit 7 set
    pub option: u8,
    /// Bit 1 mirrors x, bit 0 mirrors y
    pub reflect: u8,
    pub scale: u16,
    pub palette: [u8; 4],
    call_stack: Vec<usize>,
    scale_stack: Vec<u16>,
    /// Number of scale calculations clamped to 255
    pub scale_overflows: u32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState::new()
    }
}

impl GraphicsState {
    pub fn new() -> Self {
        GraphicsState {
            draw_x: CENTRE,
            draw_y: CENTRE,
            ink: DEFAULT_INK,
            option: 0,
            reflect: 0,
            scale: DEFAULT_SCALE,
            palette: [0; 4],
            call_stack: Vec::with_capacity(STACK_DEPTH),
            scale_stack: Vec::with_capacity(STACK_DEPTH),
            scale_overflows: 0,
        }
    }

    /// Reset everything a render starts from. The palette is kept; the
    /// shared setup record normally sets it.
    pub fn reset(&mut self) {
        let palette = self.palette;
        *self = GraphicsState::new();
        self.palette = palette;
    }

    /// Current position in pixels, y counted down from the top row
    pub fn pixel_position(&self) -> (i32, i32) {
        to_pixel(self.draw_x, self.draw_y)
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn scale_depth(&self) -> usize {
        self.scale_stack.len()
    }

    /// Colour that drawing may overwrite
    fn mask(&self) -> u8 {
        self.option & 3
    }

    fn set_scale(&mut self, index: u8) {
        if index == 0 {
            self.scale = DEFAULT_SCALE;
            self.scale_stack.clear();
            return;
        }
        let ns = (self.scale * SCALE_MAP[index as usize]) >> 3;
        if ns > 0xFF {
            warn!("SCALE OVERFLOW ({:#x})", ns);
            self.scale_overflows += 1;
            self.scale = 0xFF;
        } else {
            self.scale = ns;
        }
    }

    fn pop_scale(&mut self) {
        if let Some(s) = self.scale_stack.pop() {
            self.scale = s;
        }
    }

    /// Apply reflection and scale to a raw vector, giving the new position
    fn target(&self, mut dx: i16, mut dy: i16) -> (i16, i16) {
        if self.reflect & 2 != 0 {
            dx = -dx;
        }
        if self.reflect & 1 != 0 {
            dy = -dy;
        }
        let scale = self.scale as i32;
        let nx = self.draw_x as i32 + ((dx as i32 * scale) & !7);
        let ny = self.draw_y as i32 + ((dy as i32 * scale) & !7);
        (nx as i16, ny as i16)
    }
}

fn to_pixel(x: i16, y: i16) -> (i32, i32) {
    ((x >> 6) as i32, HEIGHT as i32 - 1 - (y >> 7) as i32)
}

fn bit_error(e: bitreader::BitReaderError) -> VmError {
    VmError::Corrupt(format!("vector decode: {e}"))
}

/// Short vector: 3-bit signed dx in bits 5..3, 3-bit signed dy in bits 2..0
pub fn decode_short_vector(opcode: u8) -> Result<(i16, i16), VmError> {
    let bytes = [opcode];
    let mut br = BitReader::new(&bytes);
    br.skip(2).map_err(bit_error)?;
    let dx = br.read_i8(3).map_err(bit_error)? as i16;
    let dy = br.read_i8(3).map_err(bit_error)? as i16;
    Ok((dx, dy << 2))
}

/// Long vector: 6-bit signed dx in bits 10..5, 5-bit signed dy in bits 4..0
/// of the opcode and operand taken as one big-endian word
pub fn decode_long_vector(opcode: u8, operand: u8) -> Result<(i16, i16), VmError> {
    let bytes = [opcode, operand];
    let mut br = BitReader::new(&bytes);
    br.skip(5).map_err(bit_error)?;
    let dx = br.read_i16(6).map_err(bit_error)?;
    let dy = br.read_i16(5).map_err(bit_error)?;
    Ok((dx, dy << 2))
}

pub struct GraphicsEngine {
    pictures: PictureData,
    pub framebuffer: Framebuffer,
    pub state: GraphicsState,
}

impl GraphicsEngine {
    pub fn new(pictures: PictureData) -> Self {
        GraphicsEngine {
            pictures,
            framebuffer: Framebuffer::new(),
            state: GraphicsState::new(),
        }
    }

    /// Render a picture: the shared setup record 0 first, then `code`
    pub fn draw_picture(&mut self, code: u16) -> Result<(), VmError> {
        debug!("draw picture {}", code);
        self.state.reset();
        for c in [0, code] {
            match self.pictures.find(c) {
                Some(pc) => self.execute(pc)?,
                None => debug!("picture {} not present", c),
            }
        }
        Ok(())
    }

    /// Write the framebuffer as PPM through the current palette
    pub fn write_ppm<W: Write>(&self, out: &mut W, colours: &[[u8; 3]; 8]) -> io::Result<()> {
        self.framebuffer.write_ppm(out, &self.state.palette, colours)
    }

    fn fetch(&self, pc: &mut usize) -> Result<u8, VmError> {
        let b = self.pictures.byte(*pc).ok_or_else(|| {
            VmError::Corrupt(format!("picture program runs past end at {:04x}", *pc))
        })?;
        *pc += 1;
        Ok(b)
    }

    /// Run one record until it returns with an empty call stack
    pub fn execute(&mut self, mut pc: usize) -> Result<(), VmError> {
        loop {
            let at = pc;
            let opcode = self.fetch(&mut pc)?;
            trace!("gfx {:04x}: {:02x}", at, opcode);
            match opcode >> 6 {
                0 | 1 => {
                    let (dx, dy) = decode_short_vector(opcode)?;
                    self.vector(dx, dy, opcode >> 6 == 0);
                }
                2 => {
                    pc = self.call((opcode & 0x3F) as u16, pc)?;
                }
                _ => match (opcode >> 3) & 7 {
                    0 | 1 => {
                        let operand = self.fetch(&mut pc)?;
                        let (dx, dy) = decode_long_vector(opcode, operand)?;
                        self.vector(dx, dy, (opcode >> 3) & 7 == 0);
                    }
                    2 => self.state.ink = opcode & 3,
                    3 => self.state.set_scale(opcode & 7),
                    4 => self.fill(opcode & 3),
                    5 => {
                        let low = self.fetch(&mut pc)?;
                        let code = (((opcode & 7) as u16) << 8) | low as u16;
                        pc = self.call(code, pc)?;
                    }
                    6 => {
                        if opcode & 4 != 0 {
                            self.state.reflect ^= opcode & 3;
                        } else {
                            self.state.reflect = opcode & 3;
                        }
                    }
                    _ => match opcode & 7 {
                        1 => {
                            let b = self.fetch(&mut pc)?;
                            self.state.palette[((b >> 3) & 3) as usize] = b & 7;
                        }
                        3 => {
                            let x = self.fetch(&mut pc)?;
                            let y = self.fetch(&mut pc)?;
                            self.state.draw_x = 0x40 * x as i16;
                            self.state.draw_y = 0x40 * y as i16;
                        }
                        4 => {
                            let b = self.fetch(&mut pc)?;
                            self.state.option = if b != 0 { (b & 3) | 0x80 } else { 0 };
                        }
                        5 => self.state.pop_scale(),
                        7 => match self.state.call_stack.pop() {
                            None => return Ok(()),
                            Some(ret) => {
                                pc = ret;
                                self.state.pop_scale();
                            }
                        },
                        _ => return Err(VmError::IllegalGraphicsOpcode(opcode)),
                    },
                },
            }
        }
    }

    fn vector(&mut self, dx: i16, dy: i16, draw: bool) {
        let (nx, ny) = self.state.target(dx, dy);
        trace!(
            "{} ({},{}) -> ({},{})",
            if draw { "draw" } else { "move" },
            self.state.draw_x,
            self.state.draw_y,
            nx,
            ny
        );
        if draw {
            let (x0, y0) = self.state.pixel_position();
            let (x1, y1) = to_pixel(nx, ny);
            let mask = self.state.mask();
            self.framebuffer.line(x0, y0, x1, y1, self.state.ink, mask);
        }
        self.state.draw_x = nx;
        self.state.draw_y = ny;
    }

    /// Enter a subpicture, returning where execution continues
    fn call(&mut self, code: u16, return_pc: usize) -> Result<usize, VmError> {
        let target = match self.pictures.find(code) {
            Some(t) => t,
            None => {
                warn!("subpicture {} not found, call skipped", code);
                return Ok(return_pc);
            }
        };
        if self.state.call_stack.len() >= STACK_DEPTH || self.state.scale_stack.len() >= STACK_DEPTH {
            return Err(VmError::GraphicsStackOverflow);
        }
        self.state.call_stack.push(return_pc);
        self.state.scale_stack.push(self.state.scale);
        Ok(target)
    }

    fn fill(&mut self, colour: u8) {
        let colour = if colour == 0 { self.state.ink } else { colour };
        let (x, y) = self.state.pixel_position();
        let n = self.framebuffer.fill(x, y, colour, self.state.mask());
        debug!("fill at ({},{}) with {}: {} pixels", x, y, colour, n);
    }
}
