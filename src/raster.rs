//! Packed four-colour framebuffer and the raster primitives drawn into it
//!
//! Pixels are two bits each, four to a byte, leftmost pixel in the low bits.
//! Every primitive clips silently at the canvas edge.

use bitvec::prelude::*;
use std::io::{self, Write};

pub const WIDTH: usize = 160;
pub const HEIGHT: usize = 128;
const BITS_PER_PIXEL: usize = 2;

/// Fixed RGB values the four palette entries select from
pub const DEFAULT_COLOURS: [[u8; 3]; 8] = [
    [0, 0, 0],
    [255, 0, 0],
    [0, 255, 0],
    [255, 255, 0],
    [0, 0, 255],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 255],
];

pub struct Framebuffer {
    bits: BitVec<u8, Lsb0>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            bits: bitvec![u8, Lsb0; 0; WIDTH * HEIGHT * BITS_PER_PIXEL],
        }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return None;
        }
        Some((y as usize * WIDTH + x as usize) * BITS_PER_PIXEL)
    }

    /// Colour at (x, y), or None off the canvas
    pub fn peek(&self, x: i32, y: i32) -> Option<u8> {
        let i = Self::index(x, y)?;
        Some(self.bits[i..i + BITS_PER_PIXEL].load_le::<u8>())
    }

    pub fn plot(&mut self, x: i32, y: i32, colour: u8) {
        if let Some(i) = Self::index(x, y) {
            self.bits[i..i + BITS_PER_PIXEL].store_le::<u8>(colour & 3);
        }
    }

    /// Plot only where the pixel currently has colour `mask`
    pub fn plot_masked(&mut self, x: i32, y: i32, colour: u8, mask: u8) {
        if self.peek(x, y) == Some(mask & 3) {
            self.plot(x, y, colour);
        }
    }

    /// Draw a line, stepping one pixel per iteration along the major axis
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: u8, mask: u8) {
        let (mut x, mut y, mut xe, mut ye) = (x0, y0, x1, y1);
        let steep = (ye - y).abs() > (xe - x).abs();
        if steep {
            std::mem::swap(&mut x, &mut y);
            std::mem::swap(&mut xe, &mut ye);
        }
        if x > xe {
            std::mem::swap(&mut x, &mut xe);
            std::mem::swap(&mut y, &mut ye);
        }

        let derr = (ye - y).abs();
        let dx = xe - x;
        let ydir = if ye < y { -1 } else { 1 };
        let mut acc = dx >> 1;

        while x <= xe {
            if steep {
                self.plot_masked(y, x, colour, mask);
            } else {
                self.plot_masked(x, y, colour, mask);
            }
            acc -= derr;
            if acc < 0 {
                acc += dx;
                y += ydir;
            }
            x += 1;
        }
    }

    /// Four-connected fill from (x, y), recolouring pixels of colour
    /// `matching` to `colour`. Visits pixels in the same order as the
    /// recursive right, left, up, down formulation. Returns the number of
    /// pixels changed.
    pub fn fill(&mut self, x: i32, y: i32, colour: u8, matching: u8) -> usize {
        let (colour, matching) = (colour & 3, matching & 3);
        if colour == matching {
            return 0;
        }
        let mut changed = 0;
        let mut stack = vec![(x, y)];
        while let Some((px, py)) = stack.pop() {
            if self.peek(px, py) != Some(matching) {
                continue;
            }
            self.plot(px, py, colour);
            changed += 1;
            stack.push((px, py + 1));
            stack.push((px, py - 1));
            stack.push((px - 1, py));
            stack.push((px + 1, py));
        }
        changed
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Packed pixel bytes, row by row
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Write the canvas as plain-text PPM, resolving each pixel through the
    /// palette into `colours`
    pub fn write_ppm<W: Write>(
        &self,
        out: &mut W,
        palette: &[u8; 4],
        colours: &[[u8; 3]; 8],
    ) -> io::Result<()> {
        write!(out, "P3\n{} {} 3\n", WIDTH, HEIGHT)?;
        for y in 0..HEIGHT as i32 {
            for x in 0..WIDTH as i32 {
                let c = self.peek(x, y).unwrap_or(0);
                let [r, g, b] = colours[(palette[c as usize] & 7) as usize];
                write!(out, "{} {} {} ", r, g, b)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
