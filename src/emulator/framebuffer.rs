use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// The monochrome pixel grid, indexed as `[row][column]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer {
            pixels: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        SCREEN_WIDTH
    }

    pub fn height(&self) -> usize {
        SCREEN_HEIGHT
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];
    }

    /// Coordinates wrap around the edges of the screen.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH] = on;
    }

    /// XOR a single pixel onto the screen.
    /// Returns true if a lit pixel was turned off.
    pub fn xor(&mut self, x: usize, y: usize, on: bool) -> bool {
        let pixel = &mut self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH];
        let erased = *pixel && on;
        *pixel ^= on;
        erased
    }

    /// XOR an 8 pixel wide sprite row, most significant bit leftmost.
    /// Returns true if any lit pixel was turned off.
    pub fn xor_row(&mut self, x: usize, y: usize, row: u8) -> bool {
        let mut collision = false;
        for bit in 0..8 {
            let on = (row >> (7 - bit)) & 1 == 1;
            collision |= self.xor(x + bit, y, on);
        }
        collision
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; SCREEN_WIDTH]> {
        self.pixels.iter()
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&p| p).count()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                write!(f, "{}", if self.get(x, y) { "#" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &pixel in row.iter() {
                write!(f, "{}", if pixel { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clear_turns_everything_off() {
        let mut fb = Framebuffer::new();
        fb.set(3, 4, true);
        fb.set(63, 31, true);
        fb.clear();
        assert_eq!(fb, Framebuffer::new());
    }

    #[test]
    fn xor_reports_erased_pixels() {
        let mut fb = Framebuffer::new();
        assert!(!fb.xor(1, 1, true));
        assert!(fb.get(1, 1));
        assert!(fb.xor(1, 1, true));
        assert!(!fb.get(1, 1));
        assert!(!fb.xor(1, 1, false));
    }

    #[test]
    fn rows_wrap_at_the_right_edge() {
        let mut fb = Framebuffer::new();
        fb.xor_row(60, 0, 0xFF);
        for x in 60..64 {
            assert!(fb.get(x, 0));
        }
        for x in 0..4 {
            assert!(fb.get(x, 0));
        }
        assert_eq!(fb.lit_pixels(), 8);
    }

    #[test]
    fn coordinates_wrap_vertically() {
        let mut fb = Framebuffer::new();
        fb.set(0, SCREEN_HEIGHT + 2, true);
        assert!(fb.get(0, 2));
    }

    #[test]
    fn displays_lit_pixels_as_hashes() {
        let mut fb = Framebuffer::new();
        fb.set(0, 0, true);
        fb.set(2, 0, true);
        let text = fb.to_string();
        let first_line = text.lines().next().unwrap();
        assert_eq!(&first_line[..3], "# #");
        assert_eq!(first_line.len(), fb.width());
        assert_eq!(text.lines().count(), fb.height());
    }
}
