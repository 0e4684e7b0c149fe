//! Framebuffer and style types for terminal rendering.

use unicode_width::UnicodeWidthChar;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        }
    }
}

impl CellStyle {
    pub const fn cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

/// A single terminal cell.
///
/// A double-width glyph occupies its own cell plus a following
/// [`Cell::WIDE_TAIL`] cell, which is never printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    pub const WIDE_TAIL: char = '\0';

    pub fn is_wide_tail(&self) -> bool {
        self.ch == Self::WIDE_TAIL
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the framebuffer, keeping the allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, Cell { ch, style });
    }

    /// Write `s` starting at `(x, y)` and return the column after it.
    ///
    /// Zero-width characters are dropped. A wide glyph that would not fit
    /// before the right edge is not drawn.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) -> u16 {
        let mut cx = x;
        for ch in s.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if cx.saturating_add(w) > self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
            if w == 2 {
                self.put_char(cx + 1, y, Cell::WIDE_TAIL, style);
            }
            cx += w;
        }
        cx
    }

    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: CellStyle) -> u16 {
        self.put_str(x, y, &value.to_string(), style)
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }
}

/// Display width of `s` in terminal columns.
pub fn str_width(s: &str) -> u16 {
    s.chars().map(|c| c.width().unwrap_or(0) as u16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_marks_wide_tail() {
        let mut fb = FrameBuffer::new(6, 1);
        let style = CellStyle::default();
        let end = fb.put_str(0, 0, "a🍎b", style);
        assert_eq!(end, 4);
        assert_eq!(fb.get(1, 0).map(|c| c.ch), Some('🍎'));
        assert!(fb.get(2, 0).unwrap().is_wide_tail());
        assert_eq!(fb.get(3, 0).map(|c| c.ch), Some('b'));
    }

    #[test]
    fn put_str_drops_wide_glyph_at_edge() {
        let mut fb = FrameBuffer::new(3, 1);
        let end = fb.put_str(2, 0, "🍎", CellStyle::default());
        assert_eq!(end, 2);
        assert_eq!(fb.get(2, 0).map(|c| c.ch), Some(' '));
    }

    #[test]
    fn str_width_counts_columns() {
        assert_eq!(str_width("🍎🍌"), 4);
        assert_eq!(str_width("00:05"), 5);
    }
}
