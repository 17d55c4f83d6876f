/// Monochrome pixel canvas presented on a terminal
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use starfx_core::{Canvas, Color};
use std::io::{self, Write};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

pub const MAX_SCALE: u16 = 4;

/// Off-screen pixel grid with the drawing primitives of the device
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    foreground: Color,
    background: Color,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::Black; (width * height) as usize],
            foreground: Color::White,
            background: Color::Black,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.foreground = color;
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Count of pixels holding `color`
    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Paint one pixel in the foreground color; off-grid coordinates are ignored
    pub fn plot(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = self.foreground;
        }
    }

    /// Filled disc. Radius 1 covers the full 3x3 block around the center.
    pub fn disc(&mut self, cx: i32, cy: i32, radius: u32) {
        let r = radius as i32;
        let limit = r * r + r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= limit {
                    self.plot(cx + dx, cy + dy);
                }
            }
        }
    }

    /// Bresenham line including both endpoints
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.plot(x, y);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

/// [`Canvas`] that flushes a [`PixelBuffer`] to a terminal writer, two pixel
/// rows per character cell, each pixel repeated `scale` times on both axes
pub struct TerminalCanvas<W: Write> {
    buffer: PixelBuffer,
    out: W,
    scale: u16,
    needs_full_clear: bool,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(width: u32, height: u32, scale: u16, out: W) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            out,
            scale: scale.clamp(1, MAX_SCALE),
            needs_full_clear: true,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn scale(&self) -> u16 {
        self.scale
    }

    /// Change the pixel scale; the next frame wipes the whole screen
    pub fn set_scale(&mut self, scale: u16) {
        let scale = scale.clamp(1, MAX_SCALE);
        if scale != self.scale {
            self.scale = scale;
            self.needs_full_clear = true;
        }
    }

    /// Terminal columns the frame occupies
    pub fn columns(&self) -> u16 {
        (self.buffer.width * self.scale as u32) as u16
    }

    /// Terminal rows the frame occupies
    pub fn rows(&self) -> u16 {
        ((self.buffer.height * self.scale as u32 + 1) / 2) as u16
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Logical pixel under sub-pixel row `sy` of column `sx`
    fn sample(&self, sx: u32, sy: u32) -> Color {
        let scale = self.scale as u32;
        self.buffer
            .get((sx / scale) as i32, (sy / scale) as i32)
            .unwrap_or(self.buffer.background)
    }

    fn write_frame(&mut self) -> io::Result<()> {
        if self.needs_full_clear {
            self.out.queue(Clear(ClearType::All))?;
            self.needs_full_clear = false;
        }

        let mut current: Option<(Color, Color)> = None;
        for row in 0..self.rows() {
            self.out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.columns() as u32 {
                let top = self.sample(col, row as u32 * 2);
                let bottom = self.sample(col, row as u32 * 2 + 1);
                if current != Some((top, bottom)) {
                    self.out.queue(SetForegroundColor(term_color(top)))?;
                    self.out.queue(SetBackgroundColor(term_color(bottom)))?;
                    current = Some((top, bottom));
                }
                self.out.queue(Print(HALF_BLOCK))?;
            }
        }
        self.out.queue(ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    type Error = io::Error;

    fn width(&self) -> u32 {
        self.buffer.width
    }

    fn height(&self) -> u32 {
        self.buffer.height
    }

    fn set_foreground(&mut self, color: Color) {
        self.buffer.set_foreground(color);
    }

    fn set_background(&mut self, color: Color) {
        self.buffer.set_background(color);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        self.buffer.plot(x, y);
    }

    fn draw_disc(&mut self, x: i32, y: i32, radius: u32) {
        self.buffer.disc(x, y, radius);
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.buffer.line(x1, y1, x2, y2);
    }

    fn present(&mut self) -> io::Result<()> {
        self.write_frame()
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Black => TermColor::Black,
        Color::White => TermColor::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_fills_background() {
        let mut buffer = PixelBuffer::new(8, 4);
        buffer.set_background(Color::White);
        buffer.clear();
        assert_eq!(buffer.count(Color::White), 32);
    }

    #[test]
    fn test_plot_ignores_off_grid() {
        let mut buffer = PixelBuffer::new(8, 4);
        buffer.clear();
        buffer.plot(-1, 0);
        buffer.plot(8, 0);
        buffer.plot(0, 4);
        assert_eq!(buffer.count(Color::White), 0);
        buffer.plot(7, 3);
        assert_eq!(buffer.get(7, 3), Some(Color::White));
    }

    #[test]
    fn test_disc_radius_one_is_three_by_three() {
        let mut buffer = PixelBuffer::new(8, 8);
        buffer.clear();
        buffer.disc(3, 3, 1);
        assert_eq!(buffer.count(Color::White), 9);
        assert_eq!(buffer.get(2, 2), Some(Color::White));
        assert_eq!(buffer.get(4, 4), Some(Color::White));
    }

    #[test]
    fn test_disc_at_corner_is_clipped() {
        let mut buffer = PixelBuffer::new(8, 8);
        buffer.clear();
        buffer.disc(0, 0, 1);
        assert_eq!(buffer.count(Color::White), 4);
    }

    #[test]
    fn test_line_covers_endpoints() {
        let mut buffer = PixelBuffer::new(16, 16);
        buffer.clear();
        buffer.line(1, 2, 12, 7);
        assert_eq!(buffer.get(1, 2), Some(Color::White));
        assert_eq!(buffer.get(12, 7), Some(Color::White));
        // One pixel per step along the major axis
        assert_eq!(buffer.count(Color::White), 12);
    }

    #[test]
    fn test_line_clips_off_grid_part() {
        let mut buffer = PixelBuffer::new(16, 16);
        buffer.clear();
        buffer.line(-10, 5, 25, 5);
        assert_eq!(buffer.count(Color::White), 16);
    }

    #[test]
    fn test_present_writes_half_blocks() {
        let mut canvas = TerminalCanvas::new(4, 4, 1, Vec::new());
        canvas.clear();
        canvas.draw_point(0, 0);
        canvas.present().unwrap();

        let output = String::from_utf8(canvas.into_writer()).unwrap();
        assert_eq!(output.matches(HALF_BLOCK).count(), 8);
    }

    #[test]
    fn test_scale_multiplies_cells() {
        let mut canvas = TerminalCanvas::new(128, 64, 1, Vec::new());
        assert_eq!((canvas.columns(), canvas.rows()), (128, 32));
        canvas.set_scale(2);
        assert_eq!((canvas.columns(), canvas.rows()), (256, 64));
        canvas.set_scale(9);
        assert_eq!(canvas.scale(), MAX_SCALE);
    }

    #[test]
    fn test_scaled_sampling() {
        let mut canvas = TerminalCanvas::new(4, 4, 2, Vec::new());
        canvas.clear();
        canvas.draw_point(1, 1);
        assert_eq!(canvas.sample(2, 2), Color::White);
        assert_eq!(canvas.sample(3, 3), Color::White);
        assert_eq!(canvas.sample(1, 1), Color::Black);
        assert_eq!(canvas.sample(4, 2), Color::Black);
    }
}
