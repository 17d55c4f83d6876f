//! Render passes for both effects.
//!
//! Nothing here touches a display directly: every pixel goes through a
//! [`Canvas`], which the platform layer implements.

use nalgebra::Point2;

use crate::geometry::WireframeSim;
use crate::projection::project_star;
use crate::starfield::{StarField, ViewState};

/// Monochrome pixel value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn inverse(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// Foreground/background pair used by a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
}

impl Palette {
    /// Inverted is the device default: white stars on black
    pub fn for_inverted(inverted: bool) -> Self {
        if inverted {
            Self {
                foreground: Color::White,
                background: Color::Black,
            }
        } else {
            Self {
                foreground: Color::Black,
                background: Color::White,
            }
        }
    }

    pub fn swapped(self) -> Self {
        Self {
            foreground: self.background,
            background: self.foreground,
        }
    }
}

/// Drawing surface supplied by the platform.
///
/// Coordinates outside `width x height` must be ignored by implementations;
/// the render passes rely on that to clip trails and edges.
pub trait Canvas {
    type Error;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_foreground(&mut self, color: Color);
    fn set_background(&mut self, color: Color);
    /// Fill the whole grid with the background color
    fn clear(&mut self);
    fn draw_point(&mut self, x: i32, y: i32);
    fn draw_disc(&mut self, x: i32, y: i32, radius: u32);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    /// Flush the finished frame
    fn present(&mut self) -> Result<(), Self::Error>;

    fn set_palette(&mut self, palette: Palette) {
        self.set_foreground(palette.foreground);
        self.set_background(palette.background);
    }
}

/// Number of trail points drawn behind each star at the current speed
pub fn trail_length(field: &StarField, view: &ViewState) -> u32 {
    let params = field.params();
    let threshold = params.max_speed_multiplier * params.trail_threshold;
    if view.speed_multiplier > threshold {
        ((view.speed_multiplier - threshold) * params.trail_length_factor) as u32
    } else {
        0
    }
}

/// Draw one starfield frame.
///
/// Trails are extrapolated from the current star state by pushing the
/// depth back `speed * multiplier * t` for each step, so no history is kept.
pub fn render_starfield<C: Canvas>(
    canvas: &mut C,
    field: &StarField,
    view: &ViewState,
) -> Result<(), C::Error> {
    canvas.set_palette(view.palette());
    canvas.clear();

    let viewport = field.viewport();
    let params = field.params();
    let trail = trail_length(field, view);

    for star in field.stars() {
        let position = Point2::new(star.x + view.view_offset_x, star.y + view.view_offset_y);
        let Some(head) = project_star(&position, star.z, viewport) else {
            continue;
        };
        if !viewport.contains(head) {
            continue;
        }

        let step = star.speed * view.speed_multiplier;
        for t in 1..=trail {
            if let Some(fade) = project_star(&position, star.z + step * t as f32, viewport) {
                canvas.draw_point(fade.x, fade.y);
            }
        }

        if star.z / params.max_depth < params.near_depth_ratio {
            canvas.draw_disc(head.x, head.y, params.disc_radius);
        } else {
            canvas.draw_point(head.x, head.y);
        }
    }

    canvas.present()
}

/// Draw one wireframe frame: white edges on black
pub fn render_wireframe<C: Canvas>(canvas: &mut C, sim: &WireframeSim) -> Result<(), C::Error> {
    canvas.set_palette(Palette::for_inverted(true));
    canvas.clear();

    let projected = sim.snapshot();
    let vertex = |i: usize| projected.get(i).copied().flatten();
    for &(a, b) in &sim.wireframe().edges {
        // Edges naming a missing vertex are skipped like unprojectable ones
        if let (Some(start), Some(end)) = (vertex(a), vertex(b)) {
            canvas.draw_line(start.x, start.y, end.x, end.y);
        }
    }

    canvas.present()
}
