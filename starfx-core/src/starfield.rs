/// Parallax starfield simulation
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::projection::Viewport;
use crate::render::Palette;

pub const MAX_STARS: usize = 150;
pub const MAX_DEPTH: f32 = 32.0;
pub const MAX_SPEED_MULTIPLIER: f32 = 5.0;
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;

/// A point flying toward the viewer. `z` is the depth ahead of the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Depth lost per tick at a speed multiplier of 1
    pub speed: f32,
}

impl Star {
    pub fn new(x: f32, y: f32, z: f32, speed: f32) -> Self {
        Self { x, y, z, speed }
    }
}

/// Tunables for the starfield effect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldParams {
    pub star_count: usize,
    pub max_depth: f32,
    pub min_star_speed: f32,
    /// Width of the random speed range above `min_star_speed`
    pub star_speed_range: f32,
    pub max_speed_multiplier: f32,
    /// Fraction of the pan distance covered each tick
    pub pan_smoothing: f32,
    pub pan_step: f32,
    pub speed_step: f32,
    /// Consecutive press/repeat ticks before speed changes accelerate
    pub hold_threshold: u32,
    /// Trails appear above this fraction of `max_speed_multiplier`
    pub trail_threshold: f32,
    pub trail_length_factor: f32,
    /// Stars nearer than this fraction of `max_depth` draw as discs
    pub near_depth_ratio: f32,
    pub disc_radius: u32,
    pub initially_inverted: bool,
    pub frame_period_ms: u64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            star_count: MAX_STARS,
            max_depth: MAX_DEPTH,
            min_star_speed: 0.1,
            star_speed_range: 0.3,
            max_speed_multiplier: MAX_SPEED_MULTIPLIER,
            pan_smoothing: 0.1,
            pan_step: 2.0,
            speed_step: 0.1,
            hold_threshold: 10,
            trail_threshold: 0.8,
            trail_length_factor: 20.0,
            near_depth_ratio: 0.3,
            disc_radius: 1,
            initially_inverted: true,
            frame_period_ms: 16,
        }
    }
}

/// Camera pan, speed and color mode shared by the controls, the simulation
/// and the render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub view_offset_x: f32,
    pub view_offset_y: f32,
    pub target_offset_x: f32,
    pub target_offset_y: f32,
    pub speed_multiplier: f32,
    pub inverted: bool,
}

impl ViewState {
    pub fn new(inverted: bool) -> Self {
        Self {
            view_offset_x: 0.0,
            view_offset_y: 0.0,
            target_offset_x: 0.0,
            target_offset_y: 0.0,
            speed_multiplier: 1.0,
            inverted,
        }
    }

    /// First-order low-pass of the pan toward its target
    pub fn ease_pan(&mut self, smoothing: f32) {
        self.view_offset_x += (self.target_offset_x - self.view_offset_x) * smoothing;
        self.view_offset_y += (self.target_offset_y - self.view_offset_y) * smoothing;
    }

    /// Change the speed multiplier, clamped to `[MIN_SPEED_MULTIPLIER, max]`
    pub fn adjust_speed(&mut self, delta: f32, max: f32) {
        self.speed_multiplier =
            (self.speed_multiplier + delta).clamp(MIN_SPEED_MULTIPLIER, max.max(MIN_SPEED_MULTIPLIER));
    }

    pub fn toggle_inverted(&mut self) {
        self.inverted = !self.inverted;
    }

    pub fn palette(&self) -> Palette {
        Palette::for_inverted(self.inverted)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Fixed population of stars, respawned in place as they pass the viewer
pub struct StarField {
    stars: Vec<Star>,
    viewport: Viewport,
    params: StarfieldParams,
    rng: StdRng,
}

impl StarField {
    /// Populate a field seeded from OS entropy
    pub fn new(viewport: Viewport, params: StarfieldParams) -> Self {
        Self::with_rng(viewport, params, StdRng::from_entropy())
    }

    /// Populate a field with a reproducible sequence
    pub fn with_seed(viewport: Viewport, params: StarfieldParams, seed: u64) -> Self {
        Self::with_rng(viewport, params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(viewport: Viewport, params: StarfieldParams, rng: StdRng) -> Self {
        let count = params.star_count;
        let mut field = Self {
            stars: Vec::with_capacity(count),
            viewport,
            params,
            rng,
        };
        field.init(count);
        field
    }

    /// Build a field from explicit stars. `seed` drives later respawns.
    pub fn from_stars(
        stars: Vec<Star>,
        viewport: Viewport,
        params: StarfieldParams,
        seed: u64,
    ) -> Self {
        Self {
            stars,
            viewport,
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace the population with `count` freshly randomized stars
    pub fn init(&mut self, count: usize) {
        let depth_cells = (self.params.max_depth as u32).max(1);
        self.stars.clear();
        for _ in 0..count {
            let (x, y) = self.spawn_position();
            let z = self.rng.gen_range(0..depth_cells) as f32;
            let speed = self.params.min_star_speed + self.rng.gen::<f32>() * self.params.star_speed_range;
            self.stars.push(Star::new(x, y, z, speed));
        }
        debug!("initialized {} stars", count);
    }

    /// Advance every star and ease the pan toward its target
    pub fn tick(&mut self, view: &mut ViewState) {
        let max_depth = self.params.max_depth;
        for i in 0..self.stars.len() {
            let star = &mut self.stars[i];
            star.z -= star.speed * view.speed_multiplier;
            if star.z <= 0.0 {
                let (x, y) = self.spawn_position();
                let star = &mut self.stars[i];
                star.x = x;
                star.y = y;
                star.z = max_depth;
            }
        }

        view.ease_pan(self.params.pan_smoothing);
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn params(&self) -> &StarfieldParams {
        &self.params
    }

    /// Bytes of simulation state the embedded target would hold
    pub fn footprint_bytes(&self) -> usize {
        self.stars.len() * std::mem::size_of::<Star>() + std::mem::size_of::<ViewState>()
    }

    /// Random integer position in `[-w/2, w/2) x [-h/2, h/2)`
    fn spawn_position(&mut self) -> (f32, f32) {
        let x = self.rng.gen_range(0..self.viewport.width.max(1)) as i32 - self.viewport.half_width();
        let y = self.rng.gen_range(0..self.viewport.height.max(1)) as i32 - self.viewport.half_height();
        (x as f32, y as f32)
    }
}
