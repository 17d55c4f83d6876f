//! Integration tests for the effect pipelines
//!
//! These drive simulation, projection and rendering together through a
//! canvas that records every call.

use nalgebra::Point3;
use starfx_core::projection::project;
use starfx_core::render::{render_starfield, render_wireframe, trail_length};
use starfx_core::starfield::{MAX_DEPTH, MAX_SPEED_MULTIPLIER};
use starfx_core::{
    Canvas, Color, Effect, InputEvent, InputKey, RotationState, ScreenPoint, Star, StarField,
    StarfieldEffect, StarfieldParams, TetrahedronEffect, ViewState, Viewport, Wireframe,
    WireframeParams, WireframeSim,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Foreground(Color),
    Background(Color),
    Clear,
    Point(i32, i32),
    Disc(i32, i32, u32),
    Line(i32, i32, i32, i32),
    Present,
}

#[derive(Default)]
struct RecordingCanvas {
    calls: Vec<Call>,
}

impl RecordingCanvas {
    fn points(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Point(..))).count()
    }

    fn discs(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Disc(..))).count()
    }

    fn lines(&self) -> Vec<&Call> {
        self.calls.iter().filter(|c| matches!(c, Call::Line(..))).collect()
    }

    fn colors(&self) -> (Option<Color>, Option<Color>) {
        let mut fg = None;
        let mut bg = None;
        for call in &self.calls {
            match call {
                Call::Foreground(c) => fg = Some(*c),
                Call::Background(c) => bg = Some(*c),
                _ => {}
            }
        }
        (fg, bg)
    }
}

impl Canvas for RecordingCanvas {
    type Error = std::convert::Infallible;

    fn width(&self) -> u32 {
        128
    }

    fn height(&self) -> u32 {
        64
    }

    fn set_foreground(&mut self, color: Color) {
        self.calls.push(Call::Foreground(color));
    }

    fn set_background(&mut self, color: Color) {
        self.calls.push(Call::Background(color));
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        self.calls.push(Call::Point(x, y));
    }

    fn draw_disc(&mut self, x: i32, y: i32, radius: u32) {
        self.calls.push(Call::Disc(x, y, radius));
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.calls.push(Call::Line(x1, y1, x2, y2));
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::Present);
        Ok(())
    }
}

fn single_star(star: Star) -> StarField {
    StarField::from_stars(vec![star], Viewport::default(), StarfieldParams::default(), 11)
}

fn draw(field: &StarField, view: &ViewState) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::default();
    render_starfield(&mut canvas, field, view).unwrap();
    canvas
}

// ==================== Starfield Simulation ====================

#[test]
fn test_single_star_flight_and_respawn() {
    let mut field = single_star(Star::new(10.0, 5.0, 16.0, 0.2));
    let mut view = ViewState::default();

    field.tick(&mut view);
    let star = field.stars()[0];
    assert!((star.z - 15.8).abs() < 1e-5);
    assert_eq!((star.x, star.y), (10.0, 5.0));

    let mut ticks = 1;
    while field.stars()[0].z < MAX_DEPTH {
        field.tick(&mut view);
        ticks += 1;
        assert!(ticks <= 81, "star never respawned");
    }

    let star = field.stars()[0];
    assert_eq!(star.z, 32.0);
    assert!((-64.0..=63.0).contains(&star.x));
    assert!((-32.0..=31.0).contains(&star.y));
    assert_eq!(star.x.fract(), 0.0);
    assert_eq!(star.y.fract(), 0.0);
}

#[test]
fn test_depth_stays_in_range_over_many_ticks() {
    let mut field = StarField::with_seed(Viewport::default(), StarfieldParams::default(), 2024);
    let mut view = ViewState::default();
    view.speed_multiplier = MAX_SPEED_MULTIPLIER;

    for _ in 0..500 {
        let before: Vec<Star> = field.stars().to_vec();
        field.tick(&mut view);
        for (old, new) in before.iter().zip(field.stars()) {
            assert!(new.z > 0.0 && new.z <= MAX_DEPTH);
            if new.z == MAX_DEPTH && old.z - old.speed * view.speed_multiplier <= 0.0 {
                assert!((-64.0..64.0).contains(&new.x));
                assert!((-32.0..32.0).contains(&new.y));
            } else {
                assert!(new.z < old.z);
                assert_eq!((new.x, new.y), (old.x, old.y));
            }
        }
    }
}

#[test]
fn test_pan_converges_without_overshoot() {
    let mut field = StarField::from_stars(Vec::new(), Viewport::default(), StarfieldParams::default(), 0);
    let mut view = ViewState::default();
    view.target_offset_x = 20.0;
    view.target_offset_y = -8.0;

    let mut remaining_x = 20.0f32;
    for _ in 0..100 {
        field.tick(&mut view);
        let now_x = view.target_offset_x - view.view_offset_x;
        assert!(now_x >= 0.0, "overshot target");
        assert!(now_x <= remaining_x);
        assert!((now_x - remaining_x * 0.9).abs() < 1e-3);
        assert!(view.view_offset_y >= view.target_offset_y);
        remaining_x = now_x;
    }
    assert!((view.view_offset_x - 20.0).abs() < 1e-2);
    assert!((view.view_offset_y + 8.0).abs() < 1e-2);
}

// ==================== Starfield Rendering ====================

#[test]
fn test_far_star_is_a_point_near_star_is_a_disc() {
    let view = ViewState::default();

    let far = draw(&single_star(Star::new(10.0, 5.0, 16.0, 0.2)), &view);
    assert_eq!(far.calls.iter().filter(|c| **c == Call::Point(104, 42)).count(), 1);
    assert_eq!(far.discs(), 0);

    // 4 / 32 < 0.3
    let near = draw(&single_star(Star::new(1.0, 1.0, 4.0, 0.2)), &view);
    assert_eq!(near.calls.iter().filter(|c| **c == Call::Disc(80, 40, 1)).count(), 1);
    assert_eq!(near.points(), 0);
}

#[test]
fn test_zero_depth_and_off_screen_stars_are_skipped() {
    let view = ViewState::default();
    let field = StarField::from_stars(
        vec![
            Star::new(5.0, 5.0, 0.0, 0.2),
            Star::new(60.0, 0.0, 1.0, 0.2),
            Star::new(0.0, -30.0, 0.5, 0.2),
        ],
        Viewport::default(),
        StarfieldParams::default(),
        0,
    );
    let canvas = draw(&field, &view);
    assert_eq!(
        canvas.calls,
        vec![
            Call::Foreground(Color::White),
            Call::Background(Color::Black),
            Call::Clear,
            Call::Present,
        ]
    );
}

#[test]
fn test_pan_offset_shifts_projection() {
    let mut view = ViewState::default();
    view.view_offset_x = 6.0;
    // ((10 + 6) / 16) * 64 + 64 = 128, just off the right edge
    let canvas = draw(&single_star(Star::new(10.0, 5.0, 16.0, 0.2)), &view);
    assert_eq!(canvas.points(), 0);
}

#[test]
fn test_no_trail_at_threshold() {
    let field = single_star(Star::new(10.0, 5.0, 16.0, 0.2));
    let mut view = ViewState::default();
    view.speed_multiplier = 4.0;
    assert_eq!(trail_length(&field, &view), 0);
    assert_eq!(draw(&field, &view).points(), 1);
}

#[test]
fn test_trail_at_full_speed() {
    let field = single_star(Star::new(10.0, 5.0, 16.0, 0.2));
    let mut view = ViewState::default();
    view.speed_multiplier = MAX_SPEED_MULTIPLIER;
    assert_eq!(trail_length(&field, &view), 20);

    let canvas = draw(&field, &view);
    assert_eq!(canvas.points(), 21);

    // Trail points fall back toward the center as the effective depth grows
    let xs: Vec<i32> = canvas
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Point(x, _) => Some(*x),
            _ => None,
        })
        .collect();
    assert!(xs[..20].windows(2).all(|w| w[1] <= w[0]));
    assert!(xs[..20].iter().all(|&x| x <= 104));
}

#[test]
fn test_trail_is_recomputed_each_frame() {
    let field = single_star(Star::new(10.0, 5.0, 16.0, 0.2));
    let mut view = ViewState::default();
    view.speed_multiplier = 4.5;
    let first = draw(&field, &view);
    let second = draw(&field, &view);
    assert_eq!(first.calls, second.calls);
    assert_eq!(first.points(), 11);
}

#[test]
fn test_invert_twice_restores_colors() {
    let field = single_star(Star::new(10.0, 5.0, 16.0, 0.2));
    let mut view = ViewState::default();
    let original = draw(&field, &view).colors();
    assert_eq!(original, (Some(Color::White), Some(Color::Black)));

    view.toggle_inverted();
    assert_eq!(draw(&field, &view).colors(), (Some(Color::Black), Some(Color::White)));

    view.toggle_inverted();
    assert_eq!(draw(&field, &view).colors(), original);
}

// ==================== Wireframe ====================

#[test]
fn test_tetrahedron_corner_projection() {
    let rotated = RotationState::zero().apply(&Point3::new(1.0, 1.0, 1.0));
    let projected = project(&rotated, 128.0, 3.0, &Viewport::default());
    assert_eq!(projected, Some(ScreenPoint::new(96, 64)));
}

#[test]
fn test_tetrahedron_draws_six_edges() {
    let effect = TetrahedronEffect::new(Viewport::default(), &WireframeParams::default());
    let mut canvas = RecordingCanvas::default();
    effect.render(&mut canvas).unwrap();

    assert_eq!(canvas.colors(), (Some(Color::White), Some(Color::Black)));
    let lines = canvas.lines();
    assert_eq!(lines.len(), 6);
    assert_eq!(*lines[0], Call::Line(96, 64, 32, 0));
    assert_eq!(canvas.calls.last(), Some(&Call::Present));
}

#[test]
fn test_edge_to_missing_vertex_is_skipped() {
    let wireframe = Wireframe {
        vertices: vec![Point3::origin(), Point3::new(1.0, 1.0, 1.0)],
        edges: vec![(0, 3), (0, 1), (7, 1)],
    };
    let sim = WireframeSim::new(wireframe, &WireframeParams::default(), Viewport::default());
    let mut canvas = RecordingCanvas::default();
    render_wireframe(&mut canvas, &sim).unwrap();

    assert_eq!(canvas.lines(), vec![&Call::Line(64, 32, 96, 64)]);
    assert_eq!(canvas.calls.last(), Some(&Call::Present));
}

// ==================== Effect Loop ====================

#[test]
fn test_starfield_effect_frame_cycle() {
    let mut effect =
        StarfieldEffect::from_params(Viewport::default(), StarfieldParams::default(), Some(5));

    for _ in 0..60 {
        effect.handle_input(InputEvent::repeat(InputKey::Up));
        effect.tick();
        let mut canvas = RecordingCanvas::default();
        effect.render(&mut canvas).unwrap();
        assert_eq!(canvas.calls.first(), Some(&Call::Foreground(Color::White)));
    }
    assert_eq!(effect.view().speed_multiplier, MAX_SPEED_MULTIPLIER);

    effect.handle_input(InputEvent::release(InputKey::Up));
    effect.handle_input(InputEvent::press(InputKey::Down));
    assert!((effect.view().speed_multiplier - 4.9).abs() < 1e-5);
}
