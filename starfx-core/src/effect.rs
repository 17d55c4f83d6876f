/// The two runnable effects behind a common loop interface
use std::time::Duration;

use log::info;

use crate::control::{InputEvent, InputKey, LoopState, StarfieldControls};
use crate::geometry::{Wireframe, WireframeParams, WireframeSim};
use crate::projection::Viewport;
use crate::render::{self, Canvas};
use crate::starfield::{StarField, StarfieldParams, ViewState};

/// One visual effect driven by a fixed-tick loop: input, tick, render
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Target time between frames
    fn frame_period(&self) -> Duration;

    fn handle_input(&mut self, event: InputEvent) -> LoopState;

    fn tick(&mut self);

    fn render<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error>;

    /// Bytes of simulation state, for memory budget reporting
    fn footprint_bytes(&self) -> usize;

    /// Short status text for an overlay
    fn status(&self) -> String {
        String::new()
    }
}

pub struct StarfieldEffect {
    field: StarField,
    view: ViewState,
    controls: StarfieldControls,
    frame_period: Duration,
}

impl StarfieldEffect {
    pub fn new(field: StarField) -> Self {
        let params = field.params();
        let mut view = ViewState::new(params.initially_inverted);
        // A configured maximum below 1.0 caps the starting speed too
        view.adjust_speed(0.0, params.max_speed_multiplier);
        let controls = StarfieldControls::new(params);
        let frame_period = Duration::from_millis(params.frame_period_ms);
        info!(
            "starfield with {} stars on {}x{}",
            field.stars().len(),
            field.viewport().width,
            field.viewport().height
        );
        Self {
            field,
            view,
            controls,
            frame_period,
        }
    }

    /// Random field from `params`, reproducible when `seed` is given
    pub fn from_params(viewport: Viewport, params: StarfieldParams, seed: Option<u64>) -> Self {
        let field = match seed {
            Some(seed) => StarField::with_seed(viewport, params, seed),
            None => StarField::new(viewport, params),
        };
        Self::new(field)
    }

    pub fn field(&self) -> &StarField {
        &self.field
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }
}

impl Effect for StarfieldEffect {
    fn name(&self) -> &'static str {
        "starfield"
    }

    fn frame_period(&self) -> Duration {
        self.frame_period
    }

    fn handle_input(&mut self, event: InputEvent) -> LoopState {
        self.controls.apply(&mut self.view, event)
    }

    fn tick(&mut self) {
        self.field.tick(&mut self.view);
    }

    fn render<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        render::render_starfield(canvas, &self.field, &self.view)
    }

    fn footprint_bytes(&self) -> usize {
        self.field.footprint_bytes()
    }

    fn status(&self) -> String {
        format!(
            "speed x{:.1} | pan {:+.1}",
            self.view.speed_multiplier, self.view.target_offset_x
        )
    }
}

pub struct TetrahedronEffect {
    sim: WireframeSim,
    frame_period: Duration,
}

impl TetrahedronEffect {
    pub fn new(viewport: Viewport, params: &WireframeParams) -> Self {
        Self {
            sim: WireframeSim::new(Wireframe::tetrahedron(), params, viewport),
            frame_period: Duration::from_millis(params.frame_period_ms),
        }
    }

    pub fn sim(&self) -> &WireframeSim {
        &self.sim
    }
}

impl Effect for TetrahedronEffect {
    fn name(&self) -> &'static str {
        "tetrahedron"
    }

    fn frame_period(&self) -> Duration {
        self.frame_period
    }

    fn handle_input(&mut self, event: InputEvent) -> LoopState {
        if event.key == InputKey::Back && event.is_held() {
            LoopState::Terminated
        } else {
            LoopState::Running
        }
    }

    fn tick(&mut self) {
        self.sim.tick();
    }

    fn render<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        render::render_wireframe(canvas, &self.sim)
    }

    fn footprint_bytes(&self) -> usize {
        self.sim.wireframe().footprint_bytes()
    }

    fn status(&self) -> String {
        let rotation = self.sim.rotation();
        format!("angles {:.2} {:.2} {:.2}", rotation.x, rotation.y, rotation.z)
    }
}
