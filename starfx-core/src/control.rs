/// Input events and the starfield's control reducer
use log::{debug, trace};

use crate::starfield::{StarfieldParams, ViewState};

/// Logical keys of the device's d-pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    Left,
    Right,
    Up,
    Down,
    Select,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPhase {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: InputKey,
    pub phase: InputPhase,
}

impl InputEvent {
    pub fn new(key: InputKey, phase: InputPhase) -> Self {
        Self { key, phase }
    }

    pub fn press(key: InputKey) -> Self {
        Self::new(key, InputPhase::Press)
    }

    pub fn repeat(key: InputKey) -> Self {
        Self::new(key, InputPhase::Repeat)
    }

    pub fn release(key: InputKey) -> Self {
        Self::new(key, InputPhase::Release)
    }

    /// Press and repeat both count as the key being held down
    pub fn is_held(&self) -> bool {
        matches!(self.phase, InputPhase::Press | InputPhase::Repeat)
    }
}

/// Outcome of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Consecutive press/repeat events seen for one key since its last release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldCounter {
    ticks: u32,
}

impl HoldCounter {
    /// Count one more held tick and return the total
    pub fn hold(&mut self) -> u32 {
        self.ticks = self.ticks.saturating_add(1);
        self.ticks
    }

    pub fn release(&mut self) {
        self.ticks = 0;
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

/// Step size after `hold_ticks` held ticks.
///
/// Past the threshold the step grows in whole multiples
/// (`hold_ticks / threshold`, integer division).
pub fn ramped_step(step: f32, hold_ticks: u32, threshold: u32) -> f32 {
    let threshold = threshold.max(1);
    if hold_ticks > threshold {
        step * (hold_ticks / threshold) as f32
    } else {
        step
    }
}

/// Maps input events onto a [`ViewState`]
#[derive(Debug, Clone)]
pub struct StarfieldControls {
    up: HoldCounter,
    down: HoldCounter,
    pan_step: f32,
    speed_step: f32,
    hold_threshold: u32,
    max_speed_multiplier: f32,
}

impl StarfieldControls {
    pub fn new(params: &StarfieldParams) -> Self {
        Self {
            up: HoldCounter::default(),
            down: HoldCounter::default(),
            pan_step: params.pan_step,
            speed_step: params.speed_step,
            hold_threshold: params.hold_threshold,
            max_speed_multiplier: params.max_speed_multiplier,
        }
    }

    /// Apply one event. Left pans the target right and vice versa, so the
    /// field appears to slide past as the viewer turns.
    pub fn apply(&mut self, view: &mut ViewState, event: InputEvent) -> LoopState {
        trace!("input {:?}", event);

        if event.phase == InputPhase::Release {
            match event.key {
                InputKey::Up => self.up.release(),
                InputKey::Down => self.down.release(),
                _ => {}
            }
            return LoopState::Running;
        }

        match event.key {
            InputKey::Back => {
                debug!("back pressed, terminating");
                return LoopState::Terminated;
            }
            InputKey::Left => view.target_offset_x += self.pan_step,
            InputKey::Right => view.target_offset_x -= self.pan_step,
            InputKey::Up => {
                let held = self.up.hold();
                let step = ramped_step(self.speed_step, held, self.hold_threshold);
                view.adjust_speed(step, self.max_speed_multiplier);
            }
            InputKey::Down => {
                let held = self.down.hold();
                let step = ramped_step(self.speed_step, held, self.hold_threshold);
                view.adjust_speed(-step, self.max_speed_multiplier);
            }
            InputKey::Select => view.toggle_inverted(),
        }

        LoopState::Running
    }

    pub fn up_hold(&self) -> u32 {
        self.up.ticks()
    }

    pub fn down_hold(&self) -> u32 {
        self.down.ticks()
    }
}
