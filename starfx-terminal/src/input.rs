//! Keyboard mapping from crossterm events to device input events
//!
//! Arrows map to the d-pad, Enter/Space to Select and Esc/q/Backspace to
//! Back. Digits 1-4 change the canvas scale and never reach the effect.
//! [`InputRouter`] feeds the mapped events to an effect.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::trace;
use starfx_core::{Effect, InputEvent, InputKey, InputPhase, LoopState};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// What a key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Effect(InputEvent),
    SetScale(u16),
}

/// Map a key event, `None` for keys with no binding
pub fn map_key(event: &KeyEvent) -> Option<Command> {
    let phase = match event.kind {
        KeyEventKind::Press => InputPhase::Press,
        KeyEventKind::Repeat => InputPhase::Repeat,
        KeyEventKind::Release => InputPhase::Release,
    };

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(Command::Effect(InputEvent::new(InputKey::Back, phase))),
            _ => None,
        };
    }

    let key = match event.code {
        KeyCode::Left => InputKey::Left,
        KeyCode::Right => InputKey::Right,
        KeyCode::Up => InputKey::Up,
        KeyCode::Down => InputKey::Down,
        KeyCode::Enter | KeyCode::Char(' ') => InputKey::Select,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => InputKey::Back,
        KeyCode::Char(c @ '1'..='4') => {
            if phase != InputPhase::Press {
                return None;
            }
            return c.to_digit(10).map(|digit| Command::SetScale(digit as u16));
        }
        _ => return None,
    };

    Some(Command::Effect(InputEvent::new(key, phase)))
}

/// Emits a release for keys that stop repeating, for terminals that never
/// report key releases themselves
#[derive(Debug)]
pub struct ReleaseSynthesizer {
    release_after: Duration,
    held: HashMap<InputKey, Instant>,
}

impl ReleaseSynthesizer {
    pub fn new(release_after: Duration) -> Self {
        Self {
            release_after,
            held: HashMap::new(),
        }
    }

    pub fn observe(&mut self, event: &InputEvent, now: Instant) {
        if event.is_held() {
            self.held.insert(event.key, now);
        } else {
            self.held.remove(&event.key);
        }
    }

    /// Releases for every key quiet for at least `release_after`
    pub fn expire(&mut self, now: Instant) -> Vec<InputEvent> {
        let release_after = self.release_after;
        let mut released: Vec<InputKey> = self
            .held
            .iter()
            .filter(|(_, &seen)| now.duration_since(seen) >= release_after)
            .map(|(&key, _)| key)
            .collect();
        released.sort_by_key(|key| *key as u8);

        for key in &released {
            self.held.remove(key);
        }
        released.into_iter().map(InputEvent::release).collect()
    }

    pub fn is_held(&self, key: InputKey) -> bool {
        self.held.contains_key(&key)
    }
}

/// What the frame loop does after routing input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Continue,
    SetScale(u16),
    Stop,
}

/// Routes key events to an effect, synthesizing releases when the terminal
/// cannot report them.
///
/// A held Select toggles the palette once per press. Without release
/// reporting, the terminal's auto-repeat arrives as fresh presses, so a
/// press of a key that is still held counts as a repeat.
#[derive(Debug, Default)]
pub struct InputRouter {
    releases: Option<ReleaseSynthesizer>,
}

impl InputRouter {
    /// For terminals that report releases themselves
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synthesizing(release_after: Duration) -> Self {
        Self {
            releases: Some(ReleaseSynthesizer::new(release_after)),
        }
    }

    pub fn synthesizes_releases(&self) -> bool {
        self.releases.is_some()
    }

    pub fn route_key<E: Effect>(&mut self, key: &KeyEvent, effect: &mut E, now: Instant) -> RouteAction {
        match map_key(key) {
            Some(Command::Effect(input)) => match self.normalize(input, now) {
                Some(input) => dispatch(effect, input),
                None => RouteAction::Continue,
            },
            Some(Command::SetScale(scale)) => RouteAction::SetScale(scale),
            None => RouteAction::Continue,
        }
    }

    /// Deliver synthesized releases for keys gone quiet
    pub fn expire<E: Effect>(&mut self, effect: &mut E, now: Instant) -> RouteAction {
        let Some(releases) = self.releases.as_mut() else {
            return RouteAction::Continue;
        };
        for release in releases.expire(now) {
            trace!("synthesized {:?}", release);
            if dispatch(effect, release) == RouteAction::Stop {
                return RouteAction::Stop;
            }
        }
        RouteAction::Continue
    }

    fn normalize(&mut self, mut input: InputEvent, now: Instant) -> Option<InputEvent> {
        if let Some(releases) = self.releases.as_mut() {
            if input.phase == InputPhase::Press && releases.is_held(input.key) {
                input.phase = InputPhase::Repeat;
            }
            releases.observe(&input, now);
        }

        if input.key == InputKey::Select && input.phase == InputPhase::Repeat {
            return None;
        }
        Some(input)
    }
}

fn dispatch<E: Effect>(effect: &mut E, input: InputEvent) -> RouteAction {
    match effect.handle_input(input) {
        LoopState::Running => RouteAction::Continue,
        LoopState::Terminated => RouteAction::Stop,
    }
}
