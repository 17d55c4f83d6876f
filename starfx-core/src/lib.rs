/// starfx core library - simulation and projection for the starfield and
/// wireframe effects
///
/// Everything here is platform independent: the effects draw through the
/// [`Canvas`] trait and consume [`InputEvent`]s, both supplied by a front-end.

pub mod budget;
pub mod control;
pub mod effect;
pub mod geometry;
pub mod projection;
pub mod render;
pub mod starfield;
pub mod transform;

// Re-export commonly used types
pub use budget::{BudgetError, MemoryBudget};
pub use control::{InputEvent, InputKey, InputPhase, LoopState, StarfieldControls};
pub use effect::{Effect, StarfieldEffect, TetrahedronEffect};
pub use geometry::{Wireframe, WireframeParams, WireframeSim};
pub use projection::{Camera, ScreenPoint, Viewport};
pub use render::{Canvas, Color, Palette};
pub use starfield::{Star, StarField, StarfieldParams, ViewState};
pub use transform::RotationState;
