//! Renderer boundary.
//!
//! The gauge decides *what* each lamp should look like and *when*; a
//! [`Renderer`] turns that into pixels, PWM duty cycles or SVG attributes.

use palette::Srgba;

use crate::types::TransitionStyle;

/// Opaque target look of a lamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampVisual {
    /// Lamp body color, alpha included.
    pub fill: Srgba,
    /// Opacity multiplier of the glow layers, 0.0 (hidden) to 1.0.
    pub glow_opacity: f32,
}

impl LampVisual {
    pub const fn new(fill: Srgba, glow_opacity: f32) -> Self {
        Self { fill, glow_opacity }
    }
}

/// Trait for whatever draws the lamps.
///
/// Implement this for your output (LED driver, display, test recorder). The
/// gauge calls [`animate`](Renderer::animate) when a scene starts and treats
/// the animation as finished `duration` later, so implementations do not
/// report completion. Handle any output errors internally - this method
/// cannot fail.
pub trait Renderer<D> {
    /// Starts a transition of `lamp` toward `target` over `duration`.
    ///
    /// A new call for a lamp that is still animating replaces its transition,
    /// starting from whatever the lamp currently shows.
    fn animate(&mut self, lamp: usize, target: LampVisual, duration: D, easing: TransitionStyle);
}

impl<D, R: Renderer<D> + ?Sized> Renderer<D> for &mut R {
    fn animate(&mut self, lamp: usize, target: LampVisual, duration: D, easing: TransitionStyle) {
        (**self).animate(lamp, target, duration, easing);
    }
}
