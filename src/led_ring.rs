//! Ready-made renderer for a ring of RGB LEDs.
//!
//! [`LedRing`] keeps one transition per lamp and blends the lamp body with its
//! glow layers into a single color per LED. Service it at your frame rate
//! while it reports [`ServiceTiming::Continuous`].

use heapless::Vec;
use palette::{Mix, Srgb, Srgba};

use crate::LAMP_COUNT;
use crate::config::{GlowLayer, MAX_GLOW_LAYERS};
use crate::gauge::ServiceTiming;
use crate::renderer::{LampVisual, Renderer};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::TransitionStyle;

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your LED hardware (GPIO, PWM, SPI, etc.) to let a
/// [`LedRing`] drive it.
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    ///
    /// Color components are in the range 0.0-1.0. Implementations should
    /// convert these to their hardware's native format (e.g., PWM duty cycles,
    /// 8-bit RGB values). Handle any hardware errors internally - this method
    /// cannot fail.
    fn set_color(&mut self, color: Srgb);
}

/// Look of a lamp that has never been animated.
pub fn lamp_off() -> LampVisual {
    LampVisual::new(Srgba::new(0.0, 0.0, 0.0, 0.0), 0.0)
}

struct Transition<I: TimeInstant> {
    from: LampVisual,
    to: LampVisual,
    started: I,
    duration: I::Duration,
    easing: TransitionStyle,
}

struct Lamp<I: TimeInstant> {
    shown: LampVisual,
    transition: Option<Transition<I>>,
    color: Srgb,
}

impl<I: TimeInstant> Lamp<I> {
    fn new() -> Self {
        Self {
            shown: lamp_off(),
            transition: None,
            color: Srgb::new(0.0, 0.0, 0.0),
        }
    }
}

/// Drives ten [`RgbLed`]s as a gauge [`Renderer`].
pub struct LedRing<'t, I: TimeInstant, L: RgbLed, T: TimeSource<I>> {
    leds: [L; LAMP_COUNT],
    time_source: &'t T,
    glow: Vec<GlowLayer, MAX_GLOW_LAYERS>,
    lamps: [Lamp<I>; LAMP_COUNT],
}

impl<'t, I: TimeInstant, L: RgbLed, T: TimeSource<I>> LedRing<'t, I, L, T> {
    /// Creates a ring and turns every LED off.
    ///
    /// Layers beyond [`MAX_GLOW_LAYERS`] are ignored.
    pub fn new(mut leds: [L; LAMP_COUNT], time_source: &'t T, glow: &[GlowLayer]) -> Self {
        let off = Srgb::new(0.0, 0.0, 0.0);
        for led in leds.iter_mut() {
            led.set_color(off);
        }

        Self {
            leds,
            time_source,
            glow: glow.iter().take(MAX_GLOW_LAYERS).copied().collect(),
            lamps: core::array::from_fn(|_| Lamp::new()),
        }
    }

    /// Advances every running transition and writes changed colors.
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        let now = self.time_source.now();
        let mut animating = false;

        for index in 0..LAMP_COUNT {
            let visual = self.advance(index, now);
            self.write(index, visual);
            animating |= self.lamps[index].transition.is_some();
        }

        if animating {
            ServiceTiming::Continuous
        } else {
            ServiceTiming::Idle
        }
    }

    /// Replaces the glow layers and redraws every lamp with them.
    ///
    /// Layers beyond [`MAX_GLOW_LAYERS`] are ignored.
    pub fn set_glow(&mut self, glow: &[GlowLayer]) {
        self.glow = glow.iter().take(MAX_GLOW_LAYERS).copied().collect();
        for index in 0..LAMP_COUNT {
            let visual = self.lamps[index].shown;
            self.write(index, visual);
        }
    }

    /// Current look of `lamp`, as of the last service.
    pub fn visual(&self, lamp: usize) -> Option<LampVisual> {
        self.lamps.get(lamp).map(|lamp| lamp.shown)
    }

    /// Color last written to `lamp`'s LED.
    pub fn color(&self, lamp: usize) -> Option<Srgb> {
        self.lamps.get(lamp).map(|lamp| lamp.color)
    }

    /// Returns true while any lamp is mid-transition.
    pub fn is_animating(&self) -> bool {
        self.lamps.iter().any(|lamp| lamp.transition.is_some())
    }

    /// Returns the LED outputs.
    pub fn leds(&self) -> &[L; LAMP_COUNT] {
        &self.leds
    }

    /// Returns the LED outputs mutably.
    pub fn leds_mut(&mut self) -> &mut [L; LAMP_COUNT] {
        &mut self.leds
    }

    /// Evaluates lamp `index` at `now`, finishing its transition once complete.
    fn advance(&mut self, index: usize, now: I) -> LampVisual {
        let lamp = &mut self.lamps[index];
        let Some(transition) = &lamp.transition else {
            return lamp.shown;
        };

        let total = transition.duration.as_millis();
        let elapsed = now.duration_since(transition.started).as_millis();
        if total == 0 || elapsed >= total {
            lamp.shown = transition.to;
            lamp.transition = None;
            return lamp.shown;
        }

        let progress = transition.easing.ease(elapsed as f32 / total as f32);
        lamp.shown = blend(transition.from, transition.to, progress);
        lamp.shown
    }

    fn write(&mut self, index: usize, visual: LampVisual) {
        let color = compose(visual, &self.glow);
        if color != self.lamps[index].color {
            self.leds[index].set_color(color);
            self.lamps[index].color = color;
        }
    }
}

impl<'t, I: TimeInstant, L: RgbLed, T: TimeSource<I>> Renderer<I::Duration>
    for LedRing<'t, I, L, T>
{
    fn animate(
        &mut self,
        lamp: usize,
        target: LampVisual,
        duration: I::Duration,
        easing: TransitionStyle,
    ) {
        if lamp >= LAMP_COUNT {
            warn!("led ring: no lamp {}", lamp);
            return;
        }

        let now = self.time_source.now();
        let from = self.advance(lamp, now);

        if duration == I::Duration::ZERO || easing == TransitionStyle::Step {
            self.lamps[lamp].shown = target;
            self.lamps[lamp].transition = None;
            self.write(lamp, target);
            return;
        }

        self.lamps[lamp].transition = Some(Transition {
            from,
            to: target,
            started: now,
            duration,
            easing,
        });
    }
}

/// Interpolates two lamp looks; `progress` is already eased.
fn blend(from: LampVisual, to: LampVisual, progress: f32) -> LampVisual {
    let color = from.fill.color.mix(to.fill.color, progress);
    let alpha = lerp(from.fill.alpha, to.fill.alpha, progress);
    LampVisual::new(
        Srgba::new(color.red, color.green, color.blue, alpha),
        lerp(from.glow_opacity, to.glow_opacity, progress),
    )
}

fn lerp(from: f32, to: f32, progress: f32) -> f32 {
    from + (to - from) * progress
}

/// Flattens a lamp and its glow into one LED color.
///
/// The body contributes its color weighted by alpha; each glow layer adds its
/// color weighted by its own opacity and the lamp's glow opacity.
pub fn compose(visual: LampVisual, glow: &[GlowLayer]) -> Srgb {
    let alpha = visual.fill.alpha;
    let mut red = visual.fill.color.red * alpha;
    let mut green = visual.fill.color.green * alpha;
    let mut blue = visual.fill.color.blue * alpha;

    for layer in glow {
        let weight = layer.opacity * visual.glow_opacity;
        red += layer.color.red * weight;
        green += layer.color.green * weight;
        blue += layer.color.blue * weight;
    }

    Srgb::new(red.clamp(0.0, 1.0), green.clamp(0.0, 1.0), blue.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::colors;

    #[test]
    fn dark_lamp_without_glow_is_black() {
        let visual = LampVisual::new(colors::disabled_fill(), 0.0);
        assert_eq!(compose(visual, &[]), Srgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn glow_adds_on_top_of_fill_and_clamps() {
        let visual = LampVisual::new(Srgba::new(1.0, 1.0, 1.0, 0.8), 1.0);
        let glow = [GlowLayer::new(10.0, 0.7, Srgb::new(1.0, 0.0, 0.0))];
        let color = compose(visual, &glow);
        assert_eq!(color.red, 1.0);
        assert!((color.green - 0.8).abs() < 1e-6);
        assert!((color.blue - 0.8).abs() < 1e-6);
    }

    #[test]
    fn blend_halfway_mixes_every_channel() {
        let from = LampVisual::new(Srgba::new(0.0, 0.0, 0.0, 0.0), 0.0);
        let to = LampVisual::new(Srgba::new(1.0, 0.5, 0.0, 1.0), 1.0);
        let mid = blend(from, to, 0.5);
        assert!((mid.fill.color.red - 0.5).abs() < 1e-6);
        assert!((mid.fill.color.green - 0.25).abs() < 1e-6);
        assert!((mid.fill.alpha - 0.5).abs() < 1e-6);
        assert!((mid.glow_opacity - 0.5).abs() < 1e-6);
    }
}
