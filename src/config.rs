//! Gauge configuration.

use heapless::Vec;
use palette::{Srgb, Srgba};

use crate::colors;
use crate::renderer::LampVisual;
use crate::time::TimeDuration;
use crate::types::{GaugeError, TransitionStyle};

/// Maximum number of glow layers around a lamp.
pub const MAX_GLOW_LAYERS: usize = 4;

/// Default lane name.
pub const DEFAULT_QUEUE: &str = "bend-gauge";

/// Default per-lamp animation length in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 200;

/// Default pause between cascading steps, as a fraction of the duration.
pub const DEFAULT_DELAY_FACTOR: f32 = 1.0 / 3.0;

/// One halo drawn around a lit lamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowLayer {
    /// Stroke width in renderer units.
    pub width: f32,
    /// Opacity of the layer when the lamp is fully lit.
    pub opacity: f32,
    pub color: Srgb,
}

impl GlowLayer {
    pub const fn new(width: f32, opacity: f32, color: Srgb) -> Self {
        Self {
            width,
            opacity,
            color,
        }
    }
}

/// Options recognized by a gauge.
///
/// `D` is the platform duration type.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeConfig<D: TimeDuration> {
    /// Length of a single lamp animation.
    pub duration: D,
    /// Fraction of `duration` between cascading ramp steps.
    pub delay_factor: f32,
    /// Fill of a dimmed lamp.
    pub disabled_color: Srgba,
    /// Fill of a lit lamp.
    pub fill_color: Srgba,
    /// Glow layers; empty disables the glow. Read by the renderer when it is
    /// built, not by the gauge.
    pub glow: Vec<GlowLayer, MAX_GLOW_LAYERS>,
    pub easing: TransitionStyle,
    /// Lane name.
    pub queue: &'static str,
}

impl<D: TimeDuration> Default for GaugeConfig<D> {
    fn default() -> Self {
        let mut glow = Vec::new();
        let _ = glow.push(GlowLayer::new(10.0, 0.7, colors::GLOW_OUTER));
        let _ = glow.push(GlowLayer::new(3.0, 0.7, colors::GLOW_INNER));

        Self {
            duration: D::from_millis(DEFAULT_DURATION_MS),
            delay_factor: DEFAULT_DELAY_FACTOR,
            disabled_color: colors::disabled_fill(),
            fill_color: colors::enabled_fill(),
            glow,
            easing: TransitionStyle::Linear,
            queue: DEFAULT_QUEUE,
        }
    }
}

impl<D: TimeDuration> GaugeConfig<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: D) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay_factor(mut self, delay_factor: f32) -> Self {
        self.delay_factor = delay_factor;
        self
    }

    pub fn with_colors(mut self, disabled: Srgba, fill: Srgba) -> Self {
        self.disabled_color = disabled;
        self.fill_color = fill;
        self
    }

    /// Replaces the glow layers. Layers beyond [`MAX_GLOW_LAYERS`] are ignored.
    pub fn with_glow(mut self, layers: &[GlowLayer]) -> Self {
        self.glow.clear();
        for layer in layers.iter().take(MAX_GLOW_LAYERS) {
            let _ = self.glow.push(*layer);
        }
        self
    }

    pub fn without_glow(mut self) -> Self {
        self.glow.clear();
        self
    }

    pub fn with_easing(mut self, easing: TransitionStyle) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_queue(mut self, queue: &'static str) -> Self {
        self.queue = queue;
        self
    }

    /// Checks the options a gauge cannot work with.
    ///
    /// # Errors
    /// `InvalidConfig` for a negative or non-finite delay factor, or a glow
    /// layer opacity outside 0.0-1.0.
    pub fn validate(&self) -> Result<(), GaugeError> {
        if !self.delay_factor.is_finite() || self.delay_factor < 0.0 {
            return Err(GaugeError::InvalidConfig(
                "delay factor must be a finite, non-negative number",
            ));
        }
        if self
            .glow
            .iter()
            .any(|layer| !(0.0..=1.0).contains(&layer.opacity))
        {
            return Err(GaugeError::InvalidConfig("glow opacity must be within 0.0-1.0"));
        }
        Ok(())
    }

    /// Gap between two consecutive ramp steps.
    pub fn step_delay(&self) -> D {
        self.duration.scaled(self.delay_factor)
    }

    /// Target visual of a lamp being switched on or off.
    pub fn visual(&self, lit: bool) -> LampVisual {
        if lit {
            LampVisual::new(self.fill_color, 1.0)
        } else {
            LampVisual::new(self.disabled_color, 0.0)
        }
    }
}
