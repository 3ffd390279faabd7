//! Core types shared by the gauge, its engines and renderers.

/// Easing curve used by the renderer for a lamp transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionStyle {
    /// Instantly jump to the target, hold for the duration.
    Step,

    /// Linear interpolation over duration.
    #[default]
    Linear,

    /// Quadratic ease-in: slow start, accelerating toward end.
    EaseIn,

    /// Quadratic ease-out: fast start, decelerating toward end.
    EaseOut,

    /// Quadratic ease-in-out: slow start and end, fast middle.
    EaseInOut,
}

impl TransitionStyle {
    /// Maps linear progress (0.0-1.0) onto this easing curve.
    pub fn ease(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            TransitionStyle::Step => 1.0,
            TransitionStyle::Linear => t,
            TransitionStyle::EaseIn => t * t,
            TransitionStyle::EaseOut => t * (2.0 - t),
            TransitionStyle::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// Name of the curve, as accepted by [`TransitionStyle::parse_from_str`].
    pub const fn as_str(self) -> &'static str {
        match self {
            TransitionStyle::Step => "step",
            TransitionStyle::Linear => "linear",
            TransitionStyle::EaseIn => "ease-in",
            TransitionStyle::EaseOut => "ease-out",
            TransitionStyle::EaseInOut => "ease-in-out",
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "step" => Some(TransitionStyle::Step),
            "linear" => Some(TransitionStyle::Linear),
            "ease-in" | "<" => Some(TransitionStyle::EaseIn),
            "ease-out" | ">" => Some(TransitionStyle::EaseOut),
            "ease-in-out" | "<>" => Some(TransitionStyle::EaseInOut),
            _ => None,
        }
    }
}

/// How many times a rotation or flash should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopCount {
    /// Repeat a specific number of times.
    Finite(u32),

    /// Repeat until the gauge is stopped.
    Infinite,
}

impl Default for LoopCount {
    fn default() -> Self {
        LoopCount::Finite(1)
    }
}

impl LoopCount {
    /// Interprets a raw repeat count, where zero means "forever".
    pub const fn from_raw(times: u32) -> Self {
        if times == 0 {
            LoopCount::Infinite
        } else {
            LoopCount::Finite(times)
        }
    }

    /// Returns the count left after one more repetition, or `None` when done.
    pub(crate) const fn next(self) -> Option<Self> {
        match self {
            LoopCount::Finite(n) if n > 1 => Some(LoopCount::Finite(n - 1)),
            LoopCount::Finite(_) => None,
            LoopCount::Infinite => Some(LoopCount::Infinite),
        }
    }

    pub const fn is_infinite(self) -> bool {
        matches!(self, LoopCount::Infinite)
    }
}

/// Direction of a rotation sweep around the ring.
///
/// Lamps are numbered clockwise starting at 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Lit pattern moves toward higher lamp indices.
    Clockwise,
    /// Lit pattern moves toward lower lamp indices.
    CounterClockwise,
}

impl Direction {
    /// Direction from the sign of `value`; zero has no direction.
    pub const fn from_sign(value: i32) -> Option<Self> {
        if value > 0 {
            Some(Direction::Clockwise)
        } else if value < 0 {
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counter-clockwise",
        }
    }
}

/// Errors reported by gauge operations.
///
/// Input errors never break a caller's chain: the rejected call still queues
/// its callback before returning the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GaugeError {
    /// Lamp index outside `0..LAMP_COUNT`.
    InvalidIndex(usize),

    /// Gauge value outside `0..=MAX_VALUE`.
    InvalidValue(u8),

    /// Matrix with the wrong number of lamps.
    MalformedMatrix {
        /// Number of entries supplied.
        len: usize,
    },

    /// The scene queue cannot take every scene the call needs.
    QueueFull,

    /// Configuration value rejected by [`GaugeConfig::validate`](crate::GaugeConfig::validate).
    InvalidConfig(&'static str),
}

impl core::fmt::Display for GaugeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GaugeError::InvalidIndex(index) => {
                write!(f, "lamp index {} is outside 0..{}", index, crate::LAMP_COUNT)
            }
            GaugeError::InvalidValue(value) => {
                write!(f, "gauge value {} is outside 0..={}", value, crate::MAX_VALUE)
            }
            GaugeError::MalformedMatrix { len } => {
                write!(
                    f,
                    "matrix has {} entries, expected {}",
                    len,
                    crate::LAMP_COUNT
                )
            }
            GaugeError::QueueFull => {
                write!(f, "scene queue is full")
            }
            GaugeError::InvalidConfig(reason) => {
                write!(f, "invalid configuration: {}", reason)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GaugeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_curves_hit_endpoints() {
        for style in [
            TransitionStyle::Linear,
            TransitionStyle::EaseIn,
            TransitionStyle::EaseOut,
            TransitionStyle::EaseInOut,
        ] {
            assert_eq!(style.ease(0.0), 0.0);
            assert_eq!(style.ease(1.0), 1.0);
        }
        assert_eq!(TransitionStyle::Step.ease(0.0), 1.0);
        assert_eq!(TransitionStyle::EaseIn.ease(0.5), 0.25);
        assert_eq!(TransitionStyle::EaseOut.ease(0.5), 0.75);
        assert_eq!(TransitionStyle::Linear.ease(2.0), 1.0);
    }

    #[test]
    fn easing_names_round_trip() {
        for style in [
            TransitionStyle::Step,
            TransitionStyle::Linear,
            TransitionStyle::EaseIn,
            TransitionStyle::EaseOut,
            TransitionStyle::EaseInOut,
        ] {
            assert_eq!(TransitionStyle::parse_from_str(style.as_str()), Some(style));
        }
        assert_eq!(TransitionStyle::parse_from_str("bounce"), None);
    }

    #[test]
    fn loop_count_counts_down() {
        assert_eq!(LoopCount::from_raw(0), LoopCount::Infinite);
        assert_eq!(LoopCount::Finite(3).next(), Some(LoopCount::Finite(2)));
        assert_eq!(LoopCount::Finite(1).next(), None);
        assert_eq!(LoopCount::Finite(0).next(), None);
        assert_eq!(LoopCount::Infinite.next(), Some(LoopCount::Infinite));
    }

    #[test]
    fn direction_follows_sign() {
        assert_eq!(Direction::from_sign(4), Some(Direction::Clockwise));
        assert_eq!(Direction::from_sign(-1), Some(Direction::CounterClockwise));
        assert_eq!(Direction::from_sign(0), None);
    }
}
