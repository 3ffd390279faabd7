#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`BendGauge`**: Owns the lamp state of one ring and serializes every change through its scene queue
//! - **`Matrix`**: The ten on/off lamp states, numbered clockwise from 12 o'clock
//! - **`GaugeConfig`**: Animation timing, colors, glow layers and easing
//! - **`Renderer`**: Trait to implement for whatever draws the lamps
//! - **`LedRing`**: Ready-made `Renderer` for ten `RgbLed` outputs
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`LoopCount`**: How many times a rotation or flash repeats (`Finite(n)` or `Infinite`)
//! - **`GaugeAction`**: Commands that can be sent to control a gauge
//!
//! Nothing runs in the background. Call `BendGauge::service` (and
//! `LedRing::service` if you use it) from your main loop or timer task;
//! both return a `ServiceTiming` telling you when to call again.

// Must stay first so the logging macros are visible to every module below.
mod fmt;

// Re-export palette colors for user convenience
pub use palette::{Srgb, Srgba};

pub mod colors;
pub mod command;
pub mod config;
pub mod flash;
pub mod gauge;
pub mod led_ring;
pub mod queue;
pub mod ramp;
pub mod renderer;
mod rotate;
mod scene;
pub mod state;
pub mod time;
pub mod types;

pub use command::{GaugeAction, GaugeCommand};
pub use config::{GaugeConfig, GlowLayer};
pub use flash::FlashSnapshot;
pub use gauge::{BendGauge, DEFAULT_QUEUE_CAPACITY, ServiceTiming};
pub use led_ring::{LedRing, RgbLed};
pub use queue::WorkQueue;
pub use ramp::{RampPlan, RampStep};
pub use renderer::{LampVisual, Renderer};
pub use state::{GaugeState, Matrix, NO_VALUE};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{Direction, GaugeError, LoopCount, TransitionStyle};

/// Number of lamps on the ring.
pub const LAMP_COUNT: usize = 10;

/// Highest clock value; every lamp is lit.
pub const MAX_VALUE: u8 = 10;
