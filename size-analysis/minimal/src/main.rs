#![no_std]
#![no_main]

use bend_gauge::{
    BendGauge, Direction, GaugeConfig, LedRing, LoopCount, RgbLed, TimeDuration, TimeInstant,
    TimeSource,
};
use cortex_m_rt::entry;
use palette::Srgb;
use panic_halt as _;

// ============================================================================
// Minimal Time Types
// ============================================================================

/// Minimal 32-bit millisecond duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration32(u32);

impl TimeDuration for Duration32 {
    const ZERO: Self = Duration32(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        Duration32(millis as u32)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Duration32(self.0.saturating_sub(other.0))
    }
}

/// Minimal 32-bit millisecond instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant32(u32);

impl TimeInstant for Instant32 {
    type Duration = Duration32;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Duration32(self.0.saturating_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(Instant32)
    }
}

// ============================================================================
// Minimal LED Implementation
// ============================================================================

/// Zero-size LED implementation for measuring library overhead
pub struct MinimalLed;

impl RgbLed for MinimalLed {
    fn set_color(&mut self, _color: Srgb) {
        core::hint::black_box(());
    }
}

pub struct MinimalTimeSource;

impl TimeSource<Instant32> for MinimalTimeSource {
    fn now(&self) -> Instant32 {
        Instant32(0)
    }
}

// This function uses every gauge operation to keep the optimizer from removing code
#[inline(never)]
fn exercise_gauge() {
    let time_source = MinimalTimeSource;
    let config = GaugeConfig::<Duration32>::default();
    let ring = LedRing::new(
        core::array::from_fn(|_| MinimalLed),
        &time_source,
        &config.glow,
    );

    let Ok(mut gauge) = BendGauge::<_, _, _, u8>::new(ring, &time_source, config) else {
        return;
    };

    let _ = gauge.on(1, None);
    let _ = gauge.off(1, Some(1));
    let _ = gauge.set(&[0, 4, 8], None);
    let _ = gauge.set_value(7, Some(2));
    let _ = gauge.rotate(-3, None);
    let _ = gauge.flash(LoopCount::Finite(2), Some(3));
    let _ = gauge.rotate_forever(Direction::Clockwise);
    let _ = gauge.service();
    let _ = gauge.renderer_mut().service();
    gauge.stop();
    let _ = gauge.poll_callback();

    core::hint::black_box(gauge);
}

#[entry]
fn main() -> ! {
    exercise_gauge();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
