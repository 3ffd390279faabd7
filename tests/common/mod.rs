//! Shared test infrastructure for bend-gauge integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use bend_gauge::{
    BendGauge, GaugeConfig, LAMP_COUNT, LampVisual, Renderer, RgbLed, ServiceTiming, Srgb,
    TimeDuration, TimeInstant, TimeSource, TransitionStyle,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// One recorded `animate` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimateCall {
    pub lamp: usize,
    pub target: LampVisual,
    pub duration: TestDuration,
    pub easing: TransitionStyle,
}

/// Mock renderer that records every animation request
pub struct MockRenderer {
    calls: Vec<AnimateCall>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn calls(&self) -> &[AnimateCall] {
        &self.calls
    }

    /// Lamps animated so far, in call order
    pub fn lamps(&self) -> Vec<usize> {
        self.calls.iter().map(|call| call.lamp).collect()
    }

    pub fn clear_history(&mut self) {
        self.calls.clear();
    }
}

impl Renderer<TestDuration> for MockRenderer {
    fn animate(
        &mut self,
        lamp: usize,
        target: LampVisual,
        duration: TestDuration,
        easing: TransitionStyle,
    ) {
        self.calls.push(AnimateCall {
            lamp,
            target,
            duration,
            easing,
        });
    }
}

// ============================================================================
// Mock LED
// ============================================================================

/// Mock LED that records all color changes for testing
pub struct MockLed {
    current_color: Srgb,
    color_history: Vec<Srgb>,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            current_color: Srgb::new(0.0, 0.0, 0.0),
            color_history: Vec::new(),
        }
    }

    pub fn get_last_color(&self) -> Srgb {
        self.current_color
    }

    pub fn color_history(&self) -> &[Srgb] {
        &self.color_history
    }
}

impl RgbLed for MockLed {
    fn set_color(&mut self, color: Srgb) {
        self.current_color = color;
        self.color_history.push(color);
    }
}

pub fn mock_leds() -> [MockLed; LAMP_COUNT] {
    core::array::from_fn(|_| MockLed::new())
}

// ============================================================================
// Gauge Helpers
// ============================================================================

/// Default animation length in tests
pub const DURATION: TestDuration = TestDuration(200);

/// Default ramp step gap: 200ms / 3, rounded
pub const STEP_DELAY: TestDuration = TestDuration(67);

pub type TestGauge<'t> = BendGauge<'t, TestInstant, MockRenderer, MockTimeSource, u32>;

/// Gauge with default options and an empty call history
pub fn new_gauge(timer: &MockTimeSource) -> TestGauge<'_> {
    gauge_with(timer, GaugeConfig::default())
}

pub fn gauge_with(timer: &MockTimeSource, config: GaugeConfig<TestDuration>) -> TestGauge<'_> {
    let mut gauge = BendGauge::new(MockRenderer::new(), timer, config).unwrap();
    gauge.renderer_mut().clear_history();
    gauge
}

/// Services the gauge, following its timing hints, until it goes idle.
///
/// Returns the number of service calls made.
pub fn run_until_idle<R, const Q: usize>(
    gauge: &mut BendGauge<'_, TestInstant, R, MockTimeSource, u32, Q>,
    timer: &MockTimeSource,
) -> usize
where
    R: Renderer<TestDuration>,
{
    for round in 1..=1000 {
        match gauge.service() {
            ServiceTiming::Idle => return round,
            ServiceTiming::Delay(delay) => timer.advance(delay),
            ServiceTiming::Continuous => timer.advance(TestDuration(1)),
        }
    }
    panic!("gauge never went idle");
}

/// Advances time and services once
pub fn tick<R, const Q: usize>(
    gauge: &mut BendGauge<'_, TestInstant, R, MockTimeSource, u32, Q>,
    timer: &MockTimeSource,
    elapsed: TestDuration,
) -> ServiceTiming<TestDuration>
where
    R: Renderer<TestDuration>,
{
    timer.advance(elapsed);
    gauge.service()
}

/// Takes every delivered callback token
pub fn drain_callbacks<R, const Q: usize>(
    gauge: &mut BendGauge<'_, TestInstant, R, MockTimeSource, u32, Q>,
) -> Vec<u32>
where
    R: Renderer<TestDuration>,
{
    core::iter::from_fn(|| gauge.poll_callback()).collect()
}

/// Lit lamps as a plain vector
pub fn lit(gauge: &TestGauge<'_>) -> Vec<usize> {
    gauge.get().to_vec()
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two colors with floating-point tolerance
pub fn colors_equal(a: Srgb, b: Srgb) -> bool {
    const EPSILON: f32 = 0.001;
    (a.red - b.red).abs() < EPSILON
        && (a.green - b.green).abs() < EPSILON
        && (a.blue - b.blue).abs() < EPSILON
}
