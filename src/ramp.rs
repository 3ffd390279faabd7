//! Clock-sweep value ramps.
//!
//! Moving the gauge from one value to another lights (or dims) one lamp per
//! step, each step starting `duration * delay_factor` after the previous one.
//! All step timers are laid out when the ramp starts, so cancelling a ramp
//! means dropping the whole plan, not just the next timer.

use heapless::Vec;

use crate::LAMP_COUNT;
use crate::time::{TimeDuration, TimeInstant};

/// A single timed lamp change of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampStep {
    /// Lamp switched by this step.
    pub lamp: usize,
    /// Whether the lamp turns on (ascending) or off (descending).
    pub lit: bool,
    /// Position of the step; the timer fires at `index * step_delay`.
    pub index: u32,
    /// The final step commits the target value and ends the scene.
    pub last: bool,
}

/// Ordered lamp changes taking the gauge from one value to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampPlan {
    from: u8,
    to: u8,
    steps: Vec<RampStep, LAMP_COUNT>,
}

impl RampPlan {
    /// Plans the sweep from `from` to `to`.
    ///
    /// Ascending lights lamps `from..to` in order; descending dims lamps
    /// `to..from` starting with the highest. Equal values yield an empty plan.
    /// Values are clamped to the ring size.
    pub fn new(from: u8, to: u8) -> Self {
        let from_lamp = usize::from(from).min(LAMP_COUNT);
        let to_lamp = usize::from(to).min(LAMP_COUNT);
        let mut steps = Vec::new();

        if to_lamp > from_lamp {
            for (index, lamp) in (from_lamp..to_lamp).enumerate() {
                let _ = steps.push(RampStep {
                    lamp,
                    lit: true,
                    index: index as u32,
                    last: lamp + 1 == to_lamp,
                });
            }
        } else {
            for (index, lamp) in (to_lamp..from_lamp).rev().enumerate() {
                let _ = steps.push(RampStep {
                    lamp,
                    lit: false,
                    index: index as u32,
                    last: lamp == to_lamp,
                });
            }
        }

        Self { from, to, steps }
    }

    pub fn start_value(&self) -> u8 {
        self.from
    }

    pub fn end_value(&self) -> u8 {
        self.to
    }

    pub fn is_ascending(&self) -> bool {
        self.to > self.from
    }

    pub fn steps(&self) -> &[RampStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offset of each step from the start of the ramp.
    pub fn offsets<'a, D: TimeDuration + 'a>(&'a self, step_delay: D) -> impl Iterator<Item = D> + 'a {
        self.steps.iter().map(move |step| step_delay.times(step.index))
    }
}

/// A plan being played back against a clock.
pub(crate) struct RampTimers<I: TimeInstant> {
    plan: RampPlan,
    started: I,
    step_delay: I::Duration,
    fired: usize,
    last_fired_at: Option<I>,
}

impl<I: TimeInstant> RampTimers<I> {
    pub(crate) fn start(plan: RampPlan, started: I, step_delay: I::Duration) -> Self {
        Self {
            plan,
            started,
            step_delay,
            fired: 0,
            last_fired_at: None,
        }
    }

    pub(crate) fn target(&self) -> u8 {
        self.plan.to
    }

    fn due_at(&self, step: &RampStep) -> I {
        self.started
            .deadline_after(self.step_delay.times(step.index))
    }

    /// Takes the next step whose timer has expired at `now`.
    pub(crate) fn pop_due(&mut self, now: I) -> Option<RampStep> {
        let step = *self.plan.steps.get(self.fired)?;
        if self.due_at(&step) > now {
            return None;
        }
        self.fired += 1;
        self.last_fired_at = Some(now);
        Some(step)
    }

    /// When the most recently fired step started its lamp animation.
    pub(crate) fn last_fired_at(&self) -> Option<I> {
        self.last_fired_at
    }

    /// When the next pending timer fires.
    pub(crate) fn next_due(&self) -> Option<I> {
        self.plan.steps.get(self.fired).map(|step| self.due_at(step))
    }
}
