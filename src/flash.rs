//! Flash patterns.
//!
//! A flash blanks the ring and brings the captured pattern back, once per
//! repetition, then restores the clock value it had before flashing.

use crate::gauge::BendGauge;
use crate::renderer::Renderer;
use crate::scene::{Advance, FlashPhase, Scene};
use crate::state::Matrix;
use crate::time::{TimeInstant, TimeSource};
use crate::types::{GaugeError, LoopCount};

/// What a flash puts back when it ends or is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashSnapshot {
    /// Pattern shown on every lit half-cycle.
    pub matrix: Matrix,
    /// Clock value before the flash started.
    pub value: i8,
}

impl<'t, I, R, T, C, const Q: usize> BendGauge<'t, I, R, T, C, Q>
where
    I: TimeInstant,
    R: Renderer<I::Duration>,
    T: TimeSource<I>,
{
    /// Flashes the current pattern `count` times.
    ///
    /// `Finite(0)` is treated as a single flash. The pattern is captured when
    /// the flash starts running; a running rotation's baseline wins over the
    /// committed matrix. An infinite flash never completes, so its callback
    /// is dropped.
    ///
    /// # Errors
    /// `QueueFull` if the flash and its callback do not fit.
    pub fn flash(&mut self, count: LoopCount, callback: Option<C>) -> Result<(), GaugeError> {
        let remaining = match count {
            LoopCount::Finite(0) => LoopCount::Finite(1),
            other => other,
        };
        let callback = if remaining.is_infinite() {
            None
        } else {
            callback
        };

        self.submit([Scene::FlashBegin { remaining }], callback)
    }

    /// True from the first flash scene until the value has been restored.
    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    pub fn flash_snapshot(&self) -> Option<FlashSnapshot> {
        self.flash
    }

    pub(crate) fn begin_flash(&mut self, remaining: LoopCount) {
        let snapshot = FlashSnapshot {
            matrix: self.rotation.unwrap_or(self.state.matrix),
            value: self.state.value,
        };
        debug!(
            "{}: flash {} lamps, value {}",
            self.queue.name(),
            snapshot.matrix.lit_count(),
            snapshot.value
        );

        self.flash = Some(snapshot);
        self.state.invalidate_value();
        self.continue_with(Scene::FlashCycle {
            phase: FlashPhase::Dark,
            remaining,
        });
    }

    pub(crate) fn flash_step(&mut self, phase: FlashPhase, remaining: LoopCount) -> Advance {
        let Some(snapshot) = self.flash else {
            // Snapshot dropped by stop(); nothing left to show
            return Advance::Now;
        };

        match phase {
            FlashPhase::Dark => {
                self.set_by_matrix(Matrix::EMPTY);
                self.continue_with(Scene::FlashCycle {
                    phase: FlashPhase::Lit,
                    remaining,
                });
            }
            FlashPhase::Lit => {
                self.set_by_matrix(snapshot.matrix);
                let successor = match remaining {
                    LoopCount::Infinite => Scene::FlashEnd { restart: true },
                    LoopCount::Finite(_) => match remaining.next() {
                        Some(remaining) => Scene::FlashCycle {
                            phase: FlashPhase::Dark,
                            remaining,
                        },
                        None => Scene::FlashEnd { restart: false },
                    },
                };
                self.continue_with(successor);
            }
        }

        self.await_animation()
    }

    pub(crate) fn end_flash(&mut self, restart: bool) {
        let Some(snapshot) = self.flash else {
            return;
        };
        self.state.value = snapshot.value;

        if restart {
            self.requeue(Scene::FlashBegin {
                remaining: LoopCount::Infinite,
            });
        } else {
            debug!("{}: flash finished", self.queue.name());
            self.flash = None;
        }
    }
}
