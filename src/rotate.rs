//! Rotation sweeps.
//!
//! A rotation shifts the lit pattern around the ring one lamp per scene. The
//! baseline is captured when the first step *runs*, so a rotation queued
//! behind a `set` turns the pattern that `set` produced.

use crate::gauge::BendGauge;
use crate::renderer::Renderer;
use crate::scene::{Advance, Scene};
use crate::time::{TimeInstant, TimeSource};
use crate::types::{Direction, GaugeError, LoopCount};

impl<'t, I, R, T, C, const Q: usize> BendGauge<'t, I, R, T, C, Q>
where
    I: TimeInstant,
    R: Renderer<I::Duration>,
    T: TimeSource<I>,
{
    /// Rotates the lit pattern by `amount` lamps.
    ///
    /// Positive amounts turn clockwise, negative counter-clockwise. The value
    /// is invalidated right away. Zero rotates nothing and only queues the
    /// callback.
    ///
    /// # Errors
    /// `QueueFull` if the rotation and its callback do not fit.
    pub fn rotate(&mut self, amount: i32, callback: Option<C>) -> Result<(), GaugeError> {
        let Some(direction) = Direction::from_sign(amount) else {
            return match callback {
                Some(token) => self.callback(token),
                None => Ok(()),
            };
        };

        self.submit(
            [Scene::Rotate {
                direction,
                remaining: LoopCount::Finite(amount.unsigned_abs()),
            }],
            callback,
        )?;
        self.state.invalidate_value();
        Ok(())
    }

    /// Rotates until [`stop`](Self::stop) is called.
    ///
    /// Each round puts itself back at the tail of the queue, so scenes queued
    /// later run between two steps.
    ///
    /// # Errors
    /// `QueueFull` if the first step does not fit.
    pub fn rotate_forever(&mut self, direction: Direction) -> Result<(), GaugeError> {
        self.submit(
            [Scene::Rotate {
                direction,
                remaining: LoopCount::Infinite,
            }],
            None,
        )?;
        self.state.invalidate_value();
        Ok(())
    }

    /// True while a rotation holds a snapshot.
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    pub(crate) fn rotate_step(&mut self, direction: Direction, remaining: LoopCount) -> Advance {
        let current = self.state.matrix;
        let rotated = self.rotation.get_or_insert(current).rotated(direction);
        self.rotation = Some(rotated);

        trace!("{}: rotate {}", self.queue.name(), direction.as_str());

        self.set_by_matrix(rotated);
        self.state.invalidate_value();

        match remaining {
            LoopCount::Infinite => self.continue_with(Scene::RequeueRotate(direction)),
            LoopCount::Finite(_) => match remaining.next() {
                Some(remaining) => self.continue_with(Scene::Rotate {
                    direction,
                    remaining,
                }),
                None => self.continue_with(Scene::RotationEnd),
            },
        }

        self.await_animation()
    }

    pub(crate) fn requeue_rotation(&mut self, direction: Direction) {
        self.requeue(Scene::Rotate {
            direction,
            remaining: LoopCount::Infinite,
        });
    }

    pub(crate) fn end_rotation(&mut self) {
        debug!("{}: rotation finished", self.queue.name());
        self.rotation = None;
    }
}
