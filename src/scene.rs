//! Units of queued work.

use crate::state::Matrix;
use crate::types::{Direction, LoopCount};

/// Half of a flash repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashPhase {
    /// Every lamp off.
    Dark,
    /// Snapshot restored.
    Lit,
}

/// One queued state change.
///
/// Multi-step operations do not enqueue every step up front. A running step
/// pushes its successor to the head of the queue, so later calls stay behind
/// it. Infinite modes end each round by re-enqueueing themselves at the tail,
/// so later calls interleave with them. A scene pushes at most one successor
/// after being popped, so continuations always fit in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scene<C> {
    /// Switch a single lamp.
    Lamp { index: usize, lit: bool },
    /// Show exactly this matrix.
    Matrix(Matrix),
    /// Sweep the value from `from` to `to`.
    Ramp { from: u8, to: u8 },
    /// One rotation step, followed by `remaining - 1` more.
    Rotate {
        direction: Direction,
        remaining: LoopCount,
    },
    /// Puts an infinite rotation back at the tail.
    RequeueRotate(Direction),
    /// Finite rotation finished; drop the snapshot.
    RotationEnd,
    /// Capture the flash snapshot, then flash `remaining` times.
    FlashBegin { remaining: LoopCount },
    /// One half of a flash repetition.
    FlashCycle {
        phase: FlashPhase,
        remaining: LoopCount,
    },
    /// Restore the value; restart when flashing forever.
    FlashEnd { restart: bool },
    /// Put back a value saved before a matrix scene invalidated it.
    RestoreValue(i8),
    /// Hand a caller's token back in queue order.
    Callback(C),
}

impl<C> Scene<C> {
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Scene::Lamp { lit: true, .. } => "lamp-on",
            Scene::Lamp { lit: false, .. } => "lamp-off",
            Scene::Matrix(_) => "matrix",
            Scene::Ramp { .. } => "ramp",
            Scene::Rotate { .. } => "rotate",
            Scene::RequeueRotate(_) => "requeue-rotate",
            Scene::RotationEnd => "rotation-end",
            Scene::FlashBegin { .. } => "flash-begin",
            Scene::FlashCycle {
                phase: FlashPhase::Dark,
                ..
            } => "flash-dark",
            Scene::FlashCycle {
                phase: FlashPhase::Lit,
                ..
            } => "flash-lit",
            Scene::FlashEnd { .. } => "flash-end",
            Scene::RestoreValue(_) => "restore-value",
            Scene::Callback(_) => "callback",
        }
    }
}

/// What the drain loop does after running a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// The scene finished synchronously; run the next one.
    Now,
    /// The scene is animating; its completion pulls the next one.
    OnCompletion,
}
