//! Command-based control for gauges.

use heapless::Vec;

use crate::LAMP_COUNT;
use crate::gauge::BendGauge;
use crate::renderer::Renderer;
use crate::state::Matrix;
use crate::time::{TimeInstant, TimeSource};
use crate::types::{Direction, GaugeError, LoopCount};

/// Actions for controlling a gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GaugeAction {
    /// Turn one lamp on.
    On(usize),
    /// Turn one lamp off.
    Off(usize),
    /// Light exactly these lamps.
    Set(Vec<usize, LAMP_COUNT>),
    /// Show a full matrix.
    SetMatrix(Matrix),
    /// Sweep to a clock value.
    Value(u8),
    /// Rotate by a signed number of lamps.
    Rotate(i32),
    /// Rotate until stopped.
    Spin(Direction),
    /// Flash the current pattern.
    Flash(LoopCount),
    /// Dim every lamp.
    Clear,
    /// Queue only the command's callback.
    Callback,
    /// Cancel everything pending.
    Stop,
}

/// Action plus the token to deliver once it has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeCommand<C> {
    pub action: GaugeAction,
    pub callback: Option<C>,
}

impl<C> GaugeCommand<C> {
    /// Creates command.
    pub fn new(action: GaugeAction, callback: Option<C>) -> Self {
        Self { action, callback }
    }
}

impl<C> From<GaugeAction> for GaugeCommand<C> {
    fn from(action: GaugeAction) -> Self {
        Self::new(action, None)
    }
}

impl<'t, I, R, T, C, const Q: usize> BendGauge<'t, I, R, T, C, Q>
where
    I: TimeInstant,
    R: Renderer<I::Duration>,
    T: TimeSource<I>,
{
    /// Dispatches a command to the matching operation.
    ///
    /// Callbacks of `Spin` and `Stop` are queued behind the action. A spin
    /// never finishes, so its token is delivered once the first step is done.
    pub fn handle_command(&mut self, command: GaugeCommand<C>) -> Result<(), GaugeError> {
        let GaugeCommand { action, callback } = command;

        match action {
            GaugeAction::On(index) => self.on(index, callback),
            GaugeAction::Off(index) => self.off(index, callback),
            GaugeAction::Set(indices) => self.set(&indices, callback),
            GaugeAction::SetMatrix(matrix) => self.show_matrix(matrix, callback),
            GaugeAction::Value(value) => self.set_value(value, callback),
            GaugeAction::Rotate(amount) => self.rotate(amount, callback),
            GaugeAction::Spin(direction) => {
                self.rotate_forever(direction)?;
                self.queue_token(callback)
            }
            GaugeAction::Flash(count) => self.flash(count, callback),
            GaugeAction::Clear => self.clear(callback),
            GaugeAction::Callback => self.queue_token(callback),
            GaugeAction::Stop => {
                self.stop();
                self.queue_token(callback)
            }
        }
    }

    fn queue_token(&mut self, callback: Option<C>) -> Result<(), GaugeError> {
        match callback {
            Some(token) => self.callback(token),
            None => Ok(()),
        }
    }
}
