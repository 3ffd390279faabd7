//! Bend gauge with a sequential scene queue.
//!
//! Provides [`BendGauge`], which owns the lamp state of one ring and
//! serializes every requested change into a single ordered timeline. Exactly
//! one scene animates at a time; the next scene starts when the animation's
//! deadline passes or, for value ramps, when the last step timer's lamp has
//! finished animating.

use heapless::Deque;

use crate::config::GaugeConfig;
use crate::flash::FlashSnapshot;
use crate::queue::WorkQueue;
use crate::ramp::{RampPlan, RampTimers};
use crate::renderer::Renderer;
use crate::scene::{Advance, Scene};
use crate::state::{GaugeState, Matrix, check_index};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::GaugeError;
use crate::{LAMP_COUNT, MAX_VALUE};

/// Default number of scenes (and undelivered callbacks) a gauge can hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Timing information returned by service operations.
///
/// Indicates when the gauge or renderer needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Something is interpolating every frame. Service again at your frame rate.
    Continuous,

    /// Nothing changes before this delay has elapsed.
    Delay(D),

    /// Nothing is queued or animating. No servicing needed until the next call.
    Idle,
}

/// Scene currently holding the queue.
enum Active<I: TimeInstant> {
    /// Renderer transition that ends at `until`.
    Animation { until: I },
    /// Value ramp with step timers still pending.
    Ramp(RampTimers<I>),
}

/// A ten-lamp circular gauge driven through a scene queue.
///
/// Every public operation appends scenes to the gauge's lane and starts
/// draining it if it was idle. Lamp state is committed when a scene starts,
/// so [`get`](Self::get) and [`matrix`](Self::matrix) show the target of the
/// running scene rather than an interpolated in-between.
///
/// Callers attach callbacks as tokens of their own type `C`. A token is
/// delivered, in queue order, once everything queued before it has finished;
/// pick delivered tokens up with [`poll_callback`](Self::poll_callback).
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `R` - Renderer implementation type
/// * `T` - Time source implementation type
/// * `C` - Callback token type
/// * `Q` - Queue capacity
pub struct BendGauge<'t, I, R, T, C, const Q: usize = DEFAULT_QUEUE_CAPACITY>
where
    I: TimeInstant,
    R: Renderer<I::Duration>,
    T: TimeSource<I>,
{
    renderer: R,
    time_source: &'t T,
    config: GaugeConfig<I::Duration>,
    pub(crate) state: GaugeState,
    pub(crate) queue: WorkQueue<Scene<C>, Q>,
    active: Option<Active<I>>,
    pub(crate) rotation: Option<Matrix>,
    pub(crate) flash: Option<FlashSnapshot>,
    callbacks: Deque<C, Q>,
}

impl<'t, I, R, T, C, const Q: usize> BendGauge<'t, I, R, T, C, Q>
where
    I: TimeInstant,
    R: Renderer<I::Duration>,
    T: TimeSource<I>,
{
    /// Creates an idle gauge with every lamp dimmed.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration does not validate.
    pub fn new(
        mut renderer: R,
        time_source: &'t T,
        config: GaugeConfig<I::Duration>,
    ) -> Result<Self, GaugeError> {
        config.validate()?;

        for lamp in 0..LAMP_COUNT {
            renderer.animate(
                lamp,
                config.visual(false),
                I::Duration::ZERO,
                config.easing,
            );
        }

        Ok(Self {
            renderer,
            time_source,
            queue: WorkQueue::new(config.queue),
            config,
            state: GaugeState::new(),
            active: None,
            rotation: None,
            flash: None,
            callbacks: Deque::new(),
        })
    }

    /// Replaces the options at runtime.
    ///
    /// Takes effect from the next scene; a running animation keeps its timing.
    /// Glow layers are drawn by the renderer, so hand new layers to it as well
    /// (see [`LedRing::set_glow`](crate::LedRing::set_glow)).
    pub fn set_config(&mut self, config: GaugeConfig<I::Duration>) -> Result<(), GaugeError> {
        config.validate()?;
        self.queue.rename(config.queue);
        self.config = config;
        Ok(())
    }

    /// Returns the options in effect.
    pub fn config(&self) -> &GaugeConfig<I::Duration> {
        &self.config
    }

    /// Turns lamp `index` on.
    ///
    /// # Errors
    /// `InvalidIndex` (callback still queued) or `QueueFull`.
    pub fn on(&mut self, index: usize, callback: Option<C>) -> Result<(), GaugeError> {
        self.toggle(index, true, callback)
    }

    /// Turns lamp `index` off.
    ///
    /// # Errors
    /// `InvalidIndex` (callback still queued) or `QueueFull`.
    pub fn off(&mut self, index: usize, callback: Option<C>) -> Result<(), GaugeError> {
        self.toggle(index, false, callback)
    }

    fn toggle(&mut self, index: usize, lit: bool, callback: Option<C>) -> Result<(), GaugeError> {
        match check_index(index) {
            Ok(index) => self.submit([Scene::Lamp { index, lit }], callback),
            Err(err) => self.reject(err, callback),
        }
    }

    /// Lights exactly the lamps in `indices` and dims every other lamp.
    ///
    /// # Errors
    /// `InvalidIndex` (callback still queued) or `QueueFull`.
    pub fn set(&mut self, indices: &[usize], callback: Option<C>) -> Result<(), GaugeError> {
        match Matrix::from_indices(indices) {
            Ok(matrix) => self.show_matrix(matrix, callback),
            Err(err) => self.reject(err, callback),
        }
    }

    /// Shows `lamps`, which must hold one entry per lamp.
    ///
    /// # Errors
    /// `MalformedMatrix` (callback still queued) or `QueueFull`.
    pub fn set_matrix(&mut self, lamps: &[bool], callback: Option<C>) -> Result<(), GaugeError> {
        match Matrix::from_slice(lamps) {
            Ok(matrix) => self.show_matrix(matrix, callback),
            Err(err) => self.reject(err, callback),
        }
    }

    /// Dims every lamp.
    pub fn clear(&mut self, callback: Option<C>) -> Result<(), GaugeError> {
        self.show_matrix(Matrix::EMPTY, callback)
    }

    /// Queues `matrix` as one scene. The clock value stops meaning anything.
    pub fn show_matrix(&mut self, matrix: Matrix, callback: Option<C>) -> Result<(), GaugeError> {
        self.submit([Scene::Matrix(matrix)], callback)?;
        self.state.invalidate_value();
        Ok(())
    }

    /// Queues `token` behind everything already queued.
    pub fn callback(&mut self, token: C) -> Result<(), GaugeError> {
        self.submit([], Some(token))
    }

    /// Sweeps the gauge to `target`, one lamp per step.
    ///
    /// The sweep starts from the last *requested* value, so a second call made
    /// while a ramp is still running continues from where the first one will
    /// end. Requesting the pending value again queues nothing, not even the
    /// callback.
    ///
    /// # Errors
    /// `InvalidValue` (callback still queued) or `QueueFull`.
    pub fn set_value(&mut self, target: u8, callback: Option<C>) -> Result<(), GaugeError> {
        if target > MAX_VALUE {
            return self.reject(GaugeError::InvalidValue(target), callback);
        }

        // Coming from a free-form matrix, the sweep restarts at 12 o'clock
        if self.state.value < 0 {
            self.state.value = 0;
            self.state.pending = 0;
        }

        if target == self.state.pending {
            return Ok(());
        }

        let from = self.state.pending;
        self.submit([Scene::Ramp { from, to: target }], callback)?;
        self.state.pending = target;
        Ok(())
    }

    /// Committed clock value, or [`NO_VALUE`](crate::NO_VALUE) after a
    /// matrix, rotation or flash.
    pub fn value(&self) -> i8 {
        self.state.value
    }

    /// Endpoint of the last requested ramp.
    pub fn pending_value(&self) -> u8 {
        self.state.pending
    }

    /// Indices of the lit lamps.
    pub fn get(&self) -> heapless::Vec<usize, LAMP_COUNT> {
        self.state.matrix.enabled()
    }

    /// Returns the committed lamp states.
    pub fn matrix(&self) -> Matrix {
        self.state.matrix
    }

    /// Returns the matrix together with the committed and pending values.
    pub fn state(&self) -> &GaugeState {
        &self.state
    }

    /// Cancels everything that has not started yet.
    ///
    /// Drops queued scenes and pending ramp timers and ends any rotation. If a
    /// flash was running, its snapshot and value are put back as the final
    /// state. A lamp transition already handed to the renderer is not rolled
    /// back; the restore waits for it to finish.
    pub fn stop(&mut self) {
        debug!("{}: stop with {} queued", self.queue.name(), self.queue.len());

        self.queue.clear();

        // The lamp of the last fired step keeps the queue until it has finished
        if let Some(Active::Ramp(timers)) = &self.active {
            let until = timers
                .last_fired_at()
                .map(|started| started.deadline_after(self.config.duration));
            self.active = until.map(|until| Active::Animation { until });
        }
        // Ramps that never ran must not count as reached
        if let Ok(value) = u8::try_from(self.state.value) {
            self.state.pending = value;
        }

        self.rotation = None;

        if let Some(snapshot) = self.flash.take() {
            self.state.invalidate_value();
            self.requeue(Scene::Matrix(snapshot.matrix));
            self.requeue(Scene::RestoreValue(snapshot.value));
        }

        if self.active.is_none() {
            self.drain_next();
        }
    }

    /// Advances timers and animations, returning when to service again.
    ///
    /// Fires every ramp step whose timer has expired, completes the running
    /// animation once its deadline has passed, and starts the next scenes.
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        let now = self.time_source.now();

        self.fire_due_ramp_steps(now);

        if let Some(Active::Animation { until }) = self.active {
            if until <= now {
                self.active = None;
                self.drain_next();
            }
        }

        self.timing(now)
    }

    fn timing(&self, now: I) -> ServiceTiming<I::Duration> {
        match &self.active {
            Some(Active::Animation { until }) => ServiceTiming::Delay(now.until(*until)),
            Some(Active::Ramp(timers)) => ServiceTiming::Delay(
                timers
                    .next_due()
                    .map_or(I::Duration::ZERO, |due| now.until(due)),
            ),
            None => ServiceTiming::Idle,
        }
    }

    /// Takes the next delivered callback token.
    pub fn poll_callback(&mut self) -> Option<C> {
        self.callbacks.pop_front()
    }

    /// True when nothing is queued, animating or waiting on a timer.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    /// Returns true while a scene holds the queue.
    pub fn is_draining(&self) -> bool {
        self.queue.is_draining()
    }

    /// Number of scenes waiting behind the running one.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the lane name from the configuration.
    pub fn queue_name(&self) -> &'static str {
        self.queue.name()
    }

    /// Returns a reference to the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns a mutable reference to the renderer, e.g. to service it.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Appends `scenes` and the callback, then kicks the queue if it was idle.
    ///
    /// Either everything fits or nothing is queued.
    pub(crate) fn submit<const N: usize>(
        &mut self,
        scenes: [Scene<C>; N],
        callback: Option<C>,
    ) -> Result<(), GaugeError> {
        let needed = N + usize::from(callback.is_some());
        if self.queue.free() < needed {
            warn!(
                "{}: queue full, {} scenes rejected",
                self.queue.name(),
                needed
            );
            return Err(GaugeError::QueueFull);
        }

        for scene in scenes {
            let _ = self.queue.enqueue(scene);
        }
        if let Some(token) = callback {
            let _ = self.queue.enqueue(Scene::Callback(token));
        }

        if !self.queue.is_draining() {
            self.drain_next();
        }
        Ok(())
    }

    /// Queues just the callback of a call that failed validation.
    pub(crate) fn reject(&mut self, err: GaugeError, callback: Option<C>) -> Result<(), GaugeError> {
        warn!("{}: {}", self.queue.name(), err);
        if callback.is_some() {
            self.submit([], callback)?;
        }
        Err(err)
    }

    /// Pushes the successor of the running scene to the head of the queue.
    pub(crate) fn continue_with(&mut self, scene: Scene<C>) {
        if let Err(scene) = self.queue.push_front(scene) {
            warn!("{}: no room to continue {}", self.queue.name(), scene.name());
        }
    }

    /// Re-enqueues an infinite operation at the tail.
    pub(crate) fn requeue(&mut self, scene: Scene<C>) {
        if let Err(scene) = self.queue.enqueue(scene) {
            warn!("{}: no room to requeue {}", self.queue.name(), scene.name());
        }
    }

    /// Runs queued scenes until one of them is left animating.
    fn drain_next(&mut self) {
        while let Some(scene) = self.queue.drain_next() {
            trace!("{}: running {}", self.queue.name(), scene.name());
            if self.run_scene(scene) == Advance::OnCompletion {
                return;
            }
        }
    }

    fn run_scene(&mut self, scene: Scene<C>) -> Advance {
        match scene {
            Scene::Lamp { index, lit } => {
                self.apply_lamp_state(index, lit);
                self.await_animation()
            }
            Scene::Matrix(matrix) => {
                self.set_by_matrix(matrix);
                self.await_animation()
            }
            Scene::Ramp { from, to } => self.start_ramp(from, to),
            Scene::Rotate {
                direction,
                remaining,
            } => self.rotate_step(direction, remaining),
            Scene::RequeueRotate(direction) => {
                self.requeue_rotation(direction);
                Advance::Now
            }
            Scene::RotationEnd => {
                self.end_rotation();
                Advance::Now
            }
            Scene::FlashBegin { remaining } => {
                self.begin_flash(remaining);
                Advance::Now
            }
            Scene::FlashCycle { phase, remaining } => self.flash_step(phase, remaining),
            Scene::FlashEnd { restart } => {
                self.end_flash(restart);
                Advance::Now
            }
            Scene::RestoreValue(value) => {
                self.state.value = value;
                Advance::Now
            }
            Scene::Callback(token) => {
                if let Err(_token) = self.callbacks.push_back(token) {
                    warn!("{}: callback outbox full, token dropped", self.queue.name());
                }
                Advance::Now
            }
        }
    }

    /// Holds the queue until the animations just started have finished.
    pub(crate) fn await_animation(&mut self) -> Advance {
        let until = self.time_source.now().deadline_after(self.config.duration);
        self.active = Some(Active::Animation { until });
        Advance::OnCompletion
    }

    /// Animates one lamp and commits its state immediately.
    fn apply_lamp_state(&mut self, index: usize, lit: bool) {
        self.state.matrix.set(index, lit);
        self.renderer.animate(
            index,
            self.config.visual(lit),
            self.config.duration,
            self.config.easing,
        );
    }

    /// Lights the lamps of `matrix`, then dims the rest.
    pub(crate) fn set_by_matrix(&mut self, matrix: Matrix) {
        for lamp in (0..LAMP_COUNT).filter(|&lamp| matrix.is_lit(lamp)) {
            self.apply_lamp_state(lamp, true);
        }
        for lamp in (0..LAMP_COUNT).filter(|&lamp| !matrix.is_lit(lamp)) {
            self.apply_lamp_state(lamp, false);
        }
    }

    fn start_ramp(&mut self, from: u8, to: u8) -> Advance {
        let plan = RampPlan::new(from, to);
        if plan.is_empty() {
            return Advance::Now;
        }

        debug!(
            "{}: ramp {} -> {} in {} steps",
            self.queue.name(),
            from,
            to,
            plan.len()
        );

        let now = self.time_source.now();
        self.active = Some(Active::Ramp(RampTimers::start(
            plan,
            now,
            self.config.step_delay(),
        )));
        self.fire_due_ramp_steps(now);
        Advance::OnCompletion
    }

    /// Runs every expired ramp step; the last one hands over to its lamp animation.
    fn fire_due_ramp_steps(&mut self, now: I) {
        loop {
            let Some(Active::Ramp(timers)) = self.active.as_mut() else {
                return;
            };
            let target = timers.target();
            let Some(step) = timers.pop_due(now) else {
                return;
            };

            if step.last {
                self.state.value = target as i8;
            } else {
                self.state.step_value_toward(target);
            }
            self.apply_lamp_state(step.lamp, step.lit);

            if step.last {
                self.active = Some(Active::Animation {
                    until: now.deadline_after(self.config.duration),
                });
                return;
            }
        }
    }
}
