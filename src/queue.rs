//! Named, fixed-capacity FIFO of deferred scenes.
//!
//! The queue never runs anything itself. The owner appends work, and whenever
//! the queue is not already draining it must pull the head with
//! [`WorkQueue::drain_next`] and run it. An operation that is still animating
//! keeps the queue in the draining state until its completion pulls the next
//! entry, which is what guarantees a single scene in flight per lane.

use heapless::Deque;

/// A per-instance lane of pending work.
///
/// # Type Parameters
/// * `S` - The unit of work stored in the lane
/// * `Q` - Lane capacity
#[derive(Debug)]
pub struct WorkQueue<S, const Q: usize> {
    name: &'static str,
    lane: Deque<S, Q>,
    draining: bool,
}

impl<S, const Q: usize> WorkQueue<S, Q> {
    /// Creates an empty, idle lane.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            lane: Deque::new(),
            draining: false,
        }
    }

    /// Lane name, used to tell gauges apart in logs.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn rename(&mut self, name: &'static str) {
        self.name = name;
    }

    /// Appends `op` and returns the number of queued entries.
    ///
    /// Returns the operation back if the lane is full.
    pub fn enqueue(&mut self, op: S) -> Result<usize, S> {
        self.lane.push_back(op)?;
        Ok(self.lane.len())
    }

    /// Places `op` at the head so it runs before anything already queued.
    pub fn push_front(&mut self, op: S) -> Result<usize, S> {
        self.lane.push_front(op)?;
        Ok(self.lane.len())
    }

    /// Removes the head entry for the caller to run.
    ///
    /// The lane counts as draining for as long as this keeps yielding work.
    /// Once it finds the lane empty, draining stops and the next append has to
    /// kick the queue again.
    pub fn drain_next(&mut self) -> Option<S> {
        let next = self.lane.pop_front();
        self.draining = next.is_some();
        next
    }

    /// Drops every pending entry without running it.
    ///
    /// Does not touch the draining flag: an entry already taken by
    /// [`drain_next`](Self::drain_next) is still in flight.
    pub fn clear(&mut self) {
        self.lane.clear();
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    pub fn len(&self) -> usize {
        self.lane.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lane.is_empty()
    }

    /// Number of entries that can still be appended.
    pub fn free(&self) -> usize {
        Q - self.lane.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.lane.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fifo_order() {
        let mut queue: WorkQueue<u8, 4> = WorkQueue::new("test");
        assert_eq!(queue.enqueue(1), Ok(1));
        assert_eq!(queue.enqueue(2), Ok(2));
        assert_eq!(queue.drain_next(), Some(1));
        assert_eq!(queue.drain_next(), Some(2));
        assert_eq!(queue.drain_next(), None);
    }

    #[test]
    fn draining_until_an_empty_pop() {
        let mut queue: WorkQueue<u8, 4> = WorkQueue::new("test");
        assert!(!queue.is_draining());

        queue.enqueue(1).unwrap();
        assert!(!queue.is_draining());

        // The popped entry is in flight, so the lane keeps draining
        assert_eq!(queue.drain_next(), Some(1));
        assert!(queue.is_draining());

        assert_eq!(queue.drain_next(), None);
        assert!(!queue.is_draining());
    }

    #[test]
    fn push_front_jumps_the_line() {
        let mut queue: WorkQueue<u8, 4> = WorkQueue::new("test");
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.push_front(0).unwrap();
        assert_eq!(queue.iter().copied().collect::<heapless::Vec<u8, 4>>().as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn full_lane_hands_the_op_back() {
        let mut queue: WorkQueue<u8, 2> = WorkQueue::new("test");
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        assert_eq!(queue.free(), 0);
        assert_eq!(queue.enqueue(3), Err(3));
        assert_eq!(queue.push_front(3), Err(3));
    }

    #[test]
    fn clear_keeps_in_flight_state() {
        let mut queue: WorkQueue<u8, 4> = WorkQueue::new("test");
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.drain_next();
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.is_draining());
    }
}
