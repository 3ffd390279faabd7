//! Lamp matrix and gauge value bookkeeping.

use heapless::Vec;

use crate::types::{Direction, GaugeError};
use crate::{LAMP_COUNT, MAX_VALUE};

/// Value reported while the matrix does not correspond to a clock value.
pub const NO_VALUE: i8 = -1;

/// On/off state of every lamp on the ring, indexed clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Matrix([bool; LAMP_COUNT]);

impl Matrix {
    /// All lamps off.
    pub const EMPTY: Self = Matrix([false; LAMP_COUNT]);

    /// All lamps on.
    pub const FULL: Self = Matrix([true; LAMP_COUNT]);

    pub const fn new(lamps: [bool; LAMP_COUNT]) -> Self {
        Matrix(lamps)
    }

    /// Builds a matrix lighting exactly the given lamps.
    ///
    /// # Errors
    /// `InvalidIndex` for the first index outside the ring.
    pub fn from_indices(indices: &[usize]) -> Result<Self, GaugeError> {
        let mut matrix = Self::EMPTY;
        for &index in indices {
            check_index(index)?;
            matrix.0[index] = true;
        }
        Ok(matrix)
    }

    /// Builds a matrix from a slice that must hold one entry per lamp.
    ///
    /// # Errors
    /// `MalformedMatrix` when the slice length is not `LAMP_COUNT`.
    pub fn from_slice(lamps: &[bool]) -> Result<Self, GaugeError> {
        let lamps: [bool; LAMP_COUNT] = lamps
            .try_into()
            .map_err(|_| GaugeError::MalformedMatrix { len: lamps.len() })?;
        Ok(Matrix(lamps))
    }

    /// Matrix of a clock value: lamps `0..value` lit.
    pub fn for_value(value: u8) -> Self {
        let mut matrix = Self::EMPTY;
        for lit in matrix.0.iter_mut().take(usize::from(value.min(MAX_VALUE))) {
            *lit = true;
        }
        matrix
    }

    pub fn is_lit(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn set(&mut self, index: usize, lit: bool) {
        if let Some(lamp) = self.0.get_mut(index) {
            *lamp = lit;
        }
    }

    /// Indices of the lit lamps in ascending order.
    pub fn enabled(&self) -> Vec<usize, LAMP_COUNT> {
        let mut enabled = Vec::new();
        for (index, _) in self.0.iter().enumerate().filter(|(_, lit)| **lit) {
            // Capacity equals the lamp count, so this cannot fail.
            let _ = enabled.push(index);
        }
        enabled
    }

    pub fn lit_count(&self) -> usize {
        self.0.iter().filter(|lit| **lit).count()
    }

    pub const fn as_array(&self) -> &[bool; LAMP_COUNT] {
        &self.0
    }

    /// Shifts the pattern one lamp in `direction`, wrapping around the ring.
    pub fn rotated(mut self, direction: Direction) -> Self {
        match direction {
            // pop-front, push-back
            Direction::CounterClockwise => self.0.rotate_left(1),
            // pop-back, push-front
            Direction::Clockwise => self.0.rotate_right(1),
        }
        self
    }
}

impl From<[bool; LAMP_COUNT]> for Matrix {
    fn from(lamps: [bool; LAMP_COUNT]) -> Self {
        Matrix(lamps)
    }
}

impl From<Matrix> for [bool; LAMP_COUNT] {
    fn from(matrix: Matrix) -> Self {
        matrix.0
    }
}

pub(crate) fn check_index(index: usize) -> Result<usize, GaugeError> {
    if index < LAMP_COUNT {
        Ok(index)
    } else {
        Err(GaugeError::InvalidIndex(index))
    }
}

/// Everything a gauge knows about what it is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeState {
    /// Lamp states as committed at the start of their animations.
    pub matrix: Matrix,
    /// Committed clock value, or [`NO_VALUE`].
    pub value: i8,
    /// Endpoint of the last requested ramp.
    pub pending: u8,
}

impl GaugeState {
    pub const fn new() -> Self {
        Self {
            matrix: Matrix::EMPTY,
            value: 0,
            pending: 0,
        }
    }

    pub(crate) fn invalidate_value(&mut self) {
        self.value = NO_VALUE;
    }

    /// Moves the committed value one step toward `target`.
    pub(crate) fn step_value_toward(&mut self, target: u8) {
        let target = target as i8;
        if self.value < target {
            self.value += 1;
        } else if self.value > target {
            self.value -= 1;
        }
    }
}

impl Default for GaugeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices_lights_only_listed_lamps() {
        let matrix = Matrix::from_indices(&[1, 2, 6]).unwrap();
        assert_eq!(matrix.enabled().as_slice(), &[1, 2, 6]);
        assert_eq!(matrix.lit_count(), 3);
        assert!(!matrix.is_lit(0));
    }

    #[test]
    fn from_indices_rejects_lamp_outside_ring() {
        assert_eq!(
            Matrix::from_indices(&[3, 10]),
            Err(GaugeError::InvalidIndex(10))
        );
    }

    #[test]
    fn from_slice_requires_one_entry_per_lamp() {
        assert_eq!(
            Matrix::from_slice(&[true, false]),
            Err(GaugeError::MalformedMatrix { len: 2 })
        );
        let lamps = [true, false, false, false, false, false, false, false, false, true];
        assert_eq!(Matrix::from_slice(&lamps).unwrap().enabled().as_slice(), &[0, 9]);
    }

    #[test]
    fn rotation_wraps_around_ring() {
        let matrix = Matrix::from_indices(&[0, 9]).unwrap();
        assert_eq!(
            matrix.rotated(Direction::Clockwise).enabled().as_slice(),
            &[0, 1]
        );
        assert_eq!(
            matrix.rotated(Direction::CounterClockwise).enabled().as_slice(),
            &[8, 9]
        );
    }

    #[test]
    fn opposite_rotations_cancel() {
        let matrix = Matrix::from_indices(&[2, 3, 7]).unwrap();
        let back = matrix
            .rotated(Direction::Clockwise)
            .rotated(Direction::CounterClockwise);
        assert_eq!(back, matrix);
    }

    #[test]
    fn for_value_lights_from_twelve_o_clock() {
        assert_eq!(Matrix::for_value(3).enabled().as_slice(), &[0, 1, 2]);
        assert_eq!(Matrix::for_value(0), Matrix::EMPTY);
        assert_eq!(Matrix::for_value(10), Matrix::FULL);
    }

    #[test]
    fn value_steps_toward_target() {
        let mut state = GaugeState::new();
        state.step_value_toward(2);
        assert_eq!(state.value, 1);
        state.value = 5;
        state.step_value_toward(2);
        assert_eq!(state.value, 4);
        state.value = 2;
        state.step_value_toward(2);
        assert_eq!(state.value, 2);
    }
}
