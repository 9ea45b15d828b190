//! Smooth movement along a closed waypoint loop.
//!
//! Positions are produced by linear interpolation between consecutive
//! waypoints, subdivided into micro-steps. The loop is closed and infinite:
//! after the last waypoint the follower wraps to the first.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::geo::LatLng;

/// Progress of an entity along a closed patrol loop.
///
/// The path itself is never mutated. `step` indexes the current segment
/// start and `micro_step` counts sub-segment interpolations; the invariants
/// `step < path.len()` and `micro_step < micro_steps_per_segment` hold after
/// every call to [`PatrolState::advance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolState {
    path: Vec<LatLng>,
    step: usize,
    micro_step: u32,
    micro_steps_per_segment: u32,
}

impl PatrolState {
    /// Create a patrol starting at `path[start_step]` (wrapped into range).
    ///
    /// Rejects paths with fewer than two waypoints and a zero micro-step
    /// count.
    pub fn new(path: Vec<LatLng>, start_step: usize, micro_steps_per_segment: u32) -> CoreResult<Self> {
        if path.len() < 2 {
            return Err(CoreError::PathTooShort(path.len()));
        }
        if micro_steps_per_segment == 0 {
            return Err(CoreError::InvalidMicroSteps(0));
        }
        let step = start_step % path.len();
        Ok(Self {
            path,
            step,
            micro_step: 0,
            micro_steps_per_segment,
        })
    }

    /// Advance one micro-step and return the new interpolated position.
    ///
    /// When the micro-step counter reaches its cap it resets to zero and the
    /// segment index advances modulo the path length, so after exactly
    /// `micro_steps_per_segment` calls the follower sits exactly on the next
    /// waypoint.
    pub fn advance(&mut self) -> LatLng {
        self.micro_step += 1;
        if self.micro_step >= self.micro_steps_per_segment {
            self.micro_step = 0;
            self.step = (self.step + 1) % self.path.len();
        }
        self.position()
    }

    /// The current interpolated position without advancing.
    pub fn position(&self) -> LatLng {
        let current = self.path[self.step];
        let next = self.path[(self.step + 1) % self.path.len()];
        let f = f64::from(self.micro_step) / f64::from(self.micro_steps_per_segment);
        LatLng::new(
            current.lat + (next.lat - current.lat) * f,
            current.lng + (next.lng - current.lng) * f,
        )
    }

    /// The current segment index.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The current micro-step counter.
    pub fn micro_step(&self) -> u32 {
        self.micro_step
    }

    /// The configured micro-steps per segment.
    pub fn micro_steps_per_segment(&self) -> u32 {
        self.micro_steps_per_segment
    }

    /// The waypoints of the loop.
    pub fn path(&self) -> &[LatLng] {
        &self.path
    }
}
